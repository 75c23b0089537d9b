use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use super::{raw_content_url, DocProvider};
use crate::directory::{DirectoryError, DirectoryResult};

/// Fetches raw markdown by documentation path
#[async_trait]
pub trait DocumentationSource: Send + Sync {
    async fn raw_document(&self, doc_path: &str) -> DirectoryResult<String>;
}

/// Documentation served over HTTP (GitHub raw content or a plain file server)
pub struct HttpDocumentation {
    content_url: Url,
    provider: DocProvider,
    branch: String,
    client: reqwest::Client,
}

impl HttpDocumentation {
    pub fn new(
        content_url: Url,
        provider: DocProvider,
        branch: String,
        connect_timeout_secs: u64,
        request_timeout_secs: u64,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::ClientBuilder::new()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(request_timeout_secs))
            .build()?;

        Ok(Self {
            content_url,
            provider,
            branch,
            client,
        })
    }
}

#[async_trait]
impl DocumentationSource for HttpDocumentation {
    async fn raw_document(&self, doc_path: &str) -> DirectoryResult<String> {
        let url = raw_content_url(&self.content_url, doc_path, self.provider, &self.branch)?;
        tracing::debug!(url = %url, "Fetching documentation");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Rejected {
                status: status.as_u16(),
                description: None,
            });
        }
        Ok(response.text().await?)
    }
}

/// Fixed documents keyed by path; an empty source serves nothing
#[derive(Debug, Clone, Default)]
pub struct StaticDocumentation {
    documents: HashMap<String, String>,
}

impl StaticDocumentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, doc_path: impl Into<String>, markdown: impl Into<String>) -> Self {
        self.documents.insert(doc_path.into(), markdown.into());
        self
    }
}

#[async_trait]
impl DocumentationSource for StaticDocumentation {
    async fn raw_document(&self, doc_path: &str) -> DirectoryResult<String> {
        self.documents
            .get(doc_path)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("document {}", doc_path)))
    }
}
