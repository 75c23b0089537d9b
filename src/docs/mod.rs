//! Documentation help panel
//!
//! Pages look up their documentation path in a documentation structure
//! (a JSON tree keyed by feature), fetch the raw markdown from the content
//! endpoint, and rewrite relative image links against the image prefix.

pub mod source;

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::directory::{scim::endpoint, DirectoryResult};

pub use source::{DocumentationSource, HttpDocumentation, StaticDocumentation};

/// Structure key of the identity provider edit page overview
pub const IDP_EDIT_OVERVIEW_DOCS_KEY: &str = "identityProviders.edit.overview";

/// Where raw documentation is served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocProvider {
    /// Raw GitHub content: paths are prefixed with the branch
    Github,
    #[default]
    Plain,
}

impl DocProvider {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "github" => DocProvider::Github,
            _ => DocProvider::Plain,
        }
    }
}

/// Feature → documentation path tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocStructure(Value);

impl DocStructure {
    pub fn new(tree: Value) -> Self {
        Self(tree)
    }

    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self)
    }

    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(members) => members.is_empty(),
            _ => false,
        }
    }

    /// Dotted-path lookup of a non-empty string leaf
    pub fn get(&self, key: &str) -> Option<&str> {
        key.split('.')
            .try_fold(&self.0, |node, segment| node.get(segment))
            .and_then(Value::as_str)
            .filter(|path| !path.is_empty())
    }
}

/// URL of a raw document under the content endpoint
pub fn raw_content_url(
    endpoint_url: &Url,
    doc_path: &str,
    provider: DocProvider,
    branch: &str,
) -> DirectoryResult<Url> {
    let mut segments: Vec<&str> = Vec::new();
    if provider == DocProvider::Github {
        segments.push(branch);
    }
    segments.extend(doc_path.split('/').filter(|s| !s.is_empty()));
    endpoint(endpoint_url, &segments)
}

/// Strip leading `./`, `../` and `/` from a relative path
pub fn remove_dots_and_slashes_from_relative_path(path: &str) -> &str {
    let mut rest = path;
    loop {
        let trimmed = rest
            .strip_prefix("../")
            .or_else(|| rest.strip_prefix("./"))
            .or_else(|| rest.strip_prefix('/'));
        match trimmed {
            Some(next) => rest = next,
            None => return rest,
        }
    }
}

/// Resolve a markdown image URI against the image prefix
pub fn transform_image_uri(uri: &str, image_prefix: Option<&str>) -> String {
    if uri.starts_with("http") {
        return uri.to_string();
    }
    let prefix = image_prefix.unwrap_or_default().trim_end_matches('/');
    format!(
        "{}/{}",
        prefix,
        remove_dots_and_slashes_from_relative_path(uri)
    )
}

/// Rewrite every `![alt](uri)` image target in a markdown document
pub fn rewrite_image_links(markdown: &str, image_prefix: Option<&str>) -> String {
    let mut output = String::with_capacity(markdown.len());
    let mut rest = markdown;

    while let Some(start) = rest.find("![") {
        let Some(alt_end) = rest[start + 2..].find(']').map(|i| start + 2 + i) else {
            break;
        };
        // The target must follow the alt text's own closing bracket
        if !rest[alt_end + 1..].starts_with('(') {
            output.push_str(&rest[..alt_end + 1]);
            rest = &rest[alt_end + 1..];
            continue;
        }
        let target_start = alt_end + 2;
        let Some(target_end) = rest[target_start..].find(')').map(|i| target_start + i) else {
            break;
        };

        // Keep an optional title: ![alt](uri "title")
        let target = &rest[target_start..target_end];
        let (uri, title) = match target.split_once(' ') {
            Some((uri, title)) => (uri, Some(title)),
            None => (target, None),
        };

        output.push_str(&rest[..target_start]);
        output.push_str(&transform_image_uri(uri, image_prefix));
        if let Some(title) = title {
            output.push(' ');
            output.push_str(title);
        }
        output.push(')');
        rest = &rest[target_end + 1..];
    }

    output.push_str(rest);
    output
}

/// Docs tab state for a page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpPanel {
    pub doc_url: Option<String>,
    /// Markdown with image links resolved; `None` when loading failed
    pub content: Option<String>,
}

impl HelpPanel {
    /// The tab is hidden when the page has no documentation
    pub fn is_hidden(&self) -> bool {
        self.doc_url.is_none()
    }
}

/// Resolve and fetch the documentation for `key`
///
/// Missing structure entries hide the panel; fetch failures are logged and
/// leave the panel empty.
pub async fn load_help_panel(
    source: &dyn DocumentationSource,
    structure: &DocStructure,
    key: &str,
    image_prefix: Option<&str>,
) -> HelpPanel {
    let Some(doc_url) = structure.get(key) else {
        tracing::debug!(key = %key, "No documentation mapped for key");
        return HelpPanel::default();
    };

    let content = match source.raw_document(doc_url).await {
        Ok(markdown) => Some(rewrite_image_links(&markdown, image_prefix)),
        Err(error) => {
            tracing::warn!(doc_url = %doc_url, error = %error, "Failed to load documentation");
            None
        }
    };

    HelpPanel {
        doc_url: Some(doc_url.to_string()),
        content,
    }
}
