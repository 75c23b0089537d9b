//! SCIM 2.0 directory client
//!
//! Users, roles, groups and schemas are read from the SCIM endpoint; identity
//! providers from the server management API.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::{
    DirectoryError, DirectoryResult, IdentityProviderStore, ProfileStore, RoleDirectory,
    SchemaProvider,
};
use crate::idp::{IdentityProvider, IdentityProviderUpdate};
use crate::profile::{flatten_schemas, PatchRequest, ProfileRecord, SchemaAttribute, SchemaDescriptor};
use crate::roles::{Role, RoleKind};

const SCIM_CONTENT_TYPE: &str = "application/scim+json";

/// SCIM list envelope
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(rename = "Resources", default = "Vec::new")]
    resources: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SchemaResource {
    #[serde(default)]
    attributes: Vec<SchemaAttribute>,
}

/// `/Schemas` is served either as a bare array or as a list envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SchemasResponse {
    Bare(Vec<SchemaResource>),
    Listed(ListResponse<SchemaResource>),
}

impl SchemasResponse {
    fn into_resources(self) -> Vec<SchemaResource> {
        match self {
            SchemasResponse::Bare(resources) => resources,
            SchemasResponse::Listed(list) => list.resources,
        }
    }
}

/// Error body; SCIM uses `detail`, the management API `description`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Append path segments to a base URL, tolerating a trailing slash on the base
pub fn endpoint(base: &Url, segments: &[&str]) -> DirectoryResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| DirectoryError::Transport(format!("{} cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// SCIM `filter` expression matching display names containing `query`
pub fn display_name_filter(query: &str) -> String {
    let escaped = query.replace('\\', "\\\\").replace('"', "\\\"");
    format!("displayName co \"{}\"", escaped)
}

pub struct ScimDirectory {
    scim_base: Url,
    server_api_base: Url,
    api_token: Option<String>,
    client: reqwest::Client,
}

impl ScimDirectory {
    /// Create a directory client
    ///
    /// # Arguments
    /// * `scim_base` - SCIM 2.0 root (e.g. `https://idp.example.com/scim2`)
    /// * `server_api_base` - management API root serving `identity-providers`
    /// * `api_token` - bearer token sent with every request, if set
    /// * `connect_timeout_secs` - HTTP connect timeout
    /// * `request_timeout_secs` - HTTP request timeout
    pub fn new(
        scim_base: Url,
        server_api_base: Url,
        api_token: Option<String>,
        connect_timeout_secs: u64,
        request_timeout_secs: u64,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(request_timeout_secs))
            .build()?;

        tracing::info!(
            scim_base = %scim_base,
            server_api_base = %server_api_base,
            authenticated = api_token.is_some(),
            "SCIM directory client initialized"
        );

        Ok(Self {
            scim_base,
            server_api_base,
            api_token,
            client,
        })
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, resource: &str) -> DirectoryResult<T> {
        tracing::debug!(url = %url, "Fetching from directory");
        let response = self.request(reqwest::Method::GET, url).send().await?;
        let response = check_status(response, resource).await?;
        Ok(response.json().await?)
    }
}

/// Map non-success statuses to `DirectoryError`
async fn check_status(
    response: reqwest::Response,
    resource: &str,
) -> DirectoryResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(DirectoryError::NotFound(resource.to_string()));
    }

    let description = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.description.or(body.detail))
        .filter(|d| !d.is_empty());

    tracing::warn!(
        status = status.as_u16(),
        resource = %resource,
        description = ?description,
        "Directory rejected request"
    );

    Err(DirectoryError::Rejected {
        status: status.as_u16(),
        description,
    })
}

#[async_trait]
impl SchemaProvider for ScimDirectory {
    async fn profile_schemas(&self) -> DirectoryResult<Vec<SchemaDescriptor>> {
        let url = endpoint(&self.scim_base, &["Schemas"])?;
        let response: SchemasResponse = self.get_json(url, "schemas").await?;

        let descriptors: Vec<SchemaDescriptor> = response
            .into_resources()
            .iter()
            .flat_map(|resource| flatten_schemas(&resource.attributes))
            .collect();

        tracing::info!(count = descriptors.len(), "Profile schemas loaded");
        Ok(descriptors)
    }
}

#[async_trait]
impl ProfileStore for ScimDirectory {
    async fn fetch_profile(&self, user_id: &str) -> DirectoryResult<ProfileRecord> {
        let url = endpoint(&self.scim_base, &["Users", user_id])?;
        self.get_json(url, &format!("user {}", user_id)).await
    }

    async fn apply_patch(&self, user_id: &str, patch: &PatchRequest) -> DirectoryResult<()> {
        let url = endpoint(&self.scim_base, &["Users", user_id])?;
        let body = serde_json::to_vec(patch).map_err(|e| DirectoryError::Decode(e.to_string()))?;

        tracing::info!(
            user_id = %user_id,
            operations = patch.operations.len(),
            "Patching user profile"
        );

        let response = self
            .request(reqwest::Method::PATCH, url)
            .header(reqwest::header::CONTENT_TYPE, SCIM_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;
        check_status(response, &format!("user {}", user_id)).await?;
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> DirectoryResult<()> {
        let url = endpoint(&self.scim_base, &["Users", user_id])?;
        tracing::info!(user_id = %user_id, "Deleting user");

        let response = self.request(reqwest::Method::DELETE, url).send().await?;
        check_status(response, &format!("user {}", user_id)).await?;
        Ok(())
    }
}

#[async_trait]
impl RoleDirectory for ScimDirectory {
    async fn list_roles(&self, kind: RoleKind, search: Option<&str>) -> DirectoryResult<Vec<Role>> {
        let mut url = endpoint(&self.scim_base, &[kind.resource()])?;
        if let Some(query) = search.filter(|q| !q.trim().is_empty()) {
            let filter = urlencoding::encode(&display_name_filter(query.trim())).into_owned();
            url.set_query(Some(&format!("filter={}", filter)));
        }

        let list: ListResponse<Role> = self.get_json(url, kind.plural()).await?;
        tracing::debug!(kind = %kind, count = list.resources.len(), "Listed roles");
        Ok(list.resources)
    }

    async fn delete_role(&self, kind: RoleKind, id: &str) -> DirectoryResult<()> {
        let url = endpoint(&self.scim_base, &[kind.resource(), id])?;
        tracing::info!(kind = %kind, id = %id, "Deleting role");

        let response = self.request(reqwest::Method::DELETE, url).send().await?;
        check_status(response, &format!("{} {}", kind, id)).await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityProviderStore for ScimDirectory {
    async fn identity_provider(&self, id: &str) -> DirectoryResult<IdentityProvider> {
        let url = endpoint(&self.server_api_base, &["identity-providers", id])?;
        self.get_json(url, &format!("identity provider {}", id))
            .await
    }

    async fn update_identity_provider(
        &self,
        id: &str,
        update: &IdentityProviderUpdate,
    ) -> DirectoryResult<()> {
        let url = endpoint(&self.server_api_base, &["identity-providers", id])?;
        tracing::info!(id = %id, "Updating identity provider");

        let response = self
            .request(reqwest::Method::PATCH, url)
            .json(&update.operations())
            .send()
            .await?;
        check_status(response, &format!("identity provider {}", id)).await?;
        Ok(())
    }

    async fn delete_identity_provider(&self, id: &str) -> DirectoryResult<()> {
        let url = endpoint(&self.server_api_base, &["identity-providers", id])?;
        tracing::info!(id = %id, "Deleting identity provider");

        let response = self.request(reqwest::Method::DELETE, url).send().await?;
        check_status(response, &format!("identity provider {}", id)).await?;
        Ok(())
    }
}
