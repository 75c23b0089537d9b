//! Identity directory access
//!
//! The console never talks to the backend directly: handlers receive the
//! directory through these traits, injected via `AppState`.
//!
//! - `scim`: SCIM 2.0 / REST implementation over HTTP
//! - `memory`: in-process implementation for local development and tests

pub mod memory;
pub mod scim;

use async_trait::async_trait;
use std::fmt;

use crate::idp::{IdentityProvider, IdentityProviderUpdate};
use crate::profile::{PatchRequest, ProfileRecord, SchemaDescriptor};
use crate::roles::{Role, RoleKind};

pub use memory::InMemoryDirectory;
pub use scim::ScimDirectory;

/// Failure talking to the directory
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryError {
    /// The resource does not exist
    NotFound(String),
    /// The directory answered with an error status
    Rejected {
        status: u16,
        /// Server-supplied explanation, when the body carried one
        description: Option<String>,
    },
    /// Connection, timeout, or URL failure
    Transport(String),
    /// The response body did not have the expected shape
    Decode(String),
}

impl DirectoryError {
    /// The explanation the directory itself gave, if any
    pub fn server_description(&self) -> Option<&str> {
        match self {
            DirectoryError::Rejected {
                description: Some(description),
                ..
            } => Some(description),
            _ => None,
        }
    }
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryError::NotFound(resource) => write!(f, "{} not found", resource),
            DirectoryError::Rejected {
                status,
                description: Some(description),
            } => write!(f, "directory rejected request ({}): {}", status, description),
            DirectoryError::Rejected {
                status,
                description: None,
            } => write!(f, "directory rejected request ({})", status),
            DirectoryError::Transport(msg) => write!(f, "directory unreachable: {}", msg),
            DirectoryError::Decode(msg) => write!(f, "unexpected directory response: {}", msg),
        }
    }
}

impl std::error::Error for DirectoryError {}

impl From<reqwest::Error> for DirectoryError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            DirectoryError::Decode(error.to_string())
        } else {
            DirectoryError::Transport(error.to_string())
        }
    }
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Supplies the user profile schema
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    /// Flattened descriptors, in the order the directory publishes them
    async fn profile_schemas(&self) -> DirectoryResult<Vec<SchemaDescriptor>>;
}

/// Reads and updates user profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn fetch_profile(&self, user_id: &str) -> DirectoryResult<ProfileRecord>;
    async fn apply_patch(&self, user_id: &str, patch: &PatchRequest) -> DirectoryResult<()>;
    async fn delete_user(&self, user_id: &str) -> DirectoryResult<()>;
}

/// Lists and deletes roles and groups
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// List roles or groups, optionally filtered by display name
    async fn list_roles(&self, kind: RoleKind, search: Option<&str>) -> DirectoryResult<Vec<Role>>;
    async fn delete_role(&self, kind: RoleKind, id: &str) -> DirectoryResult<()>;
}

/// Reads identity provider configurations
#[async_trait]
pub trait IdentityProviderStore: Send + Sync {
    async fn identity_provider(&self, id: &str) -> DirectoryResult<IdentityProvider>;
    async fn update_identity_provider(
        &self,
        id: &str,
        update: &IdentityProviderUpdate,
    ) -> DirectoryResult<()>;
    async fn delete_identity_provider(&self, id: &str) -> DirectoryResult<()>;
}

/// Everything the console needs from the backend
pub trait Directory: SchemaProvider + ProfileStore + RoleDirectory + IdentityProviderStore {}

impl<T> Directory for T where T: SchemaProvider + ProfileStore + RoleDirectory + IdentityProviderStore
{}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_description_only_for_rejections() {
        let rejected = DirectoryError::Rejected {
            status: 400,
            description: Some("Invalid filter".to_string()),
        };
        assert_eq!(rejected.server_description(), Some("Invalid filter"));
        assert_eq!(
            rejected.to_string(),
            "directory rejected request (400): Invalid filter"
        );

        let missing = DirectoryError::NotFound("user u-1".to_string());
        assert_eq!(missing.server_description(), None);
        assert_eq!(missing.to_string(), "user u-1 not found");
    }
}
