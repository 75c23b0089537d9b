//! Identity provider edit page

pub mod models;

use serde::Serialize;

pub use models::{IdentityProvider, IdentityProviderPatchOperation, IdentityProviderUpdate};

use crate::alerts::Alert;
use crate::directory::IdentityProviderStore;
use crate::docs::{
    load_help_panel, DocStructure, DocumentationSource, HelpPanel, IDP_EDIT_OVERVIEW_DOCS_KEY,
};

/// Listing the edit page navigates back to
pub const IDENTITY_PROVIDERS_PATH: &str = "/identity-providers";

/// Everything the edit page renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProviderPage {
    /// Empty provider when loading failed
    pub identity_provider: IdentityProvider,
    pub help_panel: HelpPanel,
    pub alert: Option<Alert>,
    pub back_path: String,
}

/// Load the provider and its help panel concurrently
pub async fn load_page<S>(
    store: &S,
    docs: &dyn DocumentationSource,
    structure: &DocStructure,
    image_prefix: Option<&str>,
    id: &str,
) -> IdentityProviderPage
where
    S: IdentityProviderStore + ?Sized,
{
    let (identity_provider, help_panel) = tokio::join!(
        store.identity_provider(id),
        load_help_panel(docs, structure, IDP_EDIT_OVERVIEW_DOCS_KEY, image_prefix)
    );

    let (identity_provider, alert) = match identity_provider {
        Ok(idp) => (idp, None),
        Err(error) => {
            tracing::error!(id = %id, error = %error, "Failed to load identity provider");
            let alert = Alert::from_directory_error(
                &error,
                "Retrieval error",
                "An error occurred while retrieving the identity provider details.",
            );
            (IdentityProvider::default(), Some(alert))
        }
    };

    IdentityProviderPage {
        identity_provider,
        help_panel,
        alert,
        back_path: IDENTITY_PROVIDERS_PATH.to_string(),
    }
}
