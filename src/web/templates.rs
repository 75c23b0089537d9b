use askama::Template;

use crate::alerts::Alert;
use crate::confirm::DeleteConfirmation;
use crate::idp::IdentityProviderPage;
use crate::profile::{FieldError, FormField};
use crate::roles::{ListPlaceholder, RoleKind, RoleListItem};

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub user_id: String,
    pub user_name: String,
    pub profile_url: Option<String>,
    pub fields: Vec<FormField>,
    pub errors: Vec<FieldError>,
    pub alert: Option<Alert>,
    pub confirmation: DeleteConfirmation,
}

/// Placeholder copy resolved for rendering
pub struct PlaceholderView {
    pub title: String,
    pub subtitles: Vec<String>,
    pub action: String,
    /// Only clearing a search links anywhere; role creation lives outside the console
    pub action_href: Option<String>,
}

impl PlaceholderView {
    pub fn new(placeholder: &ListPlaceholder, base_path: &str) -> Self {
        let action_href = match placeholder {
            ListPlaceholder::NoSearchResults { .. } => Some(base_path.to_string()),
            ListPlaceholder::Empty { .. } => None,
        };
        Self {
            title: placeholder.title(),
            subtitles: placeholder.subtitles(),
            action: placeholder.action(),
            action_href,
        }
    }
}

pub struct RoleRow {
    pub item: RoleListItem,
    pub confirmation: DeleteConfirmation,
}

#[derive(Template)]
#[template(path = "roles.html")]
pub struct RoleListTemplate {
    pub title: String,
    pub kind_title: &'static str,
    pub base_path: String,
    pub search: String,
    pub rows: Vec<RoleRow>,
    pub placeholder: Option<PlaceholderView>,
    pub alert: Option<Alert>,
}

impl RoleListTemplate {
    pub fn title_for(kind: RoleKind) -> String {
        match kind {
            RoleKind::Role => "Roles".to_string(),
            RoleKind::Group => "Groups".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "identity_provider.html")]
pub struct IdentityProviderTemplate {
    pub page: IdentityProviderPage,
    pub alert: Option<Alert>,
    pub errors: Vec<FieldError>,
    pub confirmation: DeleteConfirmation,
}

impl IdentityProviderTemplate {
    pub fn new(page: IdentityProviderPage, errors: Vec<FieldError>) -> Self {
        Self {
            alert: page.alert.clone(),
            confirmation: DeleteConfirmation::for_identity_provider(&page.identity_provider.name),
            page,
            errors,
        }
    }

    /// Image field value; empty when the provider has no logo
    pub fn image_value(&self) -> &str {
        self.page.identity_provider.image.as_deref().unwrap_or_default()
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub alert: Option<Alert>,
}
