//! Data loading shared by the HTML and JSON handlers

use chrono::Utc;
use serde::Serialize;

use crate::directory::{
    Directory, DirectoryResult, ProfileStore, RoleDirectory, SchemaProvider,
};
use crate::profile::{FlatProfileView, FormField, ProfileSchema, SchemaDescriptor};
use crate::roles::{placeholder, ListPlaceholder, RoleKind, RoleListItem};

/// A user's profile projected onto the current schema
#[derive(Debug, Clone)]
pub struct ProfileScreen {
    pub user_id: String,
    pub user_name: String,
    pub schema: ProfileSchema,
    pub view: FlatProfileView,
}

impl ProfileScreen {
    pub fn fields(&self) -> Vec<FormField> {
        self.schema.form_fields(&self.view)
    }

    pub fn profile_url(&self) -> Option<String> {
        self.schema.profile_url(&self.view)
    }
}

/// Fetch schema and profile together and project
pub async fn load_profile_screen(
    directory: &dyn Directory,
    user_id: &str,
) -> DirectoryResult<ProfileScreen> {
    let (descriptors, profile) = tokio::try_join!(
        directory.profile_schemas(),
        directory.fetch_profile(user_id)
    )?;

    let schema = ProfileSchema::new(descriptors);
    let view = schema.project(&profile);

    tracing::debug!(
        user_id = %user_id,
        descriptors = schema.descriptors().len(),
        projected = view.len(),
        "Projected user profile"
    );

    Ok(ProfileScreen {
        user_id: user_id.to_string(),
        user_name: profile.user_name().unwrap_or_default(),
        schema,
        view,
    })
}

/// JSON shape of a profile screen
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: String,
    pub user_name: String,
    pub profile_url: Option<String>,
    pub schemas: Vec<SchemaDescriptor>,
    pub values: FlatProfileView,
    pub fields: Vec<FormField>,
}

impl From<ProfileScreen> for ProfileResponse {
    fn from(screen: ProfileScreen) -> Self {
        Self {
            profile_url: screen.profile_url(),
            fields: screen.fields(),
            schemas: screen.schema.descriptors().to_vec(),
            user_id: screen.user_id,
            user_name: screen.user_name,
            values: screen.view,
        }
    }
}

/// Rows or placeholder for a role/group listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleListing {
    pub kind: RoleKind,
    pub search: Option<String>,
    pub items: Vec<RoleListItem>,
    pub placeholder: Option<ListPlaceholder>,
}

pub async fn load_role_listing(
    directory: &dyn Directory,
    kind: RoleKind,
    search: Option<String>,
) -> DirectoryResult<RoleListing> {
    let search = search.map(|q| q.trim().to_string()).filter(|q| !q.is_empty());
    let roles = directory.list_roles(kind, search.as_deref()).await?;
    let now = Utc::now();

    Ok(RoleListing {
        kind,
        placeholder: placeholder(kind, &roles, search.as_deref()),
        items: roles
            .iter()
            .map(|role| RoleListItem::new(kind, role, now))
            .collect(),
        search,
    })
}
