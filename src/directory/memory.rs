//! In-process directory
//!
//! Backs the console when `DIRECTORY_BACKEND=memory` and drives the router
//! tests. Patches are applied the way a SCIM server applies `replace` with a
//! value object: each member overwrites the attribute, except `name`, whose
//! sub-attributes are merged.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{
    DirectoryError, DirectoryResult, IdentityProviderStore, ProfileStore, RoleDirectory,
    SchemaProvider,
};
use crate::idp::{IdentityProvider, IdentityProviderUpdate};
use crate::profile::{PatchRequest, ProfileRecord, ProfileValue, SchemaDescriptor};
use crate::roles::{Role, RoleKind};

#[derive(Default)]
struct DirectoryData {
    schemas: Vec<SchemaDescriptor>,
    users: HashMap<String, ProfileRecord>,
    roles: Vec<Role>,
    groups: Vec<Role>,
    identity_providers: HashMap<String, IdentityProvider>,
    /// Every patch received, per user, oldest first
    patches: HashMap<String, Vec<PatchRequest>>,
}

impl DirectoryData {
    fn listing(&self, kind: RoleKind) -> &Vec<Role> {
        match kind {
            RoleKind::Role => &self.roles,
            RoleKind::Group => &self.groups,
        }
    }

    fn listing_mut(&mut self, kind: RoleKind) -> &mut Vec<Role> {
        match kind {
            RoleKind::Role => &mut self.roles,
            RoleKind::Group => &mut self.groups,
        }
    }
}

#[derive(Default)]
pub struct InMemoryDirectory {
    data: RwLock<DirectoryData>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schemas(mut self, schemas: Vec<SchemaDescriptor>) -> Self {
        self.data.get_mut().schemas = schemas;
        self
    }

    /// Add a user; records without an `id` are ignored
    pub fn with_user(mut self, profile: ProfileRecord) -> Self {
        if let Some(id) = profile.id() {
            self.data.get_mut().users.insert(id, profile);
        }
        self
    }

    pub fn with_role(mut self, kind: RoleKind, role: Role) -> Self {
        self.data.get_mut().listing_mut(kind).push(role);
        self
    }

    pub fn with_identity_provider(mut self, idp: IdentityProvider) -> Self {
        self.data
            .get_mut()
            .identity_providers
            .insert(idp.id.clone(), idp);
        self
    }

    /// Patches received for a user, oldest first
    pub async fn patches_for(&self, user_id: &str) -> Vec<PatchRequest> {
        self.data
            .read()
            .await
            .patches
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// A small directory for running the console without a backend
    pub fn sample() -> Self {
        let schemas = vec![
            SchemaDescriptor::new("userName", "Username")
                .required(true)
                .with_display_order(1),
            SchemaDescriptor::new("name.givenName", "First Name").with_display_order(2),
            SchemaDescriptor::new("name.familyName", "Last Name").with_display_order(3),
            SchemaDescriptor::new("emails", "Email").with_display_order(4),
            SchemaDescriptor::new("phoneNumbers.mobile", "Mobile").with_display_order(5),
            SchemaDescriptor::new("profileUrl", "Profile URL").with_display_order(6),
            SchemaDescriptor::new("roles.default", "Roles").with_display_order(7),
        ];

        let alice = serde_json::json!({
            "id": "alice",
            "userName": "PRIMARY/alice",
            "name": { "givenName": "Alice", "familyName": "Liddell" },
            "emails": [{ "value": "alice@example.com", "primary": true }],
            "phoneNumbers": [{ "type": "mobile", "value": "+1 555 0100" }],
            "roles": [{ "type": "default", "value": "Internal/everyone" }]
        });

        let mut directory = Self::new()
            .with_schemas(schemas)
            .with_role(
                RoleKind::Role,
                Role::new("r-admin", "Internal/admin").created_at("2020-03-01T10:00:00Z"),
            )
            .with_role(
                RoleKind::Role,
                Role::new("r-app", "Application/console").created_at("2020-03-02T10:00:00Z"),
            )
            .with_role(
                RoleKind::Group,
                Role::new("g-eng", "engineering").created_at("2020-04-01T10:00:00Z"),
            )
            .with_role(
                RoleKind::Group,
                Role::new("g-ldap", "LDAP/support").created_at("2020-04-02T10:00:00Z"),
            )
            .with_identity_provider(IdentityProvider {
                id: "google".to_string(),
                name: "Google".to_string(),
                description: "Sign in with Google accounts".to_string(),
                is_enabled: true,
                ..IdentityProvider::default()
            });

        if let Ok(profile) = ProfileRecord::try_from(alice) {
            directory = directory.with_user(profile);
        }
        directory
    }
}

/// Apply `replace` operations to a stored profile
fn apply_operations(profile: &mut ProfileRecord, patch: &PatchRequest) {
    let attributes = profile.attributes_mut();

    for operation in &patch.operations {
        for (attribute, value) in &operation.value {
            let incoming = ProfileValue::from(value);

            if attribute == "name" {
                if let (Some(ProfileValue::Object(existing)), ProfileValue::Object(members)) =
                    (attributes.get_mut(attribute), &incoming)
                {
                    existing.extend(members.clone());
                    continue;
                }
            }
            attributes.insert(attribute.clone(), incoming);
        }
    }
}

fn matches_search(role: &Role, search: Option<&str>) -> bool {
    match search.map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => role
            .display_name
            .to_lowercase()
            .contains(&query.to_lowercase()),
        None => true,
    }
}

#[async_trait]
impl SchemaProvider for InMemoryDirectory {
    async fn profile_schemas(&self) -> DirectoryResult<Vec<SchemaDescriptor>> {
        Ok(self.data.read().await.schemas.clone())
    }
}

#[async_trait]
impl ProfileStore for InMemoryDirectory {
    async fn fetch_profile(&self, user_id: &str) -> DirectoryResult<ProfileRecord> {
        self.data
            .read()
            .await
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("user {}", user_id)))
    }

    async fn apply_patch(&self, user_id: &str, patch: &PatchRequest) -> DirectoryResult<()> {
        let mut data = self.data.write().await;
        let profile = data
            .users
            .get_mut(user_id)
            .ok_or_else(|| DirectoryError::NotFound(format!("user {}", user_id)))?;
        apply_operations(profile, patch);

        data.patches
            .entry(user_id.to_string())
            .or_default()
            .push(patch.clone());
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> DirectoryResult<()> {
        self.data
            .write()
            .await
            .users
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| DirectoryError::NotFound(format!("user {}", user_id)))
    }
}

#[async_trait]
impl RoleDirectory for InMemoryDirectory {
    async fn list_roles(&self, kind: RoleKind, search: Option<&str>) -> DirectoryResult<Vec<Role>> {
        Ok(self
            .data
            .read()
            .await
            .listing(kind)
            .iter()
            .filter(|role| matches_search(role, search))
            .cloned()
            .collect())
    }

    async fn delete_role(&self, kind: RoleKind, id: &str) -> DirectoryResult<()> {
        let mut data = self.data.write().await;
        let listing = data.listing_mut(kind);
        let before = listing.len();
        listing.retain(|role| role.id != id);

        if listing.len() == before {
            return Err(DirectoryError::NotFound(format!("{} {}", kind, id)));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProviderStore for InMemoryDirectory {
    async fn identity_provider(&self, id: &str) -> DirectoryResult<IdentityProvider> {
        self.data
            .read()
            .await
            .identity_providers
            .get(id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("identity provider {}", id)))
    }

    async fn update_identity_provider(
        &self,
        id: &str,
        update: &IdentityProviderUpdate,
    ) -> DirectoryResult<()> {
        let mut data = self.data.write().await;
        let idp = data
            .identity_providers
            .get_mut(id)
            .ok_or_else(|| DirectoryError::NotFound(format!("identity provider {}", id)))?;
        update.apply_to(idp);
        Ok(())
    }

    async fn delete_identity_provider(&self, id: &str) -> DirectoryResult<()> {
        self.data
            .write()
            .await
            .identity_providers
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DirectoryError::NotFound(format!("identity provider {}", id)))
    }
}
