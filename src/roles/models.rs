use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a listing shows roles or groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleKind {
    Role,
    Group,
}

impl RoleKind {
    /// SCIM resource collection name
    pub fn resource(&self) -> &'static str {
        match self {
            RoleKind::Role => "Roles",
            RoleKind::Group => "Groups",
        }
    }

    /// Lower-case noun used in UI copy
    pub fn noun(&self) -> &'static str {
        match self {
            RoleKind::Role => "role",
            RoleKind::Group => "group",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            RoleKind::Role => "roles",
            RoleKind::Group => "groups",
        }
    }

    /// Capitalised noun for buttons and titles
    pub fn title(&self) -> &'static str {
        match self {
            RoleKind::Role => "Role",
            RoleKind::Group => "Group",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleMeta {
    /// RFC 3339 creation timestamp
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// A role or group as listed by the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub meta: RoleMeta,
}

impl Role {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            meta: RoleMeta::default(),
        }
    }

    pub fn created_at(mut self, created: impl Into<String>) -> Self {
        self.meta.created = Some(created.into());
        self
    }
}
