//! Role and group management screens

pub mod listing;
pub mod models;

pub use listing::{
    header_content, placeholder, HeaderLabel, ListHeader, ListPlaceholder, RoleListItem,
};
pub use models::{Role, RoleKind, RoleMeta};
