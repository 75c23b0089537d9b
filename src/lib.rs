//! Identity management console library
//!
//! Schema-driven user profile editing, role and group management, and
//! identity provider pages over a SCIM directory.

#![deny(dead_code)]

pub mod alerts;
pub mod config;
pub mod confirm;
pub mod directory;
pub mod docs;
pub mod idp;
pub mod profile;
pub mod roles;
pub mod web;

use config::Config;
use directory::Directory;
use docs::DocumentationSource;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn Directory>,
    /// Raw documentation for help panels
    pub docs: Arc<dyn DocumentationSource>,
    pub config: Arc<Config>,
}
