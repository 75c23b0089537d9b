//! User-facing notifications
//!
//! Every directory call on a page ends in an [`Alert`]: success copy, or an
//! error whose description is the directory's own explanation when it sent
//! one and a generic sentence otherwise.

use serde::Serialize;

use crate::directory::DirectoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl AlertLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            AlertLevel::Success => "alert-success",
            AlertLevel::Error => "alert-error",
            AlertLevel::Warning => "alert-warning",
            AlertLevel::Info => "alert-info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub description: String,
}

impl Alert {
    pub fn success(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Success,
            message: message.into(),
            description: description.into(),
        }
    }

    pub fn error(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Error,
            message: message.into(),
            description: description.into(),
        }
    }

    pub fn warning(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Warning,
            message: message.into(),
            description: description.into(),
        }
    }

    /// Error alert preferring the directory's own description
    pub fn from_directory_error(
        error: &DirectoryError,
        message: &str,
        generic_description: &str,
    ) -> Self {
        let description = error
            .server_description()
            .map(str::to_string)
            .unwrap_or_else(|| generic_description.to_string());
        Self::error(message, description)
    }
}
