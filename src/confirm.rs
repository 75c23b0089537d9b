//! Typed-assertion delete confirmations
//!
//! Destructive actions require the operator to type the resource's name.

use serde::Serialize;

use crate::roles::RoleKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteConfirmation {
    /// Text the operator must type
    pub assertion: String,
    pub header: String,
    pub message: String,
    pub content: String,
}

impl DeleteConfirmation {
    pub fn for_role(kind: RoleKind, display_name: &str) -> Self {
        Self {
            assertion: display_name.to_string(),
            header: "Are you sure?".to_string(),
            message: format!(
                "This action is irreversible and will permanently delete the selected {}.",
                kind.noun()
            ),
            content: format!(
                "If you delete this {}, the permissions attached to it will be deleted and the \
                 users attached to it will no longer be able to perform intended actions which \
                 were previously allowed. Please proceed with caution.",
                kind.noun()
            ),
        }
    }

    pub fn for_user(user_name: &str) -> Self {
        Self {
            assertion: user_name.to_string(),
            header: "Are you sure?".to_string(),
            message: "This action is irreversible and will permanently delete the user."
                .to_string(),
            content: "If you delete this user, the user will not be able to log in to the \
                      console or any other application the user was subscribed to. Please \
                      proceed with caution."
                .to_string(),
        }
    }

    pub fn for_identity_provider(name: &str) -> Self {
        Self {
            assertion: name.to_string(),
            header: "Are you sure?".to_string(),
            message: "This action is irreversible and will permanently delete the identity \
                      provider."
                .to_string(),
            content: "If you delete this identity provider, users will no longer be able to \
                      sign in with it. Please proceed with caution."
                .to_string(),
        }
    }

    pub fn hint(&self) -> String {
        format!("Please type {} to confirm.", self.assertion)
    }

    /// Exact match; no trimming or case folding
    pub fn is_confirmed_by(&self, typed: &str) -> bool {
        !self.assertion.is_empty() && typed == self.assertion
    }
}
