//! Editable form model for the user profile screen

use serde::Serialize;
use std::collections::HashMap;

use super::schema::{SchemaDescriptor, PROFILE_URL_ATTRIBUTE};
use super::value::{FlatProfileView, ProfileValue};

/// Suffix of the hidden input carrying a user-store domain prefix
pub const DOMAIN_FIELD_SUFFIX: &str = "__domain";

const USER_NAME_ATTRIBUTE: &str = "userName";

/// One rendered input
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub name: String,
    pub label: String,
    /// i18n key: the schema name with `.` replaced by `_`
    pub translation_key: String,
    pub required: bool,
    pub placeholder: String,
    pub required_message: String,
    pub value: String,
    /// User-store domain shown before the input (`PRIMARY / alice`)
    pub domain: Option<String>,
}

impl FormField {
    pub fn domain_field_name(&self) -> String {
        format!("{}{}", self.name, DOMAIN_FIELD_SUFFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub name: String,
    pub message: String,
}

/// Label shown for a descriptor; falls back to the attribute name
pub fn field_label(descriptor: &SchemaDescriptor) -> String {
    if descriptor.name == PROFILE_URL_ATTRIBUTE {
        "Profile Image URL".to_string()
    } else if descriptor.display_name.is_empty() {
        descriptor.name.clone()
    } else {
        descriptor.display_name.clone()
    }
}

/// Error reported for a required field left blank
pub fn required_field_error(descriptor: &SchemaDescriptor) -> FieldError {
    FieldError {
        name: descriptor.name.clone(),
        message: format!("{} is required", field_label(descriptor)),
    }
}

/// Split `DOMAIN/name` into its parts
fn split_domain(value: &str) -> Option<(&str, &str)> {
    let mut parts = value.split('/');
    let domain = parts.next()?;
    let name = parts.next()?;
    Some((domain, name))
}

/// Build the inputs for every patchable descriptor, in descriptor order
pub fn form_fields(descriptors: &[SchemaDescriptor], view: &FlatProfileView) -> Vec<FormField> {
    descriptors
        .iter()
        .filter(|descriptor| descriptor.is_patchable())
        .map(|descriptor| {
            let label = field_label(descriptor);
            let raw = view
                .get(&descriptor.name)
                .map(ProfileValue::display_text)
                .unwrap_or_default();

            let (domain, value) = if descriptor.name == USER_NAME_ATTRIBUTE {
                match split_domain(&raw) {
                    Some((domain, name)) => (Some(domain.to_string()), name.to_string()),
                    None => (None, raw),
                }
            } else {
                (None, raw)
            };

            FormField {
                name: descriptor.name.clone(),
                translation_key: descriptor.name.replace('.', "_"),
                required: descriptor.required,
                placeholder: format!("Enter your {}", label),
                required_message: format!("{} is required", label),
                label,
                value,
                domain,
            }
        })
        .collect()
}

/// Turn a submitted form into edited values
///
/// Only fields that were submitted are returned. Required fields submitted
/// blank are reported instead.
pub fn edited_values(
    descriptors: &[SchemaDescriptor],
    submitted: &HashMap<String, String>,
) -> Result<FlatProfileView, Vec<FieldError>> {
    let mut view = FlatProfileView::new();
    let mut errors = Vec::new();

    for descriptor in descriptors.iter().filter(|d| d.is_patchable()) {
        let Some(value) = submitted.get(&descriptor.name) else {
            continue;
        };
        let value = value.trim();

        if descriptor.required && value.is_empty() {
            errors.push(required_field_error(descriptor));
            continue;
        }

        let domain = submitted
            .get(&format!("{}{}", descriptor.name, DOMAIN_FIELD_SUFFIX))
            .filter(|domain| !domain.is_empty());

        let value = match domain {
            Some(domain) => format!("{}/{}", domain, value),
            None => value.to_string(),
        };
        view.insert(descriptor.name.clone(), ProfileValue::string(value));
    }

    if errors.is_empty() {
        Ok(view)
    } else {
        Err(errors)
    }
}
