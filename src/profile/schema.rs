//! Profile schema descriptors
//!
//! The directory publishes its user schema as nested SCIM attributes. The
//! console works with a flat list of [`SchemaDescriptor`]s whose names are
//! dotted paths (`userName`, `name.givenName`, `phoneNumbers.mobile`).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Schema names that are shown but never written back to the directory
pub const EXCLUDED_FROM_PATCH: &[&str] = &["roles.default"];

/// Name of the attribute holding the profile image URL
pub const PROFILE_URL_ATTRIBUTE: &str = "profileUrl";

/// Whether a descriptor takes part in profile patches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatchPolicy {
    #[default]
    Include,
    Excluded,
}

/// How a dotted schema name resolves against a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributePath {
    /// `emails`: plain strings or `{value}` entries
    Emails,
    /// Any other single-segment name, copied as-is
    Simple(String),
    /// `name.<sub>`: member of the complex `name` attribute
    Name(String),
    /// `<attribute>.<type>`: entry of a multi-valued attribute selected by `type`
    MultiValued { attribute: String, tag: String },
}

impl AttributePath {
    /// Parse a schema name; segments past the second are ignored
    pub fn parse(name: &str) -> Self {
        let mut segments = name.split('.');
        let first = segments.next().unwrap_or_default();

        match segments.next() {
            None if first == "emails" => AttributePath::Emails,
            None => AttributePath::Simple(first.to_string()),
            Some(sub) if first == "name" => AttributePath::Name(sub.to_string()),
            Some(tag) => AttributePath::MultiValued {
                attribute: first.to_string(),
                tag: tag.to_string(),
            },
        }
    }
}

/// One editable profile attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDescriptor {
    /// Dotted attribute path
    pub name: String,
    pub display_name: String,
    pub required: bool,
    /// Ascending sort key; `None` sorts first
    pub display_order: Option<u32>,
    pub patch_policy: PatchPolicy,
}

impl SchemaDescriptor {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        let name = name.into();
        let patch_policy = if EXCLUDED_FROM_PATCH.contains(&name.as_str()) {
            PatchPolicy::Excluded
        } else {
            PatchPolicy::Include
        };

        Self {
            name,
            display_name: display_name.into(),
            required: false,
            display_order: None,
            patch_policy,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_display_order(mut self, order: u32) -> Self {
        self.display_order = Some(order);
        self
    }

    pub fn path(&self) -> AttributePath {
        AttributePath::parse(&self.name)
    }

    pub fn is_patchable(&self) -> bool {
        self.patch_policy == PatchPolicy::Include
    }
}

/// Raw SCIM schema attribute as published by the directory
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaAttribute {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, deserialize_with = "deserialize_display_order")]
    pub display_order: Option<u32>,
    #[serde(default)]
    pub sub_attributes: Vec<SchemaAttribute>,
}

impl SchemaAttribute {
    fn to_descriptor(&self, name: String) -> SchemaDescriptor {
        let display_name = self
            .display_name
            .clone()
            .unwrap_or_else(|| self.name.clone());
        let mut descriptor = SchemaDescriptor::new(name, display_name).required(self.required);
        descriptor.display_order = self.display_order;
        descriptor
    }
}

/// Display order arrives as a numeric string or a number; blank and zero count as unset
fn deserialize_display_order<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let order = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        Some(Value::Number(n)) => n.as_u64().filter(|n| *n > 0).and_then(|n| u32::try_from(n).ok()),
        _ => None,
    };
    Ok(order)
}

/// Flatten nested attributes into dotted descriptors
///
/// Complex attributes contribute one descriptor per sub-attribute
/// (`name.givenName`); the parent itself is not editable.
pub fn flatten_schemas(attributes: &[SchemaAttribute]) -> Vec<SchemaDescriptor> {
    attributes
        .iter()
        .flat_map(|attribute| {
            if attribute.sub_attributes.is_empty() {
                vec![attribute.to_descriptor(attribute.name.clone())]
            } else {
                attribute
                    .sub_attributes
                    .iter()
                    .map(|sub| sub.to_descriptor(format!("{}.{}", attribute.name, sub.name)))
                    .collect()
            }
        })
        .collect()
}

/// Stable ascending sort by display order, unordered descriptors first
pub fn sort_by_display_order(mut descriptors: Vec<SchemaDescriptor>) -> Vec<SchemaDescriptor> {
    descriptors.sort_by_key(|d| (d.display_order.is_some(), d.display_order));
    descriptors
}

/// Look up a descriptor by its dotted name
pub fn find<'a>(descriptors: &'a [SchemaDescriptor], name: &str) -> Option<&'a SchemaDescriptor> {
    descriptors.iter().find(|d| d.name == name)
}
