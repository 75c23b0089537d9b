//! User profile mapping
//!
//! ## Structure
//!
//! - `schema`: schema descriptors, flattening and display ordering
//! - `value`: typed profile values and the flat per-field view
//! - `mapper`: profile → flat view projection and flat view → patch
//! - `patch`: SCIM PatchOp message
//! - `form`: form fields and submitted-form parsing

pub mod form;
pub mod mapper;
pub mod patch;
pub mod schema;
pub mod value;

pub use form::{
    edited_values, field_label, form_fields, required_field_error, FieldError, FormField,
};
pub use mapper::{build_patch, project};
pub use patch::{PatchOp, PatchOperation, PatchRequest, PATCH_OP_SCHEMA};
pub use schema::{
    flatten_schemas, sort_by_display_order, AttributePath, PatchPolicy, SchemaAttribute,
    SchemaDescriptor, PROFILE_URL_ATTRIBUTE,
};
pub use value::{FlatProfileView, ProfileRecord, ProfileValue, Scalar, TaggedValue};

/// Display-ordered schema for one profile screen
#[derive(Debug, Clone, Default)]
pub struct ProfileSchema {
    descriptors: Vec<SchemaDescriptor>,
}

impl ProfileSchema {
    /// Sort descriptors by display order
    pub fn new(descriptors: Vec<SchemaDescriptor>) -> Self {
        Self {
            descriptors: sort_by_display_order(descriptors),
        }
    }

    pub fn descriptors(&self) -> &[SchemaDescriptor] {
        &self.descriptors
    }

    pub fn project(&self, profile: &ProfileRecord) -> FlatProfileView {
        project(&self.descriptors, profile)
    }

    pub fn build_patch(&self, edited: &FlatProfileView) -> PatchRequest {
        build_patch(&self.descriptors, edited)
    }

    pub fn form_fields(&self, view: &FlatProfileView) -> Vec<FormField> {
        form_fields(&self.descriptors, view)
    }

    /// The profile image URL, if the schema has one and the profile sets it
    pub fn profile_url(&self, view: &FlatProfileView) -> Option<String> {
        schema::find(&self.descriptors, PROFILE_URL_ATTRIBUTE)
            .and_then(|descriptor| view.get(&descriptor.name))
            .filter(|value| value.is_truthy())
            .map(ProfileValue::display_text)
    }
}
