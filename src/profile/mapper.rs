//! Schema-driven mapping between profiles and flat form values
//!
//! [`project`] flattens a nested profile into one value per schema name;
//! [`build_patch`] rebuilds nested SCIM `replace` operations from edited values.
//! Neither fails: anything missing is treated as not present.

use serde_json::{json, Map, Value};

use super::patch::{PatchOperation, PatchRequest};
use super::schema::{AttributePath, SchemaDescriptor};
use super::value::{FlatProfileView, ProfileRecord, ProfileValue};

/// Project a profile onto the schema
///
/// * `name.<sub>` keys are omitted when the member is missing or empty.
/// * `<attribute>.<type>` keys are always present, empty when no entry matches.
pub fn project(descriptors: &[SchemaDescriptor], profile: &ProfileRecord) -> FlatProfileView {
    let mut view = FlatProfileView::new();

    if profile.is_empty() {
        return view;
    }

    for descriptor in descriptors {
        if let Some(value) = resolve(&descriptor.path(), profile) {
            view.insert(descriptor.name.clone(), value);
        }
    }

    view
}

fn resolve(path: &AttributePath, profile: &ProfileRecord) -> Option<ProfileValue> {
    match path {
        AttributePath::Emails => {
            let emails = profile.get("emails")?;
            match emails.first_tagged_value() {
                Some(value) => Some(ProfileValue::Scalar(value.clone())),
                None => emails.first_element().filter(ProfileValue::is_truthy),
            }
        }
        AttributePath::Simple(attribute) => profile
            .get(attribute)
            .filter(|value| !value.is_null())
            .cloned(),
        AttributePath::Name(sub) => profile
            .get("name")
            .and_then(|name| name.member(sub))
            .filter(|value| value.is_truthy())
            .cloned(),
        AttributePath::MultiValued { attribute, tag } => Some(
            profile
                .get(attribute)
                .and_then(|entries| entries.find_by_type(tag))
                .unwrap_or_else(|| ProfileValue::string("")),
        ),
    }
}

/// Build a patch request from edited values
///
/// Emits one `replace` per patchable descriptor that has a non-null edited value,
/// in descriptor order. Multi-valued attributes are rewritten as a single-entry
/// array, which drops any other typed entries the directory holds.
pub fn build_patch(descriptors: &[SchemaDescriptor], edited: &FlatProfileView) -> PatchRequest {
    let operations = descriptors
        .iter()
        .filter(|descriptor| descriptor.is_patchable())
        .filter_map(|descriptor| {
            let value = edited.get(&descriptor.name).filter(|v| !v.is_null())?;
            Some(PatchOperation::replace(value_object(
                &descriptor.path(),
                value,
            )))
        })
        .collect();

    PatchRequest::new(operations)
}

fn value_object(path: &AttributePath, value: &ProfileValue) -> Map<String, Value> {
    let mut object = Map::new();

    match path {
        AttributePath::Emails => {
            object.insert("emails".to_string(), Value::Array(vec![value.to_json()]));
        }
        AttributePath::Simple(attribute) => {
            object.insert(attribute.clone(), value.to_json());
        }
        AttributePath::Name(sub) => {
            if value.is_truthy() {
                let mut name = Map::new();
                name.insert(sub.clone(), value.to_json());
                object.insert("name".to_string(), Value::Object(name));
            }
        }
        AttributePath::MultiValued { attribute, tag } => {
            object.insert(
                attribute.clone(),
                json!([{ "type": tag, "value": value.to_json() }]),
            );
        }
    }

    object
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(value: Value) -> ProfileRecord {
        ProfileRecord::try_from(value).unwrap()
    }

    fn descriptors(names: &[&str]) -> Vec<SchemaDescriptor> {
        names
            .iter()
            .map(|name| SchemaDescriptor::new(*name, *name))
            .collect()
    }

    fn view_json(view: &FlatProfileView) -> Value {
        serde_json::to_value(view).unwrap()
    }

    // =========================================================================
    // project
    // =========================================================================

    #[test]
    fn test_empty_inputs_yield_empty_view() {
        let alice = profile(json!({ "userName": "alice" }));
        assert!(project(&[], &alice).is_empty());
        assert!(project(&descriptors(&["userName", "emails"]), &ProfileRecord::new()).is_empty());
    }

    #[test]
    fn test_simple_attribute_copied() {
        let view = project(
            &descriptors(&["userName"]),
            &profile(json!({ "userName": "alice" })),
        );
        assert_eq!(view_json(&view), json!({ "userName": "alice" }));
    }

    #[test]
    fn test_simple_attribute_copied_verbatim_whatever_its_shape() {
        let view = project(
            &descriptors(&["groups", "active"]),
            &profile(json!({ "groups": [{ "display": "admins" }], "active": true })),
        );
        assert_eq!(
            view_json(&view),
            json!({ "groups": [{ "display": "admins" }], "active": true })
        );
    }

    #[test]
    fn test_missing_simple_attribute_is_absent() {
        let view = project(
            &descriptors(&["nickName"]),
            &profile(json!({ "userName": "alice" })),
        );
        assert!(!view.contains("nickName"));
    }

    #[test]
    fn test_emails_tagged_and_plain_shapes() {
        let schema = descriptors(&["emails"]);

        let tagged = project(&schema, &profile(json!({ "emails": [{ "value": "a@b.com" }] })));
        assert_eq!(view_json(&tagged), json!({ "emails": "a@b.com" }));

        let plain = project(&schema, &profile(json!({ "emails": ["a@b.com"] })));
        assert_eq!(view_json(&plain), json!({ "emails": "a@b.com" }));
    }

    #[test]
    fn test_null_simple_attribute_is_absent() {
        let view = project(
            &descriptors(&["userName", "nickName"]),
            &profile(json!({ "userName": "a", "nickName": null })),
        );
        assert_eq!(view_json(&view), json!({ "userName": "a" }));
        assert!(!view.contains("nickName"));
    }

    #[test]
    fn test_emails_mixed_shapes_use_first_value() {
        let view = project(
            &descriptors(&["emails"]),
            &profile(json!({ "emails": [{ "value": "a@b.com" }, "c@d.com"] })),
        );
        assert_eq!(view_json(&view), json!({ "emails": "a@b.com" }));

        let leading_plain = project(
            &descriptors(&["emails"]),
            &profile(json!({ "emails": ["c@d.com", { "value": "a@b.com" }] })),
        );
        assert_eq!(view_json(&leading_plain), json!({ "emails": "c@d.com" }));
    }

    #[test]
    fn test_emails_takes_first_entry() {
        let view = project(
            &descriptors(&["emails"]),
            &profile(json!({ "emails": [{ "value": "first@x" }, { "value": "second@x" }] })),
        );
        assert_eq!(view_json(&view), json!({ "emails": "first@x" }));
    }

    #[test]
    fn test_emails_tagged_without_value_uses_element() {
        let view = project(
            &descriptors(&["emails"]),
            &profile(json!({ "emails": [{ "type": "work", "value": "" }] })),
        );
        assert_eq!(
            view_json(&view),
            json!({ "emails": { "type": "work", "value": "" } })
        );
    }

    #[test]
    fn test_emails_missing_or_empty_is_absent() {
        let schema = descriptors(&["emails"]);
        assert!(!project(&schema, &profile(json!({ "emails": [] }))).contains("emails"));
        assert!(!project(&schema, &profile(json!({ "userName": "a" }))).contains("emails"));
    }

    #[test]
    fn test_name_member() {
        let schema = descriptors(&["name.givenName"]);

        let view = project(&schema, &profile(json!({ "name": { "givenName": "Alice" } })));
        assert_eq!(view_json(&view), json!({ "name.givenName": "Alice" }));

        let no_name = project(&schema, &profile(json!({ "userName": "alice" })));
        assert!(!no_name.contains("name.givenName"));

        let no_member = project(&schema, &profile(json!({ "name": { "familyName": "A" } })));
        assert!(!no_member.contains("name.givenName"));
    }

    #[test]
    fn test_multi_valued_unmatched_is_explicit_empty_string() {
        let schema = descriptors(&["addresses.home"]);

        let view = project(
            &schema,
            &profile(json!({ "addresses": [{ "type": "work", "value": "X" }] })),
        );
        assert_eq!(view_json(&view), json!({ "addresses.home": "" }));

        let missing = project(&schema, &profile(json!({ "userName": "alice" })));
        assert_eq!(view_json(&missing), json!({ "addresses.home": "" }));
    }

    #[test]
    fn test_multi_valued_matched() {
        let view = project(
            &descriptors(&["phoneNumbers.mobile"]),
            &profile(json!({
                "phoneNumbers": [
                    { "type": "work", "value": "111" },
                    { "type": "mobile", "value": "222" }
                ]
            })),
        );
        assert_eq!(view_json(&view), json!({ "phoneNumbers.mobile": "222" }));
    }

    #[test]
    fn test_multi_valued_non_scalar_value_is_kept() {
        let view = project(
            &descriptors(&["addresses.home"]),
            &profile(json!({
                "addresses": [{ "type": "home", "value": { "locality": "Colombo" } }]
            })),
        );
        assert_eq!(
            view_json(&view),
            json!({ "addresses.home": { "locality": "Colombo" } })
        );
    }

    #[test]
    fn test_view_follows_descriptor_order() {
        let view = project(
            &descriptors(&["name.givenName", "userName", "emails"]),
            &profile(json!({
                "userName": "alice",
                "emails": ["a@b.com"],
                "name": { "givenName": "Alice" }
            })),
        );
        let keys: Vec<&str> = view.keys().collect();
        assert_eq!(keys, vec!["name.givenName", "userName", "emails"]);
    }

    // =========================================================================
    // build_patch
    // =========================================================================

    #[test]
    fn test_patch_value_shapes() {
        let schema = descriptors(&["userName", "emails", "name.givenName", "addresses.home"]);
        let edited: FlatProfileView = vec![
            ("userName", ProfileValue::string("alice")),
            ("emails", ProfileValue::string("a@b.com")),
            ("name.givenName", ProfileValue::string("Alice")),
            ("addresses.home", ProfileValue::string("1 Main St")),
        ]
        .into_iter()
        .collect();

        let request = build_patch(&schema, &edited);
        let values: Vec<Value> = request
            .operations
            .iter()
            .map(|op| Value::Object(op.value.clone()))
            .collect();

        assert_eq!(
            values,
            vec![
                json!({ "userName": "alice" }),
                json!({ "emails": ["a@b.com"] }),
                json!({ "name": { "givenName": "Alice" } }),
                json!({ "addresses": [{ "type": "home", "value": "1 Main St" }] }),
            ]
        );
    }

    #[test]
    fn test_patch_skips_absent_and_null_values() {
        let schema = descriptors(&["userName", "nickName", "title"]);
        let edited: FlatProfileView = vec![
            ("userName", ProfileValue::string("alice")),
            ("title", ProfileValue::Null),
        ]
        .into_iter()
        .collect();

        let request = build_patch(&schema, &edited);
        assert_eq!(request.operations.len(), 1);
        assert_eq!(request.operations[0].value.get("userName"), Some(&json!("alice")));
    }

    #[test]
    fn test_patch_empty_name_member_yields_empty_value_object() {
        let schema = descriptors(&["name.familyName"]);
        let edited: FlatProfileView = vec![("name.familyName", ProfileValue::string(""))]
            .into_iter()
            .collect();

        let request = build_patch(&schema, &edited);
        assert_eq!(request.operations.len(), 1);
        assert!(request.operations[0].value.is_empty());
    }

    #[test]
    fn test_patch_never_includes_roles_default() {
        let schema = descriptors(&["roles.default", "userName"]);
        let edited: FlatProfileView = vec![
            ("roles.default", ProfileValue::string("admin")),
            ("userName", ProfileValue::string("alice")),
        ]
        .into_iter()
        .collect();

        let request = build_patch(&schema, &edited);
        assert_eq!(request.operations.len(), 1);
        assert!(request
            .operations
            .iter()
            .all(|op| !op.value.contains_key("roles")));
    }

    #[test]
    fn test_round_trip_emits_one_operation_per_patchable_descriptor() {
        let schema = descriptors(&[
            "userName",
            "emails",
            "name.givenName",
            "name.familyName",
            "phoneNumbers.mobile",
            "roles.default",
        ]);
        let alice = profile(json!({
            "userName": "alice",
            "emails": [{ "value": "alice@example.com", "primary": true }],
            "name": { "givenName": "Alice", "familyName": "Liddell" },
            "phoneNumbers": [{ "type": "mobile", "value": "555" }],
            "roles": [{ "type": "default", "value": "admin" }]
        }));

        let view = project(&schema, &alice);
        let request = build_patch(&schema, &view);

        assert_eq!(request.operations.len(), 5);
        let first_keys: Vec<&str> = request
            .operations
            .iter()
            .map(|op| op.value.keys().next().map(String::as_str).unwrap_or(""))
            .collect();
        assert_eq!(
            first_keys,
            vec!["userName", "emails", "name", "name", "phoneNumbers"]
        );
        assert_eq!(
            request.operations[1].value.get("emails"),
            Some(&json!(["alice@example.com"]))
        );
    }
}
