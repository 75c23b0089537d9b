//! Typed view over semi-structured SCIM profile data
//!
//! Profiles returned by the directory have no fixed shape: the schema decides
//! which attributes exist. Rather than probing raw JSON, every attribute value
//! is classified once into a [`ProfileValue`] and the mapper matches on it.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// A leaf value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(Number),
    Bool(bool),
}

impl Scalar {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Scalar::String(s.clone())),
            Value::Number(n) => Some(Scalar::Number(n.clone())),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            _ => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Scalar::String(s) => Value::String(s.clone()),
            Scalar::Number(n) => Value::Number(n.clone()),
            Scalar::Bool(b) => Value::Bool(*b),
        }
    }

    /// Falsy in the form sense: empty string, zero, or `false`
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::String(s) => !s.is_empty(),
            Scalar::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
            Scalar::Bool(b) => *b,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// One element of a multi-valued attribute, e.g. `{"type": "work", "value": "..."}`
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedValue {
    /// The `type` discriminator, when present and a string
    pub tag: Option<String>,
    /// The `value` member, when present and scalar
    pub value: Option<Scalar>,
    /// Every other member (`primary`, `display`, ...)
    pub extra: Map<String, Value>,
}

impl TaggedValue {
    fn from_object(object: &Map<String, Value>) -> Self {
        let tag = object
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_string);
        let value = object.get("value").and_then(Scalar::from_json);

        let extra = object
            .iter()
            .filter(|(key, member)| match key.as_str() {
                "type" => tag.is_none(),
                "value" => Scalar::from_json(member).is_none(),
                _ => true,
            })
            .map(|(key, member)| (key.clone(), member.clone()))
            .collect();

        Self { tag, value, extra }
    }

    fn to_json(&self) -> Value {
        let mut object = self.extra.clone();
        if let Some(tag) = &self.tag {
            object.insert("type".to_string(), Value::String(tag.clone()));
        }
        if let Some(value) = &self.value {
            object.insert("value".to_string(), value.to_json());
        }
        Value::Object(object)
    }
}

/// Classified attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileValue {
    Null,
    Scalar(Scalar),
    ScalarArray(Vec<Scalar>),
    TaggedValueArray(Vec<TaggedValue>),
    /// Arrays mixing shapes (scalars and objects, nested arrays)
    Array(Vec<ProfileValue>),
    Object(BTreeMap<String, ProfileValue>),
}

impl ProfileValue {
    pub fn string(value: impl Into<String>) -> Self {
        ProfileValue::Scalar(Scalar::String(value.into()))
    }

    /// Nested member lookup on an object value
    pub fn member(&self, key: &str) -> Option<&ProfileValue> {
        match self {
            ProfileValue::Object(members) => members.get(key),
            _ => None,
        }
    }

    /// The first element of an array value, whatever its shape
    pub fn first_element(&self) -> Option<ProfileValue> {
        match self {
            ProfileValue::ScalarArray(items) => items.first().cloned().map(ProfileValue::Scalar),
            ProfileValue::TaggedValueArray(items) => items
                .first()
                .map(|item| ProfileValue::from(&item.to_json())),
            ProfileValue::Array(items) => items.first().cloned(),
            _ => None,
        }
    }

    /// The first element's `value` member when it is a non-empty tagged entry
    pub fn first_tagged_value(&self) -> Option<&Scalar> {
        match self {
            ProfileValue::TaggedValueArray(items) => items
                .first()
                .and_then(|item| item.value.as_ref())
                .filter(|value| value.is_truthy()),
            ProfileValue::Array(items) => items
                .first()
                .and_then(|item| item.member("value"))
                .and_then(ProfileValue::as_scalar)
                .filter(|value| value.is_truthy()),
            _ => None,
        }
    }

    /// Find the `value` of the entry whose `type` equals `tag`
    ///
    /// Entries without a `value` member, or with a null one, count as unmatched.
    pub fn find_by_type(&self, tag: &str) -> Option<ProfileValue> {
        match self {
            ProfileValue::TaggedValueArray(items) => {
                let item = items.iter().find(|item| item.tag.as_deref() == Some(tag))?;
                match &item.value {
                    Some(scalar) => Some(ProfileValue::Scalar(scalar.clone())),
                    None => item
                        .extra
                        .get("value")
                        .map(ProfileValue::from)
                        .filter(|value| !value.is_null()),
                }
            }
            ProfileValue::Array(items) => items
                .iter()
                .find(|item| {
                    item.member("type")
                        .and_then(ProfileValue::as_scalar)
                        .is_some_and(|t| matches!(t, Scalar::String(s) if s == tag))
                })
                .and_then(|item| item.member("value"))
                .filter(|value| !value.is_null())
                .cloned(),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            ProfileValue::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ProfileValue::Null)
    }

    /// Form truthiness: null and falsy scalars are false, containers are true
    pub fn is_truthy(&self) -> bool {
        match self {
            ProfileValue::Null => false,
            ProfileValue::Scalar(scalar) => scalar.is_truthy(),
            _ => true,
        }
    }

    /// Text shown in a form input
    pub fn display_text(&self) -> String {
        match self {
            ProfileValue::Null => String::new(),
            ProfileValue::Scalar(scalar) => scalar.to_string(),
            ProfileValue::ScalarArray(items) => items
                .iter()
                .map(Scalar::to_string)
                .collect::<Vec<_>>()
                .join(","),
            other => other.to_json().to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ProfileValue::Null => Value::Null,
            ProfileValue::Scalar(scalar) => scalar.to_json(),
            ProfileValue::ScalarArray(items) => {
                Value::Array(items.iter().map(Scalar::to_json).collect())
            }
            ProfileValue::TaggedValueArray(items) => {
                Value::Array(items.iter().map(TaggedValue::to_json).collect())
            }
            ProfileValue::Array(items) => {
                Value::Array(items.iter().map(ProfileValue::to_json).collect())
            }
            ProfileValue::Object(members) => Value::Object(
                members
                    .iter()
                    .map(|(key, member)| (key.clone(), member.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for ProfileValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => ProfileValue::Null,
            Value::Array(items) => classify_array(items),
            Value::Object(members) => ProfileValue::Object(
                members
                    .iter()
                    .map(|(key, member)| (key.clone(), ProfileValue::from(member)))
                    .collect(),
            ),
            scalar => Scalar::from_json(scalar)
                .map(ProfileValue::Scalar)
                .unwrap_or(ProfileValue::Null),
        }
    }
}

impl From<Value> for ProfileValue {
    fn from(value: Value) -> Self {
        ProfileValue::from(&value)
    }
}

impl From<ProfileValue> for Value {
    fn from(value: ProfileValue) -> Self {
        value.to_json()
    }
}

fn classify_array(items: &[Value]) -> ProfileValue {
    if let Some(scalars) = items
        .iter()
        .map(Scalar::from_json)
        .collect::<Option<Vec<_>>>()
    {
        return ProfileValue::ScalarArray(scalars);
    }

    if let Some(tagged) = items
        .iter()
        .map(|item| item.as_object().map(TaggedValue::from_object))
        .collect::<Option<Vec<_>>>()
    {
        return ProfileValue::TaggedValueArray(tagged);
    }

    ProfileValue::Array(items.iter().map(ProfileValue::from).collect())
}

impl Serialize for ProfileValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProfileValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ProfileValue::from)
    }
}

/// A user profile as returned by the directory: top-level attribute name to value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileRecord {
    attributes: BTreeMap<String, ProfileValue>,
}

impl ProfileRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attribute: &str) -> Option<&ProfileValue> {
        self.attributes.get(attribute)
    }

    pub fn insert(&mut self, attribute: impl Into<String>, value: ProfileValue) {
        self.attributes.insert(attribute.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// The SCIM `id` attribute
    pub fn id(&self) -> Option<String> {
        self.get("id")
            .and_then(ProfileValue::as_scalar)
            .map(Scalar::to_string)
    }

    /// The SCIM `userName` attribute
    pub fn user_name(&self) -> Option<String> {
        self.get("userName")
            .and_then(ProfileValue::as_scalar)
            .map(Scalar::to_string)
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut BTreeMap<String, ProfileValue> {
        &mut self.attributes
    }
}

impl TryFrom<Value> for ProfileRecord {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
    }
}

/// Flat, ordered projection of a profile: schema name to value
///
/// Keys are dotted schema names used verbatim, not walked. Insertion order is
/// preserved so the view follows display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatProfileView {
    entries: Vec<(String, ProfileValue)>,
}

impl FlatProfileView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; overwriting keeps the original position
    pub fn insert(&mut self, name: impl Into<String>, value: ProfileValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ProfileValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProfileValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, ProfileValue)> for FlatProfileView {
    fn from_iter<I: IntoIterator<Item = (K, ProfileValue)>>(iter: I) -> Self {
        let mut view = FlatProfileView::new();
        for (name, value) in iter {
            view.insert(name, value);
        }
        view
    }
}

impl Serialize for FlatProfileView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FlatProfileView {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ViewVisitor;

        impl<'de> Visitor<'de> for ViewVisitor {
            type Value = FlatProfileView;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of schema name to value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut view = FlatProfileView::new();
                while let Some((key, value)) = access.next_entry::<String, ProfileValue>()? {
                    view.insert(key, value);
                }
                Ok(view)
            }
        }

        deserializer.deserialize_map(ViewVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classifies_scalar_arrays() {
        let value = ProfileValue::from(json!(["a@b.com", "c@d.com"]));
        assert_eq!(
            value,
            ProfileValue::ScalarArray(vec![
                Scalar::String("a@b.com".to_string()),
                Scalar::String("c@d.com".to_string()),
            ])
        );
    }

    #[test]
    fn test_classifies_tagged_arrays_and_keeps_extra_members() {
        let value = ProfileValue::from(json!([
            { "type": "work", "value": "+1 555", "primary": true }
        ]));

        let ProfileValue::TaggedValueArray(items) = &value else {
            panic!("expected tagged array, got {:?}", value);
        };
        assert_eq!(items[0].tag.as_deref(), Some("work"));
        assert_eq!(items[0].extra.get("primary"), Some(&json!(true)));
        assert_eq!(
            value.to_json(),
            json!([{ "type": "work", "value": "+1 555", "primary": true }])
        );
    }

    #[test]
    fn test_mixed_array_falls_back_to_generic() {
        let value = ProfileValue::from(json!(["plain", { "value": "tagged" }]));
        assert!(matches!(value, ProfileValue::Array(ref items) if items.len() == 2));
    }

    #[test]
    fn test_find_by_type() {
        let value = ProfileValue::from(json!([
            { "type": "home", "value": "H" },
            { "type": "work", "value": "W" }
        ]));
        assert_eq!(value.find_by_type("work"), Some(ProfileValue::string("W")));
        assert_eq!(value.find_by_type("other"), None);
        assert_eq!(ProfileValue::string("x").find_by_type("work"), None);
    }

    #[test]
    fn test_find_by_type_keeps_non_scalar_values() {
        let value = ProfileValue::from(json!([
            { "type": "home", "value": { "street": "1 Main St" } },
            { "type": "work", "value": null }
        ]));
        assert_eq!(
            value.find_by_type("home").map(|v| v.to_json()),
            Some(json!({ "street": "1 Main St" }))
        );
        assert_eq!(value.find_by_type("work"), None);
    }

    #[test]
    fn test_find_by_type_in_mixed_array() {
        let value = ProfileValue::from(json!(["stray", { "type": "work", "value": "W" }]));
        assert_eq!(value.find_by_type("work"), Some(ProfileValue::string("W")));
    }

    #[test]
    fn test_first_tagged_value_in_mixed_array() {
        let value = ProfileValue::from(json!([{ "value": "a@b.com" }, "c@d.com"]));
        assert_eq!(
            value.first_tagged_value(),
            Some(&Scalar::String("a@b.com".to_string()))
        );

        let leading_scalar = ProfileValue::from(json!(["c@d.com", { "value": "a@b.com" }]));
        assert_eq!(leading_scalar.first_tagged_value(), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!ProfileValue::Null.is_truthy());
        assert!(!ProfileValue::string("").is_truthy());
        assert!(ProfileValue::string("x").is_truthy());
        assert!(!ProfileValue::from(json!(0)).is_truthy());
        assert!(ProfileValue::from(json!([])).is_truthy());
    }

    #[test]
    fn test_flat_view_preserves_insertion_order_in_json() {
        let mut view = FlatProfileView::new();
        view.insert("userName", ProfileValue::string("alice"));
        view.insert("emails", ProfileValue::string("a@b.com"));
        view.insert("name.givenName", ProfileValue::string("Alice"));
        view.insert("userName", ProfileValue::string("bob"));

        let keys: Vec<&str> = view.keys().collect();
        assert_eq!(keys, vec!["userName", "emails", "name.givenName"]);

        let text = serde_json::to_string(&view).unwrap();
        assert_eq!(
            text,
            r#"{"userName":"bob","emails":"a@b.com","name.givenName":"Alice"}"#
        );
    }

    #[test]
    fn test_profile_record_from_json() {
        let record = ProfileRecord::try_from(json!({
            "id": "u-1",
            "userName": "PRIMARY/alice",
            "name": { "givenName": "Alice" }
        }))
        .unwrap();

        assert_eq!(record.id().as_deref(), Some("u-1"));
        assert_eq!(record.user_name().as_deref(), Some("PRIMARY/alice"));
        assert_eq!(
            record.get("name").and_then(|n| n.member("givenName")),
            Some(&ProfileValue::string("Alice"))
        );
    }
}
