use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema URN identifying a SCIM patch message
pub const PATCH_OP_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Replace,
}

/// One `{op, value}` entry of a patch request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub value: Map<String, Value>,
}

impl PatchOperation {
    pub fn replace(value: Map<String, Value>) -> Self {
        Self {
            op: PatchOp::Replace,
            value,
        }
    }
}

/// SCIM PatchOp message body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRequest {
    #[serde(rename = "Operations")]
    pub operations: Vec<PatchOperation>,
    pub schemas: Vec<String>,
}

impl PatchRequest {
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self {
            operations,
            schemas: vec![PATCH_OP_SCHEMA.to_string()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Default for PatchRequest {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
