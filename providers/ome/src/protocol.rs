//! Request and response documents exchanged with the host
//!
//! The host transport itself is not part of the provider. A request names the
//! resource or data source type, the lifecycle operation and the state documents
//! the operation needs; the response carries the new state and the diagnostics.

use crate::diagnostics::Diagnostics;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle operation requested by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Validate the planned state and report attributes that force replacement.
    /// Does not contact OME.
    Plan,
    Create,
    Read,
    Update,
    Delete,
    Import,
    ReadDataSource,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Plan => "plan",
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Import => "import",
            Operation::ReadDataSource => "read_data_source",
        };
        f.write_str(name)
    }
}

/// One host call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Resource or data source type, e.g. `ome_static_group`
    #[serde(rename = "type")]
    pub type_name: String,
    pub operation: Operation,
    /// State recorded by the host (read, update, delete, plan of an existing resource)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_state: Option<Value>,
    /// Desired state (plan, create, update) or data source configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_state: Option<Value>,
    /// Identifier given to `import`, usually the entity name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_id: Option<String>,
}

#[cfg(test)]
impl Request {
    pub fn new(type_name: impl Into<String>, operation: Operation) -> Self {
        Self {
            type_name: type_name.into(),
            operation,
            prior_state: None,
            planned_state: None,
            import_id: None,
        }
    }

    pub fn with_prior(mut self, state: Value) -> Self {
        self.prior_state = Some(state);
        self
    }

    pub fn with_planned(mut self, state: Value) -> Self {
        self.planned_state = Some(state);
        self
    }

    pub fn with_import_id(mut self, id: impl Into<String>) -> Self {
        self.import_id = Some(id.into());
        self
    }
}

/// Result of one host call
///
/// `state` is the state the host should record: the new state on success, the
/// prior state on failure, and `None` once the entity is gone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub state: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires_replace: Vec<String>,
    pub diagnostics: Diagnostics,
}

impl Response {
    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_document() {
        let request: Request = serde_json::from_value(serde_json::json!({
            "type": "ome_static_group",
            "operation": "read_data_source",
            "planned_state": {"name": "g1"}
        }))
        .unwrap();
        assert_eq!(request.type_name, "ome_static_group");
        assert_eq!(request.operation, Operation::ReadDataSource);
        assert!(request.prior_state.is_none());
        assert_eq!(request.operation.to_string(), "read_data_source");
    }
}
