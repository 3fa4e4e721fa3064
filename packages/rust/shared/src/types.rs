//! Input records and generated output types.
//!
//! Input types mirror the hand-authored JSON under `src/data`. Keys the
//! pipeline does not interpret are kept in `extra` and pass through to the
//! output untouched. All maps preserve insertion order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON object with insertion order preserved.
pub type JsonMap = serde_json::Map<String, Value>;

// ---------------------------------------------------------------------------
// Description
// ---------------------------------------------------------------------------

/// A description after markup normalization.
///
/// Plain text serializes as a JSON string; text containing a list serializes
/// as `{"descText": ..., "listItems": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    List {
        #[serde(rename = "descText")]
        desc_text: String,
        #[serde(rename = "listItems")]
        list_items: Vec<String>,
    },
    Text(String),
}

impl Description {
    /// The plain text, if this description has no list.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::List { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Input: endpoint files
// ---------------------------------------------------------------------------

/// One endpoint file (or one nested child inside an endpoint file).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EndpointRecord {
    /// Documented path, e.g. `/linode/instances`.
    #[serde(default)]
    pub base_path: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Raw description, possibly an HTML fragment.
    #[serde(default)]
    pub description: Option<String>,
    /// HTTP method → definition.
    #[serde(default)]
    pub methods: IndexMap<String, MethodDef>,
    /// Name of the catalog object this endpoint returns.
    #[serde(default)]
    pub resource: Option<String>,
    /// Nested child endpoints keyed by their path.
    #[serde(default)]
    pub endpoints: IndexMap<String, EndpointRecord>,
    /// Already-formatted children, carried over as-is.
    #[serde(default, rename = "formattedEndpoints")]
    pub formatted_endpoints: Vec<FormattedEndpoint>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// One HTTP method on an endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MethodDef {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub params: Option<IndexMap<String, ParamDef>>,
    #[serde(default)]
    pub examples: Option<IndexMap<String, Value>>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// One documented request parameter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ParamDef {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub param_type: Option<String>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

// ---------------------------------------------------------------------------
// Input: object catalog
// ---------------------------------------------------------------------------

/// A reusable object definition from the catalog.
///
/// `schema` is kept as raw JSON: field bodies use underscore-prefixed
/// metadata keys (`_type`, `_value`, `_description`, ...) and inline nested
/// objects use arbitrary keys, so there is no fixed struct shape.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResourceObject {
    #[serde(default)]
    pub schema: Option<JsonMap>,
    #[serde(default)]
    pub enums: Option<IndexMap<String, Value>>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A top-level documentation section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCategory {
    pub name: String,
    pub path: String,
    #[serde(rename = "routePath")]
    pub route_path: String,
    #[serde(rename = "formattedEndpoints")]
    pub formatted_endpoints: Vec<FormattedEndpoint>,
}

/// An endpoint after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedEndpoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(
        default,
        rename = "routePath",
        skip_serializing_if = "Option::is_none"
    )]
    pub route_path: Option<String>,
    #[serde(default)]
    pub methods: Vec<FormattedMethod>,
    #[serde(default, rename = "formattedEndpoints")]
    pub formatted_endpoints: Vec<FormattedEndpoint>,
    /// Raw children still waiting to be formatted; never serialized.
    #[serde(skip)]
    pub endpoints: IndexMap<String, EndpointRecord>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// A method after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedMethod {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<FormattedParam>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<NamedExample>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<NormalizedResource>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// A parameter after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedParam {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// A named request/response example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedExample {
    pub name: String,
    pub value: Value,
}

/// A catalog object with its schema resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Vec<NormalizedField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<JsonMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enums: Option<Vec<JsonMap>>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// One field of a resolved schema.
///
/// Nested fields carry `schema` and `example`; leaf fields serialize both as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filterable: Option<bool>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default)]
    pub example: Option<JsonMap>,
    #[serde(default)]
    pub schema: Option<Vec<NormalizedField>>,
}

impl NormalizedField {
    /// Whether this field was resolved into a nested schema.
    pub fn is_nested(&self) -> bool {
        self.schema.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_serializes_both_shapes() {
        let text = Description::Text("plain".into());
        assert_eq!(
            serde_json::to_value(&text).unwrap(),
            serde_json::json!("plain")
        );

        let list = Description::List {
            desc_text: "intro".into(),
            list_items: vec!["one".into(), "two".into()],
        };
        assert_eq!(
            serde_json::to_value(&list).unwrap(),
            serde_json::json!({"descText": "intro", "listItems": ["one", "two"]})
        );
    }

    #[test]
    fn description_deserializes_list_shape() {
        let json = r#"{"descText":"a","listItems":["b"]}"#;
        let parsed: Description = serde_json::from_str(json).unwrap();
        assert!(matches!(parsed, Description::List { .. }));
        assert_eq!(parsed.as_text(), None);
    }

    #[test]
    fn endpoint_record_keeps_unknown_keys() {
        let json = r#"{
            "base_path": "/linode/instances",
            "name": "Linodes",
            "authenticated": true,
            "methods": {
                "GET": {"description": "List", "money": true}
            }
        }"#;
        let record: EndpointRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.base_path.as_deref(), Some("/linode/instances"));
        assert_eq!(record.extra["authenticated"], Value::Bool(true));
        assert_eq!(record.methods["GET"].extra["money"], Value::Bool(true));
        assert!(record.endpoints.is_empty());
    }

    #[test]
    fn method_order_is_preserved() {
        let json = r#"{"methods": {"PUT": {}, "GET": {}, "DELETE": {}}}"#;
        let record: EndpointRecord = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = record.methods.keys().map(String::as_str).collect();
        assert_eq!(keys, ["PUT", "GET", "DELETE"]);
    }

    #[test]
    fn leaf_field_serializes_null_schema() {
        let field = NormalizedField {
            name: "id".into(),
            description: None,
            editable: Some(false),
            filterable: None,
            field_type: Some("integer".into()),
            value: Some(serde_json::json!(123)),
            example: None,
            schema: None,
        };
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["schema"], Value::Null);
        assert_eq!(value["example"], Value::Null);
        assert_eq!(value["type"], "integer");
        assert!(value.get("filterable").is_none());
        assert!(!field.is_nested());
    }
}
