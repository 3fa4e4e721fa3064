//! Schema resolution against the object catalog.
//!
//! A catalog schema is a JSON object whose entries are field bodies:
//!
//! ```json
//! {
//!   "id":     { "_type": "integer", "_value": 123, "_filterable": true },
//!   "region": { "_type": "region",  "_description": "Where it lives" },
//!   "alerts": { "cpu": { "_type": "integer", "_value": 90 } }
//! }
//! ```
//!
//! A `_type` naming another catalog object is expanded in place; a body with
//! no `_type` is itself an inline schema. Both recurse to any depth.

use serde_json::Value;
use tracing::{debug, warn};

use apiref_shared::{
    ApiRefError, Description, JsonMap, NormalizedField, NormalizedResource, Result,
};

use crate::catalog::ObjectCatalog;
use crate::without_keys;

/// Resolve `resource` (with plural fallback) into a normalized object.
///
/// `Ok(None)` means the catalog has no such object; callers treat the
/// resource as optional. `context` names the input file for error messages.
pub fn resolve_resource(
    catalog: &ObjectCatalog,
    resource: &str,
    context: &str,
) -> Result<Option<NormalizedResource>> {
    let Some((key, object)) = catalog.lookup(resource) else {
        debug!(resource, context, "resource not in object catalog");
        return Ok(None);
    };

    let mut resolver = Resolver::new(catalog, context, key);
    let (schema, example) = match &object.schema {
        Some(schema) => {
            let (fields, example) = resolver.resolve_schema(schema, false)?;
            (Some(fields), Some(example))
        }
        None => (None, None),
    };

    Ok(Some(NormalizedResource {
        schema,
        example,
        enums: object.enums.as_ref().map(format_enums),
        extra: without_keys(&object.extra, &["example"]),
    }))
}

/// Turn `{enumName: def}` into `[{...def, name: enumName}]`.
///
/// Definitions that are not objects are wrapped as `{value, name}`.
pub fn format_enums<'a, I>(enums: I) -> Vec<JsonMap>
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    enums
        .into_iter()
        .map(|(name, def)| {
            let mut record = match def {
                Value::Object(map) => map.clone(),
                other => {
                    let mut map = JsonMap::new();
                    map.insert("value".into(), other.clone());
                    map
                }
            };
            record.insert("name".into(), Value::String(name.clone()));
            record
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

struct Resolver<'a> {
    catalog: &'a ObjectCatalog,
    context: &'a str,
    /// Catalog objects currently being expanded, outermost first.
    expanding: Vec<String>,
    /// Field names from the resource root to the current field.
    trail: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn new(catalog: &'a ObjectCatalog, context: &'a str, root: &str) -> Self {
        Self {
            catalog,
            context,
            expanding: vec![root.to_string()],
            trail: Vec::new(),
        }
    }

    /// Resolve every object-valued entry of `schema`, in order.
    ///
    /// With `inline` set, underscore-prefixed keys are field metadata of the
    /// enclosing body rather than subfields, and are skipped.
    fn resolve_schema(
        &mut self,
        schema: &JsonMap,
        inline: bool,
    ) -> Result<(Vec<NormalizedField>, JsonMap)> {
        let mut fields = Vec::new();
        let mut example = JsonMap::new();

        for (name, body) in schema {
            if inline && name.starts_with('_') {
                continue;
            }
            let Value::Object(body) = body else {
                continue;
            };

            self.trail.push(name.clone());
            let field = self.resolve_field(name, body);
            self.trail.pop();
            let field = field?;

            match (&field.example, &field.value) {
                (Some(nested), _) => {
                    example.insert(name.clone(), Value::Object(nested.clone()));
                }
                (None, Some(value)) => {
                    example.insert(name.clone(), value.clone());
                }
                (None, None) => {}
            }
            fields.push(field);
        }

        Ok((fields, example))
    }

    fn resolve_field(&mut self, name: &str, body: &JsonMap) -> Result<NormalizedField> {
        let description = self.description(body)?;
        let field_type = body.get("_type").and_then(Value::as_str);

        let (schema, example) = match field_type {
            Some(type_name) if self.catalog.contains(type_name) => {
                self.expand_type(type_name)?
            }
            Some(_) => (None, None),
            None => {
                let (fields, example) = self.resolve_schema(body, true)?;
                (Some(fields), Some(example))
            }
        };

        Ok(NormalizedField {
            name: name.to_string(),
            description,
            editable: body.get("_editable").and_then(Value::as_bool),
            filterable: body.get("_filterable").and_then(Value::as_bool),
            field_type: field_type.map(String::from),
            value: body.get("_value").cloned(),
            example,
            schema,
        })
    }

    /// Expand a field whose `_type` names a catalog object.
    fn expand_type(
        &mut self,
        type_name: &str,
    ) -> Result<(Option<Vec<NormalizedField>>, Option<JsonMap>)> {
        if self.expanding.iter().any(|open| open == type_name) {
            warn!(
                context = self.context,
                field = %self.trail.join("."),
                type_name,
                "recursive type reference, emitting field as a leaf"
            );
            return Ok((None, None));
        }

        let Some(object) = self.catalog.get(type_name) else {
            return Ok((None, None));
        };

        self.expanding.push(type_name.to_string());
        let resolved = match &object.schema {
            Some(schema) => self.resolve_schema(schema, false),
            None => Ok((Vec::new(), JsonMap::new())),
        };
        self.expanding.pop();

        let (fields, example) = resolved?;
        Ok((Some(fields), Some(example)))
    }

    fn description(&self, body: &JsonMap) -> Result<Option<Description>> {
        let raw = body
            .get("_description")
            .and_then(Value::as_str)
            .or_else(|| body.get("description").and_then(Value::as_str));

        apiref_markup::normalize_opt(raw).map_err(|source| {
            ApiRefError::markup(
                format!(
                    "{}: {} field {}",
                    self.context,
                    self.expanding[0],
                    self.trail.join(".")
                ),
                source,
            )
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use apiref_shared::{MarkupError, ResourceObject};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(value: Value) -> ResourceObject {
        serde_json::from_value(value).expect("valid resource object")
    }

    fn resolved(name: &str) -> NormalizedResource {
        resolve_resource(&catalog(), name, "test").unwrap().unwrap()
    }

    fn catalog() -> ObjectCatalog {
        [
            (
                "linode".to_string(),
                object(json!({
                    "schema": {
                        "id": {"_type": "integer", "_value": 123, "_filterable": true},
                        "label": {
                            "_type": "string",
                            "_value": "web01",
                            "_editable": true,
                            "_description": "See <a href=\"/labels\">labels</a>."
                        },
                        "region": {"_type": "region", "_description": "Where it runs"},
                        "alerts": {
                            "_description": "Alert thresholds",
                            "cpu": {"_type": "integer", "_value": 90},
                            "io": {"_type": "integer", "_value": 5000}
                        },
                        "status": "internal"
                    },
                    "enums": {
                        "Status": {"booting": "Starting up", "running": "Up"}
                    }
                })),
            ),
            (
                "region".to_string(),
                object(json!({
                    "schema": {
                        "id": {"_type": "string", "_value": "us-east"},
                        "country": {"_type": "string", "_value": "us"}
                    }
                })),
            ),
            (
                "ticket".to_string(),
                object(json!({
                    "schema": {
                        "summary": {"_type": "string", "_value": "Help"}
                    }
                })),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn resolves_fields_in_order() {
        let resource = resolved("linode");
        let schema = resource.schema.unwrap();
        let names: Vec<&str> = schema.iter().map(|f| f.name.as_str()).collect();
        // `status` is not an object and is dropped
        assert_eq!(names, ["id", "label", "region", "alerts"]);
    }

    #[test]
    fn leaf_field_keeps_metadata() {
        let resource = resolved("linode");
        let label = &resource.schema.unwrap()[1];
        assert_eq!(label.field_type.as_deref(), Some("string"));
        assert_eq!(label.editable, Some(true));
        assert_eq!(label.filterable, None);
        assert_eq!(label.value, Some(json!("web01")));
        assert_eq!(
            label.description,
            Some(Description::Text("See labels.".into()))
        );
        assert!(!label.is_nested());
    }

    #[test]
    fn catalog_type_expands_nested_example() {
        let resource = resolved("linode");
        let example = resource.example.unwrap();
        assert_eq!(
            Value::Object(example.clone()),
            json!({
                "id": 123,
                "label": "web01",
                "region": {"id": "us-east", "country": "us"},
                "alerts": {"cpu": 90, "io": 5000}
            })
        );

        let region = &resource.schema.unwrap()[2];
        assert!(region.is_nested());
        assert_eq!(region.schema.as_ref().unwrap().len(), 2);
        assert_eq!(
            region.example.as_ref().map(|e| Value::Object(e.clone())),
            Some(example["region"].clone())
        );
    }

    #[test]
    fn inline_body_becomes_nested_schema() {
        let resource = resolved("linode");
        let alerts = &resource.schema.unwrap()[3];
        assert_eq!(alerts.field_type, None);
        assert_eq!(
            alerts.description,
            Some(Description::Text("Alert thresholds".into()))
        );
        let nested: Vec<&str> = alerts
            .schema
            .as_ref()
            .unwrap()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(nested, ["cpu", "io"]);
    }

    #[test]
    fn enums_become_named_records() {
        let resource = resolved("linode");
        let enums = resource.enums.unwrap();
        assert_eq!(enums.len(), 1);
        assert_eq!(
            Value::Object(enums[0].clone()),
            json!({"booting": "Starting up", "running": "Up", "name": "Status"})
        );
    }

    #[test]
    fn non_object_enum_is_wrapped() {
        let enums = indexmap::IndexMap::from([("Kind".to_string(), json!(["a", "b"]))]);
        let records = format_enums(&enums);
        assert_eq!(
            Value::Object(records[0].clone()),
            json!({"value": ["a", "b"], "name": "Kind"})
        );
    }

    #[test]
    fn plural_resource_falls_back() {
        let resource = resolved("tickets");
        assert_eq!(resource.schema.unwrap()[0].name, "summary");
    }

    #[test]
    fn unknown_resource_is_none() {
        let resource = resolve_resource(&catalog(), "volumes", "test").unwrap();
        assert!(resource.is_none());
    }

    #[test]
    fn unknown_type_is_leaf() {
        let cat: ObjectCatalog = [(
            "domain".to_string(),
            object(json!({"schema": {"soa": {"_type": "email", "_value": "a@b.c"}}})),
        )]
        .into_iter()
        .collect();
        let resource = resolve_resource(&cat, "domain", "test").unwrap().unwrap();
        let soa = &resource.schema.unwrap()[0];
        assert!(!soa.is_nested());
        assert_eq!(resource.example.unwrap()["soa"], json!("a@b.c"));
    }

    #[test]
    fn self_reference_terminates() {
        let cat: ObjectCatalog = [(
            "node".to_string(),
            object(json!({"schema": {
                "id": {"_type": "integer", "_value": 1},
                "parent": {"_type": "node", "_value": null}
            }})),
        )]
        .into_iter()
        .collect();
        let resource = resolve_resource(&cat, "node", "test").unwrap().unwrap();
        let parent = &resource.schema.unwrap()[1];
        assert!(!parent.is_nested());
        assert_eq!(resource.example.unwrap()["parent"], Value::Null);
    }

    #[test]
    fn deep_nesting_resolves() {
        let cat: ObjectCatalog = [
            (
                "a".to_string(),
                object(json!({"schema": {"b": {"_type": "b"}}})),
            ),
            (
                "b".to_string(),
                object(json!({"schema": {"c": {"_type": "c"}}})),
            ),
            (
                "c".to_string(),
                object(json!({"schema": {"leaf": {"_type": "string", "_value": "x"}}})),
            ),
        ]
        .into_iter()
        .collect();
        let resource = resolve_resource(&cat, "a", "test").unwrap().unwrap();
        assert_eq!(
            Value::Object(resource.example.unwrap()),
            json!({"b": {"c": {"leaf": "x"}}})
        );
    }

    #[test]
    fn malformed_description_names_field() {
        let cat: ObjectCatalog = [(
            "volume".to_string(),
            object(json!({"schema": {"config": {
                "size": {"_type": "integer", "_description": "One of<ul></ul>"}
            }}})),
        )]
        .into_iter()
        .collect();
        let err = resolve_resource(&cat, "volume", "volumes.json").unwrap_err();
        match err {
            ApiRefError::MalformedMarkup { field, source } => {
                assert_eq!(field, "volumes.json: volume field config.size");
                assert_eq!(source, MarkupError::EmptyList { offset: 6 });
            }
            other => panic!("expected markup error, got {other:?}"),
        }
    }
}
