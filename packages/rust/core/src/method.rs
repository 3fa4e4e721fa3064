//! Per-method formatting: description, params, examples, and the GET resource.

use tracing::debug;

use apiref_shared::{
    ApiRefError, EndpointRecord, FormattedMethod, FormattedParam, MethodDef, NamedExample,
    ParamDef, Result,
};

use crate::catalog::ObjectCatalog;
use crate::schema::resolve_resource;
use crate::without_keys;

/// Type shown for params that reference a catalog object by ID.
const OBJECT_ID_TYPE: &str = "integer";

/// Endpoint resource names that differ from their catalog key.
const RESOURCE_ALIASES: &[(&str, &str)] = &[("account", "profile")];

/// Format `method` of `endpoint`.
///
/// `context` names the input file and endpoint for error messages.
pub fn format_method(
    catalog: &ObjectCatalog,
    endpoint: &EndpointRecord,
    method: &str,
    context: &str,
) -> Result<FormattedMethod> {
    let def = endpoint.methods.get(method).ok_or_else(|| {
        ApiRefError::validation(format!("{context}: no {method} method on endpoint"))
    })?;

    let description = apiref_markup::normalize_opt(def.description.as_deref()).map_err(
        |source| ApiRefError::markup(format!("{context}: {method} description"), source),
    )?;

    let resource = match (method, endpoint.resource.as_deref()) {
        ("GET", Some(resource)) => {
            let resource = catalog_name(resource);
            let resolved = resolve_resource(catalog, resource, context)?;
            if resolved.is_none() {
                debug!(context, resource, "GET resource has no catalog object");
            }
            resolved
        }
        _ => None,
    };

    Ok(FormattedMethod {
        name: method.to_string(),
        description,
        params: format_params(catalog, def, method, context)?,
        examples: format_examples(def),
        resource,
        extra: without_keys(&def.extra, &["name", "resource"]),
    })
}

/// Map an endpoint's resource name to the catalog key it is documented under.
pub fn catalog_name(resource: &str) -> &str {
    RESOURCE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == resource)
        .map_or(resource, |&(_, target)| target)
}

fn format_params(
    catalog: &ObjectCatalog,
    def: &MethodDef,
    method: &str,
    context: &str,
) -> Result<Option<Vec<FormattedParam>>> {
    let Some(params) = &def.params else {
        return Ok(None);
    };

    params
        .iter()
        .map(|(name, param)| format_param(catalog, name, param, method, context))
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn format_param(
    catalog: &ObjectCatalog,
    name: &str,
    param: &ParamDef,
    method: &str,
    context: &str,
) -> Result<FormattedParam> {
    let description = apiref_markup::normalize_opt(param.description.as_deref()).map_err(
        |source| {
            ApiRefError::markup(
                format!("{context}: {method} params.{name}.description"),
                source,
            )
        },
    )?;

    let param_type = match param.param_type.as_deref() {
        Some(type_name) if catalog.contains(type_name) => Some(OBJECT_ID_TYPE.to_string()),
        other => other.map(String::from),
    };

    Ok(FormattedParam {
        name: name.to_string(),
        description,
        param_type,
        extra: without_keys(&param.extra, &["name"]),
    })
}

fn format_examples(def: &MethodDef) -> Option<Vec<NamedExample>> {
    def.examples.as_ref().map(|examples| {
        examples
            .iter()
            .map(|(name, value)| NamedExample {
                name: name.clone(),
                value: value.clone(),
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use apiref_shared::{Description, ResourceObject};
    use serde_json::{Value, json};

    fn catalog() -> ObjectCatalog {
        let object = |value: Value| -> ResourceObject { serde_json::from_value(value).unwrap() };
        [
            (
                "profile".to_string(),
                object(json!({"schema": {"username": {"_type": "string", "_value": "alice"}}})),
            ),
            (
                "linode".to_string(),
                object(json!({"schema": {"id": {"_type": "integer", "_value": 7}}})),
            ),
            (
                "distribution".to_string(),
                object(json!({"schema": {}})),
            ),
        ]
        .into_iter()
        .collect()
    }

    fn endpoint(value: Value) -> EndpointRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn get_attaches_resource() {
        let ep = endpoint(json!({
            "resource": "linodes",
            "methods": {"GET": {"description": "List Linodes"}}
        }));
        let method = format_method(&catalog(), &ep, "GET", "linodes.json").unwrap();
        assert_eq!(method.name, "GET");
        let resource = method.resource.unwrap();
        assert_eq!(resource.example.unwrap()["id"], json!(7));
    }

    #[test]
    fn non_get_has_no_resource() {
        let ep = endpoint(json!({
            "resource": "linode",
            "methods": {"POST": {"description": "Create"}}
        }));
        let method = format_method(&catalog(), &ep, "POST", "linodes.json").unwrap();
        assert!(method.resource.is_none());
    }

    #[test]
    fn account_resource_reads_profile() {
        let ep = endpoint(json!({
            "resource": "account",
            "methods": {"GET": {}}
        }));
        let method = format_method(&catalog(), &ep, "GET", "account.json").unwrap();
        let schema = method.resource.unwrap().schema.unwrap();
        assert_eq!(schema[0].name, "username");
        assert_eq!(catalog_name("account"), "profile");
        assert_eq!(catalog_name("linode"), "linode");
    }

    #[test]
    fn object_param_types_become_integer() {
        let ep = endpoint(json!({
            "methods": {"POST": {
                "params": {
                    "distribution": {"type": "distribution", "description": "Image"},
                    "label": {"type": "string", "optional": true},
                    "root_pass": {}
                }
            }}
        }));
        let method = format_method(&catalog(), &ep, "POST", "linodes.json").unwrap();
        let params = method.params.unwrap();
        assert_eq!(params[0].name, "distribution");
        assert_eq!(params[0].param_type.as_deref(), Some("integer"));
        assert_eq!(
            params[0].description,
            Some(Description::Text("Image".into()))
        );
        assert_eq!(params[1].param_type.as_deref(), Some("string"));
        assert_eq!(params[1].extra["optional"], json!(true));
        assert_eq!(params[2].param_type, None);
    }

    #[test]
    fn param_list_markup_converted() {
        let ep = endpoint(json!({
            "methods": {"PUT": {
                "params": {"status": {"description": "One of:<ul><li>active</li><li>disabled</li></ul>"}}
            }}
        }));
        let method = format_method(&catalog(), &ep, "PUT", "domains.json").unwrap();
        assert_eq!(
            method.params.unwrap()[0].description,
            Some(Description::List {
                desc_text: "One of:".into(),
                list_items: vec!["active".into(), "disabled".into()],
            })
        );
    }

    #[test]
    fn examples_become_named_records() {
        let ep = endpoint(json!({
            "methods": {"POST": {
                "examples": {"curl": "curl -X POST", "python": "client.create()"}
            }}
        }));
        let method = format_method(&catalog(), &ep, "POST", "linodes.json").unwrap();
        let examples = method.examples.unwrap();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].name, "curl");
        assert_eq!(examples[1].value, json!("client.create()"));
    }

    #[test]
    fn absent_params_and_examples_stay_absent() {
        let ep = endpoint(json!({"methods": {"DELETE": {"money": false}}}));
        let method = format_method(&catalog(), &ep, "DELETE", "linodes.json").unwrap();
        assert!(method.params.is_none());
        assert!(method.examples.is_none());
        assert_eq!(method.extra["money"], json!(false));

        let value = serde_json::to_value(&method).unwrap();
        assert!(value.get("params").is_none());
        assert_eq!(value["name"], "DELETE");
    }

    #[test]
    fn method_description_anchor_stripped() {
        let ep = endpoint(json!({
            "methods": {"GET": {"description": "Returns a <a href=\"#kernel\">kernel</a>."}}
        }));
        let method = format_method(&catalog(), &ep, "GET", "kernels.json").unwrap();
        assert_eq!(
            method.description,
            Some(Description::Text("Returns a kernel.".into()))
        );
    }

    #[test]
    fn malformed_param_description_names_param() {
        let ep = endpoint(json!({
            "methods": {"POST": {"params": {"type": {"description": "x<ul><li>a</ul>"}}}}
        }));
        let err = format_method(&catalog(), &ep, "POST", "nodebalancers.json").unwrap_err();
        assert!(
            err.to_string()
                .contains("nodebalancers.json: POST params.type.description")
        );
    }

    #[test]
    fn missing_method_is_validation_error() {
        let ep = endpoint(json!({"methods": {}}));
        let err = format_method(&catalog(), &ep, "GET", "x.json").unwrap_err();
        assert!(matches!(err, ApiRefError::Validation { .. }));
    }
}
