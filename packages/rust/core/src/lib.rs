//! Core build logic for the API reference generator.
//!
//! This crate ties together object catalog loading, schema resolution,
//! endpoint formatting, and route aggregation into the end-to-end `build`
//! and `check` workflows.

pub mod catalog;
pub mod endpoint;
pub mod input;
pub mod method;
pub mod output;
pub mod pipeline;
pub mod routes;
pub mod schema;

pub use catalog::ObjectCatalog;
pub use pipeline::{
    BuildProgress, BuildReport, CheckOutcome, Generated, SilentProgress, build, check, generate,
};
pub use routes::{Category, Diagnostic};

use apiref_shared::JsonMap;

/// Clone `map` without `keys`.
///
/// Used where unknown input keys pass through to the output but must not
/// shadow a field the formatter sets itself.
pub(crate) fn without_keys(map: &JsonMap, keys: &[&str]) -> JsonMap {
    map.iter()
        .filter(|(key, _)| !keys.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn without_keys_keeps_order() {
        let value = json!({"b": 1, "path": 2, "a": 3});
        let map = value.as_object().cloned().unwrap();
        let kept = without_keys(&map, &["path"]);
        let keys: Vec<&str> = kept.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a"]);
    }
}
