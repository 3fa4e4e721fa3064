//! Endpoint formatting.

use apiref_shared::{ApiRefError, EndpointRecord, FormattedEndpoint, Result};

use crate::catalog::ObjectCatalog;
use crate::method::format_method;
use crate::without_keys;

/// Format one endpoint record into a new [`FormattedEndpoint`].
///
/// The record is only read; its raw child `endpoints` are carried over
/// unformatted for the route aggregator to expand. `path` becomes the
/// output `path` verbatim.
pub fn format_endpoint(
    catalog: &ObjectCatalog,
    record: &EndpointRecord,
    path: Option<&str>,
    context: &str,
) -> Result<FormattedEndpoint> {
    let description = apiref_markup::normalize_opt(record.description.as_deref())
        .map_err(|source| ApiRefError::markup(format!("{context}: description"), source))?;

    let methods = record
        .methods
        .keys()
        .map(|method| format_method(catalog, record, method, context))
        .collect::<Result<Vec<_>>>()?;

    Ok(FormattedEndpoint {
        base_path: record.base_path.clone(),
        name: record.name.clone(),
        description,
        resource: record.resource.clone(),
        path: path.map(String::from),
        route_path: None,
        methods,
        formatted_endpoints: record.formatted_endpoints.clone(),
        endpoints: record.endpoints.clone(),
        extra: without_keys(&record.extra, &["path", "routePath"]),
    })
}
