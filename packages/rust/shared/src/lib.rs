//! Shared types, error model, and configuration for apiref.
//!
//! This crate is the foundation depended on by all other apiref crates.
//! It provides:
//! - [`ApiRefError`]: the unified error type
//! - Input and output types ([`EndpointRecord`], [`ResourceObject`], [`RouteCategory`], ...)
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, OutputConfig, PathsConfig, init_config, load_config,
    load_config_from,
};
pub use error::{ApiRefError, MarkupError, Result};
pub use types::{
    Description, EndpointRecord, FormattedEndpoint, FormattedMethod, FormattedParam, JsonMap,
    MethodDef, NamedExample, NormalizedField, NormalizedResource, ParamDef, ResourceObject,
    RouteCategory,
};
