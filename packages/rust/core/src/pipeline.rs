//! End-to-end build: endpoint files + object catalog → generated module.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, instrument, warn};

use apiref_shared::{AppConfig, EndpointRecord, Result, RouteCategory};

use crate::catalog::ObjectCatalog;
use crate::input::{display_name, list_json_files, read_json};
use crate::output::{content_hash, read_existing, render_module, write_atomic};
use crate::routes::{Category, Diagnostic, RouteAggregator};

/// Progress callback for reporting build status.
pub trait BuildProgress: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each endpoint file is read and routed.
    fn endpoint_loaded(&self, file: &str, current: usize, total: usize);
    /// Called when the module has been written.
    fn done(&self, report: &BuildReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl BuildProgress for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn endpoint_loaded(&self, _file: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &BuildReport) {}
}

/// The module text and the data it was rendered from, before writing.
#[derive(Debug, Clone)]
pub struct Generated {
    pub content: String,
    pub categories: Vec<RouteCategory>,
    pub diagnostics: Vec<Diagnostic>,
    pub files_read: usize,
}

/// Result of a successful `build`.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Where the module was written.
    pub output_path: PathBuf,
    /// Number of endpoint files read.
    pub files_read: usize,
    /// Top-level endpoints per category, in output order.
    pub routed: Vec<(String, usize)>,
    /// Endpoints that matched no category.
    pub dropped: Vec<Diagnostic>,
    /// SHA-256 of the written module.
    pub sha256: String,
    /// Whether the module differs from what was on disk before.
    pub changed: bool,
    pub elapsed: std::time::Duration,
}

/// Outcome of `check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The module on disk matches a fresh build.
    UpToDate { sha256: String },
    /// The module on disk differs from a fresh build.
    Stale { expected: String, actual: String },
    /// No module has been generated yet.
    Missing,
}

/// Read every input and render the module in memory.
#[instrument(skip_all, fields(endpoints = %config.endpoints_path().display()))]
pub fn generate(config: &AppConfig, progress: &dyn BuildProgress) -> Result<Generated> {
    progress.phase("Loading object catalog");
    let catalog = ObjectCatalog::load(&config.objects_path())?;

    progress.phase("Formatting endpoints");
    let files = list_json_files(&config.endpoints_path())?;
    let mut aggregator = RouteAggregator::new(&catalog, config.output.route_base_path.as_str());

    for (i, file) in files.iter().enumerate() {
        let name = display_name(file);
        let record: EndpointRecord = read_json(file)?;
        aggregator.add(&name, &record)?;
        progress.endpoint_loaded(&name, i + 1, files.len());
    }

    progress.phase("Nesting child endpoints");
    let aggregated = aggregator.finish()?;
    let content = render_module(&aggregated.categories)?;

    Ok(Generated {
        content,
        categories: aggregated.categories,
        diagnostics: aggregated.diagnostics,
        files_read: files.len(),
    })
}

/// Run the full build and write the module.
#[instrument(skip_all)]
pub fn build(config: &AppConfig, progress: &dyn BuildProgress) -> Result<BuildReport> {
    let start = Instant::now();
    let output_path = config.output_path();

    let generated = generate(config, progress)?;
    let sha256 = content_hash(&generated.content);

    progress.phase("Writing module");
    let previous = read_existing(&output_path)?;
    let changed = previous.as_deref() != Some(generated.content.as_str());
    write_atomic(&output_path, &generated.content)?;

    let routed = Category::ALL
        .iter()
        .zip(&generated.categories)
        .map(|(category, bucket)| (category.name().to_string(), bucket.formatted_endpoints.len()))
        .collect();

    for diagnostic in &generated.diagnostics {
        warn!(%diagnostic, "endpoint not included in output");
    }

    let report = BuildReport {
        output_path,
        files_read: generated.files_read,
        routed,
        dropped: generated.diagnostics,
        sha256,
        changed,
        elapsed: start.elapsed(),
    };

    info!(
        path = %report.output_path.display(),
        files = report.files_read,
        dropped = report.dropped.len(),
        changed = report.changed,
        "build complete"
    );
    progress.done(&report);

    Ok(report)
}

/// Build in memory and compare with the module on disk, without writing.
#[instrument(skip_all)]
pub fn check(config: &AppConfig, progress: &dyn BuildProgress) -> Result<CheckOutcome> {
    let generated = generate(config, progress)?;
    let expected = content_hash(&generated.content);

    let outcome = match read_existing(&config.output_path())? {
        None => CheckOutcome::Missing,
        Some(existing) => {
            let actual = content_hash(&existing);
            if actual == expected {
                CheckOutcome::UpToDate { sha256: actual }
            } else {
                CheckOutcome::Stale { expected, actual }
            }
        }
    };

    info!(?outcome, "check complete");
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
