//! Route aggregation: buckets formatted endpoints into the fixed top-level
//! documentation sections and expands nested child endpoints.

use std::fmt;

use tracing::{debug, instrument, warn};

use apiref_shared::{EndpointRecord, FormattedEndpoint, Result, RouteCategory};

use crate::catalog::ObjectCatalog;
use crate::endpoint::format_endpoint;

// ---------------------------------------------------------------------------
// Categories and rules
// ---------------------------------------------------------------------------

/// A top-level documentation section, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Linodes,
    Domains,
    NodeBalancers,
    Networking,
    Regions,
    Support,
    Account,
}

impl Category {
    /// Every category, in output order.
    pub const ALL: [Category; 7] = [
        Category::Linodes,
        Category::Domains,
        Category::NodeBalancers,
        Category::Networking,
        Category::Regions,
        Category::Support,
        Category::Account,
    ];

    /// Heading shown by the site generator.
    pub fn name(self) -> &'static str {
        match self {
            Category::Linodes => "Linodes",
            Category::Domains => "Domains",
            Category::NodeBalancers => "NodeBalancers",
            Category::Networking => "Networking",
            Category::Regions => "Regions",
            Category::Support => "Support",
            Category::Account => "Account",
        }
    }

    /// Section path, relative to the route base.
    pub fn path(self) -> &'static str {
        match self {
            Category::Linodes => "/linode",
            Category::Domains => "/domains",
            Category::NodeBalancers => "/nodebalancers",
            Category::Networking => "/networking",
            Category::Regions => "/regions",
            Category::Support => "/support",
            Category::Account => "/account",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps an endpoint path prefix to its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub prefix: &'static str,
    pub category: Category,
}

/// Prefix rules, checked in order. Support endpoints live under
/// `/support/tickets`, so that rule only matches the two-segment prefix.
pub static ROUTE_RULES: [RouteRule; 7] = [
    RouteRule {
        prefix: "/linode",
        category: Category::Linodes,
    },
    RouteRule {
        prefix: "/domains",
        category: Category::Domains,
    },
    RouteRule {
        prefix: "/nodebalancers",
        category: Category::NodeBalancers,
    },
    RouteRule {
        prefix: "/networking",
        category: Category::Networking,
    },
    RouteRule {
        prefix: "/regions",
        category: Category::Regions,
    },
    RouteRule {
        prefix: "/support/tickets",
        category: Category::Support,
    },
    RouteRule {
        prefix: "/account",
        category: Category::Account,
    },
];

/// Split `base_path` into its one-segment and two-segment prefixes.
///
/// `/account/settings` gives `("/account", Some("/account/settings"))`.
pub fn path_prefixes(base_path: &str) -> (String, Option<String>) {
    let mut segments = base_path.split('/').skip(1);
    let base = format!("/{}", segments.next().unwrap_or_default());
    let alt = segments.next().map(|second| format!("{base}/{second}"));
    (base, alt)
}

/// Find the rule for `base_path`: the one-segment prefix is tried against
/// every rule first, then the two-segment prefix.
pub fn match_route(base_path: &str) -> Option<&'static RouteRule> {
    let (base, alt) = path_prefixes(base_path);
    let exact = |prefix: &str| ROUTE_RULES.iter().find(|rule| rule.prefix == prefix);

    exact(&base).or_else(|| alt.as_deref().and_then(exact))
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// An endpoint that was dropped because no category matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Input file the endpoint came from.
    pub source: String,
    /// The endpoint's `base_path`, if it had one.
    pub base_path: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.message)
    }
}

/// The finished section tree plus any dropped-endpoint diagnostics.
#[derive(Debug, Clone)]
pub struct Aggregated {
    pub categories: Vec<RouteCategory>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Accumulates endpoint records into the seven fixed categories.
pub struct RouteAggregator<'a> {
    catalog: &'a ObjectCatalog,
    route_base_path: String,
    buckets: Vec<RouteCategory>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> RouteAggregator<'a> {
    pub fn new(catalog: &'a ObjectCatalog, route_base_path: impl Into<String>) -> Self {
        let route_base_path = route_base_path.into();
        let buckets = Category::ALL
            .iter()
            .map(|category| RouteCategory {
                name: category.name().to_string(),
                path: category.path().to_string(),
                route_path: format!("{route_base_path}{}", category.path()),
                formatted_endpoints: Vec::new(),
            })
            .collect();

        Self {
            catalog,
            route_base_path,
            buckets,
            diagnostics: Vec::new(),
        }
    }

    /// Format `record`, expand its nested children, and add it to its category.
    ///
    /// Returns the category it landed in, or `None` if it was dropped (a
    /// [`Diagnostic`] is recorded). Formatting errors are fatal.
    pub fn add(&mut self, source: &str, record: &EndpointRecord) -> Result<Option<Category>> {
        let Some(base_path) = record.base_path.as_deref() else {
            self.drop_record(source, None, "endpoint has no base_path".to_string());
            return Ok(None);
        };

        let Some(rule) = match_route(base_path) else {
            let (base, _) = path_prefixes(base_path);
            self.drop_record(
                source,
                Some(base_path),
                format!("no route category matches {base}"),
            );
            return Ok(None);
        };

        let context = format!("{source} {base_path}");
        let mut formatted = format_endpoint(self.catalog, record, Some(rule.prefix), &context)?;
        self.nest_children(&mut formatted, &context)?;

        if rule.category == Category::Account && formatted.name.as_deref() == Some("Account") {
            // The section heading already says "Account".
            formatted.name = Some(String::new());
        }

        debug!(source, base_path, category = %rule.category, "routed endpoint");
        self.buckets[rule.category.index()]
            .formatted_endpoints
            .push(formatted);
        Ok(Some(rule.category))
    }

    /// Return the finished tree.
    #[instrument(skip_all)]
    pub fn finish(self) -> Result<Aggregated> {
        debug!(dropped = self.diagnostics.len(), "aggregation finished");
        Ok(Aggregated {
            categories: self.buckets,
            diagnostics: self.diagnostics,
        })
    }

    /// Format `endpoint`'s raw children into its `formattedEndpoints`, at any depth.
    ///
    /// `context` locates the parent (input file and path chain) for error messages.
    fn nest_children(&self, endpoint: &mut FormattedEndpoint, context: &str) -> Result<()> {
        let base = &self.route_base_path;
        let children = std::mem::take(&mut endpoint.endpoints);
        for (child_path, child) in &children {
            let context = format!("{context} > {child_path}");
            let mut formatted = format_endpoint(self.catalog, child, Some(child_path), &context)?;
            formatted.route_path = Some(format!("{base}/endpoints/{child_path}"));
            self.nest_children(&mut formatted, &context)?;
            endpoint.formatted_endpoints.push(formatted);
        }
        Ok(())
    }

    fn drop_record(&mut self, source: &str, base_path: Option<&str>, message: String) {
        warn!(source, base_path, "{message}; endpoint dropped");
        self.diagnostics.push(Diagnostic {
            source: source.to_string(),
            base_path: base_path.map(String::from),
            message,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
