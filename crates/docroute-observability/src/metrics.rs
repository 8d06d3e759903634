//! Metrics collection with Prometheus
//!
//! This module provides Prometheus metrics for DocRoute:
//! - Route resolution counts by outcome
//! - Ascent depth and resolution latency histograms
//! - Bulk rebuild document counts and duration

use prometheus::{CounterVec, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Outcome label of a single route resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Resolved,
    Unroutable,
    NotFound,
    Error,
}

impl ResolutionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resolved => "resolved",
            Self::Unroutable => "unroutable",
            Self::NotFound => "not_found",
            Self::Error => "error",
        }
    }
}

/// Outcome label of one document/culture/draft combination during a rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildOutcome {
    Persisted,
    Unroutable,
    Failed,
}

impl RebuildOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Persisted => "persisted",
            Self::Unroutable => "unroutable",
            Self::Failed => "failed",
        }
    }
}

/// Metrics collector for DocRoute
#[derive(Clone)]
pub struct Metrics {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Route resolutions by outcome
    pub route_resolutions_total: CounterVec,
    /// Number of segments collected per successful resolution
    pub route_ascent_depth: Histogram,
    /// Resolution latency
    pub route_resolution_duration_seconds: Histogram,

    /// Rebuild results per document/culture/draft combination
    pub rebuild_documents_total: CounterVec,
    /// Wall-clock duration of full rebuilds
    pub rebuild_duration_seconds: Histogram,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let route_resolutions_total = CounterVec::new(
            Opts::new(
                "docroute_route_resolutions_total",
                "Total number of route resolutions",
            ),
            &["outcome"],
        )?;

        let route_ascent_depth = Histogram::with_opts(
            HistogramOpts::new(
                "docroute_route_ascent_depth",
                "Segments collected while ascending the content tree",
            )
            .buckets(vec![1.0, 2.0, 3.0, 4.0, 6.0, 8.0, 12.0, 16.0, 32.0]),
        )?;

        let route_resolution_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "docroute_route_resolution_duration_seconds",
                "Route resolution duration in seconds",
            )
            .buckets(vec![0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.5]),
        )?;

        let rebuild_documents_total = CounterVec::new(
            Opts::new(
                "docroute_rebuild_documents_total",
                "Document/culture/draft combinations processed by rebuilds",
            ),
            &["outcome"],
        )?;

        let rebuild_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "docroute_rebuild_duration_seconds",
                "Full URL rebuild duration in seconds",
            )
            .buckets(vec![0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0, 900.0]),
        )?;

        registry.register(Box::new(route_resolutions_total.clone()))?;
        registry.register(Box::new(route_ascent_depth.clone()))?;
        registry.register(Box::new(route_resolution_duration_seconds.clone()))?;
        registry.register(Box::new(rebuild_documents_total.clone()))?;
        registry.register(Box::new(rebuild_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            route_resolutions_total,
            route_ascent_depth,
            route_resolution_duration_seconds,
            rebuild_documents_total,
            rebuild_duration_seconds,
        })
    }

    /// Get the Prometheus registry for exporting metrics
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record one route resolution
    pub fn record_resolution(&self, outcome: ResolutionOutcome, depth: usize, duration_secs: f64) {
        self.route_resolutions_total
            .with_label_values(&[outcome.as_str()])
            .inc();
        self.route_resolution_duration_seconds.observe(duration_secs);
        if outcome == ResolutionOutcome::Resolved {
            self.route_ascent_depth.observe(depth as f64);
        }
    }

    /// Record one rebuilt document/culture/draft combination
    pub fn record_rebuild_document(&self, outcome: RebuildOutcome) {
        self.rebuild_documents_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    /// Record a finished rebuild
    pub fn record_rebuild(&self, duration_secs: f64) {
        self.rebuild_duration_seconds.observe(duration_secs);
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}
