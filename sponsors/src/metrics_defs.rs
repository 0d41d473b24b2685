//! Metrics definitions for the sponsor cache.

use shared::metrics_defs::{MetricDef, MetricType};

pub const CACHE_REFRESH_DURATION: MetricDef = MetricDef {
    name: "cache.refresh.duration",
    metric_type: MetricType::Histogram,
    description: "Time to fetch the full sponsor list from the source in seconds",
};

pub const CACHE_REFRESH_FAILED: MetricDef = MetricDef {
    name: "cache.refresh.failed",
    metric_type: MetricType::Counter,
    description: "Number of cache refreshes that failed and left the previous list in place",
};

pub const CACHE_SPONSORS: MetricDef = MetricDef {
    name: "cache.sponsors",
    metric_type: MetricType::Gauge,
    description: "Number of sponsors in the current cache snapshot",
};

pub const ALL_METRICS: &[MetricDef] = &[CACHE_REFRESH_DURATION, CACHE_REFRESH_FAILED, CACHE_SPONSORS];
