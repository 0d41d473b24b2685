use shared::metrics_defs::{MetricDef, MetricType};

pub const REQUEST_DURATION: MetricDef = MetricDef {
    name: "request.duration",
    metric_type: MetricType::Histogram,
    description: "Request duration in seconds, including cache priming. Tagged with status.",
};

pub const ALL_METRICS: &[MetricDef] = &[REQUEST_DURATION];
