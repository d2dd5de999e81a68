// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry, CounterVec,
    Encoder, HistogramVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // TRANSLATION METRICS
    // ============================================================================

    /// Total translate calls by provider and outcome
    pub static ref TRANSLATE_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("translate_calls_total", "Total translate calls"),
        &["provider", "outcome"], // outcome: success, error
        REGISTRY
    ).unwrap();

    /// Duration of single provider round trips
    pub static ref PROVIDER_REQUEST_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("provider_request_duration_seconds", "Provider round trip duration")
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["provider"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // PIPELINE DIAGNOSTICS
    // ============================================================================

    /// Ignore patterns that failed to compile and were dropped
    pub static ref MASK_RULES_DROPPED: CounterVec = register_counter_vec_with_registry!(
        Opts::new("mask_rules_dropped_total", "Ignore patterns dropped because they failed to compile"),
        &["kind"], // kind: unicode, regex
        REGISTRY
    ).unwrap();

    /// Target codes rewritten to a provider-accepted variant
    pub static ref TARGET_REWRITES: CounterVec = register_counter_vec_with_registry!(
        Opts::new("target_rewrites_total", "Target language codes rewritten before sending"),
        &["provider", "from", "to"],
        REGISTRY
    ).unwrap();
}

/// Gather all metrics and encode them in Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        TRANSLATE_CALLS.with_label_values(&["deepl", "success"]).inc();
        MASK_RULES_DROPPED.with_label_values(&["regex"]).inc();

        let metrics = gather_metrics();
        assert!(metrics.contains("translate_calls_total"));
        assert!(metrics.contains("mask_rules_dropped_total"));
    }
}
