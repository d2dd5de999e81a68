// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    REGISTRY,
    TRANSLATE_CALLS,
    PROVIDER_REQUEST_DURATION,
    MASK_RULES_DROPPED,
    TARGET_REWRITES,
};

/// Helper to record the outcome of one `translate` call
pub fn record_translate(provider: &str, success: bool) {
    let outcome = if success { "success" } else { "error" };
    TRANSLATE_CALLS.with_label_values(&[provider, outcome]).inc();
}

/// Helper to record one provider round trip
pub fn record_provider_request(provider: &str, duration_secs: f64) {
    PROVIDER_REQUEST_DURATION
        .with_label_values(&[provider])
        .observe(duration_secs);
}

/// Helper to record an ignore pattern that could not be compiled
pub fn record_mask_rule_dropped(kind: &str) {
    MASK_RULES_DROPPED.with_label_values(&[kind]).inc();
}

/// Helper to record a target code rewrite (e.g. `en` -> `en-us`)
pub fn record_target_rewrite(provider: &str, from: &str, to: &str) {
    TARGET_REWRITES.with_label_values(&[provider, from, to]).inc();
}
