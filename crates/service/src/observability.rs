use std::time::Duration;

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter_vec, Encoder, Histogram, IntCounterVec, TextEncoder,
};

use crate::consistency::ExistenceCheck;

// Prometheus metrics (default registry)
pub static EXISTENCE_CHECKS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "catalog_existence_checks_total",
        "Book existence checks issued to the book registry, by outcome",
        &["outcome"]
    )
    .expect("register existence_checks_total")
});

pub static EXISTENCE_CHECK_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "catalog_existence_check_duration_seconds",
        "Round-trip time of book existence checks in seconds",
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("register existence_check_duration")
});

pub static BLOCKED_MUTATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "catalog_blocked_mutations_total",
        "Mutations refused because the referenced book was not confirmed",
        &["operation", "outcome"]
    )
    .expect("register blocked_mutations_total")
});

pub fn record_existence_check(outcome: ExistenceCheck, elapsed: Duration) {
    EXISTENCE_CHECKS_TOTAL.with_label_values(&[outcome.as_label()]).inc();
    EXISTENCE_CHECK_DURATION.observe(elapsed.as_secs_f64());
}

pub fn record_blocked_mutation(operation: &str, outcome: ExistenceCheck) {
    BLOCKED_MUTATIONS_TOTAL.with_label_values(&[operation, outcome.as_label()]).inc();
}

/// Default registry in the Prometheus text exposition format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_checks_show_up_in_exposition() {
        record_existence_check(ExistenceCheck::DependencyUnavailable, Duration::from_millis(3));
        let text = encode_metrics().unwrap();
        assert!(text.contains("catalog_existence_checks_total"));
        assert!(text.contains(r#"outcome="dependency_unavailable""#));
    }
}
