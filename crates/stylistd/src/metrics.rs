//! Prometheus metrics for stylistd

use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, IntCounterVec, IntGauge, Registry,
    TextEncoder,
};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct StylistMetrics {
    pub turns_total: IntCounterVec,
    pub catalog_requests_total: IntCounterVec,
    pub catalog_backoff_seconds: Histogram,
    pub oracle_requests_total: IntCounterVec,
    pub active_sessions: IntGauge,

    registry: Arc<Registry>,
}

impl StylistMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let turns_total = register_int_counter_vec_with_registry!(
            "stylist_turns_total",
            "Conversation turns handled by action",
            &["action"],
            registry
        )?;

        let catalog_requests_total = register_int_counter_vec_with_registry!(
            "stylist_catalog_requests_total",
            "Catalog lookup attempts by status",
            &["status"],
            registry
        )?;

        let catalog_backoff_seconds = register_histogram_with_registry!(
            "stylist_catalog_backoff_seconds",
            "Backoff slept between catalog retries in seconds",
            vec![0.1, 0.2, 0.5, 1.0, 2.0, 5.0],
            registry
        )?;

        let oracle_requests_total = register_int_counter_vec_with_registry!(
            "stylist_oracle_requests_total",
            "Oracle consultations by result",
            &["result"],
            registry
        )?;

        let active_sessions = register_int_gauge_with_registry!(
            "stylist_active_sessions",
            "Outfit sessions held in memory",
            registry
        )?;

        Ok(Self {
            turns_total,
            catalog_requests_total,
            catalog_backoff_seconds,
            oracle_requests_total,
            active_sessions,
            registry: Arc::new(registry),
        })
    }

    pub fn record_turn(&self, action: &str) {
        self.turns_total.with_label_values(&[action]).inc();
    }

    pub fn record_catalog_request(&self, status: &str) {
        self.catalog_requests_total.with_label_values(&[status]).inc();
    }

    pub fn record_backoff_duration(&self, duration_secs: f64) {
        self.catalog_backoff_seconds.observe(duration_secs);
    }

    pub fn record_oracle(&self, result: &str) {
        self.oracle_requests_total.with_label_values(&[result]).inc();
    }

    pub fn set_active_sessions(&self, count: usize) {
        self.active_sessions.set(count as i64);
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            warn!("Failed to encode metrics: {}", e);
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_contains_recorded_values() {
        let metrics = StylistMetrics::new().unwrap();
        metrics.record_turn("new_outfit");
        metrics.record_turn("new_outfit");
        metrics.record_catalog_request("timeout");
        metrics.record_backoff_duration(0.2);
        metrics.set_active_sessions(3);

        let text = metrics.export();
        assert!(text.contains("stylist_turns_total{action=\"new_outfit\"} 2"));
        assert!(text.contains("stylist_catalog_requests_total{status=\"timeout\"} 1"));
        assert!(text.contains("stylist_active_sessions 3"));
        assert!(text.contains("stylist_catalog_backoff_seconds_count 1"));
    }

    #[test]
    fn test_instances_do_not_share_registry() {
        let a = StylistMetrics::new().unwrap();
        let b = StylistMetrics::new().unwrap();
        a.record_turn("greet");
        assert!(!b.export().contains("action=\"greet\""));
    }
}
