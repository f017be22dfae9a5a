use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{IntCounterVec, Opts, Registry};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
pub static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static BOOKING_LOOKUPS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static PAYMENT_LINKS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Install the HTTP metrics recorder and register the desk counters. Safe to call
/// more than once; later calls are no-ops.
pub fn init_metrics() -> anyhow::Result<()> {
    if METRICS_HANDLE.get().is_none() {
        let handle = PrometheusBuilder::new().install_recorder()?;
        let _ = METRICS_HANDLE.set(handle);
    }

    if PROMETHEUS_REGISTRY.get().is_some() {
        return Ok(());
    }

    let registry = Registry::new();

    let lookups = IntCounterVec::new(
        Opts::new(
            "booking_lookups_total",
            "Booking lookups by outcome (success, not_found, lookup_failed, network, ...)",
        ),
        &["outcome"],
    )?;

    let payment_links = IntCounterVec::new(
        Opts::new(
            "payment_links_total",
            "Payment link creations by outcome",
        ),
        &["outcome"],
    )?;

    registry.register(Box::new(lookups.clone()))?;
    registry.register(Box::new(payment_links.clone()))?;

    let _ = PROMETHEUS_REGISTRY.set(registry);
    let _ = BOOKING_LOOKUPS_TOTAL.set(lookups);
    let _ = PAYMENT_LINKS_TOTAL.set(payment_links);

    Ok(())
}

pub fn record_lookup(outcome: &str) {
    if let Some(counter) = BOOKING_LOOKUPS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn record_payment_link(outcome: &str) {
    if let Some(counter) = PAYMENT_LINKS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = PROMETHEUS_REGISTRY.get() {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        if let Ok(custom_metrics) = String::from_utf8(buffer) {
            output.push_str(&custom_metrics);
        }
    }

    output
}
