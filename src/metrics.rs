//! Fetch latency and reliability tracking
//!
//! Every market refresh, successful or not, is recorded so the dashboard can
//! report how the upstream API has been behaving.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::RwLock;

/// Maximum number of samples to keep for percentile calculation
const MAX_SAMPLES: usize = 100;

/// Point-in-time view of a provider's fetch history
#[derive(Debug, Clone)]
pub struct ProviderMetrics {
    /// Name of the provider
    pub provider_name: String,
    /// 50th percentile latency of successful fetches in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile latency of successful fetches in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate (0.0 to 1.0) over the lifetime of the collector
    pub success_rate: f64,
    pub total_requests: u64,
    pub failed_requests: u64,
    /// When the last successful fetch completed
    pub last_success_at: Option<DateTime<Utc>>,
    /// Error text of the most recent failure
    pub last_error: Option<String>,
}

impl ProviderMetrics {
    /// Creates metrics with no data
    pub fn empty(provider_name: &str) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
            success_rate: 1.0,
            total_requests: 0,
            failed_requests: 0,
            last_success_at: None,
            last_error: None,
        }
    }
}

#[derive(Debug, Default)]
struct MetricsWindow {
    /// Latencies of recent successful fetches, oldest first
    latencies_ms: VecDeque<f64>,
    total_requests: u64,
    failed_requests: u64,
    last_success_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Collects fetch outcomes for one provider
pub struct MetricsCollector {
    provider_name: String,
    window: RwLock<MetricsWindow>,
}

impl MetricsCollector {
    pub fn new(provider_name: &str) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            window: RwLock::new(MetricsWindow::default()),
        }
    }

    /// Records a successful fetch and how long it took
    pub async fn record_success(&self, duration: Duration) {
        let mut window = self.window.write().await;
        window.total_requests += 1;
        window.last_success_at = Some(Utc::now());

        if window.latencies_ms.len() >= MAX_SAMPLES {
            window.latencies_ms.pop_front();
        }
        window.latencies_ms.push_back(duration.as_secs_f64() * 1000.0);
    }

    /// Records a failed fetch
    pub async fn record_failure(&self, error: &str) {
        let mut window = self.window.write().await;
        window.total_requests += 1;
        window.failed_requests += 1;
        window.last_error = Some(error.to_string());
    }

    /// Computes current metrics from collected samples
    pub async fn get_metrics(&self) -> ProviderMetrics {
        let window = self.window.read().await;
        if window.total_requests == 0 {
            return ProviderMetrics::empty(&self.provider_name);
        }

        let mut latencies: Vec<f64> = window.latencies_ms.iter().copied().collect();
        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let total = window.total_requests;
        let failed = window.failed_requests;

        ProviderMetrics {
            provider_name: self.provider_name.clone(),
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            success_rate: (total - failed) as f64 / total as f64,
            total_requests: total,
            failed_requests: failed,
            last_success_at: window.last_success_at,
            last_error: window.last_error.clone(),
        }
    }
}

/// Calculate percentile from sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}
