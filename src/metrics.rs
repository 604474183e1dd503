//! Performance counters for the scoring loop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for the scoring service
pub struct ScoringMetrics {
    /// Messages fully scored
    pub processed: AtomicU64,
    /// Messages skipped on a per-message error
    pub skipped: AtomicU64,
    /// Payloads that failed to deserialize
    pub malformed: AtomicU64,
    /// Per-message scoring times (in microseconds)
    scoring_times: RwLock<Vec<u64>>,
    /// Start time for throughput calculation
    start_time: Instant,
}

impl ScoringMetrics {
    pub fn new() -> Self {
        Self {
            processed: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            malformed: AtomicU64::new(0),
            scoring_times: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record one scored message
    pub fn record_scored(&self, scoring_time: Duration) {
        self.processed.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.scoring_times.write() {
            times.push(scoring_time.as_micros() as u64);
            // Keep only the most recent samples
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }
    }

    /// Record a skipped message (per-message scoring failure)
    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a payload that could not be parsed
    pub fn record_malformed(&self) {
        self.malformed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get scoring time statistics
    pub fn get_scoring_stats(&self) -> ScoringStats {
        let times = self.scoring_times.read().unwrap();
        if times.is_empty() {
            return ScoringStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ScoringStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (messages per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.processed.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let processed = self.processed.load(Ordering::Relaxed);
        let skipped = self.skipped.load(Ordering::Relaxed);
        let malformed = self.malformed.load(Ordering::Relaxed);
        let stats = self.get_scoring_stats();

        info!(
            processed = processed,
            skipped = skipped,
            malformed = malformed,
            throughput = format!("{:.1} msg/s", self.get_throughput()),
            mean_us = stats.mean_us,
            p50_us = stats.p50_us,
            p95_us = stats.p95_us,
            p99_us = stats.p99_us,
            "Scoring metrics summary"
        );
    }
}

impl Default for ScoringMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoring time statistics
#[derive(Debug, Default)]
pub struct ScoringStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Real-time metrics reporter that logs periodic summaries
pub struct MetricsReporter {
    metrics: std::sync::Arc<ScoringMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<ScoringMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
