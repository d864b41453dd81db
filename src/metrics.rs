//! Metrics recording for upstream calls and inbound API traffic.
//!
//! Upstream clients receive a [`MetricsRecorder`] at construction and open a
//! [`SampleGuard`] per upstream call, which records exactly one sample whether
//! the call completes or is dropped midway. Every sample is
//! forwarded to the `metrics` facade (so whichever exporter the binary installs
//! sees it) and also accumulated per `(repository, operation, status_code)`
//! series inside the recorder instance, which keeps the numbers observable
//! without a process-wide registry.
//!
//! Provided metrics:
//! * `service_request_duration_seconds` (histogram; repository, operation)
//! * `service_request_total` (counter; repository, operation, status_code)
//! * `service_request_errors_total` (counter; repository, operation, status_code)
//! * `service_in_flight_requests` (gauge; repository)
//! * `api_requests_total` (counter; method, path)
//! * `api_request_duration_seconds` (histogram; method, path)
//! * `api_requests_errors_total` (counter; method, path, status)
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use metrics::{
    Unit, counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

pub const SERVICE_REQUEST_DURATION_SECONDS: &str = "service_request_duration_seconds";
pub const SERVICE_REQUEST_TOTAL: &str = "service_request_total";
pub const SERVICE_REQUEST_ERRORS_TOTAL: &str = "service_request_errors_total";
pub const SERVICE_IN_FLIGHT_REQUESTS: &str = "service_in_flight_requests";
pub const API_REQUESTS_TOTAL: &str = "api_requests_total";
pub const API_REQUEST_DURATION_SECONDS: &str = "api_request_duration_seconds";
pub const API_REQUESTS_ERRORS_TOTAL: &str = "api_requests_errors_total";

static DESCRIPTIONS: Lazy<()> = Lazy::new(|| {
    describe_histogram!(
        SERVICE_REQUEST_DURATION_SECONDS,
        Unit::Seconds,
        "Latency of requests sent to upstream services."
    );
    describe_counter!(
        SERVICE_REQUEST_TOTAL,
        Unit::Count,
        "Total number of requests sent to upstream services."
    );
    describe_counter!(
        SERVICE_REQUEST_ERRORS_TOTAL,
        Unit::Count,
        "Total number of failed upstream requests."
    );
    describe_gauge!(
        SERVICE_IN_FLIGHT_REQUESTS,
        "Number of upstream requests currently awaiting a response."
    );
    describe_counter!(
        API_REQUESTS_TOTAL,
        Unit::Count,
        "Total number of HTTP requests received by the gateway."
    );
    describe_histogram!(
        API_REQUEST_DURATION_SECONDS,
        Unit::Seconds,
        "Latency of HTTP requests handled by the gateway."
    );
    describe_counter!(
        API_REQUESTS_ERRORS_TOTAL,
        Unit::Count,
        "Gateway HTTP responses with a 4xx or 5xx status."
    );
});

/// Register metric descriptions (idempotent).
pub fn describe_metrics() {
    Lazy::force(&DESCRIPTIONS);
}

/// Install the Prometheus recorder as the global `metrics` recorder and return
/// the handle used to render the `/metrics` endpoint.
pub fn init_metrics() -> eyre::Result<PrometheusHandle> {
    tracing::info!("Initializing gateway metrics system");

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus recorder: {e}"))?;
    describe_metrics();

    tracing::info!("Gateway metrics system initialized successfully");
    Ok(handle)
}

/// One upstream call outcome. `status_code` is 0 when no response arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub repository: String,
    pub operation: String,
    pub status_code: u16,
    pub duration: Duration,
    pub error: bool,
}

/// Label combination of an accumulated series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub repository: String,
    pub operation: String,
    pub status_code: u16,
}

/// Running totals for one series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SeriesStats {
    pub count: u64,
    pub errors: u64,
    pub total_duration: Duration,
}

/// Point-in-time copy of every accumulated series and in-flight count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub series: HashMap<SeriesKey, SeriesStats>,
    pub in_flight: HashMap<String, i64>,
}

impl MetricsSnapshot {
    pub fn total_samples(&self) -> u64 {
        self.series.values().map(|stats| stats.count).sum()
    }
}

#[derive(Default)]
struct RecorderState {
    series: Mutex<HashMap<SeriesKey, SeriesStats>>,
    in_flight: Mutex<HashMap<String, i64>>,
}

/// Shared, cheaply cloneable metrics registry for upstream calls.
#[derive(Clone, Default)]
pub struct MetricsRecorder {
    state: Arc<RecorderState>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        describe_metrics();
        Self::default()
    }

    /// Record one completed upstream call. Safe with `status_code == 0`.
    pub fn measure(
        &self,
        repository: &str,
        operation: &str,
        start: Instant,
        status_code: u16,
        error: bool,
    ) {
        self.record(&MetricSample {
            repository: repository.to_string(),
            operation: operation.to_string(),
            status_code,
            duration: start.elapsed(),
            error,
        });
    }

    pub fn record(&self, sample: &MetricSample) {
        let status_label = sample.status_code.to_string();

        histogram!(
            SERVICE_REQUEST_DURATION_SECONDS,
            "repository" => sample.repository.clone(),
            "operation" => sample.operation.clone()
        )
        .record(sample.duration.as_secs_f64());
        counter!(
            SERVICE_REQUEST_TOTAL,
            "repository" => sample.repository.clone(),
            "operation" => sample.operation.clone(),
            "status_code" => status_label.clone()
        )
        .increment(1);
        if sample.error {
            counter!(
                SERVICE_REQUEST_ERRORS_TOTAL,
                "repository" => sample.repository.clone(),
                "operation" => sample.operation.clone(),
                "status_code" => status_label
            )
            .increment(1);
        }

        let key = SeriesKey {
            repository: sample.repository.clone(),
            operation: sample.operation.clone(),
            status_code: sample.status_code,
        };
        match self.state.series.lock() {
            Ok(mut series) => {
                let stats = series.entry(key).or_default();
                stats.count += 1;
                stats.total_duration += sample.duration;
                if sample.error {
                    stats.errors += 1;
                }
            }
            Err(_) => tracing::error!("Failed to acquire lock for upstream metric series"),
        }
    }

    /// Start timing one upstream call. The returned guard records exactly one
    /// sample: the outcome passed to [`SampleGuard::finish`], or status 0 with
    /// `error = true` if it is dropped unfinished.
    pub fn start_sample(&self, repository: &str, operation: &str) -> SampleGuard {
        SampleGuard {
            recorder: self.clone(),
            repository: repository.to_string(),
            operation: operation.to_string(),
            start: Instant::now(),
            finished: false,
        }
    }

    /// Mark one upstream call as in flight until the returned guard drops.
    pub fn track_in_flight(&self, repository: &str) -> InFlightGuard {
        self.adjust_in_flight(repository, 1);
        InFlightGuard {
            recorder: self.clone(),
            repository: repository.to_string(),
        }
    }

    fn adjust_in_flight(&self, repository: &str, delta: i64) {
        gauge!(SERVICE_IN_FLIGHT_REQUESTS, "repository" => repository.to_string())
            .increment(delta as f64);

        match self.state.in_flight.lock() {
            Ok(mut in_flight) => {
                *in_flight.entry(repository.to_string()).or_insert(0) += delta;
            }
            Err(_) => tracing::error!("Failed to acquire lock for in-flight gauges"),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            series: self
                .state
                .series
                .lock()
                .map(|series| series.clone())
                .unwrap_or_default(),
            in_flight: self
                .state
                .in_flight
                .lock()
                .map(|in_flight| in_flight.clone())
                .unwrap_or_default(),
        }
    }

    /// Current in-flight count for a repository.
    pub fn in_flight(&self, repository: &str) -> i64 {
        self.state
            .in_flight
            .lock()
            .map(|in_flight| in_flight.get(repository).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Totals of one series, if any sample was recorded for it.
    pub fn series(&self, repository: &str, operation: &str, status_code: u16) -> Option<SeriesStats> {
        let key = SeriesKey {
            repository: repository.to_string(),
            operation: operation.to_string(),
            status_code,
        };
        self.state
            .series
            .lock()
            .ok()
            .and_then(|series| series.get(&key).copied())
    }

    /// Number of samples recorded for an operation across all status codes.
    pub fn sample_count(&self, repository: &str, operation: &str) -> u64 {
        self.state
            .series
            .lock()
            .map(|series| {
                series
                    .iter()
                    .filter(|(key, _)| key.repository == repository && key.operation == operation)
                    .map(|(_, stats)| stats.count)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Number of samples recorded across every series.
    pub fn total_samples(&self) -> u64 {
        self.state
            .series
            .lock()
            .map(|series| series.values().map(|stats| stats.count).sum())
            .unwrap_or(0)
    }
}

/// RAII guard keeping the in-flight gauge raised for the lifetime of an
/// upstream call, released on every exit path.
pub struct InFlightGuard {
    recorder: MetricsRecorder,
    repository: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.recorder.adjust_in_flight(&self.repository, -1);
    }
}

/// Pending sample for one upstream call.
pub struct SampleGuard {
    recorder: MetricsRecorder,
    repository: String,
    operation: String,
    start: Instant,
    finished: bool,
}

impl SampleGuard {
    /// Record the call outcome. `status_code` is 0 when no response arrived.
    pub fn finish(mut self, status_code: u16, error: bool) {
        self.finished = true;
        self.recorder
            .measure(&self.repository, &self.operation, self.start, status_code, error);
    }
}

impl Drop for SampleGuard {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(
                repository = %self.repository,
                operation = %self.operation,
                "Upstream call cancelled before completion"
            );
            self.recorder
                .measure(&self.repository, &self.operation, self.start, 0, true);
        }
    }
}

/// Record a handled inbound request.
pub fn record_api_request(method: &str, path: &str, status: u16, duration: Duration) {
    counter!(
        API_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .increment(1);
    histogram!(
        API_REQUEST_DURATION_SECONDS,
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration.as_secs_f64());

    if status >= 400 {
        counter!(
            API_REQUESTS_ERRORS_TOTAL,
            "method" => method.to_string(),
            "path" => path.to_string(),
            "status" => status.to_string()
        )
        .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_accumulates_per_series() {
        let recorder = MetricsRecorder::new();
        let start = Instant::now();

        recorder.measure("catalog", "FetchLiquors", start, 200, false);
        recorder.measure("catalog", "FetchLiquors", start, 200, false);
        recorder.measure("catalog", "FetchLiquors", start, 404, true);

        let ok = recorder.series("catalog", "FetchLiquors", 200).unwrap();
        assert_eq!(ok.count, 2);
        assert_eq!(ok.errors, 0);

        let missing = recorder.series("catalog", "FetchLiquors", 404).unwrap();
        assert_eq!(missing.count, 1);
        assert_eq!(missing.errors, 1);

        assert_eq!(recorder.sample_count("catalog", "FetchLiquors"), 3);
        assert_eq!(recorder.total_samples(), 3);
    }

    #[test]
    fn test_measure_accepts_zero_status() {
        let recorder = MetricsRecorder::new();
        recorder.measure("auth", "Verify", Instant::now(), 0, true);

        let stats = recorder.series("auth", "Verify", 0).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn test_in_flight_guard_releases_on_drop() {
        let recorder = MetricsRecorder::new();

        let first = recorder.track_in_flight("posts");
        let second = recorder.track_in_flight("posts");
        assert_eq!(recorder.in_flight("posts"), 2);

        drop(first);
        assert_eq!(recorder.in_flight("posts"), 1);
        drop(second);
        assert_eq!(recorder.in_flight("posts"), 0);
    }

    #[test]
    fn test_finished_sample_is_recorded_once() {
        let recorder = MetricsRecorder::new();

        recorder.start_sample("catalog", "FetchLiquors").finish(200, false);

        assert_eq!(recorder.total_samples(), 1);
        assert_eq!(
            recorder.series("catalog", "FetchLiquors", 200).unwrap().errors,
            0
        );
    }

    #[test]
    fn test_dropped_sample_records_status_zero_error() {
        let recorder = MetricsRecorder::new();

        drop(recorder.start_sample("posts", "FetchPosts"));

        assert_eq!(recorder.total_samples(), 1);
        let stats = recorder.series("posts", "FetchPosts", 0).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn test_recorders_are_independent() {
        let a = MetricsRecorder::new();
        let b = MetricsRecorder::new();
        a.measure("ai", "CreateRecipe", Instant::now(), 200, false);

        assert_eq!(a.total_samples(), 1);
        assert_eq!(b.total_samples(), 0);
        assert_eq!(a.snapshot().total_samples(), 1);
        assert!(b.snapshot().series.is_empty());
    }

    #[test]
    fn test_record_api_request_without_exporter() {
        // The facade is a no-op when no recorder is installed.
        record_api_request("GET", "/liquors", 500, Duration::from_millis(3));
    }
}
