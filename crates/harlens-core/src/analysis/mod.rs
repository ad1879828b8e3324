mod extract;
mod search;
mod traffic;

pub use extract::extract;
pub use search::RecordQuery;
pub use traffic::TrafficAnalyzer;

use crate::har::HarDocument;
use serde::{Deserialize, Serialize};

/// Requests slower than this many milliseconds count as slow
pub const SLOW_REQUEST_THRESHOLD_MS: f64 = 1000.0;

/// Responses with a status at or above this value count as failed
pub const ERROR_STATUS_THRESHOLD: i64 = 400;

/// Normalized view of a single HAR entry.
///
/// Every field has a default (empty string, zero) used when the entry omits
/// it or carries a value of the wrong type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummary {
    pub method: String,
    pub url: String,
    pub status: i64,
    pub status_text: String,
    /// Total round-trip time in milliseconds
    pub time: f64,
    /// Response content size in bytes
    pub size: u64,
    pub started_date_time: String,
    #[serde(alias = "xTraceId")]
    pub trace_id: String,
    pub external_trace_id: String,
    pub request_body: String,
    pub response_body: String,
}

/// Outcome of a single analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    total_requests: usize,
    failed_requests: usize,
    slow_requests: usize,
    total_load_time: f64,
    total_size: u64,
    failed_requests_list: Vec<EntrySummary>,
    slow_requests_list: Vec<EntrySummary>,
    success_requests_list: Vec<EntrySummary>,
}

impl AnalysisResult {
    pub fn total_requests(&self) -> usize {
        self.total_requests
    }

    pub fn failed_requests(&self) -> usize {
        self.failed_requests
    }

    pub fn slow_requests(&self) -> usize {
        self.slow_requests
    }

    /// Sum of every entry's elapsed time in milliseconds, failed ones included
    pub fn total_load_time(&self) -> f64 {
        self.total_load_time
    }

    /// Sum of every entry's response content size in bytes
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn failed(&self) -> &[EntrySummary] {
        &self.failed_requests_list
    }

    /// Successful requests that exceeded the slow threshold. Each of these
    /// also appears in [`AnalysisResult::successful`].
    pub fn slow(&self) -> &[EntrySummary] {
        &self.slow_requests_list
    }

    pub fn successful(&self) -> &[EntrySummary] {
        &self.success_requests_list
    }
}

/// Classification limits applied by [`TrafficAnalyzer`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// A successful request strictly slower than this is slow
    pub slow_ms: f64,
    /// A status at or above this is a failure
    pub error_status: i64,
}

impl Thresholds {
    pub fn is_failure(&self, status: i64) -> bool {
        status >= self.error_status
    }

    pub fn is_slow(&self, time_ms: f64) -> bool {
        time_ms > self.slow_ms
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            slow_ms: SLOW_REQUEST_THRESHOLD_MS,
            error_status: ERROR_STATUS_THRESHOLD,
        }
    }
}

pub trait Analyzer {
    type Output;

    fn analyze(&self, har: &HarDocument) -> crate::Result<Self::Output>;
}
