use super::{AnalysisResult, Analyzer, EntrySummary, Thresholds, extract};
use crate::Result;
use crate::har::{HarDocument, HarReader};

/// Classifies every entry of a HAR log as failed or successful, flags slow
/// successes, and totals time and size across the whole log.
#[derive(Debug, Clone, Default)]
pub struct TrafficAnalyzer {
    thresholds: Thresholds,
}

impl TrafficAnalyzer {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }
}

impl Analyzer for TrafficAnalyzer {
    type Output = AnalysisResult;

    fn analyze(&self, har: &HarDocument) -> Result<Self::Output> {
        tracing::debug!("Analyzing HAR traffic");

        let entries = HarReader::entries(har)?;

        let mut tally = Tally::default();
        for entry in entries {
            tally.record(extract(entry), &self.thresholds);
        }

        let result = tally.finish();

        tracing::info!(
            "Traffic analysis complete: {} requests, {} failed, {} slow",
            result.total_requests,
            result.failed_requests,
            result.slow_requests
        );

        Ok(result)
    }
}

/// Running totals for one analysis pass
#[derive(Default)]
struct Tally {
    total: usize,
    failed: usize,
    slow: usize,
    total_time: f64,
    total_size: u64,
    failed_list: Vec<EntrySummary>,
    slow_list: Vec<EntrySummary>,
    success_list: Vec<EntrySummary>,
}

impl Tally {
    fn record(&mut self, summary: EntrySummary, thresholds: &Thresholds) {
        self.total += 1;
        self.total_time += summary.time;
        self.total_size = self.total_size.saturating_add(summary.size);

        if thresholds.is_failure(summary.status) {
            self.failed += 1;
            self.failed_list.push(summary);
            return;
        }

        if thresholds.is_slow(summary.time) {
            self.slow += 1;
            self.slow_list.push(summary.clone());
        }
        self.success_list.push(summary);
    }

    fn finish(self) -> AnalysisResult {
        AnalysisResult {
            total_requests: self.total,
            failed_requests: self.failed,
            slow_requests: self.slow,
            total_load_time: self.total_time,
            total_size: self.total_size,
            failed_requests_list: self.failed_list,
            slow_requests_list: self.slow_list,
            success_requests_list: self.success_list,
        }
    }
}
