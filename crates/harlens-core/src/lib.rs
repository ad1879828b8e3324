pub mod analysis;
pub mod error;
pub mod har;

pub use error::{Error, Result};

use analysis::{AnalysisResult, Analyzer, TrafficAnalyzer};
use har::HarReader;

/// Parse a HAR document and analyze it with the default thresholds
pub fn analyze_str(content: &str) -> Result<AnalysisResult> {
    let har = HarReader::from_str(content)?;
    TrafficAnalyzer::default().analyze(&har)
}
