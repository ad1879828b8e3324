use crate::OutputFormat;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use harlens_core::analysis::{
    AnalysisResult, Analyzer, EntrySummary, RecordQuery, Thresholds, TrafficAnalyzer,
};
use harlens_core::har::HarReader;
use harlens_server::validate_upload;
use std::fs;
use std::path::Path;

/// Rendering options for the analyze command
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Only list records matching this text; totals are unaffected
    pub search: Option<String>,
    /// Print request and response bodies under each listed record
    pub show_bodies: bool,
    pub thresholds: Thresholds,
}

/// Read and analyze a HAR file, applying the same checks as the upload endpoint
pub fn analyze_har(file: &Path, thresholds: Thresholds) -> Result<AnalysisResult> {
    tracing::debug!("Reading HAR file: {}", file.display());

    let content =
        fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let filename = file.file_name().and_then(|name| name.to_str());
    validate_upload(filename, &content)?;

    let har = HarReader::from_slice(&content)?;
    let result = TrafficAnalyzer::new(thresholds).analyze(&har)?;

    Ok(result)
}

pub fn execute(file: &Path, options: &AnalyzeOptions, format: OutputFormat) -> Result<()> {
    tracing::info!(
        "Analyzing HAR file: {} (format: {})",
        file.display(),
        format.as_str()
    );

    let result = analyze_har(file, options.thresholds)?;

    match format {
        OutputFormat::Json => output_json(&result)?,
        OutputFormat::Table => output_table(&result, options),
        OutputFormat::Pretty => output_pretty(&result, options),
    }

    Ok(())
}

fn output_pretty(result: &AnalysisResult, options: &AnalyzeOptions) {
    use console::style;

    let query = RecordQuery::new(options.search.as_deref().unwrap_or_default());

    println!("\n{}", style("HAR Traffic Report").bold().cyan());
    println!("{}", style("==================").cyan());

    println!("\n{}", style("Summary:").bold());
    println!("  Total Requests:   {}", result.total_requests());
    println!("  Failed Requests:  {}", result.failed_requests());
    println!("  Slow Requests:    {}", result.slow_requests());
    println!("  Total Load Time:  {}", format_time(result.total_load_time()));
    println!("  Total Size:       {}", format_bytes(result.total_size()));

    if let Some(window) = capture_window(result) {
        println!(
            "  Capture Window:   {} to {} ({})",
            window.start, window.end, window.duration_display
        );
    }

    if !query.is_empty() {
        println!(
            "\n  Showing records matching {}",
            style(options.search.as_deref().unwrap_or_default()).yellow()
        );
    }

    print_section(
        &style("Failed Requests:").bold().red().to_string(),
        &query.filter(result.failed()),
        "No failed requests found.",
        options.show_bodies,
    );

    let slow_title = format!(
        "Slow Requests (>{}):",
        format_time(options.thresholds.slow_ms)
    );
    print_section(
        &style(slow_title).bold().yellow().to_string(),
        &query.filter(result.slow()),
        "No slow requests found.",
        options.show_bodies,
    );

    println!(); // trailing newline
}

fn print_section(title: &str, records: &[&EntrySummary], empty: &str, show_bodies: bool) {
    use console::style;

    println!("\n{}", title);
    if records.is_empty() {
        println!("  {}", style(empty).dim());
        return;
    }

    for (i, record) in records.iter().enumerate() {
        println!(
            "  {}. [{}] {} {} {} - {}",
            i + 1,
            format_time(record.time),
            record.method,
            record.status,
            record.status_text,
            record.url
        );
        if !record.started_date_time.is_empty() {
            println!("     Started:           {}", record.started_date_time);
        }
        if !record.trace_id.is_empty() {
            println!("     Trace ID:          {}", record.trace_id);
        }
        if !record.external_trace_id.is_empty() {
            println!("     External Trace ID: {}", record.external_trace_id);
        }
        if show_bodies {
            print_body("Request Body", &record.request_body);
            print_body("Response Body", &record.response_body);
        }
    }
}

fn print_body(label: &str, body: &str) {
    if body.is_empty() {
        return;
    }
    println!("     {}:", label);
    for line in body.lines() {
        println!("       {}", line);
    }
}

fn output_json(result: &AnalysisResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{}", json);
    Ok(())
}

fn output_table(result: &AnalysisResult, options: &AnalyzeOptions) {
    let query = RecordQuery::new(options.search.as_deref().unwrap_or_default());

    println!("Metric,Value");
    println!("Total Requests,{}", result.total_requests());
    println!("Failed Requests,{}", result.failed_requests());
    println!("Slow Requests,{}", result.slow_requests());
    println!("Total Load Time (ms),{:.2}", result.total_load_time());
    println!("Total Size (bytes),{}", result.total_size());

    println!();
    let mut header =
        String::from("Category,Method,Status,Time (ms),Size (bytes),URL,Trace ID,External Trace ID");
    if options.show_bodies {
        header.push_str(",Request Body,Response Body");
    }
    println!("{}", header);

    for (category, records) in [
        ("failed", result.failed()),
        ("slow", result.slow()),
        ("success", result.successful()),
    ] {
        for record in query.filter(records) {
            println!("{}", table_row(category, record, options.show_bodies));
        }
    }
}

fn table_row(category: &str, record: &EntrySummary, show_bodies: bool) -> String {
    let mut row = format!(
        "{},{},{},{:.2},{},{},{},{}",
        category,
        csv_field(&record.method),
        record.status,
        record.time,
        record.size,
        csv_field(&record.url),
        csv_field(&record.trace_id),
        csv_field(&record.external_trace_id)
    );
    if show_bodies {
        row.push(',');
        row.push_str(&csv_field(&record.request_body));
        row.push(',');
        row.push_str(&csv_field(&record.response_body));
    }
    row
}

/// Quote a value if it would break a CSV row
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Human-readable byte count in base-1024 units
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// Milliseconds below one second, seconds with two decimals above
pub fn format_time(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{}ms", ms.round() as i64)
    } else {
        format!("{:.2}s", ms / 1000.0)
    }
}

/// Earliest and latest request start across all records
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureWindow {
    pub start: String,
    pub end: String,
    pub duration_display: String,
}

/// Compute the capture window from RFC 3339 start times. Records without a
/// parseable timestamp are skipped; fewer than two timestamps yields `None`.
pub fn capture_window(result: &AnalysisResult) -> Option<CaptureWindow> {
    let mut starts: Vec<(DateTime<FixedOffset>, &str)> = result
        .failed()
        .iter()
        .chain(result.successful())
        .filter_map(|record| {
            DateTime::parse_from_rfc3339(&record.started_date_time)
                .ok()
                .map(|dt| (dt, record.started_date_time.as_str()))
        })
        .collect();

    if starts.len() < 2 {
        return None;
    }

    starts.sort_by_key(|(dt, _)| *dt);
    let (first, start) = starts.first()?;
    let (last, end) = starts.last()?;

    Some(CaptureWindow {
        start: start.to_string(),
        end: end.to_string(),
        duration_display: format_duration(last.signed_duration_since(*first).num_seconds()),
    })
}

fn format_duration(secs: i64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
