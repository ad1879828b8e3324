use super::EntrySummary;
use crate::har::fields::{field_array, field_f64, field_i64, field_non_negative_u64, field_str};
use serde_json::Value;

const TRACE_ID_HEADER: &str = "x-trace-id";
const EXTERNAL_TRACE_ID_HEADER: &str = "external-trace-id";

/// Pull the fields used for classification and reporting out of one raw
/// HAR entry. Never fails: anything absent or malformed takes its default.
pub fn extract(entry: &Value) -> EntrySummary {
    let (trace_id, external_trace_id) = trace_ids(entry);

    EntrySummary {
        method: field_str(entry, &["request", "method"], ""),
        url: field_str(entry, &["request", "url"], ""),
        status: field_i64(entry, &["response", "status"], 0),
        status_text: field_str(entry, &["response", "statusText"], ""),
        time: field_f64(entry, &["time"], 0.0),
        size: field_non_negative_u64(entry, &["response", "content", "size"]),
        started_date_time: field_str(entry, &["startedDateTime"], ""),
        trace_id,
        external_trace_id,
        request_body: field_str(entry, &["request", "postData", "text"], ""),
        response_body: field_str(entry, &["response", "content", "text"], ""),
    }
}

/// Scan response headers for the trace identifiers. Later headers overwrite
/// earlier ones with the same name.
fn trace_ids(entry: &Value) -> (String, String) {
    let mut trace_id = String::new();
    let mut external_trace_id = String::new();

    let Some(headers) = field_array(entry, &["response", "headers"]) else {
        return (trace_id, external_trace_id);
    };

    for header in headers {
        let name = field_str(header, &["name"], "");
        if name.eq_ignore_ascii_case(TRACE_ID_HEADER) {
            trace_id = field_str(header, &["value"], "");
        } else if name.eq_ignore_ascii_case(EXTERNAL_TRACE_ID_HEADER) {
            external_trace_id = field_str(header, &["value"], "");
        }
    }

    (trace_id, external_trace_id)
}
