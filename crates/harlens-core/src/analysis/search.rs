use super::EntrySummary;

/// Case-insensitive text match over the identifying fields of a record
/// (method, URL, status, status text and trace IDs). Bodies are not searched.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    needle: String,
}

impl RecordQuery {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.trim().to_lowercase(),
        }
    }

    /// An empty query matches everything
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, record: &EntrySummary) -> bool {
        if self.is_empty() {
            return true;
        }

        let status = record.status.to_string();
        [
            record.method.as_str(),
            record.url.as_str(),
            status.as_str(),
            record.status_text.as_str(),
            record.trace_id.as_str(),
            record.external_trace_id.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&self.needle))
    }

    /// Keep the records that match, preserving order
    pub fn filter<'a>(&self, records: &'a [EntrySummary]) -> Vec<&'a EntrySummary> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}
