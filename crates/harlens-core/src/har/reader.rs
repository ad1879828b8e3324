use super::HarDocument;
use crate::{Error, Result};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct HarReader;

impl HarReader {
    /// Read and parse a HAR file from the given path
    pub fn from_file(path: &Path) -> Result<HarDocument> {
        tracing::debug!("Reading HAR file from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let har: HarDocument = serde_json::from_reader(reader)?;

        tracing::debug!("Parsed HAR file {}", path.display());

        Ok(har)
    }

    /// Parse a HAR document from a JSON string
    pub fn from_str(content: &str) -> Result<HarDocument> {
        tracing::debug!("Parsing HAR from string ({} bytes)", content.len());

        let har: HarDocument = serde_json::from_str(content)?;
        Ok(har)
    }

    /// Parse a HAR document from raw bytes
    pub fn from_slice(content: &[u8]) -> Result<HarDocument> {
        tracing::debug!("Parsing HAR from {} bytes", content.len());

        let har: HarDocument = serde_json::from_slice(content)?;
        Ok(har)
    }

    /// Locate the `log.entries` array.
    ///
    /// This is the only structural requirement placed on a HAR document: when
    /// the array is missing or has another type there is nothing to analyze,
    /// and the whole document is rejected.
    pub fn entries(har: &HarDocument) -> Result<&[Value]> {
        match har.get("log").and_then(|log| log.get("entries")) {
            Some(Value::Array(entries)) => Ok(entries),
            Some(other) => {
                tracing::warn!("HAR 'entries' has unexpected type: {}", type_name(other));
                Err(missing_entries())
            }
            None => Err(missing_entries()),
        }
    }
}

fn missing_entries() -> Error {
    Error::MalformedInput("'entries' array not found".to_string())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_har() {
        let har_json = r#"{
            "log": {
                "version": "1.2",
                "creator": {"name": "test", "version": "1.0"},
                "entries": []
            }
        }"#;

        let har = HarReader::from_str(har_json).unwrap();
        assert_eq!(HarReader::entries(&har).unwrap().len(), 0);
    }

    #[test]
    fn test_entries_missing() {
        let har = HarReader::from_str(r#"{"log": {}}"#).unwrap();
        let err = HarReader::entries(&har).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert!(err.to_string().contains("entries"));
    }

    #[test]
    fn test_entries_missing_log() {
        let har = HarReader::from_str(r#"{"entries": []}"#).unwrap();
        assert!(matches!(
            HarReader::entries(&har),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_entries_not_an_array() {
        let har = HarReader::from_str(r#"{"log": {"entries": {"0": {}}}}"#).unwrap();
        assert!(matches!(
            HarReader::entries(&har),
            Err(Error::MalformedInput(_))
        ));

        let har = HarReader::from_str(r#"{"log": {"entries": null}}"#).unwrap();
        assert!(HarReader::entries(&har).is_err());
    }

    #[test]
    fn test_root_not_an_object() {
        let har = HarReader::from_str("[1, 2, 3]").unwrap();
        assert!(matches!(
            HarReader::entries(&har),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        let result = HarReader::from_str("{\"log\": ");
        assert!(matches!(result, Err(Error::Parse(_))));

        let result = HarReader::from_slice(b"not json at all");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let result = HarReader::from_file(Path::new("/definitely/not/here.har"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
