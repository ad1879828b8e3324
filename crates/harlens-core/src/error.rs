use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read HAR file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse HAR file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid HAR format: {0}")]
    MalformedInput(String),

    #[error("Internal analysis error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the error was caused by the document itself rather than by
    /// the analyzer or the environment
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Parse(_) | Error::MalformedInput(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_input_is_client_error() {
        let err = Error::MalformedInput("'entries' array not found".to_string());
        assert!(err.is_client_error());
        assert_eq!(
            err.to_string(),
            "Invalid HAR format: 'entries' array not found"
        );
    }

    #[test]
    fn test_internal_is_not_client_error() {
        assert!(!Error::Internal("boom".to_string()).is_client_error());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(!Error::from(io).is_client_error());
    }

    #[test]
    fn test_parse_is_client_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(Error::from(parse).is_client_error());
    }
}
