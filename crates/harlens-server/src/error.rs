use http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The upload itself was rejected before analysis
    #[error("{0}")]
    Upload(String),

    #[error("Upload exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error(transparent)]
    Analysis(#[from] harlens_core::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status reported to the uploader
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Upload(_) => StatusCode::BAD_REQUEST,
            Error::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Analysis(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Error::Analysis(_) | Error::Server(_) | Error::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to send back to the uploader. Server-side failures are
    /// reported generically; the detail goes to the log.
    pub fn public_message(&self) -> String {
        if self.status().is_server_error() {
            "Failed to process HAR file".to_string()
        } else {
            self.to_string()
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
