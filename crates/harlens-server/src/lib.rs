// HTTP boundary for HAR uploads

pub mod config;
pub mod error;
pub mod handler;
pub mod server;
pub mod upload;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use handler::handle;
pub use server::UploadServer;
pub use upload::validate_upload;
