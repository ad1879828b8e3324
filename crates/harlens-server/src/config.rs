use harlens_core::analysis::Thresholds;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Settings for the upload endpoint
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Origin echoed in `Access-Control-Allow-Origin`; `None` disables CORS headers
    pub allowed_origin: Option<String>,
    /// Uploads larger than this are rejected before analysis
    pub max_upload_bytes: usize,
    pub thresholds: Thresholds,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            allowed_origin: Some(DEFAULT_ALLOWED_ORIGIN.to_string()),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            thresholds: Thresholds::default(),
        }
    }
}
