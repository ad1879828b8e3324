use crate::upload::{multipart_boundary, read_multipart, upload_filename, validate_upload};
use crate::{Error, Result, ServerConfig};
use harlens_core::analysis::{AnalysisResult, Analyzer, Thresholds, TrafficAnalyzer};
use harlens_core::har::HarReader;
use http::{HeaderValue, Method, Request, Response, StatusCode, header};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use std::convert::Infallible;
use std::sync::Arc;

pub const UPLOAD_PATH: &str = "/api/har/upload";
pub const HEALTH_PATH: &str = "/health";

/// Route a single request. Every outcome, errors included, becomes a response.
pub async fn handle<B>(
    req: Request<B>,
    config: Arc<ServerConfig>,
) -> std::result::Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    tracing::debug!("{} {}", method, path);

    let mut response = match (&method, path.as_str()) {
        (&Method::OPTIONS, _) => preflight(),
        (&Method::GET, HEALTH_PATH) => text(StatusCode::OK, "ok"),
        (&Method::POST, UPLOAD_PATH) => match upload(req, &config).await {
            Ok(result) => json(&result),
            Err(e) => error_response(&e),
        },
        (_, UPLOAD_PATH) => {
            let mut resp = text(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
            resp.headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST, OPTIONS"));
            resp
        }
        _ => text(StatusCode::NOT_FOUND, "Not found"),
    };

    if let Some(origin) = config
        .allowed_origin
        .as_deref()
        .and_then(|o| HeaderValue::from_str(o).ok())
    {
        response
            .headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }

    tracing::info!("{} {} -> {}", method, path, response.status().as_u16());

    Ok(response)
}

async fn upload<B>(req: Request<B>, config: &ServerConfig) -> Result<AnalysisResult>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let boundary = multipart_boundary(req.headers())?;
    let filename = upload_filename(req.uri(), req.headers());
    let limit = config.max_upload_bytes;

    let body = Limited::new(req.into_body(), limit)
        .collect()
        .await
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                Error::TooLarge { limit }
            } else {
                Error::Upload(format!("Failed to read upload: {}", e))
            }
        })?
        .to_bytes();

    let (filename, content) = match boundary {
        Some(boundary) => read_multipart(body, boundary).await?,
        None => (filename, body),
    };

    validate_upload(filename.as_deref(), &content)?;

    tracing::info!(
        "Received HAR upload {} ({} bytes)",
        filename.as_deref().unwrap_or_default(),
        content.len()
    );

    let thresholds = config.thresholds;
    tokio::task::spawn_blocking(move || analyze_upload(&content, thresholds))
        .await
        .map_err(|e| Error::Analysis(harlens_core::Error::Internal(e.to_string())))?
}

fn analyze_upload(content: &[u8], thresholds: Thresholds) -> Result<AnalysisResult> {
    let har = HarReader::from_slice(content)?;
    Ok(TrafficAnalyzer::new(thresholds).analyze(&har)?)
}

fn error_response(err: &Error) -> Response<Full<Bytes>> {
    let status = err.status();
    if status.is_server_error() {
        tracing::error!("Failed to process HAR upload: {}", err);
    } else {
        tracing::warn!("Rejected HAR upload: {}", err);
    }
    text(status, &err.public_message())
}

fn preflight() -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(Bytes::new()));
    *resp.status_mut() = StatusCode::NO_CONTENT;
    let headers = resp.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type, content-disposition"),
    );
    resp
}

fn text(status: StatusCode, body: &str) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(Bytes::from(body.to_string())));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(header::CONTENT_TYPE, content_type(&mime::TEXT_PLAIN_UTF_8));
    resp
}

fn json(result: &AnalysisResult) -> Response<Full<Bytes>> {
    match serde_json::to_vec(result) {
        Ok(body) => {
            let mut resp = Response::new(Full::new(Bytes::from(body)));
            resp.headers_mut()
                .insert(header::CONTENT_TYPE, content_type(&mime::APPLICATION_JSON));
            resp
        }
        Err(e) => error_response(&Error::Server(format!(
            "Failed to serialize analysis result: {}",
            e
        ))),
    }
}

fn content_type(mime: &mime::Mime) -> HeaderValue {
    HeaderValue::from_str(mime.as_ref())
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"))
}
