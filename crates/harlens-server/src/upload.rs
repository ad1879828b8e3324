use crate::{Error, Result};
use http::{HeaderMap, Uri, header};
use hyper::body::Bytes;
use std::convert::Infallible;

pub const HAR_EXTENSION: &str = ".har";

/// Form field carrying the HAR file in multipart uploads
pub const FILE_FIELD: &str = "file";

/// Reject uploads that cannot be a HAR file before they reach the analyzer
pub fn validate_upload(filename: Option<&str>, content: &[u8]) -> Result<()> {
    if content.is_empty() {
        return Err(Error::Upload("Please upload a HAR file".to_string()));
    }

    match filename {
        Some(name) if name.ends_with(HAR_EXTENSION) => Ok(()),
        _ => Err(Error::Upload("File must be a .har file".to_string())),
    }
}

/// Find the uploaded file's name, preferring the `filename` query parameter
/// over a `Content-Disposition` header
pub fn upload_filename(uri: &Uri, headers: &HeaderMap) -> Option<String> {
    filename_from_query(uri).or_else(|| {
        headers
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_content_disposition)
    })
}

fn filename_from_query(uri: &Uri) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "filename")
        .map(|(_, value)| value.into_owned())
        .filter(|name| !name.is_empty())
}

fn filename_from_content_disposition(value: &str) -> Option<String> {
    value.split(';').skip(1).find_map(|param| {
        let (key, val) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let name = val.trim().trim_matches('"');
        (!name.is_empty()).then(|| name.to_string())
    })
}

/// Boundary of a `multipart/form-data` request; `None` for raw uploads
pub fn multipart_boundary(headers: &HeaderMap) -> Result<Option<String>> {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return Ok(None);
    };

    let is_form_data = content_type
        .parse::<mime::Mime>()
        .map(|m| m.type_() == mime::MULTIPART && m.subtype() == mime::FORM_DATA)
        .unwrap_or(false);
    if !is_form_data {
        return Ok(None);
    }

    multer::parse_boundary(content_type)
        .map(Some)
        .map_err(|e| Error::Upload(format!("Invalid multipart upload: {}", e)))
}

/// Pull the `file` part and its filename out of a buffered multipart body.
/// A body without that part yields no name and no content.
pub async fn read_multipart(body: Bytes, boundary: String) -> Result<(Option<String>, Bytes)> {
    let stream = futures::stream::once(async move { Ok::<_, Infallible>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            tracing::debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let content = field.bytes().await.map_err(multipart_error)?;
        return Ok((filename, content));
    }

    Ok((None, Bytes::new()))
}

fn multipart_error(err: multer::Error) -> Error {
    Error::Upload(format!("Invalid multipart upload: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_validate_accepts_har() {
        assert!(validate_upload(Some("capture.har"), b"{}").is_ok());
    }

    #[test]
    fn test_validate_rejects_empty() {
        let err = validate_upload(Some("capture.har"), b"").unwrap_err();
        assert_eq!(err.to_string(), "Please upload a HAR file");
    }

    #[test]
    fn test_validate_rejects_wrong_extension() {
        let err = validate_upload(Some("capture.json"), b"{}").unwrap_err();
        assert_eq!(err.to_string(), "File must be a .har file");

        assert!(validate_upload(Some("capture.har.txt"), b"{}").is_err());
        assert!(validate_upload(None, b"{}").is_err());
    }

    #[test]
    fn test_validate_checks_empty_before_name() {
        let err = validate_upload(None, b"").unwrap_err();
        assert_eq!(err.to_string(), "Please upload a HAR file");
    }

    #[test]
    fn test_filename_from_query() {
        let uri: Uri = "/api/har/upload?filename=my%20capture.har".parse().unwrap();
        assert_eq!(
            upload_filename(&uri, &HeaderMap::new()).as_deref(),
            Some("my capture.har")
        );
    }

    #[test]
    fn test_filename_from_content_disposition() {
        let uri: Uri = "/api/har/upload".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=\"session.har\""),
        );
        assert_eq!(
            upload_filename(&uri, &headers).as_deref(),
            Some("session.har")
        );
    }

    #[test]
    fn test_query_takes_precedence() {
        let uri: Uri = "/api/har/upload?filename=a.har".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=b.har"),
        );
        assert_eq!(upload_filename(&uri, &headers).as_deref(), Some("a.har"));
    }

    fn form_body(parts: &[(&str, Option<&str>, &str)]) -> Bytes {
        let mut body = String::new();
        for (name, filename, content) in parts {
            body.push_str("--XBOUND\r\n");
            match filename {
                Some(f) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    name, f
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n",
                    name
                )),
            }
            body.push_str("\r\n");
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str("--XBOUND--\r\n");
        Bytes::from(body)
    }

    #[test]
    fn test_multipart_boundary() {
        let mut headers = HeaderMap::new();
        assert_eq!(multipart_boundary(&headers).unwrap(), None);

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        assert_eq!(multipart_boundary(&headers).unwrap(), None);

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=XBOUND"),
        );
        assert_eq!(
            multipart_boundary(&headers).unwrap().as_deref(),
            Some("XBOUND")
        );
    }

    #[test]
    fn test_multipart_without_boundary_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data"),
        );
        assert!(matches!(
            multipart_boundary(&headers),
            Err(Error::Upload(_))
        ));
    }

    #[tokio::test]
    async fn test_read_multipart_picks_file_field() {
        let body = form_body(&[
            ("note", None, "ignored"),
            ("file", Some("capture.har"), "{\"log\": {\"entries\": []}}"),
        ]);

        let (filename, content) = read_multipart(body, "XBOUND".to_string()).await.unwrap();

        assert_eq!(filename.as_deref(), Some("capture.har"));
        assert_eq!(&content[..], b"{\"log\": {\"entries\": []}}");
    }

    #[tokio::test]
    async fn test_read_multipart_without_file_field() {
        let body = form_body(&[("note", None, "hello")]);

        let (filename, content) = read_multipart(body, "XBOUND".to_string()).await.unwrap();

        assert_eq!(filename, None);
        assert!(content.is_empty());
        assert_eq!(
            validate_upload(filename.as_deref(), &content)
                .unwrap_err()
                .to_string(),
            "Please upload a HAR file"
        );
    }

    #[test]
    fn test_no_filename() {
        let uri: Uri = "/api/har/upload?other=1".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment"),
        );
        assert_eq!(upload_filename(&uri, &headers), None);
    }
}
