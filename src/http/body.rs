// Request body module
// Reads a size-limited body and decodes it as a JSON object

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::header::CONTENT_LENGTH;
use hyper::{Request, StatusCode};
use serde_json::{Map, Value};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("failed to read request body: {0}")]
    Read(BoxError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotObject(&'static str),
}

impl BodyError {
    /// Status code the client sees for this failure
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Read(_) | Self::Json(_) | Self::NotObject(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Collect the body (at most `max_body_size` bytes) and parse it as a JSON
/// object.
///
/// A declared `Content-Length` over the limit is rejected before reading.
/// An empty (or whitespace-only) body reads as an empty object.
pub async fn read_json_object<B>(
    req: Request<B>,
    max_body_size: u64,
) -> Result<Map<String, Value>, BodyError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let declared = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if declared.is_some_and(|size| size > max_body_size) {
        return Err(BodyError::TooLarge {
            limit: max_body_size,
        });
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let bytes = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            return Err(BodyError::TooLarge {
                limit: max_body_size,
            })
        }
        Err(e) => return Err(BodyError::Read(e)),
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(&bytes)? {
        Value::Object(map) => Ok(map),
        Value::Array(_) => Err(BodyError::NotObject("array")),
        Value::String(_) => Err(BodyError::NotObject("string")),
        Value::Number(_) => Err(BodyError::NotObject("number")),
        Value::Bool(_) => Err(BodyError::NotObject("boolean")),
        Value::Null => Err(BodyError::NotObject("null")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;
    use hyper::body::Bytes;

    fn request(body: &'static str) -> Request<Full<Bytes>> {
        Request::builder()
            .method("POST")
            .uri("/api/user")
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap()
    }

    #[tokio::test]
    async fn test_reads_object() {
        let map = read_json_object(request(r#"{"name":"Bob","age":3}"#), 1024)
            .await
            .unwrap();
        assert_eq!(map.get("name"), Some(&Value::from("Bob")));
        assert_eq!(map.len(), 2);
    }

    #[tokio::test]
    async fn test_rejects_non_object() {
        for body in ["[1,2]", "\"x\"", "3", "true", "null"] {
            let err = read_json_object(request(body), 1024).await.unwrap_err();
            assert!(matches!(err, BodyError::NotObject(_)), "{body}: {err:?}");
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_rejects_invalid_json() {
        let err = read_json_object(request("{name:"), 1024).await.unwrap_err();
        assert!(matches!(err, BodyError::Json(_)));
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_object() {
        for body in ["", "  \r\n"] {
            let map = read_json_object(request(body), 1024).await.unwrap();
            assert!(map.is_empty(), "{body:?}");
        }
    }

    #[tokio::test]
    async fn test_body_over_limit() {
        let err = read_json_object(request(r#"{"name":"a long enough value"}"#), 8)
            .await
            .unwrap_err();
        assert!(matches!(err, BodyError::TooLarge { limit: 8 }));
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_declared_length_over_limit() {
        let mut req = request("{}");
        req.headers_mut()
            .insert(CONTENT_LENGTH, "4096".parse().unwrap());
        let err = read_json_object(req, 1024).await.unwrap_err();
        assert!(matches!(err, BodyError::TooLarge { .. }));
    }
}
