use http::{HeaderMap, HeaderValue, StatusCode};
use std::io;

use crate::models::{AlbTargetGroupResponse, ApiGatewayProxyResponse, Body, ProxyError};

/// In-memory stand-in for a live response channel.
///
/// Handlers write the status, headers and body into it exactly as they would
/// for a native HTTP response; the proxy then turns the recording into the
/// platform's response shape.
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Headers to send. Changes after the body is written are still recorded.
    pub const fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Commits the status code. Only the first call has an effect.
    pub fn write_header(&mut self, status: StatusCode) {
        if self.status.is_none() {
            self.status = Some(status);
        }
    }

    /// Appends to the body, committing a 200 status if none was written.
    pub fn write(&mut self, bytes: &[u8]) {
        self.write_header(StatusCode::OK);
        self.body.extend_from_slice(bytes);
    }

    /// Recorded status, 200 when the handler never set one.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts the recording into an API Gateway proxy response.
    ///
    /// # Errors
    ///
    /// Returns `ResponseConversion` if a header value is not visible ASCII.
    pub fn into_api_gateway_response(self) -> Result<ApiGatewayProxyResponse, ProxyError> {
        let status = self.status();
        let headers = single_value_headers(&self.headers)?;
        let (body, is_base64_encoded) = encode_body(self.body);

        Ok(ApiGatewayProxyResponse {
            status_code: status.as_u16().into(),
            headers,
            multi_value_headers: self.headers,
            body: Some(body),
            is_base64_encoded,
        })
    }

    /// Converts the recording into a load balancer target group response.
    ///
    /// # Errors
    ///
    /// Returns `ResponseConversion` if a header value is not visible ASCII.
    pub fn into_target_group_response(self) -> Result<AlbTargetGroupResponse, ProxyError> {
        let status = self.status();
        let headers = single_value_headers(&self.headers)?;
        let (body, is_base64_encoded) = encode_body(self.body);

        Ok(AlbTargetGroupResponse {
            status_code: status.as_u16().into(),
            status_description: Some(status_description(status)),
            headers,
            multi_value_headers: self.headers,
            body: Some(body),
            is_base64_encoded,
        })
    }
}

impl io::Write for ResponseRecorder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Self::write(self, buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Fallback API Gateway response used when a request cannot be proxied.
#[must_use]
pub fn gateway_timeout() -> ApiGatewayProxyResponse {
    ApiGatewayProxyResponse {
        status_code: StatusCode::GATEWAY_TIMEOUT.as_u16().into(),
        headers: HeaderMap::new(),
        multi_value_headers: HeaderMap::new(),
        body: None,
        is_base64_encoded: false,
    }
}

/// Fallback target group response used when a request cannot be proxied.
#[must_use]
pub fn target_group_timeout() -> AlbTargetGroupResponse {
    AlbTargetGroupResponse {
        status_code: StatusCode::GATEWAY_TIMEOUT.as_u16().into(),
        status_description: Some(status_description(StatusCode::GATEWAY_TIMEOUT)),
        headers: HeaderMap::new(),
        multi_value_headers: HeaderMap::new(),
        body: None,
        is_base64_encoded: false,
    }
}

/// `"200 OK"` style description expected by the load balancer.
fn status_description(status: StatusCode) -> String {
    status.canonical_reason().map_or_else(
        || status.as_u16().to_string(),
        |reason| format!("{} {reason}", status.as_u16()),
    )
}

/// Collapses each header to one comma-joined value. The recorder's own map
/// becomes the multi-value headers.
fn single_value_headers(headers: &HeaderMap) -> Result<HeaderMap, ProxyError> {
    let mut single = HeaderMap::with_capacity(headers.keys_len());

    for name in headers.keys() {
        let values = headers
            .get_all(name)
            .iter()
            .map(|value| {
                value.to_str().map_err(|e| {
                    ProxyError::ResponseConversion(format!("header {name} is not a string: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let joined = HeaderValue::from_str(&values.join(",")).map_err(|e| {
            ProxyError::ResponseConversion(format!("header {name} cannot be joined: {e}"))
        })?;
        single.insert(name.clone(), joined);
    }

    Ok(single)
}

/// Text bodies go back as-is, anything else is flagged for base64.
fn encode_body(body: Vec<u8>) -> (Body, bool) {
    match String::from_utf8(body) {
        Ok(text) => (Body::Text(text), false),
        Err(e) => (Body::Binary(e.into_bytes()), true),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use http::header::{CONTENT_TYPE, SET_COOKIE};
    use std::io::Write as _;

    #[test]
    fn test_status_defaults_to_ok() {
        let recorder = ResponseRecorder::new();
        assert_eq!(recorder.status(), StatusCode::OK);

        let response = recorder.into_api_gateway_response().unwrap();
        assert_eq!(response.status_code, 200);
        assert!(matches!(response.body, Some(Body::Text(ref text)) if text.is_empty()));
        assert!(!response.is_base64_encoded);
    }

    #[test]
    fn test_first_status_wins() {
        let mut recorder = ResponseRecorder::new();
        recorder.write_header(StatusCode::CREATED);
        recorder.write_header(StatusCode::NOT_FOUND);
        assert_eq!(recorder.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_write_commits_ok() {
        let mut recorder = ResponseRecorder::new();
        recorder.write(b"hello");
        recorder.write_header(StatusCode::BAD_REQUEST);
        assert_eq!(recorder.status(), StatusCode::OK);
        assert_eq!(recorder.body(), b"hello");
    }

    #[test]
    fn test_io_write() {
        let mut recorder = ResponseRecorder::new();
        write!(recorder, "{}-{}", "a", 1).unwrap();
        assert_eq!(recorder.body(), b"a-1");
    }

    #[test]
    fn test_binary_body_is_base64_encoded() {
        let mut recorder = ResponseRecorder::new();
        recorder.write(&[0xff, 0xfe, 0x00]);

        let response = recorder.into_api_gateway_response().unwrap();
        assert!(response.is_base64_encoded);
        assert!(matches!(response.body, Some(Body::Binary(ref bytes)) if bytes == &[0xff, 0xfe, 0x00]));

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["body"], "//4A");
        assert_eq!(value["isBase64Encoded"], true);
    }

    #[test]
    fn test_headers_are_collapsed() {
        let mut recorder = ResponseRecorder::new();
        recorder
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        recorder
            .headers_mut()
            .append(SET_COOKIE, HeaderValue::from_static("a=1"));
        recorder
            .headers_mut()
            .append(SET_COOKIE, HeaderValue::from_static("b=2"));

        let response = recorder.into_api_gateway_response().unwrap();
        assert_eq!(response.headers[CONTENT_TYPE], "application/json");
        assert_eq!(response.headers[SET_COOKIE], "a=1,b=2");
        assert_eq!(response.headers.get_all(SET_COOKIE).iter().count(), 1);

        let cookies: Vec<&HeaderValue> = response.multi_value_headers.get_all(SET_COOKIE).iter().collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
    }

    #[test]
    fn test_non_ascii_header_fails_conversion() {
        let mut recorder = ResponseRecorder::new();
        recorder.headers_mut().insert(
            "x-name",
            HeaderValue::from_bytes("caf\u{e9}".as_bytes()).unwrap(),
        );

        let err = recorder.into_api_gateway_response().unwrap_err();
        assert_eq!(err.error_type(), "ResponseConversionError");
    }

    #[test]
    fn test_target_group_response() {
        let mut recorder = ResponseRecorder::new();
        recorder.write_header(StatusCode::NOT_FOUND);
        recorder.write(b"missing");

        let response = recorder.into_target_group_response().unwrap();
        assert_eq!(response.status_code, 404);
        assert_eq!(response.status_description.as_deref(), Some("404 Not Found"));
        assert!(matches!(response.body, Some(Body::Text(ref text)) if text == "missing"));
    }

    #[test]
    fn test_timeouts() {
        let timeout = gateway_timeout();
        assert_eq!(timeout.status_code, 504);
        assert!(timeout.body.is_none());

        let timeout = target_group_timeout();
        assert_eq!(timeout.status_code, 504);
        assert_eq!(timeout.status_description.as_deref(), Some("504 Gateway Timeout"));
    }
}
