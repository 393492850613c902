use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Method, Request};
use lambda_runtime::tracing::{debug, error};
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{
    AlbTargetGroupRequestContext, ApiGatewayProxyRequestContext, ProxyError, ProxyEvent, QueryMap,
};
use crate::utils::normalize_base_path;

/// Name of the environment variable holding a custom host for generated
/// requests. The value must include a scheme: `http://my-custom.host.com`.
pub const CUSTOM_HOST_VARIABLE: &str = "GO_API_HOST";

/// Prepended to the path of each incoming request when no custom host is set
pub const DEFAULT_SERVER_ADDRESS: &str = "https://aws-serverless-go-api.com";

/// Header carrying the JSON-encoded API Gateway request context.
/// Read it back with [`RequestAccessor::get_api_gateway_context`].
pub const API_GW_CONTEXT_HEADER: &str = "X-GoLambdaProxy-ApiGw-Context";

/// Header carrying the JSON-encoded API Gateway stage variables.
/// Read it back with [`RequestAccessor::get_api_gateway_stage_vars`].
pub const API_GW_STAGE_VARS_HEADER: &str = "X-GoLambdaProxy-ApiGw-StageVars";

/// Header carrying the JSON-encoded load balancer request context.
/// Read it back with [`RequestAccessor::get_alb_context`].
pub const ALB_CONTEXT_HEADER: &str = "X-GoLambdaProxy-Alb-Context";

/// Turns proxy events into `http::Request` values and recovers the platform
/// metadata that was round-tripped through custom headers.
///
/// Configure it once before sharing it: `strip_base_path` takes `&mut self`,
/// so reconfiguring while requests are in flight does not compile.
#[derive(Debug, Clone)]
pub struct RequestAccessor {
    server_address: String,
    strip_base_path: String,
}

impl Default for RequestAccessor {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_ADDRESS)
    }
}

impl RequestAccessor {
    /// Creates an accessor that builds request URLs on `server_address`.
    #[must_use]
    pub fn new(server_address: impl Into<String>) -> Self {
        Self {
            server_address: server_address.into(),
            strip_base_path: String::new(),
        }
    }

    /// Builder form of [`Self::strip_base_path`].
    #[must_use]
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.strip_base_path(base_path);
        self
    }

    #[must_use]
    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.strip_base_path
    }

    /// Sets the base path removed from request paths before routing, as used
    /// with base path mappings on custom domain names.
    ///
    /// Returns the normalized value: a leading `/`, no trailing `/`, or empty
    /// when the input is blank (which disables stripping).
    pub fn strip_base_path(&mut self, base_path: &str) -> String {
        self.strip_base_path = normalize_base_path(base_path);
        self.strip_base_path.clone()
    }

    /// Extracts the API Gateway context from a request's custom header.
    ///
    /// # Errors
    ///
    /// Returns `MissingHeader` if the header is absent and `Deserialization`
    /// if it does not hold a context object.
    #[allow(clippy::unused_self)]
    pub fn get_api_gateway_context<B>(
        &self,
        request: &Request<B>,
    ) -> Result<ApiGatewayProxyRequestContext, ProxyError> {
        let raw = header_str(request, API_GW_CONTEXT_HEADER)
            .ok_or(ProxyError::MissingHeader(API_GW_CONTEXT_HEADER))?;
        parse_header(API_GW_CONTEXT_HEADER, raw)
    }

    /// Extracts the load balancer context from a request's custom header.
    ///
    /// # Errors
    ///
    /// Returns `MissingHeader` if the header is absent and `Deserialization`
    /// if it does not hold a context object.
    #[allow(clippy::unused_self)]
    pub fn get_alb_context<B>(
        &self,
        request: &Request<B>,
    ) -> Result<AlbTargetGroupRequestContext, ProxyError> {
        let raw = header_str(request, ALB_CONTEXT_HEADER)
            .ok_or(ProxyError::MissingHeader(ALB_CONTEXT_HEADER))?;
        parse_header(ALB_CONTEXT_HEADER, raw)
    }

    /// Extracts the API Gateway stage variables from a request's custom header.
    ///
    /// A request without the header has no stage variables, so this returns
    /// an empty map rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `Deserialization` if the header does not hold a string map.
    #[allow(clippy::unused_self)]
    pub fn get_api_gateway_stage_vars<B>(
        &self,
        request: &Request<B>,
    ) -> Result<HashMap<String, String>, ProxyError> {
        header_str(request, API_GW_STAGE_VARS_HEADER).map_or_else(
            || Ok(HashMap::new()),
            |raw| parse_header(API_GW_STAGE_VARS_HEADER, raw),
        )
    }

    /// Converts an API Gateway proxy event or load balancer target group
    /// event into an `http::Request`.
    ///
    /// The request carries extra headers with the JSON-encoded invocation
    /// context (and, for API Gateway, the stage variables). They are written
    /// after the event's own headers, so a client cannot supply its own copy.
    ///
    /// # Errors
    ///
    /// Returns a `ProxyError` if the body cannot be decoded, the request
    /// cannot be built, metadata cannot be serialized, or the event type is
    /// not supported.
    pub fn proxy_event_to_http_request(
        &self,
        event: &ProxyEvent,
    ) -> Result<Request<Vec<u8>>, ProxyError> {
        match event {
            ProxyEvent::ApiGateway(event) => {
                let mut request = self.request(
                    event.body.as_deref().unwrap_or_default(),
                    event.is_base64_encoded,
                    either(
                        &event.query_string_parameters,
                        &event.multi_value_query_string_parameters,
                        QueryMap::is_empty,
                    ),
                    event.path.as_deref().unwrap_or_default(),
                    &event.http_method,
                    either(&event.headers, &event.multi_value_headers, HeaderMap::is_empty),
                    API_GW_CONTEXT_HEADER,
                    &event.request_context,
                )?;

                let stage_vars =
                    to_header_value("stage variables", &event.stage_variables)?;
                request
                    .headers_mut()
                    .insert(header_name(API_GW_STAGE_VARS_HEADER)?, stage_vars);
                Ok(request)
            }
            ProxyEvent::TargetGroup(event) => self.request(
                event.body.as_deref().unwrap_or_default(),
                event.is_base64_encoded,
                either(
                    &event.query_string_parameters,
                    &event.multi_value_query_string_parameters,
                    QueryMap::is_empty,
                ),
                event.path.as_deref().unwrap_or_default(),
                &event.http_method,
                either(&event.headers, &event.multi_value_headers, HeaderMap::is_empty),
                ALB_CONTEXT_HEADER,
                &event.request_context,
            ),
            ProxyEvent::Unsupported(kind) => {
                error!(event_type = %kind, "Unsupported event type");
                Err(ProxyError::UnsupportedEventType(kind.clone()))
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn request<C: Serialize>(
        &self,
        body: &str,
        is_base64_encoded: bool,
        query_string_parameters: &QueryMap,
        request_path: &str,
        method: &Method,
        headers: &HeaderMap,
        context_header: &'static str,
        context: &C,
    ) -> Result<Request<Vec<u8>>, ProxyError> {
        let decoded_body = decode_body(body, is_base64_encoded)?;
        let path = encode_path(&self.route_path(request_path));
        let url = format!(
            "{}{path}{}",
            self.server_address,
            query_string(query_string_parameters.iter())
        );

        debug!(method = %method, path = %path, url = %url, "Building http request");

        let mut request = Request::builder()
            .method(method.as_str().to_uppercase().as_str())
            .uri(url.as_str())
            .body(decoded_body)
            .map_err(|e| {
                error!(error = %e, method = %method, path = %request_path, "Could not convert request to http::Request");
                ProxyError::RequestBuild(e)
            })?;

        for (name, value) in headers {
            request.headers_mut().append(name, value.clone());
        }

        let context_value = to_header_value("request context", context)?;
        request
            .headers_mut()
            .insert(header_name(context_header)?, context_value);

        Ok(request)
    }

    /// Removes the configured base path and makes sure the path is absolute.
    fn route_path(&self, request_path: &str) -> String {
        let mut path = request_path;
        if self.strip_base_path.len() > 1
            && let Some(stripped) = path.strip_prefix(self.strip_base_path.as_str())
        {
            path = stripped;
        }

        if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        }
    }
}

/// Returns the raw bytes of the body, decoding it first when the platform
/// flagged it as base64.
///
/// # Errors
///
/// Returns `ProxyError::Decode` if a flagged body is not valid standard base64.
pub fn decode_body(body: &str, is_base64_encoded: bool) -> Result<Vec<u8>, ProxyError> {
    if is_base64_encoded {
        return STANDARD.decode(body).map_err(|e| {
            error!(error = %e, "Could not decode base64 body");
            ProxyError::Decode(e)
        });
    }
    Ok(body.as_bytes().to_vec())
}

/// Builds `?k=v&k2=v2` from the query parameters, or an empty string.
///
/// Parameter order follows the iteration order of `parameters`.
#[must_use]
pub fn query_string<'a, I>(parameters: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let pairs: Vec<String> = parameters
        .into_iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect();

    if pairs.is_empty() {
        return String::new();
    }
    format!("?{}", pairs.join("&"))
}

/// Percent-encodes each segment of an already-decoded path, keeping `/`.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Picks the single-value map unless the platform only sent the multi-value one.
fn either<'a, T>(single: &'a T, multi: &'a T, is_empty: fn(&T) -> bool) -> &'a T {
    if is_empty(single) { multi } else { single }
}

fn to_header_value<T: Serialize + ?Sized>(
    what: &'static str,
    value: &T,
) -> Result<HeaderValue, ProxyError> {
    let json = serde_json::to_string(value).map_err(|source| {
        error!(error = %source, "Could not marshal {} for custom header", what);
        ProxyError::Serialization { what, source }
    })?;
    HeaderValue::from_str(&json).map_err(|e| ProxyError::RequestBuild(e.into()))
}

fn header_str<'a, B>(request: &'a Request<B>, name: &str) -> Option<&'a str> {
    request
        .headers()
        .get(name)
        .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
        .filter(|value| !value.is_empty())
}

fn parse_header<T: serde::de::DeserializeOwned>(
    header: &'static str,
    raw: &str,
) -> Result<T, ProxyError> {
    serde_json::from_str(raw).map_err(|source| {
        error!(error = %source, header = %header, "Error while unmarshalling header");
        ProxyError::Deserialization { header, source }
    })
}

fn header_name(name: &str) -> Result<HeaderName, ProxyError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| ProxyError::RequestBuild(e.into()))
}
