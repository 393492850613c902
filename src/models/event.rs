//! The closed set of invocation events the proxy understands.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    AlbTargetGroupRequest, AlbTargetGroupResponse, ApiGatewayProxyRequest, ApiGatewayProxyResponse,
    Body,
};

/// An inbound Lambda invocation, classified by the shape of its payload.
#[derive(Debug)]
pub enum ProxyEvent {
    ApiGateway(ApiGatewayProxyRequest),
    TargetGroup(AlbTargetGroupRequest),
    /// A payload this proxy cannot translate, named by its detected type
    Unsupported(String),
}

impl ProxyEvent {
    /// Classifies a raw invocation payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload looks like a supported event but its
    /// fields have the wrong JSON types.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let context = value.get("requestContext");

        if context.and_then(|c| c.get("elb")).is_some() {
            return serde_json::from_value(value).map(Self::TargetGroup);
        }
        if value.get("version").and_then(Value::as_str) == Some("2.0") {
            return Ok(Self::Unsupported("ApiGatewayV2httpRequest".to_string()));
        }
        if context.and_then(|c| c.get("connectionId")).is_some() {
            return Ok(Self::Unsupported(
                "ApiGatewayWebsocketProxyRequest".to_string(),
            ));
        }
        if value.get("httpMethod").is_some() {
            return serde_json::from_value(value).map(Self::ApiGateway);
        }

        Ok(Self::Unsupported("unrecognized payload".to_string()))
    }

    /// Short name of the event variant, used in logs.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::ApiGateway(_) => "ApiGatewayProxyRequest",
            Self::TargetGroup(_) => "AlbTargetGroupRequest",
            Self::Unsupported(name) => name,
        }
    }
}

impl From<ApiGatewayProxyRequest> for ProxyEvent {
    fn from(request: ApiGatewayProxyRequest) -> Self {
        Self::ApiGateway(request)
    }
}

impl From<AlbTargetGroupRequest> for ProxyEvent {
    fn from(request: AlbTargetGroupRequest) -> Self {
        Self::TargetGroup(request)
    }
}

impl<'de> Deserialize<'de> for ProxyEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}

/// The platform response, serialized as the bare JSON of its variant.
#[derive(Serialize, Debug)]
#[serde(untagged)]
pub enum ProxyResponse {
    ApiGateway(ApiGatewayProxyResponse),
    TargetGroup(AlbTargetGroupResponse),
}

impl ProxyResponse {
    #[must_use]
    pub const fn status_code(&self) -> i64 {
        match self {
            Self::ApiGateway(response) => response.status_code,
            Self::TargetGroup(response) => response.status_code,
        }
    }

    /// Raw body bytes, empty when the response carries no body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        let body = match self {
            Self::ApiGateway(response) => response.body.as_ref(),
            Self::TargetGroup(response) => response.body.as_ref(),
        };

        match body {
            Some(Body::Text(text)) => text.as_bytes(),
            Some(Body::Binary(bytes)) => bytes.as_slice(),
            Some(Body::Empty) | None => &[],
        }
    }

    #[must_use]
    pub const fn is_base64_encoded(&self) -> bool {
        match self {
            Self::ApiGateway(response) => response.is_base64_encoded,
            Self::TargetGroup(response) => response.is_base64_encoded,
        }
    }
}
