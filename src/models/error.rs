//! Error types for the Lambda HTTP proxy.
//!
//! Every failure along the event → request → response path is a
//! [`ProxyError`]. The orchestrator pairs it with a fallback response in
//! [`HandleError`] so the caller sees both.

use lambda_runtime::Diagnostic;
use thiserror::Error;

use super::ProxyResponse;

/// Errors raised while converting platform events and responses.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The event body was flagged as base64 but could not be decoded
    #[error("could not decode base64 body: {0}")]
    Decode(#[from] base64::DecodeError),
    /// The generated URL, method or a header was rejected by the HTTP types
    #[error("could not build http request: {0}")]
    RequestBuild(#[from] http::Error),
    /// A context or stage variables value could not be marshalled to JSON
    #[error("could not serialize {what}: {source}")]
    Serialization {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// A synthetic header held a value that is not the expected JSON
    #[error("could not deserialize header {header}: {source}")]
    Deserialization {
        header: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// A synthetic header was not present on the request
    #[error("no {0} header in request")]
    MissingHeader(&'static str),
    /// The invocation payload is not an event this proxy knows about
    #[error("don't know how to handle event type: {0}")]
    UnsupportedEventType(String),
    /// A recorded response header could not be expressed as a string
    #[error("could not convert response: {0}")]
    ResponseConversion(String),
}

impl ProxyError {
    /// Stable name of the error kind, used as the Lambda `errorType`.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Decode(_) => "DecodeError",
            Self::RequestBuild(_) => "RequestBuildError",
            Self::Serialization { .. } => "SerializationError",
            Self::Deserialization { .. } => "DeserializationError",
            Self::MissingHeader(_) => "MissingHeaderError",
            Self::UnsupportedEventType(_) => "UnsupportedEventTypeError",
            Self::ResponseConversion(_) => "ResponseConversionError",
        }
    }
}

impl From<ProxyError> for Diagnostic {
    fn from(error: ProxyError) -> Self {
        Self {
            error_type: error.error_type().to_string(),
            error_message: error.to_string(),
        }
    }
}

/// A failed proxy cycle: the cause plus the best-effort response to send back.
#[derive(Debug, Error)]
#[error("{context}: {source}")]
pub struct HandleError {
    pub context: &'static str,
    #[source]
    pub source: ProxyError,
    pub fallback: ProxyResponse,
}

impl From<HandleError> for Diagnostic {
    fn from(error: HandleError) -> Self {
        Self {
            error_type: error.source.error_type().to_string(),
            error_message: error.to_string(),
        }
    }
}
