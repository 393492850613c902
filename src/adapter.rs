//! Runs one Lambda invocation through an ordinary HTTP handler.
//!
//! Event → `http::Request` → [`Handler`] → [`ResponseRecorder`] → platform
//! response. Nothing is kept between invocations apart from the accessor's
//! configuration.

use http::Request;
use lambda_runtime::tracing::{debug, error};

use crate::models::{HandleError, ProxyError, ProxyEvent, ProxyResponse};
use crate::proxy::{RequestAccessor, ResponseRecorder, gateway_timeout, target_group_timeout};

/// Anything that can answer an HTTP request by writing into a recorder.
///
/// Closures of the form `|w: &mut ResponseRecorder, req: Request<Vec<u8>>|`
/// implement it directly, so existing routers only need a thin wrapper.
pub trait Handler {
    fn serve_http(&self, recorder: &mut ResponseRecorder, request: Request<Vec<u8>>);
}

impl<F> Handler for F
where
    F: Fn(&mut ResponseRecorder, Request<Vec<u8>>),
{
    fn serve_http(&self, recorder: &mut ResponseRecorder, request: Request<Vec<u8>>) {
        self(recorder, request);
    }
}

/// Proxies Lambda events to a caller-supplied [`Handler`].
#[derive(Debug)]
pub struct ProxyAdapter<H> {
    accessor: RequestAccessor,
    handler: H,
}

impl<H: Handler> ProxyAdapter<H> {
    /// Wraps `handler` with a default [`RequestAccessor`].
    #[must_use]
    pub fn new(handler: H) -> Self {
        Self::with_accessor(handler, RequestAccessor::default())
    }

    #[must_use]
    pub const fn with_accessor(handler: H, accessor: RequestAccessor) -> Self {
        Self { accessor, handler }
    }

    #[must_use]
    pub const fn accessor(&self) -> &RequestAccessor {
        &self.accessor
    }

    /// Mutable access for configuration before the adapter is shared.
    pub const fn accessor_mut(&mut self) -> &mut RequestAccessor {
        &mut self.accessor
    }

    /// Runs one request/response cycle for `event`.
    ///
    /// # Errors
    ///
    /// Returns a `HandleError` carrying the cause and a 504 response shaped
    /// for the event's variant when the event cannot be converted to a
    /// request or the recorded response cannot be converted back.
    pub fn proxy(&self, event: &ProxyEvent) -> Result<ProxyResponse, HandleError> {
        // Lambda event -> HTTP request
        let request = self
            .accessor
            .proxy_event_to_http_request(event)
            .map_err(|e| failure(event, "Could not convert proxy event to request", e))?;

        debug!(method = %request.method(), uri = %request.uri(), "Dispatching request to handler");

        // HTTP request -> handler
        let mut recorder = ResponseRecorder::new();
        self.handler.serve_http(&mut recorder, request);

        // Recorded response -> Lambda response
        let response = match event {
            ProxyEvent::ApiGateway(_) => recorder
                .into_api_gateway_response()
                .map(ProxyResponse::ApiGateway),
            ProxyEvent::TargetGroup(_) => recorder
                .into_target_group_response()
                .map(ProxyResponse::TargetGroup),
            ProxyEvent::Unsupported(kind) => Err(ProxyError::UnsupportedEventType(kind.clone())),
        };

        response.map_err(|e| failure(event, "Error while generating proxy response", e))
    }
}

fn failure(event: &ProxyEvent, context: &'static str, source: ProxyError) -> HandleError {
    error!(error = %source, event_type = %event.kind(), "{}", context);

    let fallback = match event {
        ProxyEvent::TargetGroup(_) => ProxyResponse::TargetGroup(target_group_timeout()),
        ProxyEvent::ApiGateway(_) | ProxyEvent::Unsupported(_) => {
            ProxyResponse::ApiGateway(gateway_timeout())
        }
    };

    HandleError {
        context,
        source,
        fallback,
    }
}
