use lambda_runtime::tracing::{error, info};
use lambda_runtime::{Diagnostic, LambdaEvent};

use crate::adapter::{Handler, ProxyAdapter};
use crate::models::{ProxyEvent, ProxyResponse};

/// Lambda event handler. Proxies the event through `adapter` and returns the
/// platform response.
///
/// # Errors
///
/// Returns a `Diagnostic` whose `error_type` names the failure:
///
/// - `DecodeError`: The body was flagged as base64 but is not
/// - `RequestBuildError`: The method, URL or a header was rejected
/// - `SerializationError`: The request context or stage variables could not be encoded
/// - `UnsupportedEventTypeError`: The payload is not a supported proxy event
/// - `ResponseConversionError`: The handler wrote a header that is not a string
#[allow(clippy::unused_async)]
pub async fn function_handler<H: Handler>(
    adapter: &ProxyAdapter<H>,
    event: LambdaEvent<ProxyEvent>,
) -> Result<ProxyResponse, Diagnostic> {
    let (payload, context) = event.into_parts();

    info!(
        request_id = %context.request_id,
        event_type = %payload.kind(),
        "Proxying invocation"
    );

    adapter.proxy(&payload).map_err(|e| {
        error!(
            request_id = %context.request_id,
            fallback_status = e.fallback.status_code(),
            "Proxy invocation failed"
        );
        Diagnostic::from(e)
    })
}
