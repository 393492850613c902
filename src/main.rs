use aws_lambda_http_proxy::handler::function_handler;
use aws_lambda_http_proxy::{Config, Handler, ProxyAdapter, RequestAccessor, ResponseRecorder};
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method, Request, StatusCode};
use lambda_runtime::tracing::info;
use lambda_runtime::{Error, service_fn};
use serde_json::json;

/// Small demonstration app: a health check and an endpoint echoing the
/// request along with the platform metadata forwarded by the proxy.
struct DemoRoutes {
    accessor: RequestAccessor,
}

impl Handler for DemoRoutes {
    fn serve_http(&self, w: &mut ResponseRecorder, request: Request<Vec<u8>>) {
        match (request.method(), request.uri().path()) {
            (&Method::GET, "/health") => {
                w.headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
                w.write(b"ok");
            }
            (_, "/echo") => {
                let stage = self
                    .accessor
                    .get_api_gateway_context(&request)
                    .ok()
                    .and_then(|context| context.stage);
                let stage_variables = self
                    .accessor
                    .get_api_gateway_stage_vars(&request)
                    .unwrap_or_default();

                let body = json!({
                    "method": request.method().as_str(),
                    "path": request.uri().path(),
                    "query": request.uri().query(),
                    "stage": stage,
                    "stageVariables": stage_variables,
                    "body": String::from_utf8_lossy(request.body()),
                });

                w.headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                w.write(body.to_string().as_bytes());
            }
            _ => {
                w.headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                w.write_header(StatusCode::NOT_FOUND);
                w.write(json!({ "message": "Not Found" }).to_string().as_bytes());
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Use Lambda runtime's built-in tracing subscriber for CloudWatch Logs
    lambda_runtime::tracing::init_default_subscriber();

    let config = Config::from_env()?;
    info!(
        server_address = %config.server_address,
        strip_base_path = %config.strip_base_path,
        "Loaded proxy configuration"
    );

    let accessor = config.request_accessor();
    let adapter = ProxyAdapter::with_accessor(
        DemoRoutes {
            accessor: accessor.clone(),
        },
        accessor,
    );
    let adapter = &adapter;

    lambda_runtime::run(service_fn(move |event| function_handler(adapter, event))).await
}
