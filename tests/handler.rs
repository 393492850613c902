// Lambda handler tests
// These run complete invocations through `function_handler`
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use aws_lambda_http_proxy::handler::function_handler;
use aws_lambda_http_proxy::models::{ProxyEvent, ProxyResponse};
use aws_lambda_http_proxy::{Config, ProxyAdapter, ResponseRecorder};
use http::{Request, StatusCode};
use lambda_runtime::{Context, Diagnostic, LambdaEvent};
use serde_json::{Value, json};

fn echo_path(w: &mut ResponseRecorder, request: Request<Vec<u8>>) {
    if request.uri().path() == "/missing" {
        w.write_header(StatusCode::NOT_FOUND);
    }
    w.write(request.uri().path().as_bytes());
}

/// Helper function to create a test Lambda event from a raw payload
fn create_test_lambda_event(payload: Value) -> LambdaEvent<ProxyEvent> {
    let payload: ProxyEvent = serde_json::from_value(payload)
        .expect("Failed to parse test event JSON - this indicates a test setup issue");
    LambdaEvent {
        payload,
        context: Context::default(),
    }
}

fn gateway_payload(path: &str) -> Value {
    json!({
        "resource": "/{proxy+}",
        "path": path,
        "httpMethod": "GET",
        "headers": {},
        "stageVariables": null,
        "requestContext": {"stage": "prod", "requestId": "test-request", "httpMethod": "GET"},
        "body": null,
        "isBase64Encoded": false
    })
}

#[tokio::test]
async fn test_gateway_invocation() {
    let adapter = ProxyAdapter::new(echo_path);

    let response = function_handler(&adapter, create_test_lambda_event(gateway_payload("/items")))
        .await
        .unwrap();

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["statusCode"], 200);
    assert_eq!(value["body"], "/items");
    assert_eq!(value["isBase64Encoded"], false);
    assert!(value.get("statusDescription").is_none());
}

#[tokio::test]
async fn test_target_group_invocation() {
    let adapter = ProxyAdapter::new(echo_path);
    let event = create_test_lambda_event(json!({
        "requestContext": {"elb": {"targetGroupArn": "arn:aws:elasticloadbalancing:us-east-1:123:targetgroup/tg/1"}},
        "httpMethod": "GET",
        "path": "/missing",
        "queryStringParameters": {},
        "headers": {},
        "body": "",
        "isBase64Encoded": false
    }));

    let response = function_handler(&adapter, event).await.unwrap();

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["statusCode"], 404);
    assert_eq!(value["statusDescription"], "404 Not Found");
    assert_eq!(value["body"], "/missing");
}

#[tokio::test]
async fn test_configured_base_path() {
    let config = Config::from_lookup(|key| (key == "STRIP_BASE_PATH").then(|| "/v1".to_string()))
        .unwrap();
    let adapter = ProxyAdapter::with_accessor(echo_path, config.request_accessor());

    let response = function_handler(&adapter, create_test_lambda_event(gateway_payload("/v1/users/5")))
        .await
        .unwrap();
    assert_eq!(response.body(), b"/users/5");
}

#[tokio::test]
async fn test_unsupported_invocation_reports_diagnostic() {
    let adapter = ProxyAdapter::new(echo_path);
    let event = create_test_lambda_event(json!({"version": "2.0", "rawPath": "/"}));

    let result = function_handler(&adapter, event).await;
    assert!(result.is_err(), "Unsupported event should result in error");

    if let Err(diagnostic) = result {
        assert_eq!(diagnostic.error_type, "UnsupportedEventTypeError");
        assert!(diagnostic.error_message.contains("ApiGatewayV2httpRequest"));
    }
}

#[tokio::test]
async fn test_malformed_body_reports_diagnostic() {
    let adapter = ProxyAdapter::new(echo_path);
    let mut payload = gateway_payload("/upload");
    payload["body"] = json!("***");
    payload["isBase64Encoded"] = json!(true);

    let result = function_handler(&adapter, create_test_lambda_event(payload)).await;

    if let Err(diagnostic) = result {
        assert_eq!(diagnostic.error_type, "DecodeError");
    } else {
        panic!("Malformed base64 body should result in error");
    }
}

#[tokio::test]
async fn test_concurrent_invocations() {
    let adapter = ProxyAdapter::new(echo_path);

    let invocations = (0..10).map(|i| {
        let event = create_test_lambda_event(gateway_payload(&format!("/users/{i}")));
        function_handler(&adapter, event)
    });

    let results: Vec<Result<ProxyResponse, Diagnostic>> =
        futures::future::join_all(invocations).await;

    for (i, result) in results.into_iter().enumerate() {
        let response = result.expect("Concurrent invocation should succeed");
        assert_eq!(response.body(), format!("/users/{i}").as_bytes());
    }
}

#[test]
fn test_invocation_without_runtime() {
    let adapter = ProxyAdapter::new(echo_path);
    let event = create_test_lambda_event(gateway_payload("/health"));

    let response = tokio_test::block_on(function_handler(&adapter, event)).unwrap();
    assert_eq!(response.status_code(), 200);
}
