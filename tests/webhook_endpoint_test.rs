//! End-to-end tests for the webhook ingress endpoint: signature checks,
//! routing by event type, fan-out failure handling, and path configuration.

use axum::{Extension, body::Bytes};
use paystack_webhooks::testing::{FailingHandler, RecordingHandler, post, sign};
use paystack_webhooks::{
    ConfigBuilder, EventType, HandlerRegistry, PaystackConfig, RawBody, SIGNATURE_HEADER,
    WebhookModule,
};
use serde_json::{Value, json};

fn config() -> PaystackConfig {
    ConfigBuilder::new()
        .with_secret_key("sk_test_123")
        .with_webhook_secret("secret")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_valid_signature_routes_event_to_handler() {
    let recording = RecordingHandler::new();
    let registry = HandlerRegistry::builder()
        .on(EventType::ChargeSuccess, recording.clone())
        .build();
    let app = WebhookModule::new(&config(), registry).unwrap().router();

    let body = post(app, "/paystack/webhook")
        .signed_json_body("secret", &json!({"event": "charge.success"}))
        .execute()
        .await
        .assert_ok()
        .body_string()
        .await;

    // Success responses carry no body
    assert!(body.is_empty());
    assert_eq!(recording.invocations(), 1);
    assert_eq!(recording.received(), vec![json!({"event": "charge.success"})]);
}

#[tokio::test]
async fn test_invalid_signature_is_rejected_with_500() {
    let recording = RecordingHandler::new();
    let registry = HandlerRegistry::builder()
        .on(EventType::ChargeSuccess, recording.clone())
        .build();
    let app = WebhookModule::new(&config(), registry).unwrap().router();

    let error: Value = post(app, "/paystack/webhook")
        .header(SIGNATURE_HEADER, "paystack")
        .json_body(&json!({"event": "charge.success"}))
        .execute()
        .await
        .assert_server_error()
        .json()
        .await;

    assert_eq!(error["error"], "Error validating webhook event");
    assert_eq!(recording.invocations(), 0);
}

#[tokio::test]
async fn test_signature_for_different_payload_is_rejected() {
    let recording = RecordingHandler::new();
    let registry = HandlerRegistry::builder()
        .on(EventType::ChargeSuccess, recording.clone())
        .build();
    let app = WebhookModule::new(&config(), registry).unwrap().router();

    let signature = sign("secret", br#"{"event":"transfer.success"}"#);

    post(app, "/paystack/webhook")
        .header(SIGNATURE_HEADER, &signature)
        .json_body(&json!({"event": "charge.success"}))
        .execute()
        .await
        .assert_server_error();

    assert_eq!(recording.invocations(), 0);
}

#[tokio::test]
async fn test_missing_signature_header_is_rejected_with_500() {
    let recording = RecordingHandler::new();
    let registry = HandlerRegistry::builder()
        .on(EventType::ChargeSuccess, recording.clone())
        .build();
    let app = WebhookModule::new(&config(), registry).unwrap().router();

    post(app, "/paystack/webhook")
        .json_body(&json!({"event": "charge.success"}))
        .execute()
        .await
        .assert_server_error();

    assert_eq!(recording.invocations(), 0);
}

#[tokio::test]
async fn test_unregistered_event_type_returns_200_without_dispatch() {
    let recording = RecordingHandler::new();
    let registry = HandlerRegistry::builder()
        .on(EventType::ChargeSuccess, recording.clone())
        .build();
    let app = WebhookModule::new(&config(), registry).unwrap().router();

    post(app, "/paystack/webhook")
        .signed_json_body("secret", &json!({"event": "invoice.update"}))
        .execute()
        .await
        .assert_ok();

    assert_eq!(recording.invocations(), 0);
}

#[tokio::test]
async fn test_empty_registry_accepts_and_discards() {
    let app = WebhookModule::new(&config(), HandlerRegistry::empty())
        .unwrap()
        .router();

    post(app, "/paystack/webhook")
        .signed_json_body("secret", &json!({"event": "charge.success"}))
        .execute()
        .await
        .assert_ok();
}

#[tokio::test]
async fn test_payload_without_event_type_returns_200() {
    let recording = RecordingHandler::new();
    let registry = HandlerRegistry::builder()
        .on(EventType::ChargeSuccess, recording.clone())
        .build();
    let app = WebhookModule::new(&config(), registry).unwrap().router();

    post(app, "/paystack/webhook")
        .signed_json_body("secret", &json!({"data": {"amount": 5000}}))
        .execute()
        .await
        .assert_ok();

    assert_eq!(recording.invocations(), 0);
}

#[tokio::test]
async fn test_unparseable_body_after_verification_is_500() {
    let app = WebhookModule::new(&config(), HandlerRegistry::empty())
        .unwrap()
        .router();

    let body = "not json";
    let signature = sign("secret", body.as_bytes());

    post(app, "/paystack/webhook")
        .header(SIGNATURE_HEADER, &signature)
        .text_body(body)
        .execute()
        .await
        .assert_server_error();
}

#[tokio::test]
async fn test_handler_failure_surfaces_500_but_siblings_run() {
    let recording = RecordingHandler::new();
    let failing = FailingHandler::new("downstream unavailable");
    let registry = HandlerRegistry::builder()
        .on(EventType::ChargeSuccess, recording.clone())
        .on(EventType::ChargeSuccess, failing.clone())
        .build();
    let app = WebhookModule::new(&config(), registry).unwrap().router();

    post(app, "/paystack/webhook")
        .signed_json_body("secret", &json!({"event": "charge.success"}))
        .execute()
        .await
        .assert_server_error();

    assert_eq!(recording.invocations(), 1);
    assert_eq!(failing.invocations(), 1);
}

#[tokio::test]
async fn test_route_prefix_replaces_default_path() {
    let config = ConfigBuilder::new()
        .with_secret_key("sk_test_123")
        .with_webhook_secret("secret")
        .with_route_prefix("paystack")
        .build()
        .unwrap();

    let recording = RecordingHandler::new();
    let registry = HandlerRegistry::builder()
        .on(EventType::ChargeSuccess, recording.clone())
        .build();
    let app = WebhookModule::new(&config, registry).unwrap().router();

    // Endpoint moved to /paystack
    post(app.clone(), "/paystack")
        .signed_json_body("secret", &json!({"event": "charge.success"}))
        .execute()
        .await
        .assert_ok();

    // The default path is no longer served
    post(app, "/paystack/webhook")
        .signed_json_body("secret", &json!({"event": "charge.success"}))
        .execute()
        .await
        .assert_not_found();

    assert_eq!(recording.invocations(), 1);
}

#[tokio::test]
async fn test_raw_body_extension_overrides_transport_body() {
    let recording = RecordingHandler::new();
    let registry = HandlerRegistry::builder()
        .on(EventType::ChargeSuccess, recording.clone())
        .build();

    // Simulate middleware that consumed the body and stashed the signed bytes
    let cached = br#"{"event":"charge.success"}"#;
    let app = WebhookModule::new(&config(), registry)
        .unwrap()
        .router()
        .layer(Extension(RawBody(Bytes::from_static(cached))));

    let signature = sign("secret", cached);

    post(app, "/paystack/webhook")
        .header(SIGNATURE_HEADER, &signature)
        .text_body("transport body was consumed upstream")
        .execute()
        .await
        .assert_ok();

    assert_eq!(recording.invocations(), 1);
    assert_eq!(recording.received(), vec![json!({"event": "charge.success"})]);
}

#[tokio::test]
async fn test_multiple_handlers_all_receive_the_event() {
    let first = RecordingHandler::new();
    let second = RecordingHandler::new();
    let registry = HandlerRegistry::builder()
        .on(EventType::TransferSuccess, first.clone())
        .on(EventType::TransferSuccess, second.clone())
        .build();
    let app = WebhookModule::new(&config(), registry).unwrap().router();

    let payload = json!({"event": "transfer.success", "data": {"reference": "trf_1"}});

    post(app, "/paystack/webhook")
        .signed_json_body("secret", &payload)
        .execute()
        .await
        .assert_ok();

    assert_eq!(first.received(), vec![payload.clone()]);
    assert_eq!(second.received(), vec![payload]);
}
