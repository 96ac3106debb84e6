//! Testing utilities for webhook pipelines
//!
//! Provides an in-process HTTP scenario builder (no server required), handler
//! test doubles, and a signing helper that produces the same hex HMAC-SHA512
//! digest Paystack sends in `x-paystack-signature`.
//!
//! # Example
//!
//! ```rust,ignore
//! use paystack_webhooks::testing::{self, RecordingHandler, sign};
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_charge_success_is_routed() {
//!     let recording = RecordingHandler::new();
//!     let registry = HandlerRegistry::builder()
//!         .on(EventType::ChargeSuccess, recording.clone())
//!         .build();
//!     let app = WebhookModule::new(&config, registry).unwrap().router();
//!
//!     testing::post(app, "/paystack/webhook")
//!         .signed_json_body("secret", &json!({"event": "charge.success"}))
//!         .execute()
//!         .await
//!         .assert_ok();
//!
//!     assert_eq!(recording.invocations(), 1);
//! }
//! ```

mod fixtures;
mod scenario;

pub use fixtures::{FailingHandler, RecordingHandler, sign};
pub use scenario::{Scenario, ScenarioAssert, post};
