//! paystack-webhooks - Paystack webhook ingestion and dispatch for axum
//!
//! This crate receives signed Paystack HTTP callbacks, verifies their
//! authenticity with HMAC-SHA512, and routes each event to handlers the
//! application registered for that event type.
//!
//! # Features
//!
//! - **Verification**: HMAC-SHA512 signature checks with constant-time comparison
//! - **Registration**: explicit startup-time handler registry keyed by event type
//! - **Dispatch**: concurrent fan-out with per-handler failure isolation
//! - **Ingress**: a drop-in axum route module mounted at `/paystack/webhook`
//! - **Testing**: in-process request scenarios and handler test doubles
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use paystack_webhooks::{ConfigBuilder, EventType, HandlerRegistry, WebhookModule};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Initialize logging
//!     paystack_webhooks::init_tracing();
//!
//!     let config = ConfigBuilder::new()
//!         .from_env()
//!         .build()?;
//!
//!     // Register handlers before the endpoint accepts traffic
//!     let registry = HandlerRegistry::builder()
//!         .on_fn(EventType::ChargeSuccess, |event| async move {
//!             tracing::info!(payload = %event.payload(), "charge succeeded");
//!             Ok(())
//!         })
//!         .build();
//!
//!     let module = WebhookModule::new(&config, registry)?;
//!     let app = axum::Router::new().merge(module.router());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod dispatch;
mod error;
mod events;
mod ingress;
mod registry;
pub mod testing;
mod utils;
pub mod verification;

// Re-exports for public API
pub use config::{ConfigBuilder, PaystackConfig, WebhookConfig, WebhookLoggingConfig};
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use error::{Result, WebhookError};
pub use events::{EventType, UnknownEventType, WebhookEvent};
pub use ingress::{RawBody, SIGNATURE_HEADER, WebhookModule};
pub use registry::{EventHandler, HandlerRegistry, HandlerRegistryBuilder};
pub use verification::{HmacSha512Verifier, SignatureVerifier, Verification};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// This should be called early in your application, typically in main()
/// before building the webhook module.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "paystack_webhooks=debug")
/// - `PAYSTACK_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("PAYSTACK_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
