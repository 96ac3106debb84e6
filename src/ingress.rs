//! The ingress endpoint: the HTTP boundary of the webhook pipeline.
//!
//! Per request: extract the signature header and raw body, verify, parse,
//! dispatch, and map the outcome to an HTTP status. 200 with an empty body on
//! success (including the no-handlers-matched case), generic 500 on any fault.

use crate::config::PaystackConfig;
use crate::dispatch::Dispatcher;
use crate::error::{Result, WebhookError};
use crate::events::WebhookEvent;
use crate::registry::HandlerRegistry;
use crate::verification::{HmacSha512Verifier, SignatureVerifier, Verification};
use axum::{
    Router,
    body::Bytes,
    extract::{Request, State},
    http::StatusCode,
    routing::post,
};
use std::sync::Arc;

/// Header carrying the hex-encoded HMAC-SHA512 digest of the request body.
pub const SIGNATURE_HEADER: &str = "x-paystack-signature";

const DEFAULT_ROUTE: &str = "/paystack/webhook";

/// Raw-body override for deployments where earlier middleware has already
/// consumed or transformed the request body.
///
/// Insert `RawBody` as a request extension with the untouched bytes the
/// provider signed, and the ingress handler will verify against it instead of
/// the transport body.
#[derive(Debug, Clone)]
pub struct RawBody(pub Bytes);

/// The Paystack webhook route module.
///
/// Construct it with the startup configuration and a fully-populated
/// [`HandlerRegistry`], then merge [`WebhookModule::router`] into the
/// application router. Construction fails fast when the module cannot verify
/// traffic, so a misconfigured deployment never starts serving.
pub struct WebhookModule {
    state: Arc<WebhookState>,
    route: String,
}

impl std::fmt::Debug for WebhookModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookModule")
            .field("route", &self.route)
            .finish_non_exhaustive()
    }
}

struct WebhookState {
    verifier: Arc<dyn SignatureVerifier>,
    dispatcher: Dispatcher,
}

impl WebhookModule {
    /// Create the module with the stock HMAC-SHA512 verifier.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Configuration`] when the webhook secret is
    /// missing.
    pub fn new(config: &PaystackConfig, registry: HandlerRegistry) -> Result<Self> {
        if config.webhook.secret.is_empty() {
            return Err(WebhookError::configuration(
                "Missing Paystack webhook secret; the module is improperly configured \
                 and will be unable to process incoming webhooks",
            ));
        }

        let verifier = Arc::new(HmacSha512Verifier::new(config.webhook.secret.as_bytes()));
        Ok(Self::with_verifier(config, registry, verifier))
    }

    /// Create the module with a custom [`SignatureVerifier`].
    ///
    /// Intended for tests and development wiring (for example
    /// [`NoVerification`](crate::verification::NoVerification)); the caller
    /// takes responsibility for the verifier's configuration.
    pub fn with_verifier(
        config: &PaystackConfig,
        registry: HandlerRegistry,
        verifier: Arc<dyn SignatureVerifier>,
    ) -> Self {
        if registry.is_empty() {
            tracing::warn!(
                "No webhook handlers registered; incoming events will be accepted and discarded"
            );
        }

        let dispatcher = Dispatcher::new(Arc::new(registry), &config.webhook);
        let route = route_path(config.webhook.route_prefix.as_deref());

        tracing::info!(route = %route, "Initializing Paystack webhook module");

        Self {
            state: Arc::new(WebhookState {
                verifier,
                dispatcher,
            }),
            route,
        }
    }

    /// The path the endpoint is mounted at.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Build the router exposing `POST` on the configured path.
    pub fn router(self) -> Router {
        Router::new()
            .route(&self.route, post(handle_webhook))
            .with_state(self.state)
    }
}

fn route_path(prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) => format!("/{}", prefix.trim_matches('/')),
        None => DEFAULT_ROUTE.to_string(),
    }
}

async fn handle_webhook(
    State(state): State<Arc<WebhookState>>,
    request: Request,
) -> Result<StatusCode> {
    let (parts, body) = request.into_parts();

    let signature = parts
        .headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .ok_or_else(|| {
            WebhookError::signature_verification(format!("missing {SIGNATURE_HEADER} header"))
        })?;

    // Prefer the raw bytes stashed by upstream middleware; verification must
    // see exactly what the provider signed.
    let raw = match parts.extensions.get::<RawBody>() {
        Some(RawBody(bytes)) => bytes.clone(),
        None => axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(|e| WebhookError::invalid_payload(format!("failed to read body: {e}")))?,
    };

    if let Verification::Rejected(reason) = state.verifier.verify(&raw, &signature).await {
        return Err(WebhookError::signature_verification(reason.to_string()));
    }

    let event = WebhookEvent::from_slice(&raw)?;
    state.dispatcher.dispatch(&event).await?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    fn config() -> PaystackConfig {
        ConfigBuilder::new()
            .with_secret_key("sk_test_123")
            .with_webhook_secret("secret")
            .build()
            .unwrap()
    }

    #[test]
    fn test_default_route() {
        assert_eq!(route_path(None), "/paystack/webhook");
    }

    #[test]
    fn test_prefix_replaces_route() {
        assert_eq!(route_path(Some("paystack")), "/paystack");
        assert_eq!(route_path(Some("billing/hooks")), "/billing/hooks");
        // Surrounding slashes in the prefix are tolerated
        assert_eq!(route_path(Some("/paystack/")), "/paystack");
    }

    #[test]
    fn test_new_fails_without_webhook_secret() {
        let mut config = config();
        config.webhook.secret.clear();

        let err = WebhookModule::new(&config, HandlerRegistry::empty()).unwrap_err();
        assert!(matches!(err, WebhookError::Configuration(_)));
    }

    #[test]
    fn test_module_reports_configured_route() {
        let module = WebhookModule::new(&config(), HandlerRegistry::empty()).unwrap();
        assert_eq!(module.route(), "/paystack/webhook");

        let mut config = config();
        config.webhook.route_prefix = Some("paystack".to_string());
        let module = WebhookModule::new(&config, HandlerRegistry::empty()).unwrap();
        assert_eq!(module.route(), "/paystack");
    }
}
