use crate::error::{Result, WebhookError};
use crate::utils::get_env_with_prefix;
use serde::{Deserialize, Serialize};

/// Main configuration for the Paystack webhook module
///
/// Supplied once at startup and never mutated afterwards. Owned by the
/// ingress endpoint and the verifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaystackConfig {
    /// Paystack API secret key (`sk_test_...` / `sk_live_...`).
    ///
    /// Outbound API calls are out of scope for this crate; the key lives here
    /// so one config block covers a Paystack integration end to end.
    pub secret_key: String,
    pub webhook: WebhookConfig,
}

/// Configuration for processing incoming webhooks
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebhookConfig {
    /// The webhook secret registered in the Paystack dashboard, used to
    /// verify delivery signatures. Required.
    #[serde(default)]
    pub secret: String,

    /// Override for the endpoint path. `Some("paystack")` mounts the endpoint
    /// at `POST /paystack` instead of the default `POST /paystack/webhook`.
    #[serde(default)]
    pub route_prefix: Option<String>,

    #[serde(default)]
    pub logging: WebhookLoggingConfig,
}

/// Logging configuration for webhook processing
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct WebhookLoggingConfig {
    /// If `true`, log the number of event handlers that match each incoming
    /// webhook event before they are invoked.
    #[serde(default)]
    pub log_matching_event_handlers: bool,
}

impl PaystackConfig {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for [`PaystackConfig`] with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    secret_key: String,
    webhook: WebhookConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            secret_key: String::new(),
            webhook: WebhookConfig::default(),
        }
    }

    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = secret_key.into();
        self
    }

    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook.secret = secret.into();
        self
    }

    pub fn with_route_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.webhook.route_prefix = Some(prefix.into());
        self
    }

    pub fn with_log_matching_event_handlers(mut self, enabled: bool) -> Self {
        self.webhook.logging.log_matching_event_handlers = enabled;
        self
    }

    /// Load configuration from environment variables with PAYSTACK_ prefix
    ///
    /// Reads `PAYSTACK_SECRET_KEY`, `PAYSTACK_WEBHOOK_SECRET`,
    /// `PAYSTACK_ROUTE_PREFIX` and `PAYSTACK_LOG_MATCHING_EVENT_HANDLERS`,
    /// each falling back to the unprefixed name.
    pub fn from_env(mut self) -> Self {
        if let Some(secret_key) = get_env_with_prefix("SECRET_KEY") {
            self.secret_key = secret_key;
        }
        if let Some(secret) = get_env_with_prefix("WEBHOOK_SECRET") {
            self.webhook.secret = secret;
        }
        if let Some(prefix) = get_env_with_prefix("ROUTE_PREFIX") {
            self.webhook.route_prefix = Some(prefix);
        }
        if let Some(enabled) = get_env_with_prefix("LOG_MATCHING_EVENT_HANDLERS") {
            self.webhook.logging.log_matching_event_handlers =
                enabled.parse().unwrap_or(false);
        }
        self
    }

    /// Build the configuration, validating all settings
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Configuration`] if the API secret key or the
    /// webhook secret is missing. Both are fatal at startup: the module must
    /// not accept traffic it cannot verify.
    pub fn build(self) -> Result<PaystackConfig> {
        if self.secret_key.is_empty() {
            return Err(WebhookError::configuration(
                "Missing Paystack secret key (PAYSTACK_SECRET_KEY)",
            ));
        }

        if self.webhook.secret.is_empty() {
            return Err(WebhookError::configuration(
                "Missing Paystack webhook secret; the module is improperly configured \
                 and will be unable to process incoming webhooks",
            ));
        }

        Ok(PaystackConfig {
            secret_key: self.secret_key,
            webhook: self.webhook,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
