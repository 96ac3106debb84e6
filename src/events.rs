//! Webhook event payloads and the Paystack event vocabulary.

use crate::error::{Result, WebhookError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A webhook event received from Paystack.
///
/// The payload is carried opaquely: the only field this crate interprets is
/// the event name used as the routing key. Everything else is passed through
/// unmodified to the registered handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebhookEvent {
    payload: Value,
}

impl WebhookEvent {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Parse an event from the raw request body.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let payload = serde_json::from_slice(bytes)
            .map_err(|e| WebhookError::invalid_payload(format!("body is not valid JSON: {e}")))?;
        Ok(Self { payload })
    }

    /// The routing key for this event.
    ///
    /// Paystack payloads carry the event name in `event`; `type` is accepted
    /// as a fallback. Returns `None` when neither field holds a non-empty
    /// string, in which case no handlers match.
    pub fn event_type(&self) -> Option<&str> {
        ["event", "type"]
            .into_iter()
            .filter_map(|key| self.payload.get(key).and_then(Value::as_str))
            .find(|s| !s.is_empty())
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }
}

impl From<Value> for WebhookEvent {
    fn from(payload: Value) -> Self {
        Self::new(payload)
    }
}

/// The closed set of event types Paystack delivers over webhooks.
///
/// Handlers are registered against these names; the string forms match the
/// `event` field of incoming payloads (e.g. `charge.success`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    ChargeDisputeCreate,
    ChargeDisputeRemind,
    ChargeDisputeResolve,
    ChargeSuccess,
    CustomerIdentificationFailed,
    CustomerIdentificationSuccess,
    InvoiceCreate,
    InvoicePaymentFailed,
    InvoiceUpdate,
    PaymentRequestPending,
    PaymentRequestSuccess,
    SubscriptionCreate,
    SubscriptionDisable,
    SubscriptionExpiringCards,
    SubscriptionNotRenew,
    TransferFailed,
    TransferSuccess,
    TransferReversed,
}

impl EventType {
    /// All known event types, in vocabulary order.
    pub const ALL: [EventType; 18] = [
        EventType::ChargeDisputeCreate,
        EventType::ChargeDisputeRemind,
        EventType::ChargeDisputeResolve,
        EventType::ChargeSuccess,
        EventType::CustomerIdentificationFailed,
        EventType::CustomerIdentificationSuccess,
        EventType::InvoiceCreate,
        EventType::InvoicePaymentFailed,
        EventType::InvoiceUpdate,
        EventType::PaymentRequestPending,
        EventType::PaymentRequestSuccess,
        EventType::SubscriptionCreate,
        EventType::SubscriptionDisable,
        EventType::SubscriptionExpiringCards,
        EventType::SubscriptionNotRenew,
        EventType::TransferFailed,
        EventType::TransferSuccess,
        EventType::TransferReversed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ChargeDisputeCreate => "charge.dispute.create",
            EventType::ChargeDisputeRemind => "charge.dispute.remind",
            EventType::ChargeDisputeResolve => "charge.dispute.resolve",
            EventType::ChargeSuccess => "charge.success",
            EventType::CustomerIdentificationFailed => "customeridentification.failed",
            EventType::CustomerIdentificationSuccess => "customeridentification.success",
            EventType::InvoiceCreate => "invoice.create",
            EventType::InvoicePaymentFailed => "invoice.payment_failed",
            EventType::InvoiceUpdate => "invoice.update",
            EventType::PaymentRequestPending => "paymentrequest.pending",
            EventType::PaymentRequestSuccess => "paymentrequest.success",
            EventType::SubscriptionCreate => "subscription.create",
            EventType::SubscriptionDisable => "subscription.disable",
            EventType::SubscriptionExpiringCards => "subscription.expiring_cards",
            EventType::SubscriptionNotRenew => "subscription.not_renew",
            EventType::TransferFailed => "transfer.failed",
            EventType::TransferSuccess => "transfer.success",
            EventType::TransferReversed => "transfer.reversed",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized event type string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown Paystack event type: {0}")]
pub struct UnknownEventType(pub String);

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}
