//! Handler test doubles and signing helpers.

use crate::error::Result;
use crate::events::WebhookEvent;
use crate::registry::EventHandler;
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha512;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Compute the hex HMAC-SHA512 digest Paystack would send for `payload`.
pub fn sign(secret: &str, payload: &[u8]) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Handler double that records every payload it receives.
#[derive(Default)]
pub struct RecordingHandler {
    received: Mutex<Vec<Value>>,
}

impl RecordingHandler {
    /// Shared so tests can keep a handle on the instance they registered.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn invocations(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    /// Payloads received so far, in arrival order.
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn handle(&self, event: &WebhookEvent) -> Result<()> {
        self.received.lock().unwrap().push(event.payload().clone());
        Ok(())
    }
}

/// Handler double that always fails, while still counting invocations.
pub struct FailingHandler {
    message: String,
    invocations: AtomicUsize,
}

impl FailingHandler {
    pub fn new(message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            message: message.into(),
            invocations: AtomicUsize::new(0),
        })
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventHandler for FailingHandler {
    async fn handle(&self, _event: &WebhookEvent) -> Result<()> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!("{}", self.message).into())
    }
}
