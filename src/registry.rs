//! Handler registry mapping event types to application callbacks.
//!
//! The registry is populated once at startup through
//! [`HandlerRegistryBuilder`] and is read-only afterwards, so steady-state
//! lookups never contend with registration.

use crate::error::Result;
use crate::events::{EventType, WebhookEvent};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Trait for handling webhook events
///
/// Implement this for each event type you want to handle, or register a plain
/// async closure through [`HandlerRegistryBuilder::on_fn`].
///
/// # Example
///
/// ```rust,ignore
/// struct ChargeSucceeded {
///     db: DatabasePool,
/// }
///
/// #[async_trait]
/// impl EventHandler for ChargeSucceeded {
///     async fn handle(&self, event: &WebhookEvent) -> Result<()> {
///         let reference = event.payload()["data"]["reference"].as_str();
///         // mark the order as paid
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle the webhook event
    async fn handle(&self, event: &WebhookEvent) -> Result<()>;
}

// Shared handlers can be registered directly; tests rely on this to keep a
// handle on the double they registered.
#[async_trait]
impl<T: EventHandler + ?Sized> EventHandler for Arc<T> {
    async fn handle(&self, event: &WebhookEvent) -> Result<()> {
        (**self).handle(event).await
    }
}

/// Adapter that lets plain async closures act as handlers.
struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F> EventHandler for FnHandler<F>
where
    F: Fn(WebhookEvent) -> BoxFuture<'static, Result<()>> + Send + Sync,
{
    async fn handle(&self, event: &WebhookEvent) -> Result<()> {
        (self.f)(event.clone()).await
    }
}

/// Immutable table mapping event-type strings to their handlers.
///
/// Built exactly once via [`HandlerRegistry::builder`] before the ingress
/// endpoint accepts traffic. An event type with no handlers is not an error;
/// a registry with no handlers at all runs in accept-and-discard mode.
pub struct HandlerRegistry {
    handlers: HashMap<String, Vec<Arc<dyn EventHandler>>>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::new()
    }

    /// An empty registry (accept-and-discard mode).
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Handlers registered for `event_type`, in registration order.
    pub fn lookup(&self, event_type: &str) -> &[Arc<dyn EventHandler>] {
        self.handlers
            .get(event_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of registered handlers across all event types.
    pub fn len(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Event types with at least one handler.
    pub fn registered_types(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }
}

/// Builder for [`HandlerRegistry`]
///
/// Registration happens during application initialization; the built registry
/// is immutable for the process lifetime.
#[must_use = "builder does nothing until you call build()"]
pub struct HandlerRegistryBuilder {
    handlers: HashMap<String, Vec<Arc<dyn EventHandler>>>,
}

impl HandlerRegistryBuilder {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for one of the known Paystack event types.
    ///
    /// Multiple handlers may share an event type; all of them are invoked
    /// when a matching event arrives.
    pub fn on(self, event_type: EventType, handler: impl EventHandler + 'static) -> Self {
        self.on_type(event_type.as_str(), handler)
    }

    /// Register a handler for an arbitrary event-type string.
    ///
    /// Useful for event names Paystack introduces before this crate's
    /// [`EventType`] vocabulary catches up.
    pub fn on_type(
        mut self,
        event_type: impl Into<String>,
        handler: impl EventHandler + 'static,
    ) -> Self {
        let event_type = event_type.into();
        tracing::debug!(event_type = %event_type, "Registering Paystack webhook handler");
        self.handlers
            .entry(event_type)
            .or_default()
            .push(Arc::new(handler));
        self
    }

    /// Register an async closure as a handler.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let registry = HandlerRegistry::builder()
    ///     .on_fn(EventType::ChargeSuccess, |event| async move {
    ///         tracing::info!(payload = %event.payload(), "charge succeeded");
    ///         Ok(())
    ///     })
    ///     .build();
    /// ```
    pub fn on_fn<F, Fut>(self, event_type: EventType, f: F) -> Self
    where
        F: Fn(WebhookEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let f = move |event: WebhookEvent| -> BoxFuture<'static, Result<()>> {
            Box::pin(f(event))
        };
        self.on(event_type, FnHandler { f })
    }

    pub fn build(self) -> HandlerRegistry {
        let registry = HandlerRegistry {
            handlers: self.handlers,
        };
        tracing::info!(
            handlers = registry.len(),
            event_types = registry.handlers.len(),
            "Paystack webhook handler registry built"
        );
        registry
    }
}

impl Default for HandlerRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
