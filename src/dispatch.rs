//! Concurrent event dispatch with per-handler failure isolation.

use crate::config::WebhookConfig;
use crate::error::{Result, WebhookError};
use crate::events::WebhookEvent;
use crate::registry::HandlerRegistry;
use futures::future::join_all;
use std::sync::Arc;

/// Summary of a successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Number of handlers that matched and ran.
    pub matched: usize,
}

/// Dispatches verified events to the handlers registered for their type.
///
/// Constructed with its resolved handler table up front; nothing about it is
/// mutated after startup, so concurrent requests share it freely.
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    log_matching_event_handlers: bool,
}

impl Dispatcher {
    pub fn new(registry: Arc<HandlerRegistry>, config: &WebhookConfig) -> Self {
        Self {
            registry,
            log_matching_event_handlers: config.logging.log_matching_event_handlers,
        }
    }

    /// Fan a verified event out to every matching handler.
    ///
    /// All matching handlers are launched concurrently and every one of them
    /// runs to completion; a failing handler never cancels its siblings. Each
    /// failure is logged independently, and the dispatch as a whole reports
    /// [`WebhookError::HandlerExecution`] if any handler failed.
    ///
    /// An event with no routable type, or a type nobody registered for, is a
    /// silent no-op success.
    pub async fn dispatch(&self, event: &WebhookEvent) -> Result<DispatchOutcome> {
        let Some(event_type) = event.event_type() else {
            tracing::debug!("Webhook event carries no event type, nothing to dispatch");
            return Ok(DispatchOutcome { matched: 0 });
        };

        let handlers = self.registry.lookup(event_type);
        if handlers.is_empty() {
            tracing::debug!(event_type, "No handlers registered for event type");
            return Ok(DispatchOutcome { matched: 0 });
        }

        if self.log_matching_event_handlers {
            tracing::info!(
                event_type,
                handlers = handlers.len(),
                "Received webhook event, forwarding to matching handlers"
            );
        }

        // Launch all, join all, collect errors - no early abort
        let results = join_all(handlers.iter().map(|handler| handler.handle(event))).await;

        let total = results.len();
        let mut failed = 0;
        for error in results.iter().filter_map(|r| r.as_ref().err()) {
            failed += 1;
            tracing::error!(event_type, error = %error, "Webhook handler failed");
        }

        if failed > 0 {
            return Err(WebhookError::HandlerExecution { failed, total });
        }

        Ok(DispatchOutcome { matched: total })
    }
}
