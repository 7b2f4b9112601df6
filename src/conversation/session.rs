//! Session driver
//!
//! [`Session`] owns a [`ConversationState`] and performs the effects it asks
//! for: completion requests run on a spawned task whose result comes back as
//! an [`Event::CompletionResolved`], and notifications go to the configured
//! [`Notifier`]. Dropping the session aborts any request still in flight, so
//! a late reply never lands on a discarded conversation.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::conversation::state::{CompletionResult, ConversationState, Effect, Event};
use crate::notify::Notifier;
use crate::prompts::NETWORK_FALLBACK_REPLY;
use crate::providers::CompletionClient;

/// One interactive lesson
pub struct Session {
    state: ConversationState,
    client: Arc<dyn CompletionClient>,
    notifier: Arc<dyn Notifier>,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    in_flight: Option<JoinHandle<()>>,
}

impl Session {
    /// Create a session with an empty conversation
    ///
    /// # Arguments
    ///
    /// * `client` - Completion service used for tutor replies
    /// * `notifier` - Destination for user-visible notifications
    pub fn new(client: Arc<dyn CompletionClient>, notifier: Arc<dyn Notifier>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: ConversationState::new(),
            client,
            notifier,
            events_tx,
            events_rx,
            in_flight: None,
        }
    }

    /// Read access to the conversation
    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Submit raw input; the current phase decides what it means
    ///
    /// Must be called from within a Tokio runtime, since an accepted chat
    /// message spawns its completion request.
    pub fn submit(&mut self, raw: &str) {
        self.dispatch(Event::Submit(raw.to_string()));
    }

    /// Apply an event and perform the resulting effect
    pub fn dispatch(&mut self, event: Event) {
        let effect = self.state.apply(event);
        self.perform(effect);
    }

    /// Wait for the in-flight completion and apply its result
    ///
    /// Returns immediately when nothing is pending. A request task that ends
    /// without reporting (a panic in the client, or an abort) resolves as a
    /// failed request, so the conversation never stays pending.
    pub async fn wait_for_reply(&mut self) {
        if !self.state.pending_request() {
            return;
        }

        let event = match self.in_flight.as_mut() {
            Some(handle) => match handle.await {
                Ok(()) => self
                    .events_rx
                    .try_recv()
                    .unwrap_or_else(|_| Self::lost_request()),
                Err(e) => {
                    tracing::error!("Completion task ended without a result: {}", e);
                    Self::lost_request()
                }
            },
            None => match self.events_rx.recv().await {
                Some(event) => event,
                None => Self::lost_request(),
            },
        };
        self.in_flight = None;
        self.dispatch(event);
    }

    fn lost_request() -> Event {
        Event::CompletionResolved(CompletionResult::failed(NETWORK_FALLBACK_REPLY))
    }

    fn perform(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Notify(notification) => self.notifier.notify(&notification),
            Effect::RequestCompletion(text) => {
                let client = Arc::clone(&self.client);
                let events_tx = self.events_tx.clone();
                self.in_flight = Some(tokio::spawn(async move {
                    let result = match client.try_complete(&text).await {
                        Ok(reply) => CompletionResult::delivered(reply),
                        Err(e) => {
                            tracing::error!("Completion request failed: {:#}", e);
                            CompletionResult::failed(NETWORK_FALLBACK_REPLY)
                        }
                    };
                    // receiver is gone only when the session was dropped
                    let _ = events_tx.send(Event::CompletionResolved(result));
                }));
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
