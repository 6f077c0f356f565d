//! Generation Lifecycle Controller
//!
//! One controller per logical screen (or CLI phase). It wraps a [`Generator`] with
//! observable Idle/Loading/Success/Error state, keeps the latest payload, and
//! optionally writes that payload to a phase store slot on success.
//!
//! Concurrent `generate` calls are allowed. Each call returns its own outcome, but
//! only the most recently started call may change state or persist; anything that
//! was in flight when a newer call (or `reset`) began is discarded from state.

use crate::error::GenerationError;
use crate::provider::{GenerationRequest, Generator, DEFAULT_MAX_OUTPUT_TOKENS};
use crate::store::PhaseStore;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Observable status of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStatus {
    Idle,
    Loading,
    Success,
    Error,
}

impl LifecycleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStatus::Idle => "idle",
            LifecycleStatus::Loading => "loading",
            LifecycleStatus::Success => "success",
            LifecycleStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleState {
    pub status: LifecycleStatus,
    pub last_error: Option<String>,
}

impl LifecycleState {
    fn with_status(status: LifecycleStatus) -> Self {
        Self {
            status,
            last_error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == LifecycleStatus::Loading
    }
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self::with_status(LifecycleStatus::Idle)
    }
}

/// Message shown to the user for a failed call.
pub fn display_message(err: &GenerationError) -> String {
    let message = err.to_string();
    if err.is_retryable() && !message.to_lowercase().contains("retry") {
        format!("{} Please retry.", message)
    } else {
        message
    }
}

type PromptBuilder<A> = Box<dyn Fn(&A) -> String + Send + Sync>;

struct Slot {
    store: Arc<dyn PhaseStore>,
    key: String,
}

pub struct GenerationController<A: ?Sized> {
    build_prompt: PromptBuilder<A>,
    generator: Arc<dyn Generator>,
    max_output_tokens: u32,
    state: watch::Sender<LifecycleState>,
    payload: Mutex<Option<Value>>,
    failure: Mutex<Option<GenerationError>>,
    epoch: AtomicU64,
    slot: Option<Slot>,
    // Taken before `payload` is released so slot writes land in commit order.
    persist_order: Mutex<()>,
}

impl<A: ?Sized> GenerationController<A> {
    pub fn new<F>(generator: Arc<dyn Generator>, build_prompt: F) -> Self
    where
        F: Fn(&A) -> String + Send + Sync + 'static,
    {
        let (state, _) = watch::channel(LifecycleState::default());
        Self {
            build_prompt: Box::new(build_prompt),
            generator,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            state,
            payload: Mutex::new(None),
            failure: Mutex::new(None),
            epoch: AtomicU64::new(0),
            slot: None,
            persist_order: Mutex::new(()),
        }
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Persist every successful payload under `key`.
    pub fn with_slot(mut self, store: Arc<dyn PhaseStore>, key: impl Into<String>) -> Self {
        self.slot = Some(Slot {
            store,
            key: key.into(),
        });
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Latest successful payload, if any.
    pub fn data(&self) -> Option<Value> {
        self.payload.lock().clone()
    }

    /// Failure behind the current Error state, cleared when a new call starts.
    pub fn last_failure(&self) -> Option<GenerationError> {
        self.failure.lock().clone()
    }

    /// Replace the in-memory payload without touching status.
    pub fn set_data(&self, value: Option<Value>) {
        *self.payload.lock() = value;
    }

    /// Run one generation. Returns the payload on success, `None` on failure.
    pub async fn generate(&self, args: &A) -> Option<Value> {
        let epoch = {
            let _payload = self.payload.lock();
            let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            *self.failure.lock() = None;
            self.state
                .send_replace(LifecycleState::with_status(LifecycleStatus::Loading));
            epoch
        };

        let prompt = (self.build_prompt)(args);
        let request = GenerationRequest::new(prompt).with_max_output_tokens(self.max_output_tokens);
        let outcome = self.generator.generate(request).await;

        let mut payload = self.payload.lock();
        if self.epoch.load(Ordering::SeqCst) != epoch {
            debug!(epoch, "Generation superseded by a newer call; state left untouched");
            return outcome.ok();
        }

        match outcome {
            Ok(value) => {
                *payload = Some(value.clone());
                self.state
                    .send_replace(LifecycleState::with_status(LifecycleStatus::Success));
                let order = self.persist_order.lock();
                drop(payload);
                self.persist(&value);
                drop(order);
                info!(slot = self.slot_key().unwrap_or("-"), "Generation stored");
                Some(value)
            }
            Err(err) => {
                error!(kind = ?err.kind(), error = %err, "AI generation failed");
                self.state.send_replace(LifecycleState {
                    status: LifecycleStatus::Error,
                    last_error: Some(display_message(&err)),
                });
                *self.failure.lock() = Some(err);
                None
            }
        }
    }

    /// Return the stored payload if one exists, otherwise generate.
    pub async fn ensure_generated(&self, args: &A) -> Option<Value> {
        if let Some(existing) = self.cached() {
            debug!(slot = self.slot_key().unwrap_or("-"), "Using cached payload");
            return Some(existing);
        }
        self.generate(args).await
    }

    /// Drop payload and error, back to Idle. In-flight calls will not update state.
    pub fn reset(&self) {
        let mut payload = self.payload.lock();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        *payload = None;
        *self.failure.lock() = None;
        self.state.send_replace(LifecycleState::default());
    }

    fn slot_key(&self) -> Option<&str> {
        self.slot.as_ref().map(|slot| slot.key.as_str())
    }

    fn cached(&self) -> Option<Value> {
        if let Some(value) = self.data() {
            return Some(value);
        }
        let slot = self.slot.as_ref()?;
        let stored = match slot.store.get(&slot.key) {
            Ok(stored) => stored?,
            Err(e) => {
                warn!(key = %slot.key, error = %e, "Failed to read slot; regenerating");
                return None;
            }
        };

        let mut payload = self.payload.lock();
        if self.state.borrow().is_loading() {
            // a call in flight owns state; serve the stored copy without touching it
            return Some(stored);
        }
        *payload = Some(stored.clone());
        self.state
            .send_replace(LifecycleState::with_status(LifecycleStatus::Success));
        Some(stored)
    }

    fn persist(&self, value: &Value) {
        if let Some(slot) = &self.slot {
            if let Err(e) = slot.store.set(&slot.key, value) {
                warn!(key = %slot.key, error = %e, "Failed to persist generated payload");
            }
        }
    }
}
