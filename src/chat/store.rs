//! The conversation's message store.
//!
//! Owns the append-only message sequence and mediates the outbound translate
//! call for every send. Translation failures never escape `send_message`:
//! the message is delivered with its original text and a notice is published
//! on the side channel instead.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use super::gateway::TranslationGateway;
use crate::core::models::{AudioAttachment, Message, Role, TranslateRequest};

const NOTICE_CAPACITY: usize = 64;

pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Side-channel notifications published by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreNotice {
    /// The message was delivered with `translated_text == original_text`.
    TranslationUnavailable {
        message_id: String,
        reason: String,
    },
    /// A send completed after `clear_messages` and was not appended.
    StaleResultDiscarded { message_id: String },
}

/// Everything needed to send one message.
#[derive(Debug, Clone, PartialEq)]
pub struct SendRequest {
    pub text: String,
    pub role: Role,
    pub source_language: String,
    pub target_language: String,
    pub audio: Option<AudioAttachment>,
}

impl SendRequest {
    pub fn new(
        text: impl Into<String>,
        role: Role,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            role,
            source_language: source_language.into(),
            target_language: target_language.into(),
            audio: None,
        }
    }

    #[must_use]
    pub fn with_audio(mut self, audio: AudioAttachment) -> Self {
        self.audio = Some(audio);
        self
    }
}

#[derive(Debug, Default)]
struct StoreState {
    messages: Vec<Message>,
    generation: u64,
}

/// Holds one in-flight slot for as long as it lives, so the count is
/// released on every exit path, including a dropped send future.
struct InFlightGuard<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct MessageStore {
    translator: Arc<dyn TranslationGateway>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    state: Mutex<StoreState>,
    in_flight: AtomicUsize,
    notices: broadcast::Sender<StoreNotice>,
}

impl MessageStore {
    #[must_use]
    pub fn new(translator: Arc<dyn TranslationGateway>) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            translator,
            ids: Arc::new(UuidGenerator),
            clock: Arc::new(SystemClock),
            state: Mutex::new(StoreState::default()),
            in_flight: AtomicUsize::new(0),
            notices,
        }
    }

    #[must_use]
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Translates and appends one message, returning it.
    ///
    /// Never fails: when the translation gateway errors or returns blank text
    /// the message carries its original text as the translation. Messages are
    /// appended in completion order. A send that completes after
    /// `clear_messages` is returned but not appended.
    pub async fn send_message(&self, request: SendRequest) -> Message {
        let generation = self.lock().generation;
        let _busy = InFlightGuard::acquire(&self.in_flight);

        let SendRequest {
            text,
            role,
            source_language,
            target_language,
            audio,
        } = request;

        let translate_request = TranslateRequest {
            text,
            source_language,
            target_language,
            role,
        };

        let outcome = self.translator.translate(&translate_request).await;
        let TranslateRequest { text, .. } = translate_request;

        let (translated_text, degraded_reason) = match outcome {
            Ok(translated) if !translated.trim().is_empty() => (translated, None),
            Ok(_) => (text.clone(), Some("empty translation".to_string())),
            Err(e) => (text.clone(), Some(e.to_string())),
        };

        let message = Message {
            id: self.ids.next_id(),
            role,
            original_text: text,
            translated_text,
            timestamp: self.clock.now(),
            audio,
        };

        if let Some(reason) = degraded_reason {
            warn!(message_id = %message.id, reason = %reason, "Translation unavailable; delivering original text");
            self.notify(StoreNotice::TranslationUnavailable {
                message_id: message.id.clone(),
                reason,
            });
        }

        let appended = {
            let mut state = self.lock();
            if state.generation == generation {
                state.messages.push(message.clone());
                true
            } else {
                false
            }
        };

        if appended {
            info!(message_id = %message.id, role = %message.role, "Message appended");
        } else {
            warn!(message_id = %message.id, "Conversation cleared while sending; result discarded");
            self.notify(StoreNotice::StaleResultDiscarded {
                message_id: message.id.clone(),
            });
        }

        message
    }

    /// Empties the conversation. In-flight sends started before this call
    /// will not be appended.
    pub fn clear_messages(&self) {
        let mut state = self.lock();
        state.messages.clear();
        state.generation += 1;
        info!(generation = state.generation, "Conversation cleared");
    }

    /// Case-insensitive substring filter over original and translated text.
    /// A blank query returns every message.
    #[must_use]
    pub fn search_messages(&self, query: &str) -> Vec<Message> {
        let state = self.lock();
        if query.trim().is_empty() {
            return state.messages.clone();
        }

        let lowered = query.to_lowercase();
        state
            .messages
            .iter()
            .filter(|m| m.matches(&lowered))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().messages.is_empty()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Advisory: true while any send is waiting on the translation gateway.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreNotice> {
        self.notices.subscribe()
    }

    fn notify(&self, notice: StoreNotice) {
        // No subscribers is fine.
        let _ = self.notices.send(notice);
    }
}
