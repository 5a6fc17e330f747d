//! Transcript state manager: the transcript plus the busy flag.
//!
//! A submission appends the user turn and an empty reply, then hands back a
//! [`StreamRequest`]. Stream events are routed by stream id; events for any
//! stream other than the active one are dropped.

use tracing::{debug, warn};

use crate::api::Content;
use crate::core::error::{ConnectionError, InputRejected};
use crate::core::locale::Locale;
use crate::core::transcript::{ChatTurn, Transcript, TurnId, TurnStatus};

/// Everything the streaming client needs to answer one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamRequest {
    pub stream_id: u64,
    pub context: Vec<Content>,
    pub message: String,
}

#[derive(Debug, Clone, Copy)]
struct ActiveStream {
    stream_id: u64,
    reply: TurnId,
}

#[derive(Debug)]
pub struct ChatSession {
    transcript: Transcript,
    active: Option<ActiveStream>,
    last_stream_id: u64,
    revision: u64,
    locale: Locale,
}

impl ChatSession {
    pub fn new(locale: Locale) -> Self {
        Self {
            transcript: Transcript::new(),
            active: None,
            last_stream_id: 0,
            revision: 0,
            locale,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_current_stream(&self, stream_id: u64) -> bool {
        self.active.is_some_and(|active| active.stream_id == stream_id)
    }

    /// Handle of the reply currently being streamed.
    pub fn pending_reply(&self) -> Option<TurnId> {
        self.active.map(|active| active.reply)
    }

    /// Bumped on every transcript or busy-flag change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn submit(&mut self, text: &str) -> Result<StreamRequest, InputRejected> {
        if text.trim().is_empty() {
            return Err(InputRejected::Empty);
        }
        if self.is_busy() {
            return Err(InputRejected::Busy);
        }

        let context = self.transcript.request_context();
        self.transcript.push(ChatTurn::user(text));
        let reply = self.transcript.push(ChatTurn::pending_reply());

        self.last_stream_id += 1;
        let stream_id = self.last_stream_id;
        self.active = Some(ActiveStream { stream_id, reply });
        self.touch();

        debug!(stream_id, context_turns = context.len(), "submitted message");

        Ok(StreamRequest {
            stream_id,
            context,
            message: text.to_string(),
        })
    }

    pub fn on_fragment(&mut self, stream_id: u64, fragment: &str) -> bool {
        if fragment.is_empty() {
            return false;
        }
        let Some(active) = self.active_for(stream_id) else {
            return false;
        };
        let appended = self.transcript.append_fragment(active.reply, fragment);
        if appended {
            self.touch();
        }
        appended
    }

    pub fn on_stream_end(&mut self, stream_id: u64) -> bool {
        let Some(active) = self.active_for(stream_id) else {
            return false;
        };
        self.transcript.settle(active.reply, TurnStatus::Complete);
        self.active = None;
        self.touch();
        debug!(stream_id, "stream completed");
        true
    }

    /// Keeps whatever text already arrived, then appends the fixed error turn.
    pub fn on_stream_error(&mut self, stream_id: u64, error: &ConnectionError) -> bool {
        let Some(active) = self.active_for(stream_id) else {
            return false;
        };
        warn!(stream_id, %error, "response stream failed");
        self.transcript.settle(active.reply, TurnStatus::Interrupted);
        self.transcript.push(ChatTurn::notice(self.locale.connection_error_message()));
        self.active = None;
        self.touch();
        true
    }

    fn active_for(&self, stream_id: u64) -> Option<ActiveStream> {
        let active = self.active.filter(|active| active.stream_id == stream_id);
        if active.is_none() {
            debug!(stream_id, "ignoring event for inactive stream");
        }
        active
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
