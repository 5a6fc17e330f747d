//! Append-only chat transcript.
//!
//! Turns are addressed through [`TurnId`] handles handed out by
//! [`Transcript::push`]. Entries are never removed or reordered, so a handle
//! stays valid for the lifetime of the transcript.

use chrono::{DateTime, Local};

use crate::api::Content;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStatus {
    /// User turns, and replies whose stream ended normally.
    Complete,
    /// The reply currently receiving fragments.
    Streaming,
    /// A reply whose stream failed. Partial text is kept.
    Interrupted,
    /// The fixed error turn appended after a failed stream.
    Notice,
}

#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
    pub status: TurnStatus,
    pub created_at: DateTime<Local>,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text.into(), TurnStatus::Complete)
    }

    pub fn pending_reply() -> Self {
        Self::new(Role::Model, String::new(), TurnStatus::Streaming)
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text.into(), TurnStatus::Notice)
    }

    fn new(role: Role, text: String, status: TurnStatus) -> Self {
        Self {
            role,
            text,
            status,
            created_at: Local::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_streaming(&self) -> bool {
        self.status == TurnStatus::Streaming
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnId(usize);

impl TurnId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ChatTurn) -> TurnId {
        self.turns.push(turn);
        TurnId(self.turns.len() - 1)
    }

    pub fn get(&self, id: TurnId) -> Option<&ChatTurn> {
        self.turns.get(id.0)
    }

    /// Appends `fragment` to a streaming turn. Returns false if the turn is
    /// unknown or no longer streaming.
    pub fn append_fragment(&mut self, id: TurnId, fragment: &str) -> bool {
        match self.turns.get_mut(id.0) {
            Some(turn) if turn.is_streaming() => {
                turn.text.push_str(fragment);
                true
            }
            _ => false,
        }
    }

    /// Moves a streaming turn to its final status.
    pub fn settle(&mut self, id: TurnId, status: TurnStatus) -> bool {
        match self.turns.get_mut(id.0) {
            Some(turn) if turn.is_streaming() => {
                turn.status = status;
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    /// Prior exchanges to send along with a new message.
    ///
    /// Only user turns answered by a completed, non-empty reply are included;
    /// failed exchanges and error notices never reach the provider.
    pub fn request_context(&self) -> Vec<Content> {
        let mut contents = Vec::new();
        let mut turns = self.turns.iter().peekable();
        while let Some(turn) = turns.next() {
            if !turn.is_user() {
                continue;
            }
            let Some(reply) = turns.peek() else {
                break;
            };
            if reply.role == Role::Model
                && reply.status == TurnStatus::Complete
                && !reply.text.is_empty()
            {
                contents.push(Content::user(turn.text.as_str()));
                contents.push(Content::model(reply.text.as_str()));
                turns.next();
            }
        }
        contents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_hands_out_stable_sequential_handles() {
        let mut transcript = Transcript::new();
        let first = transcript.push(ChatTurn::user("one"));
        let second = transcript.push(ChatTurn::pending_reply());
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        transcript.push(ChatTurn::user("two"));
        assert_eq!(transcript.get(first).map(|t| t.text.as_str()), Some("one"));
        assert!(transcript.get(second).is_some_and(ChatTurn::is_streaming));
    }

    #[test]
    fn fragments_only_land_on_streaming_turns() {
        let mut transcript = Transcript::new();
        let user = transcript.push(ChatTurn::user("hi"));
        let reply = transcript.push(ChatTurn::pending_reply());

        assert!(!transcript.append_fragment(user, "x"));
        assert!(transcript.append_fragment(reply, "Hel"));
        assert!(transcript.append_fragment(reply, "lo"));
        assert!(transcript.settle(reply, TurnStatus::Complete));
        assert!(!transcript.append_fragment(reply, "!"));
        assert!(!transcript.settle(reply, TurnStatus::Interrupted));

        let turn = transcript.get(reply).expect("reply");
        assert_eq!(turn.text, "Hello");
        assert_eq!(turn.status, TurnStatus::Complete);
        assert_eq!(transcript.get(user).expect("user").text, "hi");
    }

    #[test]
    fn request_context_skips_failed_exchanges() {
        let mut transcript = Transcript::new();
        transcript.push(ChatTurn::user("first"));
        let ok = transcript.push(ChatTurn::pending_reply());
        transcript.append_fragment(ok, "answer");
        transcript.settle(ok, TurnStatus::Complete);

        transcript.push(ChatTurn::user("second"));
        let failed = transcript.push(ChatTurn::pending_reply());
        transcript.append_fragment(failed, "partial");
        transcript.settle(failed, TurnStatus::Interrupted);
        transcript.push(ChatTurn::notice("error"));

        let context = transcript.request_context();
        assert_eq!(context, vec![Content::user("first"), Content::model("answer")]);
    }

    #[test]
    fn request_context_ignores_pending_reply() {
        let mut transcript = Transcript::new();
        transcript.push(ChatTurn::user("waiting"));
        transcript.push(ChatTurn::pending_reply());
        assert!(transcript.request_context().is_empty());
    }
}
