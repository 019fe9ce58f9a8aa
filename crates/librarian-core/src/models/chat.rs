use serde::{Deserialize, Serialize};

/// Synthetic first entry shown when a chat transcript is empty.
pub const GREETING: &str =
    "Hello! I'm the librarian. Ask me for a book recommendation, or about any title in the collection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the transcript. User turns are appended optimistically;
/// assistant turns (and error annotations) at reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, append-only sequence of chat turns. Entries are never edited or
/// removed; failures are surfaced as additional entries, not corrections.
#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the fixed greeting, only when nothing has been said yet.
    pub fn seed_greeting(&mut self) {
        if self.turns.is_empty() {
            self.turns.push(ChatTurn::assistant(GREETING));
        }
    }

    /// Append a turn, returning its (monotonic) index.
    pub fn push(&mut self, turn: ChatTurn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Lifecycle of a single submit. An explicit state machine rather than a
/// busy boolean, so the no-concurrent-submission rule has one obvious gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    Sending,
    Resolved,
    Failed,
}

impl TurnState {
    /// While a turn is in flight, further submits are rejected.
    pub fn is_busy(&self) -> bool {
        matches!(self, TurnState::Sending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_is_seeded_once() {
        let mut transcript = Transcript::new();
        transcript.seed_greeting();
        transcript.seed_greeting();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.turns()[0].content, GREETING);
        assert_eq!(transcript.turns()[0].role, Role::Assistant);
    }

    #[test]
    fn greeting_does_not_clobber_history() {
        let mut transcript = Transcript::new();
        transcript.push(ChatTurn::user("hi"));
        transcript.seed_greeting();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.turns()[0].role, Role::User);
    }

    #[test]
    fn push_returns_monotonic_indices() {
        let mut transcript = Transcript::new();
        let a = transcript.push(ChatTurn::user("one"));
        let b = transcript.push(ChatTurn::assistant("two"));
        let c = transcript.push(ChatTurn::user("three"));
        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(transcript.turns()[1].content, "two");
    }

    #[test]
    fn only_sending_is_busy() {
        assert!(!TurnState::Idle.is_busy());
        assert!(TurnState::Sending.is_busy());
        assert!(!TurnState::Resolved.is_busy());
        assert!(!TurnState::Failed.is_busy());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }
}
