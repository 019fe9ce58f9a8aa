//! Durable handle to the server-assigned conversation identifier.
//!
//! Only the identifier survives a restart; the transcript itself lives in
//! memory. Kept deliberately independent of the token store: the two are
//! plain values with no shared transaction.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const STATE_FILE: &str = "conversation.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConversationState {
    conversation_id: Option<String>,
}

pub struct ConversationStore {
    path: PathBuf,
}

impl ConversationStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            path: data_dir.as_ref().join(STATE_FILE),
        }
    }

    /// The persisted identifier, if any. A missing or unreadable state file
    /// means "no conversation yet" rather than a failure.
    pub fn load(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<ConversationState>(&raw) {
            Ok(state) => state.conversation_id,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "ignoring corrupt conversation state: {e}");
                None
            }
        }
    }

    pub fn save(&self, conversation_id: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let state = ConversationState {
            conversation_id: Some(conversation_id.to_string()),
        };
        let raw = serde_json::to_string_pretty(&state)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}
