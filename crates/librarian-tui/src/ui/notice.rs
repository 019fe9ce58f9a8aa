//! Transient status-line feedback with auto-dismiss.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "ℹ",
            NoticeLevel::Success => "✓",
            NoticeLevel::Warning => "⚠",
            NoticeLevel::Error => "✗",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    shown_at: Instant,
    duration: Duration,
}

impl Notice {
    fn new(message: impl Into<String>, level: NoticeLevel, duration: Duration) -> Self {
        Self {
            message: message.into(),
            level,
            shown_at: Instant::now(),
            duration,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NoticeLevel::Info, Duration::from_secs(3))
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NoticeLevel::Success, Duration::from_secs(3))
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NoticeLevel::Warning, Duration::from_secs(4))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NoticeLevel::Error, Duration::from_secs(5))
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= self.duration
    }
}
