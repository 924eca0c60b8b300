// src/notify.rs - Transient merchant-facing notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationLevel {
    Info,
    Positive,
    Negative,
}

/// A toast-style notification queued on the form state. Remote lookup
/// failures and destructive-operation outcomes surface here; nothing in this
/// queue blocks the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            timestamp: Utc::now(),
            read: false,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn positive(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Positive, message)
    }

    pub fn negative(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Negative, message)
    }
}
