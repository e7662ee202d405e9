//! Chat turn types.
//!
//! A turn is one user input plus the model response it produced. Turns are
//! immutable once written and ordered by `created_at`, ties broken by the
//! auto-increment `id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted exchange within a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: i64,
    pub campaign_id: Uuid,
    #[serde(rename = "message")]
    pub user_message: String,
    #[serde(rename = "response")]
    pub model_response: String,
    pub created_at: DateTime<Utc>,
}

/// A turn that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTurn {
    pub user_message: String,
    pub model_response: String,
}

impl NewTurn {
    pub fn new(user_message: impl Into<String>, model_response: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            model_response: model_response.into(),
        }
    }
}

/// Result of submitting a turn.
///
/// `persisted` is false when generation succeeded but the turn could not be
/// written; the response is still delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub response: String,
    pub persisted: bool,
}

/// Result of a prune request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneOutcome {
    /// Number of turns removed, not counting the re-seeded sentinel.
    pub deleted: u64,
    /// Whether history was reset to the single sentinel turn.
    pub reset: bool,
}
