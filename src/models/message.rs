//! Message models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Insert request for the append-only message log. Messages are written for
/// the record and delivered through the notification service; nothing in the
/// bot reads them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub from_user_id: i64,
    pub to_user_id: i64,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}
