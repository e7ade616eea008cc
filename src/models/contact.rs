use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CONTACT_MESSAGES_TABLE: &str = "contact_messages";

/// Row shape of the store's `contact_messages` table. No page reads or writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
