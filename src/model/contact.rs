use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ContactId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body accepted by both create and update.
///
/// Missing fields decode as empty strings so they are reported by
/// validation as `required` rather than rejected as a malformed payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl ContactPayload {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}

/// Response body for a successful create
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedContact {
    pub id: ContactId,
}
