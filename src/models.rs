use chrono::NaiveDateTime;
use serde::Serialize;

/// Everything a caller may learn about a user. The stored password hash has
/// no path into this type.
#[derive(sqlx::FromRow, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub joined_at: NaiveDateTime,
    pub last_login_at: NaiveDateTime,
}

/// Short form used in listings and as the counterparty of a message view.
#[derive(sqlx::FromRow, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct UserSummary {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// A message as seen from its sender's side.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    pub id: i64,
    pub to_user: UserSummary,
    pub body: String,
    pub sent_at: NaiveDateTime,
    pub read_at: Option<NaiveDateTime>,
}

/// A message as seen from its recipient's side.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub id: i64,
    pub from_user: UserSummary,
    pub body: String,
    pub sent_at: NaiveDateTime,
    pub read_at: Option<NaiveDateTime>,
}
