use chrono::{NaiveDateTime, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use crate::models::{ReceivedMessage, SentMessage, UserSummary};

/// Directed message as stored. `read_at` is reserved: nothing writes it yet.
#[derive(sqlx::FromRow, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub from_username: String,
    pub to_username: String,
    pub body: String,
    pub sent_at: NaiveDateTime,
    pub read_at: Option<NaiveDateTime>,
}

/// Flat row shape produced by the counterparty join, reassembled into the
/// nested view types before leaving the repository.
#[derive(sqlx::FromRow, Clone, Debug)]
struct CounterpartyRow {
    id: i64,
    counterparty_username: String,
    first_name: String,
    last_name: String,
    phone: String,
    body: String,
    sent_at: NaiveDateTime,
    read_at: Option<NaiveDateTime>,
}

impl CounterpartyRow {
    fn counterparty(&self) -> UserSummary {
        UserSummary {
            username: self.counterparty_username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
        }
    }
}

#[derive(Debug, Clone)]
#[must_use]
pub struct MessageRepository {
    pub(super) connection: SqlitePool,
}

impl MessageRepository {
    /// Store a new directed message with a server-assigned id and send time.
    /// Both parties must already exist; the foreign keys reject anything
    /// else. Sender and recipient may be the same user.
    #[instrument(skip(self, body))]
    pub async fn send(
        &self,
        from_username: &str,
        to_username: &str,
        body: &str,
    ) -> Result<Message, sqlx::Error> {
        let sent_at = Utc::now().naive_utc();
        let query = sqlx::query_as::<_, Message>(
            "INSERT INTO messages (from_username, to_username, body, sent_at)
             VALUES (?, ?, ?, ?)
             RETURNING id, from_username, to_username, body, sent_at, read_at",
        )
        .bind(from_username)
        .bind(to_username)
        .bind(body)
        .bind(sent_at);

        query
            .fetch_one(&self.connection)
            .await
            .inspect(|message| tracing::debug!(message.id, "Stored new message"))
            .inspect_err(|error| tracing::error!(?error, "Database error storing message"))
    }

    /// Messages sent by `username`, each joined with the recipient's current
    /// profile fields. A username with nothing sent (known or not) simply
    /// yields an empty vec.
    #[instrument(skip(self))]
    pub async fn messages_from(&self, username: &str) -> Result<Vec<SentMessage>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CounterpartyRow>(
            "SELECT m.id, m.to_username AS counterparty_username,
                    u.first_name, u.last_name, u.phone,
                    m.body, m.sent_at, m.read_at
             FROM messages AS m
             JOIN users AS u ON m.to_username = u.username
             WHERE m.from_username = ?",
        )
        .bind(username)
        .fetch_all(&self.connection)
        .await?;

        let messages = rows
            .into_iter()
            .map(|row| SentMessage {
                id: row.id,
                to_user: row.counterparty(),
                body: row.body,
                sent_at: row.sent_at,
                read_at: row.read_at,
            })
            .collect();
        Ok(messages)
    }

    /// Messages received by `username`, each joined with the sender's
    /// current profile fields.
    #[instrument(skip(self))]
    pub async fn messages_to(&self, username: &str) -> Result<Vec<ReceivedMessage>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CounterpartyRow>(
            "SELECT m.id, m.from_username AS counterparty_username,
                    u.first_name, u.last_name, u.phone,
                    m.body, m.sent_at, m.read_at
             FROM messages AS m
             JOIN users AS u ON m.from_username = u.username
             WHERE m.to_username = ?",
        )
        .bind(username)
        .fetch_all(&self.connection)
        .await?;

        let messages = rows
            .into_iter()
            .map(|row| ReceivedMessage {
                id: row.id,
                from_user: row.counterparty(),
                body: row.body,
                sent_at: row.sent_at,
                read_at: row.read_at,
            })
            .collect();
        Ok(messages)
    }
}
