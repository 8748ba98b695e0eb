use sqlx::SqlitePool;

pub mod message;
pub mod user;

/// Sqlite constraint codes a username collision can surface as, depending on
/// whether the column is a UNIQUE index or the PRIMARY KEY.
pub const CODE_NON_UNIQUE: &str = "2067";
pub const CODE_PRIMARY_KEY: &str = "1555";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    username      TEXT PRIMARY KEY,
    password_hash TEXT NOT NULL,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    phone         TEXT NOT NULL,
    joined_at     DATETIME NOT NULL,
    last_login_at DATETIME NOT NULL
);

CREATE TABLE IF NOT EXISTS messages (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    from_username TEXT NOT NULL REFERENCES users (username),
    to_username   TEXT NOT NULL REFERENCES users (username),
    body          TEXT NOT NULL,
    sent_at       DATETIME NOT NULL,
    read_at       DATETIME
);

CREATE INDEX IF NOT EXISTS idx_messages_from ON messages (from_username);
CREATE INDEX IF NOT EXISTS idx_messages_to ON messages (to_username);
";

/// Apply the schema to a freshly opened pool. Idempotent.
pub async fn apply_schema(connection: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(connection).await?;
    tracing::debug!("Applied database schema");
    Ok(())
}

pub(crate) fn is_duplicate_key(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error
            .code()
            .is_some_and(|code| code == CODE_NON_UNIQUE || code == CODE_PRIMARY_KEY),
        _ => false,
    }
}

#[derive(Debug, Clone)]
#[must_use]
pub struct Repository {
    pub users: user::UserRepository,
    pub messages: message::MessageRepository,
}

impl Repository {
    pub fn new(connection: SqlitePool) -> Self {
        let users = user::UserRepository {
            connection: connection.clone(),
        };
        let messages = message::MessageRepository { connection };
        Self { users, messages }
    }
}
