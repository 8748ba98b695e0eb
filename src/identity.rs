use tracing::instrument;

use crate::auth::password::PasswordHasher;
use crate::auth::{TokenError, TokenIssuer};
use crate::models::{UserProfile, UserSummary};
use crate::repository::user::{CreateUserError, ProfileError, UserRepository};

/// Registration input as received from the routing layer. Deliberately not
/// `Debug`: it carries the plaintext password.
#[derive(Clone)]
#[must_use]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Orchestrates the credential store, password hasher, and token issuer for
/// registration, login, and profile reads.
#[derive(Clone)]
#[must_use]
pub struct IdentityService {
    users: UserRepository,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl IdentityService {
    pub const fn new(users: UserRepository, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Create the user and log them straight in: the returned token is the
    /// registration's session.
    #[instrument(skip_all, fields(username = new_user.username))]
    pub async fn register(&self, new_user: &NewUser) -> Result<String, RegistrationError> {
        let password_hash = self
            .hasher
            .hash(&new_user.password)
            .inspect_err(|error| tracing::error!(?error, "Failed to hash password"))
            .map_err(RegistrationError::Hash)?;

        let user = self
            .users
            .create(
                &new_user.username,
                &password_hash,
                &new_user.first_name,
                &new_user.last_name,
                &new_user.phone,
            )
            .await?;

        let token = self.tokens.issue(&user.username)?;
        tracing::debug!("Successfully registered new user");
        Ok(token)
    }

    /// Is this username/password pair valid? Unknown usernames and wrong
    /// passwords are deliberately the same answer.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool, sqlx::Error> {
        let Some(user) = self.users.find_by_username(username).await? else {
            tracing::debug!("Rejecting login attempt: invalid credentials");
            return Ok(false);
        };
        Ok(self.hasher.verify(password, &user.password_hash))
    }

    /// Full login flow: check credentials, mint a token, record the login
    /// time, and only then hand the token out. A failed check is terminal
    /// and writes nothing.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, LoginError> {
        if !self.authenticate(username, password).await? {
            return Err(LoginError::InvalidCredentials);
        }

        let token = self.tokens.issue(username)?;
        self.users
            .update_login_timestamp(username)
            .await
            .map_err(|error| match error {
                ProfileError::NotFound => LoginError::Database(sqlx::Error::RowNotFound),
                ProfileError::Database(error) => LoginError::Database(error),
            })?;

        tracing::debug!("Login successful");
        Ok(token)
    }

    /// Profile lookup by username. The stored hash is not part of the
    /// returned shape.
    #[instrument(skip(self))]
    pub async fn get(&self, username: &str) -> Result<UserProfile, ProfileError> {
        self.users
            .profile(username)
            .await?
            .ok_or(ProfileError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<UserSummary>, sqlx::Error> {
        self.users.list().await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("A user with this username already exists")]
    UsernameTaken,

    #[error("Failed to hash the password")]
    Hash(argon2::password_hash::Error),

    #[error("Failed to issue a session token")]
    Token(#[from] TokenError),

    #[error("Internal database error")]
    Database(sqlx::Error),
}

impl From<CreateUserError> for RegistrationError {
    fn from(error: CreateUserError) -> Self {
        match error {
            CreateUserError::UsernameTaken => Self::UsernameTaken,
            CreateUserError::Database(error) => Self::Database(error),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Failed to issue a session token")]
    Token(#[from] TokenError),

    #[error("Internal database error")]
    Database(#[from] sqlx::Error),
}
