use axum::extract::{FromRef, FromRequestParts};
use axum::http::StatusCode;
use axum::http::header;
use axum::http::request::Parts;
use axum::response::IntoResponse;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::{Level, instrument};

use crate::config::AuthConfig;
use crate::state::SharedState;

pub mod password;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Session token payload: whose session this is and when it stops working.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Mints and checks self-contained session tokens. There is no server-side
/// session table; expiry is the only invalidation.
#[derive(Clone)]
#[must_use]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.token_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_ttl: config.token_ttl,
        }
    }

    /// Sign a token for `username`, valid from now until now + TTL.
    pub fn issue(&self, username: &str) -> Result<String, TokenError> {
        let issued_at = Utc::now();
        let claims = Claims {
            sub: username.to_owned(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.token_ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(TokenError::Issue)
    }

    /// Check signature, shape, and validity window. The window is half-open:
    /// a token presented at its exact expiry instant is already invalid.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .inspect_err(|error| tracing::debug!(?error, "Rejecting session token"))
            .map_err(|_| TokenError::InvalidToken)?;
        if Utc::now().timestamp() >= token_data.claims.exp {
            tracing::debug!("Rejecting session token: expired");
            return Err(TokenError::InvalidToken);
        }

        Ok(token_data.claims)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid or expired session token")]
    InvalidToken,

    #[error("Failed to sign session token")]
    Issue(#[source] jsonwebtoken::errors::Error),
}

/// Verified caller identity, pulled out of the `Authorization` header.
#[derive(Debug)]
#[must_use]
pub struct Session(pub Claims);

impl<S> FromRequestParts<S> for Session
where
    SharedState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = RejectionCause;

    #[instrument(name = "auth_layer", skip_all, err(Debug, level = Level::WARN))]
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = SharedState::from_ref(state);
        let bearer_token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix(BEARER_PREFIX));

        if let Some(token) = bearer_token {
            let claims = state
                .tokens
                .verify(token)
                .map_err(|_| RejectionCause::InvalidToken)?;
            tracing::trace!(username = claims.sub, "Bearer authorization successful");
            Ok(Self(claims))
        } else {
            Err(RejectionCause::NoBearerToken)
        }
    }
}

#[derive(Debug)]
#[must_use]
pub enum RejectionCause {
    NoBearerToken,
    InvalidToken,
}

impl IntoResponse for RejectionCause {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::NoBearerToken | Self::InvalidToken => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}
