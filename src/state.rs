use sqlx::SqlitePool;

use crate::auth::TokenIssuer;
use crate::auth::password::PasswordHasher;
use crate::config::AuthConfig;
use crate::identity::IdentityService;
use crate::repository::Repository;

#[derive(Clone)]
#[must_use]
pub struct SharedState {
    pub identity: IdentityService,
    pub repository: Repository,
    pub tokens: TokenIssuer,
    pub db_pool: SqlitePool,
}

impl SharedState {
    pub fn new(db_pool: SqlitePool, auth_config: &AuthConfig) -> Result<Self, argon2::Error> {
        let repository = Repository::new(db_pool.clone());
        let tokens = TokenIssuer::new(auth_config);
        let hasher = PasswordHasher::new(auth_config)?;
        let identity = IdentityService::new(repository.users.clone(), hasher, tokens.clone());
        Ok(Self {
            identity,
            repository,
            tokens,
            db_pool,
        })
    }
}
