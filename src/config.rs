use chrono::Duration;

/// Authentication parameters shared by the whole process, read-only after
/// startup. Carried as a value (not ambient state) so tests can construct
/// variants with short expiries or a cheap work factor.
#[derive(Clone)]
#[must_use]
pub struct AuthConfig {
    pub token_secret: String,
    pub token_ttl: Duration,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
    pub argon2_parallelism: u32,
}

impl AuthConfig {
    pub fn new(token_secret: String) -> Self {
        Self {
            token_secret,
            token_ttl: Duration::hours(1),
            argon2_memory_kib: argon2::Params::DEFAULT_M_COST,
            argon2_iterations: argon2::Params::DEFAULT_T_COST,
            argon2_parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }

    pub const fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    pub const fn with_work_factor(
        mut self,
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Self {
        self.argon2_memory_kib = memory_kib;
        self.argon2_iterations = iterations;
        self.argon2_parallelism = parallelism;
        self
    }
}
