//! Argon2id password hashing adapter.
//!
//! Hashes are PHC strings so parameters travel with each stored hash and can
//! be raised later without invalidating existing accounts.

use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, ParamsBuilder, Version};
use async_trait::async_trait;
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHasher, PasswordHashingError};
use crate::domain::{Password, PasswordHash};

const SALT_LENGTH: usize = 16;

/// [`PasswordHasher`] backed by Argon2id.
///
/// Hashing runs on the blocking pool so request threads stay responsive.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Memory cost in KiB.
    pub const DEFAULT_MEMORY_KIB: u32 = 19 * 1024;
    /// Number of passes.
    pub const DEFAULT_ITERATIONS: u32 = 2;
    /// Lanes.
    pub const DEFAULT_PARALLELISM: u32 = 1;

    /// Build a hasher with the default Argon2id parameters.
    ///
    /// # Errors
    ///
    /// Fails only if the built-in parameters are rejected by `argon2`.
    pub fn new() -> Result<Self, PasswordHashingError> {
        Self::with_costs(
            Self::DEFAULT_MEMORY_KIB,
            Self::DEFAULT_ITERATIONS,
            Self::DEFAULT_PARALLELISM,
        )
    }

    /// Build a hasher with explicit costs; tests use the minimum allowed.
    pub fn with_costs(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordHashingError> {
        let params: Params = ParamsBuilder::new()
            .m_cost(memory_kib)
            .t_cost(iterations)
            .p_cost(parallelism)
            .build()
            .map_err(|err| PasswordHashingError::hashing(err.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::default(), params),
        })
    }

    fn hash_blocking(argon2: &Argon2<'_>, password: &[u8]) -> Result<String, PasswordHashingError> {
        let mut salt_bytes = [0u8; SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|err| PasswordHashingError::hashing(err.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| PasswordHashingError::hashing(err.to_string()))?;
        argon2
            .hash_password(password, &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashingError::hashing(err.to_string()))
    }

    fn verify_blocking(
        argon2: &Argon2<'_>,
        password: &[u8],
        encoded: &str,
    ) -> Result<bool, PasswordHashingError> {
        let parsed =
            PhcHash::new(encoded).map_err(|err| PasswordHashingError::hashing(err.to_string()))?;
        Ok(argon2.verify_password(password, &parsed).is_ok())
    }
}

fn join_error(err: tokio::task::JoinError) -> PasswordHashingError {
    PasswordHashingError::hashing(format!("hashing task failed: {err}"))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashingError> {
        let argon2 = self.argon2.clone();
        let material = Zeroizing::new(password.expose().as_bytes().to_vec());
        let encoded =
            tokio::task::spawn_blocking(move || Self::hash_blocking(&argon2, &material))
                .await
                .map_err(join_error)??;
        Ok(PasswordHash::new(encoded))
    }

    async fn verify(
        &self,
        password: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashingError> {
        let argon2 = self.argon2.clone();
        let material = Zeroizing::new(password.expose().as_bytes().to_vec());
        let encoded = hash.as_str().to_owned();
        tokio::task::spawn_blocking(move || Self::verify_blocking(&argon2, &material, &encoded))
            .await
            .map_err(join_error)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_costs(Params::MIN_M_COST, 1, 1).expect("params")
    }

    fn password(raw: &str) -> Password {
        Password::new(raw).expect("password")
    }

    #[rstest]
    #[tokio::test]
    async fn hash_verifies_only_its_own_password(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash(&password("correct horse")).await.expect("hash");

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(!hash.as_str().contains("correct horse"));
        assert!(hasher.verify(&password("correct horse"), &hash).await.expect("verify"));
        assert!(!hasher.verify(&password("battery staple"), &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn salts_differ_between_hashes(hasher: Argon2PasswordHasher) {
        let first = hasher.hash(&password("testpass")).await.expect("hash");
        let second = hasher.hash(&password("testpass")).await.expect("hash");
        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_hashes_are_errors(hasher: Argon2PasswordHasher) {
        let err = hasher
            .verify(&password("testpass"), &PasswordHash::new("not-a-phc-string"))
            .await
            .expect_err("malformed");
        assert!(matches!(err, PasswordHashingError::Hashing { .. }));
    }
}
