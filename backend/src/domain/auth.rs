//! Authentication primitives: login credentials and API tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;

use super::{Email, Password, UserId, UserValidationError};

/// Number of random bytes behind a token key.
const TOKEN_KEY_BYTES: usize = 20;
/// Length of the hex-encoded token key.
pub const TOKEN_KEY_LENGTH: usize = TOKEN_KEY_BYTES * 2;

/// Validated login credentials used to obtain a token.
///
/// ## Invariants
/// - `email` is normalised the same way as stored accounts.
/// - `password` is non-empty; surrounding whitespace is preserved.
///
/// # Examples
/// ```
/// use recipe_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("joao@GMAIL.com", "testpass").unwrap();
/// assert_eq!(creds.email().as_ref(), "joao@gmail.com");
/// assert_eq!(creds.password().expose(), "testpass");
/// ```
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: Email,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, UserValidationError> {
        Ok(Self {
            email: Email::new(email)?,
            password: Password::new(password)?,
        })
    }

    /// Email used for the account lookup.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Validation error for presented token keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenKeyValidationError {
    /// Key had the wrong length.
    #[error("token key must be {TOKEN_KEY_LENGTH} characters")]
    InvalidLength,
    /// Key contained characters outside lowercase hex.
    #[error("token key must be lowercase hexadecimal")]
    InvalidCharacters,
}

/// Opaque API token key: 40 lowercase hex characters.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TokenKey(String);

impl TokenKey {
    /// Generate a fresh key from the operating system RNG.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_KEY_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Validate a key presented by a client or read from storage.
    pub fn parse(raw: &str) -> Result<Self, TokenKeyValidationError> {
        if raw.len() != TOKEN_KEY_LENGTH {
            return Err(TokenKeyValidationError::InvalidLength);
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(TokenKeyValidationError::InvalidCharacters);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Borrow the encoded key.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only a short prefix reaches logs.
        let prefix = self.0.get(..6).unwrap_or_default();
        write!(f, "TokenKey({prefix}…)")
    }
}

/// API token bound to exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    key: TokenKey,
    user_id: UserId,
}

impl AuthToken {
    /// Bind `key` to `user_id`.
    pub fn new(key: TokenKey, user_id: UserId) -> Self {
        Self { key, user_id }
    }

    /// Issue a token with a freshly generated key.
    pub fn issue(user_id: UserId) -> Self {
        Self::new(TokenKey::generate(), user_id)
    }

    /// Token key handed to the client.
    pub fn key(&self) -> &TokenKey {
        &self.key
    }

    /// Owner of the token.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", UserValidationError::MissingEmail)]
    #[case("   ", "pw", UserValidationError::MissingEmail)]
    #[case("joao@gmail.com", "", UserValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: UserValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn generated_keys_are_valid_and_distinct() {
        let first = TokenKey::generate();
        let second = TokenKey::generate();
        assert_eq!(first.as_str().len(), TOKEN_KEY_LENGTH);
        assert_ne!(first, second);
        assert_eq!(TokenKey::parse(first.as_str()), Ok(first));
    }

    #[rstest]
    #[case("abc", TokenKeyValidationError::InvalidLength)]
    #[case(&"G".repeat(TOKEN_KEY_LENGTH), TokenKeyValidationError::InvalidCharacters)]
    #[case(&"A".repeat(TOKEN_KEY_LENGTH), TokenKeyValidationError::InvalidCharacters)]
    fn malformed_keys_are_rejected(#[case] raw: &str, #[case] expected: TokenKeyValidationError) {
        assert_eq!(TokenKey::parse(raw), Err(expected));
    }

    #[rstest]
    fn debug_output_hides_most_of_the_key() {
        let key = TokenKey::parse(&"a".repeat(TOKEN_KEY_LENGTH)).expect("valid key");
        assert_eq!(format!("{key:?}"), "TokenKey(aaaaaa…)");
    }
}
