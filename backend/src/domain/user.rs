//! User account model.
//!
//! Accounts are identified by email. The value objects here own all input
//! validation so that services and adapters only ever see normalised data.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Maximum length of email and name columns.
pub const USER_FIELD_MAX: usize = 255;
/// Minimum password length accepted for accounts created through the API.
pub const PASSWORD_MIN_LENGTH: usize = 5;

/// Validation errors raised while building user value objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// User id was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Email was absent or blank.
    #[error("users must have an email address")]
    MissingEmail,
    /// Email did not have the `local@domain` shape.
    #[error("enter a valid email address")]
    InvalidEmail,
    /// Email exceeded the column width.
    #[error("email must be at most {max} characters")]
    EmailTooLong {
        /// Allowed maximum.
        max: usize,
    },
    /// Name exceeded the column width.
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Allowed maximum.
        max: usize,
    },
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password was shorter than [`PASSWORD_MIN_LENGTH`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Required minimum.
        min: usize,
    },
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an existing UUID, typically read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only: `local@domain`, both non-empty, no whitespace.
        // Dotless domains such as `localhost` are valid.
        let pattern = r"^[^@\s]+@[^@\s]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised email address.
///
/// ## Invariants
/// - Non-empty, at most [`USER_FIELD_MAX`] characters, no whitespace.
/// - The domain part (after the last `@`) is lowercase; the local part keeps
///   the caller's casing.
///
/// # Examples
/// ```
/// use recipe_backend::domain::Email;
///
/// let email = Email::new("joao@GMAIL.COM").unwrap();
/// assert_eq!(email.as_ref(), "joao@gmail.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::MissingEmail);
        }
        if trimmed.chars().count() > USER_FIELD_MAX {
            return Err(UserValidationError::EmailTooLong {
                max: USER_FIELD_MAX,
            });
        }

        let normalised = normalise_email(trimmed);
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

fn normalise_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_owned(),
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable name; may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`], trimming surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.chars().count() > USER_FIELD_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_FIELD_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Plaintext password held only long enough to hash or verify it.
///
/// Whitespace is preserved; the buffer is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Accept any non-empty password.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        if raw.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Accept a password for account creation or change, enforcing
    /// [`PASSWORD_MIN_LENGTH`].
    pub fn for_account(raw: &str) -> Result<Self, UserValidationError> {
        let password = Self::new(raw)?;
        if raw.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(UserValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LENGTH,
            });
        }
        Ok(password)
    }

    /// Borrow the secret.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Opaque PHC-format password hash as produced by a
/// [`PasswordHasher`](crate::domain::ports::PasswordHasher).
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Borrow the encoded hash for storage.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}

/// Application user.
///
/// ## Invariants
/// - `is_superuser` implies `is_staff`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    name: UserName,
    password_hash: PasswordHash,
    is_active: bool,
    is_staff: bool,
    is_superuser: bool,
}

/// Privilege level assigned at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privileges {
    /// Ordinary account.
    Regular,
    /// Staff member with every permission.
    Superuser,
}

impl User {
    /// Build a freshly created, active user.
    pub fn new(
        id: UserId,
        email: Email,
        name: UserName,
        password_hash: PasswordHash,
        privileges: Privileges,
    ) -> Self {
        let elevated = matches!(privileges, Privileges::Superuser);
        Self {
            id,
            email,
            name,
            password_hash,
            is_active: true,
            is_staff: elevated,
            is_superuser: elevated,
        }
    }

    /// Rebuild a user from stored flags.
    ///
    /// A stored superuser without the staff flag is promoted to staff.
    pub fn restore(parts: UserParts) -> Self {
        let UserParts {
            id,
            email,
            name,
            password_hash,
            is_active,
            is_staff,
            is_superuser,
        } = parts;
        Self {
            id,
            email,
            name,
            password_hash,
            is_active,
            is_staff: is_staff || is_superuser,
            is_superuser,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Normalised email used as the login name.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Display name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Stored password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Whether the account may authenticate.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Whether the account is staff.
    pub fn is_staff(&self) -> bool {
        self.is_staff
    }

    /// Whether the account holds every permission.
    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    /// Replace the email address.
    pub fn set_email(&mut self, email: Email) {
        self.email = email;
    }

    /// Replace the display name.
    pub fn set_name(&mut self, name: UserName) {
        self.name = name;
    }

    /// Replace the password hash.
    pub fn set_password_hash(&mut self, password_hash: PasswordHash) {
        self.password_hash = password_hash;
    }

    /// Enable or disable authentication for the account.
    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }
}

/// Field bundle used to rebuild a [`User`] from storage.
#[derive(Debug, Clone)]
pub struct UserParts {
    /// Identifier.
    pub id: UserId,
    /// Normalised email.
    pub email: Email,
    /// Display name.
    pub name: UserName,
    /// Encoded password hash.
    pub password_hash: PasswordHash,
    /// Active flag.
    pub is_active: bool,
    /// Staff flag.
    pub is_staff: bool,
    /// Superuser flag.
    pub is_superuser: bool,
}

/// Validated input for creating an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    email: Email,
    name: UserName,
    password: Password,
}

impl NewUser {
    /// Build from already validated components.
    pub fn new(email: Email, name: UserName, password: Password) -> Self {
        Self {
            email,
            name,
            password,
        }
    }

    /// Validate raw inputs. Only requires a non-empty password; callers
    /// facing end users should build the password with
    /// [`Password::for_account`] instead.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::{NewUser, UserValidationError};
    ///
    /// let err = NewUser::try_from_parts("", "test123", "").unwrap_err();
    /// assert_eq!(err, UserValidationError::MissingEmail);
    /// ```
    pub fn try_from_parts(
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Self, UserValidationError> {
        Ok(Self::new(
            Email::new(email)?,
            UserName::new(name)?,
            Password::new(password)?,
        ))
    }

    /// Email the account will log in with.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Display name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Initial password.
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Changes requested for the authenticated user's own profile.
///
/// `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New login email.
    pub email: Option<Email>,
    /// New display name.
    pub name: Option<UserName>,
    /// New password, hashed before storage.
    pub password: Option<Password>,
}

impl ProfileUpdate {
    /// Whether the update carries no changes.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.password.is_none()
    }
}
