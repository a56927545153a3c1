//! Account service: user creation, token issuance and profile updates.
//!
//! Implements the [`UserAccounts`] driving port over the user and token
//! repositories and a password hasher.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::ports::{
    PasswordHasher, PasswordHashingError, TokenPersistenceError, TokenRepository, UserAccounts,
    UserPersistenceError, UserRepository,
};
use super::{
    AuthToken, Error, LoginCredentials, NewUser, Privileges, ProfileUpdate, TokenKey, User, UserId,
};

const INVALID_CREDENTIALS: &str = "unable to authenticate with provided credentials";

/// Account service backed by repository and hashing ports.
#[derive(Clone)]
pub struct UserAccountService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserAccountService {
    /// Wire the service to its driven ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenRepository>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher,
        }
    }

    async fn create_with(&self, new_user: NewUser, privileges: Privileges) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(new_user.password())
            .await
            .map_err(map_hashing_error)?;
        let user = User::new(
            UserId::random(),
            new_user.email().clone(),
            new_user.name().clone(),
            password_hash,
            privileges,
        );
        self.users
            .insert(&user)
            .await
            .map_err(map_user_persistence_error)?;
        info!(
            user_id = %user.id(),
            superuser = user.is_superuser(),
            "user created"
        );
        Ok(user)
    }

    async fn token_for(&self, user_id: &UserId) -> Result<AuthToken, Error> {
        if let Some(existing) = self
            .tokens
            .find_by_user(user_id)
            .await
            .map_err(map_token_persistence_error)?
        {
            return Ok(existing);
        }

        let token = AuthToken::issue(*user_id);
        match self.tokens.insert(&token).await {
            Ok(()) => {
                info!(user_id = %user_id, "token issued");
                Ok(token)
            }
            // A concurrent request issued the token first; hand out the winner.
            Err(TokenPersistenceError::AlreadyExists { .. }) => self
                .tokens
                .find_by_user(user_id)
                .await
                .map_err(map_token_persistence_error)?
                .ok_or_else(|| Error::internal("token missing after conflicting insert")),
            Err(error) => Err(map_token_persistence_error(error)),
        }
    }
}

fn invalid_credentials() -> Error {
    Error::invalid_field("non_field_errors", "authorization", INVALID_CREDENTIALS)
}

/// Map user persistence failures to domain errors.
pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::invalid_field("email", "unique", "user with this email already exists")
        }
        UserPersistenceError::NotFound { .. } => Error::not_found("user not found"),
    }
}

fn map_token_persistence_error(error: TokenPersistenceError) -> Error {
    match error {
        TokenPersistenceError::Connection { message } => Error::service_unavailable(message),
        TokenPersistenceError::Query { message } => Error::internal(message),
        TokenPersistenceError::AlreadyExists { .. } => Error::conflict("token already issued"),
    }
}

fn map_hashing_error(error: PasswordHashingError) -> Error {
    Error::internal(error.to_string())
}

#[async_trait]
impl UserAccounts for UserAccountService {
    async fn create_user(&self, new_user: NewUser) -> Result<User, Error> {
        self.create_with(new_user, Privileges::Regular).await
    }

    async fn create_super_user(&self, new_user: NewUser) -> Result<User, Error> {
        self.create_with(new_user, Privileges::Superuser).await
    }

    async fn obtain_token(&self, credentials: LoginCredentials) -> Result<AuthToken, Error> {
        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?
        else {
            warn!("token requested for unknown email");
            return Err(invalid_credentials());
        };

        let matches = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .await
            .map_err(map_hashing_error)?;
        if !matches || !user.is_active() {
            warn!(user_id = %user.id(), active = user.is_active(), "token request rejected");
            return Err(invalid_credentials());
        }

        self.token_for(user.id()).await
    }

    async fn authenticate(&self, key: &TokenKey) -> Result<User, Error> {
        let user = self
            .tokens
            .find_user_by_key(key)
            .await
            .map_err(map_token_persistence_error)?
            .ok_or_else(|| Error::unauthorized("invalid token"))?;
        if !user.is_active() {
            return Err(Error::unauthorized("user inactive or deleted"));
        }
        Ok(user)
    }

    async fn update_profile(&self, user_id: &UserId, update: ProfileUpdate) -> Result<User, Error> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;
        if update.is_empty() {
            return Ok(user);
        }

        let ProfileUpdate {
            email,
            name,
            password,
        } = update;
        if let Some(email) = email {
            user.set_email(email);
        }
        if let Some(name) = name {
            user.set_name(name);
        }
        if let Some(password) = password {
            let hash = self
                .hasher
                .hash(&password)
                .await
                .map_err(map_hashing_error)?;
            user.set_password_hash(hash);
        }

        self.users
            .update(&user)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id(), "profile updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    //! Behavioural coverage using mocked ports.
    use super::*;
    use crate::domain::ports::{MockPasswordHasher, MockTokenRepository, MockUserRepository};
    use crate::domain::{Email, ErrorCode, Password, PasswordHash, UserName};
    use rstest::{fixture, rstest};

    /// Deterministic stand-in: "hashed:<password>".
    fn plain_hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|password| Ok(PasswordHash::new(format!("hashed:{}", password.expose()))));
        hasher.expect_verify().returning(|password, hash| {
            Ok(hash.as_str() == format!("hashed:{}", password.expose()))
        });
        hasher
    }

    fn service(
        users: MockUserRepository,
        tokens: MockTokenRepository,
        hasher: MockPasswordHasher,
    ) -> UserAccountService {
        UserAccountService::new(Arc::new(users), Arc::new(tokens), Arc::new(hasher))
    }

    #[fixture]
    fn stored_user() -> User {
        User::new(
            UserId::random(),
            Email::new("joao@gmail.com").expect("email"),
            UserName::new("Joao").expect("name"),
            PasswordHash::new("hashed:testpass"),
            Privileges::Regular,
        )
    }

    fn credentials(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(email, password).expect("credential shape")
    }

    #[rstest]
    #[tokio::test]
    async fn create_user_hashes_password_and_normalises_email() {
        let mut users = MockUserRepository::new();
        users
            .expect_insert()
            .withf(|user| {
                user.email().as_ref() == "joao@gmail.com"
                    && user.password_hash().as_str() == "hashed:Testpass123"
                    && !user.is_staff()
            })
            .times(1)
            .returning(|_| Ok(()));
        let service = service(users, MockTokenRepository::new(), plain_hasher());

        let new_user = NewUser::try_from_parts("joao@GMAIL.COM", "Testpass123", "").expect("input");
        let user = service.create_user(new_user).await.expect("created");

        assert_eq!(user.email().as_ref(), "joao@gmail.com");
        assert!(user.is_active());
        assert!(!user.is_superuser());
    }

    #[rstest]
    #[tokio::test]
    async fn create_super_user_sets_flags() {
        let mut users = MockUserRepository::new();
        users.expect_insert().times(1).returning(|_| Ok(()));
        let service = service(users, MockTokenRepository::new(), plain_hasher());

        let new_user =
            NewUser::try_from_parts("test@londonappdev.com", "test123", "").expect("input");
        let user = service.create_super_user(new_user).await.expect("created");

        assert!(user.is_superuser());
        assert!(user.is_staff());
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_maps_to_invalid_request() {
        let mut users = MockUserRepository::new();
        users
            .expect_insert()
            .returning(|user| Err(UserPersistenceError::duplicate_email(user.email().as_ref())));
        let service = service(users, MockTokenRepository::new(), plain_hasher());

        let new_user = NewUser::try_from_parts("joao@gmail.com", "testpass", "").expect("input");
        let err = service.create_user(new_user).await.expect_err("duplicate");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details().and_then(|d| d.get("field")).and_then(|f| f.as_str()),
            Some("email")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn obtain_token_issues_when_missing(stored_user: User) {
        let user_id = *stored_user.id();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored_user.clone())));
        let mut tokens = MockTokenRepository::new();
        tokens.expect_find_by_user().times(1).returning(|_| Ok(None));
        tokens
            .expect_insert()
            .withf(move |token| token.user_id() == &user_id)
            .times(1)
            .returning(|_| Ok(()));
        let service = service(users, tokens, plain_hasher());

        let token = service
            .obtain_token(credentials("joao@gmail.com", "testpass"))
            .await
            .expect("token");
        assert_eq!(token.user_id(), &user_id);
    }

    #[rstest]
    #[tokio::test]
    async fn obtain_token_reuses_existing_token(stored_user: User) {
        let existing = AuthToken::issue(*stored_user.id());
        let expected = existing.clone();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored_user.clone())));
        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_by_user()
            .returning(move |_| Ok(Some(existing.clone())));
        tokens.expect_insert().never();
        let service = service(users, tokens, plain_hasher());

        let token = service
            .obtain_token(credentials("joao@gmail.com", "testpass"))
            .await
            .expect("token");
        assert_eq!(token, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn obtain_token_returns_winner_after_insert_race(stored_user: User) {
        let winner = AuthToken::issue(*stored_user.id());
        let expected = winner.clone();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored_user.clone())));
        let mut tokens = MockTokenRepository::new();
        let mut seq = mockall::Sequence::new();
        tokens
            .expect_find_by_user()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        tokens
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|token| {
                Err(TokenPersistenceError::already_exists(token.user_id().to_string()))
            });
        tokens
            .expect_find_by_user()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(winner.clone())));
        let service = service(users, tokens, plain_hasher());

        let token = service
            .obtain_token(credentials("joao@gmail.com", "testpass"))
            .await
            .expect("token");
        assert_eq!(token, expected);
    }

    #[rstest]
    #[case::wrong_password("joao@gmail.com", "wrong", true)]
    #[case::unknown_user("test@gmail.com", "test123", false)]
    #[tokio::test]
    async fn obtain_token_rejects_bad_credentials(
        stored_user: User,
        #[case] email: &str,
        #[case] password: &str,
        #[case] known: bool,
    ) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(known.then(|| stored_user.clone())));
        let mut tokens = MockTokenRepository::new();
        tokens.expect_insert().never();
        let service = service(users, tokens, plain_hasher());

        let err = service
            .obtain_token(credentials(email, password))
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[rstest]
    #[tokio::test]
    async fn obtain_token_rejects_inactive_user(mut stored_user: User) {
        stored_user.set_active(false);
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored_user.clone())));
        let service = service(users, MockTokenRepository::new(), plain_hasher());

        let err = service
            .obtain_token(credentials("joao@gmail.com", "testpass"))
            .await
            .expect_err("inactive");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case::connection(UserPersistenceError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case::query(UserPersistenceError::query("boom"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn repository_failures_are_mapped(
        #[case] failure: UserPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Err(failure.clone()));
        let service = service(users, MockTokenRepository::new(), plain_hasher());

        let err = service
            .obtain_token(credentials("joao@gmail.com", "testpass"))
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn authenticate_rejects_unknown_and_inactive(mut stored_user: User) {
        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_user_by_key()
            .times(1)
            .returning(|_| Ok(None));
        let service_unknown = service(MockUserRepository::new(), tokens, plain_hasher());
        let key = TokenKey::generate();
        let err = service_unknown.authenticate(&key).await.expect_err("unknown");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "invalid token");

        stored_user.set_active(false);
        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_user_by_key()
            .returning(move |_| Ok(Some(stored_user.clone())));
        let service_inactive = service(MockUserRepository::new(), tokens, plain_hasher());
        let err = service_inactive.authenticate(&key).await.expect_err("inactive");
        assert_eq!(err.message(), "user inactive or deleted");
    }

    #[rstest]
    #[tokio::test]
    async fn update_profile_rehashes_password_and_renames(stored_user: User) {
        let user_id = *stored_user.id();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored_user.clone())));
        users
            .expect_update()
            .withf(|user| {
                user.name().as_ref() == "New name"
                    && user.password_hash().as_str() == "hashed:newpassword123"
            })
            .times(1)
            .returning(|_| Ok(()));
        let service = service(users, MockTokenRepository::new(), plain_hasher());

        let update = ProfileUpdate {
            name: Some(UserName::new("New name").expect("name")),
            password: Some(Password::for_account("newpassword123").expect("password")),
            ..ProfileUpdate::default()
        };
        let user = service.update_profile(&user_id, update).await.expect("updated");
        assert_eq!(user.name().as_ref(), "New name");
        assert_eq!(user.email().as_ref(), "joao@gmail.com");
    }

    #[rstest]
    #[tokio::test]
    async fn empty_update_skips_write(stored_user: User) {
        let user_id = *stored_user.id();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored_user.clone())));
        users.expect_update().never();
        let service = service(users, MockTokenRepository::new(), plain_hasher());

        let user = service
            .update_profile(&user_id, ProfileUpdate::default())
            .await
            .expect("unchanged");
        assert_eq!(user.id(), &user_id);
    }
}
