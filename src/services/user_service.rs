//! User service - accounts, login and the partner directory.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::domain::{CreateUser, NewUser, PartnerProfile, Password, User, UserStatus, UserType};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Hash verified when the email is unknown, so both paths cost one Argon2 run.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| {
    Password::new("unknown-account-placeholder")
        .ok()
        .map(Password::into_string)
});

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register an account and return its id.
    async fn signup(&self, input: NewUser) -> AppResult<i64>;

    /// Check credentials. Unknown email, wrong password and a non-active
    /// account all fail with the same `InvalidCredentials`.
    async fn login(&self, email: String, password: String) -> AppResult<User>;

    async fn check_email_exists(&self, email: String) -> AppResult<bool>;

    async fn get_user(&self, id: i64) -> AppResult<User>;

    /// Partner directory; only HOSPITAL and SITTER are listed.
    async fn list_partners(&self, user_type: UserType) -> AppResult<Vec<User>>;

    /// Stamp `last_login_at`.
    async fn record_login(&self, id: i64) -> AppResult<()>;

    async fn update_profile_url(&self, id: i64, url: String) -> AppResult<()>;

    /// Replace the device token; a blank token is rejected.
    async fn update_fcm_token(&self, id: i64, token: String) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn signup(&self, input: NewUser) -> AppResult<i64> {
        let email = input.email.trim().to_string();

        // The unique index on users.email still guards concurrent signups
        if self.uow.users().exists_by_email(&email).await? {
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = Password::new(&input.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(CreateUser {
                username: input.username.trim().to_string(),
                nickname: input.nickname.trim().to_string(),
                email,
                password_hash,
                gender: input.gender,
                birthdate: input.birthdate,
                address: input.address.trim().to_string(),
                user_type: input.user_type,
                status: UserStatus::Active,
                partner: PartnerProfile::for_user_type(input.user_type, input.partner),
            })
            .await?;

        tracing::info!(user_id = user.id, user_type = %user.user_type, "User signed up");
        Ok(user.id)
    }

    async fn login(&self, email: String, password: String) -> AppResult<User> {
        let user = self.uow.users().find_by_email(email.trim()).await?;

        let stored_hash = match (&user, DUMMY_HASH.as_ref()) {
            (Some(user), _) => Some(user.password_hash.clone()),
            (None, dummy) => dummy.cloned(),
        };
        let password_valid = stored_hash
            .map(|hash| Password::from_hash(hash).verify(&password))
            .unwrap_or(false);

        match user {
            Some(user) if password_valid && user.is_active() => Ok(user),
            Some(user) => {
                tracing::debug!(user_id = user.id, status = %user.status, "Login rejected");
                Err(AppError::InvalidCredentials)
            }
            None => Err(AppError::InvalidCredentials),
        }
    }

    async fn check_email_exists(&self, email: String) -> AppResult<bool> {
        self.uow.users().exists_by_email(email.trim()).await
    }

    async fn get_user(&self, id: i64) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found("user")
    }

    async fn list_partners(&self, user_type: UserType) -> AppResult<Vec<User>> {
        if !user_type.has_partner_profile() {
            return Err(AppError::unsupported(format!(
                "Unsupported user_type: {}",
                user_type
            )));
        }
        self.uow.users().find_by_user_type(user_type).await
    }

    async fn record_login(&self, id: i64) -> AppResult<()> {
        self.uow.users().touch_last_login(id).await
    }

    async fn update_profile_url(&self, id: i64, url: String) -> AppResult<()> {
        self.uow.users().update_profile_url(id, url).await
    }

    async fn update_fcm_token(&self, id: i64, token: String) -> AppResult<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::validation("token must not be blank"));
        }
        self.uow
            .users()
            .update_fcm_token(id, token.to_string())
            .await
    }
}
