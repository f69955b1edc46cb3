//! Account service.
//!
//! Validates form input locally, calls the account API, and keeps the
//! session tokens in local storage.

mod validation;

pub use validation::{
    MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH, validate_email, validate_name, validate_password,
};

use secrecy::SecretString;
use thiserror::Error;
use tracing::{info, instrument};

use storepilot_core::EmailError;

use crate::api::{ApiClient, ApiError};
use crate::models::user::DEFAULT_AVATAR_URL;
use crate::models::{Credentials, NewUser, ProfileUpdate, UserProfile};
use crate::session::SessionStore;
use crate::storage::StorageError;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password does not meet the rules.
    #[error("{0}")]
    WeakPassword(String),

    /// Display name too short.
    #[error("name must be at least {min} characters")]
    NameTooShort {
        /// Minimum length.
        min: usize,
    },

    /// The operation needs a logged-in session.
    #[error("you need to log in first")]
    NotLoggedIn,

    /// Remote API failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Tokens could not be written to local storage.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Login, signup and profile operations.
#[derive(Debug, Clone)]
pub struct AccountService {
    api: ApiClient,
    session: SessionStore,
}

impl AccountService {
    /// Create an account service.
    #[must_use]
    pub const fn new(api: ApiClient, session: SessionStore) -> Self {
        Self { api, session }
    }

    /// The session store tokens are kept in.
    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Log in and store the issued tokens.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request is made, or
    /// `AccountError::Api` if the API rejects the credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AccountError> {
        let email = validate_email(email)?;
        validate_password(password)?;

        let tokens = self.api.login(&Credentials::new(email, password)).await?;
        self.session.save_tokens(&tokens)?;
        Ok(())
    }

    /// Forget the stored tokens.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` if the tokens cannot be removed.
    pub fn logout(&self) -> Result<(), AccountError> {
        self.session.logout()?;
        Ok(())
    }

    /// Create an account. `avatar` defaults to a placeholder image.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request is made, or
    /// `AccountError::Api` (`ApiError::Conflict` for a taken email).
    #[instrument(skip(self, password))]
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        avatar: Option<&str>,
    ) -> Result<UserProfile, AccountError> {
        let name = validate_name(name)?;
        let email = validate_email(email)?;
        validate_password(password)?;

        let avatar = avatar
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(DEFAULT_AVATAR_URL)
            .to_string();

        let new_user = NewUser {
            name,
            credentials: Credentials::new(email, password),
            avatar,
        };
        Ok(self.api.signup(&new_user).await?)
    }

    /// The logged-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotLoggedIn` without a token, or
    /// `AccountError::Api` if the token is rejected.
    pub async fn profile(&self) -> Result<UserProfile, AccountError> {
        let token = self.access_token()?;
        Ok(self.api.profile(&token).await?)
    }

    /// Change the logged-in user's name and email.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `AccountError::NotLoggedIn`, or
    /// `AccountError::Api`.
    #[instrument(skip(self))]
    pub async fn update_profile(
        &self,
        name: &str,
        email: &str,
    ) -> Result<UserProfile, AccountError> {
        let update = ProfileUpdate {
            name: validate_name(name)?,
            email: validate_email(email)?,
        };
        let token = self.access_token()?;

        let current = self.api.profile(&token).await?;
        let updated = self.api.update_profile(current.id, &update, &token).await?;
        info!(user_id = %updated.id, "Profile saved");
        Ok(updated)
    }

    fn access_token(&self) -> Result<SecretString, AccountError> {
        self.session.access_token().ok_or(AccountError::NotLoggedIn)
    }
}
