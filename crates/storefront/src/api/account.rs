//! Account endpoints: login, signup and profile.

use reqwest::Method;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{info, instrument};

use storepilot_core::UserId;

use super::{ApiClient, ApiError};
use crate::models::{Credentials, NewUser, ProfileUpdate, UserProfile};
use crate::session::TokenPair;

/// Body of a successful `POST /auth/login`.
#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
}

impl ApiClient {
    /// Exchange credentials for a token pair.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for wrong credentials, or another
    /// error if the API request fails.
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        let url = self.endpoint("auth/login")?;
        let response: LoginResponse = self
            .execute(Method::POST, url, None, Some(&credentials.to_body()))
            .await?;
        info!("Login accepted");
        Ok(TokenPair::new(response.access_token, response.refresh_token))
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Conflict` if the email is taken, or another error if
    /// the API request fails.
    #[instrument(skip_all, fields(email = %new_user.credentials.email))]
    pub async fn signup(&self, new_user: &NewUser) -> Result<UserProfile, ApiError> {
        let url = self.endpoint("users/")?;
        let profile: UserProfile = self
            .execute(Method::POST, url, None, Some(&new_user.to_body()))
            .await?;
        info!(user_id = %profile.id, "Account created");
        Ok(profile)
    }

    /// Fetch the profile behind an access token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for an expired or unknown token.
    #[instrument(skip_all)]
    pub async fn profile(&self, access_token: &SecretString) -> Result<UserProfile, ApiError> {
        let url = self.endpoint("auth/profile")?;
        self.execute(Method::GET, url, Some(access_token), None)
            .await
    }

    /// Update name and email of an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, update, access_token), fields(user_id = %id))]
    pub async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
        access_token: &SecretString,
    ) -> Result<UserProfile, ApiError> {
        let url = self.endpoint(&format!("users/{id}"))?;
        let body = serde_json::to_value(update)?;
        let profile: UserProfile = self
            .execute(Method::PUT, url, Some(access_token), Some(&body))
            .await?;
        info!("Profile updated");
        Ok(profile)
    }
}
