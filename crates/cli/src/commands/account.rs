//! Login, logout, signup and profile commands.

use storepilot_storefront::error::set_sentry_user;
use storepilot_storefront::{AppState, Result};

use crate::render::{self, Notification};

/// Log in and store the session tokens.
///
/// # Errors
///
/// Returns an error for invalid input or rejected credentials.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<String> {
    state.accounts().login(email, password).await?;
    Ok(format!("{}\n", Notification::success("Logged in successfully!")))
}

/// Forget the session tokens. The cart and wishlist stay on disk.
///
/// # Errors
///
/// Returns an error if the tokens cannot be removed.
pub fn logout(state: &AppState) -> Result<String> {
    state.accounts().logout()?;
    Ok(format!("{}\n", Notification::success("Logged out successfully")))
}

/// Create an account.
///
/// # Errors
///
/// Returns an error for invalid input or a taken email.
pub async fn signup(
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
    avatar: Option<&str>,
) -> Result<String> {
    let profile = state
        .accounts()
        .signup(name, email, password, avatar)
        .await?;
    Ok(format!(
        "{}\n{}",
        Notification::success("Account created successfully!"),
        render::profile(&profile)
    ))
}

/// Show the logged-in user's profile.
///
/// # Errors
///
/// Returns an error if no one is logged in or the token is rejected.
pub async fn show_profile(state: &AppState) -> Result<String> {
    let profile = state.accounts().profile().await?;
    set_sentry_user(&profile.id, Some(&profile.email));
    Ok(render::profile(&profile))
}

/// Update the logged-in user's name and email.
///
/// # Errors
///
/// Returns an error for invalid input, no session, or an API failure.
pub async fn update_profile(state: &AppState, name: &str, email: &str) -> Result<String> {
    let profile = state.accounts().update_profile(name, email).await?;
    Ok(format!(
        "{}\n{}",
        Notification::success("Profile updated successfully!"),
        render::profile(&profile)
    ))
}
