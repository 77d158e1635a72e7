use crate::core::auth::{AuthError, AuthGateway};
use crate::store::profiles::ProfileDirectory;
use anyhow::Result;
use chrono::NaiveDate;
use uuid::Uuid;

/// Creates a profile for a fresh uid and signs it in. Usernames are
/// unique across the profile directory.
pub async fn register(
    auth: &dyn AuthGateway,
    profiles: &ProfileDirectory,
    username: &str,
    name: &str,
    email: &str,
    birth_date: Option<NaiveDate>,
) -> Result<()> {
    if profiles.find_by_username(username).await?.is_some() {
        anyhow::bail!("Username {username} is already taken");
    }

    let uid = Uuid::new_v4().to_string();
    let profile = profiles
        .register(&uid, name, email, username, birth_date)
        .await?;
    auth.sign_in(&profile.uid, "").await?;

    println!(
        "Welcome, {}! You are signed in as {}.",
        profile.name, profile.username
    );
    Ok(())
}

/// Resolves a username to its uid and signs in. Whether the password is
/// actually checked is up to the gateway; the local one accepts any.
pub async fn login(
    auth: &dyn AuthGateway,
    profiles: &ProfileDirectory,
    username: &str,
    password: &str,
) -> Result<()> {
    let Some(profile) = profiles.find_by_username(username).await? else {
        return Err(AuthError::UnknownUser(username.to_string()).into());
    };
    auth.sign_in(&profile.uid, password).await?;

    println!("Signed in as {} ({}).", profile.name, profile.username);
    Ok(())
}

pub async fn logout(auth: &dyn AuthGateway) -> Result<()> {
    auth.sign_out().await?;
    println!("Signed out. Expenses need a signed-in account.");
    Ok(())
}
