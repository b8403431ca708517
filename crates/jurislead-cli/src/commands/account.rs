//! Health check and account commands.

use anyhow::Context;
use clap::{Args, ValueEnum};
use jurislead_client::models::GoogleLoginRequest;
use jurislead_core::UserRole;
use tracing::info;

use super::App;
use crate::display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Client,
    Lawyer,
}

impl From<RoleArg> for UserRole {
    fn from(v: RoleArg) -> Self {
        match v {
            RoleArg::Client => Self::Client,
            RoleArg::Lawyer => Self::Lawyer,
        }
    }
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    pub email: String,
    #[arg(long, env = "JURIS_PASSWORD", hide_env_values = true)]
    pub password: String,
    /// Account type to sign into.
    #[arg(long, value_enum, default_value_t = RoleArg::Client)]
    pub role: RoleArg,
}

#[derive(Debug, Args)]
pub struct GoogleLoginArgs {
    /// OAuth access token obtained from Google.
    pub access_token: String,
    #[arg(long, value_enum, default_value_t = RoleArg::Client)]
    pub role: RoleArg,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub google_id: Option<String>,
}

pub async fn health(app: &App) -> anyhow::Result<()> {
    let status = app.api.health_check().await?;
    display::print_health(&status);
    Ok(())
}

pub async fn login(app: &App, args: LoginArgs) -> anyhow::Result<()> {
    let mut auth = app.auth().await?;
    let user = auth
        .login(&args.email, &args.password, args.role.into())
        .await
        .context("login failed")?;
    println!("Welcome, {} ({})", user.display_name(), user.user_role);
    Ok(())
}

pub async fn google_login(app: &App, args: GoogleLoginArgs) -> anyhow::Result<()> {
    let request = GoogleLoginRequest {
        access_token: args.access_token,
        user_role: args.role.into(),
        email: args.email,
        first_name: args.first_name,
        last_name: args.last_name,
        google_id: args.google_id,
    };
    let mut auth = app.auth().await?;
    let user = auth
        .google_login(&request)
        .await
        .context("Google login failed")?;
    println!("Welcome, {} ({})", user.display_name(), user.user_role);
    Ok(())
}

pub async fn logout(app: &App) -> anyhow::Result<()> {
    let mut auth = app.auth().await?;
    auth.logout().await;
    println!("Logged out.");
    Ok(())
}

pub async fn profile(app: &App, refresh: bool) -> anyhow::Result<()> {
    let mut auth = app.auth().await?;
    super::require(auth.gate(&[]))?;
    if refresh {
        auth.refresh_profile().await.context("refreshing profile")?;
        info!("profile refreshed");
    }
    if let Some(user) = auth.user() {
        display::print_profile(user);
    }
    Ok(())
}
