//! Account commands: login, logout, whoami and register.

use std::io::Write;

use railbook_core::forms::{LoginDraft, RegisterDraft};
use railbook_core::User;
use tracing::{info, warn};

use super::Context;
use crate::output::{render_table, write_json, OutputFormat};
use crate::{CliError, Result};

/// Exchange credentials for a token, store it, and confirm the account.
pub async fn login(ctx: &Context<'_>, out: &mut dyn Write, draft: &LoginDraft) -> Result<()> {
    let credentials = draft.to_credentials()?;
    info!(username = %credentials.username, "Logging in");

    let token = ctx.api.login(&credentials).await?;
    ctx.storage.set_token(&token.access_token)?;

    let user = match ctx.api.current_user().await {
        Ok(user) => user,
        Err(e) => {
            warn!(error = %e, "Token rejected right after login");
            ctx.storage.clear_token()?;
            return Err(e.into());
        }
    };

    match ctx.format {
        OutputFormat::Json => write_json(out, &user)?,
        OutputFormat::Table => writeln!(out, "Logged in as {}", user.display_name())?,
    }
    Ok(())
}

/// Forget the stored token. The backend is not told.
pub fn logout(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    ctx.storage.clear_token()?;
    info!("Logged out");
    writeln!(out, "Logged out")?;
    Ok(())
}

/// Show the account behind the stored token.
///
/// A token the backend no longer accepts is dropped.
pub async fn whoami(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    ctx.require_login()?;
    let user = match ctx.api.current_user().await {
        Ok(user) => user,
        Err(e) => {
            ctx.storage.clear_token()?;
            if e.is_unauthorized() {
                return Err(CliError::NotLoggedIn);
            }
            return Err(e.into());
        }
    };

    match ctx.format {
        OutputFormat::Json => write_json(out, &user)?,
        OutputFormat::Table => write!(out, "{}", user_table(&user))?,
    }
    Ok(())
}

fn user_table(user: &User) -> String {
    let role = if user.is_admin { "Admin" } else { "User" };
    render_table(
        &["Field", "Value"],
        &[
            vec!["Username".to_string(), user.username.clone()],
            vec!["Name".to_string(), user.display_name().to_string()],
            vec!["Email".to_string(), user.email.clone()],
            vec!["Role".to_string(), role.to_string()],
        ],
    )
}

/// Create an account; `--admin` uses the admin registration endpoint.
pub async fn register(ctx: &Context<'_>, out: &mut dyn Write, draft: &RegisterDraft) -> Result<()> {
    let new_user = draft.to_new_user()?;
    info!(username = %new_user.username, admin = draft.as_admin, "Registering");

    let user = if draft.as_admin {
        ctx.api.register_admin(&new_user).await?
    } else {
        ctx.api.register(&new_user).await?
    };

    match ctx.format {
        OutputFormat::Json => write_json(out, &user)?,
        OutputFormat::Table => {
            let kind = if draft.as_admin { "Admin" } else { "User" };
            writeln!(
                out,
                "{} registered successfully! Please login with `railbook login`.",
                kind
            )?;
        }
    }
    Ok(())
}
