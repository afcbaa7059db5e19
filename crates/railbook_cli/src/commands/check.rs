//! Backend health check.

use std::io::Write;

use serde_json::json;
use tracing::info;

use super::Context;
use crate::output::{write_json, OutputFormat};
use crate::{CliError, Result};

/// Probe `/health` and report whether a token is stored.
pub async fn run(ctx: &Context<'_>, out: &mut dyn Write, base_url: &str) -> Result<()> {
    let healthy = ctx.api.health().await?;
    let logged_in = ctx.storage.token()?.is_some();
    info!(base_url, healthy, logged_in, "Health check");

    match ctx.format {
        OutputFormat::Json => write_json(
            out,
            &json!({ "base_url": base_url, "healthy": healthy, "logged_in": logged_in }),
        )?,
        OutputFormat::Table => {
            if healthy {
                writeln!(out, "Backend at {} is healthy", base_url)?;
                let session = if logged_in { "logged in" } else { "not logged in" };
                writeln!(out, "Session: {}", session)?;
            }
        }
    }

    if healthy {
        Ok(())
    } else {
        Err(CliError::Unreachable(base_url.to_string()))
    }
}
