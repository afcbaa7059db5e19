//! Registered users (admin).

use std::io::Write;

use super::Context;
use crate::output::{write_json, write_table, OutputFormat};
use crate::Result;

pub async fn run(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    ctx.require_login()?;
    let users = ctx.api.list_users().await?;

    match ctx.format {
        OutputFormat::Json => write_json(out, &users)?,
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = users
                .iter()
                .map(|u| {
                    vec![
                        u.id.to_string(),
                        u.username.clone(),
                        u.email.clone(),
                        u.full_name.clone().unwrap_or_else(|| "-".to_string()),
                        if u.is_admin { "Admin" } else { "User" }.to_string(),
                        if u.is_active { "Active" } else { "Inactive" }.to_string(),
                    ]
                })
                .collect();
            write_table(
                out,
                &["ID", "Username", "Email", "Full Name", "Role", "Status"],
                &rows,
                "No users found",
            )?;
        }
    }
    Ok(())
}
