//! Station management (admin).

use std::io::{BufRead, Write};

use clap::{Args, Subcommand};
use railbook_core::forms::{optional, LocationDraft};
use railbook_core::{Location, LocationUpdate};
use serde_json::json;
use tracing::info;

use super::{confirm, Context};
use crate::output::{write_json, write_table, OutputFormat};
use crate::{CliError, Result};

/// Station subcommands
#[derive(Debug, Subcommand)]
pub enum LocationCommand {
    /// List every station
    List,
    /// Add a station
    Add(LocationFields),
    /// Change some fields of a station
    Update {
        /// Station id
        id: i64,
        #[command(flatten)]
        changes: LocationChanges,
    },
    /// Delete a station
    Delete {
        /// Station id
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Every field of a new station
#[derive(Debug, Args)]
pub struct LocationFields {
    /// Station name
    #[arg(long)]
    pub name: String,
    /// Station code
    #[arg(long)]
    pub code: String,
    /// City
    #[arg(long)]
    pub city: String,
    /// State
    #[arg(long)]
    pub state: String,
}

impl LocationFields {
    fn to_draft(&self) -> LocationDraft {
        LocationDraft {
            name: self.name.clone(),
            code: self.code.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
        }
    }
}

/// Fields to change; omitted ones keep their value
#[derive(Debug, Default, Args)]
pub struct LocationChanges {
    /// Station name
    #[arg(long)]
    pub name: Option<String>,
    /// Station code
    #[arg(long)]
    pub code: Option<String>,
    /// City
    #[arg(long)]
    pub city: Option<String>,
    /// State
    #[arg(long)]
    pub state: Option<String>,
}

impl LocationChanges {
    /// Partial update payload; blank values are dropped.
    pub fn to_update(&self) -> LocationUpdate {
        let field = |v: &Option<String>| v.as_deref().and_then(optional);
        LocationUpdate {
            name: field(&self.name),
            code: field(&self.code),
            city: field(&self.city),
            state: field(&self.state),
        }
    }
}

fn location_rows(locations: &[Location]) -> Vec<Vec<String>> {
    locations
        .iter()
        .map(|l| {
            vec![
                l.id.to_string(),
                l.code.clone(),
                l.name.clone(),
                l.city.clone(),
                l.state.clone(),
            ]
        })
        .collect()
}

fn write_location(ctx: &Context<'_>, out: &mut dyn Write, location: &Location, verb: &str) -> Result<()> {
    match ctx.format {
        OutputFormat::Json => write_json(out, location)?,
        OutputFormat::Table => writeln!(out, "Location {} successfully! ({})", verb, location.label())?,
    }
    Ok(())
}

/// Run a station subcommand.
pub async fn run(
    ctx: &Context<'_>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    command: &LocationCommand,
) -> Result<()> {
    match command {
        LocationCommand::List => {
            let locations = ctx.api.list_locations().await?;
            match ctx.format {
                OutputFormat::Json => write_json(out, &locations)?,
                OutputFormat::Table => write_table(
                    out,
                    &["ID", "Code", "Name", "City", "State"],
                    &location_rows(&locations),
                    "No locations found",
                )?,
            }
        }
        LocationCommand::Add(fields) => {
            let payload = fields.to_draft().to_new_location()?;
            ctx.require_login()?;
            info!(code = %payload.code, "Adding location");
            let location = ctx.api.create_location(&payload).await?;
            write_location(ctx, out, &location, "added")?;
        }
        LocationCommand::Update { id, changes } => {
            let update = changes.to_update();
            if update.is_empty() {
                return Err(CliError::InvalidArgument(
                    "nothing to update; pass at least one field".to_string(),
                ));
            }
            ctx.require_login()?;
            info!(id, "Updating location");
            let location = ctx.api.update_location(*id, &update).await?;
            write_location(ctx, out, &location, "updated")?;
        }
        LocationCommand::Delete { id, yes } => {
            ctx.require_login()?;
            if !yes && !confirm("Are you sure you want to delete this location?", input, out)? {
                return Err(CliError::Aborted);
            }
            info!(id, "Deleting location");
            ctx.api.delete_location(*id).await?;
            match ctx.format {
                OutputFormat::Json => write_json(out, &json!({ "deleted": id }))?,
                OutputFormat::Table => writeln!(out, "Location deleted successfully!")?,
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{text, MockBackend};
    use std::io::Cursor;

    fn mysuru(code: &str) -> LocationFields {
        LocationFields {
            name: "Mysuru Junction".to_string(),
            code: code.to_string(),
            city: "Mysuru".to_string(),
            state: "Karnataka".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_is_public() {
        let backend = MockBackend::start().await;
        let ctx = backend.context(OutputFormat::Table);
        let mut out = Vec::new();

        run(&ctx, &mut Cursor::new(Vec::new()), &mut out, &LocationCommand::List)
            .await
            .unwrap();

        let output = text(out);
        assert!(output.contains("SBC"));
        assert!(output.contains("Chennai Central"));
    }

    #[tokio::test]
    async fn test_add_location() {
        let backend = MockBackend::logged_in().await;
        let ctx = backend.context(OutputFormat::Table);
        let mut out = Vec::new();

        run(
            &ctx,
            &mut Cursor::new(Vec::new()),
            &mut out,
            &LocationCommand::Add(mysuru("MYS")),
        )
        .await
        .unwrap();

        assert_eq!(
            text(out),
            "Location added successfully! (Mysuru Junction (MYS))\n"
        );
    }

    #[tokio::test]
    async fn test_duplicate_code_shows_server_message() {
        let backend = MockBackend::logged_in().await;
        let ctx = backend.context(OutputFormat::Table);
        let mut out = Vec::new();

        let err = run(
            &ctx,
            &mut Cursor::new(Vec::new()),
            &mut out,
            &LocationCommand::Add(mysuru("SBC")),
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "Location code already exists");
    }

    #[tokio::test]
    async fn test_update_without_changes_sends_nothing() {
        let backend = MockBackend::logged_in().await;
        let ctx = backend.context(OutputFormat::Table);
        let mut out = Vec::new();
        let command = LocationCommand::Update {
            id: 1,
            changes: LocationChanges {
                name: Some("  ".to_string()),
                ..Default::default()
            },
        };

        let err = run(&ctx, &mut Cursor::new(Vec::new()), &mut out, &command)
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::InvalidArgument(_)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_asks_first() {
        let backend = MockBackend::logged_in().await;
        let ctx = backend.context(OutputFormat::Table);
        let command = LocationCommand::Delete { id: 2, yes: false };

        let mut out = Vec::new();
        let declined = run(&ctx, &mut Cursor::new(b"n\n".to_vec()), &mut out, &command).await;
        assert!(matches!(declined, Err(CliError::Aborted)));
        assert!(backend.calls().is_empty());

        let mut out = Vec::new();
        run(&ctx, &mut Cursor::new(b"yes\n".to_vec()), &mut out, &command)
            .await
            .unwrap();
        assert!(text(out).ends_with("Location deleted successfully!\n"));
        assert_eq!(backend.calls(), vec!["DELETE /locations/2"]);
    }

    #[test]
    fn test_changes_trim_values() {
        let changes = LocationChanges {
            code: Some(" MYS ".to_string()),
            ..Default::default()
        };
        let update = changes.to_update();
        assert_eq!(update.code.as_deref(), Some("MYS"));
        assert!(update.name.is_none());
    }
}
