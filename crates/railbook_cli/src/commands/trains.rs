//! Train listing and management.

use std::io::{BufRead, Write};

use clap::{Args, Subcommand};
use railbook_core::forms::{optional, parse_bounded, parse_number, parse_time, TrainDraft};
use railbook_core::{Train, TrainUpdate};
use serde_json::json;
use tracing::info;

use super::search::{train_rows, TRAIN_HEADERS};
use super::{confirm, Context};
use crate::output::{render_table, write_json, write_table, OutputFormat};
use crate::{CliError, Result};

/// Train subcommands
#[derive(Debug, Subcommand)]
pub enum TrainCommand {
    /// List every train
    List,
    /// Show one train
    Show {
        /// Train id
        id: i64,
    },
    /// Add a train (admin)
    Add(TrainFields),
    /// Change some fields of a train (admin)
    Update {
        /// Train id
        id: i64,
        #[command(flatten)]
        changes: TrainChanges,
    },
    /// Delete a train (admin)
    Delete {
        /// Train id
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Every field of a new train
#[derive(Debug, Args)]
pub struct TrainFields {
    /// Public train number
    #[arg(long)]
    pub number: String,
    /// Train name
    #[arg(long)]
    pub name: String,
    /// Origin station id
    #[arg(long)]
    pub source: String,
    /// Terminus station id
    #[arg(long)]
    pub destination: String,
    /// Departure time (HH:MM)
    #[arg(long)]
    pub departure: String,
    /// Arrival time (HH:MM)
    #[arg(long)]
    pub arrival: String,
    /// Seat capacity
    #[arg(long)]
    pub seats: String,
    /// Fare per seat
    #[arg(long)]
    pub fare: String,
}

impl TrainFields {
    fn to_draft(&self) -> TrainDraft {
        TrainDraft {
            train_number: self.number.clone(),
            train_name: self.name.clone(),
            source_id: self.source.clone(),
            destination_id: self.destination.clone(),
            departure_time: self.departure.clone(),
            arrival_time: self.arrival.clone(),
            total_seats: self.seats.clone(),
            fare: self.fare.clone(),
        }
    }
}

/// Fields to change; omitted ones keep their value
#[derive(Debug, Default, Args)]
pub struct TrainChanges {
    /// Public train number
    #[arg(long)]
    pub number: Option<String>,
    /// Train name
    #[arg(long)]
    pub name: Option<String>,
    /// Origin station id
    #[arg(long)]
    pub source: Option<String>,
    /// Terminus station id
    #[arg(long)]
    pub destination: Option<String>,
    /// Departure time (HH:MM)
    #[arg(long)]
    pub departure: Option<String>,
    /// Arrival time (HH:MM)
    #[arg(long)]
    pub arrival: Option<String>,
    /// Seat capacity
    #[arg(long)]
    pub seats: Option<String>,
    /// Fare per seat
    #[arg(long)]
    pub fare: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl TrainChanges {
    /// Partial update payload; given values are parsed like the form does.
    pub fn to_update(&self) -> Result<TrainUpdate> {
        Ok(TrainUpdate {
            train_number: self.number.as_deref().and_then(optional),
            train_name: self.name.as_deref().and_then(optional),
            source_id: present(&self.source)
                .map(|v| parse_number("Source station", v))
                .transpose()?,
            destination_id: present(&self.destination)
                .map(|v| parse_number("Destination station", v))
                .transpose()?,
            departure_time: present(&self.departure)
                .map(|v| parse_time("Departure time", v))
                .transpose()?,
            arrival_time: present(&self.arrival)
                .map(|v| parse_time("Arrival time", v))
                .transpose()?,
            total_seats: present(&self.seats)
                .map(|v| parse_bounded("Total seats", v, 1, i32::MAX as i64).map(|n| n as i32))
                .transpose()?,
            fare: present(&self.fare)
                .map(|v| parse_bounded("Fare", v, 1, i64::MAX))
                .transpose()?,
        })
    }
}

fn is_empty(update: &TrainUpdate) -> bool {
    *update == TrainUpdate::default()
}

fn train_detail(train: &Train) -> String {
    render_table(
        &["Field", "Value"],
        &[
            vec!["Number".to_string(), train.train_number.clone()],
            vec!["Name".to_string(), train.train_name.clone()],
            vec!["Source".to_string(), train.source_id.to_string()],
            vec!["Destination".to_string(), train.destination_id.to_string()],
            vec!["Schedule".to_string(), train.schedule()],
            vec!["Seats".to_string(), train.seat_summary()],
            vec!["Fare".to_string(), format!("₹{}", train.fare)],
        ],
    )
}

fn write_train(ctx: &Context<'_>, out: &mut dyn Write, train: &Train, verb: &str) -> Result<()> {
    match ctx.format {
        OutputFormat::Json => write_json(out, train)?,
        OutputFormat::Table => writeln!(
            out,
            "Train {} successfully! ({} #{})",
            verb, train.train_name, train.train_number
        )?,
    }
    Ok(())
}

/// Run a train subcommand.
pub async fn run(
    ctx: &Context<'_>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    command: &TrainCommand,
) -> Result<()> {
    match command {
        TrainCommand::List => {
            let (trains, locations) =
                tokio::try_join!(ctx.api.list_trains(), ctx.api.list_locations())?;
            match ctx.format {
                OutputFormat::Json => write_json(out, &trains)?,
                OutputFormat::Table => write_table(
                    out,
                    &TRAIN_HEADERS,
                    &train_rows(&trains, &locations),
                    "No trains found",
                )?,
            }
        }
        TrainCommand::Show { id } => {
            let train = ctx.api.get_train(*id).await?;
            match ctx.format {
                OutputFormat::Json => write_json(out, &train)?,
                OutputFormat::Table => write!(out, "{}", train_detail(&train))?,
            }
        }
        TrainCommand::Add(fields) => {
            let payload = fields.to_draft().to_new_train()?;
            ctx.require_login()?;
            info!(number = %payload.train_number, "Adding train");
            let train = ctx.api.create_train(&payload).await?;
            write_train(ctx, out, &train, "added")?;
        }
        TrainCommand::Update { id, changes } => {
            let update = changes.to_update()?;
            if is_empty(&update) {
                return Err(CliError::InvalidArgument(
                    "nothing to update; pass at least one field".to_string(),
                ));
            }
            ctx.require_login()?;
            info!(id, "Updating train");
            let train = ctx.api.update_train(*id, &update).await?;
            write_train(ctx, out, &train, "updated")?;
        }
        TrainCommand::Delete { id, yes } => {
            ctx.require_login()?;
            if !yes && !confirm("Are you sure you want to delete this train?", input, out)? {
                return Err(CliError::Aborted);
            }
            info!(id, "Deleting train");
            ctx.api.delete_train(*id).await?;
            match ctx.format {
                OutputFormat::Json => write_json(out, &json!({ "deleted": id }))?,
                OutputFormat::Table => writeln!(out, "Train deleted successfully!")?,
            }
        }
    }
    Ok(())
}
