//! Train search.

use std::io::Write;

use railbook_core::lookup::location_label;
use railbook_core::{Location, Train, TrainQuery};
use tracing::info;

use super::{resolve_station, Context};
use crate::output::{write_json, write_table, OutputFormat};
use crate::Result;

/// Columns shared by every train listing.
pub const TRAIN_HEADERS: [&str; 7] = ["ID", "Number", "Name", "Route", "Schedule", "Seats", "Fare"];

/// One table row per train, with stations shown by name.
pub fn train_rows(trains: &[Train], locations: &[Location]) -> Vec<Vec<String>> {
    trains
        .iter()
        .map(|t| {
            let seats = if t.is_sold_out() {
                "Sold Out".to_string()
            } else {
                t.seat_summary()
            };
            vec![
                t.id.to_string(),
                t.train_number.clone(),
                t.train_name.clone(),
                format!(
                    "{} → {}",
                    location_label(locations, t.source_id),
                    location_label(locations, t.destination_id)
                ),
                t.schedule(),
                seats,
                format!("₹{}", t.fare),
            ]
        })
        .collect()
}

/// Search trains between stations given by id or code; both are optional.
pub async fn run(
    ctx: &Context<'_>,
    out: &mut dyn Write,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let locations = ctx.api.list_locations().await?;
    let query = TrainQuery {
        source_id: from.map(|s| resolve_station(&locations, s)).transpose()?,
        destination_id: to.map(|s| resolve_station(&locations, s)).transpose()?,
    };
    info!(?query, "Searching trains");

    let trains = ctx.api.search_trains(&query).await?;

    match ctx.format {
        OutputFormat::Json => write_json(out, &trains)?,
        OutputFormat::Table => {
            writeln!(out, "{} Train(s) Found", trains.len())?;
            write_table(
                out,
                &TRAIN_HEADERS,
                &train_rows(&trains, &locations),
                "No trains found for the selected route.",
            )?;
        }
    }
    Ok(())
}
