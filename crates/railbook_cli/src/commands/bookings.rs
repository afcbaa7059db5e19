//! Booking commands: book, list and cancel.

use std::io::{BufRead, Write};

use railbook_core::forms::{earliest_journey_date, BookingDraft};
use railbook_core::lookup::{join_bookings, BookingDetails};
use serde_json::json;
use tracing::info;

use super::{confirm, Context};
use crate::output::{write_json, write_table, OutputFormat};
use crate::{CliError, Result};

const BOOKING_HEADERS: [&str; 9] = [
    "ID",
    "Reference",
    "Train",
    "Route",
    "Date",
    "Passenger",
    "Seat",
    "Fare",
    "Status",
];

fn booking_rows(details: &[BookingDetails<'_>]) -> Vec<Vec<String>> {
    details
        .iter()
        .map(|d| {
            let b = d.booking;
            vec![
                b.id.to_string(),
                b.booking_reference.clone(),
                d.train_label(),
                d.route(),
                b.journey_date.to_string(),
                format!("{} ({}, {})", b.passenger_name, b.passenger_age, b.passenger_gender),
                b.seat_number.clone().unwrap_or_else(|| "-".to_string()),
                format!("₹{}", b.total_fare),
                b.status.label().to_string(),
            ]
        })
        .collect()
}

/// Book a seat on `train_id`.
///
/// A blank journey date means the earliest bookable day. Sold-out trains
/// are refused before any booking request is sent.
pub async fn book(
    ctx: &Context<'_>,
    out: &mut dyn Write,
    train_id: i64,
    draft: &BookingDraft,
) -> Result<()> {
    let mut draft = draft.clone();
    if draft.journey_date.trim().is_empty() {
        draft.journey_date = earliest_journey_date(ctx.today).to_string();
    }
    let payload = draft.to_new_booking(train_id, ctx.today)?;
    ctx.require_login()?;

    let train = ctx.api.get_train(train_id).await?;
    if train.is_sold_out() {
        return Err(CliError::InvalidArgument(format!(
            "{} (#{}) is sold out",
            train.train_name, train.train_number
        )));
    }

    info!(train_id, date = %payload.journey_date, "Booking");
    let booking = ctx.api.create_booking(&payload).await?;

    match ctx.format {
        OutputFormat::Json => write_json(out, &booking)?,
        OutputFormat::Table => writeln!(
            out,
            "Booking Successful! Booking Reference: {}, Seat Number: {}",
            booking.booking_reference,
            booking.seat_number.as_deref().unwrap_or("-")
        )?,
    }
    Ok(())
}

/// List the caller's bookings, or every booking with `all`.
pub async fn list(ctx: &Context<'_>, out: &mut dyn Write, all: bool) -> Result<()> {
    ctx.require_login()?;

    let bookings = async {
        if all {
            ctx.api.all_bookings().await
        } else {
            ctx.api.my_bookings().await
        }
    };
    let (bookings, trains, locations) = tokio::try_join!(
        bookings,
        ctx.api.list_trains(),
        ctx.api.list_locations()
    )?;

    match ctx.format {
        OutputFormat::Json => write_json(out, &bookings)?,
        OutputFormat::Table => {
            let details = join_bookings(&bookings, &trains, &locations);
            write_table(
                out,
                &BOOKING_HEADERS,
                &booking_rows(&details),
                "You don't have any bookings yet.",
            )?;
        }
    }
    Ok(())
}

/// Cancel a booking after a y/N prompt, unless `yes` is set.
pub async fn cancel(
    ctx: &Context<'_>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    id: i64,
    yes: bool,
) -> Result<()> {
    ctx.require_login()?;

    let booking = ctx.api.get_booking(id).await?;
    if !booking.status.is_cancellable() {
        return Err(CliError::InvalidArgument(format!(
            "Booking {} is already cancelled",
            booking.booking_reference
        )));
    }

    let prompt = format!(
        "Are you sure you want to cancel booking {}?",
        booking.booking_reference
    );
    if !yes && !confirm(&prompt, input, out)? {
        return Err(CliError::Aborted);
    }

    info!(id, reference = %booking.booking_reference, "Cancelling booking");
    let receipt = ctx.api.cancel_booking(id).await?;

    match ctx.format {
        OutputFormat::Json => write_json(
            out,
            &json!({
                "message": receipt.message,
                "booking_reference": receipt.booking_reference,
            }),
        )?,
        OutputFormat::Table => writeln!(out, "Booking cancelled successfully!")?,
    }
    Ok(())
}
