use super::{EventId, EventListing, Timing};
use crate::users::UserId;
use crate::venues::VenueId;
use anyhow::Result;
use serde::Serialize;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};

const DISPLAY_FORMAT: &[FormatItem<'_>] = format_description!(
    "[month repr:long] [day padding:none], [year], [hour repr:12 padding:none]:[minute] [period]"
);
const INPUT_FORMAT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]T[hour]:[minute]");

/// An event as the templates see it.
#[derive(Debug, Serialize)]
pub(crate) struct EventView {
    pub(crate) id: EventId,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) approved: bool,
    pub(crate) venue_id: Option<VenueId>,
    pub(crate) venue_name: Option<String>,
    pub(crate) manager_id: Option<UserId>,
    pub(crate) manager_name: Option<String>,
    pub(crate) date: String,
    pub(crate) date_input: String,
    pub(crate) day: u8,
    pub(crate) days_until: i64,
    pub(crate) timing: Timing,
}

impl EventView {
    pub(crate) fn new(listing: EventListing, today: Date) -> Result<Self> {
        let EventListing {
            event,
            venue_name,
            manager_name,
        } = listing;
        Ok(EventView {
            date: event.event_date.format(DISPLAY_FORMAT)?,
            date_input: format_input(event.event_date)?,
            day: event.event_date.day(),
            days_until: event.days_until(today),
            timing: event.timing(today),
            id: event.id,
            name: event.name,
            description: event.description,
            approved: event.approved,
            venue_id: event.venue_id,
            manager_id: event.manager_id,
            venue_name,
            manager_name,
        })
    }

    pub(crate) fn all(listings: Vec<EventListing>, today: Date) -> Result<Vec<Self>> {
        listings
            .into_iter()
            .map(|listing| EventView::new(listing, today))
            .collect()
    }
}

/// The value of a `datetime-local` input.
pub(crate) fn format_input(date: PrimitiveDateTime) -> Result<String> {
    Ok(date.format(INPUT_FORMAT)?)
}
