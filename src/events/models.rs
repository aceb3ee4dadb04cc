use crate::id_newtype;
use crate::users::UserId;
use crate::venues::VenueId;
use serde::Serialize;
use std::fmt;
use time::{Date, PrimitiveDateTime};

id_newtype! {
    pub(crate) struct EventId;
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct Event {
    pub(crate) id: EventId,
    pub(crate) name: String,
    pub(crate) event_date: PrimitiveDateTime,
    pub(crate) venue_id: Option<VenueId>,
    pub(crate) manager_id: Option<UserId>,
    pub(crate) description: String,
    pub(crate) approved: bool,
}

impl Event {
    /// Signed number of whole days from `today` to the day of the event.
    pub(crate) fn days_until(&self, today: Date) -> i64 {
        (self.event_date.date() - today).whole_days()
    }

    pub(crate) fn timing(&self, today: Date) -> Timing {
        if self.event_date.date() < today {
            Timing::Past
        } else {
            Timing::Future
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub(crate) enum Timing {
    Past,
    Future,
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timing::Past => f.write_str("Past"),
            Timing::Future => f.write_str("Future"),
        }
    }
}

/// Validated, user-editable event fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EventDetails {
    pub(crate) name: String,
    pub(crate) event_date: PrimitiveDateTime,
    pub(crate) venue_id: Option<VenueId>,
    pub(crate) description: String,
}

/// New events always start out unapproved.
#[derive(Debug, Clone)]
pub(crate) struct NewEvent {
    pub(crate) details: EventDetails,
    pub(crate) manager_id: Option<UserId>,
    pub(crate) attendees: Vec<UserId>,
}

/// An event joined with the names of its venue and manager.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct EventListing {
    #[sqlx(flatten)]
    pub(crate) event: Event,
    pub(crate) venue_name: Option<String>,
    pub(crate) manager_name: Option<String>,
}
