use super::view::format_input;
use super::{Event, EventDetails};
use crate::auth::{is_authorized, Permission};
use crate::users::{User, UserId};
use crate::validation::{FieldErrors, Validator};
use crate::venues::{Venue, VenueId};
use anyhow::Result;
use rocket::FromForm;
use serde::Serialize;
use std::str::FromStr;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::PrimitiveDateTime;

const DATE_FORMATS: [&[FormatItem<'_>]; 4] = [
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
];

const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

#[derive(Debug, FromForm)]
pub(crate) struct EventForm {
    pub(crate) name: String,
    pub(crate) event_date: String,
    #[field(default = String::new())]
    pub(crate) venue: String,
    /// Only rendered for users who may assign managers.
    #[field(default = String::new())]
    pub(crate) manager: String,
    #[field(default = String::new())]
    pub(crate) description: String,
    #[field(default = Vec::new())]
    pub(crate) attendees: Vec<UserId>,
}

/// The venues and users an event may refer to.
#[derive(Debug, Default, Serialize)]
pub(crate) struct EventChoices {
    pub(crate) venues: Vec<Venue>,
    pub(crate) users: Vec<User>,
}

impl EventChoices {
    fn has_venue(&self, id: VenueId) -> bool {
        self.venues.iter().any(|venue| venue.id == id)
    }

    fn has_user(&self, id: UserId) -> bool {
        self.users.iter().any(|user| user.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidatedEvent {
    pub(crate) details: EventDetails,
    /// The manager picked in the form, only honored for users
    /// allowed to assign managers.
    pub(crate) manager_id: Option<UserId>,
    pub(crate) attendees: Vec<UserId>,
}

impl EventForm {
    pub(crate) fn validate(&self, choices: &EventChoices) -> Result<ValidatedEvent, FieldErrors> {
        let mut validator = Validator::default();
        let name = validator.required("name", &self.name, 120);
        let event_date = parse_event_date(&self.event_date);
        if self.event_date.trim().is_empty() {
            validator.error("event_date", "This field is required.");
        } else if event_date.is_none() {
            validator.error("event_date", "Enter a valid date/time.");
        }

        let venue_id = parse_choice(&self.venue, |id| choices.has_venue(id));
        if venue_id.is_err() {
            validator.error("venue", INVALID_CHOICE);
        }
        let manager_id = parse_choice(&self.manager, |id| choices.has_user(id));
        if manager_id.is_err() {
            validator.error("manager", INVALID_CHOICE);
        }
        if !self.attendees.iter().all(|id| choices.has_user(*id)) {
            validator.error("attendees", INVALID_CHOICE);
        }

        match (event_date, venue_id, manager_id) {
            (Some(event_date), Ok(venue_id), Ok(manager_id)) => validator.finish(ValidatedEvent {
                details: EventDetails {
                    name,
                    event_date,
                    venue_id,
                    description: self.description.trim().to_owned(),
                },
                manager_id,
                attendees: self.attendees.clone(),
            }),
            _ => Err(validator.into_errors()),
        }
    }
}

fn parse_event_date(value: &str) -> Option<PrimitiveDateTime> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(value, format).ok())
}

#[derive(Debug)]
struct InvalidChoice;

/// Empty means "none", anything else must be one of the choices.
fn parse_choice<T: FromStr + Copy>(
    value: &str,
    is_choice: impl Fn(T) -> bool,
) -> Result<Option<T>, InvalidChoice> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse() {
        Ok(id) if is_choice(id) => Ok(Some(id)),
        _ => Err(InvalidChoice),
    }
}

/// Whether the event is being created or which manager it already has.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Editing {
    NewEvent,
    ExistingEvent { manager_id: Option<UserId> },
}

/// Users who may assign managers get the manager they picked.
/// Everyone else becomes the manager of the events they create
/// and can't change the manager of existing events.
pub(crate) fn resolve_manager(actor: &User, picked: Option<UserId>, editing: Editing) -> Option<UserId> {
    if is_authorized(actor, Permission::AssignManagers) {
        picked
    } else {
        match editing {
            Editing::NewEvent => Some(actor.id),
            Editing::ExistingEvent { manager_id } => manager_id,
        }
    }
}

/// Values shown in the event form.
#[derive(Debug, Default, Serialize)]
pub(crate) struct EventFormValues {
    pub(crate) name: String,
    pub(crate) event_date: String,
    pub(crate) venue: Option<String>,
    pub(crate) manager: Option<String>,
    pub(crate) description: String,
    pub(crate) attendees: Vec<String>,
}

impl EventFormValues {
    pub(crate) fn from_event(event: &Event, attendees: &[User]) -> Result<Self> {
        Ok(Self {
            name: event.name.clone(),
            event_date: format_input(event.event_date)?,
            venue: event.venue_id.map(|id| id.to_string()),
            manager: event.manager_id.map(|id| id.to_string()),
            description: event.description.clone(),
            attendees: attendees.iter().map(|user| user.id.to_string()).collect(),
        })
    }
}

impl From<&EventForm> for EventFormValues {
    fn from(form: &EventForm) -> Self {
        Self {
            name: form.name.clone(),
            event_date: form.event_date.clone(),
            venue: Some(form.venue.clone()).filter(|v| !v.is_empty()),
            manager: Some(form.manager.clone()).filter(|m| !m.is_empty()),
            description: form.description.clone(),
            attendees: form.attendees.iter().map(ToString::to_string).collect(),
        }
    }
}
