use super::{EventId, EventRepository as _, EventView};
use crate::clock::{Clock as _, SharedClock};
use crate::database::Repository;
use crate::result::{HttpResult, OptionExt as _};
use crate::template::PageBuilder;
use rocket::{get, State};
use rocket_dyn_templates::{context, Template};

/// Ranked ahead of the static siblings (`new`, `search`, ...) so that
/// their login forward, not this route's parse failure, decides the status.
#[get("/events/<id>", rank = -15)]
pub(super) async fn show_event(
    id: EventId,
    page: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
    clock: &State<SharedClock>,
) -> HttpResult<Template> {
    let listing = repository.event_listing_by_id(id).await?.or_not_found()?;
    let attendees = repository.attendees(id).await?;
    let event = EventView::new(listing, clock.today())?;
    Ok(page.render("events/show", context! { event, attendees }))
}
