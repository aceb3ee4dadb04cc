use super::{VenueId, VenueRepository as _};
use crate::clock::{Clock as _, SharedClock};
use crate::database::Repository;
use crate::events::{EventRepository as _, EventView};
use crate::result::{HttpResult, OptionExt as _};
use crate::template::PageBuilder;
use crate::users::{User, UserRepository as _};
use either::{Either, Left, Right};
use rocket::response::{Flash, Redirect};
use rocket::{get, uri, State};
use rocket_dyn_templates::{context, Template};

/// Ranked ahead of the static siblings (`new`, `search`, ...) so that
/// their login forward, not this route's parse failure, decides the status.
#[get("/venues/<id>", rank = -15)]
pub(super) async fn show_venue(
    id: VenueId,
    _user: User,
    page: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
    clock: &State<SharedClock>,
) -> HttpResult<Template> {
    let venue = repository.venue_by_id(id).await?.or_not_found()?;
    let owner = repository.user_by_id(venue.owner_id).await?;
    let events = EventView::all(repository.events_by_venue(id).await?, clock.today())?;
    Ok(page.render("venues/show", context! { venue, owner, events }))
}

#[get("/venues/<id>/events")]
pub(super) async fn venue_events(
    id: VenueId,
    page: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
    clock: &State<SharedClock>,
) -> HttpResult<Either<Template, Flash<Redirect>>> {
    let venue = repository.venue_by_id(id).await?.or_not_found()?;
    let events = EventView::all(repository.events_by_venue(id).await?, clock.today())?;
    if events.is_empty() {
        return Ok(Right(Flash::success(
            Redirect::to(uri!(show_venue(id))),
            "That Venue Has No Events At This Time...",
        )));
    }
    Ok(Left(page.render("venues/events", context! { venue, events })))
}
