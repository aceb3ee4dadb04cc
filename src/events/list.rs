use super::{EventRepository as _, EventView};
use crate::clock::{Clock as _, SharedClock};
use crate::database::Repository;
use crate::result::HttpResult;
use crate::template::PageBuilder;
use crate::users::User;
use rocket::{get, State};
use rocket_dyn_templates::{context, Template};

#[get("/events")]
pub(super) async fn list_events(
    _user: User,
    page: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
    clock: &State<SharedClock>,
) -> HttpResult<Template> {
    let events = EventView::all(repository.all_events().await?, clock.today())?;
    Ok(page.render("events/list", context! { events }))
}

#[get("/events/mine")]
pub(super) async fn my_events(
    user: User,
    page: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
    clock: &State<SharedClock>,
) -> HttpResult<Template> {
    let events = EventView::all(repository.events_by_manager(user.id).await?, clock.today())?;
    Ok(page.render("events/mine", context! { events }))
}
