use super::{EventRepository as _, EventView};
use crate::clock::{Clock as _, SharedClock};
use crate::database::Repository;
use crate::result::HttpResult;
use crate::search::SearchForm;
use crate::template::{Notice, PageBuilder};
use crate::users::User;
use rocket::form::Form;
use rocket::{get, post, State};
use rocket_dyn_templates::{context, Template};

#[get("/events/search")]
pub(super) fn search_events_page(_user: User, page: PageBuilder<'_>) -> Template {
    page.render("events/search", context! {})
}

#[post("/events/search", data = "<form>")]
pub(super) async fn search_events(
    _user: User,
    page: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
    clock: &State<SharedClock>,
    form: Form<SearchForm>,
) -> HttpResult<Template> {
    let searched = form.into_inner().searched;
    let events = EventView::all(repository.search_events(&searched).await?, clock.today())?;
    let page = if events.is_empty() {
        page.notice(Notice::info("No search results..."))
    } else {
        page
    };
    Ok(page.render("events/search", context! { searched, events }))
}
