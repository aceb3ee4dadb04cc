use super::VenueRepository as _;
use crate::database::Repository;
use crate::result::HttpResult;
use crate::search::SearchForm;
use crate::template::{Notice, PageBuilder};
use crate::users::User;
use rocket::form::Form;
use rocket::{get, post};
use rocket_dyn_templates::{context, Template};

#[get("/venues/search")]
pub(super) fn search_venues_page(_user: User, page: PageBuilder<'_>) -> Template {
    page.render("venues/search", context! {})
}

#[post("/venues/search", data = "<form>")]
pub(super) async fn search_venues(
    _user: User,
    page: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
    form: Form<SearchForm>,
) -> HttpResult<Template> {
    let searched = form.into_inner().searched;
    let venues = repository.search_venues(&searched).await?;
    let page = if venues.is_empty() {
        page.notice(Notice::info("No venues match your search..."))
    } else {
        page
    };
    Ok(page.render("venues/search", context! { searched, venues }))
}
