use crate::template::PageBuilder;
use rocket::request::FromRequest as _;
use rocket::response::{Flash, Redirect};
use rocket::{catch, catchers, uri, Catcher, Request};
use rocket_dyn_templates::{context, Template};

pub(crate) const NOT_AUTHORIZED_MESSAGE: &str = "You aren't authorized to view this page!";

pub(crate) fn catchers() -> Vec<Catcher> {
    catchers![not_found, forbidden]
}

#[catch(404)]
async fn not_found(request: &Request<'_>) -> Option<Template> {
    let page = PageBuilder::from_request(request).await.succeeded()?;
    Some(page.render("errors/404", context! {}))
}

#[catch(403)]
fn forbidden() -> Flash<Redirect> {
    Flash::error(Redirect::to(uri!("/")), NOT_AUTHORIZED_MESSAGE)
}
