use rocket::{routes, Route};

mod detail;
mod edit;
mod export;
mod form;
mod image;
mod list;
mod models;
pub(crate) use models::*;
mod repository;
pub(crate) use repository::*;
mod search;

pub(crate) fn routes() -> Vec<Route> {
    routes![
        list::list_venues,
        detail::show_venue,
        detail::venue_events,
        edit::add_venue_page,
        edit::add_venue,
        edit::update_venue_page,
        edit::update_venue,
        edit::delete_venue,
        search::search_venues_page,
        search::search_venues,
        export::venue_csv,
        export::venue_text,
        export::venue_pdf,
    ]
}
