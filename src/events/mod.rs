use rocket::{routes, Route};

mod approval;
pub(crate) use approval::*;
pub(crate) mod calendar;
mod form;
mod models;
pub(crate) use models::*;
mod repository;
pub(crate) use repository::*;
mod view;
pub(crate) use view::EventView;

mod admin;
mod detail;
mod edit;
mod home;
mod list;
mod search;

pub(crate) fn routes() -> Vec<Route> {
    routes![
        home::home_page,
        home::month_page,
        list::list_events,
        list::my_events,
        detail::show_event,
        edit::add_event_page,
        edit::add_event,
        edit::update_event_page,
        edit::update_event,
        edit::delete_event,
        search::search_events_page,
        search::search_events,
        admin::approval_page,
        admin::approve_events,
    ]
}
