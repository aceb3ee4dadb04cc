use rocket::FromForm;

/// The search box shared by the venue and event search pages.
#[derive(Debug, FromForm)]
pub(crate) struct SearchForm {
    pub(crate) searched: String,
}
