use super::calendar::{CalendarError, MonthName, MonthView};
use super::{EventRepository as _, EventView};
use crate::clock::{Clock as _, SharedClock};
use crate::database::Repository;
use crate::result::HttpResult;
use crate::template::PageBuilder;
use rocket::http::Status;
use rocket::{get, State};
use rocket_dyn_templates::{context, Template};
use time::format_description::FormatItem;
use time::macros::format_description;

const TIME_FORMAT: &[FormatItem<'_>] = format_description!("[hour repr:12]:[minute] [period]");

#[get("/")]
pub(super) async fn home_page(
    page: PageBuilder<'_>,
    repository: Box<dyn Repository>,
    clock: &State<SharedClock>,
) -> HttpResult<Template> {
    let month = MonthView::containing(clock.today());
    month_calendar(page, repository, clock, month).await
}

/// Tried before every other two-segment route. A non-numeric year
/// forwards, so the login and permission forwards of the static routes
/// are the last ones the router sees.
#[get("/<year>/<month>", rank = -20)]
pub(super) async fn month_page(
    year: i32,
    month: Result<MonthName, CalendarError>,
    page: PageBuilder<'_>,
    repository: Box<dyn Repository>,
    clock: &State<SharedClock>,
) -> HttpResult<Template> {
    let month = month
        .and_then(|month| MonthView::new(year, month))
        .map_err(|_| Status::NotFound)?;
    month_calendar(page, repository, clock, month).await
}

async fn month_calendar(
    page: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
    clock: &State<SharedClock>,
    month: MonthView,
) -> HttpResult<Template> {
    let now = clock.now();
    let (start, end) = month.range();
    let events = EventView::all(repository.events_between(start, end).await?, now.date())?;
    Ok(page.render(
        "home",
        context! {
            calendar: month.grid(),
            events,
            year: month.year(),
            month: month.name(),
            month_number: month.number(),
            current_year: now.year(),
            time: now.format(TIME_FORMAT).map_err(anyhow::Error::from)?,
        },
    ))
}
