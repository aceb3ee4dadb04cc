use super::VenueRepository as _;
use crate::database::Repository;
use crate::infra::config::AppConfig;
use crate::pagination::{Page, Paginator};
use crate::result::HttpResult;
use crate::template::PageBuilder;
use crate::users::User;
use rocket::{get, State};
use rocket_dyn_templates::{context, Template};

#[get("/venues?<page>")]
pub(super) async fn list_venues(
    _user: User,
    page: Option<i64>,
    builder: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
    config: &State<AppConfig>,
) -> HttpResult<Template> {
    let paginator = Paginator::new(config.venues_per_page);
    let window = paginator.window(page, repository.count_venues().await?);
    let venues = repository.venues_page(&window).await?;
    let pages: Vec<u64> = (1..=window.num_pages).collect();
    Ok(builder.render(
        "venues/list",
        context! { venues: Page::new(venues, window), pages },
    ))
}
