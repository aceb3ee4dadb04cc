use super::form::{VenueForm, VenueFormValues};
use super::image::{remove_image, store_image};
use super::{NewVenue, VenueId, VenueRepository as _};
use crate::database::Repository;
use crate::infra::config::AppConfig;
use crate::result::{HttpResult, OptionExt as _};
use crate::template::PageBuilder;
use crate::users::User;
use crate::validation::FieldErrors;
use anyhow::Result;
use either::{Either, Left, Right};
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::uri::Origin;
use rocket::http::Status;
use rocket::response::{Flash, Redirect};
use rocket::{get, post, uri, warn, State};
use rocket_dyn_templates::{context, Template};
use std::path::Path;

type FormResponse = Either<Template, Flash<Redirect>>;

#[get("/venues/new")]
pub(super) fn add_venue_page(_user: User, page: PageBuilder<'_>) -> Template {
    render_form(
        &page,
        uri!(add_venue),
        VenueFormValues::default(),
        &FieldErrors::default(),
    )
}

#[post("/venues/new", data = "<form>")]
pub(super) async fn add_venue(
    user: User,
    page: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
    config: &State<AppConfig>,
    mut form: Form<VenueForm<'_>>,
) -> HttpResult<FormResponse> {
    let details = match form.validate() {
        Ok(details) => details,
        Err(errors) => {
            let values = VenueFormValues::from(&*form);
            return Ok(Left(render_form(&page, uri!(add_venue), values, &errors)));
        }
    };

    let image = store_uploaded_image(form.image.as_mut(), &config.media_dir).await?;
    repository
        .add_venue(NewVenue {
            details,
            owner_id: user.id,
            image,
        })
        .await?;
    Ok(Right(Flash::success(
        Redirect::to(uri!("/")),
        "A venue was created successfully...",
    )))
}

#[get("/venues/<id>/edit")]
pub(super) async fn update_venue_page(
    id: VenueId,
    _user: User,
    page: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
) -> HttpResult<Template> {
    let venue = repository.venue_by_id(id).await?.or_not_found()?;
    Ok(render_form(
        &page,
        uri!(update_venue(id)),
        VenueFormValues::from(&venue),
        &FieldErrors::default(),
    ))
}

#[post("/venues/<id>/edit", data = "<form>")]
pub(super) async fn update_venue(
    id: VenueId,
    _user: User,
    page: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
    config: &State<AppConfig>,
    mut form: Form<VenueForm<'_>>,
) -> HttpResult<FormResponse> {
    let existing = repository.venue_by_id(id).await?.or_not_found()?;
    let details = match form.validate() {
        Ok(details) => details,
        Err(errors) => {
            let values = VenueFormValues::from(&*form);
            return Ok(Left(render_form(&page, uri!(update_venue(id)), values, &errors)));
        }
    };

    let image = store_uploaded_image(form.image.as_mut(), &config.media_dir).await?;
    let replaced = image.is_some();
    if !repository.update_venue(id, details, image).await? {
        return Err(Status::NotFound.into());
    }
    if let Some(old_image) = existing.image.filter(|_| replaced) {
        discard_image(&config.media_dir, &old_image).await;
    }
    Ok(Right(Flash::success(
        Redirect::to(uri!("/venues")),
        "The venue was updated successfully...",
    )))
}

#[post("/venues/<id>/delete")]
pub(super) async fn delete_venue(
    id: VenueId,
    _user: User,
    mut repository: Box<dyn Repository>,
    config: &State<AppConfig>,
) -> HttpResult<Flash<Redirect>> {
    let venue = repository.venue_by_id(id).await?.or_not_found()?;
    if !repository.delete_venue(id).await? {
        return Err(Status::NotFound.into());
    }
    if let Some(image) = venue.image {
        discard_image(&config.media_dir, &image).await;
    }
    Ok(Flash::success(
        Redirect::to(uri!("/venues")),
        "The venue was deleted successfully...",
    ))
}

/// Stores the image if one was actually uploaded.
async fn store_uploaded_image(
    file: Option<&mut TempFile<'_>>,
    media_dir: &Path,
) -> Result<Option<String>> {
    match file.filter(|file| file.len() > 0) {
        Some(file) => Ok(Some(store_image(file, media_dir).await?)),
        None => Ok(None),
    }
}

/// Removes an image that no venue refers to anymore.
/// The venue itself is already saved, so failing here only leaves a stray file.
async fn discard_image(media_dir: &Path, image: &str) {
    if let Err(e) = remove_image(media_dir, image).await {
        warn!("failed to remove venue image: {e:?}");
    }
}

fn render_form(
    page: &PageBuilder<'_>,
    action: Origin<'static>,
    form: VenueFormValues,
    errors: &FieldErrors,
) -> Template {
    page.render("venues/form", context! { action, form, errors })
}
