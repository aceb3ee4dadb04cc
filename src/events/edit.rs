use super::form::{resolve_manager, Editing, EventChoices, EventForm, EventFormValues};
use super::{EventId, EventRepository as _, NewEvent};
use crate::auth::{is_authorized, Permission};
use crate::database::Repository;
use crate::result::{HttpResult, OptionExt as _};
use crate::template::PageBuilder;
use crate::users::{User, UserRepository as _};
use crate::validation::FieldErrors;
use crate::venues::VenueRepository as _;
use anyhow::Result;
use either::{Either, Left, Right};
use rocket::form::Form;
use rocket::http::uri::Origin;
use rocket::http::Status;
use rocket::response::{Flash, Redirect};
use rocket::{get, post, uri};
use rocket_dyn_templates::{context, Template};

type FormResponse = Either<Template, Flash<Redirect>>;

#[get("/events/new")]
pub(super) async fn add_event_page(
    user: User,
    page: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
) -> HttpResult<Template> {
    let choices = event_choices(repository.as_mut()).await?;
    Ok(render_form(
        &page,
        &user,
        uri!(add_event),
        EventFormValues::default(),
        &FieldErrors::default(),
        &choices,
    ))
}

#[post("/events/new", data = "<form>")]
pub(super) async fn add_event(
    user: User,
    page: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
    form: Form<EventForm>,
) -> HttpResult<FormResponse> {
    let choices = event_choices(repository.as_mut()).await?;
    let event = match form.validate(&choices) {
        Ok(event) => event,
        Err(errors) => {
            let values = EventFormValues::from(&*form);
            return Ok(Left(render_form(&page, &user, uri!(add_event), values, &errors, &choices)));
        }
    };

    repository
        .add_event(NewEvent {
            manager_id: resolve_manager(&user, event.manager_id, Editing::NewEvent),
            details: event.details,
            attendees: event.attendees,
        })
        .await?;
    Ok(Right(Flash::success(
        Redirect::to(uri!("/")),
        "An Event was created successfully...",
    )))
}

#[get("/events/<id>/edit")]
pub(super) async fn update_event_page(
    id: EventId,
    user: User,
    page: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
) -> HttpResult<Template> {
    let event = repository.event_by_id(id).await?.or_not_found()?;
    let attendees = repository.attendees(id).await?;
    let choices = event_choices(repository.as_mut()).await?;
    Ok(render_form(
        &page,
        &user,
        uri!(update_event(id)),
        EventFormValues::from_event(&event, &attendees)?,
        &FieldErrors::default(),
        &choices,
    ))
}

#[post("/events/<id>/edit", data = "<form>")]
pub(super) async fn update_event(
    id: EventId,
    user: User,
    page: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
    form: Form<EventForm>,
) -> HttpResult<FormResponse> {
    let existing = repository.event_by_id(id).await?.or_not_found()?;
    let choices = event_choices(repository.as_mut()).await?;
    let event = match form.validate(&choices) {
        Ok(event) => event,
        Err(errors) => {
            let values = EventFormValues::from(&*form);
            return Ok(Left(render_form(
                &page,
                &user,
                uri!(update_event(id)),
                values,
                &errors,
                &choices,
            )));
        }
    };

    let editing = Editing::ExistingEvent {
        manager_id: existing.manager_id,
    };
    let manager_id = resolve_manager(&user, event.manager_id, editing);
    if !repository
        .update_event(id, event.details, manager_id, &event.attendees)
        .await?
    {
        return Err(Status::NotFound.into());
    }
    Ok(Right(Flash::success(
        Redirect::to(uri!("/events")),
        "The event was updated successfully...",
    )))
}

#[post("/events/<id>/delete")]
pub(super) async fn delete_event(
    id: EventId,
    _user: User,
    mut repository: Box<dyn Repository>,
) -> HttpResult<Flash<Redirect>> {
    if !repository.delete_event(id).await? {
        return Err(Status::NotFound.into());
    }
    Ok(Flash::success(
        Redirect::to(uri!("/events")),
        "The event was deleted successfully...",
    ))
}

async fn event_choices(repository: &mut dyn Repository) -> Result<EventChoices> {
    Ok(EventChoices {
        venues: repository.all_venues().await?,
        users: repository.all_users().await?,
    })
}

fn render_form(
    page: &PageBuilder<'_>,
    user: &User,
    action: Origin<'static>,
    form: EventFormValues,
    errors: &FieldErrors,
    choices: &EventChoices,
) -> Template {
    page.render(
        "events/form",
        context! {
            action,
            form,
            errors,
            choices,
            can_assign_managers: is_authorized(user, Permission::AssignManagers),
        },
    )
}
