use super::{apply_approvals, ApprovalError, EventId, EventRepository as _, EventView};
use crate::auth::{ApproveEvents, AuthorizedTo};
use crate::clock::{Clock as _, SharedClock};
use crate::database::Repository;
use crate::error_pages::NOT_AUTHORIZED_MESSAGE;
use crate::result::HttpResult;
use crate::template::PageBuilder;
use crate::users::{User, UserRepository as _};
use crate::venues::VenueRepository as _;
use rocket::form::Form;
use rocket::response::{Flash, Redirect};
use rocket::{get, post, uri, FromForm, State};
use rocket_dyn_templates::{context, Template};
use std::collections::BTreeSet;

/// Lists every event with its approval checkbox.
/// Submitting the page replaces the approval state of all events,
/// so this list must never be paginated or filtered.
#[get("/admin/approval")]
pub(super) async fn approval_page(
    _user: AuthorizedTo<ApproveEvents>,
    page: PageBuilder<'_>,
    mut repository: Box<dyn Repository>,
    clock: &State<SharedClock>,
) -> HttpResult<Template> {
    let events = EventView::all(repository.all_events().await?, clock.today())?;
    let venues = repository.all_venues().await?;
    Ok(page.render(
        "events/approval",
        context! {
            event_count: repository.count_events().await?,
            venue_count: repository.count_venues().await?,
            user_count: repository.count_users().await?,
            events,
            venues,
        },
    ))
}

#[derive(Debug, FromForm)]
pub(super) struct ApprovalForm {
    #[field(default = Vec::new())]
    approved: Vec<EventId>,
}

#[post("/admin/approval", data = "<form>")]
pub(super) async fn approve_events(
    user: User,
    mut repository: Box<dyn Repository>,
    form: Form<ApprovalForm>,
) -> HttpResult<Flash<Redirect>> {
    let selected: BTreeSet<_> = form.into_inner().approved.into_iter().collect();
    match apply_approvals(repository.as_mut(), &user, &selected).await {
        Ok(_) => Ok(Flash::success(
            Redirect::to(uri!("/events")),
            "Event List Approval Has Been Updated!",
        )),
        Err(ApprovalError::Unauthorized(_)) => Ok(Flash::error(
            Redirect::to(uri!("/")),
            NOT_AUTHORIZED_MESSAGE,
        )),
        Err(ApprovalError::Store(e)) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use crate::events::EventRepository as _;
    use crate::testing::{add_event, add_user_with_password, client, client_repository, login_cookie};
    use rocket::http::{ContentType, Status};

    #[rocket::async_test]
    async fn members_are_sent_home_with_a_notice() {
        let client = client().await;
        let mut repository = client_repository(&client).await;
        add_user_with_password(&mut repository, "ada", "analytical").await;
        let member = add_user_with_password(&mut repository, "grace", "compilers").await;

        let response = client
            .get("/admin/approval")
            .private_cookie(login_cookie(&member))
            .dispatch()
            .await;

        assert_eq!(Status::SeeOther, response.status());
        assert_eq!(Some("/"), response.headers().get_one("Location"));
        let flash = response.cookies().get("_flash").map(|c| c.value().to_owned());
        assert!(flash.is_some_and(|value| value.contains("authorized")));
    }

    #[rocket::async_test]
    async fn superuser_sees_every_event() {
        let client = client().await;
        let mut repository = client_repository(&client).await;
        let superuser = add_user_with_password(&mut repository, "ada", "analytical").await;
        add_event(&mut repository, "Concert", None, "2026-10-24 20:00").await;
        add_event(&mut repository, "Lecture", None, "2025-01-02 10:00").await;

        let response = client
            .get("/admin/approval")
            .private_cookie(login_cookie(&superuser))
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        let body = response.into_string().await.unwrap();
        assert!(body.contains("Concert"));
        assert!(body.contains("Lecture"));
    }

    #[rocket::async_test]
    async fn submitting_replaces_the_approved_set() {
        let client = client().await;
        let mut repository = client_repository(&client).await;
        let superuser = add_user_with_password(&mut repository, "ada", "analytical").await;
        let concert = add_event(&mut repository, "Concert", None, "2026-10-24 20:00").await;
        let lecture = add_event(&mut repository, "Lecture", None, "2025-01-02 10:00").await;

        let response = client
            .post("/admin/approval")
            .private_cookie(login_cookie(&superuser))
            .header(ContentType::Form)
            .body(format!("approved={}", concert.id))
            .dispatch()
            .await;

        assert_eq!(Status::SeeOther, response.status());
        assert_eq!(Some("/events"), response.headers().get_one("Location"));
        assert!(repository.event_by_id(concert.id).await.unwrap().unwrap().approved);
        assert!(!repository.event_by_id(lecture.id).await.unwrap().unwrap().approved);
    }

    #[rocket::async_test]
    async fn members_cannot_submit_approvals() {
        let client = client().await;
        let mut repository = client_repository(&client).await;
        add_user_with_password(&mut repository, "ada", "analytical").await;
        let member = add_user_with_password(&mut repository, "grace", "compilers").await;
        let concert = add_event(&mut repository, "Concert", None, "2026-10-24 20:00").await;

        let response = client
            .post("/admin/approval")
            .private_cookie(login_cookie(&member))
            .header(ContentType::Form)
            .body(format!("approved={}", concert.id))
            .dispatch()
            .await;

        assert_eq!(Status::SeeOther, response.status());
        assert_eq!(Some("/"), response.headers().get_one("Location"));
        assert!(!repository.event_by_id(concert.id).await.unwrap().unwrap().approved);
    }
}
