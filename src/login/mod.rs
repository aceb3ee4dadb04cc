use crate::auth::{verify_password, CookieJarExt as _};
use crate::database::Repository;
use crate::result::HttpResult;
use crate::template::{Notice, PageBuilder};
use crate::users::{User, UserRepository as _};
use anyhow::Result;
use either::{Either, Left, Right};
use rocket::form::Form;
use rocket::http::CookieJar;
use rocket::response::{self, Flash, Redirect, Responder};
use rocket::{catch, catchers, get, post, routes, uri, Catcher, FromForm, Request, Response, Route};
use rocket_dyn_templates::{context, Template};

mod redirect;
pub(crate) use redirect::*;
mod register;

pub(crate) fn routes() -> Vec<Route> {
    routes![
        login_redirect,
        login_page,
        login,
        logout,
        register::register_page,
        register::register,
    ]
}

pub(crate) fn catchers() -> Vec<Catcher> {
    catchers![redirect_to_login]
}

#[get("/login?<redirect>", rank = 10)]
fn login_redirect(_user: User, redirect: Option<RedirectUri>) -> Redirect {
    Redirect::to(redirect.or_root())
}

#[get("/login?<redirect>", rank = 20)]
fn login_page(redirect: Option<RedirectUri>, page: PageBuilder<'_>) -> Template {
    page.render(
        "login",
        context! { username: "", has_redirect: redirect.is_some() },
    )
}

#[derive(Debug, FromForm)]
struct LoginData<'r> {
    username: &'r str,
    password: &'r str,
}

#[post("/login?<redirect>", data = "<form>")]
async fn login(
    page: PageBuilder<'_>,
    cookies: &CookieJar<'_>,
    mut repository: Box<dyn Repository>,
    redirect: Option<RedirectUri>,
    form: Form<LoginData<'_>>,
) -> HttpResult<Either<Template, Flash<Redirect>>> {
    match authenticate(repository.as_mut(), form.username, form.password).await? {
        Some(user) => {
            cookies.set_user_id(user.id);
            Ok(Right(Flash::success(
                Redirect::to(redirect.or_root()),
                "You have logged in successfully...",
            )))
        }
        None => Ok(Left(
            page.notice(Notice::error(
                "There is an error in logging in. Please try again...",
            ))
            .render(
                "login",
                context! { username: form.username, has_redirect: redirect.is_some() },
            ),
        )),
    }
}

/// The user with this username, if the password matches.
async fn authenticate(
    repository: &mut dyn Repository,
    username: &str,
    password: &str,
) -> Result<Option<User>> {
    let Some(user) = repository.user_by_username(username.trim()).await? else {
        return Ok(None);
    };
    let matches = verify_password(password.to_owned(), user.password_hash.clone()).await?;
    Ok(matches.then_some(user))
}

#[post("/logout")]
fn logout(cookies: &CookieJar<'_>) -> Logout {
    cookies.remove_user_id();
    Logout(Flash::success(
        Redirect::to(uri!("/")),
        "You have logged out successfully...",
    ))
}

pub(crate) struct Logout(Flash<Redirect>);

impl<'r> Responder<'r, 'static> for Logout {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        Response::build_from(self.0.respond_to(request)?)
            .raw_header("Clear-Site-Data", "\"cache\"")
            .ok()
    }
}

#[catch(401)]
fn redirect_to_login(request: &Request<'_>) -> Redirect {
    Redirect::to(uri!(login_page(redirect = Some(request.uri()))))
}

#[cfg(test)]
mod tests {
    use crate::testing::{
        add_event, add_user_with_password, add_venue, client, client_repository, login_cookie,
    };
    use rocket::http::{ContentType, Status};
    use rocket::local::asynchronous::{Client, LocalResponse};

    fn location<'a>(response: &'a LocalResponse<'_>) -> &'a str {
        response.headers().get_one("Location").unwrap_or_default()
    }

    async fn assert_redirects_to_login(client: &Client, uri: &str) {
        let response = client.get(uri).dispatch().await;
        assert_eq!(Status::SeeOther, response.status(), "{uri}");
        assert!(location(&response).starts_with("/login?redirect="), "{uri}");
    }

    #[rocket::async_test]
    async fn anonymous_visitors_are_sent_to_login() {
        let client = client().await;
        let mut repository = client_repository(&client).await;
        let owner = add_user_with_password(&mut repository, "ada", "analytical").await;
        let venue = add_venue(&mut repository, owner.id, "Town Hall").await;

        for uri in [
            "/events",
            "/events/new",
            "/events/mine",
            "/events/search",
            "/venues",
            "/venues/new",
            "/venues/search",
            "/admin/approval",
            "/venues/export/csv",
        ] {
            assert_redirects_to_login(&client, uri).await;
        }
        assert_redirects_to_login(&client, &format!("/venues/{}", venue.id)).await;
    }

    #[rocket::async_test]
    async fn public_pages_need_no_login() {
        let client = client().await;
        let mut repository = client_repository(&client).await;
        let event = add_event(&mut repository, "Concert", None, "2026-10-24 20:00").await;

        for uri in ["/".to_owned(), "/login".to_owned(), format!("/events/{}", event.id)] {
            let response = client.get(uri.as_str()).dispatch().await;
            assert_eq!(Status::Ok, response.status(), "{uri}");
        }
    }

    #[rocket::async_test]
    async fn signs_in_and_returns_to_the_requested_page() {
        let client = client().await;
        let mut repository = client_repository(&client).await;
        add_user_with_password(&mut repository, "ada", "analytical").await;

        let response = client
            .post("/login?redirect=/events/mine")
            .header(ContentType::Form)
            .body("username=ada&password=analytical")
            .dispatch()
            .await;
        assert_eq!(Status::SeeOther, response.status());
        assert_eq!("/events/mine", location(&response));

        let response = client.get("/events/mine").dispatch().await;
        assert_eq!(Status::Ok, response.status());
    }

    #[rocket::async_test]
    async fn wrong_password_shows_the_form_again() {
        let client = client().await;
        let mut repository = client_repository(&client).await;
        add_user_with_password(&mut repository, "ada", "analytical").await;

        let response = client
            .post("/login")
            .header(ContentType::Form)
            .body("username=ada&password=wrong")
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let body = response.into_string().await.unwrap();
        assert!(body.contains("There is an error in logging in."));
    }

    #[rocket::async_test]
    async fn signed_in_users_skip_the_login_page() {
        let client = client().await;
        let mut repository = client_repository(&client).await;
        let ada = add_user_with_password(&mut repository, "ada", "analytical").await;

        let response = client
            .get("/login?redirect=/venues")
            .private_cookie(login_cookie(&ada))
            .dispatch()
            .await;
        assert_eq!(Status::SeeOther, response.status());
        assert_eq!("/venues", location(&response));
    }
}
