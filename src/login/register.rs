use crate::auth::{hash_password, CookieJarExt as _};
use crate::database::{is_unique_violation, Repository};
use crate::result::HttpResult;
use crate::template::{Notice, PageBuilder};
use crate::users::{NewUser, UserRepository as _};
use crate::validation::{FieldErrors, Validator};
use either::{Either, Left, Right};
use rocket::form::Form;
use rocket::http::CookieJar;
use rocket::response::{Flash, Redirect};
use rocket::{get, info, post, uri, FromForm};
use rocket_dyn_templates::{context, Template};
use serde::Serialize;

const MIN_PASSWORD_CHARS: usize = 8;

#[get("/register")]
pub(super) fn register_page(page: PageBuilder<'_>) -> Template {
    page.render(
        "register",
        context! { form: context! {}, errors: FieldErrors::default() },
    )
}

#[post("/register", data = "<form>")]
pub(super) async fn register(
    page: PageBuilder<'_>,
    cookies: &CookieJar<'_>,
    mut repository: Box<dyn Repository>,
    form: Form<RegisterForm>,
) -> HttpResult<Either<Template, Flash<Redirect>>> {
    let mut registration = form.validate();
    if let Ok(valid) = &registration {
        if repository.user_by_username(&valid.username).await?.is_some() {
            registration = Err(username_taken());
        }
    }
    let registration = match registration {
        Ok(registration) => registration,
        Err(errors) => return Ok(Left(render_rejected(page, &form, errors))),
    };

    let new_user = NewUser {
        username: registration.username,
        first_name: registration.first_name,
        last_name: registration.last_name,
        email_address: registration.email_address,
        password_hash: hash_password(registration.password).await?,
    };
    let user = match repository.add_user(new_user).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            return Ok(Left(render_rejected(page, &form, username_taken())))
        }
        Err(e) => return Err(e.into()),
    };
    info!("registered {} as {:?}", user.username, user.role);
    cookies.set_user_id(user.id);
    Ok(Right(Flash::success(
        Redirect::to(uri!("/")),
        "You have created an account successfully...",
    )))
}

fn render_rejected(page: PageBuilder<'_>, form: &RegisterForm, errors: FieldErrors) -> Template {
    page.notice(Notice::error(
        "There is an error in signing up. Please try again...",
    ))
    .render("register", context! { form, errors })
}

fn username_taken() -> FieldErrors {
    let mut errors = FieldErrors::default();
    errors.add("username", "A user with that username already exists.");
    errors
}

#[derive(Debug, FromForm, Serialize)]
pub(super) struct RegisterForm {
    username: String,
    first_name: String,
    last_name: String,
    email_address: String,
    #[serde(skip)]
    password1: String,
    #[serde(skip)]
    password2: String,
}

#[derive(Debug, PartialEq, Eq)]
pub(super) struct Registration {
    username: String,
    first_name: String,
    last_name: String,
    email_address: String,
    password: String,
}

impl RegisterForm {
    fn validate(&self) -> Result<Registration, FieldErrors> {
        let mut validator = Validator::default();
        let username = validator.required("username", &self.username, 150);
        validator.check(
            "username",
            username.chars().all(is_username_char),
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
        let first_name = validator.optional("first_name", &self.first_name, 150);
        let last_name = validator.optional("last_name", &self.last_name, 150);
        let email_address = validator.email("email_address", &self.email_address);

        if self.password1.is_empty() {
            validator.error("password1", "This field is required.");
        } else if self.password1 != self.password2 {
            validator.error("password2", "The two password fields didn't match.");
        } else {
            validator.check(
                "password1",
                self.password1.chars().count() >= MIN_PASSWORD_CHARS,
                "This password is too short. It must contain at least 8 characters.",
            );
            validator.check(
                "password1",
                !self.password1.chars().all(|c| c.is_ascii_digit()),
                "This password is entirely numeric.",
            );
        }

        validator.finish(Registration {
            username,
            first_name,
            last_name,
            email_address,
            password: self.password1.clone(),
        })
    }
}

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}
