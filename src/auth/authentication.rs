use crate::database::Repository;
use crate::users::{User, UserId};
use anyhow::{anyhow, Error, Result};
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::request::{FromRequest, Outcome};
use rocket::{async_trait, Request};
use std::borrow::Cow;
use std::sync::Arc;

#[async_trait]
impl<'r> FromRequest<'r> for User {
    type Error = Arc<Error>;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        request
            .local_cache_async(async {
                let mut repository = match request.guard::<Box<dyn Repository>>().await {
                    Outcome::Success(repository) => repository,
                    Outcome::Error((status, e)) => {
                        return Outcome::Error((
                            status,
                            Arc::new(anyhow!("database unavailable: {e:?}")),
                        ))
                    }
                    Outcome::Forward(status) => return Outcome::Forward(status),
                };
                match fetch_user(request, repository.as_mut()).await {
                    Ok(Some(user)) => Outcome::Success(user),
                    Ok(None) => Outcome::Forward(Status::Unauthorized),
                    Err(e) => Outcome::Error((Status::InternalServerError, Arc::new(e))),
                }
            })
            .await
            .clone()
    }
}

async fn fetch_user(request: &Request<'_>, repository: &mut dyn Repository) -> Result<Option<User>> {
    match request.cookies().user_id()? {
        Some(user_id) => Ok(repository.user_by_id(user_id).await?),
        None => Ok(None),
    }
}

pub(crate) trait CookieJarExt {
    fn user_id(&self) -> Result<Option<UserId>>;

    fn set_user_id(&self, user_id: UserId);

    fn remove_user_id(&self);
}

impl CookieJarExt for CookieJar<'_> {
    fn user_id(&self) -> Result<Option<UserId>> {
        let cookie = self.get_private(USER_ID_COOKIE_NAME);
        Ok(cookie.map(|c| c.value().parse()).transpose()?)
    }

    fn set_user_id(&self, user_id: UserId) {
        self.add_private(user_id_cookie(user_id.to_string()));
    }

    fn remove_user_id(&self) {
        self.remove_private(user_id_cookie(""));
    }
}

fn user_id_cookie<'a>(value: impl Into<Cow<'a, str>>) -> impl Into<Cookie<'a>> {
    Cookie::build((USER_ID_COOKIE_NAME, value))
        .http_only(true)
        .secure(true)
        .permanent()
        .same_site(SameSite::Lax)
}

pub(crate) const USER_ID_COOKIE_NAME: &str = "user-id";
