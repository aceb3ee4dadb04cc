use crate::auth::{is_authorized, Permission};
use crate::users::User;
use anyhow::Error;
use rocket::http::uri::Origin;
use rocket::request::{FlashMessage, FromRequest, Outcome};
use rocket::{async_trait, Request};
use rocket_dyn_templates::{context, Template};
use serde::Serialize;
use std::borrow::Cow;

/// Renders a page together with what every page shows:
/// the signed in user, the current URI and a pending notice.
pub(crate) struct PageBuilder<'r> {
    user: Option<User>,
    uri: &'r Origin<'r>,
    notice: Option<Notice>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Notice {
    kind: String,
    message: String,
}

impl Notice {
    pub(crate) fn info(message: impl Into<String>) -> Self {
        Notice {
            kind: "info".to_owned(),
            message: message.into(),
        }
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        Notice {
            kind: "error".to_owned(),
            message: message.into(),
        }
    }
}

impl From<FlashMessage<'_>> for Notice {
    fn from(flash: FlashMessage<'_>) -> Self {
        Notice {
            kind: flash.kind().to_owned(),
            message: flash.message().to_owned(),
        }
    }
}

impl<'r> PageBuilder<'r> {
    /// Shows `notice` instead of any flashed message.
    pub(crate) fn notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }

    pub(crate) fn render(
        &self,
        name: impl Into<Cow<'static, str>>,
        context: impl Serialize,
    ) -> Template {
        let can_approve_events = self
            .user
            .as_ref()
            .is_some_and(|user| is_authorized(user, Permission::ApproveEvents));
        Template::render(
            name,
            context! {
                user: &self.user,
                uri: self.uri,
                notice: &self.notice,
                can_approve_events,
                page: context,
            },
        )
    }
}

#[async_trait]
impl<'r> FromRequest<'r> for PageBuilder<'r> {
    type Error = Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let user: Option<User> = request.guard().await.succeeded().flatten();
        let flash: Option<FlashMessage<'_>> = request.guard().await.succeeded().flatten();
        Outcome::Success(PageBuilder {
            user,
            uri: request.uri(),
            notice: flash.map(Notice::from),
        })
    }
}
