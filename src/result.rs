use anyhow::Error;
use rocket::http::Status;
use rocket::response::Debug;
use rocket::Responder;

pub(crate) type HttpResult<T> = Result<T, HttpError>;

#[derive(Responder)]
pub(crate) enum HttpError {
    Error(Debug<Error>),
    Status(Status),
}

impl From<Error> for HttpError {
    fn from(value: Error) -> Self {
        HttpError::Error(Debug(value))
    }
}

impl From<Status> for HttpError {
    fn from(value: Status) -> Self {
        HttpError::Status(value)
    }
}

/// Turns a missing record into a 404.
pub(crate) trait OptionExt<T> {
    fn or_not_found(self) -> HttpResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self) -> HttpResult<T> {
        self.ok_or(HttpError::Status(Status::NotFound))
    }
}
