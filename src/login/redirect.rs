use rocket::form::{self, FromFormField, ValueField};
use rocket::http::impl_from_uri_param_identity;
use rocket::http::uri::fmt::{Formatter, FromUriParam, Query, UriDisplay};
use rocket::http::uri::{Origin, Reference};
use rocket::uri;
use std::fmt;

/// A same-site location to return to after signing in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RedirectUri(Origin<'static>);

impl RedirectUri {
    /// Accepts absolute paths on this site only.
    /// `//host/...` would be followed by browsers as a
    /// protocol-relative link to another site.
    pub(crate) fn parse(value: &str) -> Option<Self> {
        if value.starts_with("//") || value.starts_with("/\\") {
            return None;
        }
        Origin::parse_owned(value.to_owned()).ok().map(RedirectUri)
    }
}

pub(crate) trait RedirectUriExt {
    fn or_root(self) -> RedirectUri;
}

impl RedirectUriExt for Option<RedirectUri> {
    fn or_root(self) -> RedirectUri {
        self.unwrap_or(RedirectUri(uri!("/")))
    }
}

impl From<RedirectUri> for Reference<'static> {
    fn from(value: RedirectUri) -> Self {
        value.0.into()
    }
}

impl_from_uri_param_identity!([Query] RedirectUri);

impl UriDisplay<Query> for RedirectUri {
    fn fmt(&self, f: &mut Formatter<'_, Query>) -> fmt::Result {
        f.write_value(self.0.to_string())
    }
}

impl<'a> FromUriParam<Query, &'a Origin<'a>> for RedirectUri {
    type Target = String;

    fn from_uri_param(param: &'a Origin<'a>) -> Self::Target {
        param.to_string()
    }
}

#[rocket::async_trait]
impl<'r> FromFormField<'r> for RedirectUri {
    fn from_value(field: ValueField<'r>) -> form::Result<'r, Self> {
        RedirectUri::parse(field.value)
            .ok_or_else(|| form::Error::validation("invalid redirect URI").into())
    }
}
