use crate::users::{Role, User};
use anyhow::Error;
use rocket::http::Status;
use rocket::outcome::try_outcome;
use rocket::request::{FromRequest, Outcome};
use rocket::{async_trait, Request};
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

/// Operations that are restricted to certain roles.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Permission {
    /// Run the bulk approval workflow.
    ApproveEvents,
    /// Choose an arbitrary manager when creating or editing an event.
    AssignManagers,
}

impl Permission {
    fn granted_to(self, role: Role) -> bool {
        use Permission::*;
        match (self, role) {
            (ApproveEvents | AssignManagers, Role::Superuser) => true,
            (ApproveEvents | AssignManagers, Role::Member) => false,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::ApproveEvents => f.write_str("approve events"),
            Permission::AssignManagers => f.write_str("assign event managers"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Unauthorized {
    pub(crate) permission: Permission,
}

impl fmt::Display for Unauthorized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not authorized to {}", self.permission)
    }
}

impl std::error::Error for Unauthorized {}

/// The one place that decides whether a user may do something.
pub(crate) fn authorize(user: &User, permission: Permission) -> Result<(), Unauthorized> {
    if permission.granted_to(user.role) {
        Ok(())
    } else {
        Err(Unauthorized { permission })
    }
}

pub(crate) fn is_authorized(user: &User, permission: Permission) -> bool {
    authorize(user, permission).is_ok()
}

/// Request guard for a user holding the permission `P` stands for.
/// Anonymous requests are forwarded with 401, everyone else without
/// the permission with 403.
pub(crate) struct AuthorizedTo<P>(User, PhantomData<P>);

pub(crate) trait RequiredPermission {
    const PERMISSION: Permission;
}

#[async_trait]
impl<'r, P: RequiredPermission> FromRequest<'r> for AuthorizedTo<P> {
    type Error = Arc<Error>;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let user: User = try_outcome!(request.guard().await);
        match AuthorizedTo::new(user) {
            Some(result) => Outcome::Success(result),
            None => Outcome::Forward(Status::Forbidden),
        }
    }
}

impl<P: RequiredPermission> AuthorizedTo<P> {
    pub(crate) fn new(inner: User) -> Option<Self> {
        is_authorized(&inner, P::PERMISSION).then_some(Self(inner, PhantomData))
    }
}

impl<P> Deref for AuthorizedTo<P> {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub(crate) struct ApproveEvents;

impl RequiredPermission for ApproveEvents {
    const PERMISSION: Permission = Permission::ApproveEvents;
}
