use super::{EventId, EventRepository};
use crate::auth::{authorize, Permission, Unauthorized};
use crate::users::User;
use rocket::{info, warn};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug)]
pub(crate) enum ApprovalError {
    Unauthorized(Unauthorized),
    Store(anyhow::Error),
}

impl fmt::Display for ApprovalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalError::Unauthorized(e) => e.fmt(f),
            ApprovalError::Store(e) => write!(f, "failed to update approvals: {e}"),
        }
    }
}

impl std::error::Error for ApprovalError {}

impl From<Unauthorized> for ApprovalError {
    fn from(value: Unauthorized) -> Self {
        ApprovalError::Unauthorized(value)
    }
}

impl From<anyhow::Error> for ApprovalError {
    fn from(value: anyhow::Error) -> Self {
        ApprovalError::Store(value)
    }
}

/// Makes `selected` the complete set of approved events.
///
/// This is a full replace over *all* events, not just the ones
/// the caller happened to display: any event missing from `selected`
/// ends up unapproved. A caller that only shows a page or a filtered
/// subset of events must still submit the approvals of every other event.
pub(crate) async fn apply_approvals<R>(
    repository: &mut R,
    actor: &User,
    selected: &BTreeSet<EventId>,
) -> Result<u64, ApprovalError>
where
    R: EventRepository + ?Sized,
{
    authorize(actor, Permission::ApproveEvents)?;

    let approved = repository.replace_approvals(selected).await?;
    if approved < selected.len() as u64 {
        warn!(
            "{} of the selected events no longer exist and were not approved",
            selected.len() as u64 - approved
        );
    }
    info!(
        "{} replaced the event approvals, {approved} events are approved",
        actor.username
    );
    Ok(approved)
}
