use crate::id_newtype;
use crate::users::UserId;
use serde::Serialize;

id_newtype! {
    pub(crate) struct VenueId;
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub(crate) struct Venue {
    pub(crate) id: VenueId,
    pub(crate) name: String,
    pub(crate) address: String,
    pub(crate) zip_code: String,
    pub(crate) phone: String,
    pub(crate) web: String,
    pub(crate) email_address: String,
    pub(crate) owner_id: UserId,
    /// Path of the uploaded image, relative to the media directory.
    pub(crate) image: Option<String>,
}

impl Venue {
    /// The fields every export format emits, in export order.
    pub(crate) fn export_fields(&self) -> [&str; 6] {
        [
            &self.name,
            &self.address,
            &self.zip_code,
            &self.phone,
            &self.web,
            &self.email_address,
        ]
    }
}

/// Validated, user-editable venue fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VenueDetails {
    pub(crate) name: String,
    pub(crate) address: String,
    pub(crate) zip_code: String,
    pub(crate) phone: String,
    pub(crate) web: String,
    pub(crate) email_address: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewVenue {
    pub(crate) details: VenueDetails,
    pub(crate) owner_id: UserId,
    pub(crate) image: Option<String>,
}
