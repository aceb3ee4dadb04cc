use super::image::image_extension;
use super::{Venue, VenueDetails};
use crate::validation::{FieldErrors, Validator};
use rocket::fs::TempFile;
use rocket::FromForm;
use serde::Serialize;

#[derive(Debug, FromForm, Serialize)]
pub(crate) struct VenueForm<'r> {
    pub(crate) name: String,
    pub(crate) address: String,
    pub(crate) zip_code: String,
    pub(crate) phone: String,
    pub(crate) web: String,
    pub(crate) email_address: String,
    #[serde(skip)]
    pub(crate) image: Option<TempFile<'r>>,
}

impl VenueForm<'_> {
    pub(crate) fn validate(&self) -> Result<VenueDetails, FieldErrors> {
        let mut validator = Validator::default();
        let details = VenueDetails {
            name: validator.required("name", &self.name, 120),
            address: validator.required("address", &self.address, 300),
            zip_code: validator.required("zip_code", &self.zip_code, 15),
            phone: validator.optional("phone", &self.phone, 25),
            web: validator.optional_url("web", &self.web),
            email_address: validator.optional_email("email_address", &self.email_address),
        };
        if let Some(image) = self.uploaded_image() {
            validator.check(
                "image",
                image_extension(image.content_type()).is_some(),
                "Upload a valid image. Accepted formats are PNG, JPEG, GIF and WebP.",
            );
        }
        validator.finish(details)
    }

    /// The uploaded image, ignoring empty file inputs.
    pub(crate) fn uploaded_image(&self) -> Option<&TempFile<'_>> {
        self.image.as_ref().filter(|file| file.len() > 0)
    }
}

/// Values shown in the venue form, either from an existing venue
/// or echoed back from a rejected submission.
#[derive(Debug, Default, Serialize)]
pub(crate) struct VenueFormValues {
    pub(crate) name: String,
    pub(crate) address: String,
    pub(crate) zip_code: String,
    pub(crate) phone: String,
    pub(crate) web: String,
    pub(crate) email_address: String,
}

impl From<&Venue> for VenueFormValues {
    fn from(venue: &Venue) -> Self {
        Self {
            name: venue.name.clone(),
            address: venue.address.clone(),
            zip_code: venue.zip_code.clone(),
            phone: venue.phone.clone(),
            web: venue.web.clone(),
            email_address: venue.email_address.clone(),
        }
    }
}

impl From<&VenueForm<'_>> for VenueFormValues {
    fn from(form: &VenueForm<'_>) -> Self {
        Self {
            name: form.name.clone(),
            address: form.address.clone(),
            zip_code: form.zip_code.clone(),
            phone: form.phone.clone(),
            web: form.web.clone(),
            email_address: form.email_address.clone(),
        }
    }
}
