use email_address::EmailAddress;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Validation messages keyed by form field name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub(crate) struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub(crate) fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Collects field errors while normalizing the submitted values.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub(crate) fn required(&mut self, field: &'static str, value: &str, max_chars: usize) -> String {
        let value = value.trim();
        if value.is_empty() {
            self.errors.add(field, "This field is required.");
        } else {
            self.max_chars(field, value, max_chars);
        }
        value.to_owned()
    }

    pub(crate) fn optional(&mut self, field: &'static str, value: &str, max_chars: usize) -> String {
        let value = value.trim();
        self.max_chars(field, value, max_chars);
        value.to_owned()
    }

    pub(crate) fn email(&mut self, field: &'static str, value: &str) -> String {
        let value = self.required(field, value, MAX_EMAIL_CHARS);
        if !value.is_empty() && !EmailAddress::is_valid(&value) {
            self.errors.add(field, "Enter a valid email address.");
        }
        value
    }

    pub(crate) fn optional_email(&mut self, field: &'static str, value: &str) -> String {
        let value = self.optional(field, value, MAX_EMAIL_CHARS);
        if !value.is_empty() && !EmailAddress::is_valid(&value) {
            self.errors.add(field, "Enter a valid email address.");
        }
        value
    }

    pub(crate) fn optional_url(&mut self, field: &'static str, value: &str) -> String {
        let value = self.optional(field, value, MAX_URL_CHARS);
        if !value.is_empty() && !is_web_url(&value) {
            self.errors.add(field, "Enter a valid URL.");
        }
        value
    }

    pub(crate) fn check(&mut self, field: &'static str, condition: bool, message: &str) {
        if !condition {
            self.errors.add(field, message);
        }
    }

    pub(crate) fn error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    pub(crate) fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }

    /// The errors collected so far, for callers that bail out
    /// before they have a value to finish with.
    pub(crate) fn into_errors(self) -> FieldErrors {
        self.errors
    }

    fn max_chars(&mut self, field: &'static str, value: &str, max_chars: usize) {
        let chars = value.chars().count();
        if chars > max_chars {
            self.errors.add(
                field,
                format!("Ensure this value has at most {max_chars} characters (it has {chars})."),
            );
        }
    }
}

const MAX_EMAIL_CHARS: usize = 254;
const MAX_URL_CHARS: usize = 200;

fn is_web_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or_default()
}
