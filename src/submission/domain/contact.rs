//! Normalised and validated contact-form content.

use super::{
    CONSENT_FIELD, FULL_NAME_FIELD, FormFields, FormValue, MESSAGE_FIELD, RESPONSE_FIELD,
    SUBJECT_FIELD, SubmissionValidationError,
};
use serde::Serialize;

/// Consent tokens accepted as "given". Matching is case-sensitive.
const TRUTHY_CONSENT_TOKENS: [&str; 3] = ["on", "true", "yes"];

/// Ordered list of response preference tags.
///
/// Always a list, regardless of whether the client sent zero, one, or many
/// values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResponsePrefs(Vec<String>);

impl ResponsePrefs {
    /// Normalises the raw `response` field.
    ///
    /// Absent or an empty scalar yields an empty list, a scalar yields a
    /// singleton, and a list is kept as-is with its order preserved.
    #[must_use]
    pub fn from_field(value: Option<&FormValue>) -> Self {
        match value {
            None => Self::default(),
            Some(FormValue::Single(tag)) if tag.is_empty() => Self::default(),
            Some(FormValue::Single(tag)) => Self(vec![tag.clone()]),
            Some(FormValue::Multiple(tags)) => Self(tags.clone()),
        }
    }

    /// Returns the tags as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` when no preference was expressed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Normalised consent marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    /// The client sent one of the accepted tokens.
    Given,
    /// The field was absent, repeated, or carried any other value.
    Withheld,
}

impl Consent {
    /// Normalises the raw `consent` field.
    ///
    /// Only a single value exactly matching `on`, `true`, or `yes` counts as
    /// consent. Malformed values are treated as "not given" rather than as an
    /// error.
    #[must_use]
    pub fn from_field(value: Option<&FormValue>) -> Self {
        match value {
            Some(FormValue::Single(token)) if TRUTHY_CONSENT_TOKENS.contains(&token.as_str()) => {
                Self::Given
            }
            _ => Self::Withheld,
        }
    }

    /// Returns `true` when consent was given.
    #[must_use]
    pub const fn is_given(self) -> bool {
        matches!(self, Self::Given)
    }
}

/// Contact-form content that passed validation.
///
/// Holding a `ContactForm` proves the required fields are non-empty and
/// consent was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub(super) full_name: String,
    pub(super) subject: String,
    pub(super) message: String,
    pub(super) response_prefs: ResponsePrefs,
}

impl ContactForm {
    /// Normalises and validates decoded form fields.
    ///
    /// Normalisation of `response` and `consent` happens first; the required
    /// text fields are then checked in order (`fullName`, `subject`,
    /// `message`), followed by consent. The first failure is returned.
    ///
    /// A repeated text field contributes its first value.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionValidationError::MissingField`] naming the first
    /// absent or empty required field, or
    /// [`SubmissionValidationError::ConsentNotGiven`] when consent is
    /// withheld.
    pub fn from_fields(fields: &FormFields) -> Result<Self, SubmissionValidationError> {
        let response_prefs = ResponsePrefs::from_field(fields.get(RESPONSE_FIELD));
        let consent = Consent::from_field(fields.get(CONSENT_FIELD));

        let full_name = required(fields, FULL_NAME_FIELD)?;
        let subject = required(fields, SUBJECT_FIELD)?;
        let message = required(fields, MESSAGE_FIELD)?;
        if !consent.is_given() {
            return Err(SubmissionValidationError::ConsentNotGiven);
        }

        Ok(Self {
            full_name,
            subject,
            message,
            response_prefs,
        })
    }

    /// Returns the sender's full name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the message subject.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the message body.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the normalised response preferences.
    #[must_use]
    pub const fn response_prefs(&self) -> &ResponsePrefs {
        &self.response_prefs
    }
}

fn required(fields: &FormFields, name: &'static str) -> Result<String, SubmissionValidationError> {
    fields
        .get(name)
        .and_then(FormValue::first)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or(SubmissionValidationError::MissingField(name))
}
