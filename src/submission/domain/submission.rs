//! Submission aggregate root.

use super::{Attachment, ContactForm, ResponsePrefs, SubmissionId};
use chrono::{DateTime, SecondsFormat, Utc};
use mockable::Clock;
use serde::{Serialize, Serializer};

/// Partition key shared by every submission in the document store.
pub const PARTITION_KEY: &str = "contacts";

/// One validated contact-form entry plus optional attachment metadata.
///
/// The identifier and creation timestamp are assigned once in
/// [`Submission::new`]; the aggregate exposes no mutators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    id: SubmissionId,
    partition_key: String,
    full_name: String,
    subject: String,
    message: String,
    response_prefs: ResponsePrefs,
    consent: bool,
    #[serde(serialize_with = "iso_millis")]
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment: Option<Attachment>,
}

impl Submission {
    /// Creates a submission from validated form content.
    #[must_use]
    pub fn new(form: ContactForm, attachment: Option<Attachment>, clock: &impl Clock) -> Self {
        let ContactForm {
            full_name,
            subject,
            message,
            response_prefs,
        } = form;
        Self {
            id: SubmissionId::new(),
            partition_key: PARTITION_KEY.to_owned(),
            full_name,
            subject,
            message,
            response_prefs,
            consent: true,
            created_at: clock.utc(),
            attachment,
        }
    }

    /// Returns the submission identifier.
    #[must_use]
    pub const fn id(&self) -> SubmissionId {
        self.id
    }

    /// Returns the store partition key.
    #[must_use]
    pub fn partition_key(&self) -> &str {
        &self.partition_key
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

    /// Returns the response preferences.
    #[must_use]
    pub const fn response_prefs(&self) -> &ResponsePrefs {
        &self.response_prefs
    }

    /// Returns the recorded consent flag.
    #[must_use]
    pub const fn consent(&self) -> bool {
        self.consent
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the attachment metadata, if a file was uploaded.
    #[must_use]
    pub const fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }
}

/// `createdAt` as RFC 3339 with millisecond precision and a `Z` suffix.
fn iso_millis<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}
