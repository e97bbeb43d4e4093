//! Domain model for contact-form submissions.
//!
//! Covers raw form decoding, normalisation and validation of the contact
//! fields, attachment metadata, and the [`Submission`] aggregate that is
//! handed to persistence. No infrastructure concerns live here.

mod attachment;
mod contact;
mod error;
mod form;
mod ids;
mod submission;

pub use attachment::{Attachment, UploadedFile};
pub use contact::{Consent, ContactForm, ResponsePrefs};
pub use error::{AttachmentPathError, SubmissionValidationError};
pub use form::{
    ATTACHMENT_FIELD, CONSENT_FIELD, FULL_NAME_FIELD, FormFields, FormValue, MESSAGE_FIELD,
    RESPONSE_FIELD, SUBJECT_FIELD,
};
pub use ids::SubmissionId;
pub use submission::{PARTITION_KEY, Submission};
