//! Unit tests for submission domain types.

use super::FixedClock;
use crate::submission::domain::{
    Attachment, AttachmentPathError, Consent, ContactForm, FormFields, FormValue, ResponsePrefs,
    Submission, SubmissionValidationError, UploadedFile,
};
use camino::Utf8Path;
use rstest::rstest;
use serde_json::{Value, json};

fn valid_fields() -> FormFields {
    FormFields::new()
        .with("fullName", "Jane Doe")
        .with("subject", "Question")
        .with("message", "Hi")
        .with("consent", "on")
}

fn upload_at(path: &str) -> UploadedFile {
    UploadedFile::new(
        "3f2a9c0d4b5e6f708192a3b4c5d6e7f8",
        "timetable.pdf",
        "application/pdf",
        48_213,
        path,
    )
}

// ── Response preference normalisation ──────────────────────────────

#[rstest]
#[case(None, &[])]
#[case(Some(FormValue::from("")), &[])]
#[case(Some(FormValue::from("email")), &["email"])]
#[case(
    Some(FormValue::from(vec!["phone".to_owned(), "email".to_owned()])),
    &["phone", "email"]
)]
fn response_prefs_are_normalised_to_a_list(
    #[case] raw: Option<FormValue>,
    #[case] expected: &[&str],
) {
    let prefs = ResponsePrefs::from_field(raw.as_ref());
    assert_eq!(prefs.as_slice(), expected);
}

// ── Consent normalisation ──────────────────────────────────────────

#[rstest]
#[case("on")]
#[case("true")]
#[case("yes")]
fn truthy_consent_tokens_are_accepted(#[case] token: &str) {
    let consent = Consent::from_field(Some(&FormValue::from(token)));
    assert_eq!(consent, Consent::Given);
}

#[rstest]
#[case("On")]
#[case("TRUE")]
#[case("1")]
#[case("no")]
#[case("")]
#[case(" on")]
fn other_consent_values_are_withheld(#[case] token: &str) {
    let consent = Consent::from_field(Some(&FormValue::from(token)));
    assert_eq!(consent, Consent::Withheld);
}

#[rstest]
fn absent_or_repeated_consent_is_withheld() {
    assert!(!Consent::from_field(None).is_given());
    let repeated = FormValue::from(vec!["on".to_owned(), "on".to_owned()]);
    assert!(!Consent::from_field(Some(&repeated)).is_given());
}

// ── Form decoding ──────────────────────────────────────────────────

#[rstest]
fn repeated_keys_accumulate_in_arrival_order() {
    let fields: FormFields = [("response", "phone"), ("response", "email"), ("response", "post")]
        .into_iter()
        .collect();

    assert_eq!(
        fields.get("response"),
        Some(&FormValue::Multiple(vec![
            "phone".to_owned(),
            "email".to_owned(),
            "post".to_owned(),
        ]))
    );
}

#[rstest]
fn single_key_stays_scalar() {
    let fields: FormFields = [("subject", "Question")].into_iter().collect();
    assert_eq!(fields.get("subject"), Some(&FormValue::from("Question")));
}

// ── Validation ─────────────────────────────────────────────────────

#[rstest]
fn valid_form_is_accepted() {
    let form = ContactForm::from_fields(&valid_fields()).expect("form should validate");

    assert_eq!(form.full_name(), "Jane Doe");
    assert_eq!(form.subject(), "Question");
    assert_eq!(form.message(), "Hi");
    assert!(form.response_prefs().is_empty());
}

#[rstest]
#[case("fullName")]
#[case("subject")]
#[case("message")]
fn missing_required_field_is_rejected(#[case] field: &'static str) {
    let fields = valid_fields().with(field, "");
    let result = ContactForm::from_fields(&fields);
    assert_eq!(result, Err(SubmissionValidationError::MissingField(field)));
}

#[rstest]
fn first_missing_field_is_reported() {
    let result = ContactForm::from_fields(&FormFields::new());
    assert_eq!(
        result,
        Err(SubmissionValidationError::MissingField("fullName"))
    );
}

#[rstest]
#[case(None)]
#[case(Some("off"))]
#[case(Some("Yes"))]
fn withheld_consent_is_rejected(#[case] consent: Option<&str>) {
    let base = FormFields::new()
        .with("fullName", "Jane Doe")
        .with("subject", "Question")
        .with("message", "Hi");
    let fields = match consent {
        Some(token) => base.with("consent", token),
        None => base,
    };

    let result = ContactForm::from_fields(&fields);
    assert_eq!(result, Err(SubmissionValidationError::ConsentNotGiven));
}

#[rstest]
fn whitespace_only_fields_count_as_present() {
    let fields = valid_fields().with("message", "   ");
    let form = ContactForm::from_fields(&fields).expect("whitespace is not trimmed");
    assert_eq!(form.message(), "   ");
}

#[rstest]
fn repeated_text_field_uses_first_value() {
    let fields =
        valid_fields().with("subject", vec!["Admissions".to_owned(), "Fees".to_owned()]);
    let form = ContactForm::from_fields(&fields).expect("form should validate");
    assert_eq!(form.subject(), "Admissions");
}

// ── Attachment metadata ────────────────────────────────────────────

#[rstest]
fn attachment_path_is_relative_with_forward_slashes() {
    let upload = upload_at("/srv/app/uploads/3f2a9c0d4b5e6f708192a3b4c5d6e7f8");
    let attachment =
        Attachment::from_upload(upload, Utf8Path::new("/srv/app")).expect("inside root");

    assert_eq!(attachment.path(), "uploads/3f2a9c0d4b5e6f708192a3b4c5d6e7f8");
    assert_eq!(attachment.filename(), "3f2a9c0d4b5e6f708192a3b4c5d6e7f8");
    assert_eq!(attachment.original_name(), "timetable.pdf");
    assert_eq!(attachment.mime_type(), "application/pdf");
    assert_eq!(attachment.size(), 48_213);
}

#[cfg(unix)]
#[rstest]
fn backslashes_in_stored_path_become_forward_slashes() {
    let upload = upload_at("/srv/app/uploads\\nested\\file");
    let attachment =
        Attachment::from_upload(upload, Utf8Path::new("/srv/app")).expect("inside root");
    assert_eq!(attachment.path(), "uploads/nested/file");
}

#[rstest]
#[case("/srv/other/uploads/file")]
#[case("/srv/app/../other/file")]
fn upload_outside_root_is_rejected(#[case] path: &str) {
    let result = Attachment::from_upload(upload_at(path), Utf8Path::new("/srv/app"));
    assert!(matches!(
        result,
        Err(AttachmentPathError::OutsideRoot { .. })
    ));
}

#[rstest]
fn upload_at_root_is_rejected() {
    let result = Attachment::from_upload(upload_at("/srv/app"), Utf8Path::new("/srv/app"));
    assert!(matches!(result, Err(AttachmentPathError::NotAFile(_))));
}

// ── Submission record shape ────────────────────────────────────────

#[rstest]
fn submission_serialises_to_the_persisted_shape() {
    let form = ContactForm::from_fields(&valid_fields()).expect("form should validate");
    let submission = Submission::new(form, None, &FixedClock::reference());

    let document = serde_json::to_value(&submission).expect("serialisable");

    assert_eq!(
        document,
        json!({
            "id": submission.id().to_string(),
            "partitionKey": "contacts",
            "fullName": "Jane Doe",
            "subject": "Question",
            "message": "Hi",
            "responsePrefs": [],
            "consent": true,
            "createdAt": "2024-03-05T09:30:15.250Z",
        })
    );
}

#[rstest]
fn attachment_block_carries_all_five_fields() {
    let form = ContactForm::from_fields(&valid_fields()).expect("form should validate");
    let attachment = Attachment::from_upload(
        upload_at("/srv/app/uploads/3f2a9c0d4b5e6f708192a3b4c5d6e7f8"),
        Utf8Path::new("/srv/app"),
    )
    .expect("inside root");
    let submission = Submission::new(form, Some(attachment), &FixedClock::reference());

    let document = serde_json::to_value(&submission).expect("serialisable");

    assert_eq!(
        document.get("attachment"),
        Some(&json!({
            "filename": "3f2a9c0d4b5e6f708192a3b4c5d6e7f8",
            "originalName": "timetable.pdf",
            "mimeType": "application/pdf",
            "size": 48_213,
            "path": "uploads/3f2a9c0d4b5e6f708192a3b4c5d6e7f8",
        }))
    );
}

#[rstest]
fn persisted_document_carries_normalised_fields() {
    let form = ContactForm::from_fields(&valid_fields().with("response", "email"))
        .expect("form should validate");
    let submission = Submission::new(form, None, &FixedClock::reference());

    let document = serde_json::to_value(&submission).expect("serialisable");

    assert_eq!(document.get("id"), Some(&json!(submission.id().to_string())));
    assert_eq!(document.get("partitionKey"), Some(&json!("contacts")));
    assert_eq!(document.get("responsePrefs"), Some(&json!(["email"])));
    assert_eq!(document.get("consent"), Some(&json!(true)));
    assert_eq!(
        document.get("createdAt"),
        Some(&json!("2024-03-05T09:30:15.250Z"))
    );
    assert!(document.get("attachment").is_none());
}

#[rstest]
fn each_submission_gets_a_fresh_identifier() {
    let clock = FixedClock::reference();
    let first = Submission::new(
        ContactForm::from_fields(&valid_fields()).expect("valid"),
        None,
        &clock,
    );
    let second = Submission::new(
        ContactForm::from_fields(&valid_fields()).expect("valid"),
        None,
        &clock,
    );

    assert_ne!(first.id(), second.id());
    let id_text = first.id().to_string();
    assert_eq!(id_text.len(), 36);
    assert!(matches!(
        serde_json::to_value(first.id()),
        Ok(Value::String(text)) if text == id_text
    ));
}
