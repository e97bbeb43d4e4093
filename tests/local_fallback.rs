//! Integration tests for the local-disk fallback store.

mod test_helpers;

use std::io;
use std::sync::{Arc, Mutex};

use contact_intake::submission::{
    adapters::local::LocalFileStore,
    domain::{ContactForm, FormFields, Submission},
    ports::{StoreKind, SubmissionStore, SubmissionStoreError},
    services::{SubmissionService, connect_remote, select_store},
};
use eyre::{Result, ensure};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::{Value, json};
use test_helpers::ScratchRoot;
use tracing_subscriber::fmt::MakeWriter;

/// Log sink shared between a subscriber and the test.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        self.0
            .lock()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut bytes) = self.0.lock() {
            bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn jane_doe() -> FormFields {
    FormFields::new()
        .with("fullName", "Jane Doe")
        .with("subject", "Question")
        .with("message", "Hi")
        .with("consent", "on")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unconfigured_remote_writes_json_file() -> Result<()> {
    let root = ScratchRoot::new()?;
    let (app_root, _uploads, fallback) = root.layout()?.into_parts();
    let clock = Arc::new(DefaultClock);

    let remote = connect_remote(None, Arc::clone(&clock)).await;
    let selection = select_store(remote, fallback);
    ensure!(selection.kind() == StoreKind::LocalFallback, "expected fallback");

    let service = SubmissionService::new(Arc::new(selection.into_store()), clock, app_root);
    service.handle(&jane_doe(), None).await?;

    let files = root.list("data")?;
    ensure!(files.len() == 1, "expected one record, found {files:?}");
    let file_name = files.first().ok_or_else(|| eyre::eyre!("no record"))?;
    let document: Value = serde_json::from_slice(&root.read(&format!("data/{file_name}"))?)?;

    let id = document
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| eyre::eyre!("missing id"))?;
    assert_eq!(file_name, &format!("{id}.json"));
    assert_eq!(document.get("partitionKey"), Some(&json!("contacts")));
    assert_eq!(document.get("fullName"), Some(&json!("Jane Doe")));
    assert_eq!(document.get("subject"), Some(&json!("Question")));
    assert_eq!(document.get("message"), Some(&json!("Hi")));
    assert_eq!(document.get("responsePrefs"), Some(&json!([])));
    assert_eq!(document.get("consent"), Some(&json!(true)));
    assert!(document.get("attachment").is_none());

    let created_at = document
        .get("createdAt")
        .and_then(Value::as_str)
        .ok_or_else(|| eyre::eyre!("missing createdAt"))?;
    ensure!(
        created_at.ends_with('Z') && created_at.len() == 24,
        "createdAt should have millisecond precision: {created_at}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn record_is_pretty_printed_with_two_space_indent() -> Result<()> {
    let root = ScratchRoot::new()?;
    let (_app_root, _uploads, fallback) = root.layout()?.into_parts();
    let submission = Submission::new(ContactForm::from_fields(&jane_doe())?, None, &DefaultClock);

    fallback.save(&submission).await?;

    let raw = String::from_utf8(root.read(&format!(
        "data/{}",
        LocalFileStore::file_name(submission.id())
    ))?)?;
    ensure!(raw.starts_with("{\n  \"id\": "), "unexpected layout: {raw}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_log_names_the_fallback_store() -> Result<()> {
    let root = ScratchRoot::new()?;
    let (_app_root, _uploads, fallback) = root.layout()?.into_parts();
    let submission = Submission::new(ContactForm::from_fields(&jane_doe())?, None, &DefaultClock);
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    fallback.save(&submission).await?;

    let output = logs.contents();
    ensure!(
        output.contains("saved submission to local fallback store"),
        "unexpected log output: {output}"
    );
    ensure!(
        !output.contains("not configured"),
        "save log should not guess why the fallback is active: {output}"
    );
    ensure!(
        output.contains(&submission.id().to_string()),
        "save log should carry the submission id: {output}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn existing_record_is_never_overwritten() -> Result<()> {
    let root = ScratchRoot::new()?;
    let (_app_root, _uploads, fallback) = root.layout()?.into_parts();
    let submission = Submission::new(ContactForm::from_fields(&jane_doe())?, None, &DefaultClock);

    fallback.save(&submission).await?;
    let result = fallback.save(&submission).await;

    assert!(matches!(
        result,
        Err(SubmissionStoreError::Duplicate(id)) if id == submission.id()
    ));
    assert_eq!(root.list("data")?.len(), 1);
    Ok(())
}

#[rstest]
fn layout_creates_missing_directories() -> Result<()> {
    let root = ScratchRoot::new()?;

    let layout = root.layout()?;

    assert_eq!(root.list("uploads")?, Vec::<String>::new());
    assert_eq!(root.list("data")?, Vec::<String>::new());
    assert!(layout.uploads().location().ends_with("uploads"));
    assert!(layout.fallback().location().ends_with("data"));
    assert!(layout.root().is_absolute());
    assert_eq!(layout.root().file_name(), root.path().file_name());
    Ok(())
}
