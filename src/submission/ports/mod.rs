//! Port contracts for submission persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the submission
//! service.

pub mod store;

pub use store::{StoreKind, SubmissionStore, SubmissionStoreError, SubmissionStoreResult};
