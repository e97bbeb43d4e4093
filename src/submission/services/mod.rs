//! Application services for contact-form intake.

mod intake;
mod selection;

pub use intake::{
    DEFAULT_REDIRECT, RedirectTarget, SubmissionService, SubmissionServiceError,
    SubmissionServiceResult,
};
pub use selection::{FallbackReason, StoreSelection, connect_remote, select_store};
