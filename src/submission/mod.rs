//! Contact-form submission intake.
//!
//! Validates decoded contact forms, captures optional attachments and
//! persists each accepted submission to exactly one backend: the remote
//! document store, or the local fallback when the remote store was not
//! available at startup. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
