//! Contact intake: accepts the website contact form and stores each
//! submission.
//!
//! A submission is validated (required fields plus explicit consent), its
//! optional attachment is written to disk, and the resulting record is
//! persisted to a Cosmos DB container or, when that store is not configured
//! or not reachable at startup, to JSON files on local disk.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (document store, files)
//!
//! # Modules
//!
//! - [`submission`]: Validation, attachment capture and persistence
//! - [`http`]: axum router and request handlers
//! - [`config`]: Environment-sourced settings
//! - [`telemetry`]: Logging setup

pub mod config;
pub mod http;
pub mod submission;
pub mod telemetry;
