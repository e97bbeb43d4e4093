//! Adapter implementations for submission persistence and attachment
//! capture.

pub mod active;
pub mod cosmos;
pub mod layout;
pub mod local;
pub mod memory;
pub mod uploads;
