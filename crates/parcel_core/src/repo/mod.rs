//! Storage layer contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the parcel storage contract used by the service layer.
//! - Isolate SQLite query details from lifecycle rules.
//!
//! # Invariants
//! - Storage APIs return semantic `NotFound` in addition to DB transport
//!   errors, and never check lifecycle preconditions.

pub mod parcel_repo;
