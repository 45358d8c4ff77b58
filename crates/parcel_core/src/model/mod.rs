//! Parcel domain model.
//!
//! # Responsibility
//! - Define the data structures shared by storage and service layers.
//!
//! # Invariants
//! - Status is a closed enum; illegal status values are unrepresentable.
//! - Deletion is physical; there is no tombstone state.

pub mod parcel;
