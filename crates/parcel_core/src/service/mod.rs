//! Core use-case services.
//!
//! # Responsibility
//! - Own every lifecycle precondition before delegating to storage.
//! - Keep callers decoupled from storage details.

pub mod parcel_service;
