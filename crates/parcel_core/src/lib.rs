//! Core parcel tracking logic.
//! This crate is the single source of truth for parcel lifecycle invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging};
pub use model::parcel::{
    ClientId, NewParcel, Parcel, ParcelNumber, ParcelStatus, ParcelStatusParseError,
};
pub use repo::parcel_repo::{ParcelStore, SqliteParcelStore, StoreError, StoreResult};
pub use service::parcel_service::{ParcelService, ParcelServiceError, ServiceResult};
