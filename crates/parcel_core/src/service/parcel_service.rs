//! Parcel lifecycle service.
//!
//! # Responsibility
//! - Enforce lifecycle preconditions above the storage layer.
//! - Provide register, change-address, advance-status, list and delete
//!   operations for core callers.
//!
//! # Invariants
//! - Address change and deletion are allowed only while `registered`.
//! - Status advances exactly one step; advancing `delivered` fails.
//! - Storage failures are returned unchanged, never converted into success.
//! - Each mutation reads then writes without a transaction; concurrent
//!   writers on the same parcel may race.

use crate::model::parcel::{ClientId, NewParcel, Parcel, ParcelNumber, ParcelStatus};
use crate::repo::parcel_repo::{ParcelStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ADDRESS_CHANGE_REJECTED: &str =
    "address can only be changed for parcels with status 'registered'";
const DELETE_REJECTED: &str = "parcel can only be deleted with status 'registered'";

/// Errors from parcel service operations.
#[derive(Debug)]
pub enum ParcelServiceError {
    /// Target parcel does not exist.
    NotFound(ParcelNumber),
    /// Mutation is not allowed in the parcel's current status.
    InvalidState {
        number: ParcelNumber,
        status: ParcelStatus,
        reason: &'static str,
    },
    /// Status advance requested on a terminal parcel.
    InvalidTransition {
        number: ParcelNumber,
        from: ParcelStatus,
    },
    /// Storage-level failure.
    Storage(StoreError),
}

impl Display for ParcelServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(number) => write!(f, "parcel not found: {number}"),
            Self::InvalidState { reason, .. } => f.write_str(reason),
            Self::InvalidTransition { number, from } => write!(
                f,
                "parcel {number} cannot advance from terminal status '{from}'"
            ),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ParcelServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ParcelServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(number) => Self::NotFound(number),
            other => Self::Storage(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ParcelServiceError>;

/// Parcel lifecycle facade over a storage implementation.
pub struct ParcelService<S: ParcelStore> {
    store: S,
}

impl<S: ParcelStore> ParcelService<S> {
    /// Creates service from storage implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a new parcel and returns the stored record.
    ///
    /// # Contract
    /// - Returned parcel has `status = registered` and a fresh `number`.
    pub fn register(&self, client: ClientId, address: impl Into<String>) -> ServiceResult<Parcel> {
        let number = self.store.add(&NewParcel::new(client, address))?;
        Ok(self.store.get(number)?)
    }

    /// Replaces the delivery address of a `registered` parcel.
    pub fn change_address(&self, number: ParcelNumber, address: &str) -> ServiceResult<()> {
        let parcel = self.store.get(number)?;
        if !parcel.is_address_mutable() {
            return Err(invalid_state(&parcel, ADDRESS_CHANGE_REJECTED));
        }
        self.store.set_address(number, address)?;
        Ok(())
    }

    /// Advances status by exactly one step and returns the new status.
    pub fn next_status(&self, number: ParcelNumber) -> ServiceResult<ParcelStatus> {
        let parcel = self.store.get(number)?;
        let next = parcel
            .status
            .next()
            .ok_or(ParcelServiceError::InvalidTransition {
                number,
                from: parcel.status,
            })?;
        self.store.set_status(number, next)?;
        Ok(next)
    }

    /// Physically deletes a `registered` parcel.
    pub fn delete(&self, number: ParcelNumber) -> ServiceResult<()> {
        let parcel = self.store.get(number)?;
        if !parcel.is_deletable() {
            return Err(invalid_state(&parcel, DELETE_REJECTED));
        }
        self.store.delete(number)?;
        Ok(())
    }

    /// Lists all stored parcels of one client.
    pub fn list_by_client(&self, client: ClientId) -> ServiceResult<Vec<Parcel>> {
        Ok(self.store.get_by_client(client)?)
    }

    /// Gets one parcel by number.
    pub fn get(&self, number: ParcelNumber) -> ServiceResult<Parcel> {
        Ok(self.store.get(number)?)
    }
}

fn invalid_state(parcel: &Parcel, reason: &'static str) -> ParcelServiceError {
    ParcelServiceError::InvalidState {
        number: parcel.number,
        status: parcel.status,
        reason,
    }
}
