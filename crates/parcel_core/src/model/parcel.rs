//! Parcel domain model.
//!
//! # Responsibility
//! - Define the tracked parcel record and its lifecycle status.
//! - Provide the total "next status" function used by the service layer.
//!
//! # Invariants
//! - `number` is assigned by storage and never reused within one database.
//! - `status` only moves forward along `registered -> sent -> delivered`.
//! - `address` is mutable and the parcel deletable only while `registered`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage-assigned parcel identifier.
pub type ParcelNumber = i64;

/// Identifier of the client that owns a parcel.
pub type ClientId = i64;

/// Parcel lifecycle stage.
///
/// Variants are declared in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Accepted into the system; address may still change.
    Registered,
    /// Handed over for delivery.
    Sent,
    /// Reached the recipient. Terminal.
    Delivered,
}

impl ParcelStatus {
    /// Returns the single next status, or `None` for the terminal status.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Registered => Some(Self::Sent),
            Self::Sent => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    /// Stable text form used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
        }
    }
}

impl Display for ParcelStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when status text is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParcelStatusParseError(pub String);

impl Display for ParcelStatusParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown parcel status `{}`; expected registered|sent|delivered",
            self.0
        )
    }
}

impl Error for ParcelStatusParseError {}

impl FromStr for ParcelStatus {
    type Err = ParcelStatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "registered" => Ok(Self::Registered),
            "sent" => Ok(Self::Sent),
            "delivered" => Ok(Self::Delivered),
            other => Err(ParcelStatusParseError(other.to_string())),
        }
    }
}

/// Persisted parcel record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    pub number: ParcelNumber,
    pub client: ClientId,
    pub status: ParcelStatus,
    /// Free-text delivery address.
    pub address: String,
    /// RFC 3339 UTC timestamp captured when the row was inserted.
    pub created_at: String,
}

impl Parcel {
    /// Returns whether the delivery address may still be changed.
    pub fn is_address_mutable(&self) -> bool {
        self.status == ParcelStatus::Registered
    }

    /// Returns whether the parcel may be physically removed.
    pub fn is_deletable(&self) -> bool {
        self.status == ParcelStatus::Registered
    }
}

/// Draft for a parcel that has not been stored yet.
///
/// Storage assigns `number`, forces `status = registered` and stamps
/// `created_at`, so the draft carries only caller-owned fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParcel {
    pub client: ClientId,
    pub address: String,
}

impl NewParcel {
    pub fn new(client: ClientId, address: impl Into<String>) -> Self {
        Self {
            client,
            address: address.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ParcelStatus, ParcelStatusParseError};

    #[test]
    fn next_walks_lifecycle_and_stops_at_delivered() {
        assert_eq!(ParcelStatus::Registered.next(), Some(ParcelStatus::Sent));
        assert_eq!(ParcelStatus::Sent.next(), Some(ParcelStatus::Delivered));
        assert_eq!(ParcelStatus::Delivered.next(), None);
    }

    #[test]
    fn status_text_parses_back() {
        for status in [
            ParcelStatus::Registered,
            ParcelStatus::Sent,
            ParcelStatus::Delivered,
        ] {
            assert_eq!(status.as_str().parse::<ParcelStatus>(), Ok(status));
        }
    }

    #[test]
    fn unknown_status_text_is_rejected() {
        let err = "lost".parse::<ParcelStatus>().unwrap_err();
        assert_eq!(err, ParcelStatusParseError("lost".to_string()));
        assert!(err.to_string().contains("lost"));
    }
}
