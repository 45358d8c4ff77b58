//! Parcel storage contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide rule-agnostic CRUD over the `parcel` table.
//! - Keep SQL and row mapping inside the persistence boundary.
//!
//! # Invariants
//! - Storage enforces existence only; lifecycle rules live in the service.
//! - `add` always persists `status = registered` and a fresh `created_at`.
//! - Mutations that touch zero rows report `NotFound`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::parcel::{ClientId, NewParcel, Parcel, ParcelNumber, ParcelStatus};
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PARCEL_TABLE: &str = "parcel";
const PARCEL_COLUMNS: &[&str] = &["number", "client", "status", "address", "created_at"];

const PARCEL_SELECT_SQL: &str = "SELECT
    number,
    client,
    status,
    address,
    created_at
FROM parcel";

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage error for parcel persistence and query operations.
///
/// Every variant other than `NotFound` is a storage fault from the caller's
/// point of view.
#[derive(Debug)]
pub enum StoreError {
    NotFound(ParcelNumber),
    Db(DbError),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(number) => write!(f, "parcel not found: {number}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted parcel data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage interface for parcel records.
pub trait ParcelStore {
    /// Inserts a new `registered` parcel and returns its assigned number.
    fn add(&self, parcel: &NewParcel) -> StoreResult<ParcelNumber>;
    /// Fetches one parcel by number.
    fn get(&self, number: ParcelNumber) -> StoreResult<Parcel>;
    /// Lists a client's parcels in insertion order; empty when none exist.
    fn get_by_client(&self, client: ClientId) -> StoreResult<Vec<Parcel>>;
    /// Overwrites status without checking lifecycle rules.
    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> StoreResult<()>;
    /// Overwrites address without checking lifecycle rules.
    fn set_address(&self, number: ParcelNumber, address: &str) -> StoreResult<()>;
    /// Physically removes the row.
    fn delete(&self, number: ParcelNumber) -> StoreResult<()>;
}

impl<S: ParcelStore + ?Sized> ParcelStore for &S {
    fn add(&self, parcel: &NewParcel) -> StoreResult<ParcelNumber> {
        (**self).add(parcel)
    }

    fn get(&self, number: ParcelNumber) -> StoreResult<Parcel> {
        (**self).get(number)
    }

    fn get_by_client(&self, client: ClientId) -> StoreResult<Vec<Parcel>> {
        (**self).get_by_client(client)
    }

    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> StoreResult<()> {
        (**self).set_status(number, status)
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> StoreResult<()> {
        (**self).set_address(number, address)
    }

    fn delete(&self, number: ParcelNumber) -> StoreResult<()> {
        (**self).delete(number)
    }
}

/// SQLite-backed parcel store over an injected connection.
pub struct SqliteParcelStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParcelStore<'conn> {
    /// Constructs a store from a connection whose `parcel` table exists.
    ///
    /// Only the table shape is checked; how the schema was created is up to
    /// the caller.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not have the expected shape.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ParcelStore for SqliteParcelStore<'_> {
    fn add(&self, parcel: &NewParcel) -> StoreResult<ParcelNumber> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        self.conn.execute(
            "INSERT INTO parcel (client, status, address, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                parcel.client,
                ParcelStatus::Registered.as_str(),
                parcel.address.as_str(),
                created_at,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, number: ParcelNumber) -> StoreResult<Parcel> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PARCEL_SELECT_SQL} WHERE number = ?1;"))?;

        let mut rows = stmt.query([number])?;
        if let Some(row) = rows.next()? {
            return parse_parcel_row(row);
        }

        Err(StoreError::NotFound(number))
    }

    fn get_by_client(&self, client: ClientId) -> StoreResult<Vec<Parcel>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PARCEL_SELECT_SQL} WHERE client = ?1 ORDER BY number ASC;"
        ))?;

        let mut rows = stmt.query([client])?;
        let mut parcels = Vec::new();
        while let Some(row) = rows.next()? {
            parcels.push(parse_parcel_row(row)?);
        }

        Ok(parcels)
    }

    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE parcel SET status = ?1 WHERE number = ?2;",
            params![status.as_str(), number],
        )?;
        ensure_changed(changed, number)
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE parcel SET address = ?1 WHERE number = ?2;",
            params![address, number],
        )?;
        ensure_changed(changed, number)
    }

    fn delete(&self, number: ParcelNumber) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM parcel WHERE number = ?1;", [number])?;
        ensure_changed(changed, number)
    }
}

fn ensure_changed(changed: usize, number: ParcelNumber) -> StoreResult<()> {
    if changed == 0 {
        return Err(StoreError::NotFound(number));
    }
    Ok(())
}

fn parse_parcel_row(row: &Row<'_>) -> StoreResult<Parcel> {
    let number: ParcelNumber = row.get("number")?;

    let status = match row.get::<_, Option<String>>("status")? {
        Some(text) => text.parse::<ParcelStatus>().map_err(|_| {
            StoreError::InvalidData(format!(
                "invalid status `{text}` in parcel.status for parcel {number}"
            ))
        })?,
        None => {
            return Err(StoreError::InvalidData(format!(
                "missing status in parcel.status for parcel {number}"
            )));
        }
    };

    Ok(Parcel {
        number,
        client: row.get("client")?,
        status,
        address: required_text(row, "address", number)?,
        created_at: required_text(row, "created_at", number)?,
    })
}

fn required_text(row: &Row<'_>, column: &str, number: ParcelNumber) -> StoreResult<String> {
    row.get::<_, Option<String>>(column)?.ok_or_else(|| {
        StoreError::InvalidData(format!(
            "missing value in parcel.{column} for parcel {number}"
        ))
    })
}

fn ensure_connection_ready(conn: &Connection) -> StoreResult<()> {
    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [PARCEL_TABLE],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(StoreError::MissingRequiredTable(PARCEL_TABLE));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({PARCEL_TABLE});"))?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;

    for &column in PARCEL_COLUMNS {
        if !present.iter().any(|name| name.as_str() == column) {
            return Err(StoreError::MissingRequiredColumn {
                table: PARCEL_TABLE,
                column,
            });
        }
    }

    Ok(())
}
