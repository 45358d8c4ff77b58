//! Console driver for the parcel tracker.
//!
//! # Responsibility
//! - Open the tracker database and wire storage into the service.
//! - Run the demonstration flow and print results or the first error.
//!
//! Environment:
//! - `PARCEL_TRACKER_DB`: database file path, defaults to `tracker.db`.
//! - `PARCEL_TRACKER_LOG_DIR`: absolute log directory; logging is off when unset.
//! - `PARCEL_TRACKER_LOG_LEVEL`: overrides the build-mode default level.

use log::{error, info};
use parcel_core::db::open_db;
use parcel_core::{
    default_log_level, init_logging, ClientId, Parcel, ParcelService, ParcelStore,
    SqliteParcelStore,
};
use std::error::Error;
use std::process::ExitCode;

const DEFAULT_DB_PATH: &str = "tracker.db";

fn main() -> ExitCode {
    if let Err(err) = setup_logging() {
        eprintln!("logging disabled: {err}");
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=demo_run module=cli status=error error={err}");
            println!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging() -> Result<(), String> {
    let Ok(log_dir) = std::env::var("PARCEL_TRACKER_LOG_DIR") else {
        return Ok(());
    };
    let level = std::env::var("PARCEL_TRACKER_LOG_LEVEL")
        .unwrap_or_else(|_| default_log_level().to_string());
    init_logging(&level, &log_dir)
}

fn run() -> Result<(), Box<dyn Error>> {
    let db_path =
        std::env::var("PARCEL_TRACKER_DB").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    info!("event=demo_run module=cli status=start db_path={db_path}");

    let conn = open_db(&db_path)?;
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn)?);

    let client: ClientId = 1;
    let address = "Pskov, Pushkina st., Kolotushkina house 5";
    let parcel = service.register(client, address)?;

    service.change_address(parcel.number, "Saratov, Verkhnie Zori, Kozlova st. 25")?;
    service.next_status(parcel.number)?;
    print_client_parcels(&service, client)?;

    service.delete(parcel.number)?;
    print_client_parcels(&service, client)?;

    let parcel = service.register(client, address)?;
    service.delete(parcel.number)?;
    print_client_parcels(&service, client)?;

    info!("event=demo_run module=cli status=ok");
    Ok(())
}

fn print_client_parcels<S: ParcelStore>(
    service: &ParcelService<S>,
    client: ClientId,
) -> Result<(), Box<dyn Error>> {
    let parcels = service.list_by_client(client)?;
    println!("Client {client} parcels:");
    for parcel in &parcels {
        println!("{}", describe(parcel));
    }
    println!();
    Ok(())
}

fn describe(parcel: &Parcel) -> String {
    format!(
        "Parcel #{} to address {} from client {}, registered at {}, status {}",
        parcel.number, parcel.address, parcel.client, parcel.created_at, parcel.status
    )
}
