use std::time::Duration;

use crate::{
    configuration::Configuration, configuration_handler::ConfigurationHandler,
    database_interface::DatabaseInterface, http::create_app, local_bookings::LocalBookings,
};
use tokio::time::sleep;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod backend;
mod booking_service;
mod configuration;
mod configuration_handler;
mod database_interface;
mod error;
mod http;
mod local_bookings;
mod schedule;
mod schema;
#[cfg(test)]
mod testutils;
mod types;
mod validation;

#[tokio::main]
async fn main() {
    let configuration = ConfigurationHandler::parse_arguments();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let address = format!("0.0.0.0:{}", configuration.port());
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(?err, "Failed to bind {address}");
            std::process::exit(1);
        }
    };

    let app = if let Some(database_url) = configuration.database_url() {
        let backend = loop {
            match DatabaseInterface::new(&database_url) {
                Ok(backend) => {
                    info!("Successfully connected to database");
                    break backend;
                }
                Err(err) => {
                    error!(?err, "Failed to establish database connection. Retry in 1 sec. You may want to restart without a database url (in-memory bookings).");
                    sleep(Duration::from_secs(1)).await;
                }
            }
        };
        create_app(backend, configuration)
    } else if configuration.seed_examples() {
        info!("Using in-memory bookings with example data");
        create_app(LocalBookings::with_example_bookings(), configuration)
    } else {
        info!("Using in-memory bookings");
        create_app(LocalBookings::default(), configuration)
    };

    let app = match app {
        Ok(app) => app,
        Err(err) => {
            error!(%err, "Invalid schedule configuration");
            std::process::exit(1);
        }
    };

    info!("Booking service listening on {address}");
    if let Err(err) = axum::serve(listener, app).await {
        error!(?err, "Server stopped");
    }
}
