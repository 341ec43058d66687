//! Appointments Lambda - Handles appointment lookups by path or query string.

use api_gateway::appointments::{handle, AppointmentService};
use lambda_http::{run, service_fn, Error};
use shared::{Config, DynamoStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;
    info!(
        environment = %config.environment,
        table = %config.appointments_table_name,
        region = %config.aws_region,
        "Starting appointments Lambda"
    );

    let service = Arc::new(AppointmentService::new(DynamoStore::connect(&config).await));

    run(service_fn(move |event| {
        let service = Arc::clone(&service);
        async move { handle(&service, event).await }
    }))
    .await
}
