use std::{path::Path, process::ExitCode};

use cosmos_control_plane::CosmosControlClient;
use cosmos_db_init::{config::Settings, provision};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const SETTINGS_FILE: &str = "appSettings.json";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => {
            info!("provisioning complete");
            ExitCode::SUCCESS
        }
        Err(error) => {
            report(&error);
            error!("provisioning failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let settings = Settings::load(Path::new(SETTINGS_FILE))?;
    let client = CosmosControlClient::new(settings.endpoint, settings.authorization_key)?;
    provision::provision(&client, &settings.database_id).await?;
    Ok(())
}

/// Service errors carry structured detail worth printing in full; everything else gets the
/// top-level message plus the innermost cause.
fn report(error: &anyhow::Error) {
    if let Some(service) = error.downcast_ref::<cosmos_control_plane::Error>() {
        if let Some(status) = service.status() {
            error!(
                %status,
                activity_id = service.activity_id().unwrap_or("-"),
                diagnostics = service.diagnostics().unwrap_or(""),
                "{service}",
            );
            return;
        }
    }

    let cause = error
        .chain()
        .last()
        .map(ToString::to_string)
        .unwrap_or_default();
    error!("error: {error}, message: {cause}");
}
