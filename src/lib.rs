pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::exchange::ExchangeRequest;
use crate::core::config::{AppConfig, ProvidersConfig};
use crate::core::repository::PartnerRepository;
use crate::providers::rest::RestRepository;
use crate::providers::snapshot::SnapshotRepository;
use anyhow::{Result, bail};
use chrono::NaiveDate;
use tracing::{debug, info};

pub enum AppCommand {
    Balances { show_partners: bool },
    Exchange(ExchangeRequest),
    Dashboard { date: Option<NaiveDate> },
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    if let Some(path) = config_path {
        return AppConfig::load_from_path(path);
    }
    if AppConfig::default_config_path()?.exists() {
        return AppConfig::load();
    }
    debug!("No configuration file found, using defaults");
    Ok(AppConfig::default())
}

/// Picks the ledger source: a snapshot file when configured, the REST backend otherwise.
pub fn build_repository(providers: &ProvidersConfig) -> Result<Box<dyn PartnerRepository>> {
    if let Some(snapshot) = &providers.snapshot {
        debug!("Using snapshot repository at {}", snapshot.path);
        return Ok(Box::new(SnapshotRepository::new(&snapshot.path)));
    }
    if let Some(rest) = &providers.rest {
        debug!("Using REST repository at {}", rest.base_url);
        return Ok(Box::new(RestRepository::new(&rest.base_url)?));
    }
    bail!("No data provider configured; set providers.rest or providers.snapshot")
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Sarraf starting...");

    let config = load_config(config_path)?;
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Balances { show_partners } => {
            let repository = build_repository(&config.providers)?;
            cli::balances::run(repository.as_ref(), show_partners).await
        }
        AppCommand::Exchange(request) => cli::exchange::run(&config.exchange, &request),
        AppCommand::Dashboard { date } => {
            let repository = build_repository(&config.providers)?;
            let today = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            cli::dashboard::run(repository.as_ref(), today).await
        }
    }
}
