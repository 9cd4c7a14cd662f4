use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

use service_locator::args::Args;
use service_locator::config::AppConfig;
use service_locator::handlers;
use service_locator::logging::{init_logging, parse_level};
use service_locator::services::{ConsoleLogger, Logger};
use service_locator::ServiceLocator;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path.clone()),
        None => AppConfig::load(),
    }
    .context("failed to load configuration")?;

    if let Some(level) = &args.log_level {
        config.logging.level = parse_level(level)?;
    }
    init_logging(&config.logging)?;

    let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger::stdout());
    if let Err(err) = handlers::run(args.command, &config, ServiceLocator::global(), logger) {
        tracing::error!(error = ?err, "Demo failed");
        println!("An error occurred: {}", err);
        std::process::exit(1);
    }

    Ok(())
}
