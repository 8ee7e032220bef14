use azure_vpn_p2s::config::{Cli, Settings};
use azure_vpn_p2s::output::print_report;
use clap::Parser;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    let cli = Cli::parse();
    log4rs::init_file(&cli.log_config, Default::default())
        .map_err(|e| format!("Error initializing log4rs from {}: {e}", cli.log_config.display()))?;
    dotenv::dotenv().ok();
    //
    log::info!("#Start main()");

    let settings = Settings::from_env()?;
    log::debug!("{settings:?}");

    let report = azure_vpn_p2s::run(&cli, &settings).await.map_err(|e| {
        log::error!("{e}");
        e
    })?;
    print_report(&report);

    Ok(())
}
