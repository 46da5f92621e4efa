use clap::Parser;
use log::info;

mod config;
mod round;

use config::DriverConfig;
use round::RoundDriver;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DriverConfig::parse();
    info!(
        "Driving {} round(s): v1={} v2={} rule={} direct={}",
        config.rounds, config.v1, config.v2, config.rule, config.direct
    );

    let mut driver = RoundDriver::new(config);
    let outcomes = driver.run().await?;

    let total_steps: usize = outcomes.iter().map(|outcome| outcome.steps).sum();
    info!("=== Rounds Complete ===");
    for outcome in &outcomes {
        info!("Round {}: votes {:?}", outcome.round, outcome.votes);
    }
    info!("Total steps: {}", total_steps);
    if let Some(last) = outcomes.last() {
        info!("Final layout: {:?}", last.layout);
    }
    info!("Terminal: {}", driver.state().is_terminal());

    Ok(())
}
