use std::sync::Arc;

use anyhow::{Context, bail};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hero_client::{ActionGateway, ClientConfig, HttpGateway, RemoteAuthority};

/// Checks that the authority is reachable and optionally prints a leaderboard.
///
/// Usage: `hero-ping [leaderboard [cohort]]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hero_client=debug")),
        )
        .init();

    let config = ClientConfig::from_env().context("reading configuration")?;
    let gateway: Arc<dyn ActionGateway> = Arc::new(HttpGateway::from_config(&config)?);
    let authority = RemoteAuthority::new(gateway);

    let args: Vec<String> = std::env::args().skip(1).collect();

    tokio::select! {
        result = run(&authority, &args) => result,
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, stopping");
            Ok(())
        }
    }
}

async fn run(authority: &RemoteAuthority, args: &[String]) -> anyhow::Result<()> {
    info!("Pinging authority...");
    if !authority.ping().await {
        bail!("authority did not answer the ping");
    }
    info!("Authority is reachable");

    match args.first().map(String::as_str) {
        None => Ok(()),
        Some("leaderboard") => {
            let cohort = args.get(1).map(String::as_str);
            let rows = authority
                .get_leaderboard_data(cohort)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            let board = hero_core::Leaderboard::from_rows(rows, cohort.map(str::to_string));
            for entry in board.entries() {
                println!(
                    "{:>3}. {} {} (level {}, {} exp)",
                    entry.rank, entry.row.base_appearance, entry.row.display_name, entry.row.level, entry.row.experience
                );
            }
            Ok(())
        }
        Some(other) => bail!("unknown command '{other}'"),
    }
}
