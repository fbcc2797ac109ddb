use clap::Parser;
use log::info;
use statistics_service::config::ServiceConfig;
use statistics_service::network::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServiceConfig::parse();

    let server = Server::new(&config).await?;

    // Ctrl+C stops every stage cooperatively
    let shutdown = server.shutdown_handle();
    tokio::spawn(async move { shutdown.trigger_on(tokio::signal::ctrl_c()).await });

    let report = server.run().await?;

    info!(
        "Processed {} events from {} datagrams, dropped {} malformed lines, sent {} packets",
        report.receiver.events,
        report.receiver.datagrams,
        report.receiver.dropped,
        report.packets_sent
    );
    info!("Final standings:");
    for (index, standing) in report.standings.iter().enumerate() {
        info!(
            "{:>6}. user_id: {} amount: {}",
            index + 1,
            standing.user,
            standing.amount
        );
    }

    if let Some(path) = &config.standings_out {
        report.write_standings(path)?;
        info!("Wrote final standings to {}", path.display());
    }

    Ok(())
}
