use clap::Parser;
use generator::config::GeneratorConfig;
use generator::event_generator::EventGenerator;
use generator::generate;
use generator::sink::EventSink;
use log::{info, warn};
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GeneratorConfig::parse();
    let settings = config.settings()?;

    let mut generator = match config.seed {
        Some(seed) => EventGenerator::from_seed(seed, settings),
        None => EventGenerator::from_entropy(settings),
    };

    let mut sink = match config.target {
        Some(target) => {
            info!("Sending events to {}", target);
            EventSink::udp(target, config.delay()).await?
        }
        None => {
            info!("Writing events to {}", config.output.display());
            EventSink::file(&config.output).await?
        }
    };

    let started = Instant::now();

    tokio::select! {
        result = generate(&mut generator, &mut sink, config.until(), config.max_events) => {
            let written = result?;
            info!("Generated {} events in {:.2?}", written, started.elapsed());
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, stopping generation");
        }
    }

    sink.flush().await?;
    Ok(())
}
