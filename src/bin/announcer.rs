use std::sync::Arc;

use rozhlas::announcer::{Announcer, NullSink, RealtimeClient, SoundCache, SoundFetcher};
use rozhlas::common::logger;
use rozhlas::config::Config;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    logger::init(&config.logging);

    let fetcher = Arc::new(SoundFetcher::new(&config.sounds));
    let cache = Arc::new(SoundCache::new(fetcher));
    let announcer = Arc::new(Announcer::new(cache, Arc::new(NullSink)));

    info!(
        "announcer for event {} starting, hub at {}",
        config.announcer.event_id, config.announcer.hub_url
    );
    let mut client = RealtimeClient::new(config.announcer.clone(), Arc::clone(&announcer));

    tokio::select! {
        _ = client.run() => {}
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }
    announcer.shutdown();
    Ok(())
}
