use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::thread;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use treasure_hunt::config::Settings;
use treasure_hunt::episode::{Episode, Outcome};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load(config_path.as_deref())?;
    info!(?settings, "Configuration loaded");

    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for number in 1..=settings.episodes {
        info!(episode = number, "Starting episode");
        let mut episode = Episode::new(&settings, &mut rng)?;
        println!("{}", episode.render());

        if episode.outcome() == Outcome::NoPath {
            continue;
        }

        thread::sleep(settings.first_tick());
        let outcome = episode.run(|ep| {
            println!("{}", ep.render());
            thread::sleep(settings.tick());
        })?;

        match outcome {
            Outcome::Reached { steps } => info!(episode = number, steps, "Agent found the treasure in {} steps", steps),
            other => warn!(episode = number, ?other, "Episode ended without reaching the treasure"),
        }
    }

    Ok(())
}
