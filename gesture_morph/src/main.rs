//! gesture_morph — interactive entry point.

use anyhow::Result;
use clap::Parser;
use log::info;

use gesture_morph::app::run;
use gesture_morph::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = cli.log_level() {
        logger.filter_level(level);
    }
    logger.init();

    let cfg = cli.config();
    match &cfg.replay {
        Some(path) => info!("mode: replay {}", path.display()),
        None       => info!("mode: keyboard simulation (keys 0-5)"),
    }

    run(cfg)?;
    Ok(())
}
