mod bench;
mod sample;

use log::{LevelFilter, debug, error, info};
use rbrank_config::{Config, LogSettings, SampleMode};
use rbrank_tree::RankTree;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::env;
use std::fs::File;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    // An explicit path must exist; otherwise fall back to discovery.
    let config = match args.get(1) {
        Some(path) => Config::load_required(&PathBuf::from(path))?,
        None => Config::load()?,
    };
    initialize_logging(&config.log)?;
    debug!("effective configuration:\n{}", config.to_toml_string()?);
    info!(
        "sample mode {}, {} values",
        config.sample.mode,
        match config.sample.mode {
            SampleMode::Fixed => config.sample.values.len(),
            SampleMode::Random => config.sample.count,
        }
    );

    let samples = sample::generate(&config.sample);
    let mut tree = RankTree::create();

    let inserted = bench::insert_pass(&mut tree, &samples, &config.run).inspect_err(|e| {
        error!("invariant broken during insertion: {}", e);
    })?;

    if config.run.print_tree {
        bench::log_contents(&tree);
    }
    if !config.run.check_invariants {
        // still check once so a run without per-step checks reports something
        tree.validate()?;
    }

    let removed = bench::remove_pass(&mut tree, &samples, &config.run, config.sample.seed)
        .inspect_err(|e| {
            error!("invariant broken during removal: {}", e);
        })?;

    info!(
        "done: {} inserted, {} removed, tree empty: {}",
        inserted.succeeded,
        removed.succeeded,
        tree.is_empty()
    );
    Ok(())
}

fn level_filter(level: &str) -> LevelFilter {
    match level {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn initialize_logging(settings: &LogSettings) -> Result<(), Box<dyn std::error::Error>> {
    let level = level_filter(&settings.level);
    let log_config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        log_config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &settings.file {
        loggers.push(WriteLogger::new(level, log_config, File::create(path)?));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}
