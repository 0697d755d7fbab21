use std::fs::OpenOptions;
use std::path::Path;
use std::sync::mpsc::channel;

use clap::Parser;
use log::{error, info, LevelFilter};
use simplelog::{Config as LogConfig, WriteLogger};

use loadgraph::app::LoadGraphApplication;
use loadgraph::config::{Cli, Config};
use loadgraph::triggers::TriggersEmitter;

fn main() {
    let config = Config::from(Cli::parse());

    setup_panic_logging();
    init_logging(&config.log_file, config.log_level);

    info!("Starting with {:?}", config);

    let (tx, rx) = channel();
    TriggersEmitter::launch_async(tx);

    let app_ret = LoadGraphApplication::new(rx, &config);

    match app_ret {
        Err(e) => error!("{:?}", e),
        Ok(app) => {
            if let Err(e) = app.run() {
                error!("{:?}", e);
            }
        }
    };
}

fn setup_panic_logging() {
    // As panics are erased by the application exiting, log the panic as an error
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |info| {
        error!("Panic occured: {:?}", info);
        default_hook(info);
    }))
}

fn init_logging(log_file: &Path, level: LevelFilter) {
    let log_file = OpenOptions::new()
        .write(true)
        .append(true)
        .create(true)
        .open(log_file)
        .expect("Could not open log file");

    WriteLogger::init(level, LogConfig::default(), log_file).expect("Could not initialize logging");
}
