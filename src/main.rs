mod cli;
mod config;
mod confirm;
mod engine;
mod ingest;
mod model;
mod storage;

use std::process;

use config::Config;
use storage::Storage;

fn main() {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let root = config.data_dir.clone().or_else(Storage::default_root);
    let Some(root) = root else {
        eprintln!("Could not determine home directory.");
        process::exit(1);
    };

    let storage = match Storage::open(root) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to open storage: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(&config, storage) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
