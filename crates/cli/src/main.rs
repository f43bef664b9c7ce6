//! `stockroom`: interactive inventory tracker.
//!
//! Reads `users.json` and `inventory.json` from the working directory
//! (creating them on first run) and serves a login menu on stdin/stdout.
//! Diagnostics go to stderr, filtered by `RUST_LOG`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;
use std::process::ExitCode;

use stockroom_infra::StoreConfig;

fn main() -> ExitCode {
    stockroom_observability::init();

    let config = StoreConfig::default();
    let stdin = io::stdin();
    let stdout = io::stdout();

    match stockroom_cli::run(&config, stdin.lock(), stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
