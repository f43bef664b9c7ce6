//! Interactive terminal front end for the stockroom desk.

pub mod error;
pub mod menu;
pub mod prompt;
pub mod render;
pub mod shell;

use std::io::{BufRead, Write};

use anyhow::Context;

use stockroom_infra::{FileDesk, StoreConfig};

pub use error::{ShellError, ShellResult};
pub use shell::Shell;

/// Open the files named in `config` and run one interactive session.
///
/// Returns an error only for unrecoverable failures: unreadable or corrupt
/// data files at startup, a failed save, or a broken terminal.
pub fn run(config: &StoreConfig, input: impl BufRead, output: impl Write) -> anyhow::Result<()> {
    let mut desk = FileDesk::open_files(config).context("failed to load data files")?;
    Shell::new(&mut desk, input, output)
        .run()
        .context("session ended abnormally")?;
    Ok(())
}
