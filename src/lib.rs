//! Navigation active-state resolution and tour catalog rendering for a
//! static tourism site.
//!
//! The resolver decides which navigation elements to highlight for the
//! current URL and applies the highlights through the
//! [`NavDocument`](ports::NavDocument) port. The `navmark` binary drives it
//! over YAML fixtures; the `web` feature drives it over the live DOM.

pub mod adapters;
pub mod cassette;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod nav;
pub mod ports;
pub mod script;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
/// Help and version requests print to stdout and succeed.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}
