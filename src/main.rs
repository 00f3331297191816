//! Binary entrypoint for the `navmark` CLI.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("NAVMARK_LOG")
                .unwrap_or_else(|_| EnvFilter::new("navmark=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Recording is handled in commands::dispatch via NAVMARK_RECORD=<dir>.
    match navmark::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
