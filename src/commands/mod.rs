//! Command dispatch and handlers.

pub mod resolve;
pub mod rules;
pub mod session;
pub mod tours;

use std::env;
use std::path::PathBuf;

use crate::adapters::memory::MemoryDocument;
use crate::cassette::session::{RecordingSession, RECORD_ENV};
use crate::cli::Command;
use crate::context::RunContext;
use crate::nav::Mark;

/// Dispatch a parsed command to its handler.
///
/// When `NAVMARK_RECORD` is set to a directory path, every element write is
/// recorded to a cassette in a timestamped directory under it.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let (ctx, session) = match env::var(RECORD_ENV) {
        Ok(path) if !path.is_empty() => {
            let (ctx, session) =
                RunContext::recording_at(PathBuf::from(path), &source(command))?;
            (ctx, Some(session))
        }
        _ => (RunContext::live(), None),
    };

    let result = dispatch_with_context(command, &ctx);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given run context.
fn dispatch_with_context(command: &Command, ctx: &RunContext) -> Result<(), String> {
    match command {
        Command::Resolve { nav, url, config } => resolve::run(ctx, nav, url, config.as_deref()),
        Command::Session { nav, script, expect, config } => {
            session::run(ctx, nav, script, expect.as_deref(), config.as_deref())
        }
        Command::Tours { catalog, url } => tours::run(catalog, url),
        Command::Rules { config } => rules::run(config.as_deref()),
    }
}

/// What a recording captured, stored in the cassette header.
fn source(command: &Command) -> String {
    match command {
        Command::Resolve { nav, url, .. } => format!("resolve {} {url}", nav.display()),
        Command::Session { nav, script, .. } => {
            format!("session {} {}", nav.display(), script.display())
        }
        Command::Tours { catalog, url } => format!("tours {} {url}", catalog.display()),
        Command::Rules { .. } => "rules".to_string(),
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

/// One output line for an applied mark.
pub(crate) fn format_mark(doc: &MemoryDocument, mark: &Mark) -> String {
    let line = format!("{:<9} {}", mark.annotation.as_str(), doc.describe(mark.element));
    match mark.promoted_from {
        Some(link) => format!("{line} (promoted from {link})"),
        None => line,
    }
}
