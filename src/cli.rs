//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `navmark`.
#[derive(Debug, Parser)]
#[command(
    name = "navmark",
    version,
    about = "Resolve navigation highlights and render tour pages for a static site"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve the active navigation elements for one URL.
    Resolve {
        /// YAML navigation fixture.
        #[arg(long)]
        nav: PathBuf,
        /// Absolute page URL.
        #[arg(long)]
        url: String,
        /// Site configuration file (defaults to `NAVMARK_CONFIG`).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Drive a page session through a script of host events.
    Session {
        /// YAML navigation fixture.
        #[arg(long)]
        nav: PathBuf,
        /// YAML event script.
        #[arg(long)]
        script: PathBuf,
        /// Recorded cassette every element write must match.
        #[arg(long)]
        expect: Option<PathBuf>,
        /// Site configuration file (defaults to `NAVMARK_CONFIG`).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Render the tour listing for a page URL.
    Tours {
        /// Tour catalog (YAML, or JSON by extension).
        #[arg(long)]
        catalog: PathBuf,
        /// Absolute page URL carrying `category` and `tour` parameters.
        #[arg(long)]
        url: String,
    },
    /// Print the effective section rule table.
    Rules {
        /// Site configuration file (defaults to `NAVMARK_CONFIG`).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
