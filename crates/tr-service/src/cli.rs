//! Command-line interface

use std::path::PathBuf;

use clap::Parser;

/// Headless-browser bearer-token extraction service.
#[derive(Debug, Parser)]
#[command(name = "tokenrelay", version, about)]
pub struct Cli {
    /// Path to the settings file (default: the per-user settings location)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Listening host override
    #[arg(long)]
    pub host: Option<String>,

    /// Listening port override (also settable via the PORT environment
    /// variable)
    #[arg(long)]
    pub port: Option<u16>,

    /// Chrome/Chromium executable override (also settable via
    /// TOKENRELAY_CHROME)
    #[arg(long)]
    pub chrome: Option<PathBuf>,
}
