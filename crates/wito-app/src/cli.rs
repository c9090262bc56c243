use std::path::PathBuf;

use clap::Parser;

/// Wito: a native window hosting a web UI with a bidirectional host bridge.
#[derive(Parser, Debug)]
#[command(name = "wito", version, about)]
pub struct Args {
    /// Config file path override (TOML, or legacy `wito-config.json`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the app's HTML/JS/CSS.
    #[arg(long)]
    pub content: Option<PathBuf>,

    /// Log filter directive (e.g. `debug`, `wito=trace`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Enable devtools, payload logging, and reload on content changes.
    #[arg(long)]
    pub dev: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
