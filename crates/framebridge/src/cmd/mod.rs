use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod render;
pub mod replay;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the overlay a URL would be shown in.
    Render(RenderArgs),
    /// Feed recorded frame messages through a messenger session.
    Replay(ReplayArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Render(args) => render::run(args, format),
        Command::Replay(args) => replay::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Overlay geometry shared by commands that open a frame.
#[derive(Args, Debug, Default)]
pub struct SizingArgs {
    /// Wrapper width as a CSS length.
    #[arg(long)]
    pub width: Option<String>,
    /// Wrapper height as a CSS length.
    #[arg(long)]
    pub height: Option<String>,
    /// Wrapper top offset as a CSS length.
    #[arg(long)]
    pub top: Option<String>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Absolute URL to load in the frame.
    pub url: String,
    #[command(flatten)]
    pub sizing: SizingArgs,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Absolute URL whose origin the session is pinned to.
    pub url: String,
    /// JSON Lines file of `{"origin": ..., "data": ...}` events.
    pub events: PathBuf,
    /// Message kinds to register handlers for (repeatable).
    #[arg(long = "kind", value_name = "KIND")]
    pub kinds: Vec<String>,
    /// Origin of the simulated host page.
    #[arg(long, value_name = "ORIGIN")]
    pub host_origin: Option<String>,
    /// Directory of `<kind>.schema.json` files to validate messages against.
    #[arg(long, value_name = "DIR")]
    pub schemas: Option<PathBuf>,
    #[command(flatten)]
    pub sizing: SizingArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
