//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Camera preview and still capture in the terminal
#[derive(Parser, Debug)]
#[command(name = "camsnap")]
#[command(version, about = "Select a camera, preview it, capture stills as PNG data URLs", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Camera device id to open on start (from list-devices)
    #[arg(long, short)]
    pub device: Option<String>,

    /// Preview width in terminal cells
    #[arg(long)]
    pub width: Option<u16>,

    /// Preview height in terminal cells
    #[arg(long)]
    pub height: Option<u16>,

    /// Append captured data URLs to this file (one per line)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available camera devices
    ListDevices,
}
