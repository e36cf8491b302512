//! CLI argument parsing for textclass

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tc")]
#[command(author, version, about = "Chat with a pre-trained text classifier", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the vectorizer artifact path
    #[arg(long)]
    pub vectorizer: Option<PathBuf>,

    /// Override the model artifact path
    #[arg(long)]
    pub model: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a response for one message
    Ask {
        /// Message text (may be empty)
        #[arg(default_value = "")]
        message: String,
    },

    /// Interactive prompt, one response per line
    Chat,

    /// Show a summary of the loaded artifacts
    Info,
}
