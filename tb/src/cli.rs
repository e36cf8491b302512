//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// TaskBot - timed task scheduler with a chatbot on the side
#[derive(Parser)]
#[command(
    name = "tb",
    about = "Timed task scheduler with a text-classifier chatbot",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the web UI
    Serve {
        /// Listen address (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// List the task catalog
    Tasks,

    /// Run one task to completion, or reject it
    Run {
        /// Task name
        task: String,

        /// Reject the task instead of running it
        #[arg(short, long)]
        reject: bool,
    },

    /// Run the auto-scheduler for a while, printing log lines as they arrive
    Schedule {
        /// Seconds to keep the scheduler running
        #[arg(long = "for", value_name = "SECS", default_value = "20")]
        for_secs: u64,
    },

    /// Ask the chatbot a question
    Ask {
        /// Message text
        #[arg(default_value = "")]
        message: String,
    },

    /// Show the last lines of the log file
    Logs {
        /// Number of lines to show
        #[arg(short, long, default_value = "50")]
        lines: usize,
    },
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskbot")
        .join("logs")
        .join("taskbot.log");
    debug!(?path, "get_log_path: returning path");
    path
}
