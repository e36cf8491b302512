//! TaskBot - timed task scheduler with a chatbot on the side
//!
//! CLI entry point for the web UI and the terminal commands.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use taskbot::app::App;
use taskbot::cli::{Cli, Command, get_log_path};
use taskbot::config::Config;
use taskbot::domain::RunOutcome;
use taskbot::session::SessionEvent;
use taskbot::web;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskbot")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    // Append so `tb logs` can read what an earlier `tb serve` wrote
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("taskbot.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(tasks = config.tasks.len(), bind = %config.web.bind, "TaskBot loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None => {
            debug!("main: no command, defaulting to Serve");
            cmd_serve(config, None).await
        }
        Some(Command::Serve { bind }) => {
            debug!(?bind, "main: matched Serve command");
            cmd_serve(config, bind).await
        }
        Some(Command::Tasks) => {
            debug!("main: matched Tasks command");
            cmd_tasks(&config)
        }
        Some(Command::Run { task, reject }) => {
            debug!(%task, reject, "main: matched Run command");
            cmd_run(config, &task, !reject).await
        }
        Some(Command::Schedule { for_secs }) => {
            debug!(for_secs, "main: matched Schedule command");
            cmd_schedule(config, Duration::from_secs(for_secs)).await
        }
        Some(Command::Ask { message }) => {
            debug!("main: matched Ask command");
            cmd_ask(config, &message)
        }
        Some(Command::Logs { lines }) => {
            debug!(lines, "main: matched Logs command");
            cmd_logs(lines)
        }
    }
}

/// Serve the web UI
async fn cmd_serve(config: Config, bind: Option<String>) -> Result<()> {
    debug!(?bind, "cmd_serve: called");
    let bind = bind.unwrap_or_else(|| config.web.bind.clone());
    let app = App::new(config)?;
    web::serve(app, &bind).await
}

/// Print the task catalog
fn cmd_tasks(config: &Config) -> Result<()> {
    debug!("cmd_tasks: called");
    let catalog = config.catalog().context("Invalid task catalog")?;
    let buffer = config.scheduler.buffer_units;

    println!("{:<16} {:>8} {:>8}", "TASK".bold(), "DURATION".bold(), "PERIOD".bold());
    for task in catalog.tasks() {
        println!(
            "{:<16} {:>8} {:>8}",
            task.name,
            task.duration,
            u64::from(task.duration) + u64::from(buffer)
        );
    }
    Ok(())
}

/// Run a single task in the foreground
async fn cmd_run(config: Config, task: &str, accept: bool) -> Result<()> {
    debug!(%task, accept, "cmd_run: called");
    let app = App::new(config)?;

    let show = |progress: f64| {
        print!("\r{}: {:>3.0}%", task, progress * 100.0);
        let _ = std::io::stdout().flush();
    };
    let outcome = app.executor().execute_by_name(task, accept, Some(&show)).await;
    if accept {
        println!();
    }

    for entry in app.session().drain().await? {
        println!("{}", entry.to_string().dimmed());
    }
    app.shutdown().await?;

    match outcome.context("Task run failed")? {
        RunOutcome::Completed { task } => {
            println!("{} {}", "✓".green(), task);
        }
        RunOutcome::Rejected {
            response,
            rejections,
            warning,
            ..
        } => {
            println!("{} {}", "AI says:".cyan(), response);
            if warning {
                println!("{}", web::warning_text(rejections).yellow());
            }
        }
    }
    Ok(())
}

/// Run the auto-scheduler for a fixed time, echoing log lines live
async fn cmd_schedule(config: Config, run_for: Duration) -> Result<()> {
    debug!(?run_for, "cmd_schedule: called");
    let app = App::new(config)?;
    let mut events = app.session().subscribe_events();

    app.scheduler().start().await?;
    println!("Scheduler running for {}s (Ctrl+C to stop early)", run_for.as_secs());

    let deadline = tokio::time::sleep(run_for);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => {
                debug!("cmd_schedule: deadline reached");
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("cmd_schedule: interrupted");
                break;
            }
            event = events.recv() => match event {
                Ok(event) => print_event(&event),
                Err(RecvError::Lagged(n)) => debug!(n, "cmd_schedule: lagged"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    app.scheduler().stop().await?;
    println!("Waiting for in-flight runs to finish...");
    app.scheduler().wait_stopped().await;

    while let Ok(event) = events.try_recv() {
        print_event(&event);
    }
    app.shutdown().await
}

fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::Logged(entry) => println!("{}", entry),
        SessionEvent::RejectionWarning { rejections } => {
            println!("{}", web::warning_text(*rejections).yellow());
        }
        SessionEvent::Progress { .. } => {}
    }
}

/// Ask the chatbot one question
fn cmd_ask(config: Config, message: &str) -> Result<()> {
    debug!("cmd_ask: called");
    let classifier = config.model.load_classifier()?;
    let reply = textclass::reply(&classifier, message)?;
    println!("{}", reply);
    Ok(())
}

/// Show the last lines of the log file
fn cmd_logs(lines: usize) -> Result<()> {
    debug!(lines, "cmd_logs: called");
    let log_path = get_log_path();

    if !log_path.exists() {
        debug!(?log_path, "cmd_logs: log file does not exist");
        println!("No log file found at: {}", log_path.display());
        return Ok(());
    }

    let file = fs::File::open(&log_path).context("Failed to open log file")?;
    let reader = BufReader::new(file);
    let all_lines: Vec<String> = reader.lines().map_while(Result::ok).collect();

    let start = all_lines.len().saturating_sub(lines);
    for line in &all_lines[start..] {
        println!("{}", line);
    }

    Ok(())
}
