use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use textclass::cli::{Cli, Command};
use textclass::config::Config;
use textclass::{ArtifactClassifier, Reply, reply};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(path) = cli.vectorizer {
        config.model.vectorizer_path = path;
    }
    if let Some(path) = cli.model {
        config.model.model_path = path;
    }

    info!("textclass starting");
    let classifier = config.model.load_classifier()?;

    match cli.command {
        Command::Ask { message } => {
            print_reply(&classifier, &message)?;
        }
        Command::Chat => chat(&classifier)?,
        Command::Info => {
            println!("Vectorizer: {}", config.model.vectorizer_path.display().to_string().cyan());
            println!("Model: {}", config.model.model_path.display().to_string().cyan());
            println!("  Vocabulary: {}", classifier.vocabulary_size());
            let (lo, hi) = classifier.ngram_range();
            println!("  N-grams: {}..={}", lo, hi);
            println!("  Classes: {}", classifier.classes().len());
            for class in classifier.classes() {
                println!("    {}", class);
            }
        }
    }

    Ok(())
}

fn print_reply(classifier: &ArtifactClassifier, message: &str) -> Result<()> {
    match reply(classifier, message)? {
        Reply::Prompt => println!("{}", textclass::EMPTY_PROMPT.yellow()),
        Reply::Response(label) => println!("{} {}", "Bot Response:".green(), label),
    }
    Ok(())
}

fn chat(classifier: &ArtifactClassifier) -> Result<()> {
    println!("{}", "AI Chatbot".bright_cyan().bold());
    println!("Ctrl+D to quit");

    let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
    loop {
        match rl.readline(&format!("{} ", ">".bright_green())) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.trim());
                }
                print_reply(classifier, &line)?;
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(err) => {
                return Err(eyre::eyre!("Readline error: {}", err));
            }
        }
    }
    Ok(())
}
