// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::Path;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, TranslationProvider};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod hash_store;
mod language_utils;
mod loc_file;
mod providers;
mod scanner;
mod sync;
mod translation;
mod workshop;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    DeepL,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::DeepL => TranslationProvider::DeepL,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Synchronize localization files into the target languages (default command)
    #[command(alias = "translate")]
    Sync(RunArgs),

    /// Translate workshop page title/description files
    Workshop(RunArgs),

    /// Generate shell completions for pdxloc
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Clone)]
struct RunArgs {
    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Source language folder (e.g. 'english')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language folder, repeatable (e.g. '-t french -t german')
    #[arg(short, long = "target-language")]
    target_languages: Vec<String>,

    /// Drop stored fingerprints first, re-translating everything
    #[arg(short, long)]
    force: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// pdxloc - Paradox Mod Localization Sync
///
/// Keeps per-language localization trees of a mod project in sync with the
/// source language through a machine-translation provider, re-translating
/// only what changed.
#[derive(Parser, Debug)]
#[command(name = "pdxloc")]
#[command(version = "1.0.0")]
#[command(about = "Incremental localization sync for mod projects")]
#[command(long_about = "pdxloc walks the source-language localization folder and produces every \
configured target language, translating only lines whose source text changed.

EXAMPLES:
    pdxloc                               # Sync using conf.json
    pdxloc sync -t french -t german      # Sync two languages only
    pdxloc sync --force                  # Re-translate everything
    pdxloc sync -p ollama                # Use the local Ollama server
    pdxloc workshop                      # Translate workshop page texts
    pdxloc completions bash > pdxloc.bash

MARKERS:
    KEY: \"text\" # NO_TRANSLATE          line is copied verbatim
    # NO_TRANSLATE BELOW / # NO_TRANSLATE END   region copied verbatim
    KEY: \"texte\" # LOCK                 (in a target file) never overwritten

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file
    doesn't exist, a default one is created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default;
    // the level is updated after the config is loaded.
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "pdxloc", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Sync(args)) => run(args, Workflow::Sync).await,
        Some(Commands::Workshop(args)) => run(args, Workflow::Workshop).await,
        // Default behavior - run a sync with the top-level args
        None => run(cli.run, Workflow::Sync).await,
    }
}

enum Workflow {
    Sync,
    Workshop,
}

async fn run(options: RunArgs, workflow: Workflow) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        let mut config = Config::from_file(config_path)?;

        // Override config with CLI options if provided
        if let Some(provider) = &options.provider {
            config.translation.provider = provider.clone().into();
        }
        if let Some(source_lang) = &options.source_language {
            config.source_language = source_lang.clone();
        }
        if !options.target_languages.is_empty() {
            config.target_languages = options.target_languages.clone();
        }
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }
        config.save(config_path)?;
        return Err(anyhow!(
            "Wrote a default config to '{}'. Fill in your provider credentials and run again.",
            config_path
        ));
    };

    // Validate the configuration after loading and overriding
    config.validate()?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let controller = Controller::with_config(config)?;
    match workflow {
        Workflow::Sync => controller.run_sync(options.force).await,
        Workflow::Workshop => controller.run_workshop(options.force).await,
    }
}
