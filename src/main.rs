// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::io::Write;
use std::path::PathBuf;

use crate::app_config::Config;
use app_controller::{BuildJob, Controller};

mod app_config;
mod app_controller;
mod audio_probe;
mod document_selector;
mod epub_archive;
mod errors;
mod file_utils;
mod opf_editor;
mod overlay;
mod page_range;
mod sync_orchestrator;
mod timing_aligner;
mod timing_source;
mod word_tokenizer;
mod xhtml_document;

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
    /// Build a read-along EPUB from a source EPUB and a narration recording
    /// (default command)
    Build(BuildArgs),

    /// Generate shell completions for readalong
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Source EPUB file to process
    #[arg(value_name = "EPUB_PATH")]
    epub_path: PathBuf,

    /// Path to narration audio file
    #[arg(short, long)]
    audio_file: PathBuf,

    /// Path to audio timing file (one "start end" pair per line, seconds)
    #[arg(short, long)]
    timing_file: PathBuf,

    /// Path to CSS file appended to the book's stylesheet
    #[arg(short, long)]
    css_file: Option<PathBuf>,

    /// Page range to process. Separate individual pages with commas, use
    /// dash to indicate ranges (ex. 1,2,5-8)
    #[arg(short = 'r', long)]
    range: Option<String>,

    /// Output EPUB path (default: <source stem>_readalong.epub beside the
    /// source)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// readalong - EPUB read-along generator
///
/// Synchronizes a reflowable EPUB with its narration recording so every
/// word highlights as it is spoken.
#[derive(Parser, Debug)]
#[command(name = "readalong")]
#[command(version = "1.0.0")]
#[command(about = "EPUB read-along generator")]
#[command(long_about = "readalong wraps every word of an EPUB's visible text in an addressable span \
and emits SMIL media overlays aligning each word to the narration audio.

EXAMPLES:
    readalong book.epub -a narration.mp3 -t timings.txt
    readalong book.epub -a narration.mp3 -t timings.txt -r 1,2,5-8
    readalong book.epub -a narration.mp3 -t timings.txt -c highlight.css
    readalong --log-level debug book.epub -a narration.mp3 -t timings.txt
    readalong completions bash > readalong.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

TIMING FILE:
    One line per word of the selected text, in reading order, each holding the
    clip start and end in seconds separated by whitespace. Extra trailing lines
    are ignored; a shortfall aborts the build.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Source EPUB file to process
    #[arg(value_name = "EPUB_PATH")]
    epub_path: Option<PathBuf>,

    /// Path to narration audio file
    #[arg(short, long)]
    audio_file: Option<PathBuf>,

    /// Path to audio timing file (one "start end" pair per line, seconds)
    #[arg(short, long)]
    timing_file: Option<PathBuf>,

    /// Path to CSS file appended to the book's stylesheet
    #[arg(short, long)]
    css_file: Option<PathBuf>,

    /// Page range to process. Separate individual pages with commas, use
    /// dash to indicate ranges (ex. 1,2,5-8)
    #[arg(short = 'r', long)]
    range: Option<String>,

    /// Output EPUB path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: ANSI color code for log level
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
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "readalong", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Build(args)) => run_build(args),
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let epub_path = cli
                .epub_path
                .ok_or_else(|| anyhow!("EPUB_PATH is required when no subcommand is specified"))?;
            let audio_file = cli
                .audio_file
                .ok_or_else(|| anyhow!("--audio-file is required"))?;
            let timing_file = cli
                .timing_file
                .ok_or_else(|| anyhow!("--timing-file is required"))?;

            let build_args = BuildArgs {
                epub_path,
                audio_file,
                timing_file,
                css_file: cli.css_file,
                range: cli.range,
                output: cli.output,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_build(build_args)
        }
    }
}

fn run_build(options: BuildArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if std::path::Path::new(config_path).exists() {
        let mut config = Config::from_file(config_path)?;

        // Update log level in config if specified via command line
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        // Apply command line log level to default config if specified
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;
    let job = BuildJob {
        epub_path: options.epub_path,
        audio_path: options.audio_file,
        timing_path: options.timing_file,
        css_path: options.css_file,
        page_range: options.range,
        output_path: options.output,
    };

    let output_path = controller.run(&job)?;
    println!("{}", output_path.display());
    Ok(())
}
