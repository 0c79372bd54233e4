//! Console logger for the `arcana` binary.
//!
//! Info goes to stdout, warnings and errors to stderr with colored prefixes.
//! An optional log file receives every line with ANSI codes stripped.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use owo_colors::OwoColorize;
use owo_colors::Stream::{Stderr, Stdout};

use crate::CliError;

pub(crate) struct CliLogger {
    level: LevelFilter,
    timestamps: bool,
    file: Option<Mutex<File>>,
}

impl CliLogger {
    pub(crate) fn new(quiet: bool, verbose: bool, file: Option<File>) -> Self {
        let level = if verbose {
            LevelFilter::Debug
        } else if quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        };
        Self {
            level,
            timestamps: verbose,
            file: file.map(Mutex::new),
        }
    }

    fn format_line(&self, record: &Record) -> String {
        let prefix = match record.level() {
            Level::Error => format!("{} ", "error:".if_supports_color(Stderr, |t| t.red())),
            Level::Warn => format!("{} ", "warning:".if_supports_color(Stderr, |t| t.yellow())),
            Level::Info => String::new(),
            Level::Debug | Level::Trace => {
                format!("{} ", "debug:".if_supports_color(Stdout, |t| t.dimmed()))
            }
        };
        if self.timestamps {
            format!(
                "[{}] {}{}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                prefix,
                record.args()
            )
        } else {
            format!("{}{}", prefix, record.args())
        }
    }
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.level {
            return false;
        }
        // Debug output from dependencies is noise.
        metadata.level() <= Level::Info || metadata.target().starts_with("arcana")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format_line(record);

        match record.level() {
            Level::Error | Level::Warn => eprintln!("{line}"),
            _ => println!("{line}"),
        }

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{}", strip_ansi_escapes::strip_str(&line));
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

/// Install the CLI logger as the global `log` backend.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let file = match logfile {
        Some(path) => Some(File::create(path).map_err(|e| {
            CliError::other(format!("Failed to create log file {}: {}", path.display(), e))
        })?),
        None => None,
    };
    let logger = CliLogger::new(quiet, verbose, file);
    let level = logger.level;
    log::set_boxed_logger(Box::new(logger))
        .map_err(|e| CliError::other(format!("Failed to install logger: {}", e)))?;
    log::set_max_level(level);
    Ok(())
}

/// Print an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}
