//! Logging system configuration and initialization
//!
//! - Console output and/or a single log file per run
//! - The previous run's file is renamed with its timestamp, old files pruned
//! - Optional JSON format for the file layer
//! - `RUST_LOG` overrides the configured level entirely

#![allow(clippy::uninlined_format_args)]

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use chrono::Local;
use once_cell::sync::OnceCell;
use tracing::{Subscriber, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

/// Active log file name inside the log directory
pub const LOG_FILE_NAME: &str = "tires-parser.log";

// Keeps the non-blocking file writer flushing for the life of the process
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Dependencies whose debug output drowns the crawl log
const NOISY_TARGETS: [(&str, &str); 6] = [
    ("reqwest", "info"),
    ("hyper", "warn"),
    ("hyper_util", "warn"),
    ("h2", "warn"),
    ("html5ever", "warn"),
    ("selectors", "warn"),
];

struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

fn console_layer<S>(enabled: bool) -> Option<impl Layer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    enabled.then(|| {
        fmt::Layer::new()
            .with_writer(std::io::stdout)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
    })
}

/// Directory holding log files: `log_dir` from config, else `logs/` next to the executable
pub fn get_log_directory(config: &LoggingConfig) -> PathBuf {
    if let Some(dir) = &config.log_dir {
        return dir.clone();
    }

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    exe_dir.join("logs")
}

/// Initialize the logging system with default configuration
pub fn init_logging() -> Result<()> {
    init_logging_with_config(&LoggingConfig::default())
}

/// Filter for the configured level; dependency chatter is capped unless tracing
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    let mut filter = EnvFilter::try_new(level).map_err(|e| anyhow!("Invalid log level '{}': {}", level, e))?;

    if !level.to_lowercase().contains("trace") {
        for (target, cap) in NOISY_TARGETS {
            filter = filter.add_directive(format!("{target}={cap}").parse()?);
        }
        if !level.contains(['=', ',']) {
            filter = filter.add_directive(format!("tires_parser={}", level).parse()?);
        }
    }

    Ok(filter)
}

/// Initialize logging with custom configuration
///
/// Set `RUST_LOG` to bypass the configured level and the dependency caps:
/// ```bash
/// RUST_LOG="debug,reqwest=debug,hyper=debug" tires-parser crawl
/// ```
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.level)?,
    };
    let registry = Registry::default().with(env_filter);

    if !config.file_output {
        if !config.console_output {
            return Err(anyhow!("No logging output configured"));
        }
        registry
            .with(console_layer(true))
            .try_init()
            .map_err(|e| anyhow!("Failed to install subscriber: {}", e))?;
        info!("Logging initialized (console only), level: {}", config.level);
        return Ok(());
    }

    let log_dir = get_log_directory(config);
    std::fs::create_dir_all(&log_dir).map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;

    let rotated = rotate_existing_log_file(&log_dir, LOG_FILE_NAME)?;
    // One slot stays free for the file this run creates
    let removed = cleanup_old_logs(&log_dir, config.max_files.saturating_sub(1))?;

    let (file_writer, guard) = non_blocking(rolling::never(&log_dir, LOG_FILE_NAME));
    if LOG_GUARD.set(guard).is_err() {
        return Err(anyhow!("Logging already initialized"));
    }

    if config.json_format {
        let file_layer = fmt::Layer::new()
            .json()
            .with_writer(file_writer)
            .with_timer(LocalTimeFormatter)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false);
        registry
            .with(file_layer)
            .with(console_layer(config.console_output))
            .try_init()
            .map_err(|e| anyhow!("Failed to install subscriber: {}", e))?;
    } else {
        // time + level + message
        let file_layer = fmt::Layer::new()
            .with_writer(file_writer)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
            .with_ansi(false);
        registry
            .with(file_layer)
            .with(console_layer(config.console_output))
            .try_init()
            .map_err(|e| anyhow!("Failed to install subscriber: {}", e))?;
    }

    info!("Logging initialized, level: {}", config.level);
    info!("Log file: {:?}", log_dir.join(LOG_FILE_NAME));
    if let Some(name) = rotated {
        info!("Previous log kept as {}", name);
    }
    if removed > 0 {
        info!("Removed {} old log files (keeping {})", removed, config.max_files);
    }

    Ok(())
}

/// Log version and environment details at startup
pub fn log_system_info() {
    info!("=== Tires Parser v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Operating system: {} ({})", std::env::consts::OS, std::env::consts::ARCH);
    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {:?}", current_dir);
    }
}

/// Rename an existing `log_file_name` to `<stem>.<timestamp>.log`
///
/// Returns the new file name when a file was rotated.
fn rotate_existing_log_file(log_dir: &Path, log_file_name: &str) -> Result<Option<String>> {
    let log_file_path = log_dir.join(log_file_name);
    if !log_file_path.exists() {
        return Ok(None);
    }

    let metadata =
        std::fs::metadata(&log_file_path).map_err(|e| anyhow!("Failed to get log file metadata: {}", e))?;
    let file_time = metadata
        .modified()
        .or_else(|_| metadata.created())
        .unwrap_or_else(|_| std::time::SystemTime::now());
    let datetime: chrono::DateTime<Local> = file_time.into();

    let file_stem = log_file_name.trim_end_matches(".log");
    let mut timestamped_name = format!("{}.{}.log", file_stem, datetime.format("%Y%m%dT%H%M%S"));
    let mut suffix = 1;
    while log_dir.join(&timestamped_name).exists() {
        timestamped_name = format!("{}.{}-{}.log", file_stem, datetime.format("%Y%m%dT%H%M%S"), suffix);
        suffix += 1;
    }

    std::fs::rename(&log_file_path, log_dir.join(&timestamped_name)).map_err(|e| {
        anyhow!(
            "Failed to rotate log file {} to {}: {}",
            log_file_path.display(),
            timestamped_name,
            e
        )
    })?;

    Ok(Some(timestamped_name))
}

/// Delete the oldest `.log` files so at most `max_files` remain
fn cleanup_old_logs(log_dir: &Path, max_files: u32) -> Result<usize> {
    let mut log_files = Vec::new();

    for entry in std::fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_log = path.extension().is_some_and(|ext| ext == "log");
        if !is_log || !path.is_file() {
            continue;
        }
        if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
            log_files.push((path, modified));
        }
    }

    // Newest first
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    let mut removed = 0;
    for (path, _) in log_files.iter().skip(max_files as usize) {
        match std::fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => warn!("Failed to remove old log file {:?}: {}", path, e),
        }
    }

    Ok(removed)
}
