use crate::config::Config;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const HISTORY_DIRNAME: &str = "JianyingCleaner";
const HISTORY_FILENAME: &str = "cleanup_history.log";

/// One attempted cleanup action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub name: String,
    pub path: PathBuf,
    pub size: String,
    pub status: String,
    pub details: Option<String>,
}

impl HistoryEntry {
    pub fn new(
        name: &str,
        path: &Path,
        size: &str,
        status: impl Into<String>,
        details: Option<String>,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            name: name.to_string(),
            path: path.to_path_buf(),
            size: size.to_string(),
            status: status.into(),
            details: details.filter(|d| !d.is_empty()),
        }
    }

    /// Render as a single log line, without the trailing newline.
    pub fn to_line(&self) -> String {
        let mut line = format!(
            "[{}] 项目: {} ({}), 大小: {}, 状态: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.name,
            self.path.display(),
            self.size,
            self.status
        );
        if let Some(details) = &self.details {
            line.push_str(", 详情: ");
            line.push_str(details);
        }
        line
    }
}

/// Append-only text log of cleanup actions.
///
/// Safe for serialized calls only; concurrent writers may interleave lines.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
    enabled: bool,
}

impl HistoryLog {
    pub fn new(path: PathBuf, enabled: bool) -> Self {
        Self { path, enabled }
    }

    /// Build the log from config: an explicit file wins, otherwise the
    /// per-user data directory with the working directory as fallback.
    pub fn from_config(config: &Config) -> Self {
        let path = match &config.history.path {
            Some(path) => path.clone(),
            None => resolve_history_path(&default_history_dir(), &current_dir()),
        };
        Self::new(path, config.history.enabled)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &HistoryEntry) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create history directory: {}", parent.display())
                })?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open history log: {}", self.path.display()))?;

        writeln!(file, "{}", entry.to_line())
            .with_context(|| format!("Failed to write history log: {}", self.path.display()))?;
        Ok(())
    }

    /// Whole log as text, empty when nothing was recorded yet.
    pub fn read_to_string(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        }
    }

    /// Last `count` lines of the log.
    pub fn tail(&self, count: usize) -> Result<Vec<String>> {
        let content = self.read_to_string()?;
        let lines: Vec<String> = content.lines().map(str::to_string).collect();
        let skip = lines.len().saturating_sub(count);
        Ok(lines.into_iter().skip(skip).collect())
    }
}

/// Preferred history directory: `%LOCALAPPDATA%\JianyingCleaner`.
pub fn default_history_dir() -> PathBuf {
    std::env::var_os(crate::scanner::LOCAL_DATA_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(HISTORY_DIRNAME)
}

/// History file inside `preferred`, or inside `fallback` when `preferred`
/// cannot be created.
pub fn resolve_history_path(preferred: &Path, fallback: &Path) -> PathBuf {
    match fs::create_dir_all(preferred) {
        Ok(()) => preferred.join(HISTORY_FILENAME),
        Err(_) => fallback.join(HISTORY_FILENAME),
    }
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
