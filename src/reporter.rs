use colored::Colorize;
use std::fmt;

/// Severity attached to every log line the engine emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Returns the color name for CLI display
    pub fn color(&self) -> &'static str {
        match self {
            Self::Info => "white",
            Self::Success => "green",
            Self::Warning => "yellow",
            Self::Error | Self::Critical => "red",
        }
    }

    /// Render `message` as a `[LEVEL] message` line colored for a terminal.
    pub fn paint(&self, message: &str) -> String {
        let tag = format!("[{}]", self.as_str());
        let tag = match self.color() {
            "green" => tag.green(),
            "yellow" => tag.yellow(),
            "red" => tag.red(),
            _ => tag.dimmed(),
        };
        let tag = if *self == Self::Critical { tag.bold() } else { tag };
        format!("{} {}", tag, message)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type LogFn<'a> = Box<dyn FnMut(&str, LogLevel) + 'a>;
type ProgressFn<'a> = Box<dyn FnMut(f64) + 'a>;

/// Log and progress sinks injected by the caller.
///
/// Both sinks are invoked synchronously on the calling thread. Without a log
/// sink, lines go to stderr; without a progress sink, progress is dropped.
#[derive(Default)]
pub struct Reporter<'a> {
    log: Option<LogFn<'a>>,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> Reporter<'a> {
    /// Reporter that prints log lines to the console and ignores progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reporter that discards everything.
    pub fn quiet() -> Self {
        Self::new().with_log(|_, _| {})
    }

    pub fn with_log(mut self, sink: impl FnMut(&str, LogLevel) + 'a) -> Self {
        self.log = Some(Box::new(sink));
        self
    }

    pub fn with_progress(mut self, sink: impl FnMut(f64) + 'a) -> Self {
        self.progress = Some(Box::new(sink));
        self
    }

    pub fn log(&mut self, message: &str, level: LogLevel) {
        match self.log.as_mut() {
            Some(sink) => sink(message, level),
            None => eprintln!("{}", level.paint(message)),
        }
    }

    pub fn info(&mut self, message: &str) {
        self.log(message, LogLevel::Info);
    }

    pub fn success(&mut self, message: &str) {
        self.log(message, LogLevel::Success);
    }

    pub fn warning(&mut self, message: &str) {
        self.log(message, LogLevel::Warning);
    }

    pub fn error(&mut self, message: &str) {
        self.log(message, LogLevel::Error);
    }

    pub fn critical(&mut self, message: &str) {
        self.log(message, LogLevel::Critical);
    }

    /// Report progress in percent (0..=100).
    pub fn progress(&mut self, percent: f64) {
        if let Some(sink) = self.progress.as_mut() {
            sink(percent.clamp(0.0, 100.0));
        }
    }
}
