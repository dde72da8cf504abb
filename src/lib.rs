pub mod cleaner;
pub mod cli;
pub mod config;
pub mod disk;
pub mod history;
pub mod reporter;
pub mod scanner;
pub mod utils;

// Re-export commonly used types
pub use cleaner::{Cleaner, CleanupOutcome};
pub use config::Config;
pub use disk::free_space;
pub use history::{HistoryEntry, HistoryLog};
pub use reporter::{LogLevel, Reporter};
pub use scanner::{FolderDescriptor, FolderKind, Scanner};
