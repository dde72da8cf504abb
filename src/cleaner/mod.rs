mod failure;
mod recycler;
mod skeleton;

pub use failure::{Failure, FailureKind};
pub use recycler::{Recycler, SystemTrash};
pub use skeleton::{RestoreReport, Skeleton};

use crate::history::{HistoryEntry, HistoryLog};
use crate::reporter::Reporter;
use crate::scanner::FolderDescriptor;
use crate::utils::percent;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Result of a cleaning operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupOutcome {
    /// False once any target hit a failure
    pub overall_success: bool,

    /// Human-readable messages, one or more per failed target
    pub errors: Vec<String>,

    /// Targets moved to the recycle bin
    pub moved_count: usize,

    /// Main folders recreated after the move
    pub recreated_count: usize,

    /// Subfolders recreated inside recreated main folders
    pub recreated_subfolder_count: usize,
}

impl Default for CleanupOutcome {
    fn default() -> Self {
        Self {
            overall_success: true,
            errors: Vec::new(),
            moved_count: 0,
            recreated_count: 0,
            recreated_subfolder_count: 0,
        }
    }
}

impl CleanupOutcome {
    fn fail(&mut self, message: String) {
        self.errors.push(message);
        self.overall_success = false;
    }

    /// Every recreation failure counts against the run, whatever its kind.
    fn main_folder_failed(&mut self, name: &str, kind: FailureKind) {
        self.fail(format!(
            "Recreating main folder '{}' failed: {}",
            name,
            main_folder_reason(kind)
        ));
    }

    fn subfolder_failed(&mut self, name: &str, rel: &Path, kind: FailureKind) -> String {
        let message = format!(
            "Recreating subfolder '{}' of '{}' failed: {}",
            rel.display(),
            name,
            subfolder_reason(kind)
        );
        self.fail(message.clone());
        message
    }
}

/// Moves selected folders to the recycle bin and rebuilds their empty
/// directory tree in place.
///
/// Every step is best effort: a successful move is never rolled back when a
/// later recreation step fails. Failures end up in the outcome, never as a
/// returned error.
pub struct Cleaner<R: Recycler = SystemTrash> {
    recycler: R,
    history: HistoryLog,
}

impl Cleaner<SystemTrash> {
    /// Create a cleaner backed by the system recycle bin
    pub fn new(history: HistoryLog) -> Self {
        Self::with_recycler(SystemTrash, history)
    }
}

impl<R: Recycler> Cleaner<R> {
    pub fn with_recycler(recycler: R, history: HistoryLog) -> Self {
        Self { recycler, history }
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Clean `targets` in order, recording one history entry per target.
    pub fn clean(
        &self,
        targets: &[FolderDescriptor],
        reporter: &mut Reporter<'_>,
    ) -> CleanupOutcome {
        let mut outcome = CleanupOutcome::default();

        if targets.is_empty() {
            reporter.info("No folders selected for cleanup.");
            reporter.progress(100.0);
            return outcome;
        }

        reporter.info("Starting cleanup of selected folders...");
        let total = targets.len();

        for (idx, target) in targets.iter().enumerate() {
            let path = target.path();
            if path.is_dir() {
                self.clean_directory(target, &mut outcome, reporter);
            } else if path.exists() {
                self.clean_file(target, &mut outcome, reporter);
            } else {
                reporter.warning(&format!(
                    "  -> Skipped: '{}' ({}) does not exist or was already removed.",
                    target.name(),
                    path.display()
                ));
                self.record(target, "skipped: missing", None, reporter);
            }
            reporter.progress(percent(idx + 1, total));
        }

        if outcome.moved_count > 0 {
            reporter.info(&format!(
                "Cleanup finished. {} item(s) moved to the recycle bin.",
                outcome.moved_count
            ));
            if outcome.recreated_count > 0 {
                reporter.info(&format!(
                    "{} main folder(s) recreated in place.",
                    outcome.recreated_count
                ));
            }
            if outcome.recreated_subfolder_count > 0 {
                reporter.info(&format!(
                    "{} subfolder(s) recreated in place.",
                    outcome.recreated_subfolder_count
                ));
            }
        } else if outcome.errors.is_empty() {
            reporter.info("All selected items were missing or empty, nothing was cleaned.");
        } else {
            reporter.info("Nothing was moved to the recycle bin.");
        }

        reporter.progress(100.0);

        if !outcome.errors.is_empty() {
            reporter.warning(&format!(
                "Cleanup ran into {} problem(s). See the details above.",
                outcome.errors.len()
            ));
        }

        outcome
    }

    fn clean_directory(
        &self,
        target: &FolderDescriptor,
        outcome: &mut CleanupOutcome,
        reporter: &mut Reporter<'_>,
    ) {
        let name = target.name();
        let path = target.path();

        // Capture the tree first; it is gone once the move succeeds.
        let (skeleton, walk_errors) = Skeleton::capture(path);
        for err in walk_errors {
            reporter.warning(&format!(
                "Error while collecting the subfolders of '{}': {}",
                name, err
            ));
        }

        reporter.info(&format!(
            "Moving '{}' ({}) to the recycle bin...",
            name,
            path.display()
        ));

        if let Err(failure) = self.recycler.recycle(path) {
            let reason = move_reason(failure.kind);
            let message = format!(
                "Moving '{}' ({}) to the recycle bin failed ({}): {}",
                name,
                path.display(),
                reason,
                failure.detail
            );
            reporter.error(&format!("  -> {}", message));
            outcome.fail(format!(
                "Cleaning '{}' failed: {}",
                name,
                with_unknown_detail(reason, &failure)
            ));
            self.record(
                target,
                &format!("failed: {}, could not move to recycle bin", reason),
                Some(message),
                reporter,
            );
            return;
        }

        reporter.success(&format!("  -> '{}' moved to the recycle bin.", name));
        outcome.moved_count += 1;

        if let Err(err) = fs::create_dir_all(path) {
            let kind = FailureKind::from_io(&err);
            let message = format!(
                "Recreating empty folder '{}' ({}) failed: {}",
                name,
                path.display(),
                err
            );
            reporter.error(&format!("  -> {}", message));
            outcome.main_folder_failed(name, kind);
            self.record(
                target,
                "moved, but main folder recreation failed",
                Some(message),
                reporter,
            );
            return;
        }

        reporter.success(&format!("  -> Recreated empty folder '{}' in place.", name));
        outcome.recreated_count += 1;

        let mut details = None;
        if !skeleton.is_empty() {
            reporter.info(&format!(
                "  -> Recreating the subfolder structure of '{}'...",
                name
            ));
            let report = skeleton.restore(path);
            let mut problems = Vec::new();
            for (rel, err) in &report.failures {
                let kind = FailureKind::from_io(err);
                reporter.error(&format!(
                    "    -> Recreating subfolder '{}' failed ({}): {}",
                    path.join(rel).display(),
                    kind,
                    err
                ));
                problems.push(outcome.subfolder_failed(name, rel, kind));
            }
            outcome.recreated_subfolder_count += report.created;
            reporter.info(&format!(
                "  -> Recreated {} of {} subfolder(s) for '{}'.",
                report.created,
                skeleton.len(),
                name
            ));
            if !problems.is_empty() {
                details = Some(format!(
                    "subfolder recreation problems: {}",
                    problems.join("; ")
                ));
            }
        }

        self.record(
            target,
            "moved to recycle bin and recreated main folder",
            details,
            reporter,
        );
    }

    fn clean_file(
        &self,
        target: &FolderDescriptor,
        outcome: &mut CleanupOutcome,
        reporter: &mut Reporter<'_>,
    ) {
        let name = target.name();
        let path = target.path();

        reporter.info(&format!(
            "Moving file '{}' ({}) to the recycle bin...",
            name,
            path.display()
        ));

        match self.recycler.recycle(path) {
            Ok(()) => {
                reporter.success(&format!("  -> File '{}' moved to the recycle bin.", name));
                outcome.moved_count += 1;
                self.record(target, "moved file to recycle bin", None, reporter);
            }
            Err(failure) => {
                let reason = file_reason(failure.kind);
                let message = format!(
                    "Moving file '{}' ({}) to the recycle bin failed ({}): {}",
                    name,
                    path.display(),
                    reason,
                    failure.detail
                );
                reporter.error(&format!("  -> {}", message));
                outcome.fail(format!(
                    "Cleaning file '{}' failed: {}",
                    name,
                    with_unknown_detail(reason, &failure)
                ));
                self.record(
                    target,
                    &format!("failed (file): {}", reason),
                    Some(message),
                    reporter,
                );
            }
        }
    }

    /// History write failures are reported and swallowed.
    fn record(
        &self,
        target: &FolderDescriptor,
        status: &str,
        details: Option<String>,
        reporter: &mut Reporter<'_>,
    ) {
        let entry = HistoryEntry::new(
            target.name(),
            target.path(),
            target.size_display(),
            status,
            details,
        );
        if let Err(err) = self.history.append(&entry) {
            reporter.critical(&format!(
                "Cannot write cleanup history to {}: {:#}",
                self.history.path().display(),
                err
            ));
        }
    }
}

fn move_reason(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::PermissionDenied => "permission denied",
        FailureKind::NotFound => "file not found",
        FailureKind::DiskFull => "not enough space for the recycle bin",
        FailureKind::Os => "OS error",
        FailureKind::Unknown => "unknown error",
    }
}

fn main_folder_reason(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::PermissionDenied => "permission denied",
        FailureKind::Unknown => "unknown error",
        FailureKind::NotFound | FailureKind::DiskFull | FailureKind::Os => "OS error",
    }
}

fn subfolder_reason(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::PermissionDenied => "permission denied",
        FailureKind::NotFound => "path problem",
        FailureKind::Unknown => "unknown error",
        FailureKind::DiskFull | FailureKind::Os => "OS error",
    }
}

fn file_reason(kind: FailureKind) -> &'static str {
    main_folder_reason(kind)
}

/// Unknown failures carry the underlying error text.
fn with_unknown_detail(reason: &str, failure: &Failure) -> String {
    match failure.kind {
        FailureKind::Unknown => format!("{} ({})", reason, failure.detail),
        _ => reason.to_string(),
    }
}
