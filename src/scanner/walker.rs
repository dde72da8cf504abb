use super::{
    calculate_dir_size, FolderDescriptor, FolderKind, DEFAULT_FOLDERS, LOCAL_DATA_ENV,
    PRODUCT_SUBPATH,
};
use crate::config::Config;
use crate::reporter::Reporter;
use crate::utils::{format_size, percent};
use std::env;
use std::path::{Path, PathBuf};

/// A location queued for measuring, before it gets an id.
#[derive(Debug)]
struct Candidate {
    name: String,
    path: PathBuf,
    kind: FolderKind,
}

/// Discovers product folders and measures their size.
///
/// Holds no state between scans; every call builds a fresh descriptor list.
#[derive(Debug, Clone)]
pub struct Scanner {
    /// Local application data root (None when it cannot be resolved)
    local_data_root: Option<PathBuf>,

    /// Product data directory relative to the root
    product_subpath: PathBuf,
}

impl Scanner {
    /// Create a scanner rooted at an explicit local data directory
    pub fn new(local_data_root: Option<PathBuf>) -> Self {
        Self {
            local_data_root,
            product_subpath: PRODUCT_SUBPATH.iter().collect(),
        }
    }

    /// Create a scanner rooted at `%LOCALAPPDATA%`
    pub fn from_env() -> Self {
        Self::new(local_data_root_from_env())
    }

    /// Create a scanner from config, falling back to the environment for the root
    pub fn from_config(config: &Config) -> Self {
        let root = config
            .local_data_root
            .clone()
            .or_else(local_data_root_from_env);
        Self::new(root).product_subpath(&config.product_subpath)
    }

    /// Set the product directory relative to the root
    pub fn product_subpath<P: AsRef<Path>>(mut self, subpath: P) -> Self {
        self.product_subpath = subpath.as_ref().to_path_buf();
        self
    }

    /// Base directory holding the fixed product folders
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.local_data_root
            .as_ref()
            .map(|root| root.join(&self.product_subpath))
    }

    /// Scan the fixed product folders, or `custom_paths` when any are given.
    ///
    /// Ids are assigned 1..=N in definition order (or input order for custom
    /// paths). Never fails: unresolvable inputs produce an empty list and an
    /// error log line.
    pub fn scan(
        &self,
        custom_paths: &[PathBuf],
        reporter: &mut Reporter<'_>,
    ) -> Vec<FolderDescriptor> {
        reporter.info("Initializing scan...");

        let (mode, candidates) = if custom_paths.is_empty() {
            let Some(base) = self.base_dir() else {
                reporter.error(&format!(
                    "Cannot resolve the {} environment variable.",
                    LOCAL_DATA_ENV
                ));
                reporter.progress(100.0);
                return Vec::new();
            };
            reporter.info(&format!("Scan base path: {}", base.display()));
            ("default product folders", default_candidates(&base))
        } else {
            let candidates = custom_candidates(custom_paths, reporter);
            if candidates.is_empty() {
                reporter.error("None of the provided custom paths is a valid directory.");
                reporter.progress(100.0);
                return Vec::new();
            }
            ("custom paths", candidates)
        };

        reporter.info(&format!("Scan mode: {}", mode));

        let total = candidates.len();
        let mut folders = Vec::with_capacity(total);
        let mut total_size = 0u64;

        for (idx, candidate) in candidates.into_iter().enumerate() {
            let id = idx + 1;
            let size = if candidate.path.is_dir() {
                reporter.info(&format!(
                    "{}. Scanning: {} ({})",
                    id,
                    candidate.name,
                    candidate.path.display()
                ));
                let size = calculate_dir_size(&candidate.path);
                reporter.info(&format!("   -> size: {}", format_size(size)));
                size
            } else {
                reporter.warning(&format!(
                    "{}. Not found or not a directory: {} ({})",
                    id,
                    candidate.name,
                    candidate.path.display()
                ));
                0
            };

            total_size = total_size.saturating_add(size);
            folders.push(FolderDescriptor::new(
                id,
                candidate.name,
                candidate.path,
                candidate.kind,
                size,
            ));
            reporter.progress(percent(id, total));
        }

        reporter.success(&format!(
            "Scan complete ({}). Found {} item(s), estimated total size: {}",
            mode,
            folders.len(),
            format_size(total_size)
        ));
        reporter.progress(100.0);

        folders
    }
}

fn local_data_root_from_env() -> Option<PathBuf> {
    env::var_os(LOCAL_DATA_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn default_candidates(base: &Path) -> Vec<Candidate> {
    DEFAULT_FOLDERS
        .iter()
        .map(|def| Candidate {
            name: def.name.to_string(),
            path: base.join(def.suffix),
            kind: def.kind,
        })
        .collect()
}

fn custom_candidates(paths: &[PathBuf], reporter: &mut Reporter<'_>) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for path in paths {
        if !path.is_dir() {
            reporter.warning(&format!(
                "Custom path '{}' is not a valid directory, skipped.",
                path.display()
            ));
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| path.display().to_string());
        candidates.push(Candidate {
            name,
            path: path.clone(),
            kind: FolderKind::Custom,
        });
    }
    candidates
}
