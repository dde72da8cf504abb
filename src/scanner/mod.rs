mod layout;
mod size_calculator;
mod walker;

pub use layout::{FolderDefinition, DEFAULT_FOLDERS, LOCAL_DATA_ENV, PRODUCT_SUBPATH};
pub use size_calculator::calculate_dir_size;
pub use walker::Scanner;

use crate::utils::format_size;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a folder is interesting. Drives warning policy only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderKind {
    Cache,
    Log,
    Project,
    Preset,
    Custom,
}

impl FolderKind {
    /// Returns the color code for CLI display
    pub fn color(&self) -> &'static str {
        match self {
            Self::Cache => "green",
            Self::Log => "blue",
            Self::Project => "cyan",
            Self::Preset => "red",
            Self::Custom => "magenta",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Log => "log",
            Self::Project => "project",
            Self::Preset => "preset",
            Self::Custom => "custom",
        }
    }

    /// Presets hold user-made templates; deleting them needs an extra confirmation.
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, Self::Preset)
    }
}

impl fmt::Display for FolderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One discovered or user-specified location.
///
/// Built fresh by every scan and never mutated afterwards; the display size is
/// derived from the byte count at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderDescriptor {
    id: usize,
    name: String,
    path: PathBuf,
    size_bytes: u64,
    size_display: String,
    kind: FolderKind,
}

impl FolderDescriptor {
    pub fn new(
        id: usize,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        kind: FolderKind,
        size_bytes: u64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            path: path.into(),
            size_bytes,
            size_display: format_size(size_bytes),
            kind,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Returns a human-readable size string
    pub fn size_display(&self) -> &str {
        &self.size_display
    }

    pub fn kind(&self) -> FolderKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_display_matches_bytes() {
        let folder = FolderDescriptor::new(3, "Cache", "/tmp/Cache", FolderKind::Cache, 2048);
        assert_eq!(folder.id(), 3);
        assert_eq!(folder.size_bytes(), 2048);
        assert_eq!(folder.size_display(), "2.00 KB");
    }

    #[test]
    fn test_only_presets_need_confirmation() {
        assert!(FolderKind::Preset.needs_confirmation());
        assert!(!FolderKind::Cache.needs_confirmation());
        assert!(!FolderKind::Custom.needs_confirmation());
    }

    #[test]
    fn test_descriptor_json_uses_snake_case_kind() {
        let folder = FolderDescriptor::new(1, "VELog", "/x/VELog", FolderKind::Log, 10);
        let json = serde_json::to_value(&folder).unwrap();
        assert_eq!(json["kind"], "log");
        assert_eq!(json["size_display"], "10 B");
    }
}
