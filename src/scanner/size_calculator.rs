use std::path::Path;
use walkdir::WalkDir;

/// Calculate total size of a directory recursively.
///
/// Only regular files count. Symbolic links are neither followed nor summed,
/// and entries that cannot be read are skipped. A missing path or a plain file
/// yields 0.
pub fn calculate_dir_size(dir: &Path) -> u64 {
    if !dir.is_dir() {
        return 0;
    }

    WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|metadata| metadata.len())
        .sum()
}
