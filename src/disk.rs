use crate::reporter::Reporter;
use std::path::{Component, Path, PathBuf};

/// Free bytes on the volume containing `path`, logging failures to the console.
pub fn free_space(path: &Path) -> Option<u64> {
    free_space_reported(path, &mut Reporter::new())
}

/// Free bytes on the volume containing `path`.
///
/// Returns `None` instead of failing when the path cannot be resolved, the
/// volume root is unreachable, or the query itself fails. The result is
/// advisory only.
pub fn free_space_reported(path: &Path, reporter: &mut Reporter<'_>) -> Option<u64> {
    let absolute = match std::path::absolute(path) {
        Ok(p) => p,
        Err(err) => {
            reporter.error(&format!(
                "Failed to resolve '{}' for a free space check: {}",
                path.display(),
                err
            ));
            return None;
        }
    };

    let root = volume_root(&absolute);
    if !root.exists() {
        reporter.warning(&format!(
            "Cannot determine the volume '{}' of path '{}'.",
            root.display(),
            path.display()
        ));
        return None;
    }

    // Query the deepest existing ancestor so nested mount points are honored.
    let probe = absolute
        .ancestors()
        .find(|p| p.exists())
        .unwrap_or(root.as_path());

    match fs2::available_space(probe) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            reporter.error(&format!(
                "Failed to read free space of volume '{}': {}",
                root.display(),
                err
            ));
            None
        }
    }
}

/// Whether moving `required` bytes may not fit into `free` bytes.
pub fn space_shortfall(free: u64, required: u64) -> bool {
    free < required
}

/// Drive prefix plus root separator, e.g. `C:\` or `/`.
fn volume_root(absolute: &Path) -> PathBuf {
    let mut root = PathBuf::new();
    for comp in absolute.components() {
        match comp {
            Component::Prefix(_) | Component::RootDir => root.push(comp.as_os_str()),
            _ => break,
        }
    }
    root
}
