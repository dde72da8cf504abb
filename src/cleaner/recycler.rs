use super::failure::{Failure, FailureKind};
use std::path::Path;

/// Moves a path into a reversible OS-level trash.
pub trait Recycler {
    fn recycle(&self, path: &Path) -> Result<(), Failure>;
}

/// The platform recycle bin (Windows Recycle Bin, macOS Trash, freedesktop trash).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTrash;

impl Recycler for SystemTrash {
    fn recycle(&self, path: &Path) -> Result<(), Failure> {
        trash::delete(path).map_err(classify_trash_error)
    }
}

fn classify_trash_error(err: trash::Error) -> Failure {
    let detail = err.to_string();
    let kind = match &err {
        #[cfg(all(
            unix,
            not(target_os = "macos"),
            not(target_os = "ios"),
            not(target_os = "android")
        ))]
        trash::Error::FileSystem { source, .. } => FailureKind::from_io(source),
        trash::Error::Os { code, .. } => FailureKind::from_os_code(*code),
        trash::Error::CouldNotAccess { .. } => FailureKind::PermissionDenied,
        trash::Error::CanonicalizePath { .. } => FailureKind::NotFound,
        _ => FailureKind::Unknown,
    };
    Failure::new(kind, detail)
}
