use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory tree of a folder, captured before the folder is recycled.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    /// Subdirectories relative to the root, parents before children
    relative_dirs: Vec<PathBuf>,
}

/// Result of restoring a skeleton under a root.
#[derive(Debug, Default)]
pub struct RestoreReport {
    pub created: usize,
    pub failures: Vec<(PathBuf, io::Error)>,
}

impl Skeleton {
    /// Record every subdirectory under `root`. Symlinks to directories are
    /// recorded as plain directories but not descended into. Walk errors are
    /// returned alongside the partial skeleton.
    pub fn capture(root: &Path) -> (Self, Vec<walkdir::Error>) {
        let mut relative_dirs = Vec::new();
        let mut errors = Vec::new();

        for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    errors.push(err);
                    continue;
                }
            };
            let is_dir = entry.file_type().is_dir()
                || (entry.path_is_symlink() && entry.path().is_dir());
            if !is_dir {
                continue;
            }
            if let Ok(rel) = entry.path().strip_prefix(root) {
                relative_dirs.push(rel.to_path_buf());
            }
        }

        (Self { relative_dirs }, errors)
    }

    pub fn len(&self) -> usize {
        self.relative_dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relative_dirs.is_empty()
    }

    pub fn relative_dirs(&self) -> &[PathBuf] {
        &self.relative_dirs
    }

    /// Recreate every recorded subdirectory under `root`. Each creation is
    /// idempotent and independent: one failure does not stop the rest.
    pub fn restore(&self, root: &Path) -> RestoreReport {
        let mut report = RestoreReport::default();
        for rel in &self.relative_dirs {
            match fs::create_dir_all(root.join(rel)) {
                Ok(()) => report.created += 1,
                Err(err) => report.failures.push((rel.clone(), err)),
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_capture_and_restore_tree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("Cache");
        fs::create_dir_all(root.join("a").join("b")).unwrap();
        fs::create_dir_all(root.join("c")).unwrap();
        fs::write(root.join("a").join("file.txt"), "x").unwrap();

        let (skeleton, errors) = Skeleton::capture(&root);
        assert!(errors.is_empty());
        assert_eq!(skeleton.len(), 3);
        let a_pos = skeleton
            .relative_dirs()
            .iter()
            .position(|p| p == Path::new("a"))
            .unwrap();
        let ab_pos = skeleton
            .relative_dirs()
            .iter()
            .position(|p| p == &Path::new("a").join("b"))
            .unwrap();
        assert!(a_pos < ab_pos);

        fs::remove_dir_all(&root).unwrap();
        fs::create_dir(&root).unwrap();

        let report = skeleton.restore(&root);
        assert_eq!(report.created, 3);
        assert!(report.failures.is_empty());
        assert!(root.join("a").join("b").is_dir());
        assert!(root.join("c").is_dir());
        assert!(!root.join("a").join("file.txt").exists());
    }

    #[test]
    fn test_restore_continues_after_failure() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("Log");
        fs::create_dir_all(root.join("blocked")).unwrap();
        fs::create_dir_all(root.join("fine")).unwrap();
        let (skeleton, _) = Skeleton::capture(&root);

        fs::remove_dir_all(&root).unwrap();
        fs::create_dir(&root).unwrap();
        fs::write(root.join("blocked"), "a file in the way").unwrap();

        let report = skeleton.restore(&root);
        assert_eq!(report.created, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, PathBuf::from("blocked"));
        assert!(root.join("fine").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_subdir_is_captured_but_not_followed() {
        let temp = TempDir::new().unwrap();
        let outside = temp.path().join("outside");
        fs::create_dir_all(outside.join("deep")).unwrap();
        let root = temp.path().join("Cache");
        fs::create_dir_all(root.join("real")).unwrap();
        std::os::unix::fs::symlink(&outside, root.join("linked")).unwrap();
        std::os::unix::fs::symlink(outside.join("missing"), root.join("dangling")).unwrap();

        let (skeleton, errors) = Skeleton::capture(&root);
        assert!(errors.is_empty());
        let mut captured = skeleton.relative_dirs().to_vec();
        captured.sort();
        assert_eq!(captured, vec![PathBuf::from("linked"), PathBuf::from("real")]);

        fs::remove_dir_all(&root).unwrap();
        fs::create_dir(&root).unwrap();

        let report = skeleton.restore(&root);
        assert_eq!(report.created, 2);
        let linked = root.join("linked");
        assert!(linked.is_dir());
        assert!(!fs::symlink_metadata(&linked).unwrap().file_type().is_symlink());
        assert!(!linked.join("deep").exists());
    }

    #[test]
    fn test_empty_folder_has_empty_skeleton() {
        let temp = TempDir::new().unwrap();
        let (skeleton, errors) = Skeleton::capture(temp.path());
        assert!(skeleton.is_empty());
        assert!(errors.is_empty());
    }
}
