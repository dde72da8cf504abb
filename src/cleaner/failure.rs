use std::fmt;
use std::io;

#[cfg(windows)]
const DISK_FULL_CODES: &[i32] = &[39, 112];
#[cfg(not(windows))]
const DISK_FULL_CODES: &[i32] = &[28];

/// Classification of a failed filesystem step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    PermissionDenied,
    NotFound,
    DiskFull,
    Os,
    Unknown,
}

impl FailureKind {
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::NotFound => Self::NotFound,
            _ => match err.raw_os_error() {
                Some(code) => Self::from_os_code(code),
                None => Self::Unknown,
            },
        }
    }

    pub fn from_os_code(code: i32) -> Self {
        if DISK_FULL_CODES.contains(&code) {
            Self::DiskFull
        } else {
            Self::Os
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission denied",
            Self::NotFound => "not found",
            Self::DiskFull => "disk full",
            Self::Os => "OS error",
            Self::Unknown => "unknown error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A classified failure with the underlying error text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct Failure {
    pub kind: FailureKind,
    pub detail: String,
}

impl Failure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl From<io::Error> for Failure {
    fn from(err: io::Error) -> Self {
        Self::new(FailureKind::from_io(&err), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_kinds() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(FailureKind::from_io(&denied), FailureKind::PermissionDenied);

        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(FailureKind::from_io(&missing), FailureKind::NotFound);

        let custom = io::Error::new(io::ErrorKind::Other, "weird");
        assert_eq!(FailureKind::from_io(&custom), FailureKind::Unknown);
    }

    #[test]
    fn test_raw_os_codes() {
        let full = io::Error::from_raw_os_error(DISK_FULL_CODES[0]);
        assert_eq!(FailureKind::from_io(&full), FailureKind::DiskFull);

        // EEXIST / ERROR_FILE_EXISTS
        let exists = io::Error::from_raw_os_error(if cfg!(windows) { 80 } else { 17 });
        assert_eq!(FailureKind::from_io(&exists), FailureKind::Os);
    }

    #[test]
    fn test_failure_from_io_keeps_detail() {
        let failure = Failure::from(io::Error::new(io::ErrorKind::PermissionDenied, "locked"));
        assert_eq!(failure.kind, FailureKind::PermissionDenied);
        assert_eq!(failure.to_string(), "permission denied: locked");
    }
}
