use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the request-rate monitor.
#[derive(Error, Debug)]
pub enum RpsError {
    /// The access log does not exist.
    #[error("Log file not found: {}", .0.display())]
    LogFileNotFound(PathBuf),

    /// The access log exists but the process may not read it.
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// Any other failure while opening or reading a log file.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Follow mode was requested on a source that cannot be tailed.
    #[error("Cannot use --follow with stdin input")]
    FollowRequiresFile,

    /// The follow source refused to report its position.
    #[error("Log source is not seekable: {0}")]
    NotSeekable(#[source] std::io::Error),

    /// Chart rendering or export failed.
    #[error("Render error: {0}")]
    Render(String),

    /// A JSON report could not be serialised.
    #[error("Failed to serialise JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RpsError {
    /// Classify an error returned by `File::open` for `path`.
    pub fn from_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => RpsError::LogFileNotFound(path),
            std::io::ErrorKind::PermissionDenied => RpsError::PermissionDenied(path),
            _ => RpsError::FileRead { path, source },
        }
    }
}

/// Convenience alias used throughout the rps crates.
pub type Result<T> = std::result::Result<T, RpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = RpsError::LogFileNotFound(PathBuf::from("/var/log/missing.log"));
        assert_eq!(err.to_string(), "Log file not found: /var/log/missing.log");
    }

    #[test]
    fn test_error_display_permission_denied() {
        let err = RpsError::PermissionDenied(PathBuf::from("/root/secret.log"));
        assert_eq!(err.to_string(), "Permission denied: /root/secret.log");
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = RpsError::FileRead {
            path: PathBuf::from("/some/access.log"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/access.log"));
        assert!(msg.contains("disk on fire"));
    }

    #[test]
    fn test_error_display_follow_requires_file() {
        assert_eq!(
            RpsError::FollowRequiresFile.to_string(),
            "Cannot use --follow with stdin input"
        );
    }

    #[test]
    fn test_from_open_classifies_kinds() {
        let not_found = std::io::Error::new(std::io::ErrorKind::NotFound, "nope");
        assert!(matches!(
            RpsError::from_open("/a", not_found),
            RpsError::LogFileNotFound(_)
        ));

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(
            RpsError::from_open("/a", denied),
            RpsError::PermissionDenied(_)
        ));

        let other = std::io::Error::new(std::io::ErrorKind::InvalidData, "nope");
        assert!(matches!(
            RpsError::from_open("/a", other),
            RpsError::FileRead { .. }
        ));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: RpsError = io_err.into();
        assert!(err.to_string().contains("pipe closed"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: RpsError = json_err.into();
        assert!(err.to_string().contains("Failed to serialise JSON"));
    }
}
