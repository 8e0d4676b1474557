/// Broad category of an [`AppError`].
///
/// The category decides the process exit code; the message carries the detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad command-line or environment input.
    Usage,
    /// A resource name that was never registered with the cache.
    UnknownResource,
    /// Connection, DNS or timeout failure while fetching.
    Transport,
    /// The remote answered with a non-success status.
    HttpStatus,
    /// Source data that fails shape or value validation.
    MalformedData,
    /// Local cache file could not be read or written.
    Io,
}

impl ErrorKind {
    fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Usage | ErrorKind::UnknownResource => 2,
            ErrorKind::MalformedData => 3,
            ErrorKind::Transport | ErrorKind::HttpStatus | ErrorKind::Io => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }

    /// Prefix the message with `prefix: `, keeping the kind.
    pub fn context(self, prefix: &str) -> Self {
        Self {
            kind: self.kind,
            message: format!("{prefix}: {}", self.message),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code())
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_prefixes_message_and_keeps_kind() {
        let err = AppError::new(ErrorKind::HttpStatus, "unexpected HTTP status: 404 Not Found")
            .context("cache")
            .context("database");
        assert_eq!(err.to_string(), "database: cache: unexpected HTTP status: 404 Not Found");
        assert_eq!(err.kind(), ErrorKind::HttpStatus);
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(AppError::new(ErrorKind::Usage, "x").exit_code(), 2);
        assert_eq!(AppError::new(ErrorKind::UnknownResource, "x").exit_code(), 2);
        assert_eq!(AppError::new(ErrorKind::MalformedData, "x").exit_code(), 3);
        assert_eq!(AppError::new(ErrorKind::Transport, "x").exit_code(), 4);
    }
}
