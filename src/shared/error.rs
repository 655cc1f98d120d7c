use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes let scripts tell a permission problem apart from a
/// misuse of the stream lifecycle or an environment failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Application error not raised by a stream (configuration, etc.)
    ApplicationError = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Read or write access to a target path was not granted
    AccessDenied = 3,
    /// An operation was called on a stream that has not been set up
    StreamNotReady = 4,
    /// Environment-level failure (open, close, encode, decode, I/O)
    Fatal = 5,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::ApplicationError => write!(f, "Application Error (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::AccessDenied => write!(f, "Access Denied (3)"),
            ExitCode::StreamNotReady => write!(f, "Stream Not Ready (4)"),
            ExitCode::Fatal => write!(f, "Fatal Error (5)"),
        }
    }
}

/// Kind of access requested by a permission pre-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessMode::Read => write!(f, "read"),
            AccessMode::Write => write!(f, "write"),
        }
    }
}

/// The four stream slots held by a `StreamManager`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    TextWriter,
    TextReader,
    ObjectWriter,
    ObjectReader,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::TextWriter => write!(f, "writer"),
            StreamKind::TextReader => write!(f, "reader"),
            StreamKind::ObjectWriter => write!(f, "objectWriter"),
            StreamKind::ObjectReader => write!(f, "objectReader"),
        }
    }
}

/// How serious a `StreamError` is.
///
/// Callers that only care about one tier can match on this instead of
/// enumerating every fatal variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The pre-check refused access before any stream was opened
    Permission,
    /// The stream was never set up (or was already closed)
    NotReady,
    /// The environment failed underneath an otherwise valid call
    Fatal,
}

/// Errors raised by stream setup, I/O and teardown.
///
/// Uses thiserror to derive Display and Error. Wrapped `io::Error`s are
/// exposed through `source()` so the CLI can print the cause chain.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Access to {mode} has not been granted: {path}\n\n💡 Hint: Check that the path exists (or its parent directory does) and that you have {mode} permission")]
    AccessDenied { mode: AccessMode, path: PathBuf },

    #[error("Stream {stream} has not been set up")]
    StreamNotReady { stream: StreamKind },

    #[error("Cannot open {path} for {mode}")]
    OpenFailed {
        path: PathBuf,
        mode: AccessMode,
        #[source]
        source: io::Error,
    },

    #[error("Cannot close stream {stream}")]
    CloseFailed {
        stream: StreamKind,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read from stream {stream}")]
    ReadFailed {
        stream: StreamKind,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write to stream {stream}")]
    WriteFailed {
        stream: StreamKind,
        #[source]
        source: io::Error,
    },

    #[error("Value cannot be encoded as an object record\nDetails: {details}")]
    NotEncodable { details: String },

    #[error("Malformed object stream\nDetails: {details}")]
    MalformedRecord { details: String },

    #[error("Stream {stream} exceeded the read limit of {limit} bytes\n\n💡 Hint: Raise max_read_bytes in the configuration file")]
    ReadLimitExceeded { stream: StreamKind, limit: u64 },
}

impl StreamError {
    pub fn severity(&self) -> Severity {
        match self {
            StreamError::AccessDenied { .. } => Severity::Permission,
            StreamError::StreamNotReady { .. } => Severity::NotReady,
            _ => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Exit code the CLI reports for this error
    pub fn exit_code(&self) -> ExitCode {
        match self.severity() {
            Severity::Permission => ExitCode::AccessDenied,
            Severity::NotReady => ExitCode::StreamNotReady,
            Severity::Fatal => ExitCode::Fatal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::AccessDenied.as_i32(), 3);
        assert_eq!(ExitCode::StreamNotReady.as_i32(), 4);
        assert_eq!(ExitCode::Fatal.as_i32(), 5);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(format!("{}", ExitCode::AccessDenied), "Access Denied (3)");
        assert_eq!(format!("{}", ExitCode::Fatal), "Fatal Error (5)");
    }

    #[test]
    fn test_stream_kind_display_names() {
        assert_eq!(StreamKind::TextWriter.to_string(), "writer");
        assert_eq!(StreamKind::TextReader.to_string(), "reader");
        assert_eq!(StreamKind::ObjectWriter.to_string(), "objectWriter");
        assert_eq!(StreamKind::ObjectReader.to_string(), "objectReader");
    }

    #[test]
    fn test_access_denied_display() {
        let error = StreamError::AccessDenied {
            mode: AccessMode::Write,
            path: PathBuf::from("/test/output.txt"),
        };
        let display = format!("{}", error);
        assert!(display.contains("Access to write has not been granted"));
        assert!(display.contains("/test/output.txt"));
        assert!(display.contains("💡 Hint:"));
    }

    #[test]
    fn test_stream_not_ready_display() {
        let error = StreamError::StreamNotReady {
            stream: StreamKind::TextWriter,
        };
        assert_eq!(format!("{}", error), "Stream writer has not been set up");
    }

    #[test]
    fn test_severity_tiers() {
        let denied = StreamError::AccessDenied {
            mode: AccessMode::Read,
            path: PathBuf::from("x"),
        };
        let not_ready = StreamError::StreamNotReady {
            stream: StreamKind::ObjectReader,
        };
        let fatal = StreamError::NotEncodable {
            details: "nope".to_string(),
        };

        assert_eq!(denied.severity(), Severity::Permission);
        assert_eq!(not_ready.severity(), Severity::NotReady);
        assert_eq!(fatal.severity(), Severity::Fatal);
        assert!(fatal.is_fatal());
        assert!(!denied.is_fatal());

        assert_eq!(denied.exit_code(), ExitCode::AccessDenied);
        assert_eq!(not_ready.exit_code(), ExitCode::StreamNotReady);
        assert_eq!(fatal.exit_code(), ExitCode::Fatal);
    }

    #[test]
    fn test_open_failed_exposes_source() {
        let error = StreamError::OpenFailed {
            path: PathBuf::from("/test/file.txt"),
            mode: AccessMode::Read,
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(format!("{}", error).contains("Cannot open /test/file.txt for read"));
        let source = error.source().unwrap();
        assert!(source.to_string().contains("no such file"));
    }
}
