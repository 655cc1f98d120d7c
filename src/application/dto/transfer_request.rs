use std::path::PathBuf;

/// Where a read takes its text from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    File(PathBuf),
    Stdin,
}

/// TransferRequest - one-shot text operation requested by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferRequest {
    /// Write `content` plus a line terminator to `path`
    Write {
        path: PathBuf,
        content: String,
        append: bool,
    },
    /// Read all text from `source`
    Read { source: TextSource },
    /// Copy `input` to `output` verbatim
    Copy {
        input: PathBuf,
        output: PathBuf,
        append: bool,
    },
}

impl TransferRequest {
    pub fn write(path: impl Into<PathBuf>, content: impl Into<String>, append: bool) -> Self {
        TransferRequest::Write {
            path: path.into(),
            content: content.into(),
            append,
        }
    }

    pub fn read(source: TextSource) -> Self {
        TransferRequest::Read { source }
    }

    pub fn copy(input: impl Into<PathBuf>, output: impl Into<PathBuf>, append: bool) -> Self {
        TransferRequest::Copy {
            input: input.into(),
            output: output.into(),
            append,
        }
    }
}
