//! Legacy error policy for the one-shot operations.
//!
//! Under the legacy policy a failed write or copy prints the error and
//! terminates the process, a failed read prints the error and yields
//! `None`, and setup calls tolerate open failures (see
//! `OpenFailureMode::Warn`). These functions are the only place in the
//! library that exits the process; prefer `OneShot` everywhere else.

use crate::ports::outbound::ProgressReporter;
use crate::shared::error::StreamError;
use crate::stream::manager::{OpenFailureMode, StreamOptions};
use crate::stream::one_shot::OneShot;
use serde::Deserialize;
use std::path::Path;
use std::process;

/// How one-shot failures reach the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Every failure comes back as a typed `StreamError`
    #[default]
    Propagate,
    /// Write/copy failures exit the process, read failures yield `None`
    Legacy,
}

impl ErrorPolicy {
    /// Adjusts `options` to this policy; legacy setup tolerates open failures
    pub fn apply(self, options: StreamOptions) -> StreamOptions {
        match self {
            ErrorPolicy::Propagate => options,
            ErrorPolicy::Legacy => StreamOptions {
                open_failure: OpenFailureMode::Warn,
                ..options
            },
        }
    }
}

impl std::str::FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "propagate" => Ok(ErrorPolicy::Propagate),
            "legacy" => Ok(ErrorPolicy::Legacy),
            _ => Err(format!(
                "Invalid error policy: {}. Please specify 'propagate' or 'legacy'",
                s
            )),
        }
    }
}

fn exit_with(error: &StreamError) -> ! {
    eprintln!("{}", error);
    process::exit(error.exit_code().as_i32())
}

/// Writes `content` to `path`, terminating the process on any failure
pub fn write_text_or_exit(one_shot: &OneShot, path: impl AsRef<Path>, content: &str, append: bool) {
    if let Err(e) = one_shot.write_text(path, content, append) {
        exit_with(&e);
    }
}

/// Reads `path`, printing the error and returning `None` on any failure
pub fn read_all_text_or_none(one_shot: &OneShot, path: impl AsRef<Path>) -> Option<String> {
    match one_shot.read_all_text_from(path) {
        Ok(content) => Some(content),
        Err(e) => {
            eprintln!("{}", e);
            None
        }
    }
}

/// Copies `input` to `output`, terminating the process on any failure
pub fn copy_to_new_file_or_exit<R: ProgressReporter + ?Sized>(
    one_shot: &OneShot,
    output: impl AsRef<Path>,
    append: bool,
    input: impl AsRef<Path>,
    reporter: &R,
) -> usize {
    match one_shot.copy_to_new_file(output, append, input, reporter) {
        Ok(copied) => copied,
        Err(e) => exit_with(&e),
    }
}
