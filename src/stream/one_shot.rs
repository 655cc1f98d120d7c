//! One-shot convenience operations.
//!
//! Each call builds a fresh `StreamManager`, performs a single operation
//! and closes everything again. If the operation fails, dropping the
//! manager still releases whatever was opened.

use crate::ports::outbound::ProgressReporter;
use crate::shared::StreamResult;
use crate::stream::manager::{StreamManager, StreamOptions};
use std::path::Path;

const COPY_STEPS: usize = 3;

/// Runs one-shot operations with a fixed set of `StreamOptions`
#[derive(Debug, Clone, Copy, Default)]
pub struct OneShot {
    options: StreamOptions,
}

impl OneShot {
    pub fn new(options: StreamOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &StreamOptions {
        &self.options
    }

    fn manager(&self) -> StreamManager {
        StreamManager::with_options(self.options)
    }

    /// Writes `content` plus a line terminator to `path`
    pub fn write_text(&self, path: impl AsRef<Path>, content: &str, append: bool) -> StreamResult<()> {
        let mut manager = self.manager();
        manager.setup_text_writer(path, append)?;
        manager.write_text(content)?;
        manager.close_all()
    }

    /// Reads the whole of `path` as text, one `\n` per line
    pub fn read_all_text_from(&self, path: impl AsRef<Path>) -> StreamResult<String> {
        let mut manager = self.manager();
        manager.setup_text_reader(path)?;
        let content = manager.read_all_text()?;
        manager.close_all()?;
        Ok(content)
    }

    /// Reads standard input to the end, one `\n` per line
    pub fn read_all_text_from_stdin(&self) -> StreamResult<String> {
        let mut manager = self.manager();
        manager.setup_text_reader_for_stdin();
        let content = manager.read_all_text()?;
        manager.close_all()?;
        Ok(content)
    }

    /// Copies `input` to `output` byte for byte and returns the number of
    /// bytes copied. The input is never decoded, so any encoding survives.
    pub fn copy_to_new_file<R: ProgressReporter + ?Sized>(
        &self,
        output: impl AsRef<Path>,
        append: bool,
        input: impl AsRef<Path>,
        reporter: &R,
    ) -> StreamResult<usize> {
        let mut manager = self.manager();
        manager.setup_text_writer_and_reader(output, append, input)?;
        reporter.report_progress(1, COPY_STEPS, Some("streams open"));

        let content = manager.read_remaining_bytes()?;
        reporter.report_progress(2, COPY_STEPS, Some("input read"));

        manager.write_bytes(&content)?;
        manager.close_all()?;
        reporter.report_progress(3, COPY_STEPS, Some("output written"));

        Ok(content.len())
    }
}

/// Writes `content` plus a line terminator to `path` with default options
pub fn write_text(path: impl AsRef<Path>, content: &str, append: bool) -> StreamResult<()> {
    OneShot::default().write_text(path, content, append)
}

/// Reads the whole of `path` as text with default options
pub fn read_all_text_from(path: impl AsRef<Path>) -> StreamResult<String> {
    OneShot::default().read_all_text_from(path)
}

/// Copies `input` to `output` with default options and no progress output
pub fn copy_to_new_file(
    output: impl AsRef<Path>,
    append: bool,
    input: impl AsRef<Path>,
) -> StreamResult<usize> {
    OneShot::default().copy_to_new_file(output, append, input, &())
}
