use crate::application::dto::{TextSource, TransferRequest, TransferResponse};
use crate::ports::outbound::ProgressReporter;
use crate::shared::StreamResult;
use crate::stream::{compat, ErrorPolicy, OneShot};

/// TextTransferUseCase - runs a one-shot write, read or copy
///
/// The error policy decides what a failure looks like: `Propagate`
/// returns the typed error, `Legacy` goes through the compat helpers
/// (write/copy failures exit the process, read failures yield no text).
///
/// # Type Parameters
/// * `PR` - ProgressReporter implementation
pub struct TextTransferUseCase<PR> {
    one_shot: OneShot,
    policy: ErrorPolicy,
    progress_reporter: PR,
}

impl<PR: ProgressReporter> TextTransferUseCase<PR> {
    /// Creates a new TextTransferUseCase; `one_shot`'s options should
    /// already have `policy` applied
    pub fn new(one_shot: OneShot, policy: ErrorPolicy, progress_reporter: PR) -> Self {
        Self {
            one_shot,
            policy,
            progress_reporter,
        }
    }

    pub fn execute(&self, request: TransferRequest) -> StreamResult<TransferResponse> {
        match request {
            TransferRequest::Write {
                path,
                content,
                append,
            } => {
                match self.policy {
                    ErrorPolicy::Propagate => self.one_shot.write_text(&path, &content, append)?,
                    ErrorPolicy::Legacy => {
                        compat::write_text_or_exit(&self.one_shot, &path, &content, append)
                    }
                }
                let bytes = content.len() + 1;
                self.progress_reporter.report_completion(&format!(
                    "✅ Wrote {} bytes to {}",
                    bytes,
                    path.display()
                ));
                Ok(TransferResponse::written(bytes))
            }
            TransferRequest::Read {
                source: TextSource::Stdin,
            } => {
                let text = self.one_shot.read_all_text_from_stdin()?;
                Ok(TransferResponse::read(Some(text)))
            }
            TransferRequest::Read {
                source: TextSource::File(path),
            } => {
                let text = match self.policy {
                    ErrorPolicy::Propagate => Some(self.one_shot.read_all_text_from(&path)?),
                    ErrorPolicy::Legacy => compat::read_all_text_or_none(&self.one_shot, &path),
                };
                if text.is_none() {
                    self.progress_reporter
                        .report_error(&format!("⚠️  Nothing read from {}", path.display()));
                }
                Ok(TransferResponse::read(text))
            }
            TransferRequest::Copy {
                input,
                output,
                append,
            } => {
                self.progress_reporter.report(&format!(
                    "📄 Copying {} -> {}",
                    input.display(),
                    output.display()
                ));
                let bytes = match self.policy {
                    ErrorPolicy::Propagate => self.one_shot.copy_to_new_file(
                        &output,
                        append,
                        &input,
                        &self.progress_reporter,
                    )?,
                    ErrorPolicy::Legacy => compat::copy_to_new_file_or_exit(
                        &self.one_shot,
                        &output,
                        append,
                        &input,
                        &self.progress_reporter,
                    ),
                };
                self.progress_reporter.report_completion(&format!(
                    "✅ Copied {} bytes to {}",
                    bytes,
                    output.display()
                ));
                Ok(TransferResponse::written(bytes))
            }
        }
    }
}
