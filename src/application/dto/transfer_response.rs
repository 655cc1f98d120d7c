/// TransferResponse - outcome of a one-shot text operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferResponse {
    /// Text produced by a read. `None` for writes and copies, and for a
    /// read that failed under the legacy error policy.
    pub text: Option<String>,
    /// Bytes written (write, copy) or read (read)
    pub bytes: usize,
}

impl TransferResponse {
    pub fn written(bytes: usize) -> Self {
        Self { text: None, bytes }
    }

    pub fn read(text: Option<String>) -> Self {
        let bytes = text.as_ref().map(String::len).unwrap_or(0);
        Self { text, bytes }
    }
}
