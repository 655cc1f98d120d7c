use crate::shared::error::{AccessMode, StreamError, StreamKind};
use crate::shared::security::{check_readable, check_writable, validate_read_size, MAX_READ_BYTES};
use crate::shared::StreamResult;
use crate::stream::record::{self, ObjectCodec};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// What a setup call does when the pre-check passed but the open itself failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenFailureMode {
    /// Return `StreamError::OpenFailed`
    #[default]
    Error,
    /// Log a warning, leave the stream unset and return `Ok(())`
    Warn,
}

/// Tunables shared by every stream a `StreamManager` opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    /// Codec for newly created object files
    pub codec: ObjectCodec,
    /// Ceiling for a whole-stream text read and for a single object record
    pub max_read_bytes: u64,
    /// Whether pre-checks accept symbolic links
    pub allow_symlinks: bool,
    pub open_failure: OpenFailureMode,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            codec: ObjectCodec::default(),
            max_read_bytes: MAX_READ_BYTES,
            allow_symlinks: true,
            open_failure: OpenFailureMode::default(),
        }
    }
}

struct ObjectWriter {
    inner: BufWriter<File>,
    codec: ObjectCodec,
}

struct ObjectReader {
    inner: BufReader<File>,
    codec: ObjectCodec,
}

/// StreamManager - holds up to four independently configured streams
///
/// Each stream is either unset or open; an operation on an unset stream
/// fails with `StreamError::StreamNotReady`. Setting up a stream that is
/// already open closes the previous handle first.
///
/// Streams are released by `close_all` or when the manager is dropped.
pub struct StreamManager {
    options: StreamOptions,
    text_writer: Option<BufWriter<File>>,
    text_reader: Option<Box<dyn BufRead>>,
    object_writer: Option<ObjectWriter>,
    object_reader: Option<ObjectReader>,
}

impl StreamManager {
    pub fn new() -> Self {
        Self::with_options(StreamOptions::default())
    }

    pub fn with_options(options: StreamOptions) -> Self {
        Self {
            options,
            text_writer: None,
            text_reader: None,
            object_writer: None,
            object_reader: None,
        }
    }

    pub fn options(&self) -> &StreamOptions {
        &self.options
    }

    pub fn is_text_writer_ready(&self) -> bool {
        self.text_writer.is_some()
    }

    pub fn is_text_reader_ready(&self) -> bool {
        self.text_reader.is_some()
    }

    pub fn is_object_writer_ready(&self) -> bool {
        self.object_writer.is_some()
    }

    pub fn is_object_reader_ready(&self) -> bool {
        self.object_reader.is_some()
    }

    /// Codec of the open object reader's file, if any
    pub fn object_reader_codec(&self) -> Option<ObjectCodec> {
        self.object_reader.as_ref().map(|reader| reader.codec)
    }

    // ---- text streams ----

    /// Opens a text writer on `path`, appending or truncating.
    ///
    /// # Errors
    /// * `AccessDenied` (write) - the pre-check refused the path; nothing is opened
    /// * `OpenFailed` - the open failed and `open_failure` is `Error`
    /// * `CloseFailed` - a previously open writer could not be flushed
    pub fn setup_text_writer(&mut self, path: impl AsRef<Path>, append: bool) -> StreamResult<()> {
        let path = path.as_ref();
        check_writable(path, self.options.allow_symlinks)?;
        self.close_text_writer()?;

        let opened = open_for_write(path, append).map(BufWriter::new);
        self.text_writer = self.settle_open(path, AccessMode::Write, opened)?;
        if self.text_writer.is_some() {
            tracing::debug!(path = %path.display(), append, "Opened text writer");
        }
        Ok(())
    }

    /// Opens a line reader on `path`.
    ///
    /// # Errors
    /// * `AccessDenied` (read) - the pre-check refused the path
    /// * `OpenFailed` - the open failed and `open_failure` is `Error`
    pub fn setup_text_reader(&mut self, path: impl AsRef<Path>) -> StreamResult<()> {
        let path = path.as_ref();
        check_readable(path, self.options.allow_symlinks)?;
        self.close_text_reader();

        let opened = File::open(path).map(|file| Box::new(BufReader::new(file)) as Box<dyn BufRead>);
        self.text_reader = self.settle_open(path, AccessMode::Read, opened)?;
        if self.text_reader.is_some() {
            tracing::debug!(path = %path.display(), "Opened text reader");
        }
        Ok(())
    }

    /// Attaches the text reader to standard input
    pub fn setup_text_reader_for_stdin(&mut self) {
        self.close_text_reader();
        self.text_reader = Some(Box::new(BufReader::new(io::stdin())));
        tracing::debug!("Attached text reader to stdin");
    }

    /// Sets up the reader on `input`, then the writer on `output`.
    ///
    /// If the writer cannot be set up, the reader opened by this call is
    /// closed again before the error is returned.
    pub fn setup_text_writer_and_reader(
        &mut self,
        output: impl AsRef<Path>,
        append: bool,
        input: impl AsRef<Path>,
    ) -> StreamResult<()> {
        self.setup_text_reader(input)?;
        if let Err(e) = self.setup_text_writer(output, append) {
            self.close_text_reader();
            return Err(e);
        }
        Ok(())
    }

    /// Writes `content` followed by a line terminator
    pub fn write_text(&mut self, content: &str) -> StreamResult<()> {
        let writer = self.text_writer.as_mut().ok_or(StreamError::StreamNotReady {
            stream: StreamKind::TextWriter,
        })?;
        writeln!(writer, "{}", content).map_err(|source| StreamError::WriteFailed {
            stream: StreamKind::TextWriter,
            source,
        })
    }

    /// Writes `content` as is, without a line terminator
    pub fn write_str(&mut self, content: &str) -> StreamResult<()> {
        self.write_bytes(content.as_bytes())
    }

    /// Writes raw bytes to the text writer
    pub fn write_bytes(&mut self, content: &[u8]) -> StreamResult<()> {
        let writer = self.text_writer.as_mut().ok_or(StreamError::StreamNotReady {
            stream: StreamKind::TextWriter,
        })?;
        writer
            .write_all(content)
            .map_err(|source| StreamError::WriteFailed {
                stream: StreamKind::TextWriter,
                source,
            })
    }

    /// Reads every remaining line, each followed by `\n`.
    ///
    /// `\n`, `\r\n` and a lone `\r` all end a line and come back as `\n`;
    /// a final line without a terminator gets one. The whole text is held
    /// in memory, and no line is buffered past `max_read_bytes`.
    ///
    /// # Errors
    /// * `StreamNotReady` (reader) - no reader has been set up
    /// * `ReadLimitExceeded` - the text grew past `max_read_bytes`
    /// * `ReadFailed` - the underlying read failed (including invalid UTF-8)
    pub fn read_all_text(&mut self) -> StreamResult<String> {
        let max_read_bytes = self.options.max_read_bytes;
        let reader = self.text_reader.as_mut().ok_or(StreamError::StreamNotReady {
            stream: StreamKind::TextReader,
        })?;

        let mut content = String::new();
        let mut chunk = Vec::new();
        loop {
            chunk.clear();
            let remaining = max_read_bytes.saturating_sub(content.len() as u64);
            let read = reader
                .by_ref()
                .take(remaining.saturating_add(1))
                .read_until(b'\n', &mut chunk)
                .map_err(|source| StreamError::ReadFailed {
                    stream: StreamKind::TextReader,
                    source,
                })?;
            if read == 0 {
                break;
            }
            if !chunk.ends_with(b"\n") && read as u64 > remaining {
                return Err(StreamError::ReadLimitExceeded {
                    stream: StreamKind::TextReader,
                    limit: max_read_bytes,
                });
            }

            let line = std::str::from_utf8(&chunk).map_err(|e| StreamError::ReadFailed {
                stream: StreamKind::TextReader,
                source: io::Error::new(io::ErrorKind::InvalidData, e),
            })?;
            push_line(&mut content, line);
            validate_read_size(content.len() as u64, StreamKind::TextReader, max_read_bytes)?;
        }
        Ok(content)
    }

    /// Reads the remaining text verbatim, without touching line endings
    pub fn read_remaining(&mut self) -> StreamResult<String> {
        let bytes = self.read_remaining_bytes()?;
        String::from_utf8(bytes).map_err(|e| StreamError::ReadFailed {
            stream: StreamKind::TextReader,
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })
    }

    /// Reads the remaining input as raw bytes, whatever its encoding
    pub fn read_remaining_bytes(&mut self) -> StreamResult<Vec<u8>> {
        let max_read_bytes = self.options.max_read_bytes;
        let reader = self.text_reader.as_mut().ok_or(StreamError::StreamNotReady {
            stream: StreamKind::TextReader,
        })?;

        let mut content = Vec::new();
        reader
            .by_ref()
            .take(max_read_bytes.saturating_add(1))
            .read_to_end(&mut content)
            .map_err(|source| StreamError::ReadFailed {
                stream: StreamKind::TextReader,
                source,
            })?;
        validate_read_size(content.len() as u64, StreamKind::TextReader, max_read_bytes)?;
        Ok(content)
    }

    // ---- object streams ----

    /// Opens an object writer on `path`.
    ///
    /// A new (or truncated) file gets a header for the configured codec.
    /// Appending to a non-empty file validates its header and keeps
    /// writing with that file's codec.
    pub fn setup_object_writer(&mut self, path: impl AsRef<Path>, append: bool) -> StreamResult<()> {
        let path = path.as_ref();
        check_writable(path, self.options.allow_symlinks)?;
        self.close_object_writer()?;

        let opened = self.open_object_writer(path, append);
        self.object_writer = self.settle_open(path, AccessMode::Write, opened)?;
        if let Some(writer) = &self.object_writer {
            tracing::debug!(path = %path.display(), append, codec = %writer.codec, "Opened object writer");
        }
        Ok(())
    }

    /// Opens an object reader on `path`; the file header must be valid
    pub fn setup_object_reader(&mut self, path: impl AsRef<Path>) -> StreamResult<()> {
        let path = path.as_ref();
        check_readable(path, self.options.allow_symlinks)?;
        self.close_object_reader();

        let opened = open_object_reader(path);
        self.object_reader = self.settle_open(path, AccessMode::Read, opened)?;
        if let Some(reader) = &self.object_reader {
            tracing::debug!(path = %path.display(), codec = %reader.codec, "Opened object reader");
        }
        Ok(())
    }

    /// Sets up the object writer on `output`, then the object reader on `input`.
    ///
    /// If the reader cannot be set up, the writer opened by this call is
    /// closed again before the error is returned.
    pub fn setup_object_writer_and_reader(
        &mut self,
        output: impl AsRef<Path>,
        append: bool,
        input: impl AsRef<Path>,
    ) -> StreamResult<()> {
        self.setup_object_writer(output, append)?;
        if let Err(e) = self.setup_object_reader(input) {
            if let Err(close_error) = self.close_object_writer() {
                tracing::warn!(error = %close_error, "Failed to close object writer during rollback");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Appends one encoded record.
    ///
    /// # Errors
    /// * `StreamNotReady` (objectWriter) - no object writer has been set up
    /// * `NotEncodable` - the value failed to serialize under the file's codec
    /// * `WriteFailed` - the underlying write failed
    pub fn write_object<T: Serialize + ?Sized>(&mut self, value: &T) -> StreamResult<()> {
        let writer = self.object_writer.as_mut().ok_or(StreamError::StreamNotReady {
            stream: StreamKind::ObjectWriter,
        })?;
        let payload = writer.codec.encode(value)?;
        record::write_record(&mut writer.inner, &payload).map_err(|source| {
            StreamError::WriteFailed {
                stream: StreamKind::ObjectWriter,
                source,
            }
        })
    }

    /// Reads the next record, or `None` at the end of the stream
    pub fn read_object<T: DeserializeOwned>(&mut self) -> StreamResult<Option<T>> {
        let max_read_bytes = self.options.max_read_bytes;
        let reader = self.object_reader.as_mut().ok_or(StreamError::StreamNotReady {
            stream: StreamKind::ObjectReader,
        })?;
        match record::read_record(&mut reader.inner, max_read_bytes)? {
            Some(payload) => reader.codec.decode(&payload).map(Some),
            None => Ok(None),
        }
    }

    /// Reads every remaining record
    pub fn read_all_objects<T: DeserializeOwned>(&mut self) -> StreamResult<Vec<T>> {
        let mut values = Vec::new();
        while let Some(value) = self.read_object()? {
            values.push(value);
        }
        Ok(values)
    }

    /// Reads the next record payload without decoding it
    pub fn read_raw_record(&mut self) -> StreamResult<Option<Vec<u8>>> {
        let max_read_bytes = self.options.max_read_bytes;
        let reader = self.object_reader.as_mut().ok_or(StreamError::StreamNotReady {
            stream: StreamKind::ObjectReader,
        })?;
        record::read_record(&mut reader.inner, max_read_bytes)
    }

    // ---- teardown ----

    /// Closes every open stream: text writer, text reader, object reader,
    /// object writer.
    ///
    /// All four are attempted even if one fails; the first failure is
    /// returned. Closed streams are no longer ready, so calling this again
    /// is a no-op.
    pub fn close_all(&mut self) -> StreamResult<()> {
        let results = [
            self.close_text_writer(),
            {
                self.close_text_reader();
                Ok(())
            },
            {
                self.close_object_reader();
                Ok(())
            },
            self.close_object_writer(),
        ];
        match results.into_iter().find_map(Result::err) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn close_text_writer(&mut self) -> StreamResult<()> {
        if let Some(mut writer) = self.text_writer.take() {
            tracing::debug!("Closing text writer");
            writer.flush().map_err(|source| StreamError::CloseFailed {
                stream: StreamKind::TextWriter,
                source,
            })?;
        }
        Ok(())
    }

    fn close_text_reader(&mut self) {
        if self.text_reader.take().is_some() {
            tracing::debug!("Closed text reader");
        }
    }

    fn close_object_reader(&mut self) {
        if self.object_reader.take().is_some() {
            tracing::debug!("Closed object reader");
        }
    }

    fn close_object_writer(&mut self) -> StreamResult<()> {
        if let Some(mut writer) = self.object_writer.take() {
            tracing::debug!("Closing object writer");
            writer.inner.flush().map_err(|source| StreamError::CloseFailed {
                stream: StreamKind::ObjectWriter,
                source,
            })?;
        }
        Ok(())
    }

    /// Applies `open_failure` to the outcome of an open call
    fn settle_open<T>(
        &self,
        path: &Path,
        mode: AccessMode,
        opened: io::Result<T>,
    ) -> StreamResult<Option<T>> {
        match opened {
            Ok(handle) => Ok(Some(handle)),
            Err(source) => match self.options.open_failure {
                OpenFailureMode::Error => Err(StreamError::OpenFailed {
                    path: path.to_path_buf(),
                    mode,
                    source,
                }),
                OpenFailureMode::Warn => {
                    tracing::warn!(
                        path = %path.display(),
                        %mode,
                        error = %source,
                        "Cannot open stream, leaving it unset"
                    );
                    Ok(None)
                }
            },
        }
    }

    fn open_object_writer(&self, path: &Path, append: bool) -> io::Result<ObjectWriter> {
        let existing_codec = if append && fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false) {
            Some(record::read_header(&mut File::open(path)?)?)
        } else {
            None
        };

        let mut inner = BufWriter::new(open_for_write(path, append)?);
        let codec = match existing_codec {
            Some(codec) => {
                if codec != self.options.codec {
                    tracing::debug!(file_codec = %codec, "Appending with the existing file's codec");
                }
                codec
            }
            None => {
                record::write_header(&mut inner, self.options.codec)?;
                inner.flush()?;
                self.options.codec
            }
        };
        Ok(ObjectWriter { inner, codec })
    }
}

impl Default for StreamManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StreamManager {
    fn drop(&mut self) {
        if let Err(e) = self.close_all() {
            tracing::warn!(error = %e, "Failed to close streams on drop");
        }
    }
}

impl fmt::Debug for StreamManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamManager")
            .field("options", &self.options)
            .field("text_writer_ready", &self.is_text_writer_ready())
            .field("text_reader_ready", &self.is_text_reader_ready())
            .field("object_writer_ready", &self.is_object_writer_ready())
            .field("object_reader_ready", &self.is_object_reader_ready())
            .finish()
    }
}

fn open_for_write(path: &Path, append: bool) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
}

fn open_object_reader(path: &Path) -> io::Result<ObjectReader> {
    let mut inner = BufReader::new(File::open(path)?);
    let codec = record::read_header(&mut inner)?;
    Ok(ObjectReader { inner, codec })
}

/// Appends one line with its terminator replaced by `\n`
fn push_line(content: &mut String, line: &str) {
    let bare = line.strip_suffix('\n').unwrap_or(line);
    let bare = bare.strip_suffix('\r').unwrap_or(bare);
    content.push_str(&bare.replace('\r', "\n"));
    content.push('\n');
}
