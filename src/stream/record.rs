//! Object record framing.
//!
//! An object file is a 6-byte header followed by zero or more records:
//!
//! ```text
//! header: b"IOMO" | version: u8 | codec tag: u8
//! record: payload length: u32 (little endian) | payload
//! ```
//!
//! The payload is the value encoded with the file's `ObjectCodec`.

use crate::shared::error::{StreamError, StreamKind};
use crate::shared::security::validate_read_size;
use crate::shared::StreamResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Read, Write};

pub const MAGIC: &[u8; 4] = b"IOMO";
pub const FORMAT_VERSION: u8 = 1;
pub const HEADER_LEN: usize = 6;

/// Encoding used for object record payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectCodec {
    /// Compact binary encoding (bincode)
    #[default]
    Bincode,
    /// One JSON document per record
    Json,
}

impl ObjectCodec {
    pub fn tag(self) -> u8 {
        match self {
            ObjectCodec::Bincode => 1,
            ObjectCodec::Json => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(ObjectCodec::Bincode),
            2 => Some(ObjectCodec::Json),
            _ => None,
        }
    }

    /// Encodes `value` into a record payload.
    ///
    /// # Errors
    /// Returns `StreamError::NotEncodable` when the value's `Serialize`
    /// impl fails under this codec (e.g. a JSON map with non-string keys)
    /// or the payload does not fit a record.
    pub fn encode<T: Serialize + ?Sized>(self, value: &T) -> StreamResult<Vec<u8>> {
        let payload = match self {
            ObjectCodec::Bincode => bincode::serialize(value).map_err(|e| e.to_string()),
            ObjectCodec::Json => serde_json::to_vec(value).map_err(|e| e.to_string()),
        }
        .map_err(|details| StreamError::NotEncodable { details })?;

        if u32::try_from(payload.len()).is_err() {
            return Err(StreamError::NotEncodable {
                details: format!("encoded value is {} bytes, records hold at most {}", payload.len(), u32::MAX),
            });
        }
        Ok(payload)
    }

    /// Decodes a record payload.
    ///
    /// # Errors
    /// Returns `StreamError::MalformedRecord` if the payload does not decode as `T`
    pub fn decode<T: DeserializeOwned>(self, payload: &[u8]) -> StreamResult<T> {
        match self {
            ObjectCodec::Bincode => bincode::deserialize(payload).map_err(|e| e.to_string()),
            ObjectCodec::Json => serde_json::from_slice(payload).map_err(|e| e.to_string()),
        }
        .map_err(|details| StreamError::MalformedRecord {
            details: format!("{} payload: {}", self, details),
        })
    }
}

impl fmt::Display for ObjectCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectCodec::Bincode => write!(f, "bincode"),
            ObjectCodec::Json => write!(f, "json"),
        }
    }
}

pub fn write_header<W: Write>(writer: &mut W, codec: ObjectCodec) -> io::Result<()> {
    let mut header = [0u8; HEADER_LEN];
    header[..4].copy_from_slice(MAGIC);
    header[4] = FORMAT_VERSION;
    header[5] = codec.tag();
    writer.write_all(&header)
}

/// Reads and validates an object file header.
///
/// Failures come back as `io::Error`s (`InvalidData` for a foreign or
/// unsupported header) since they surface while a stream is being opened.
pub fn read_header<R: Read>(reader: &mut R) -> io::Result<ObjectCodec> {
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            io::Error::new(io::ErrorKind::InvalidData, "object stream header is missing")
        } else {
            e
        }
    })?;

    if &header[..4] != MAGIC {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "not an object stream (bad magic)",
        ));
    }
    if header[4] != FORMAT_VERSION {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unsupported object stream version {}", header[4]),
        ));
    }
    ObjectCodec::from_tag(header[5]).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unknown object codec tag {}", header[5]),
        )
    })
}

pub fn write_record<W: Write>(writer: &mut W, payload: &[u8]) -> io::Result<()> {
    let len = u32::try_from(payload.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "record too large"))?;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(payload)
}

/// Reads the next record payload.
///
/// Returns `Ok(None)` when the stream ends exactly on a record boundary.
pub fn read_record<R: Read>(reader: &mut R, max_len: u64) -> StreamResult<Option<Vec<u8>>> {
    let mut len_buf = [0u8; 4];
    let mut filled = 0;
    while filled < len_buf.len() {
        match reader.read(&mut len_buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => {
                return Err(StreamError::MalformedRecord {
                    details: "stream ended inside a record length".to_string(),
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(StreamError::ReadFailed {
                    stream: StreamKind::ObjectReader,
                    source,
                })
            }
        }
    }

    let len = u64::from(u32::from_le_bytes(len_buf));
    validate_read_size(len, StreamKind::ObjectReader, max_len)?;

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).map_err(|source| {
        if source.kind() == io::ErrorKind::UnexpectedEof {
            StreamError::MalformedRecord {
                details: format!("stream ended inside a {} byte record", len),
            }
        } else {
            StreamError::ReadFailed {
                stream: StreamKind::ObjectReader,
                source,
            }
        }
    })?;
    Ok(Some(payload))
}
