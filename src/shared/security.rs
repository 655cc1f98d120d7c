use crate::shared::error::{AccessMode, StreamError, StreamKind};
use crate::shared::StreamResult;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

/// Default ceiling for a whole-stream read (100 MB)
/// Applies to text materialized by `read_all_text` and to a single object record
pub const MAX_READ_BYTES: u64 = 100 * 1024 * 1024;

fn denied(path: &Path, mode: AccessMode) -> StreamError {
    StreamError::AccessDenied {
        mode,
        path: path.to_path_buf(),
    }
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|metadata| metadata.is_symlink())
        .unwrap_or(false)
}

/// Checks that `path` can be opened for reading.
///
/// The path must exist, resolve to a regular file and open for reading.
/// Symbolic links are refused unless `allow_symlinks` is set.
///
/// This is advisory: the file can still change between this check and the
/// open that follows it.
///
/// # Errors
/// Returns `StreamError::AccessDenied` with `AccessMode::Read`
pub fn check_readable(path: &Path, allow_symlinks: bool) -> StreamResult<()> {
    if !allow_symlinks && is_symlink(path) {
        return Err(denied(path, AccessMode::Read));
    }

    let metadata = fs::metadata(path).map_err(|_| denied(path, AccessMode::Read))?;
    if !metadata.is_file() {
        return Err(denied(path, AccessMode::Read));
    }

    fs::File::open(path)
        .map(drop)
        .map_err(|_| denied(path, AccessMode::Read))
}

/// Checks that `path` can be opened for writing.
///
/// An existing target must be a regular, non read-only file that opens for
/// writing (the check neither truncates nor creates). A missing target is
/// accepted when its parent directory exists and is not read-only.
///
/// # Errors
/// Returns `StreamError::AccessDenied` with `AccessMode::Write`
pub fn check_writable(path: &Path, allow_symlinks: bool) -> StreamResult<()> {
    if !allow_symlinks && is_symlink(path) {
        return Err(denied(path, AccessMode::Write));
    }

    match fs::metadata(path) {
        Ok(metadata) => {
            if !metadata.is_file() || metadata.permissions().readonly() {
                return Err(denied(path, AccessMode::Write));
            }
            OpenOptions::new()
                .write(true)
                .open(path)
                .map(drop)
                .map_err(|_| denied(path, AccessMode::Write))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let parent = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            let parent_metadata =
                fs::metadata(parent).map_err(|_| denied(path, AccessMode::Write))?;
            if !parent_metadata.is_dir() || parent_metadata.permissions().readonly() {
                return Err(denied(path, AccessMode::Write));
            }
            Ok(())
        }
        Err(_) => Err(denied(path, AccessMode::Write)),
    }
}

/// Validates that the bytes read so far stay within `max_size`
///
/// # Errors
/// Returns `StreamError::ReadLimitExceeded` once `total` passes the limit
pub fn validate_read_size(total: u64, stream: StreamKind, max_size: u64) -> StreamResult<()> {
    if total > max_size {
        return Err(StreamError::ReadLimitExceeded {
            stream,
            limit: max_size,
        });
    }
    Ok(())
}
