//! io-manager - text and object stream helper
//!
//! This library wraps file and standard-input I/O behind a single
//! `StreamManager` holding up to four streams (text writer, text reader,
//! object writer, object reader), plus one-shot functions that open,
//! operate and close in one call.
//!
//! # Architecture
//!
//! - **Stream core** (`stream`): `StreamManager`, object record framing,
//!   one-shot operations and the legacy error policy
//! - **Application Layer** (`application`): Use cases and DTOs driving the core
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Error types, result aliases and path pre-checks
//!
//! # Errors
//!
//! Every operation returns a typed `StreamError`. `StreamError::severity`
//! sorts it into one of three tiers: access was refused by the pre-check,
//! the stream was never set up, or the environment failed.
//!
//! # Example
//!
//! ```no_run
//! use io_manager::prelude::*;
//!
//! # fn main() -> StreamResult<()> {
//! let mut manager = StreamManager::new();
//! manager.setup_text_writer("notes.txt", false)?;
//! manager.write_text("first line")?;
//! manager.close_all()?;
//!
//! assert_eq!(read_all_text_from("notes.txt")?, "first line\n");
//!
//! manager.setup_object_writer("points.bin", false)?;
//! manager.write_object(&(1, 2))?;
//! manager.close_all()?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod ports;
pub mod shared;
pub mod stream;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::application::dto::{
        ObjectFileSummary, TextSource, TransferRequest, TransferResponse,
    };
    pub use crate::application::use_cases::{InspectObjectsUseCase, TextTransferUseCase};
    pub use crate::ports::outbound::ProgressReporter;
    pub use crate::shared::error::{AccessMode, Severity, StreamError, StreamKind};
    pub use crate::shared::{Result, StreamResult};
    pub use crate::stream::{
        copy_to_new_file, read_all_text_from, write_text, ErrorPolicy, ObjectCodec, OneShot,
        OpenFailureMode, StreamManager, StreamOptions,
    };
}
