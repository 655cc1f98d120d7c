/// Stream core: the `StreamManager`, object record framing and the
/// one-shot operations built on top of it
pub mod compat;
pub mod manager;
pub mod one_shot;
pub mod record;

pub use compat::ErrorPolicy;
pub use manager::{OpenFailureMode, StreamManager, StreamOptions};
pub use one_shot::{copy_to_new_file, read_all_text_from, write_text, OneShot};
pub use record::ObjectCodec;
