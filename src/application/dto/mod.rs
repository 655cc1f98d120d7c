/// Data Transfer Objects for application layer
///
/// DTOs carry requests from the CLI into the use cases and results back out.
mod object_summary;
mod transfer_request;
mod transfer_response;

pub use object_summary::{ObjectFileSummary, RecordSummary};
pub use transfer_request::{TextSource, TransferRequest};
pub use transfer_response::TransferResponse;
