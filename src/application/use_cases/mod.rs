/// Use cases module containing application orchestration
mod inspect_objects;
mod text_transfer;

pub use inspect_objects::InspectObjectsUseCase;
pub use text_transfer::TextTransferUseCase;
