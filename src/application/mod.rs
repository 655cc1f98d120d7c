/// Application layer - Use cases and DTOs
///
/// This layer orchestrates the stream core and reports through ports.
pub mod dto;
pub mod use_cases;
