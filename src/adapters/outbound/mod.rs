/// Outbound adapters - Infrastructure implementations of outbound ports
pub mod console;
