/// Ports module defining interfaces for hexagonal architecture
pub mod outbound;
