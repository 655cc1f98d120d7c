/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the stream core uses
/// to talk to the outside world (console, etc.).
pub mod progress_reporter;

pub use progress_reporter::ProgressReporter;
