//! External process execution with idle-timeout enforcement.

pub mod executable;

pub use executable::{CommandOutcome, Executable, ExitKind};
