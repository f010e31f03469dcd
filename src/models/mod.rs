//! Domain models shared across modules.

pub mod analysis;
pub mod dump;
