//! Artifact directory: listing, resolution, and deletion of dump files.

pub mod directory;
pub mod name_safety;

pub use directory::DumpDirectory;
pub use name_safety::validate_dump_name;
