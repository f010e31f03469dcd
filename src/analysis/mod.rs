//! Analysis orchestration: artifact resolution + supervised debugger run.

pub mod orchestrator;

pub use orchestrator::Analyzer;
