#![forbid(unsafe_code)]

//! Crash-dump artifact directory with time-bounded external analysis.
//!
//! The library is organized leaf-first: [`dumps`] resolves named artifacts
//! inside a fixed storage directory, [`runner`] executes an external
//! debugger under an idle timeout with both streams captured, and
//! [`analysis`] composes the two into per-request analysis reports.
//! [`service`] is the transport-agnostic façade consumed by the binary.

pub mod analysis;
pub mod config;
pub mod dumps;
pub mod errors;
pub mod models;
pub mod runner;
pub mod service;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
