//! Core types and shared functionality for newsfax.
//!
//! This crate provides:
//! - The fact-check result store with SQLite backend
//! - The job coordinator that coalesces concurrent requests per key
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod coordinator;
pub mod error;
pub mod facts;
pub mod store;

pub use config::AppConfig;
pub use coordinator::{Coordinator, CoordinatorConfig, FactChecker, Outcome};
pub use error::Error;
pub use facts::{CheckedFact, Source, Truthfulness};
pub use store::{JobRecord, JobState, ResultStore};
