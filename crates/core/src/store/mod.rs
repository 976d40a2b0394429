//! SQLite-backed store for fact-check jobs.
//!
//! This module provides a persistent key → job record mapping using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Atomic insert-if-absent claims on a primary key
//! - Write-once completion (`pending` → `done`)
//! - Explicit failure records with a bounded re-claim
//! - Automatic schema migrations and WAL mode

pub mod connection;
pub mod jobs;
pub mod migrations;

pub use crate::Error;

pub use connection::ResultStore;
pub use jobs::{JobRecord, JobState};
