//! Job record operations.
//!
//! Every mutation here is a single SQL statement whose `WHERE` clause encodes
//! the allowed transition, so each call is atomic for its key:
//!
//! ```text
//! (absent) --try_claim--> pending --complete--> done
//!                            |
//!                            +------fail------> failed --reclaim_failed--> pending
//! ```
//!
//! `done` is terminal. There is no delete.

use super::connection::ResultStore;
use crate::{CheckedFact, Error};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::{params, rusqlite};

/// Error recorded on jobs that were still pending when the process stopped.
pub const INTERRUPTED_ERROR: &str = "interrupted before completion";

/// State of a fact-check job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobState {
    /// Claimed; the computation has not finished.
    Pending,
    /// Computation succeeded. The fact list is write-once.
    Done { facts: Vec<CheckedFact> },
    /// Computation failed or timed out.
    Failed { error: String },
}

impl JobState {
    fn label(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Done { .. } => "done",
            JobState::Failed { .. } => "failed",
        }
    }
}

/// A stored fact-check job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct JobRecord {
    pub key: String,
    #[serde(flatten)]
    pub state: JobState,
    /// How many times the key has been claimed for computation.
    pub attempts: u32,
    pub created_at: String,
    pub updated_at: String,
}

struct RawRecord {
    key: String,
    status: String,
    result_json: Option<String>,
    error: Option<String>,
    attempts: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<RawRecord> for JobRecord {
    type Error = Error;

    fn try_from(raw: RawRecord) -> Result<Self, Error> {
        let corrupt = |reason: String| Error::CorruptRecord { key: raw.key.clone(), reason };

        let state = match (raw.status.as_str(), raw.result_json.as_deref(), raw.error.as_deref()) {
            ("pending", None, None) => JobState::Pending,
            ("done", Some(json), None) => {
                let facts = serde_json::from_str(json).map_err(|e| corrupt(format!("result_json: {e}")))?;
                JobState::Done { facts }
            }
            ("failed", None, Some(error)) => JobState::Failed { error: error.to_string() },
            (status, result, error) => {
                return Err(corrupt(format!(
                    "status {status} with result {} and error {}",
                    if result.is_some() { "set" } else { "unset" },
                    if error.is_some() { "set" } else { "unset" },
                )));
            }
        };

        let attempts = u32::try_from(raw.attempts).map_err(|_| corrupt(format!("attempts {}", raw.attempts)))?;

        Ok(JobRecord { key: raw.key, state, attempts, created_at: raw.created_at, updated_at: raw.updated_at })
    }
}

impl ResultStore {
    /// Create a `pending` record for `key` if none exists.
    ///
    /// Returns true only for the single caller whose insert created the row.
    /// Concurrent callers for the same key all observe false except one.
    pub async fn try_claim(&self, key: &str) -> Result<bool, Error> {
        let key = key.to_string();
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let inserted = conn.execute(
                    "INSERT INTO fact_checks (key, status, attempts, created_at, updated_at)
                    VALUES (?1, 'pending', 1, ?2, ?2)
                    ON CONFLICT(key) DO NOTHING",
                    params![key, now],
                )?;
                Ok(inserted == 1)
            })
            .await
            .map_err(Error::from)
    }

    /// Get a job record by key.
    ///
    /// Returns None if the key has never been claimed.
    pub async fn get(&self, key: &str) -> Result<Option<JobRecord>, Error> {
        let key = key.to_string();
        let raw = self
            .conn
            .call(move |conn| -> Result<Option<RawRecord>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT key, status, result_json, error, attempts, created_at, updated_at
                    FROM fact_checks WHERE key = ?1",
                )?;

                let result = stmt.query_row(params![key], |row| {
                    Ok(RawRecord {
                        key: row.get(0)?,
                        status: row.get(1)?,
                        result_json: row.get(2)?,
                        error: row.get(3)?,
                        attempts: row.get(4)?,
                        created_at: row.get(5)?,
                        updated_at: row.get(6)?,
                    })
                });

                match result {
                    Ok(raw) => Ok(Some(raw)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        raw.map(JobRecord::try_from).transpose()
    }

    /// Mark a pending job `done` with its facts.
    ///
    /// Returns false without touching the row if the key is absent or no
    /// longer pending, so a repeated or late completion cannot overwrite a result.
    pub async fn complete(&self, key: &str, facts: &[CheckedFact]) -> Result<bool, Error> {
        let key = key.to_string();
        let result_json = serde_json::to_string(facts).map_err(|e| Error::Encode(e.to_string()))?;
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let updated = conn.execute(
                    "UPDATE fact_checks
                    SET status = 'done', result_json = ?2, error = NULL, updated_at = ?3
                    WHERE key = ?1 AND status = 'pending'",
                    params![key, result_json, now],
                )?;
                Ok(updated == 1)
            })
            .await
            .map_err(Error::from)
    }

    /// Mark a pending job `failed`, recording the error.
    ///
    /// Returns false if the key is absent or no longer pending.
    pub async fn fail(&self, key: &str, error: &str) -> Result<bool, Error> {
        let key = key.to_string();
        let error = error.to_string();
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let updated = conn.execute(
                    "UPDATE fact_checks
                    SET status = 'failed', error = ?2, updated_at = ?3
                    WHERE key = ?1 AND status = 'pending'",
                    params![key, error, now],
                )?;
                Ok(updated == 1)
            })
            .await
            .map_err(Error::from)
    }

    /// Move a failed job back to `pending` for another attempt.
    ///
    /// `seen_attempts` is the attempt count the caller read; the update only
    /// applies while the row still has that count, so among concurrent callers
    /// exactly one wins the re-claim.
    pub async fn reclaim_failed(&self, key: &str, seen_attempts: u32) -> Result<bool, Error> {
        let key = key.to_string();
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let updated = conn.execute(
                    "UPDATE fact_checks
                    SET status = 'pending', error = NULL, attempts = attempts + 1, updated_at = ?3
                    WHERE key = ?1 AND status = 'failed' AND attempts = ?2",
                    params![key, seen_attempts, now],
                )?;
                Ok(updated == 1)
            })
            .await
            .map_err(Error::from)
    }

    /// Fail every job still marked `pending`.
    ///
    /// Meant to run once at startup, before any request is served, by the
    /// only process using this database: any pending row at that point has no
    /// live computation behind it. Returns the number of rows changed.
    pub async fn recover_interrupted(&self) -> Result<u64, Error> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute(
                    "UPDATE fact_checks SET status = 'failed', error = ?1, updated_at = ?2
                    WHERE status = 'pending'",
                    params![INTERRUPTED_ERROR, now],
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Count jobs per state label, for startup diagnostics.
    pub async fn count_by_state(&self) -> Result<Vec<(String, u64)>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<(String, u64)>, Error> {
                let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM fact_checks GROUP BY status ORDER BY status")?;
                let rows = stmt
                    .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64)))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(Error::from)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
