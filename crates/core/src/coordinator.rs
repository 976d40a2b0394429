//! Request-coalescing job coordinator.
//!
//! [`Coordinator::ensure`] is the only entry point that starts work. It never
//! waits for a fact check to finish: the first caller for a key wins the
//! store's atomic claim and spawns the computation, every other caller reads
//! the record and reports what it sees.
//!
//! Retries are bounded. A failed key is re-claimed by the next `ensure` call
//! while its attempt count is below `max_attempts`; after that it stays
//! failed and callers receive [`Outcome::Failed`].

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::store::{JobRecord, JobState, ResultStore};
use crate::{AppConfig, CheckedFact, Error};

/// The fact-check computation: given a key, eventually produce facts or fail.
#[async_trait::async_trait]
pub trait FactChecker: Send + Sync {
    /// Check the page identified by `key`.
    async fn check(&self, key: &str) -> Result<Vec<CheckedFact>, Error>;
}

/// Result of an [`Coordinator::ensure`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// This call claimed the key and launched the computation.
    Started,
    /// A computation for the key is already running.
    InProgress,
    /// The stored result.
    Ready { facts: Vec<CheckedFact> },
    /// Every allowed attempt failed; `error` is the last failure.
    Failed { error: String, attempts: u32 },
}

/// Retry and timeout policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Total attempts per key, including the first (at least 1).
    pub max_attempts: u32,
    /// Upper bound on one computation; exceeding it counts as a failure.
    pub check_timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self { max_attempts: 3, check_timeout: Duration::from_secs(300) }
    }
}

impl From<&AppConfig> for CoordinatorConfig {
    fn from(config: &AppConfig) -> Self {
        Self { max_attempts: config.max_attempts, check_timeout: config.check_timeout() }
    }
}

/// Owns the job state machine on top of a [`ResultStore`].
#[derive(Clone)]
pub struct Coordinator {
    store: ResultStore,
    checker: Arc<dyn FactChecker>,
    config: CoordinatorConfig,
}

impl Coordinator {
    pub fn new(store: ResultStore, checker: Arc<dyn FactChecker>, config: CoordinatorConfig) -> Self {
        Self { store, checker, config }
    }

    /// Ensure fact-check results exist for `key`.
    ///
    /// Only bounded store operations are awaited. Store failures are returned
    /// as errors rather than guessed around.
    pub async fn ensure(&self, key: &str) -> Result<Outcome, Error> {
        if self.store.try_claim(key).await? {
            tracing::info!(key, "claimed fact check");
            self.launch(key.to_string(), 1);
            return Ok(Outcome::Started);
        }

        let record = self
            .store
            .get(key)
            .await?
            .ok_or_else(|| Error::MissingRecord(key.to_string()))?;

        match record.state {
            JobState::Pending => {
                tracing::debug!(key, attempts = record.attempts, "fact check in progress");
                Ok(Outcome::InProgress)
            }
            JobState::Done { facts } => {
                tracing::debug!(key, facts = facts.len(), "fact check cache hit");
                Ok(Outcome::Ready { facts })
            }
            JobState::Failed { error } => self.retry_failed(key, record.attempts, error).await,
        }
    }

    /// Read the record for `key` without starting anything.
    pub async fn status(&self, key: &str) -> Result<Option<JobRecord>, Error> {
        self.store.get(key).await
    }

    async fn retry_failed(&self, key: &str, attempts: u32, error: String) -> Result<Outcome, Error> {
        if attempts >= self.config.max_attempts {
            return Ok(Outcome::Failed { error, attempts });
        }

        if self.store.reclaim_failed(key, attempts).await? {
            tracing::info!(key, attempt = attempts + 1, previous_error = %error, "retrying failed fact check");
            self.launch(key.to_string(), attempts + 1);
            Ok(Outcome::Started)
        } else {
            // Another caller re-claimed between our read and our update.
            Ok(Outcome::InProgress)
        }
    }

    /// Spawn the computation for a freshly claimed key.
    ///
    /// The task captures only the key and the two handles. The check itself
    /// runs in its own task so a panic surfaces as a `JoinError` and is
    /// recorded like any other failure. Its outcome is written back through
    /// `complete`/`fail`, both of which only act on a pending row.
    fn launch(&self, key: String, attempt: u32) {
        let store = self.store.clone();
        let checker = Arc::clone(&self.checker);
        let timeout = self.config.check_timeout;
        let span = tracing::info_span!("fact_check", key = %key, attempt);

        tokio::spawn(
            async move {
                let started = std::time::Instant::now();
                let result = run_check(checker, key.clone(), timeout).await;

                if let Err(err) = &result {
                    tracing::warn!(error = %err, elapsed = ?started.elapsed(), "fact check failed");
                }

                match record_outcome(&store, &key, &result).await {
                    Ok(true) => match &result {
                        Ok(facts) => {
                            tracing::info!(facts = facts.len(), elapsed = ?started.elapsed(), "fact check complete")
                        }
                        Err(_) => tracing::debug!("fact check failure recorded"),
                    },
                    Ok(false) => tracing::debug!("outcome ignored, record no longer pending"),
                    Err(e) => tracing::error!(error = %e, "failed to record fact check outcome, key stays pending"),
                }
            }
            .instrument(span),
        );
    }
}

/// Attempts at writing the terminal state before giving up.
const RECORD_ATTEMPTS: u32 = 3;

/// Backoff between terminal-write attempts, multiplied by the attempt number.
const RECORD_BACKOFF: Duration = Duration::from_millis(100);

/// Run one check in its own task, bounded by `timeout`.
async fn run_check(checker: Arc<dyn FactChecker>, key: String, timeout: Duration) -> Result<Vec<CheckedFact>, Error> {
    let mut handle = tokio::spawn(async move { checker.check(&key).await }.in_current_span());

    match tokio::time::timeout(timeout, &mut handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) if e.is_panic() => Err(Error::CheckFailed(format!("computation panicked: {e}"))),
        Ok(Err(e)) => Err(Error::CheckFailed(format!("computation aborted: {e}"))),
        Err(_) => {
            handle.abort();
            Err(Error::CheckTimeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)))
        }
    }
}

/// Write the terminal state for `key`, retrying store errors with a short backoff.
///
/// Returns whether the write took effect. If every attempt fails the row stays
/// pending until `recover_interrupted` runs at the next startup.
async fn record_outcome(
    store: &ResultStore, key: &str, result: &Result<Vec<CheckedFact>, Error>,
) -> Result<bool, Error> {
    let mut attempt = 1;
    loop {
        let written = match result {
            Ok(facts) => store.complete(key, facts).await,
            Err(err) => store.fail(key, &err.to_string()).await,
        };

        match written {
            Err(e) if attempt < RECORD_ATTEMPTS => {
                tracing::warn!(error = %e, attempt, "failed to record fact check outcome, retrying");
                tokio::time::sleep(RECORD_BACKOFF * attempt).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}
