//! Database connection management with pragma configuration.
//!
//! This module handles opening the SQLite database, applying required pragmas
//! for durability and concurrency (WAL mode), and running migrations.

use super::migrations;
use crate::Error;
use std::path::Path;
use tokio_rusqlite::Connection;

/// Pragmas applied to every connection before migrations run.
const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA busy_timeout=5000;
     PRAGMA foreign_keys=ON;";

/// Fact-check result store handle.
///
/// Wraps a tokio-rusqlite Connection. Every statement runs on a single
/// background thread, so each store operation executes without interleaving
/// with any other. Cloning the handle shares that thread.
#[derive(Clone, Debug)]
pub struct ResultStore {
    pub(crate) conn: Connection,
}

impl ResultStore {
    /// Open a store at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies pragmas,
    /// and runs any pending migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    /// Open an in-memory store for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| {
            conn.execute_batch(PRAGMAS)?;
            Ok(())
        })
        .await
        .map_err(Error::Database)?;

        migrations::run(&conn).await?;

        Ok(Self { conn })
    }

    /// Close the underlying connection.
    ///
    /// Any clone of this handle fails with `Error::Database` afterwards.
    pub async fn close(self) -> Result<(), Error> {
        self.conn.close().await.map_err(Error::Database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let store = ResultStore::open_in_memory().await.unwrap();
        let version = store
            .conn
            .call(|conn| conn.query_row("SELECT sqlite_version()", [], |row| row.get::<_, String>(0)))
            .await
            .unwrap();
        assert!(!version.is_empty());
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let path = std::env::temp_dir().join(format!("newsfax-reopen-{}.sqlite", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let store = ResultStore::open(&path).await.unwrap();
        assert!(store.try_claim("https://example.com/").await.unwrap());
        store.close().await.unwrap();

        let reopened = ResultStore::open(&path).await.unwrap();
        assert!(!reopened.try_claim("https://example.com/").await.unwrap());
        assert!(reopened.get("https://example.com/").await.unwrap().is_some());
        reopened.close().await.unwrap();

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_closed_store_reports_database_error() {
        let store = ResultStore::open_in_memory().await.unwrap();
        let handle = store.clone();
        store.close().await.unwrap();

        let result = handle.get("https://example.com/").await;
        assert!(matches!(result, Err(Error::Database(_))));
    }
}
