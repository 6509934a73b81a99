//! SQLite-backed document gateway.
//!
//! # Invariants
//! - The connection must be migrated to the latest schema version.
//! - Each save is one upsert statement, so a failed save leaves the previous
//!   row intact.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::repo::{DocumentGateway, DocumentKind, PersistenceResult};
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};

/// Document gateway over the `documents` table.
pub struct SqliteDocumentGateway<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentGateway<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `DbError::SchemaNotReady` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection) -> PersistenceResult<Self> {
        let db_version = current_user_version(conn)?;
        let expected = latest_version();
        if db_version != expected {
            return Err(DbError::SchemaNotReady {
                db_version,
                expected,
            }
            .into());
        }
        Ok(Self { conn })
    }
}

impl DocumentGateway for SqliteDocumentGateway<'_> {
    fn load_document(&self, kind: DocumentKind) -> PersistenceResult<Option<String>> {
        let body = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE name = ?1;",
                [kind.name()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        debug!(
            "event=document_load module=repo backend=sqlite document={} found={}",
            kind.name(),
            body.is_some()
        );
        Ok(body)
    }

    fn save_document(&self, kind: DocumentKind, body: &str) -> PersistenceResult<()> {
        self.conn
            .execute(
                "INSERT INTO documents (name, body)
                 VALUES (?1, ?2)
                 ON CONFLICT(name) DO UPDATE SET
                    body = excluded.body,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![kind.name(), body],
            )
            .map_err(|err| {
                error!(
                    "event=document_save module=repo backend=sqlite status=error document={} error={}",
                    kind.name(),
                    err
                );
                err
            })?;
        debug!(
            "event=document_save module=repo backend=sqlite status=ok document={} bytes={}",
            kind.name(),
            body.len()
        );
        Ok(())
    }
}
