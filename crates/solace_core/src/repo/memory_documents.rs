//! In-process document gateway with failure injection.

use crate::repo::{DocumentGateway, DocumentKind, PersistenceError, PersistenceResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;

/// Volatile gateway for tests and ephemeral sessions.
///
/// `fail_loads`/`fail_saves` make the next operations return an I/O error
/// without touching the stored documents.
#[derive(Debug, Default)]
pub struct MemoryDocumentGateway {
    documents: RefCell<HashMap<DocumentKind, String>>,
    fail_loads: Cell<bool>,
    fail_saves: Cell<bool>,
    saves: Cell<usize>,
}

impl MemoryDocumentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw document body.
    pub fn with_document(self, kind: DocumentKind, body: impl Into<String>) -> Self {
        self.documents.borrow_mut().insert(kind, body.into());
        self
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.set(fail);
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// Raw body of a stored document.
    pub fn document(&self, kind: DocumentKind) -> Option<String> {
        self.documents.borrow().get(&kind).cloned()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    fn injected_error(kind: DocumentKind) -> PersistenceError {
        PersistenceError::Io {
            path: PathBuf::from(format!("memory://{}", kind.name())),
            source: std::io::Error::other("injected failure"),
        }
    }
}

impl DocumentGateway for MemoryDocumentGateway {
    fn load_document(&self, kind: DocumentKind) -> PersistenceResult<Option<String>> {
        if self.fail_loads.get() {
            return Err(Self::injected_error(kind));
        }
        Ok(self.document(kind))
    }

    fn save_document(&self, kind: DocumentKind, body: &str) -> PersistenceResult<()> {
        if self.fail_saves.get() {
            return Err(Self::injected_error(kind));
        }
        self.documents.borrow_mut().insert(kind, body.to_string());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
