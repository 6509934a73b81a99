//! JSON-file document gateway.
//!
//! One `<document>.json` file per document inside a data directory. Saves
//! write a temporary file in the same directory and rename it over the
//! target, so readers see either the old or the new document.

use crate::repo::{DocumentGateway, DocumentKind, PersistenceError, PersistenceResult};
use log::{debug, error};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Document gateway over plain JSON files.
#[derive(Debug, Clone)]
pub struct JsonFileGateway {
    dir: PathBuf,
}

impl JsonFileGateway {
    /// Uses `dir` as the data directory; it is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of one document file.
    pub fn document_path(&self, kind: DocumentKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.name()))
    }

    fn write_atomically(&self, path: &Path, body: &str) -> Result<(), std::io::Error> {
        std::fs::create_dir_all(&self.dir)?;
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(body.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|err| err.error)?;
        Ok(())
    }
}

impl DocumentGateway for JsonFileGateway {
    fn load_document(&self, kind: DocumentKind) -> PersistenceResult<Option<String>> {
        let path = self.document_path(kind);
        match std::fs::read_to_string(&path) {
            Ok(body) => {
                debug!(
                    "event=document_load module=repo backend=file document={} found=true",
                    kind.name()
                );
                Ok(Some(body))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError::Io { path, source }),
        }
    }

    fn save_document(&self, kind: DocumentKind, body: &str) -> PersistenceResult<()> {
        let path = self.document_path(kind);
        match self.write_atomically(&path, body) {
            Ok(()) => {
                debug!(
                    "event=document_save module=repo backend=file status=ok document={} bytes={}",
                    kind.name(),
                    body.len()
                );
                Ok(())
            }
            Err(source) => {
                error!(
                    "event=document_save module=repo backend=file status=error document={} error={}",
                    kind.name(),
                    source
                );
                Err(PersistenceError::Io { path, source })
            }
        }
    }
}
