//! Whole-Document JSON Store
//!
//! Every service keeps its state as one JSON document on local disk. A
//! request reads the entire file, mutates the in-memory copy and rewrites the
//! entire file. Read failures are logged and replaced by the default document;
//! write failures are reported to the caller, which turns them into a 500.
//!
//! `update` serialises the read → mutate → write round trip of concurrent
//! requests against the same file. Nothing else (no fsync, no temp-file
//! rename, no journaling) is attempted.

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StoreError;

/// Outcome of a rejected or failed [`JsonStore::update`]
#[derive(Debug)]
pub enum UpdateError<E> {
    /// The mutation refused the request; nothing was written
    Rejected(E),
    /// The mutation succeeded but the document could not be written back
    Store(StoreError),
}

/// One JSON document on disk, with `D` as its in-memory shape
pub struct JsonStore<D> {
    path: PathBuf,
    /// Write the default document when `read` finds no file
    create_on_read: bool,
    write_lock: Mutex<()>,
    _doc: PhantomData<fn() -> D>,
}

impl<D> JsonStore<D>
where
    D: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            create_on_read: false,
            write_lock: Mutex::new(()),
            _doc: PhantomData,
        }
    }

    /// Materialise the default document on first read instead of only
    /// returning it
    pub fn creating_on_read(mut self) -> Self {
        self.create_on_read = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the default document if the file does not exist yet
    pub fn ensure_exists(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        tracing::info!("Creating {} with an empty document", self.path.display());
        self.write(&D::default())
    }

    /// Read and parse the whole document.
    ///
    /// Never fails: a missing, unreadable or malformed file is logged and
    /// the default document is returned in its place.
    pub fn read(&self) -> D {
        tracing::debug!("Reading from {}", self.path.display());

        if self.create_on_read && !self.path.exists() {
            if let Err(e) = self.write(&D::default()) {
                tracing::error!("Error reading database {}: {}", self.path.display(), e);
                return D::default();
            }
        }

        match self.try_read() {
            Ok(doc) => doc,
            Err(e) => {
                tracing::error!("Error reading database {}: {}", self.path.display(), e);
                D::default()
            }
        }
    }

    /// Replace the whole file with `doc`, pretty-printed with 2-space indent
    pub fn write(&self, doc: &D) -> Result<(), StoreError> {
        let result = serde_json::to_string_pretty(doc)
            .map_err(StoreError::from)
            .and_then(|contents| {
                fs::write(&self.path, contents).map_err(|source| StoreError::Io {
                    path: self.path.display().to_string(),
                    source,
                })
            });

        if let Err(e) = &result {
            tracing::error!("Error writing to database {}: {}", self.path.display(), e);
        }
        result
    }

    /// Read, mutate and write back the document as one step.
    ///
    /// If `mutate` returns an error the file is left untouched, so a request
    /// that fails halfway (e.g. the third item of a bulk update) leaves no
    /// partial changes behind.
    pub fn update<T, E>(
        &self,
        mutate: impl FnOnce(&mut D) -> Result<T, E>,
    ) -> Result<T, UpdateError<E>> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| UpdateError::Store(StoreError::LockPoisoned))?;

        let mut doc = self.read();
        let output = mutate(&mut doc).map_err(UpdateError::Rejected)?;
        self.write(&doc).map_err(UpdateError::Store)?;

        Ok(output)
    }

    fn try_read(&self) -> Result<D, StoreError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}
