//! JSON document store rooted in a `cap-std` directory handle.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Errors returned by the JSON document store.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    /// Reading or writing the document failed.
    #[error("document i/o failed for '{name}': {source}")]
    Io {
        /// Document file name.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The document could not be encoded or decoded.
    #[error("document '{name}' is not valid JSON: {source}")]
    Json {
        /// Document file name.
        name: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

/// Owners up to this many bytes are hex-encoded verbatim; longer ones are
/// replaced by their SHA-256 digest to stay within file name limits.
const MAX_VERBATIM_OWNER_LEN: usize = 64;

/// Builds the file name of the document holding `collection` for `owner`.
///
/// Owner identifiers are opaque and may contain path separators, so they
/// are hex-encoded. Long identifiers are hashed instead and marked with a
/// `sha256-` prefix, which hex output can never produce.
#[must_use]
pub fn document_name(collection: &str, owner: &str) -> String {
    let mut name = String::with_capacity(collection.len() + MAX_VERBATIM_OWNER_LEN * 2 + 14);
    name.push_str(collection);
    name.push('-');
    if owner.len() <= MAX_VERBATIM_OWNER_LEN {
        push_hex(&mut name, owner.as_bytes());
    } else {
        name.push_str("sha256-");
        push_hex(&mut name, &Sha256::digest(owner.as_bytes()));
    }
    name.push_str(".json");
    name
}

fn push_hex(name: &mut String, bytes: &[u8]) {
    for byte in bytes {
        name.push_str(&format!("{byte:02x}"));
    }
}

/// Directory of JSON documents with serialized read-modify-write access.
#[derive(Debug, Clone)]
pub struct JsonDocumentStore {
    dir: Arc<Dir>,
    write_lock: Arc<Mutex<()>>,
}

impl JsonDocumentStore {
    /// Opens the store rooted at `directory`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while creating or opening the directory.
    pub fn open(directory: &Utf8Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(directory, ambient_authority())?;
        let dir = Dir::open_ambient_dir(directory, ambient_authority())?;
        Ok(Self {
            dir: Arc::new(dir),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Reads and decodes a document; `None` when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError`] when the file cannot be read or decoded.
    pub fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, DocumentStoreError> {
        let contents = match self.dir.read_to_string(name) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(DocumentStoreError::Io {
                    name: name.to_owned(),
                    source,
                });
            }
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| DocumentStoreError::Json {
                name: name.to_owned(),
                source,
            })
    }

    /// Encodes and replaces a document.
    ///
    /// The new contents are written to a sibling temporary file and renamed
    /// over the old document, so readers never see a partial write.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError`] when encoding or any file operation
    /// fails.
    pub fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), DocumentStoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.write_unlocked(name, value)
    }

    /// Applies `change` to a document under the store's write lock.
    ///
    /// A missing document starts from `T::default()`. The document is only
    /// written back when `change` succeeds.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `change`, or a [`DocumentStoreError`]
    /// converted into `E` when reading or writing fails.
    pub fn modify<T, R, E, F>(&self, name: &str, change: F) -> Result<R, E>
    where
        T: Default + Serialize + DeserializeOwned,
        E: From<DocumentStoreError>,
        F: FnOnce(&mut T) -> Result<R, E>,
    {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut document: T = self.read(name)?.unwrap_or_default();
        let outcome = change(&mut document)?;
        self.write_unlocked(name, &document)?;
        Ok(outcome)
    }

    fn write_unlocked<T: Serialize>(&self, name: &str, value: &T) -> Result<(), DocumentStoreError> {
        let encoded = serde_json::to_vec_pretty(value).map_err(|source| DocumentStoreError::Json {
            name: name.to_owned(),
            source,
        })?;
        let temporary = format!(".{name}.tmp");
        let io_error = |source| DocumentStoreError::Io {
            name: name.to_owned(),
            source,
        };
        self.dir.write(&temporary, encoded).map_err(io_error)?;
        self.dir
            .rename(&temporary, &*self.dir, name)
            .map_err(io_error)
    }
}
