use std::error::Error;
use std::fmt::{self, Display, Formatter, Write as _};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chatbox_model::{DurableStore, ErrorKind, StoreError};

/// The error returned by [`FileStore`].
#[derive(Debug)]
pub struct FileStoreError {
    path: PathBuf,
    source: io::Error,
}

impl Display for FileStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.source)
    }
}

impl Error for FileStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

impl StoreError for FileStoreError {
    fn kind(&self) -> ErrorKind {
        match self.source.kind() {
            io::ErrorKind::StorageFull | io::ErrorKind::QuotaExceeded => {
                ErrorKind::QuotaExceeded
            }
            io::ErrorKind::PermissionDenied
            | io::ErrorKind::NotFound
            | io::ErrorKind::ReadOnlyFilesystem => ErrorKind::Unavailable,
            _ => ErrorKind::Other,
        }
    }
}

/// A durable store that keeps every key in its own file under a
/// directory.
///
/// Writes go to a temporary file that is then renamed over the old one,
/// so an interrupted write leaves the previous value intact.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store in `dir`, creating the directory if needed.
    pub fn open<P: Into<PathBuf>>(dir: P) -> Result<Self, FileStoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| FileStoreError {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Returns the directory of this store.
    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys may contain anything, keep the file names portable. Other
        // bytes are percent-encoded so distinct keys never share a file.
        let mut name = String::with_capacity(key.len() + 5);
        for b in key.bytes() {
            if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
                name.push(char::from(b));
            } else {
                write!(name, "%{b:02X}").ok();
            }
        }
        name.push_str(".json");
        self.dir.join(name)
    }
}

impl DurableStore for FileStore {
    type Error = FileStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FileStoreError { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        let result = fs::write(&tmp_path, value)
            .and_then(|_| fs::rename(&tmp_path, &path));
        if let Err(source) = result {
            fs::remove_file(&tmp_path).ok();
            return Err(FileStoreError { path, source });
        }
        trace!("wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FileStoreError { path, source }),
        }
    }
}
