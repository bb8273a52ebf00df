use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no save data at '{0}'")]
    NotFound(PathBuf),
    #[error("unable to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    fn from_io(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == ErrorKind::NotFound {
            StorageError::NotFound(path.into())
        } else {
            StorageError::Io {
                path: path.into(),
                source: err,
            }
        }
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Where saved documents live. Locators are paths relative to the storage.
pub trait Storage {
    fn read_text(&self, locator: &Path) -> Result<String, StorageError>;

    /// Replaces the whole text at `locator`.
    fn write_text(&mut self, locator: &Path, text: &str) -> Result<(), StorageError>;

    fn delete(&mut self, locator: &Path) -> Result<(), StorageError>;

    fn exists(&self, locator: &Path) -> bool;
}

/// Documents stored as files under a root directory.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn path_of(&self, locator: &Path) -> PathBuf {
        self.root.join(locator)
    }
}

impl Storage for FileStorage {
    fn read_text(&self, locator: &Path) -> Result<String, StorageError> {
        let path = self.path_of(locator);
        std::fs::read_to_string(&path).map_err(|err| StorageError::from_io(&path, err))
    }

    /// Writes to a temporary sibling first and renames it over the target, so a failed save
    /// leaves the previous document intact.
    fn write_text(&mut self, locator: &Path, text: &str) -> Result<(), StorageError> {
        let path = self.path_of(locator);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| StorageError::from_io(parent, err))?;
        }

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, text).map_err(|err| StorageError::from_io(&tmp, err))?;
        std::fs::rename(&tmp, &path).map_err(|err| {
            let _ = std::fs::remove_file(&tmp);
            StorageError::from_io(&path, err)
        })
    }

    fn delete(&mut self, locator: &Path) -> Result<(), StorageError> {
        let path = self.path_of(locator);
        std::fs::remove_file(&path).map_err(|err| StorageError::from_io(&path, err))
    }

    fn exists(&self, locator: &Path) -> bool {
        self.path_of(locator).is_file()
    }
}

/// Documents kept in memory.
#[derive(Default)]
pub struct MemoryStorage {
    files: FxHashMap<PathBuf, String>,
}

impl MemoryStorage {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn read_text(&self, locator: &Path) -> Result<String, StorageError> {
        self.files
            .get(locator)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(locator.into()))
    }

    fn write_text(&mut self, locator: &Path, text: &str) -> Result<(), StorageError> {
        self.files.insert(locator.into(), text.to_owned());
        Ok(())
    }

    fn delete(&mut self, locator: &Path) -> Result<(), StorageError> {
        match self.files.remove(locator) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(locator.into())),
        }
    }

    fn exists(&self, locator: &Path) -> bool {
        self.files.contains_key(locator)
    }
}
