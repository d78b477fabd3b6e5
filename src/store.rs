use crate::enrollment::Enrollment;
use crate::error::{Error, Result};
use log::{debug, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// `~/.totp/config.json`; `dirs` resolves the profile directory on Windows.
pub fn default_store_path() -> Result<PathBuf> {
    let mut path = dirs::home_dir().ok_or(Error::HomeDirNotFound)?;
    path.push(".totp");
    path.push("config.json");
    Ok(path)
}

/// Ordered list of enrollments persisted as one JSON array.
///
/// Every mutation is a whole-file rewrite. There is no locking: two processes
/// mutating the same file race and the last writer wins.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`default_store_path`].
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(default_store_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole list. A missing file is reported as `StoreNotFound`.
    pub fn read(&self) -> Result<Vec<Enrollment>> {
        let data = std::fs::read(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::StoreNotFound(self.path.clone()),
            _ => Error::io(&self.path, e),
        })?;

        let list: Vec<Enrollment> =
            serde_json::from_slice(&data).map_err(|source| Error::StoreCorrupt {
                path: self.path.clone(),
                source,
            })?;
        debug!("read {} enrollments from {}", list.len(), self.path.display());
        Ok(list)
    }

    /// Same as [`Store::read`]; used by the listing path.
    pub fn list(&self) -> Result<Vec<Enrollment>> {
        self.read()
    }

    /// Like [`Store::read`], but a missing file is an empty list.
    pub fn read_or_empty(&self) -> Result<Vec<Enrollment>> {
        match self.read() {
            Err(Error::StoreNotFound(_)) => Ok(Vec::new()),
            other => other,
        }
    }

    /// Validate `enrollment` and append it to the end of the list.
    pub fn add(&self, enrollment: Enrollment) -> Result<()> {
        enrollment.validate()?;
        let mut list = self.read_or_empty()?;
        list.push(enrollment);
        self.save(&list)?;
        info!("added enrollment #{} to {}", list.len() - 1, self.path.display());
        Ok(())
    }

    /// Remove the element at `index`, keeping the order of the rest.
    pub fn delete(&self, index: i64) -> Result<Enrollment> {
        let mut list = match self.read() {
            Err(Error::StoreNotFound(_)) => Vec::new(),
            other => other?,
        };

        let pos = usize::try_from(index)
            .ok()
            .filter(|&i| i < list.len())
            .ok_or(Error::IndexOutOfRange {
                index,
                len: list.len(),
            })?;

        let removed = list.remove(pos);
        self.save(&list)?;
        info!("deleted enrollment #{pos} from {}", self.path.display());
        Ok(removed)
    }

    /// Replace the file contents with `list`.
    ///
    /// The JSON is encoded in memory first, then written to a sibling file and
    /// renamed over the store so readers see either the old or the new list.
    pub fn save(&self, list: &[Enrollment]) -> Result<()> {
        let json = serde_json::to_string_pretty(list).map_err(|e| encode_error(&self.path, e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let tmp = self.tmp_path();
        if let Err(e) = std::fs::write(&tmp, json) {
            let _ = std::fs::remove_file(&tmp);
            return Err(Error::io(&tmp, e));
        }
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(Error::io(&self.path, e));
        }
        debug!("wrote {} enrollments to {}", list.len(), self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

// Encoding our own list is not a decode failure of the file on disk.
fn encode_error(path: &Path, source: serde_json::Error) -> Error {
    Error::io(path, std::io::Error::other(source))
}
