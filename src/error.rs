use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("secret must be base32 format")]
    InvalidSecret,
    #[error("index {index} is out of range (store holds {len} entries)")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("store file {} does not exist", .0.display())]
    StoreNotFound(PathBuf),
    #[error("store file {} is corrupt", .path.display())]
    StoreCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("digits must be between 1 and 10, got {0}")]
    InvalidDigits(u32),
    #[error("period must be positive, got {0}")]
    InvalidPeriod(u64),
    #[error("unsupported algorithm '{0}', only sha1 is supported")]
    UnsupportedAlgorithm(String),
    #[error("invalid otpauth URI: {0}")]
    InvalidUri(String),
    #[error("cannot resolve home directory")]
    HomeDirNotFound,
    #[error("system clock is before the unix epoch")]
    Clock,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
