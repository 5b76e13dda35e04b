//! API key loading.
//!
//! The key lives in a plain-text file (default `APIKEY` in the working
//! directory). Only the first line is read; surrounding whitespace is
//! trimmed and nothing else is interpreted, so an empty or malformed file is
//! passed through as-is and left for the service to reject.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Default credential file name.
pub const DEFAULT_APIKEY_FILE: &str = "APIKEY";

/// Steam Web API key.
///
/// `Debug` never prints the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([redacted])")
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("{} file not found", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read the API key from the first line of `path`.
pub fn load_api_key(path: impl AsRef<Path>) -> Result<ApiKey, CredentialError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => CredentialError::NotFound {
            path: path.to_path_buf(),
        },
        _ => CredentialError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .map_err(|source| CredentialError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), "loaded api key");
    Ok(ApiKey::new(line.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_first_line_trimmed() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "  ABCDEF0123456789  ").unwrap();
        writeln!(file, "second line is ignored").unwrap();

        let key = load_api_key(file.path()).expect("load");
        assert_eq!(key.as_str(), "ABCDEF0123456789");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(DEFAULT_APIKEY_FILE);

        match load_api_key(&path) {
            Err(CredentialError::NotFound { path: p }) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_passes_through() {
        let file = tempfile::NamedTempFile::new().expect("tempfile");
        let key = load_api_key(file.path()).expect("load");
        assert_eq!(key.as_str(), "");
    }

    #[test]
    fn debug_redacts_key() {
        let key = ApiKey::new("super-secret");
        assert!(!format!("{key:?}").contains("super-secret"));
    }
}
