//! Persisted session state: cookies captured once by the bootstrapper and
//! replayed on every subsequent plain HTTP request.
//!
//! The on-disk form is a pretty-printed JSON array of cookie objects so an
//! operator can inspect (or hand-edit) it. The file is a bearer-like
//! credential and is never deleted automatically.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One browser cookie, with enough metadata to rebuild a `Cookie` header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default = "default_cookie_path")]
    pub path: String,
}

fn default_cookie_path() -> String {
    "/".to_string()
}

/// Errors loading or saving session state. `Missing` is its own case so
/// callers can tell "run --auth first" apart from a corrupt file.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no session state at {0}; run with --auth and complete the verification first")]
    Missing(PathBuf),
    #[error("failed to read session state at {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session state at {path} is not valid cookie JSON")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write session state at {path}")]
    Unwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode session state")]
    Encode(#[source] serde_json::Error),
}

/// The captured cookie set. Serializes transparently as a JSON array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionState {
    pub cookies: Vec<SessionCookie>,
}

impl SessionState {
    /// Load session state, failing with [`SessionError::Missing`] if the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        if !path.exists() {
            return Err(SessionError::Missing(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path).map_err(|source| SessionError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| SessionError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overwrite the session file with this cookie set.
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(&self).map_err(SessionError::Encode)?;
        std::fs::write(path, json).map_err(|source| SessionError::Unwritable {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fold the cookie set into a single `Cookie` request header value,
    /// or None when no cookies were captured.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|c| format!("{}={}", c.name, c.value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
