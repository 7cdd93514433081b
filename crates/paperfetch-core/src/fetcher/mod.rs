//! Retrying fetcher: one URL to one stored file.
//!
//! Each attempt is a single GET through a [`Transport`]. Failed attempts
//! (any non-2xx status, transport error or timeout) are retried per the
//! [`RetryPolicy`]; the body of the first successful attempt is stored as
//! `destination/<last URL path segment>`.

mod transport;

pub use transport::{CurlOptions, CurlTransport, Transport};

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::control::CancelToken;
use crate::retry::{run_with_retry, AttemptError, RetryError, RetryPolicy};
use crate::storage;
use crate::url_model;

/// Terminal failure for one URL. Reported per target, never fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Every attempt failed; carries the last attempt's error.
    #[error("gave up after {attempts} attempt(s): {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        last: AttemptError,
    },
    /// Destination directory or file could not be written. Not retried.
    #[error("cannot write {path:?}: {source}")]
    Storage {
        url: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Run was cancelled before the URL succeeded.
    #[error("cancelled after {attempts} attempt(s)")]
    Cancelled { url: String, attempts: u32 },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Exhausted { url, .. }
            | FetchError::Storage { url, .. }
            | FetchError::Cancelled { url, .. } => url,
        }
    }

    /// Attempts made before giving up (0 for storage errors before the first attempt).
    pub fn attempts(&self) -> u32 {
        match self {
            FetchError::Exhausted { attempts, .. } | FetchError::Cancelled { attempts, .. } => {
                *attempts
            }
            FetchError::Storage { .. } => 0,
        }
    }
}

/// Fetches URLs to disk with bounded retry. Cheap to share across workers.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Fetcher over libcurl with the given per-attempt limits.
    pub fn with_curl(options: CurlOptions, policy: RetryPolicy) -> Self {
        Self::new(Arc::new(CurlTransport::new(options)), policy)
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches `url` into `destination`, creating the directory if needed.
    /// Returns the path of the stored file.
    pub fn fetch(
        &self,
        url: &str,
        destination: &Path,
        cancel: &CancelToken,
    ) -> Result<PathBuf, FetchError> {
        storage::ensure_dir(destination).map_err(|source| FetchError::Storage {
            url: url.to_string(),
            path: destination.to_path_buf(),
            source,
        })?;

        let body = run_with_retry(&self.policy, cancel, |attempt| {
            tracing::debug!(url, attempt, "GET");
            self.transport.get(url)
        })
        .map_err(|e| match e {
            RetryError::Exhausted { attempts, last } => FetchError::Exhausted {
                url: url.to_string(),
                attempts,
                last,
            },
            RetryError::Cancelled { attempts } => FetchError::Cancelled {
                url: url.to_string(),
                attempts,
            },
        })?;

        let filename = url_model::derive_filename(url);
        let path = storage::write_replacing(destination, &filename, &body).map_err(|source| {
            FetchError::Storage {
                url: url.to_string(),
                path: destination.join(&filename),
                source,
            }
        })?;

        tracing::info!(url, path = %path.display(), bytes = body.len(), "downloaded");
        Ok(path)
    }
}
