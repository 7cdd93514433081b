//! Single-attempt HTTP GET.
//!
//! `Transport` is the seam between the retrying fetcher and the network;
//! `CurlTransport` is the production implementation on libcurl's easy
//! interface. One call is one attempt: no retries happen here.

use crate::retry::AttemptError;
use std::time::Duration;

/// Performs one GET and returns the full response body on a 2xx status.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<Vec<u8>, AttemptError>;
}

/// Per-attempt limits for the curl transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurlOptions {
    /// Limit for establishing the connection.
    pub connect_timeout: Duration,
    /// Limit for the whole attempt, so a stalled server cannot hold a worker.
    pub timeout: Duration,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Blocking GET via libcurl. A fresh easy handle per attempt.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    options: CurlOptions,
}

impl CurlTransport {
    pub fn new(options: CurlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CurlOptions {
        self.options
    }
}

impl Transport for CurlTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, AttemptError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(concat!("paperfetch/", env!("CARGO_PKG_VERSION")))?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.timeout(self.options.timeout)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(AttemptError::Http(code));
        }
        Ok(body)
    }
}
