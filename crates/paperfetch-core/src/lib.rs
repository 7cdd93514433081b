//! paperfetch core: expands exam-paper parameter lists into URLs and fetches
//! them on a bounded worker pool with per-URL retry.

pub mod config;
pub mod logging;

pub mod batch;
pub mod control;
pub mod coordinator;
pub mod fetcher;
pub mod generator;
pub mod params;
pub mod retry;
pub mod storage;
pub mod summary;
pub mod url_model;

pub use control::CancelToken;
pub use coordinator::{CompletedFetch, FetchOutcome};
pub use generator::Target;
pub use params::{ConfigError, PaperParams};
pub use summary::DownloadSummary;
