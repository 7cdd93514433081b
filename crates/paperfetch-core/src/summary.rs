//! Result aggregation over completed fetches.

use serde::Serialize;
use std::path::PathBuf;

use crate::coordinator::{CompletedFetch, FetchOutcome};

/// Aggregate of a finished run. Structured data; formatting is the caller's job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// `succeeded / total * 100`, or `0.0` for an empty run.
    pub success_rate: f64,
    /// Stored paths of successful fetches, in completion order.
    pub stored_paths: Vec<PathBuf>,
    /// URLs that failed, in completion order.
    pub failed_urls: Vec<String>,
}

impl DownloadSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Partitions completed fetches into successes and failures.
pub fn summarize(completed: &[CompletedFetch]) -> DownloadSummary {
    let mut stored_paths = Vec::new();
    let mut failed_urls = Vec::new();
    for c in completed {
        match &c.outcome {
            FetchOutcome::Success { stored_path } => stored_paths.push(stored_path.clone()),
            FetchOutcome::Failure { url, .. } => failed_urls.push(url.clone()),
        }
    }

    let total = completed.len();
    let succeeded = stored_paths.len();
    let success_rate = if total == 0 {
        0.0
    } else {
        succeeded as f64 / total as f64 * 100.0
    };

    DownloadSummary {
        total,
        succeeded,
        failed: failed_urls.len(),
        success_rate,
        stored_paths,
        failed_urls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(name: &str) -> CompletedFetch {
        CompletedFetch {
            url: format!("https://host/{name}"),
            outcome: FetchOutcome::Success {
                stored_path: PathBuf::from("out").join(name),
            },
        }
    }

    fn failed(name: &str) -> CompletedFetch {
        let url = format!("https://host/{name}");
        CompletedFetch {
            url: url.clone(),
            outcome: FetchOutcome::Failure {
                url,
                last_error: "HTTP 404".to_string(),
            },
        }
    }

    #[test]
    fn empty_run_has_zero_rate() {
        let s = summarize(&[]);
        assert_eq!(s.total, 0);
        assert_eq!(s.succeeded, 0);
        assert_eq!(s.failed, 0);
        assert_eq!(s.success_rate, 0.0);
        assert!(s.all_succeeded());
    }

    #[test]
    fn all_successful_is_one_hundred_percent() {
        let s = summarize(&[ok("a.pdf"), ok("b.pdf")]);
        assert_eq!(s.total, 2);
        assert_eq!(s.success_rate, 100.0);
        assert_eq!(
            s.stored_paths,
            vec![PathBuf::from("out/a.pdf"), PathBuf::from("out/b.pdf")]
        );
        assert!(s.failed_urls.is_empty());
    }

    #[test]
    fn mixed_results_partition_and_keep_order() {
        let s = summarize(&[failed("x.pdf"), ok("a.pdf"), failed("y.pdf"), ok("b.pdf")]);
        assert_eq!(s.succeeded + s.failed, s.total);
        assert_eq!(s.total, 4);
        assert_eq!(s.success_rate, 50.0);
        assert_eq!(
            s.failed_urls,
            vec!["https://host/x.pdf".to_string(), "https://host/y.pdf".to_string()]
        );
        assert!(!s.all_succeeded());
    }

    #[test]
    fn serializes_as_plain_fields() {
        let text = toml::to_string(&summarize(&[ok("a.pdf")])).unwrap();
        assert!(text.contains("total = 1"));
        assert!(text.contains("success_rate = 100.0"));
    }
}
