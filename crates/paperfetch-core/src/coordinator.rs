//! Download coordinator: runs one fetch task per target on a bounded pool.
//!
//! Targets go into a shared queue drained by a fixed number of worker
//! threads. Each worker sends `(index, CompletedFetch)` back on a channel and
//! the coordinator reads exactly one result per target, in completion order.
//! A failing or panicking fetch only affects its own target.

use serde::Serialize;
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use crate::control::CancelToken;
use crate::fetcher::Fetcher;
use crate::generator::Target;

/// Terminal result of one target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    Success { stored_path: PathBuf },
    Failure { url: String, last_error: String },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }
}

/// A finished task with the URL it was dispatched for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedFetch {
    pub url: String,
    pub outcome: FetchOutcome,
}

/// Pool settings for one run.
#[derive(Debug, Clone, Default)]
pub struct PoolOptions {
    /// Worker count; `None` uses the machine's available parallelism.
    pub workers: Option<usize>,
    pub cancel: CancelToken,
}

/// Worker count when none is configured.
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Runs every target and returns one `CompletedFetch` per target.
pub fn run_all(
    targets: Vec<Target>,
    fetcher: &Arc<Fetcher>,
    options: &PoolOptions,
) -> Vec<CompletedFetch> {
    run_all_with(targets, fetcher, options, |_| {})
}

/// Like [`run_all`], calling `on_complete` on the coordinator thread as each
/// target finishes.
pub fn run_all_with<F>(
    targets: Vec<Target>,
    fetcher: &Arc<Fetcher>,
    options: &PoolOptions,
    mut on_complete: F,
) -> Vec<CompletedFetch>
where
    F: FnMut(&CompletedFetch),
{
    let count = targets.len();
    if count == 0 {
        return Vec::new();
    }

    let urls: Vec<String> = targets.iter().map(|t| t.url.clone()).collect();
    let work: Arc<Mutex<VecDeque<(usize, Target)>>> =
        Arc::new(Mutex::new(targets.into_iter().enumerate().collect()));
    let (tx, rx) = mpsc::channel::<(usize, CompletedFetch)>();

    let num_workers = options
        .workers
        .unwrap_or_else(default_workers)
        .clamp(1, count);
    tracing::debug!(targets = count, workers = num_workers, "starting fetch pool");

    let mut handles = Vec::with_capacity(num_workers);
    for id in 0..num_workers {
        let work = Arc::clone(&work);
        let tx = tx.clone();
        let fetcher = Arc::clone(fetcher);
        let cancel = options.cancel.clone();
        let spawned = thread::Builder::new()
            .name(format!("fetch-{id}"))
            .spawn(move || loop {
                let next = work
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .pop_front();
                let Some((index, target)) = next else {
                    break;
                };
                if tx.send((index, fetch_one(&fetcher, target, &cancel))).is_err() {
                    break;
                }
            });
        match spawned {
            Ok(handle) => handles.push(handle),
            Err(e) => tracing::warn!(error = %e, "could not spawn fetch worker"),
        }
    }
    drop(tx);

    let mut reported = vec![false; count];
    let mut results = Vec::with_capacity(count);
    while results.len() < count {
        let Ok((index, completed)) = rx.recv() else {
            break;
        };
        reported[index] = true;
        on_complete(&completed);
        results.push(completed);
    }

    for handle in handles {
        if handle.join().is_err() {
            tracing::error!("fetch worker exited abnormally");
        }
    }

    // Only reachable if no worker could be spawned or one died outside a fetch.
    for (index, url) in urls.into_iter().enumerate() {
        if reported[index] {
            continue;
        }
        let completed = CompletedFetch {
            url: url.clone(),
            outcome: FetchOutcome::Failure {
                url,
                last_error: "task was not run: no worker available".to_string(),
            },
        };
        on_complete(&completed);
        results.push(completed);
    }

    results
}

/// Runs one fetch, converting errors and panics into a `Failure`.
fn fetch_one(fetcher: &Fetcher, target: Target, cancel: &CancelToken) -> CompletedFetch {
    let Target { url, destination } = target;
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        fetcher.fetch(&url, &destination, cancel)
    }));
    let outcome = match result {
        Ok(Ok(stored_path)) => FetchOutcome::Success { stored_path },
        Ok(Err(e)) => {
            tracing::warn!(url = %url, error = %e, "download failed");
            FetchOutcome::Failure {
                url: url.clone(),
                last_error: e.to_string(),
            }
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(url = %url, panic = %message, "fetch task panicked");
            FetchOutcome::Failure {
                url: url.clone(),
                last_error: format!("unexpected error: {message}"),
            }
        }
    };
    CompletedFetch { url, outcome }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
