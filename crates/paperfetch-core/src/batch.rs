//! One run end to end: validate, generate targets, fetch on the pool, summarize.
//!
//! Configuration errors are returned before anything is dispatched. Once
//! fetching starts the run always completes with a summary, whatever the
//! individual outcomes.

use std::sync::Arc;

use crate::config::FetchConfig;
use crate::control::CancelToken;
use crate::coordinator::{self, CompletedFetch, PoolOptions};
use crate::fetcher::Fetcher;
use crate::generator::{self, Target};
use crate::params::ConfigError;
use crate::summary::{summarize, DownloadSummary};

/// Targets a run would fetch, in dispatch order.
pub fn plan(cfg: &FetchConfig) -> Result<Vec<Target>, ConfigError> {
    let template = cfg.url_template()?;
    generator::generate(&cfg.papers, &template, &cfg.destination)
}

/// Curl-backed fetcher using the config's retry and HTTP settings.
pub fn curl_fetcher(cfg: &FetchConfig) -> Result<Fetcher, ConfigError> {
    Ok(Fetcher::with_curl(
        cfg.http.to_curl_options()?,
        cfg.retry.to_policy()?,
    ))
}

/// Plans and runs a whole batch over libcurl.
///
/// `on_planned` gets the target count once validation has passed, before the
/// first fetch is dispatched.
pub fn run_batch<P, F>(
    cfg: &FetchConfig,
    cancel: &CancelToken,
    on_planned: P,
    on_complete: F,
) -> Result<DownloadSummary, ConfigError>
where
    P: FnOnce(usize),
    F: FnMut(&CompletedFetch),
{
    let targets = plan(cfg)?;
    let fetcher = Arc::new(curl_fetcher(cfg)?);
    on_planned(targets.len());
    Ok(run_targets(cfg, targets, &fetcher, cancel, on_complete))
}

/// Runs already planned targets with the given fetcher.
pub fn run_targets<F>(
    cfg: &FetchConfig,
    targets: Vec<Target>,
    fetcher: &Arc<Fetcher>,
    cancel: &CancelToken,
    on_complete: F,
) -> DownloadSummary
where
    F: FnMut(&CompletedFetch),
{
    tracing::info!(
        targets = targets.len(),
        destination = %cfg.destination.display(),
        "starting batch"
    );
    let options = PoolOptions {
        workers: cfg.workers,
        cancel: cancel.clone(),
    };
    let completed = coordinator::run_all_with(targets, fetcher, &options, on_complete);
    let summary = summarize(&completed);
    tracing::info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "batch finished"
    );
    summary
}
