//! `paperfetch fetch` – download every generated paper and print a summary.

use anyhow::{Context, Result};
use paperfetch_core::batch;
use paperfetch_core::config::FetchConfig;
use paperfetch_core::{CancelToken, CompletedFetch, DownloadSummary, FetchOutcome};
use std::cell::Cell;

pub fn run_fetch(cfg: &FetchConfig, json: bool) -> Result<()> {
    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            eprintln!("\nstopping: no new attempts will be started");
            cancel.cancel();
        }) {
            tracing::warn!("could not install Ctrl+C handler: {}", e);
        }
    }

    let total = Cell::new(0usize);
    let mut done = 0usize;
    let summary = batch::run_batch(
        cfg,
        &cancel,
        |n| {
            total.set(n);
            eprintln!("Downloading {} file(s) to {}", n, cfg.destination.display());
        },
        |c| {
            done += 1;
            print_progress(done, total.get(), c);
        },
    )?;

    if json {
        let out = serde_json::to_string_pretty(&summary).context("serialize summary")?;
        println!("{}", out);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_progress(done: usize, total: usize, completed: &CompletedFetch) {
    match &completed.outcome {
        FetchOutcome::Success { stored_path } => {
            eprintln!("[{done}/{total}] {} downloaded", stored_path.display());
        }
        FetchOutcome::Failure { url, last_error } => {
            eprintln!("[{done}/{total}] FAILED {url}: {last_error}");
        }
    }
}

fn print_summary(summary: &DownloadSummary) {
    println!();
    println!("Total:     {}", summary.total);
    println!("Succeeded: {}", summary.succeeded);
    println!("Failed:    {}", summary.failed);
    println!("Success rate: {:.1}%", summary.success_rate);
    if !summary.failed_urls.is_empty() {
        println!("Failed URLs:");
        for url in &summary.failed_urls {
            println!("  {}", url);
        }
    }
}
