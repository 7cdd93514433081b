//! `paperfetch urls` – print the generated URLs.

use anyhow::Result;
use paperfetch_core::batch;
use paperfetch_core::config::FetchConfig;

pub fn run_urls(cfg: &FetchConfig) -> Result<()> {
    for target in batch::plan(cfg)? {
        println!("{}", target.url);
    }
    Ok(())
}
