//! CLI for paperfetch.

mod commands;
mod prompt;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use paperfetch_core::config::{self, FetchConfig};
use std::path::PathBuf;

use commands::{run_completions, run_fetch, run_urls};

/// Top-level CLI for paperfetch.
#[derive(Debug, Parser)]
#[command(name = "paperfetch", version)]
#[command(about = "Bulk-download exam papers for every combination of the given parameters", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every paper the parameter lists expand to.
    Fetch {
        #[command(flatten)]
        params: ParamArgs,

        /// Number of concurrent downloads (default: available CPUs).
        #[arg(short = 'w', long, value_name = "N")]
        workers: Option<usize>,

        /// Print the final summary as JSON on stdout.
        #[arg(long)]
        json: bool,
    },

    /// Print the URLs that `fetch` would download, without downloading.
    Urls {
        #[command(flatten)]
        params: ParamArgs,
    },

    /// Print shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

/// Parameter lists and run settings shared by `fetch` and `urls`.
///
/// Each list flag takes one or more values; values may also be separated by
/// spaces or commas inside one argument (`-c "9701 9702"`). A list given on
/// the command line replaces the one from the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct ParamArgs {
    /// Exam code(s), e.g. 9701.
    #[arg(short = 'c', long = "code", value_name = "CODE", num_args = 1..)]
    pub codes: Vec<String>,

    /// Season(s): s (summer), w (winter), m (march).
    #[arg(short = 's', long = "season", value_name = "SEASON", num_args = 1..)]
    pub seasons: Vec<String>,

    /// Two-digit year(s), e.g. 23.
    #[arg(short = 'y', long = "year", value_name = "YEAR", num_args = 1..)]
    pub years: Vec<String>,

    /// Paper type(s), e.g. qp, ms.
    #[arg(short = 'p', long = "paper-type", value_name = "TYPE", num_args = 1..)]
    pub paper_types: Vec<String>,

    /// Component number(s), e.g. 2.
    #[arg(short = 'n', long = "component", value_name = "NUM", num_args = 1..)]
    pub component_numbers: Vec<String>,

    /// Time zone(s), e.g. 1.
    #[arg(short = 'z', long = "time-zone", value_name = "ZONE", num_args = 1..)]
    pub time_zones: Vec<String>,

    /// Where to store downloaded files.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Fetch from this base URL instead of the default host.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Read settings from this file instead of ~/.config/paperfetch/config.toml.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Prompt for each parameter list, defaulting to the current values.
    #[arg(short = 'i', long)]
    pub interactive: bool,
}

impl ParamArgs {
    /// Loads the file named by `--config`, or the default config.
    pub fn load_config(&self) -> Result<FetchConfig> {
        let cfg = match &self.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        Ok(cfg)
    }

    /// Applies command-line values on top of `cfg`.
    pub fn apply(&self, cfg: &mut FetchConfig) {
        let papers = &mut cfg.papers;
        for (flag, target) in [
            (&self.codes, &mut papers.codes),
            (&self.seasons, &mut papers.seasons),
            (&self.years, &mut papers.years),
            (&self.paper_types, &mut papers.paper_types),
            (&self.component_numbers, &mut papers.component_numbers),
            (&self.time_zones, &mut papers.time_zones),
        ] {
            let values = split_values(flag);
            if !values.is_empty() {
                *target = values;
            }
        }
        if let Some(dest) = &self.destination {
            cfg.destination = dest.clone();
        }
        if let Some(base) = &self.base_url {
            cfg.base_url = Some(base.clone());
        }
    }

    /// Config file, then flags, then prompts when `--interactive`.
    pub fn resolve(&self) -> Result<FetchConfig> {
        let mut cfg = self.load_config()?;
        self.apply(&mut cfg);
        if self.interactive {
            prompt::prompt_params(&mut cfg.papers)?;
        }
        Ok(cfg)
    }
}

/// Splits raw arguments on whitespace and commas, dropping empty pieces.
pub fn split_values<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter()
        .flat_map(|v| {
            v.as_ref()
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Fetch {
                params,
                workers,
                json,
            } => {
                let mut cfg = params.resolve()?;
                if workers.is_some() {
                    cfg.workers = workers;
                }
                run_fetch(&cfg, json)?;
            }
            CliCommand::Urls { params } => run_urls(&params.resolve()?)?,
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
