use paperfetch_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    // Log to the state dir if possible, otherwise stderr.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = Cli::run_from_args() {
        eprintln!("paperfetch error: {:#}", err);
        std::process::exit(1);
    }
}
