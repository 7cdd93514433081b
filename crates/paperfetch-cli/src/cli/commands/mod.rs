//! CLI command handlers, one file per subcommand.

mod completions;
mod fetch;
mod urls;

pub use completions::run_completions;
pub use fetch::run_fetch;
pub use urls::run_urls;
