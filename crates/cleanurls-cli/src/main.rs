use cleanurls_core::logging::{self, LogTarget};

mod cli;

use crate::cli::Cli;

fn main() {
    // Initialize logging as early as possible.
    logging::init(LogTarget::StateFile);

    // Parse CLI and dispatch.
    if let Err(err) = Cli::run_from_args() {
        eprintln!("cleanurls error: {:#}", err);
        std::process::exit(1);
    }
}
