use rerun_core::{logging, Cancelled};

mod cli;

use crate::cli::exit_status::process_exit_code;
use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; never fail the CLI over it.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI and dispatch.
    if let Err(err) = CliCommand::run_from_args().await {
        let code = process_exit_code(&err);
        if err.downcast_ref::<Cancelled>().is_some() {
            eprintln!("rerun: cancelled");
        } else {
            eprintln!("rerun error: {:#}", err);
        }
        std::process::exit(code);
    }
}
