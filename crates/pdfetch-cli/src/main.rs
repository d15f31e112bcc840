use pdfetch_core::logging;

mod cli;

fn main() {
    // Initialize logging as early as possible; an unwritable state dir
    // must not prevent a run.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI and dispatch.
    if let Err(err) = cli::run_from_args() {
        eprintln!("pdfetch error: {:#}", err);
        std::process::exit(1);
    }
}
