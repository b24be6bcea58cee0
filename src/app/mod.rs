//! Run orchestration and end-of-run reporting.
mod runner;
mod summary;

pub(crate) use runner::{RunOutcome, run_local};

pub(crate) fn print_runtime_errors(errors: &[String]) {
    eprintln!("Run completed with {} runtime error(s):", errors.len());
    for error in errors {
        eprintln!("  - {}", error);
    }
}
