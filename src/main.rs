mod app;
mod args;
mod auth;
mod config;
mod entry;
mod error;
mod http;
mod logger;
mod metrics;
mod probe;
mod shutdown;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
