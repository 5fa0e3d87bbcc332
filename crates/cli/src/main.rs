//! Loza cart CLI

use std::process::ExitCode;

use tracing::error;

mod commands;
mod config;
mod observability;
mod render;

use crate::config::CliConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let config = CliConfig::load().unwrap_or_else(|error| error.exit());

    if let Err(error) = observability::init_subscriber(&config.logging) {
        report(&error.to_string());

        return ExitCode::FAILURE;
    }

    match commands::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("command failed");
            report(&message);

            ExitCode::FAILURE
        }
    }
}

#[expect(clippy::print_stderr, reason = "errors are reported on stderr")]
fn report(message: &str) {
    eprintln!("{message}");
}
