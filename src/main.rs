//! sprout CLI entry point.
//!
//! Parses arguments, runs the selected command, and turns failures into
//! user-friendly messages with class-specific exit codes (see
//! `SproutError::exit_code`).

use clap::Parser;
use sprout_cli::cli;
use sprout_cli::core::{SproutError, user_friendly_error};

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    let debug_errors = cli.debug_errors();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute().await {
        let code = e
            .downcast_ref::<SproutError>()
            .map_or(1, SproutError::exit_code);
        if debug_errors {
            eprintln!("{e:?}");
        } else {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
        }
        std::process::exit(code);
    }
}
