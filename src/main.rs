//! raydor entry point
//!
//! Parses the command line, runs the build and turns failures into a
//! user-facing error report with exit code 1.

use clap::Parser;
use raydor::cli::Cli;
use raydor::core::user_friendly_error;

fn main() {
    let cli = Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute() {
        user_friendly_error(e).display();
        std::process::exit(1);
    }
}
