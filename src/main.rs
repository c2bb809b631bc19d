//! cardsmith - Command-line tool for rendering creature trading cards

use std::process::ExitCode;

use cardsmith::cli;

fn main() -> ExitCode {
    cli::run()
}
