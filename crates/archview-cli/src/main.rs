//! Archview CLI - generate, validate and merge architecture views

mod cli;

use clap::Parser;

fn main() {
    // Logging is initialized by the app once flags and environment are known
    let cli_args = cli::Cli::parse();

    let mut app = cli::ArchviewApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
