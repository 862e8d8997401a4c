use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rfcascade::cli;

fn main() {
    // logs go to stderr so stdout stays the lineup printout
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rfcascade=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Cli::parse();
    if let Err(err) = cli::run(args) {
        println!();
        cli::print_error(&err.to_string());
        process::exit(1);
    }
}
