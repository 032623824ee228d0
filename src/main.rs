use std::process;

use clap::Parser;
use tracing::Level;

use rsakit::cli::{self, Cli};
use rsakit::logging;

fn main() {
    let args = Cli::parse();

    if args.verbose {
        logging::init_with_level(Level::DEBUG);
    } else {
        logging::init();
    }

    if let Err(e) = cli::run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
