// src/main.rs
use clap::Parser;
use colorful::Colorful;

use sirencheckr::cli::{self, Cli};

fn main() {
    let args = Cli::parse();
    cli::init_logging(args.verbose);

    if let Err(e) = cli::run(args) {
        eprintln!("{} {:#}", "error:".red(), e);
        std::process::exit(1);
    }
}
