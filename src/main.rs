use clap::Parser;
use mrscreen::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
