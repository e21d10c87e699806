use anyhow::Result;
use clap::Parser;
use tracing::error;

use passbleed::check::print_check_results;
use passbleed::utils::setup_logging;
use passbleed::{run_check, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    match run_check(&args) {
        Ok(result) => print_check_results(&result, &args),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}
