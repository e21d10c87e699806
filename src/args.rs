use clap::Parser;
use std::path::PathBuf;

use crate::format::ExportFormat;

#[derive(Parser, Debug)]
#[command(
    name = "passbleed",
    about = "Find saved password manager sites that appear in a leaked domain list",
    version,
    long_about = None
)]
pub struct Args {
    /// Password manager CSV export
    pub password_export: PathBuf,

    /// Leaked domain list, one domain per line
    pub leak_list: PathBuf,

    /// Skip header detection and read the export as this format
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Keep endangered domains in set order instead of sorting them
    #[arg(long)]
    pub unsorted: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Redact domain names for privacy
    #[arg(long)]
    pub redact: bool,
}
