//! CLI argument definitions for itemjson

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "itemjson")]
#[command(about = "Convert an item CSV export into JSON lookup tables", long_about = None)]
#[command(after_help = "Example: itemjson --file items.csv [--outdir output_directory]")]
pub struct Cli {
    /// Path to the CSV file
    #[arg(short, long, value_name = "PATH")]
    pub file: PathBuf,

    /// Directory to save the JSON files
    #[arg(short, long, value_name = "DIR", default_value = "output")]
    pub outdir: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
