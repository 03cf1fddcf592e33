use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "bom-merge",
    about = "Merge license scanner BOM fragments into bom.json and bom_error.json",
    version
)]
pub struct Cli {
    /// Directory holding the BOM fragment files
    #[arg(long = "in", value_name = "DIR")]
    pub input: PathBuf,

    /// Directory where bom.json and bom_error.json are written
    #[arg(long = "out", value_name = "DIR")]
    pub output: PathBuf,

    /// JSON array of records that replace scanned records with the same project
    #[arg(long, value_name = "FILE")]
    pub override_file: Option<PathBuf>,

    /// Drop resolved projects starting with these prefixes (comma separated, repeatable)
    #[arg(long, value_name = "PREFIXES", value_delimiter = ',')]
    pub filter_modules: Vec<String>,

    /// Config file [default: ./.bom-merge/config.toml, fallback ~/.config/bom-merge/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory searched for local checkouts laid out by import path
    #[arg(long, value_name = "DIR")]
    pub vcs_search_root: Option<PathBuf>,

    /// Skip go-get meta tag lookups; only local checkouts and the hosting fallback are used
    #[arg(long)]
    pub offline: bool,

    /// Show license breakdown and error details; enables debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
