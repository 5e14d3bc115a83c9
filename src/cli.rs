use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "versification-mapper")]
#[command(about = "Translate verse references between two Bible versifications", long_about = None)]
pub struct Cli {
    #[arg(help = "References to translate, e.g. Ps.10.1 or \"Genesis 3:16\"")]
    pub references: Vec<String>,

    #[arg(long, help = "Versification the references are written in")]
    pub from: Option<String>,

    #[arg(long, help = "Versification to translate into")]
    pub to: Option<String>,

    #[arg(long, help = "Versification JSON file or directory of JSON files")]
    pub registry: Option<PathBuf>,

    #[arg(long, help = "Directory containing <From>To<To>.properties mapping files")]
    pub maps_dir: Option<PathBuf>,

    #[arg(long, help = "Print a JSON translation report")]
    pub json: bool,

    #[arg(long, help = "List available mapping files and exit")]
    pub list: bool,

    #[arg(long, help = "Write JSON schemas to this directory and exit")]
    pub schema_out: Option<PathBuf>,

    #[arg(long, help = "Log directory")]
    pub log_dir: Option<PathBuf>,

    #[arg(long, default_value_t = 10, help = "Number of build logs to keep")]
    pub max_log_builds: usize,
}

impl Cli {
    pub fn parse() -> Self {
        Parser::parse()
    }
}
