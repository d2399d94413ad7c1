use catalog_scraper::export::Format;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catalog-scraper")]
#[command(about = "Scrapes a shop's product catalog through a WebDriver browser")]
#[command(version)]
pub struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long, global = true, default_value = "config.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all categories
    ListCategories,

    /// Scrape all products
    ScrapeAll(ScrapeAllArgs),
}

#[derive(clap::Args, Debug)]
pub struct ScrapeAllArgs {
    /// Output file
    pub output: PathBuf,

    /// Output file format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Json)]
    pub format: FormatArg,

    /// Include extra data such as product description
    #[arg(short = 'e', long)]
    pub with_extra_data: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Csv,
}

/// Convert from CLI argument format to the exporter's format
pub fn convert_format(arg: FormatArg) -> Format {
    match arg {
        FormatArg::Json => Format::Json,
        FormatArg::Csv => Format::Csv,
    }
}
