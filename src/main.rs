use catalog_scraper::config::ScraperConfig;
use catalog_scraper::crawlers::{self, WebDriverSession};
use catalog_scraper::error::{Result, ScrapeError};
use catalog_scraper::export;
use catalog_scraper::utils::debug_progress;
use clap::Parser;
use std::error::Error;

mod args;
use args::{Args, Command, ScrapeAllArgs, convert_format};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn Error>> {
    // Parse command-line arguments
    let args = Args::parse();

    let config = ScraperConfig::from_file(&args.config)?;
    init_logging(config.debug);
    ::log::debug!("Loaded configuration for {}", config.site_url);

    match args.command {
        Command::ListCategories => list_categories(&config).await?,
        Command::ScrapeAll(opts) => scrape_all(&config, opts).await?,
    }

    Ok(())
}

/// Log our own crate at info (debug when configured) and dependencies at warn
fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let filter = format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

async fn list_categories(config: &ScraperConfig) -> Result<()> {
    println!("Fetching categories...");

    let session = crawlers::connect(config).await?;
    let categories = crawlers::list_categories(&session, config).await;
    let categories = finish(session, categories).await?;

    for category in &categories {
        println!("{}", category.name);
    }
    Ok(())
}

async fn scrape_all(config: &ScraperConfig, opts: ScrapeAllArgs) -> Result<()> {
    let format = convert_format(opts.format);
    println!(
        "Fetching products{} (this may take a while)...",
        if opts.with_extra_data { " with extra data" } else { "" }
    );
    debug_progress(config.debug, &format!("Selected format: {format}"));

    let session = crawlers::connect(config).await?;
    let products = async {
        let mut products = crawlers::scrape_all_products(&session, config).await?;
        println!("Fetched {} products", products.len());

        if opts.with_extra_data {
            println!("Fetching extra data...");
            let enriched = crawlers::enrich_products(&session, &mut products, config).await;
            ::log::debug!("Enriched {} of {} products", enriched, products.len());
        }
        Ok::<_, ScrapeError>(products)
    }
    .await;
    let products = finish(session, products).await?;

    export::write_products(&opts.output, &products, format)?;
    println!("Done");
    Ok(())
}

/// Ends the browser session whatever the outcome of the command
async fn finish<T>(session: WebDriverSession, outcome: Result<T>) -> Result<T> {
    if let Err(e) = session.close().await {
        ::log::warn!("Failed to close browser session: {}", e);
    }
    outcome
}
