use crate::config::ScraperConfig;
use crate::crawlers::browser::Browser;
use crate::error::Result;
use crate::parsers;
use crate::results::{Category, ExtraInfo, Product};
use crate::utils::debug_progress;

/// Returns the top-level categories listed on the catalog home page
pub async fn list_categories<B: Browser>(
    browser: &B,
    config: &ScraperConfig,
) -> Result<Vec<Category>> {
    let home = config.home_url();
    browser.goto(&home).await?;
    let html = browser.source().await?;
    parsers::parse_categories(&html, &home, &config.selectors)
}

/// Walks every category, sub-category and listing page and returns all products
///
/// Products come back in traversal order: category, sub-category, page, row.
/// Any failure aborts the whole crawl. Descriptions are not included, see
/// [`enrich_products`].
pub async fn scrape_all_products<B: Browser>(
    browser: &B,
    config: &ScraperConfig,
) -> Result<Vec<Product>> {
    let category_links: Vec<String> = list_categories(browser, config)
        .await?
        .into_iter()
        .map(|category| category.link)
        .collect();
    ::log::debug!("Crawling {} categories", category_links.len());

    let mut products = Vec::new();
    for link in &category_links {
        // Sub-category cards are only linkable once background requests settle
        browser.wait_for_network_idle().await?;
        browser.goto(link).await?;

        let html = browser.source().await?;
        let subcategory_links =
            parsers::parse_subcategory_links(&html, link, &config.selectors)?;
        if subcategory_links.is_empty() {
            ::log::debug!("No sub-categories on {}", link);
        }

        for subcategory_link in &subcategory_links {
            let pages =
                scrape_listing_pages(browser, subcategory_link, config, &mut products).await?;
            ::log::debug!("Crawled {} listing pages from {}", pages, subcategory_link);
        }
    }

    Ok(products)
}

/// Follows the next page links from `first_page`, appending every product found
///
/// Returns the number of pages visited. There is no cycle detection: a site
/// whose pagination loops will keep this running.
async fn scrape_listing_pages<B: Browser>(
    browser: &B,
    first_page: &str,
    config: &ScraperConfig,
    products: &mut Vec<Product>,
) -> Result<usize> {
    let mut cursor = Some(first_page.to_string());
    let mut pages = 0;

    while let Some(page_url) = cursor.take() {
        browser.goto(&page_url).await?;
        ::log::debug!("Retrieving products on page {}", page_url);
        debug_progress(config.debug, &format!("Retrieving products on page {page_url}"));

        let html = browser.source().await?;
        let page = parsers::parse_listing(&html, &page_url, &config.site_url, &config.selectors)?;

        products.extend(page.products);
        cursor = page.next;
        pages += 1;
    }

    Ok(pages)
}

/// Fetches the fields only available on a product's detail page
///
/// Allergens marked with a red icon are logged when `log_allergens` is set;
/// they are not part of the returned data.
pub async fn scrape_product_extra_info<B: Browser>(
    browser: &B,
    link: &str,
    config: &ScraperConfig,
) -> Result<ExtraInfo> {
    browser.goto(link).await?;
    let html = browser.source().await?;
    let page = parsers::parse_product_page(&html, &config.selectors)?;

    if config.log_allergens {
        for allergen in &page.red_allergens {
            ::log::info!("Allergen: {}", allergen);
        }
    }

    Ok(page.info)
}

/// Merges extra info into every product, skipping the ones that fail
///
/// A failure is logged and leaves that product without a description.
/// Returns how many products were enriched.
pub async fn enrich_products<B: Browser>(
    browser: &B,
    products: &mut [Product],
    config: &ScraperConfig,
) -> usize {
    let mut enriched = 0;

    for product in products.iter_mut() {
        ::log::debug!("Retrieving extra data for {}", product.link);
        debug_progress(config.debug, &format!("Retrieving extra data for {}", product.name));

        match scrape_product_extra_info(browser, &product.link, config).await {
            Ok(extra) => {
                product.merge_extra(extra);
                enriched += 1;
            }
            Err(e) => ::log::error!("{}", e),
        }
    }

    enriched
}
