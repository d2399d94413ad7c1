use crate::error::{Result, ScrapeError};
use std::io::Write;
use url::Url;

/// Path of the catalog home page, relative to the site URL
pub const HOME_PATH: &str = "/ordering/pages/default.php";

/// Path of the product detail page, relative to the site URL
pub const PRODUCT_INFO_PATH: &str = "/ordering/pages/product_info.php";

/// Build the catalog home page URL for a site
pub fn home_url(site_url: &str) -> String {
    format!("{}{}", site_url.trim_end_matches('/'), HOME_PATH)
}

/// Build the canonical detail page URL for a SKU
pub fn product_link(site_url: &str, sku: &str) -> String {
    format!(
        "{}{}?products_id={}",
        site_url.trim_end_matches('/'),
        PRODUCT_INFO_PATH,
        sku
    )
}

/// Resolve an `href` found on `page_url` into an absolute URL
pub fn resolve_link(page_url: &str, href: &str) -> Result<String> {
    let base = Url::parse(page_url).map_err(|source| ScrapeError::InvalidUrl {
        url: page_url.to_string(),
        source,
    })?;
    let resolved = base.join(href).map_err(|source| ScrapeError::InvalidUrl {
        url: href.to_string(),
        source,
    })?;
    Ok(resolved.to_string())
}

/// Print a `> `-prefixed progress line to stdout when debug output is enabled
pub fn debug_progress(debug: bool, message: &str) {
    let stdout = std::io::stdout();
    if let Err(e) = write_debug_progress(&mut stdout.lock(), debug, message) {
        ::log::warn!("Failed to write progress: {}", e);
    }
}

/// Write a debug progress line to `out`, or nothing when debug is off
pub fn write_debug_progress<W: Write>(
    out: &mut W,
    debug: bool,
    message: &str,
) -> std::io::Result<()> {
    if debug {
        writeln!(out, "> {}", message)?;
    }
    Ok(())
}
