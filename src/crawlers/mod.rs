pub mod browser;
pub mod catalog;
pub mod session;

pub use browser::Browser;
pub use catalog::{enrich_products, list_categories, scrape_all_products, scrape_product_extra_info};
pub use session::{WebDriverSession, connect};

#[cfg(test)]
mod tests;
