//! HTML extraction for every page type the scraper visits.
//!
//! Parsers work on rendered page source, so they run the same against a
//! live browser and against canned HTML.

pub mod html;

pub use html::{parse_categories, parse_listing, parse_product_page, parse_subcategory_links};
