pub mod config;
pub mod crawlers;
pub mod error;
pub mod export;
pub mod parsers;
pub mod results;
pub mod selectors;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::ScraperConfig;
pub use error::{Result, ScrapeError};
pub use export::Format;
pub use results::{Category, ExtraInfo, Product};
