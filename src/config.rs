use crate::error::Result;
use crate::selectors::SiteSelectors;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for a scrape run, loaded once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScraperConfig {
    /// Base URL of the target site
    pub site_url: String,

    /// Session credential sent as the `PHPSESSID` cookie
    pub token: String,

    /// Enables verbose diagnostic logging
    #[serde(default)]
    pub debug: bool,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// How long the resource count must stay unchanged to count as idle
    #[serde(default = "default_network_idle_ms")]
    pub network_idle_ms: u64,

    /// Upper bound on a single network idle wait
    #[serde(default = "default_network_idle_timeout_secs")]
    pub network_idle_timeout_secs: u64,

    /// Log allergens flagged in red while fetching extra info
    #[serde(default = "default_log_allergens")]
    pub log_allergens: bool,

    /// Site markup mapping
    #[serde(default)]
    pub selectors: SiteSelectors,
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_network_idle_ms() -> u64 {
    500
}

fn default_network_idle_timeout_secs() -> u64 {
    30
}

fn default_log_allergens() -> bool {
    true
}

impl ScraperConfig {
    /// Create a new configuration with default values
    pub fn new(site_url: &str, token: &str) -> Self {
        Self {
            site_url: site_url.to_string(),
            token: token.to_string(),
            debug: false,
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            network_idle_ms: default_network_idle_ms(),
            network_idle_timeout_secs: default_network_idle_timeout_secs(),
            log_allergens: default_log_allergens(),
            selectors: SiteSelectors::default(),
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;

        // Override the WebDriver URL with an environment variable if provided
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                config.webdriver_url = webdriver_url;
            }
        }

        Ok(config)
    }

    /// Absolute URL of the catalog home page
    pub fn home_url(&self) -> String {
        crate::utils::home_url(&self.site_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: ScraperConfig =
            serde_json::from_str(r#"{"siteUrl": "https://shop.example.com", "token": "abc"}"#)
                .unwrap();
        assert_eq!(config.site_url, "https://shop.example.com");
        assert_eq!(config.token, "abc");
        assert!(!config.debug);
        assert!(config.headless);
        assert!(config.log_allergens);
        assert_eq!(config.network_idle_ms, 500);
        assert_eq!(config.network_idle_timeout_secs, 30);
        assert_eq!(config.selectors, SiteSelectors::default());
    }

    #[test]
    fn test_full_config() {
        let config: ScraperConfig = serde_json::from_str(
            r#"{
                "siteUrl": "https://shop.example.com",
                "token": "abc",
                "debug": true,
                "webdriverUrl": "http://localhost:9515",
                "headless": false,
                "logAllergens": false,
                "selectors": {"headerRows": 1}
            }"#,
        )
        .unwrap();
        assert!(config.debug);
        assert!(!config.headless);
        assert!(!config.log_allergens);
        assert_eq!(config.webdriver_url, "http://localhost:9515");
        assert_eq!(config.selectors.header_rows, 1);
        assert_eq!(config.selectors.category_menu, ".cat-menu");
    }

    #[test]
    fn test_missing_token_is_rejected() {
        assert!(ScraperConfig::from_json(r#"{"siteUrl": "https://shop.example.com"}"#).is_err());
    }

    #[test]
    fn test_from_file() {
        let file_name = format!("catalog_scraper_config_{}.json", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        std::fs::write(&path, r#"{"siteUrl": "https://shop.example.com/", "token": "t"}"#)
            .unwrap();
        let config = ScraperConfig::from_file(&path).unwrap();
        assert_eq!(
            config.home_url(),
            "https://shop.example.com/ordering/pages/default.php"
        );
        std::fs::remove_file(&path).unwrap();
    }
}
