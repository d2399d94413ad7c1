
use crate::crawlers::browser::Browser;
use crate::error::{Result, ScrapeError};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory browser serving canned HTML by URL
///
/// Records every navigation and idle wait so tests can check ordering.
#[derive(Default)]
pub struct FakeBrowser {
    pages: HashMap<String, String>,
    current: Mutex<Option<String>>,
    events: Mutex<Vec<String>>,
}

impl FakeBrowser {
    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn visits(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("goto ").map(str::to_string))
            .collect()
    }
}

impl Browser for FakeBrowser {
    async fn goto(&self, url: &str) -> Result<()> {
        self.events.lock().unwrap().push(format!("goto {url}"));
        if !self.pages.contains_key(url) {
            return Err(ScrapeError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("net::ERR_NAME_NOT_RESOLVED at {url}"),
            )));
        }
        *self.current.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn source(&self) -> Result<String> {
        let current = self.current.lock().unwrap().clone();
        Ok(current
            .and_then(|url| self.pages.get(&url).cloned())
            .unwrap_or_default())
    }

    async fn wait_for_network_idle(&self) -> Result<()> {
        self.events.lock().unwrap().push("idle".to_string());
        Ok(())
    }
}
