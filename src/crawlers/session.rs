use crate::config::ScraperConfig;
use crate::crawlers::browser::{Browser, IdleTracker};
use crate::error::{Result, ScrapeError};
use fantoccini::cookies::Cookie;
use fantoccini::{Client, ClientBuilder};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::time::Instant;

/// Cookie carrying the session credential
pub const SESSION_COOKIE: &str = "PHPSESSID";

/// Cookie that switches product listings into table view
pub const LIST_VIEW_COOKIE: &str = "USE_LISTVIEW";

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Resource timing entries kept per page; browsers stop recording at 250 by default
const RESOURCE_BUFFER_SIZE: u32 = 10_000;

/// Buffers console output in the page so it can be relayed to our log, and
/// lifts the resource timing limit so the idle check keeps seeing new requests
const CONSOLE_HOOK: &str = r#"
performance.setResourceTimingBufferSize(arguments[0]);
if (!window.__scraperConsole) {
    window.__scraperConsole = [];
    for (const level of ['log', 'info', 'warn', 'error']) {
        const original = console[level];
        console[level] = function (...args) {
            window.__scraperConsole.push(args.map(String).join(' '));
            return original.apply(console, args);
        };
    }
}
"#;

const CONSOLE_DRAIN: &str = r#"
const buffered = window.__scraperConsole || [];
window.__scraperConsole = [];
return buffered;
"#;

const NETWORK_STATE: &str = r#"
performance.setResourceTimingBufferSize(arguments[0]);
return [document.readyState, performance.getEntriesByType('resource').length];
"#;

/// A WebDriver-backed browser session with the site cookies in place
pub struct WebDriverSession {
    client: Client,
    quiet_period: Duration,
    idle_timeout: Duration,
}

/// Opens a browser session and authenticates it against the site
///
/// Navigates to the site URL so the cookies can be set for its domain, then
/// installs the session and list view cookies.
pub async fn connect(config: &ScraperConfig) -> Result<WebDriverSession> {
    let client = connect_to_webdriver(config).await?;

    let session = WebDriverSession {
        client,
        quiet_period: Duration::from_millis(config.network_idle_ms),
        idle_timeout: Duration::from_secs(config.network_idle_timeout_secs),
    };

    if let Err(e) = session.set_cookies(config).await {
        if let Err(close_err) = session.close().await {
            ::log::warn!("Failed to close browser session: {}", close_err);
        }
        return Err(e);
    }

    Ok(session)
}

/// Browser capabilities for a sandbox-less Chrome, headless unless disabled
fn capabilities(headless: bool) -> serde_json::Map<String, Value> {
    let mut args = vec!["--no-sandbox", "--disable-setuid-sandbox"];
    if headless {
        args.push("--headless=new");
    }

    let mut caps = serde_json::Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

/// Connects to the configured WebDriver, falling back to common local ports
async fn connect_to_webdriver(config: &ScraperConfig) -> Result<Client> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities(config.headless));

    let first_error = match builder.connect(&config.webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", config.webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!(
                "Failed to connect to WebDriver at {}: {}",
                config.webdriver_url,
                e
            );
            e
        }
    };

    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://127.0.0.1:4444",
    ];

    for url in fallback_urls.iter() {
        if *url == config.webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = builder.connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(ScrapeError::Session(first_error))
}

impl WebDriverSession {
    async fn set_cookies(&self, config: &ScraperConfig) -> Result<()> {
        self.client.goto(&config.site_url).await?;

        for (name, value) in [
            (SESSION_COOKIE, config.token.as_str()),
            (LIST_VIEW_COOKIE, "true"),
        ] {
            let mut cookie = Cookie::new(name.to_string(), value.to_string());
            cookie.set_path("/");
            self.client.add_cookie(cookie).await?;
            ::log::debug!("Set cookie {} for {}", name, config.site_url);
        }

        self.install_console_hook().await;
        Ok(())
    }

    async fn install_console_hook(&self) {
        if let Err(e) = self.client.execute(CONSOLE_HOOK, vec![json!(RESOURCE_BUFFER_SIZE)]).await {
            ::log::debug!("Could not install console relay: {}", e);
        }
    }

    /// Relays console output buffered since the last drain to our log
    async fn drain_console(&self) {
        match self.client.execute(CONSOLE_DRAIN, vec![]).await {
            Ok(Value::Array(messages)) => {
                for message in messages {
                    match message.as_str() {
                        Some(text) => ::log::info!("[page] {}", text),
                        None => ::log::info!("[page] {}", message),
                    }
                }
            }
            Ok(_) => {}
            Err(e) => ::log::debug!("Could not read page console: {}", e),
        }
    }

    /// Flushes the page console and ends the WebDriver session
    pub async fn close(self) -> Result<()> {
        self.drain_console().await;
        self.client.close().await?;
        Ok(())
    }
}

impl Browser for WebDriverSession {
    async fn goto(&self, url: &str) -> Result<()> {
        self.drain_console().await;
        ::log::trace!("Navigating to {}", url);
        self.client.goto(url).await?;
        self.install_console_hook().await;
        Ok(())
    }

    async fn source(&self) -> Result<String> {
        Ok(self.client.source().await?)
    }

    async fn wait_for_network_idle(&self) -> Result<()> {
        let started = Instant::now();
        let mut tracker = IdleTracker::new(self.quiet_period, started);

        loop {
            let state = self
                .client
                .execute(NETWORK_STATE, vec![json!(RESOURCE_BUFFER_SIZE)])
                .await?;
            let now = Instant::now();
            let ready = state[0].as_str() == Some("complete");
            if tracker.observe(ready, state[1].as_u64(), now) {
                ::log::trace!("Network idle after {:?}", now.duration_since(started));
                return Ok(());
            }
            if now.duration_since(started) >= self.idle_timeout {
                return Err(ScrapeError::Timeout(self.idle_timeout));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
