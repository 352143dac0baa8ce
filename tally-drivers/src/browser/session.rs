use crate::browser::options::{chrome_arguments, BrowserOptions};
use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use url::Url;
use webdriver::capabilities::Capabilities;

/// Thin wrapper around a `fantoccini` WebDriver client.
///
/// The session is a plain value: open it, use it, then hand it to
/// [`BrowserSession::close`]. Nothing about it is kept globally.
pub struct BrowserSession {
    client: Client,
}

impl BrowserSession {
    /// Connect to the WebDriver endpoint named in `options`.
    pub async fn open(options: &BrowserOptions) -> Result<Self> {
        let mut caps = Capabilities::new();
        let mut chrome_opts = HashMap::new();
        chrome_opts.insert("args".to_string(), json!(chrome_arguments(options)));
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&options.webdriver_url)
            .await
            .with_context(|| format!("connecting to webdriver at {}", options.webdriver_url))?;

        tracing::info!(
            target: "browser",
            webdriver = %options.webdriver_url,
            headless = options.headless,
            "browser.session.open"
        );
        Ok(Self { client })
    }

    /// Navigate the session to `url`.
    pub async fn visit(&self, url: &str) -> Result<()> {
        let url = Url::parse(url).with_context(|| format!("invalid start url {url}"))?;
        self.client
            .goto(url.as_str())
            .await
            .with_context(|| format!("navigating to {url}"))?;
        tracing::debug!(target: "browser", %url, "browser.session.visit");
        Ok(())
    }

    /// All cookies the browser currently holds for the open page, by name.
    pub async fn cookies(&self) -> Result<BTreeMap<String, String>> {
        let cookies = self
            .client
            .get_all_cookies()
            .await
            .context("reading browser cookies")?;
        let jar: BTreeMap<String, String> = cookies
            .iter()
            .map(|c| (c.name().to_string(), c.value().to_string()))
            .collect();
        tracing::info!(target: "browser", count = jar.len(), "browser.session.cookies");
        Ok(jar)
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client
            .close()
            .await
            .context("closing browser session")?;
        tracing::info!(target: "browser", "browser.session.closed");
        Ok(())
    }
}
