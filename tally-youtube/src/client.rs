use crate::initial_data::locate_initial_data;
use crate::parse::parse_page;
use crate::session::SearchSession;
use crate::types::ResultRecord;
use anyhow::Context;
use async_trait::async_trait;
use std::borrow::Cow;
use std::time::Duration;
use tally_http::header::{COOKIE, HeaderMap, HeaderValue};
use tally_http::{HttpClient, RequestOpts};

/// Where results pages come from.
#[async_trait]
pub trait ResultsPageSource: Send + Sync {
    /// HTML of the first results page for `query`.
    async fn fetch_results_page(&self, query: &str, session: &SearchSession) -> anyhow::Result<String>;
}

/// Fetches results pages from the site with a plain GET.
#[derive(Clone)]
pub struct HttpResultsSource {
    http: HttpClient,
}

impl HttpResultsSource {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Client against `base_url` that identifies as `user_agent` and sends the
    /// site root as referer.
    pub fn from_settings(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
        retries: usize,
    ) -> anyhow::Result<Self> {
        let referer = format!("{}/", base_url.trim_end_matches('/'));
        let http = HttpClient::new(base_url)?
            .with_timeout(timeout)
            .with_retries(retries)
            .with_default_header("user-agent", user_agent)?
            .with_default_header("referer", &referer)?;
        Ok(Self::new(http))
    }
}

#[async_trait]
impl ResultsPageSource for HttpResultsSource {
    async fn fetch_results_page(&self, query: &str, session: &SearchSession) -> anyhow::Result<String> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = session.cookie_header() {
            let value = HeaderValue::from_str(&cookie).context("cookie header")?;
            headers.insert(COOKIE, value);
        }
        let opts = RequestOpts {
            headers: Some(headers),
            query: Some(vec![("search_query", Cow::Borrowed(query))]),
            ..Default::default()
        };
        let html = self.http.get_text("results", opts).await?;
        Ok(html)
    }
}

/// Runs one query end to end: fetch, locate the page data, parse records.
pub struct YouTubeSearch<S> {
    source: S,
}

impl<S: ResultsPageSource> YouTubeSearch<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn search(&self, query: &str, session: &SearchSession) -> anyhow::Result<Vec<ResultRecord>> {
        let html = self
            .source
            .fetch_results_page(query, session)
            .await
            .with_context(|| format!("fetching results for {query:?}"))?;
        let data = locate_initial_data(&html)
            .with_context(|| format!("reading results page for {query:?}"))?;
        let records =
            parse_page(&data).with_context(|| format!("parsing results for {query:?}"))?;

        let live = records.iter().filter(|r| r.is_live()).count();
        tracing::info!(
            target: "youtube.search",
            query,
            records = records.len(),
            live,
            "youtube.search.done"
        );
        Ok(records)
    }
}
