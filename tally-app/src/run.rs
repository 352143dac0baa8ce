use anyhow::{Context, Result};
use chrono::Local;
use std::time::{Duration, Instant};
use tally_common::TallyError;
use tally_config::{QueryErrorPolicy, TallyConfig, TopicSet};
use tally_drivers::{BrowserOptions, BrowserSession};
use tally_report::{QueryResultSet, analyze, equalize, write_analysis, write_results};
use tally_youtube::session::SearchSession;
use tally_youtube::{HttpResultsSource, ResultsPageSource, YouTubeSearch};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Totals logged at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub topic_sets: usize,
    pub topics: usize,
    pub skipped: usize,
    pub results: usize,
    pub trimmed_length: usize,
}

/// Scraped topic set, queries in search order.
struct Harvest {
    name: String,
    queries: Vec<String>,
    results: QueryResultSet,
}

/// One pass over every configured topic set: search, trim, write reports.
pub struct Run<S> {
    cfg: TallyConfig,
    search: YouTubeSearch<S>,
}

impl Run<HttpResultsSource> {
    pub fn from_config(cfg: TallyConfig) -> Result<Self> {
        let source = HttpResultsSource::from_settings(
            &cfg.search.base_url,
            &cfg.search.user_agent,
            Duration::from_secs(cfg.search.timeout_secs),
            cfg.search.retries,
        )
        .context("building search client")?;
        Ok(Self::new(cfg, source))
    }
}

impl<S: ResultsPageSource> Run<S> {
    pub fn new(cfg: TallyConfig, source: S) -> Self {
        Self {
            cfg,
            search: YouTubeSearch::new(source),
        }
    }

    pub async fn execute(self) -> Result<RunSummary> {
        let started = Instant::now();
        let mut harvests = Vec::with_capacity(self.cfg.topic_sets.len());
        let mut skipped = 0;

        for set in &self.cfg.topic_sets {
            let session = self.session_for(set).await?;
            let (harvest, set_skipped) = self.scrape_set(set, &session).await?;
            skipped += set_skipped;

            if self.cfg.output.write_untrimmed {
                write_results(
                    &self.cfg.output.dir,
                    &format!("results-{}", harvest.name),
                    &harvest.results,
                    Local::now(),
                )?;
            }
            harvests.push(harvest);
        }

        let results = harvests.iter().map(|h| h.results.total_records()).sum();
        let topics = harvests.iter().map(|h| h.queries.len()).sum();

        let (trimmed, trimmed_length) = equalize(
            harvests.iter().map(|h| h.results.clone()).collect(),
            self.cfg.output.max_length,
        );
        for (harvest, set) in harvests.iter().zip(&trimmed) {
            let queries: Vec<&str> = set.queries().collect();
            write_results(
                &self.cfg.output.dir,
                &format!("results-{}-trimmed", harvest.name),
                set,
                Local::now(),
            )?;
            write_analysis(
                &self.cfg.output.dir,
                &format!("analysis-{}", harvest.name),
                &analyze(set, &queries),
                &queries,
                Local::now(),
            )?;
        }

        let summary = RunSummary {
            topic_sets: harvests.len(),
            topics,
            skipped,
            results,
            trimmed_length,
        };
        tracing::info!(
            topic_sets = summary.topic_sets,
            topics,
            skipped,
            results,
            trimmed_length,
            elapsed_secs = started.elapsed().as_secs(),
            "tubetally.done"
        );
        Ok(summary)
    }

    /// Cookies for one topic set, with the locale cookie laid over them.
    async fn session_for(&self, set: &TopicSet) -> Result<SearchSession> {
        let session = if self.cfg.browser.enabled {
            SearchSession::from_cookies(self.browser_cookies(set).await?)
        } else {
            SearchSession::new()
        };
        Ok(session.with_locale(&self.cfg.search.locale_cookie))
    }

    async fn browser_cookies(
        &self,
        set: &TopicSet,
    ) -> Result<std::collections::BTreeMap<String, String>> {
        let options = BrowserOptions {
            webdriver_url: self.cfg.browser.webdriver_url.clone(),
            headless: self.cfg.browser.headless,
            user_agent: self.cfg.search.user_agent.clone(),
            ..BrowserOptions::default()
        };
        let browser = BrowserSession::open(&options)
            .await
            .map_err(TallyError::Driver)?;

        let harvested = async {
            browser.visit(&self.cfg.browser.start_url).await?;
            wait_for_operator(&set.name).await?;
            browser.cookies().await
        }
        .await;

        if let Err(err) = browser.close().await {
            tracing::warn!(error = %err, "browser session did not close cleanly");
        }
        harvested.map_err(|err| TallyError::Driver(err).into())
    }

    /// Search every topic of `set` in sorted order. Returns the harvest and the
    /// number of skipped topics.
    async fn scrape_set(&self, set: &TopicSet, session: &SearchSession) -> Result<(Harvest, usize)> {
        let queries = set.sorted_topics();
        let delay = Duration::from_millis(self.cfg.search.delay_ms);
        let mut results = QueryResultSet::new();
        let mut searched = Vec::with_capacity(queries.len());
        let mut skipped = 0;

        for (i, query) in queries.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            tracing::info!(
                set = %set.name,
                query = %query,
                progress = %format!("{}/{}", i + 1, queries.len()),
                "tubetally.query"
            );

            match self.search.search(query, session).await {
                Ok(records) => {
                    results.insert(query.clone(), records);
                    searched.push(query.clone());
                }
                Err(err) => {
                    let err = TallyError::query(query.clone(), err);
                    match self.cfg.on_query_error {
                        QueryErrorPolicy::Abort => return Err(err.into()),
                        QueryErrorPolicy::Skip => {
                            tracing::warn!(set = %set.name, error = %err, "tubetally.query.skipped");
                            skipped += 1;
                        }
                    }
                }
            }
        }

        tracing::info!(
            set = %set.name,
            queries = searched.len(),
            results = results.total_records(),
            "tubetally.set.done"
        );
        let harvest = Harvest {
            name: set.name.clone(),
            queries: searched,
            results,
        };
        Ok((harvest, skipped))
    }
}

async fn wait_for_operator(set_name: &str) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(
            format!(
                "Accept the consent dialog in the browser, then press RETURN to scrape topic set {set_name}\n"
            )
            .as_bytes(),
        )
        .await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("waiting for RETURN on stdin")?;
    Ok(())
}
