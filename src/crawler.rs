//! Depth-bounded, same-origin website crawler.
//!
//! A [`Crawler`] owns one crawl session: an explicit work-list stack of
//! `(url, depth)` pairs plus a visited set, both discarded when the session
//! ends. Traversal is depth-first in document order — each page's links are
//! pushed in reverse so the first anchor on a page is crawled first.
//!
//! A discovered link is followed only when its absolute form, resolved
//! against the page it appeared on, starts with the literal configured base
//! URL. This is a textual prefix check, not a parsed-origin comparison.
//!
//! Fetch and parse failures are contained to their URL: they are logged,
//! counted, and the crawl moves on.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::errors::RagError;
use crate::ingest::IngestionPipeline;

/// Counts reported back from one crawl invocation.
#[derive(Clone, Copy, Debug, Default)]
pub struct CrawlReport {
    pub pages_visited: usize,
    pub pages_stored: usize,
    pub pages_failed: usize,
}

/// Builds the HTTP client used for crawling.
pub fn http_client(user_agent: &str, timeout: Duration) -> Result<Client, RagError> {
    Ok(Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .use_rustls_tls()
        .build()?)
}

/// One crawl session over a single site.
pub struct Crawler {
    client: Client,
    pipeline: IngestionPipeline,
    base_url: String,
    max_depth: usize,
    visited: HashSet<String>,
}

impl Crawler {
    pub fn new(
        client: Client,
        pipeline: IngestionPipeline,
        base_url: impl Into<String>,
        max_depth: usize,
    ) -> Self {
        Self {
            client,
            pipeline,
            base_url: base_url.into(),
            max_depth,
            visited: HashSet::new(),
        }
    }

    /// Crawls from the base URL, ingesting each successfully fetched page.
    ///
    /// Returns an error only when the base URL itself does not parse;
    /// everything after that runs to completion, with per-URL failures
    /// reflected in the report.
    pub async fn run(mut self) -> Result<CrawlReport, RagError> {
        let start = Url::parse(&self.base_url)
            .map_err(|err| RagError::InvalidDocument(format!("base url: {err}")))?;

        info!(base_url = %self.base_url, max_depth = self.max_depth, "starting crawl");

        let mut report = CrawlReport::default();
        let mut work = vec![(start, 0usize)];

        while let Some((url, depth)) = work.pop() {
            if depth > self.max_depth {
                debug!(%url, depth, "past depth bound");
                continue;
            }
            if !self.visited.insert(url.as_str().to_string()) {
                debug!(%url, "already visited");
                continue;
            }

            info!(%url, depth, "crawling");
            report.pages_visited += 1;

            let body = match self.fetch(&url).await {
                Ok(body) => body,
                Err(err) => {
                    warn!(%url, error = %err, "fetch failed; continuing crawl");
                    report.pages_failed += 1;
                    continue;
                }
            };

            let page = match parse_page(&url, &body) {
                Ok(page) => page,
                Err(err) => {
                    warn!(%url, error = %err, "parse failed; continuing crawl");
                    report.pages_failed += 1;
                    continue;
                }
            };

            match self.pipeline.ingest(&page.text, url.as_str()).await {
                Ok(()) => report.pages_stored += 1,
                Err(err) => {
                    warn!(%url, error = %err, "ingestion failed; continuing crawl");
                    report.pages_failed += 1;
                }
            }

            for link in page.links.into_iter().rev() {
                if link.as_str().starts_with(&self.base_url) {
                    work.push((link, depth + 1));
                }
            }
        }

        info!(
            visited = report.pages_visited,
            stored = report.pages_stored,
            failed = report.pages_failed,
            "crawl finished"
        );
        Ok(report)
    }

    async fn fetch(&self, url: &Url) -> Result<String, RagError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

struct Page {
    text: String,
    links: Vec<Url>,
}

/// Extracts the page's text content and its anchor targets, resolved against
/// `page_url`, in document order. Fragments are dropped; unresolvable hrefs
/// are skipped.
fn parse_page(page_url: &Url, body: &str) -> Result<Page, RagError> {
    let document = Html::parse_document(body);

    let text = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");

    let selector =
        Selector::parse("a[href]").map_err(|err| RagError::InvalidDocument(err.to_string()))?;

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if let Ok(mut link) = page_url.join(href) {
            link.set_fragment(None);
            links.push(link);
        }
    }

    Ok(Page { text, links })
}
