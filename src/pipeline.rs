//! The extraction run: every submitted URL, in order, one at a time.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};
use url::Url;

use crate::enrich::enrich_rows;
use crate::error::{RunError, ScheduleError};
use crate::extract::extract_rows;
use crate::fetch::PageSource;
use crate::html::SchedulePage;
use crate::openai::CompletionModel;
use crate::schedule::{ScheduleRow, ScheduleTable};
use crate::utils::{log_if_slow, normalize_domain};

/// Split pasted input into URLs: one per line, trimmed, blanks dropped.
pub fn parse_url_list(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// What happened to one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlOutcome {
    Extracted { url: String, rows: usize },
    Skipped { url: String, reason: String },
}

/// Result of a run that produced at least one row.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub table: ScheduleTable,
    pub outcomes: Vec<UrlOutcome>,
}

impl RunReport {
    pub fn skipped(&self) -> usize {
        count_skipped(&self.outcomes)
    }
}

fn count_skipped(outcomes: &[UrlOutcome]) -> usize {
    outcomes
        .iter()
        .filter(|o| matches!(o, UrlOutcome::Skipped { .. }))
        .count()
}

#[derive(Clone)]
pub struct ScheduleReader {
    pages: Arc<dyn PageSource>,
    model: Arc<dyn CompletionModel>,
}

impl ScheduleReader {
    pub fn new(pages: Arc<dyn PageSource>, model: Arc<dyn CompletionModel>) -> Self {
        Self { pages, model }
    }

    /// Fetch → text and links → model → enrichment for a single URL.
    #[instrument(skip(self))]
    pub async fn process_url(&self, url: &str) -> Result<Vec<ScheduleRow>, ScheduleError> {
        let parsed = Url::parse(url)?;
        let host = parsed.host_str().ok_or(ScheduleError::MissingHost)?;
        let team_domain = normalize_domain(host).to_string();

        let body = self.pages.fetch(&parsed).await?;

        // Html is !Send; drop it before awaiting the model.
        let (text, lookup) = {
            let page = SchedulePage::parse(&body);
            (page.flattened_text(), page.domain_lookup(&team_domain))
        };

        let start = Instant::now();
        let extracted = extract_rows(self.model.as_ref(), &text).await?;
        log_if_slow(start, Duration::from_secs(30), "schedule extraction");

        Ok(enrich_rows(extracted, &lookup, &team_domain))
    }

    /// Process `urls` in order. Failed URLs are skipped; an empty input or
    /// an empty combined table is an error.
    pub async fn run(&self, urls: &[String]) -> Result<RunReport, RunError> {
        if urls.is_empty() {
            return Err(RunError::NoInput);
        }

        let mut table = ScheduleTable::new();
        let mut outcomes = Vec::with_capacity(urls.len());

        for url in urls {
            match self.process_url(url).await {
                Ok(rows) => {
                    info!(url = %url, rows = rows.len(), "schedule extracted");
                    outcomes.push(UrlOutcome::Extracted {
                        url: url.clone(),
                        rows: rows.len(),
                    });
                    table.extend(rows);
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "skipping URL");
                    outcomes.push(UrlOutcome::Skipped {
                        url: url.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if table.is_empty() {
            return Err(RunError::NoRows {
                skipped: count_skipped(&outcomes),
            });
        }

        Ok(RunReport { table, outcomes })
    }
}
