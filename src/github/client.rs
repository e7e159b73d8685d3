use chrono::{DateTime, Duration, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::time::Instant;

use super::error::{ClientError, ClientResult};
use super::paginator::Paginator;
use super::stats::{AuthorCommits, AuthorTally, StateCounters};
use super::transport::Transport;
use super::{DateFilter, RepositoryCoordinates, UnknownStatePolicy, DEFAULT_API_BASE, PAGE_SIZE};
use crate::dates;
use crate::diagnostics::SharedDiagnostics;

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub api_base_url: String,
    pub unknown_state: UnknownStatePolicy,
    pub show_progress: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            unknown_state: UnknownStatePolicy::Reject,
            show_progress: false,
        }
    }
}

/// Aggregates contributor, pull request and issue data for one repository.
pub struct GithubClient<T> {
    transport: T,
    coordinates: RepositoryCoordinates,
    dates: DateFilter,
    repo_url: String,
    options: ClientOptions,
    diagnostics: SharedDiagnostics,
}

impl<T: Transport> GithubClient<T> {
    pub fn new(
        transport: T,
        coordinates: RepositoryCoordinates,
        dates: DateFilter,
        options: ClientOptions,
        diagnostics: SharedDiagnostics,
    ) -> Self {
        let repo_url = format!(
            "{}/repos/{}/{}",
            options.api_base_url.trim_end_matches('/'),
            coordinates.owner,
            coordinates.repo
        );

        diagnostics.info(&format!(
            "owner: {}, repository: {}, branch: {}",
            coordinates.owner, coordinates.repo, coordinates.branch
        ));
        diagnostics.info(&format!(
            "date from: {}, date to: {}",
            dates.since.as_deref().unwrap_or("-"),
            dates.until.as_deref().unwrap_or("-")
        ));

        Self {
            transport,
            coordinates,
            dates,
            repo_url,
            options,
            diagnostics,
        }
    }

    pub fn coordinates(&self) -> &RepositoryCoordinates {
        &self.coordinates
    }

    pub fn date_filter(&self) -> &DateFilter {
        &self.dates
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.repo_url, name)
    }

    fn paginate(&self, endpoint: &str, filters: Value, page_size: usize) -> Paginator<'_> {
        let filters = match filters {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Paginator::new(&self.transport, self.endpoint(endpoint), filters, &self.dates, page_size)
    }

    /// Up to `max_authors` distinct contributor logins, in server order.
    async fn sample_authors(&self, max_authors: usize) -> ClientResult<Vec<String>> {
        let mut pages = self.paginate("contributors", json!({}), max_authors.min(PAGE_SIZE));
        let mut seen = HashSet::new();
        let mut authors = Vec::new();

        'pages: while let Some(page) = pages.next_page().await? {
            for record in page {
                let login = string_field(&record, "login", "contributors")?;
                if seen.insert(login.to_string()) {
                    authors.push(login.to_string());
                }
                if authors.len() >= max_authors {
                    break 'pages;
                }
            }
        }

        Ok(authors)
    }

    /// The most active authors on the configured branch, busiest first.
    ///
    /// Samples up to `max_authors` contributors, then counts each one's
    /// commits by walking the commits endpoint filtered by author and branch.
    /// Repositories with fewer contributors yield a shorter list.
    pub async fn author_commit_counts(&self, max_authors: usize) -> ClientResult<Vec<AuthorCommits>> {
        if max_authors == 0 {
            return Err(ClientError::InvalidArgument(
                "author count must be positive".to_string(),
            ));
        }
        let started = Instant::now();

        let authors = self.sample_authors(max_authors).await?;
        self.diagnostics
            .info(&format!("sampled {} contributors", authors.len()));

        let progress = self.progress_bar(authors.len() as u64);
        let mut tally = AuthorTally::default();

        for author in &authors {
            tally.add(author, 0);
            let mut pages = self.paginate(
                "commits",
                json!({"author": author, "sha": self.coordinates.branch}),
                PAGE_SIZE,
            );
            while let Some(page) = pages.next_page().await? {
                tally.add(author, page.len() as u64);
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        self.diagnostics.info(&format!(
            "author commit counts collected in {:.3}s",
            started.elapsed().as_secs_f64()
        ));
        Ok(tally.into_ranked(max_authors))
    }

    pub async fn pull_requests(&self, days_old: u32) -> ClientResult<StateCounters> {
        self.classify("pulls", days_old).await
    }

    pub async fn issues(&self, days_old: u32) -> ClientResult<StateCounters> {
        self.classify("issues", days_old).await
    }

    /// Tallies every record of `endpoint` by state, counting records created
    /// more than `days_old` days before now as old.
    pub async fn classify(&self, endpoint: &str, days_old: u32) -> ClientResult<StateCounters> {
        let started = Instant::now();
        let counters = self.classify_at(endpoint, days_old, Utc::now()).await?;

        self.diagnostics.info(&format!(
            "{}: open {}, closed {}, old {} in {:.3}s",
            endpoint,
            counters.open,
            counters.closed,
            counters.old,
            started.elapsed().as_secs_f64()
        ));
        Ok(counters)
    }

    async fn classify_at(
        &self,
        endpoint: &str,
        days_old: u32,
        now: DateTime<Utc>,
    ) -> ClientResult<StateCounters> {
        let threshold = Duration::days(i64::from(days_old));
        let mut counters = StateCounters::default();
        let mut pages = self.paginate(endpoint, json!({"state": "all"}), PAGE_SIZE);

        while let Some(page) = pages.next_page().await? {
            for record in page {
                match string_field(&record, "state", endpoint)? {
                    "open" => counters.open += 1,
                    "closed" => counters.closed += 1,
                    other => match self.options.unknown_state {
                        UnknownStatePolicy::Reject => {
                            return Err(ClientError::UnexpectedState {
                                endpoint: endpoint.to_string(),
                                state: other.to_string(),
                            })
                        }
                        UnknownStatePolicy::Skip => self.diagnostics.warn(&format!(
                            "skipping unexpected state {:?} in {} record",
                            other, endpoint
                        )),
                    },
                }

                let created_at = dates::parse(string_field(&record, "created_at", endpoint)?)?;
                if now.signed_duration_since(created_at) > threshold {
                    counters.old += 1;
                }
            }
        }

        Ok(counters)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} authors ({eta})",
        ) {
            pb.set_style(style.progress_chars("=>-"));
        }
        pb
    }
}

fn string_field<'r>(
    record: &'r Map<String, Value>,
    field: &'static str,
    endpoint: &str,
) -> ClientResult<&'r str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| ClientError::MissingField {
            endpoint: endpoint.to_string(),
            field,
        })
}
