use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dates;
use crate::diagnostics::Diagnostics;

pub mod client;
pub mod error;
pub mod links;
pub mod paginator;
pub mod stats;
pub mod transport;

#[cfg(test)]
pub mod testing;

pub use client::{ClientOptions, GithubClient};
pub use links::parse_repo_url;
pub use stats::{AuthorCommits, StateCounters};
pub use transport::{HttpTransport, InstrumentedTransport};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Upper bound on records per page; a shorter page ends a walk.
pub const PAGE_SIZE: usize = 100;

/// One decoded page of records.
pub type Page = Vec<Map<String, Value>>;

/// Repository and branch every query targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryCoordinates {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl RepositoryCoordinates {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
        }
    }
}

/// Optional `since`/`until` bounds, already in canonical form.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFilter {
    pub since: Option<String>,
    pub until: Option<String>,
}

impl DateFilter {
    /// Normalizes raw user input. Unparseable bounds are dropped with a warning.
    pub fn from_raw(since: Option<&str>, until: Option<&str>, diagnostics: &dyn Diagnostics) -> Self {
        Self {
            since: since.and_then(|raw| dates::normalize(Some(raw), diagnostics)),
            until: until.and_then(|raw| dates::normalize(Some(raw), diagnostics)),
        }
    }
}

/// What to do with a pull request or issue whose state is neither
/// `open` nor `closed`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownStatePolicy {
    /// Fail the whole classification.
    #[default]
    Reject,
    /// Warn and leave the record out of the open/closed buckets.
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::recording::RecordingDiagnostics;

    #[test]
    fn date_filter_keeps_valid_bounds_and_drops_bad_ones() {
        let sink = RecordingDiagnostics::new();
        let filter = DateFilter::from_raw(Some("2019-04-16"), Some("16/04/2019"), sink.as_ref());

        assert_eq!(filter.since.as_deref(), Some("2019-04-16T00:00:00Z"));
        assert_eq!(filter.until, None);
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn absent_bounds_are_not_warned_about() {
        let sink = RecordingDiagnostics::new();
        let filter = DateFilter::from_raw(None, None, sink.as_ref());

        assert_eq!(filter, DateFilter::default());
        assert!(sink.warnings().is_empty());
    }

    #[test]
    fn unknown_state_policy_reads_lowercase() {
        let policy: UnknownStatePolicy = serde_json::from_str("\"skip\"").unwrap();
        assert_eq!(policy, UnknownStatePolicy::Skip);
        assert_eq!(UnknownStatePolicy::default(), UnknownStatePolicy::Reject);
    }
}
