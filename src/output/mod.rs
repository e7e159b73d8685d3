use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod reporter;
pub mod text;

pub use reporter::Reporter;

use crate::github::{AuthorCommits, DateFilter, RepositoryCoordinates, StateCounters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

pub fn add_file_extension(path: &str, format: &OutputFormat) -> String {
    let extension = match format {
        OutputFormat::Text => ".txt",
        OutputFormat::Json => ".json",
    };

    if path.ends_with(extension) {
        path.to_string()
    } else {
        format!("{}{}", path, extension)
    }
}

/// A pull request or issue summary along with the age used for `old`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSummary {
    pub days_old: u32,
    #[serde(flatten)]
    pub counters: StateCounters,
}

/// Everything one run collects, ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryReport {
    pub repository: RepositoryCoordinates,
    pub html_url: String,
    pub dates: DateFilter,
    pub authors_requested: usize,
    pub authors: Vec<AuthorCommits>,
    pub pull_requests: StateSummary,
    pub issues: StateSummary,
    pub generated_at: DateTime<Utc>,
}

pub trait OutputGenerator {
    fn generate(&self, report: &RepositoryReport) -> Result<String>;
}

pub struct JsonGenerator;

impl OutputGenerator for JsonGenerator {
    fn generate(&self, report: &RepositoryReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing_falls_back_to_text() {
        assert_eq!(OutputFormat::from("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::from("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::from("html"), OutputFormat::Text);
    }

    #[test]
    fn extension_is_added_once() {
        assert_eq!(add_file_extension("report", &OutputFormat::Json), "report.json");
        assert_eq!(add_file_extension("report.json", &OutputFormat::Json), "report.json");
        assert_eq!(add_file_extension("report", &OutputFormat::Text), "report.txt");
    }

    #[test]
    fn json_flattens_counters() {
        let rendered = JsonGenerator.generate(&fixtures::sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["authors"][0]["login"], "bob");
        assert_eq!(value["pull_requests"]["open"], 3);
        assert_eq!(value["pull_requests"]["days_old"], 30);
        assert_eq!(value["issues"]["closed"], 9);
        assert_eq!(value["dates"]["since"], "2019-04-16T00:00:00Z");
    }
}
