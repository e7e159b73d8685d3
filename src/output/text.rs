use super::*;
use anyhow::Result;
use colored::*;
use std::fmt::Write;

use crate::github::StateCounters;

/// Plain tab-separated report, optionally colourised for a terminal.
pub struct TextGenerator {
    color: bool,
}

impl TextGenerator {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bright_cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn highlight(&self, text: &str) -> String {
        if self.color {
            text.bright_white().to_string()
        } else {
            text.to_string()
        }
    }

    fn write_states(
        &self,
        out: &mut String,
        title: &str,
        days_old: u32,
        counters: &StateCounters,
    ) -> std::fmt::Result {
        writeln!(
            out,
            "{} (old: created more than {} days ago)",
            self.heading(title),
            days_old
        )?;
        writeln!(out, "open:\t{}", counters.open)?;
        writeln!(out, "closed:\t{}", counters.closed)?;
        writeln!(out, "old:\t{}", counters.old)?;
        writeln!(out, "total:\t{}", counters.total())?;
        writeln!(out)
    }
}

impl OutputGenerator for TextGenerator {
    fn generate(&self, report: &RepositoryReport) -> Result<String> {
        let mut out = String::new();
        let repo = &report.repository;

        writeln!(
            out,
            "Repository: {} ({}/{}, branch {})",
            self.highlight(&report.html_url),
            repo.owner,
            repo.repo,
            repo.branch
        )?;
        writeln!(
            out,
            "Period: {} .. {}",
            report.dates.since.as_deref().unwrap_or("beginning"),
            report.dates.until.as_deref().unwrap_or("now")
        )?;
        writeln!(out)?;

        writeln!(
            out,
            "{}",
            self.heading(&format!("{} most active users:", report.authors_requested))
        )?;
        writeln!(out, "author_login\tcommits")?;
        for author in &report.authors {
            writeln!(out, "{}:\t{}", author.login, author.commits)?;
        }
        writeln!(out)?;

        self.write_states(
            &mut out,
            "PULL REQUESTS",
            report.pull_requests.days_old,
            &report.pull_requests.counters,
        )?;
        self.write_states(&mut out, "ISSUES", report.issues.days_old, &report.issues.counters)?;

        Ok(out)
    }
}
