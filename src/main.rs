use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use colored::*;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

mod config;
mod dates;
mod diagnostics;
mod github;
mod output;

use crate::config::Config;
use github::{
    parse_repo_url, ClientOptions, DateFilter, GithubClient, HttpTransport, InstrumentedTransport,
    RepositoryCoordinates,
};
use output::{RepositoryReport, Reporter, StateSummary};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Public GitHub repository url, e.g. https://github.com/owner/repo
    #[arg(short, long)]
    url: String,

    /// Only count activity since this date (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SSZ)
    #[arg(long = "date-from", visible_alias = "df")]
    date_from: Option<String>,

    /// Only count activity until this date (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SSZ)
    #[arg(long = "date-to", visible_alias = "dt")]
    date_to: Option<String>,

    /// Branch to count commits on [config default: master]
    #[arg(short, long)]
    branch: Option<String>,

    /// GitHub API token; unauthenticated requests are heavily rate limited
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Number of most active authors to report
    #[arg(short = 'n', long)]
    authors: Option<usize>,

    /// Pull requests older than this many days count as old
    #[arg(long)]
    pull_days: Option<u32>,

    /// Issues older than this many days count as old
    #[arg(long)]
    issue_days: Option<u32>,

    /// Output format (text, json)
    #[arg(short, long)]
    output: Option<String>,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    output_file: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Configuration file (toml, yaml or json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let started = Instant::now();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let log_file = cli.log_file.clone().or_else(|| config.log_file.clone());
    init_logging(cli.verbose, log_file.as_deref())?;

    let repo_ref = parse_repo_url(&cli.url)?;
    let branch = cli.branch.clone().unwrap_or_else(|| config.branch.clone());
    let authors_count = cli.authors.unwrap_or(config.authors_count);
    let pull_days = cli.pull_days.unwrap_or(config.pull_days);
    let issue_days = cli.issue_days.unwrap_or(config.issue_days);
    let format = cli.output.clone().unwrap_or_else(|| config.output_format.clone());

    eprintln!(
        "{}",
        "repo-pulse - GitHub repository activity report"
            .bright_cyan()
            .bold()
    );
    eprintln!("Repository: {}", repo_ref.branch_url(&branch).bright_white());

    let diagnostics = diagnostics::tracing_sink();
    let dates = DateFilter::from_raw(
        cli.date_from.as_deref(),
        cli.date_to.as_deref(),
        diagnostics.as_ref(),
    );

    let token = cli.token.clone().or_else(|| config.token.clone());
    let transport = HttpTransport::new(
        token,
        Duration::from_secs(config.timeout_secs),
        &diagnostics,
    )?;
    let transport = InstrumentedTransport::new(transport, diagnostics.clone());

    let client = GithubClient::new(
        transport,
        RepositoryCoordinates::new(&repo_ref.name, &repo_ref.repo, branch),
        dates,
        ClientOptions {
            api_base_url: config.api_base_url.clone(),
            unknown_state: config.unknown_state,
            show_progress: !cli.verbose,
        },
        diagnostics,
    );
    let reporter = Reporter::new(&format, cli.output_file.as_deref())?;

    info!("Collecting the {} most active authors...", authors_count);
    let authors = client
        .author_commit_counts(authors_count)
        .await
        .context("Failed to collect author commit counts")?;

    info!("Collecting pull request states...");
    let pulls = client
        .pull_requests(pull_days)
        .await
        .context("Failed to collect pull request states")?;

    info!("Collecting issue states...");
    let issues = client
        .issues(issue_days)
        .await
        .context("Failed to collect issue states")?;

    let report = RepositoryReport {
        repository: client.coordinates().clone(),
        html_url: repo_ref.html_url(),
        dates: client.date_filter().clone(),
        authors_requested: authors_count,
        authors,
        pull_requests: StateSummary {
            days_old: pull_days,
            counters: pulls,
        },
        issues: StateSummary {
            days_old: issue_days,
            counters: issues,
        },
        generated_at: Utc::now(),
    };

    reporter.generate_report(&report)?;

    info!(
        "total work time {:.3}sec",
        started.elapsed().as_secs_f64()
    );
    eprintln!("\n{}", "Report complete!".bright_green().bold());

    Ok(())
}
