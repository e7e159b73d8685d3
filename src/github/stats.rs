use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Commit counts per author login, remembering the order logins were first seen.
#[derive(Debug, Default, Clone)]
pub struct AuthorTally {
    order: Vec<String>,
    counts: HashMap<String, u64>,
}

impl AuthorTally {
    /// Adds `amount` to `login`, registering it on first sight.
    pub fn add(&mut self, login: &str, amount: u64) {
        match self.counts.get_mut(login) {
            Some(count) => *count += amount,
            None => {
                self.order.push(login.to_string());
                self.counts.insert(login.to_string(), amount);
            }
        }
    }

    /// Top `limit` authors by commit count, ties in first-seen order.
    pub fn into_ranked(self, limit: usize) -> Vec<AuthorCommits> {
        let mut ranked: Vec<AuthorCommits> = self
            .order
            .into_iter()
            .map(|login| {
                let commits = self.counts.get(&login).copied().unwrap_or(0);
                AuthorCommits { login, commits }
            })
            .collect();
        // stable sort keeps first-seen order among equal counts
        ranked.sort_by(|a, b| b.commits.cmp(&a.commits));
        ranked.truncate(limit);
        ranked
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCommits {
    pub login: String,
    pub commits: u64,
}

/// Open/closed/old counts for pull requests or issues. `old` overlaps the
/// other two.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounters {
    pub open: u64,
    pub closed: u64,
    pub old: u64,
}

impl StateCounters {
    pub fn total(&self) -> u64 {
        self.open + self.closed
    }
}
