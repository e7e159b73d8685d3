use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::error::{ClientError, ClientResult};

static REPO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://github\.com/(?P<name>[A-Za-z0-9_-]+)/(?P<repo>[A-Za-z0-9_-]+)")
        .expect("repository url pattern is valid")
});

/// Owner and repository named by a public GitHub url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub name: String,
    pub repo: String,
}

impl RepoRef {
    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.name, self.repo)
    }

    pub fn branch_url(&self, branch: &str) -> String {
        format!("{}/tree/{}", self.html_url(), branch)
    }
}

/// Extracts owner and repository from `http(s)://github.com/<owner>/<repo>`.
/// Anything after the repository segment is ignored.
pub fn parse_repo_url(raw: &str) -> ClientResult<RepoRef> {
    let captures = REPO_URL
        .captures(raw)
        .ok_or_else(|| ClientError::UrlParse(raw.to_string()))?;

    Ok(RepoRef {
        name: captures["name"].to_string(),
        repo: captures["repo"].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_public_url() {
        let parsed = parse_repo_url("https://github.com/StuBz211/ticker_app").unwrap();
        assert_eq!(
            parsed,
            RepoRef {
                name: "StuBz211".into(),
                repo: "ticker_app".into()
            }
        );
    }

    #[test]
    fn ignores_trailing_segments_and_suffixes() {
        let parsed = parse_repo_url("https://github.com/sbt/tr-kd/test_project").unwrap();
        assert_eq!(parsed.name, "sbt");
        assert_eq!(parsed.repo, "tr-kd");

        let parsed = parse_repo_url("http://github.com/rust-lang/cargo.git").unwrap();
        assert_eq!(parsed.repo, "cargo");
    }

    #[test]
    fn rejects_non_matching_urls() {
        for raw in ["", "https://gitlab.com/a/b", "github.com/a/b", "https://github.com/only"] {
            let err = parse_repo_url(raw).unwrap_err();
            assert!(matches!(err, ClientError::UrlParse(_)), "{}", raw);
        }
    }

    #[test]
    fn repeated_parses_share_one_pattern() {
        for _ in 0..3 {
            let parsed = parse_repo_url("https://github.com/StuBz211/ticker_app").unwrap();
            assert_eq!(parsed.repo, "ticker_app");
        }
        assert!(REPO_URL.is_match("http://github.com/a/b"));
        assert!(!REPO_URL.is_match("https://gitlab.com/a/b"));
    }

    #[test]
    fn builds_links_back() {
        let parsed = parse_repo_url("https://github.com/StuBz211/ticker_app").unwrap();
        assert_eq!(parsed.html_url(), "https://github.com/StuBz211/ticker_app");
        assert_eq!(
            parsed.branch_url("master"),
            "https://github.com/StuBz211/ticker_app/tree/master"
        );
    }
}
