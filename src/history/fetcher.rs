use super::pagination::last_page;
use super::HistoryContext;
use crate::clients::ApiClient;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Deserialize)]
struct CommitEntry {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    committer: Signature,
}

#[derive(Debug, Deserialize)]
struct Signature {
    date: String,
}

fn commits_endpoint(repo: &str, path: &str) -> String {
    let path: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
    format!("/repos/{}/commits?path={}&per_page=1", repo, path)
}

/// Committer date of the last entry on a commits page
fn last_entry_date(body: &str) -> Result<Option<String>> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(None);
    }

    let commits: Vec<CommitEntry> =
        serde_json::from_str(body).context("Failed to parse commits page")?;

    Ok(commits.into_iter().last().map(|c| c.commit.committer.date))
}

/// Date of the oldest commit touching `path` in `repo`.
///
/// Pages hold one commit, newest first, so the page advertised as
/// `rel="last"` holds the oldest one.
pub fn oldest_commit_date(client: &dyn ApiClient, repo: &str, path: &str) -> Result<Option<String>> {
    let endpoint = commits_endpoint(repo, path);
    let first = client.get_with_headers(&endpoint)?;

    match last_page(&first.headers) {
        Some(page) => {
            let body = client.get(&format!("{}&page={}", endpoint, page))?;
            last_entry_date(&body)
        }
        None => last_entry_date(&first.body),
    }
}

/// Resolve a package to its defining file and fetch that file's oldest commit.
///
/// Every failure is reported as no history.
pub fn fetch_first_commit(ctx: &HistoryContext, client: &dyn ApiClient, name: &str) -> Option<String> {
    let (repo, path) = ctx.resolve(name)?;

    match oldest_commit_date(client, repo, path) {
        Ok(date) => date,
        Err(e) => {
            log::debug!("Fetch failed for {}/{}: {:#}", repo, path, e);
            None
        }
    }
}

/// Fetch first-commit dates for many packages on a bounded worker pool.
///
/// Only packages with a found date appear in the result.
pub fn fetch_all(
    ctx: &HistoryContext,
    client: &dyn ApiClient,
    names: &BTreeSet<String>,
    max_parallel: usize,
) -> Result<HashMap<String, String>> {
    let progress = ProgressBar::new(names.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let results: Vec<(String, Option<String>)> = rayon::ThreadPoolBuilder::new()
        .num_threads(max_parallel.max(1))
        .build()?
        .install(|| {
            names
                .par_iter()
                .map(|name| {
                    let date = fetch_first_commit(ctx, client, name);
                    progress.set_message(name.clone());
                    progress.inc(1);
                    (name.clone(), date)
                })
                .collect()
        });

    progress.finish_and_clear();

    let mut found = HashMap::new();
    for (name, date) in results {
        match date {
            Some(date) => {
                log::debug!("Found history for {}: {}", name, date);
                found.insert(name, date);
            }
            None => log::debug!("No history found for {}", name),
        }
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ApiResponse;
    use crate::history::{InstalledMetadata, TapMapping};
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Serves canned responses and records every endpoint requested
    #[derive(Default)]
    struct FakeApi {
        pages: HashMap<String, ApiResponse>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn page(mut self, endpoint: &str, headers: &str, body: &str) -> Self {
            self.pages.insert(
                endpoint.to_string(),
                ApiResponse {
                    headers: headers.to_string(),
                    body: body.to_string(),
                },
            );
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn lookup(&self, endpoint: &str) -> Result<ApiResponse> {
            self.calls.lock().unwrap().push(endpoint.to_string());
            self.pages
                .get(endpoint)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("HTTP 404: {}", endpoint))
        }
    }

    impl ApiClient for FakeApi {
        fn get_with_headers(&self, endpoint: &str) -> Result<ApiResponse> {
            self.lookup(endpoint)
        }

        fn get(&self, endpoint: &str) -> Result<String> {
            self.lookup(endpoint).map(|r| r.body)
        }
    }

    fn commits(date: &str) -> String {
        format!(
            r#"[{{"sha": "abc", "commit": {{"committer": {{"name": "x", "date": "{}"}}}}}}]"#,
            date
        )
    }

    const WGET: &str = "/repos/Homebrew/homebrew-core/commits?path=Formula%2Fw%2Fwget.rb&per_page=1";

    fn context() -> HistoryContext {
        let installed = InstalledMetadata::from_info_json(
            r#"{"formulae": [
                {"name": "wget", "tap": "homebrew/core", "ruby_source_path": "Formula/w/wget.rb"},
                {"name": "jq", "tap": "homebrew/core", "ruby_source_path": "Formula/j/jq.rb"},
                {"name": "orphan", "tap": "nobody/nothing", "ruby_source_path": "Formula/orphan.rb"}
            ]}"#,
        )
        .unwrap();
        HistoryContext {
            taps: TapMapping::build(None, &BTreeMap::new()),
            installed,
        }
    }

    #[test]
    fn jumps_straight_to_last_page() {
        let headers = format!(
            "HTTP/2.0 200 OK\nLink: <https://api.github.com{}&page=2>; rel=\"next\", <https://api.github.com{}&page=412>; rel=\"last\"",
            WGET, WGET
        );
        let api = FakeApi::default()
            .page(WGET, &headers, &commits("2024-05-01T00:00:00Z"))
            .page(&format!("{}&page=412", WGET), "", &commits("2009-10-03T12:00:00Z"));

        let date = oldest_commit_date(&api, "Homebrew/homebrew-core", "Formula/w/wget.rb").unwrap();

        assert_eq!(date.as_deref(), Some("2009-10-03T12:00:00Z"));
        assert_eq!(api.calls(), vec![WGET.to_string(), format!("{}&page=412", WGET)]);
    }

    #[test]
    fn path_is_encoded_in_query_string() {
        assert_eq!(
            commits_endpoint("Homebrew/homebrew-core", "Formula/lib/libsigc++.rb"),
            "/repos/Homebrew/homebrew-core/commits?path=Formula%2Flib%2Flibsigc%2B%2B.rb&per_page=1"
        );
        assert_eq!(
            commits_endpoint("me/tools", "Casks/a b&c#d.rb"),
            "/repos/me/tools/commits?path=Casks%2Fa+b%26c%23d.rb&per_page=1"
        );
    }

    #[test]
    fn single_page_uses_first_response() {
        let api = FakeApi::default().page(WGET, "HTTP/2.0 200 OK", &commits("2023-01-02T03:04:05Z"));

        let date = oldest_commit_date(&api, "Homebrew/homebrew-core", "Formula/w/wget.rb").unwrap();

        assert_eq!(date.as_deref(), Some("2023-01-02T03:04:05Z"));
        assert_eq!(api.calls(), vec![WGET.to_string()]);
    }

    #[test]
    fn empty_history_is_none() {
        let api = FakeApi::default().page(WGET, "HTTP/2.0 200 OK", "[]");
        let date = oldest_commit_date(&api, "Homebrew/homebrew-core", "Formula/w/wget.rb").unwrap();
        assert_eq!(date, None);
    }

    #[test]
    fn malformed_body_is_an_error_but_not_fatal() {
        let api = FakeApi::default().page(WGET, "HTTP/2.0 200 OK", "{\"message\": \"Bad credentials\"}");

        assert!(oldest_commit_date(&api, "Homebrew/homebrew-core", "Formula/w/wget.rb").is_err());
        assert_eq!(fetch_first_commit(&context(), &api, "wget"), None);
    }

    #[test]
    fn unresolvable_package_makes_no_requests() {
        let api = FakeApi::default();
        let ctx = context();

        assert_eq!(fetch_first_commit(&ctx, &api, "not-installed"), None);
        assert_eq!(fetch_first_commit(&ctx, &api, "orphan"), None);
        assert!(api.calls().is_empty());
    }

    #[test]
    fn batch_isolates_failures() {
        let api = FakeApi::default().page(WGET, "", &commits("2009-10-03T12:00:00Z"));
        let names: BTreeSet<String> = ["wget", "jq", "orphan", "missing"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let found = fetch_all(&context(), &api, &names, 5).unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found["wget"], "2009-10-03T12:00:00Z");
    }
}
