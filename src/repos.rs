//! Repository loader.
//!
//! Runs once per page load:
//!
//! 1. `begin_load` reads the list's `data-*` attributes and either shows setup
//!    guidance (account not configured) or the loading placeholder
//! 2. `load_repositories` asks a `RepoSource` for the raw listing, decodes it
//!    leniently and drops forks unless the page opts in
//! 3. `finish_load` renders cards, the empty state, or the error message
//!
//! The card list and the placeholder are never visible at the same time.

use chrono::{DateTime, Local, NaiveDate};
use maud::{Markup, PreEscaped, Render, html};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::future::Future;

use crate::github::RepoError;
use crate::page::{Document, EmptyState};

/// Account value shipped in the default markup, meaning "not configured yet"
pub const PLACEHOLDER_ACCOUNT: &str = "your-github-username";

/// Repositories requested when `data-repo-limit` is missing or invalid
const DEFAULT_LIMIT: u32 = 5;

/// Largest page size the API accepts
const MAX_PER_PAGE: u32 = 100;

const DEFAULT_SORT: &str = "updated";

/// Whether `account` is usable for an API request
pub fn is_configured_account(account: &str) -> bool {
    !account.is_empty() && account != PLACEHOLDER_ACCOUNT
}

/// Leading integer of `raw`, the way `parseInt(raw, 10)` reads it
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // All digits, so the only possible failure is overflow
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Settings declared on the repository list element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoListSettings {
    /// Requested number of repositories, always positive
    pub limit: u32,
    pub sort: String,
    pub include_forks: bool,
}

impl RepoListSettings {
    /// Read `repoLimit`, `repoSort` and `includeForks` from a dataset
    pub fn from_dataset(dataset: &BTreeMap<String, String>) -> Self {
        let limit = dataset
            .get("repoLimit")
            .and_then(|raw| parse_leading_int(raw))
            .filter(|limit| *limit > 0)
            .map(|limit| u32::try_from(limit).unwrap_or(u32::MAX))
            .unwrap_or(DEFAULT_LIMIT);

        let sort = dataset
            .get("repoSort")
            .filter(|sort| !sort.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_SORT.to_string());

        let include_forks = dataset.get("includeForks").map(String::as_str) == Some("true");

        Self {
            limit,
            sort,
            include_forks,
        }
    }

    /// `per_page` query value, clamped to what the API accepts
    pub fn per_page(&self) -> u32 {
        self.limit.clamp(1, MAX_PER_PAGE)
    }
}

/// One repository listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRequest {
    pub account: String,
    pub sort: String,
    pub per_page: u32,
    pub include_forks: bool,
}

/// Anything that can produce a raw repository listing
pub trait RepoSource {
    fn list_repos(
        &self,
        request: &RepoRequest,
    ) -> impl Future<Output = Result<serde_json::Value, RepoError>> + Send;
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A repository as listed by the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fork: bool,
    #[serde(default)]
    pub pushed_at: Option<String>,
}

/// Decode a listing. A payload that is not an array yields no repositories,
/// and entries that are not repository objects are skipped.
pub fn parse_repositories(payload: serde_json::Value) -> Vec<Repository> {
    let serde_json::Value::Array(items) = payload else {
        tracing::warn!("Repository listing is not an array, treating it as empty");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(repo) => Some(repo),
            Err(e) => {
                tracing::warn!("Skipping malformed repository entry: {}", e);
                None
            }
        })
        .collect()
}

/// Format a timestamp as e.g. `Mar 5, 2024` in local time.
///
/// Returns the input unchanged if it is not a recognizable date.
pub fn format_date(raw: &str) -> String {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return date.with_timezone(&Local).format("%b %-d, %Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%b %-d, %Y").to_string();
    }
    raw.to_string()
}

/// Content of the empty-state region
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Placeholder {
    #[default]
    Blank,
    Loading,
    /// The account still needs to be set up
    ConfigureAccount,
    NoRepositories,
    /// Carries the error message
    LoadFailed(String),
}

impl Placeholder {
    pub fn text(&self) -> String {
        match self {
            Placeholder::Blank => String::new(),
            Placeholder::Loading => "Loading repositories...".to_string(),
            Placeholder::ConfigureAccount => {
                "Update github.account in config.toml to load your repositories.".to_string()
            }
            Placeholder::NoRepositories => {
                "No repositories found yet. Try adding some public projects.".to_string()
            }
            Placeholder::LoadFailed(message) => {
                format!("Unable to load repositories. {}", message)
            }
        }
    }
}

/// Setup guidance with the key and file name marked up as code
const CONFIGURE_ACCOUNT_HTML: &str =
    "Update <code>github.account</code> in <code>config.toml</code> to load your repositories.";

impl Render for Placeholder {
    fn render(&self) -> Markup {
        match self {
            Placeholder::Blank => html! {},
            Placeholder::ConfigureAccount => html! { p { (PreEscaped(CONFIGURE_ACCOUNT_HTML)) } },
            other => html! { p { (other.text()) } },
        }
    }
}

impl EmptyState {
    /// Make the region visible with `placeholder`
    pub fn show(&mut self, placeholder: Placeholder) {
        self.placeholder = placeholder;
        self.hidden = false;
    }
}

/// Rendered summary of one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoCard {
    pub name: String,
    pub url: String,
    /// `Updated <date>`
    pub updated: String,
    pub description: String,
    pub tags: Vec<String>,
}

impl RepoCard {
    pub fn from_repository(repo: &Repository) -> Self {
        let description = repo
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("No description yet.")
            .to_string();

        let tags = repo
            .language
            .iter()
            .filter(|lang| !lang.is_empty())
            .cloned()
            .collect();

        Self {
            name: repo.name.clone(),
            url: repo.html_url.clone(),
            updated: format!("Updated {}", format_date(repo.pushed_at.as_deref().unwrap_or(""))),
            description,
            tags,
        }
    }
}

impl Render for RepoCard {
    fn render(&self) -> Markup {
        html! {
            article class="repo-card" {
                div class="repo-header" {
                    a class="repo-name" href=(self.url) target="_blank" rel="noopener" { (self.name) }
                    span class="repo-meta" { (self.updated) }
                }
                p { (self.description) }
                @if !self.tags.is_empty() {
                    div class="repo-tags" {
                        @for tag in &self.tags {
                            span { (tag) }
                        }
                    }
                }
            }
        }
    }
}

/// Prepare the page for a load.
///
/// Returns the request to issue, or None when there is no list to fill or the
/// account is not configured (setup guidance is shown instead).
pub fn begin_load(doc: &mut Document, account: Option<&str>) -> Option<RepoRequest> {
    let list = doc.repo_list.as_ref()?;
    let settings = RepoListSettings::from_dataset(&list.dataset);

    let Some(account) = account.filter(|a| is_configured_account(a)) else {
        tracing::info!("GitHub account not configured, showing setup guidance");
        if let Some(empty) = doc.repo_empty.as_mut() {
            empty.show(Placeholder::ConfigureAccount);
        }
        return None;
    };

    if let Some(empty) = doc.repo_empty.as_mut() {
        empty.show(Placeholder::Loading);
    }

    Some(RepoRequest {
        account: account.to_string(),
        per_page: settings.per_page(),
        sort: settings.sort,
        include_forks: settings.include_forks,
    })
}

/// Fetch, decode and filter the listing for `request`
pub async fn load_repositories<R: RepoSource>(
    source: &R,
    request: &RepoRequest,
) -> Result<Vec<Repository>, RepoError> {
    let payload = source.list_repos(request).await?;
    let mut repos = parse_repositories(payload);
    if !request.include_forks {
        repos.retain(|repo| !repo.fork);
    }
    Ok(repos)
}

/// Replace the card list with `repos`, or show the empty state
pub fn render_repos(doc: &mut Document, repos: &[Repository]) {
    let Some(list) = doc.repo_list.as_mut() else {
        return;
    };

    list.cards.clear();
    if repos.is_empty() {
        if let Some(empty) = doc.repo_empty.as_mut() {
            empty.show(Placeholder::NoRepositories);
        }
        return;
    }

    if let Some(empty) = doc.repo_empty.as_mut() {
        empty.hidden = true;
    }
    list.cards = repos.iter().map(RepoCard::from_repository).collect();
}

/// Render the outcome of `load_repositories`
pub fn finish_load(doc: &mut Document, result: Result<Vec<Repository>, RepoError>) {
    match result {
        Ok(repos) => {
            tracing::info!("Rendering {} repositories", repos.len());
            render_repos(doc, &repos);
        }
        Err(e) => {
            tracing::warn!("Failed to load repositories: {}", e);
            if let Some(list) = doc.repo_list.as_mut() {
                list.cards.clear();
            }
            if let Some(empty) = doc.repo_empty.as_mut() {
                empty.show(Placeholder::LoadFailed(e.to_string()));
            }
        }
    }
}

/// Run the whole load against `source`
pub async fn fetch_repos<R: RepoSource>(doc: &mut Document, account: Option<&str>, source: &R) {
    let Some(request) = begin_load(doc, account) else {
        return;
    };
    let result = load_repositories(source, &request).await;
    finish_load(doc, result);
}
