//! Repository listing command

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{OutputFormat, print_formatted};
use crate::config::Config;
use crate::github::GitHubClient;
use crate::repos::RepoCard;
use crate::theme::Theme;

#[derive(Serialize)]
struct ReposResult {
    repositories: Vec<RepoCard>,
    /// Set instead of `repositories` when the empty state is showing
    message: Option<String>,
}

fn format_text(result: &ReposResult) -> String {
    if let Some(message) = &result.message {
        return message.clone();
    }

    result
        .repositories
        .iter()
        .map(|card| {
            let language = card.tags.first().map(String::as_str).unwrap_or("-");
            format!("{:<30} {:<12} {}", card.name, language, card.updated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn run(prefers: Option<Theme>, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let mut page = super::open_page(&config, prefers)?;
    let client = GitHubClient::new()?;

    page.boot(&client).await;

    let doc = page.document();
    let result = ReposResult {
        repositories: doc.cards().to_vec(),
        message: doc.visible_placeholder(),
    };
    print_formatted(&result, format, format_text);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_prefers_message() {
        let result = ReposResult {
            repositories: Vec::new(),
            message: Some("Unable to load repositories. GitHub API error: 404".into()),
        };
        assert_eq!(
            format_text(&result),
            "Unable to load repositories. GitHub API error: 404"
        );
    }

    #[test]
    fn test_text_one_line_per_card() {
        let card = RepoCard {
            name: "folio".into(),
            url: "https://github.com/Kemoshu/folio".into(),
            updated: "Updated Mar 5, 2024".into(),
            description: "No description yet.".into(),
            tags: vec!["Rust".into()],
        };
        let result = ReposResult {
            repositories: vec![card.clone(), RepoCard { tags: Vec::new(), ..card }],
            message: None,
        };
        let text = format_text(&result);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Rust"));
        assert!(lines[1].contains(" - "));
        assert!(lines[1].ends_with("Updated Mar 5, 2024"));
    }
}
