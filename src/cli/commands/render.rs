//! Page rendering command

use anyhow::Result;
use serde::Serialize;
use std::fmt;

use crate::cli::output::{OutputFormat, print_output};
use crate::config::Config;
use crate::controller::PageController;
use crate::github::GitHubClient;
use crate::page::{NavPanel, render_document};
use crate::repos::RepoCard;
use crate::storage::Storage;
use crate::theme::Theme;

/// What a visitor would see on the page
#[derive(Debug, Serialize)]
pub struct PageSummary {
    pub theme: Theme,
    pub nav_open: bool,
    pub year: Option<String>,
    /// Visible empty-state text, if the placeholder is showing
    pub placeholder: Option<String>,
    pub repositories: Vec<RepoCard>,
    pub feedback: Option<String>,
}

impl PageSummary {
    pub fn new<S: Storage>(page: &PageController<S>) -> Self {
        let doc = page.document();
        Self {
            theme: page.state().theme,
            nav_open: doc.nav.as_ref().is_some_and(NavPanel::is_open),
            year: doc.year_slot.as_ref().map(|y| y.text.clone()),
            placeholder: doc.visible_placeholder(),
            repositories: doc.cards().to_vec(),
            feedback: doc
                .feedback
                .as_ref()
                .map(|f| f.text.clone())
                .filter(|text| !text.is_empty()),
        }
    }
}

impl fmt::Display for PageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Theme:      {}", self.theme)?;
        writeln!(f, "Navigation: {}", if self.nav_open { "open" } else { "closed" })?;
        if let Some(year) = &self.year {
            writeln!(f, "Year:       {}", year)?;
        }
        if let Some(feedback) = &self.feedback {
            writeln!(f, "Feedback:   {}", feedback)?;
        }

        if let Some(placeholder) = &self.placeholder {
            write!(f, "\n{}", placeholder)?;
            return Ok(());
        }

        writeln!(f, "\nRepositories:")?;
        for (i, card) in self.repositories.iter().enumerate() {
            let tags = if card.tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", card.tags.join(", "))
            };
            writeln!(f, "  {}. {}{} - {}", i + 1, card.name, tags, card.updated)?;
            writeln!(f, "     {}", card.description)?;
            writeln!(f, "     {}", card.url)?;
        }
        Ok(())
    }
}

pub async fn run(html: bool, prefers: Option<Theme>, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let mut page = super::open_page(&config, prefers)?;
    let client = GitHubClient::new()?;

    page.boot(&client).await;

    if html {
        println!("{}", render_document(page.document()));
    } else {
        print_output(&PageSummary::new(&page), format);
    }

    Ok(())
}
