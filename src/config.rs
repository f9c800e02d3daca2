use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::repos::is_configured_account;
use crate::theme::{THEME_STORAGE_KEY, Theme};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub page: PageConfig,
}

/// Account whose public repositories are listed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// GitHub username; empty or the placeholder value shows setup guidance
    #[serde(default = "default_account")]
    pub account: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            account: default_account(),
        }
    }
}

impl GitHubConfig {
    /// Account to fetch, or None if it still needs to be configured
    pub fn configured_account(&self) -> Option<&str> {
        Some(self.account.as_str()).filter(|account| is_configured_account(account))
    }
}

fn default_account() -> String {
    "Kemoshu".to_string()
}

/// Local storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the theme preference is persisted under
    #[serde(default = "default_theme_key")]
    pub theme_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            theme_key: default_theme_key(),
        }
    }
}

fn default_theme_key() -> String {
    THEME_STORAGE_KEY.to_string()
}

/// Appearance settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppearanceConfig {
    /// Operating system color-scheme preference, if known
    #[serde(default)]
    pub prefers_color_scheme: Option<Theme>,
}

/// Element type of a navigation panel entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavItemKind {
    #[default]
    Link,
    Button,
    Input,
    Select,
    Textarea,
    Text,
}

/// An entry in the navigation panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItemConfig {
    #[serde(default)]
    pub kind: NavItemKind,
    /// Link or button label, form control name, or text content
    pub label: String,
    /// Links only
    #[serde(default)]
    pub href: Option<String>,
    /// Buttons only
    #[serde(default)]
    pub disabled: bool,
}

/// Which page regions exist, plus the repository list `data-*` attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_true")]
    pub nav: bool,
    #[serde(default = "default_nav_items", alias = "nav_links")]
    pub nav_items: Vec<NavItemConfig>,
    #[serde(default = "default_true")]
    pub menu_toggle: bool,
    #[serde(default = "default_true")]
    pub theme_toggle: bool,
    #[serde(default = "default_true")]
    pub repo_list: bool,
    #[serde(default = "default_true")]
    pub repo_empty: bool,
    #[serde(default = "default_true")]
    pub contact_form: bool,
    #[serde(default = "default_true")]
    pub feedback: bool,
    #[serde(default = "default_true")]
    pub year_slot: bool,
    /// `data-repo-limit`
    #[serde(default)]
    pub repo_limit: Option<String>,
    /// `data-repo-sort`
    #[serde(default)]
    pub repo_sort: Option<String>,
    /// `data-include-forks`
    #[serde(default)]
    pub include_forks: Option<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            nav: true,
            nav_items: default_nav_items(),
            menu_toggle: true,
            theme_toggle: true,
            repo_list: true,
            repo_empty: true,
            contact_form: true,
            feedback: true,
            year_slot: true,
            repo_limit: None,
            repo_sort: None,
            include_forks: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_nav_items() -> Vec<NavItemConfig> {
    [("About", "#about"), ("Projects", "#projects"), ("Contact", "#contact")]
        .into_iter()
        .map(|(label, href)| NavItemConfig {
            kind: NavItemKind::Link,
            label: label.to_string(),
            href: Some(href.to_string()),
            disabled: false,
        })
        .collect()
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "folio", "Folio")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::info!("Loaded configuration from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::PLACEHOLDER_ACCOUNT;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.github.configured_account(), Some("Kemoshu"));
        assert_eq!(config.storage.theme_key, "portfolio-theme");
        assert_eq!(config.appearance.prefers_color_scheme, None);
        assert!(config.page.nav);
        assert_eq!(config.page.nav_items.len(), 3);
        assert!(config.page.nav_items.iter().all(|item| item.kind == NavItemKind::Link));
    }

    #[test]
    fn test_partial_file() {
        let config: Config = toml::from_str(
            r#"
            [appearance]
            prefers_color_scheme = "light"

            [page]
            nav = false
            repo_limit = "500"
            include_forks = "true"
            "#,
        )
        .unwrap();
        assert_eq!(config.appearance.prefers_color_scheme, Some(Theme::Light));
        assert!(!config.page.nav);
        assert!(config.page.theme_toggle);
        assert_eq!(config.page.repo_limit.as_deref(), Some("500"));
        assert_eq!(config.page.include_forks.as_deref(), Some("true"));
    }

    #[test]
    fn test_nav_item_kinds() {
        let config: Config = toml::from_str(
            r##"
            [[page.nav_items]]
            kind = "text"
            label = "Jump to"

            [[page.nav_items]]
            kind = "button"
            label = "Resume"
            disabled = true

            [[page.nav_items]]
            label = "About"
            href = "#about"
            "##,
        )
        .unwrap();
        let items = &config.page.nav_items;
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].kind, NavItemKind::Text);
        assert!(items[1].disabled);
        assert_eq!(items[2].kind, NavItemKind::Link);
        assert_eq!(items[2].href.as_deref(), Some("#about"));
    }

    #[test]
    fn test_nav_links_alias() {
        let config: Config = toml::from_str(
            r#"
            [[page.nav_links]]
            label = "Blog"
            "#,
        )
        .unwrap();
        assert_eq!(config.page.nav_items.len(), 1);
        assert_eq!(config.page.nav_items[0].href, None);
    }

    #[test]
    fn test_placeholder_account_is_not_configured() {
        let github = GitHubConfig {
            account: PLACEHOLDER_ACCOUNT.to_string(),
        };
        assert_eq!(github.configured_account(), None);

        let github = GitHubConfig { account: String::new() };
        assert_eq!(github.configured_account(), None);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = Config::default();
        config.page.repo_sort = Some("pushed".into());
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.page.repo_sort.as_deref(), Some("pushed"));
        assert_eq!(back.page.nav_items, config.page.nav_items);
    }
}
