//! Configuration management commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::cli::output::{OutputFormat, print_formatted, print_success};
use crate::config::Config;
use crate::theme::Theme;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Get a specific config value
    Get {
        /// Config key (e.g., "github.account", "page.repo_limit")
        key: String,
    },

    /// Set a config value ("none" clears optional values)
    Set {
        /// Config key (e.g., "github.account", "page.repo_limit")
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}

#[derive(Serialize)]
struct ConfigPathResult {
    path: String,
    exists: bool,
}

pub async fn run(command: ConfigCommands, format: OutputFormat, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Show => show(format).await,
        ConfigCommands::Get { key } => get(&key, format).await,
        ConfigCommands::Set { key, value } => set(&key, &value, quiet).await,
        ConfigCommands::Path => path(format).await,
    }
}

async fn show(format: OutputFormat) -> Result<()> {
    let config = Config::load()?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            let toml = toml::to_string_pretty(&config)?;
            println!("{}", toml);
        }
    }

    Ok(())
}

async fn get(key: &str, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;

    let value = get_config_value(&config, key)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&value)?);
        }
        OutputFormat::Text => {
            println!("{}", value);
        }
    }

    Ok(())
}

fn or_unset(value: Option<&str>) -> String {
    value.unwrap_or("<not set>").to_string()
}

fn get_config_value(config: &Config, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();
    let page = &config.page;

    match parts.as_slice() {
        ["github", "account"] => Ok(or_unset(config.github.configured_account())),
        ["storage", "theme_key"] => Ok(config.storage.theme_key.clone()),
        ["appearance", "prefers_color_scheme"] => Ok(or_unset(
            config.appearance.prefers_color_scheme.map(|t| t.as_str()),
        )),
        ["page", "nav"] => Ok(page.nav.to_string()),
        ["page", "menu_toggle"] => Ok(page.menu_toggle.to_string()),
        ["page", "theme_toggle"] => Ok(page.theme_toggle.to_string()),
        ["page", "repo_list"] => Ok(page.repo_list.to_string()),
        ["page", "repo_empty"] => Ok(page.repo_empty.to_string()),
        ["page", "contact_form"] => Ok(page.contact_form.to_string()),
        ["page", "feedback"] => Ok(page.feedback.to_string()),
        ["page", "year_slot"] => Ok(page.year_slot.to_string()),
        ["page", "repo_limit"] => Ok(or_unset(page.repo_limit.as_deref())),
        ["page", "repo_sort"] => Ok(or_unset(page.repo_sort.as_deref())),
        ["page", "include_forks"] => Ok(or_unset(page.include_forks.as_deref())),
        _ => anyhow::bail!("Unknown config key: {}", key),
    }
}

/// `none` clears an optional value
fn optional(value: &str) -> Option<String> {
    if value.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(value.to_string())
    }
}

async fn set(key: &str, value: &str, quiet: bool) -> Result<()> {
    let mut config = Config::load()?;

    set_config_value(&mut config, key, value)?;
    config.save()?;

    print_success(&format!("Set {} = {}", key, value), quiet);
    Ok(())
}

fn set_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let page = &mut config.page;

    match parts.as_slice() {
        ["github", "account"] => {
            config.github.account = optional(value).unwrap_or_default();
        }
        ["storage", "theme_key"] => {
            if value.is_empty() {
                anyhow::bail!("Storage key cannot be empty");
            }
            config.storage.theme_key = value.to_string();
        }
        ["appearance", "prefers_color_scheme"] => {
            config.appearance.prefers_color_scheme = match optional(value) {
                None => None,
                Some(v) => Some(
                    Theme::from_stored(&v)
                        .ok_or_else(|| anyhow::anyhow!("Expected dark, light or none: {}", v))?,
                ),
            };
        }
        ["page", "nav"] => page.nav = value.parse()?,
        ["page", "menu_toggle"] => page.menu_toggle = value.parse()?,
        ["page", "theme_toggle"] => page.theme_toggle = value.parse()?,
        ["page", "repo_list"] => page.repo_list = value.parse()?,
        ["page", "repo_empty"] => page.repo_empty = value.parse()?,
        ["page", "contact_form"] => page.contact_form = value.parse()?,
        ["page", "feedback"] => page.feedback = value.parse()?,
        ["page", "year_slot"] => page.year_slot = value.parse()?,
        ["page", "repo_limit"] => page.repo_limit = optional(value),
        ["page", "repo_sort"] => page.repo_sort = optional(value),
        ["page", "include_forks"] => page.include_forks = optional(value),
        _ => anyhow::bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}

async fn path(format: OutputFormat) -> Result<()> {
    let path = Config::config_path()?;
    let exists = path.exists();

    let result = ConfigPathResult {
        path: path.to_string_lossy().to_string(),
        exists,
    };

    print_formatted(&result, format, |r| {
        format!("{}{}", r.path, if r.exists { "" } else { " (not found)" })
    });

    Ok(())
}
