//! CLI command implementations

pub mod config;
pub mod contact;
pub mod render;
pub mod repos;
pub mod theme;

use anyhow::Result;

use crate::config::Config;
use crate::controller::PageController;
use crate::storage::Database;
use crate::theme::Theme;

/// Build a page whose theme is persisted in the user's local storage
pub fn open_page(config: &Config, prefers: Option<Theme>) -> Result<PageController<Database>> {
    let storage = Database::open()?;
    Ok(PageController::from_config(config, storage, prefers))
}
