//! Theme preference commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::cli::output::{OutputFormat, print_formatted, print_success};
use crate::config::Config;
use crate::controller::PageController;
use crate::storage::Storage;
use crate::theme::{Theme, resolve_initial_theme};

#[derive(Subcommand, Debug)]
pub enum ThemeCommands {
    /// Show the theme the page would start with
    Show,

    /// Switch to the other theme
    Toggle,

    /// Persist a specific theme
    Set {
        #[arg(value_enum)]
        theme: Theme,
    },

    /// Forget the saved theme and follow the system preference again
    Reset,
}

/// Where the resolved theme came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum ThemeSource {
    Stored,
    System,
    Default,
}

#[derive(Serialize)]
struct ThemeResult {
    theme: Theme,
    source: ThemeSource,
    stored: Option<String>,
}

fn describe(stored: Option<String>, prefers: Option<Theme>) -> ThemeResult {
    let theme = resolve_initial_theme(stored.as_deref(), prefers);
    let source = if stored.as_deref().and_then(Theme::from_stored).is_some() {
        ThemeSource::Stored
    } else if prefers.is_some() {
        ThemeSource::System
    } else {
        ThemeSource::Default
    };
    ThemeResult {
        theme,
        source,
        stored,
    }
}

/// Flip the theme the page would start with
fn toggle<S: Storage>(page: &mut PageController<S>) -> Theme {
    page.init_theme();
    page.toggle_theme()
}

pub async fn run(
    command: ThemeCommands,
    prefers: Option<Theme>,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let config = Config::load()?;
    let mut page = super::open_page(&config, prefers)?;
    let prefers = prefers.or(config.appearance.prefers_color_scheme);

    match command {
        ThemeCommands::Show => {
            let result = describe(page.themes().stored(), prefers);
            print_formatted(&result, format, |r| {
                let source = match r.source {
                    ThemeSource::Stored => "saved preference",
                    ThemeSource::System => "system preference",
                    ThemeSource::Default => "default",
                };
                format!("{} ({})", r.theme, source)
            });
        }
        ThemeCommands::Toggle => {
            let theme = toggle(&mut page);
            print_success(&format!("Switched to {} theme", theme), quiet);
        }
        ThemeCommands::Set { theme } => {
            page.apply_theme(theme);
            print_success(&format!("Theme set to {}", theme), quiet);
        }
        ThemeCommands::Reset => {
            if page.forget_theme() {
                print_success("Saved theme cleared", quiet);
            } else {
                print_success("No saved theme", quiet);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_toggle_only_touches_theme() {
        let mut storage = MemoryStorage::default();
        storage.set_item("portfolio-theme", "light");
        let mut page = PageController::from_config(&Config::default(), storage, None);

        assert_eq!(toggle(&mut page), Theme::Dark);
        assert_eq!(page.themes().stored().as_deref(), Some("dark"));
        assert_eq!(page.document().visible_placeholder(), None);
        assert!(page.init().is_some());
    }

    #[test]
    fn test_describe_sources() {
        let r = describe(Some("light".into()), Some(Theme::Dark));
        assert_eq!(r.theme, Theme::Light);
        assert_eq!(r.source, ThemeSource::Stored);

        let r = describe(None, Some(Theme::Light));
        assert_eq!(r.theme, Theme::Light);
        assert_eq!(r.source, ThemeSource::System);

        let r = describe(Some("neon".into()), None);
        assert_eq!(r.theme, Theme::Dark);
        assert_eq!(r.source, ThemeSource::Default);
    }
}
