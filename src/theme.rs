//! Light/dark theme management.
//!
//! The active theme is reflected in three places that must agree after every
//! change: the page state, the body's `theme-dark`/`theme-light` classes, and
//! the value persisted in local storage. The toggle control always describes
//! the *next* action rather than the current state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::controller::PageState;
use crate::page::Document;
use crate::storage::Storage;

/// Default local storage key for the theme preference
pub const THEME_STORAGE_KEY: &str = "portfolio-theme";

/// Visual mode of the page
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Value stored in local storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Parse a stored value. Anything other than the two exact names is rejected.
    pub fn from_stored(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Body class applied while this theme is active
    pub fn body_class(self) -> &'static str {
        match self {
            Theme::Dark => "theme-dark",
            Theme::Light => "theme-light",
        }
    }

    /// Toggle icon shown while this theme is active
    fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Dark => "\u{2600}\u{fe0f}",
            Theme::Light => "\u{1f319}",
        }
    }

    /// Accessible label describing what the toggle will do
    fn toggle_label(self) -> &'static str {
        match self {
            Theme::Dark => "Switch to light theme",
            Theme::Light => "Switch to dark theme",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the initial theme: persisted value, then OS preference, then dark
pub fn resolve_initial_theme(stored: Option<&str>, prefers: Option<Theme>) -> Theme {
    if let Some(raw) = stored {
        match Theme::from_stored(raw) {
            Some(theme) => return theme,
            None => tracing::warn!("Ignoring unknown stored theme {:?}", raw),
        }
    }
    prefers.unwrap_or_default()
}

/// Reads and writes the persisted theme and applies it to a document
pub struct ThemeManager<S> {
    storage: S,
    key: String,
    prefers: Option<Theme>,
}

impl<S: Storage> ThemeManager<S> {
    /// `prefers` is the operating system color-scheme preference, if known
    pub fn new(storage: S, key: impl Into<String>, prefers: Option<Theme>) -> Self {
        Self {
            storage,
            key: key.into(),
            prefers,
        }
    }

    /// Currently persisted value, if any
    pub fn stored(&self) -> Option<String> {
        self.storage.get_item(&self.key)
    }

    /// Set the theme everywhere: state, body classes, storage, toggle control
    pub fn apply(&mut self, theme: Theme, state: &mut PageState, doc: &mut Document) {
        state.theme = theme;

        let classes = &mut doc.body.classes;
        classes.toggle(Theme::Dark.body_class(), theme == Theme::Dark);
        classes.toggle(Theme::Light.body_class(), theme == Theme::Light);

        self.storage.set_item(&self.key, theme.as_str());

        if let Some(toggle) = doc.theme_toggle.as_mut() {
            toggle.icon = theme.toggle_icon().to_string();
            toggle.aria_label = Some(theme.toggle_label().to_string());
        }

        tracing::debug!("Applied {} theme", theme);
    }

    /// Resolve the initial theme and apply it
    pub fn init(&mut self, state: &mut PageState, doc: &mut Document) -> Theme {
        let stored = self.stored();
        let theme = resolve_initial_theme(stored.as_deref(), self.prefers);
        self.apply(theme, state, doc);
        theme
    }

    /// Remove the persisted value. Returns whether there was one.
    pub fn forget(&mut self) -> bool {
        self.storage.remove_item(&self.key)
    }

    /// Switch to the other theme
    pub fn toggle(&mut self, state: &mut PageState, doc: &mut Document) -> Theme {
        let next = state.theme.opposite();
        self.apply(next, state, doc);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageConfig;
    use crate::storage::MemoryStorage;

    fn setup(prefers: Option<Theme>) -> (ThemeManager<MemoryStorage>, PageState, Document) {
        (
            ThemeManager::new(MemoryStorage::default(), THEME_STORAGE_KEY, prefers),
            PageState::default(),
            Document::from_config(&PageConfig::default()),
        )
    }

    fn active_theme_classes(doc: &Document) -> usize {
        [Theme::Dark, Theme::Light]
            .iter()
            .filter(|t| doc.body.classes.contains(t.body_class()))
            .count()
    }

    #[test]
    fn test_apply_persists_and_sets_one_class() {
        let (mut themes, mut state, mut doc) = setup(None);

        for theme in [Theme::Light, Theme::Dark, Theme::Light] {
            themes.apply(theme, &mut state, &mut doc);
            assert_eq!(themes.stored().as_deref(), Some(theme.as_str()));
            assert_eq!(state.theme, theme);
            assert!(doc.body.classes.contains(theme.body_class()));
            assert_eq!(active_theme_classes(&doc), 1);
        }
    }

    #[test]
    fn test_toggle_describes_next_action() {
        let (mut themes, mut state, mut doc) = setup(None);

        themes.apply(Theme::Dark, &mut state, &mut doc);
        let toggle = doc.theme_toggle.as_ref().unwrap();
        assert_eq!(toggle.aria_label.as_deref(), Some("Switch to light theme"));
        assert_eq!(toggle.icon, "\u{2600}\u{fe0f}");

        themes.toggle(&mut state, &mut doc);
        let toggle = doc.theme_toggle.as_ref().unwrap();
        assert_eq!(toggle.aria_label.as_deref(), Some("Switch to dark theme"));
        assert_eq!(toggle.icon, "\u{1f319}");
        assert_eq!(state.theme, Theme::Light);
    }

    #[test]
    fn test_apply_without_toggle_control() {
        let (mut themes, mut state, _) = setup(None);
        let mut doc = Document::default();
        themes.apply(Theme::Light, &mut state, &mut doc);
        assert!(doc.body.classes.contains("theme-light"));
        assert_eq!(themes.stored().as_deref(), Some("light"));
    }

    #[test]
    fn test_init_follows_system_preference() {
        let (mut themes, mut state, mut doc) = setup(Some(Theme::Dark));
        assert_eq!(themes.init(&mut state, &mut doc), Theme::Dark);

        let (mut themes, mut state, mut doc) = setup(Some(Theme::Light));
        assert_eq!(themes.init(&mut state, &mut doc), Theme::Light);
        assert!(doc.body.classes.contains("theme-light"));
    }

    #[test]
    fn test_init_without_any_signal_is_dark() {
        let (mut themes, mut state, mut doc) = setup(None);
        assert_eq!(themes.init(&mut state, &mut doc), Theme::Dark);
    }

    #[test]
    fn test_stored_value_overrides_preference() {
        let mut storage = MemoryStorage::default();
        storage.set_item(THEME_STORAGE_KEY, "light");
        let mut themes = ThemeManager::new(storage, THEME_STORAGE_KEY, Some(Theme::Dark));
        let mut state = PageState::default();
        let mut doc = Document::default();

        assert_eq!(themes.init(&mut state, &mut doc), Theme::Light);
    }

    #[test]
    fn test_forget_restores_preference() {
        let (mut themes, mut state, mut doc) = setup(Some(Theme::Light));
        themes.apply(Theme::Dark, &mut state, &mut doc);

        assert!(themes.forget());
        assert!(!themes.forget());
        assert_eq!(themes.stored(), None);
        assert_eq!(themes.init(&mut state, &mut doc), Theme::Light);
    }

    #[test]
    fn test_unknown_stored_value_falls_through() {
        assert_eq!(resolve_initial_theme(Some("sepia"), Some(Theme::Light)), Theme::Light);
        assert_eq!(resolve_initial_theme(Some("Dark"), None), Theme::Dark);
        assert_eq!(resolve_initial_theme(Some("dark"), Some(Theme::Light)), Theme::Dark);
    }
}
