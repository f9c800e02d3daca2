//! Page controller.
//!
//! `PageController` owns the page state, the document and the theme storage.
//! It is constructed once per page, bootstrapped once, and then receives every
//! user event through `dispatch`. Each behavior lives in its own module; this
//! one only wires them together.

use chrono::Datelike;

use crate::config::Config;
use crate::contact::{self, ValidationError};
use crate::github::RepoError;
use crate::nav;
use crate::page::{ClickTarget, Document, Listener, PageEvent};
use crate::repos::{self, RepoRequest, RepoSource, Repository};
use crate::storage::Storage;
use crate::theme::{Theme, ThemeManager};

/// Mutable page state shared by the handlers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageState {
    pub theme: Theme,
    pub nav_open: bool,
}

/// Owns a page and everything its handlers touch
pub struct PageController<S> {
    state: PageState,
    document: Document,
    themes: ThemeManager<S>,
    account: Option<String>,
    booted: bool,
}

impl<S: Storage> PageController<S> {
    pub fn new(document: Document, themes: ThemeManager<S>, account: Option<String>) -> Self {
        Self {
            state: PageState::default(),
            document,
            themes,
            account,
            booted: false,
        }
    }

    /// Build the page described by `config`.
    ///
    /// `prefers` overrides the configured color-scheme preference.
    pub fn from_config(config: &Config, storage: S, prefers: Option<Theme>) -> Self {
        let prefers = prefers.or(config.appearance.prefers_color_scheme);
        Self::new(
            Document::from_config(&config.page),
            ThemeManager::new(storage, config.storage.theme_key.clone(), prefers),
            config.github.configured_account().map(str::to_string),
        )
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn themes(&self) -> &ThemeManager<S> {
        &self.themes
    }

    /// Theme, listeners and footer year. Returns false if the page was
    /// already set up.
    fn setup(&mut self) -> bool {
        if self.booted {
            tracing::warn!("Page already initialized, ignoring");
            return false;
        }
        self.booted = true;

        self.init_theme();

        let doc = &mut self.document;
        if doc.menu_toggle.is_some() {
            doc.add_listener(Listener::MenuToggleClick);
        }
        let links: Vec<usize> = doc
            .nav
            .as_ref()
            .map(|nav| nav.link_indices().collect())
            .unwrap_or_default();
        for idx in links {
            doc.add_listener(Listener::NavLinkClick(idx));
        }
        if doc.theme_toggle.is_some() {
            doc.add_listener(Listener::ThemeToggleClick);
        }
        if doc.contact_form.is_some() {
            doc.add_listener(Listener::FormSubmit);
        }

        if let Some(year) = doc.year_slot.as_mut() {
            year.text = chrono::Local::now().year().to_string();
        }

        tracing::info!("Page initialized with {} theme", self.state.theme);
        true
    }

    /// Synchronous part of bootstrapping: `setup` plus the loader's
    /// placeholder.
    ///
    /// Returns the repository request to run, if any. Only the first call has
    /// any effect.
    pub fn init(&mut self) -> Option<RepoRequest> {
        if !self.setup() {
            return None;
        }
        repos::begin_load(&mut self.document, self.account.as_deref())
    }

    /// Bootstrap the page and wait for the repository load to finish
    pub async fn boot<R: RepoSource>(&mut self, source: &R) {
        if self.setup() {
            repos::fetch_repos(&mut self.document, self.account.as_deref(), source).await;
        }
    }

    /// Render the outcome of a repository load started by `init`
    pub fn finish_repos(&mut self, result: Result<Vec<Repository>, RepoError>) {
        repos::finish_load(&mut self.document, result);
    }

    /// Resolve and apply the initial theme without bootstrapping the page
    pub fn init_theme(&mut self) -> Theme {
        self.themes.init(&mut self.state, &mut self.document)
    }

    /// Drop the persisted theme so the next page load falls back to the
    /// color-scheme preference. Returns whether anything was stored.
    pub fn forget_theme(&mut self) -> bool {
        self.themes.forget()
    }

    pub fn apply_theme(&mut self, theme: Theme) {
        self.themes.apply(theme, &mut self.state, &mut self.document);
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.themes.toggle(&mut self.state, &mut self.document)
    }

    pub fn toggle_nav(&mut self, force: Option<bool>) -> Option<bool> {
        nav::toggle_nav(&mut self.state, &mut self.document, force)
    }

    /// Deliver a user event to the attached listeners.
    ///
    /// Clicks run the target's own handler first, then bubble to the
    /// document-level outside-click handler if one is attached.
    /// Returns the validation result for submissions that were handled.
    pub fn dispatch(&mut self, event: PageEvent) -> Option<Result<(), ValidationError>> {
        tracing::debug!("Dispatching {:?}", event);
        match event {
            PageEvent::Click(target) => {
                self.click(target);
                None
            }
            PageEvent::Submit => {
                if self.document.has_listener(Listener::FormSubmit) {
                    contact::handle_submit(&mut self.document)
                } else {
                    None
                }
            }
        }
    }

    fn click(&mut self, target: ClickTarget) {
        match target {
            ClickTarget::MenuToggle if self.document.has_listener(Listener::MenuToggleClick) => {
                self.toggle_nav(None);
            }
            ClickTarget::NavItem(idx)
                if self.document.has_listener(Listener::NavLinkClick(idx)) =>
            {
                self.toggle_nav(Some(false));
            }
            ClickTarget::ThemeToggle if self.document.has_listener(Listener::ThemeToggleClick) => {
                self.toggle_theme();
            }
            _ => {}
        }

        if self.document.has_listener(Listener::OutsideNavClick) {
            nav::handle_outside_click(&mut self.state, &mut self.document, target);
        }
    }
}
