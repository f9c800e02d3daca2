//! In-memory page model.
//!
//! The controller mutates this document the same way a page script mutates the
//! DOM: class lists, attributes, text slots, focus, and registered listeners.
//! Every region except the body is optional, mirroring markup where any of
//! them may be left out.
//!
//! `render_document` turns the current state back into HTML.

mod html;

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::{NavItemConfig, NavItemKind, PageConfig};
use crate::repos::{Placeholder, RepoCard};

pub use html::render_document;

/// CSS classes on an element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassList(BTreeSet<String>);

impl ClassList {
    pub fn contains(&self, class: &str) -> bool {
        self.0.contains(class)
    }

    pub fn add(&mut self, class: &str) {
        self.0.insert(class.to_string());
    }

    pub fn remove(&mut self, class: &str) {
        self.0.remove(class);
    }

    /// Add `class` when `on` is true, remove it otherwise
    pub fn toggle(&mut self, class: &str, on: bool) {
        if on {
            self.add(class);
        } else {
            self.remove(class);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Space-separated value for a `class` attribute
    pub fn to_attr(&self) -> String {
        self.0.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
    }
}

/// Root body element
#[derive(Debug, Clone, Default, Serialize)]
pub struct Body {
    pub classes: ClassList,
}

/// A child element of the navigation panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NavItem {
    Link { label: String, href: Option<String> },
    Button { label: String, disabled: bool },
    Input { name: String },
    Select { name: String },
    Textarea { name: String },
    Text { text: String },
}

impl NavItem {
    /// Whether the element matches
    /// `a[href], button:not([disabled]), input, select, textarea`
    pub fn is_focusable(&self) -> bool {
        match self {
            NavItem::Link { href, .. } => href.is_some(),
            NavItem::Button { disabled, .. } => !disabled,
            NavItem::Input { .. } | NavItem::Select { .. } | NavItem::Textarea { .. } => true,
            NavItem::Text { .. } => false,
        }
    }

    /// Any anchor, with or without an href
    pub fn is_link(&self) -> bool {
        matches!(self, NavItem::Link { .. })
    }
}

impl From<&NavItemConfig> for NavItem {
    fn from(item: &NavItemConfig) -> Self {
        let label = item.label.clone();
        match item.kind {
            NavItemKind::Link => NavItem::Link {
                label,
                href: item.href.clone(),
            },
            NavItemKind::Button => NavItem::Button {
                label,
                disabled: item.disabled,
            },
            NavItemKind::Input => NavItem::Input { name: label },
            NavItemKind::Select => NavItem::Select { name: label },
            NavItemKind::Textarea => NavItem::Textarea { name: label },
            NavItemKind::Text => NavItem::Text { text: label },
        }
    }
}

/// The collapsible navigation menu
#[derive(Debug, Clone, Default, Serialize)]
pub struct NavPanel {
    pub classes: ClassList,
    pub items: Vec<NavItem>,
}

impl NavPanel {
    /// Indices of every anchor in document order
    pub fn link_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_link())
            .map(|(idx, _)| idx)
    }

    /// First focusable descendant in document order
    pub fn first_focusable(&self) -> Option<usize> {
        self.items.iter().position(NavItem::is_focusable)
    }

    pub fn is_open(&self) -> bool {
        self.classes.contains("open")
    }
}

/// Button that opens and closes the nav panel
#[derive(Debug, Clone, Default, Serialize)]
pub struct MenuToggle {
    pub aria_expanded: Option<String>,
}

/// Button that switches between dark and light themes
#[derive(Debug, Clone, Default, Serialize)]
pub struct ThemeToggle {
    pub icon: String,
    pub aria_label: Option<String>,
}

/// Container for repository cards, configured through `data-*` attributes
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepoList {
    /// `data-*` attributes keyed by their camel-cased dataset name
    pub dataset: BTreeMap<String, String>,
    pub cards: Vec<RepoCard>,
}

/// Placeholder region shown instead of the repository list
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmptyState {
    pub hidden: bool,
    pub placeholder: Placeholder,
}

/// Contact form field values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// Look up a field by its `name` attribute
    pub fn field_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "name" => Some(&mut self.name),
            "email" => Some(&mut self.email),
            "message" => Some(&mut self.message),
            _ => None,
        }
    }

    /// Restore every field to its initial (empty) value
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Inline message under the contact form
#[derive(Debug, Clone, Default, Serialize)]
pub struct Feedback {
    pub text: String,
    pub classes: ClassList,
}

/// Footer element holding the current year
#[derive(Debug, Clone, Default, Serialize)]
pub struct YearSlot {
    pub text: String,
}

/// Element that currently has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Focus {
    MenuToggle,
    NavItem(usize),
}

/// Event handlers that can be attached to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Listener {
    MenuToggleClick,
    NavLinkClick(usize),
    ThemeToggleClick,
    FormSubmit,
    /// Document-level handler that closes the nav on clicks outside it
    OutsideNavClick,
}

/// Element a click landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    MenuToggle,
    /// A child of the nav panel
    NavItem(usize),
    /// The nav panel itself, between its children
    NavPanel,
    ThemeToggle,
    /// Anywhere else on the page
    Outside,
}

impl ClickTarget {
    pub fn is_inside_nav(&self) -> bool {
        matches!(self, ClickTarget::NavItem(_) | ClickTarget::NavPanel)
    }
}

/// User interaction delivered to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    Click(ClickTarget),
    Submit,
}

/// The whole page
#[derive(Debug, Clone, Default, Serialize)]
pub struct Document {
    pub body: Body,
    pub nav: Option<NavPanel>,
    pub menu_toggle: Option<MenuToggle>,
    pub theme_toggle: Option<ThemeToggle>,
    pub repo_list: Option<RepoList>,
    pub repo_empty: Option<EmptyState>,
    pub contact_form: Option<ContactForm>,
    pub feedback: Option<Feedback>,
    pub year_slot: Option<YearSlot>,
    pub focus: Option<Focus>,
    #[serde(skip)]
    listeners: Vec<Listener>,
}

impl Document {
    /// Build the page described by the `[page]` configuration section
    pub fn from_config(page: &PageConfig) -> Self {
        let nav = page.nav.then(|| NavPanel {
            classes: ClassList::default(),
            items: page.nav_items.iter().map(NavItem::from).collect(),
        });

        let repo_list = page.repo_list.then(|| {
            let mut dataset = BTreeMap::new();
            if let Some(limit) = &page.repo_limit {
                dataset.insert("repoLimit".to_string(), limit.clone());
            }
            if let Some(sort) = &page.repo_sort {
                dataset.insert("repoSort".to_string(), sort.clone());
            }
            if let Some(include) = &page.include_forks {
                dataset.insert("includeForks".to_string(), include.clone());
            }
            RepoList {
                dataset,
                cards: Vec::new(),
            }
        });

        Self {
            body: Body::default(),
            nav,
            menu_toggle: page.menu_toggle.then(|| MenuToggle {
                aria_expanded: Some("false".to_string()),
            }),
            theme_toggle: page.theme_toggle.then(ThemeToggle::default),
            repo_list,
            repo_empty: page.repo_empty.then(|| EmptyState {
                hidden: true,
                placeholder: Placeholder::Blank,
            }),
            contact_form: page.contact_form.then(ContactForm::default),
            feedback: page.feedback.then(Feedback::default),
            year_slot: page.year_slot.then(YearSlot::default),
            focus: None,
            listeners: Vec::new(),
        }
    }

    /// Attach a listener. Attaching the same listener twice is a no-op.
    pub fn add_listener(&mut self, listener: Listener) {
        if !self.listeners.contains(&listener) {
            self.listeners.push(listener);
        }
    }

    pub fn remove_listener(&mut self, listener: Listener) {
        self.listeners.retain(|l| *l != listener);
    }

    pub fn has_listener(&self, listener: Listener) -> bool {
        self.listeners.contains(&listener)
    }

    /// Number of attached copies of `listener` (0 or 1)
    #[cfg(test)]
    pub fn listener_count(&self, listener: Listener) -> usize {
        self.listeners.iter().filter(|l| **l == listener).count()
    }

    /// Rendered repository cards, empty when there is no list
    pub fn cards(&self) -> &[RepoCard] {
        self.repo_list
            .as_ref()
            .map(|list| list.cards.as_slice())
            .unwrap_or(&[])
    }

    /// Placeholder text if the empty-state region is visible
    pub fn visible_placeholder(&self) -> Option<String> {
        self.repo_empty
            .as_ref()
            .filter(|empty| !empty.hidden)
            .map(|empty| empty.placeholder.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_toggle() {
        let mut classes = ClassList::default();
        classes.toggle("open", true);
        classes.toggle("open", true);
        assert_eq!(classes.to_attr(), "open");

        classes.toggle("open", false);
        assert!(classes.is_empty());
    }

    #[test]
    fn test_focusable_matches_selector() {
        assert!(NavItem::Link { label: "a".into(), href: Some("#a".into()) }.is_focusable());
        assert!(!NavItem::Link { label: "a".into(), href: None }.is_focusable());
        assert!(!NavItem::Button { label: "b".into(), disabled: true }.is_focusable());
        assert!(NavItem::Button { label: "b".into(), disabled: false }.is_focusable());
        assert!(NavItem::Textarea { name: "t".into() }.is_focusable());
        assert!(!NavItem::Text { text: "x".into() }.is_focusable());
    }

    #[test]
    fn test_first_focusable_skips_inert_items() {
        let nav = NavPanel {
            classes: ClassList::default(),
            items: vec![
                NavItem::Text { text: "Menu".into() },
                NavItem::Link { label: "Anchor".into(), href: None },
                NavItem::Button { label: "Off".into(), disabled: true },
                NavItem::Link { label: "About".into(), href: Some("#about".into()) },
            ],
        };
        assert_eq!(nav.first_focusable(), Some(3));
        assert_eq!(nav.link_indices().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_from_config_builds_declared_items() {
        let page = PageConfig {
            nav_items: vec![
                NavItemConfig {
                    kind: NavItemKind::Button,
                    label: "Resume".into(),
                    href: Some("#ignored".into()),
                    disabled: true,
                },
                NavItemConfig {
                    kind: NavItemKind::Select,
                    label: "lang".into(),
                    href: None,
                    disabled: false,
                },
            ],
            ..PageConfig::default()
        };
        let nav = Document::from_config(&page).nav.unwrap();
        assert_eq!(
            nav.items,
            vec![
                NavItem::Button { label: "Resume".into(), disabled: true },
                NavItem::Select { name: "lang".into() },
            ]
        );
        assert_eq!(nav.first_focusable(), Some(1));
        assert_eq!(nav.link_indices().count(), 0);
    }

    #[test]
    fn test_listeners_are_deduplicated() {
        let mut doc = Document::default();
        doc.add_listener(Listener::OutsideNavClick);
        doc.add_listener(Listener::OutsideNavClick);
        assert_eq!(doc.listener_count(Listener::OutsideNavClick), 1);

        doc.remove_listener(Listener::OutsideNavClick);
        assert!(!doc.has_listener(Listener::OutsideNavClick));
    }

    #[test]
    fn test_from_config_copies_dataset() {
        let page = PageConfig {
            repo_limit: Some("12".into()),
            include_forks: Some("true".into()),
            ..PageConfig::default()
        };
        let doc = Document::from_config(&page);
        let list = doc.repo_list.as_ref().unwrap();
        assert_eq!(list.dataset.get("repoLimit").map(String::as_str), Some("12"));
        assert_eq!(list.dataset.get("includeForks").map(String::as_str), Some("true"));
        assert!(!list.dataset.contains_key("repoSort"));
        assert_eq!(
            doc.menu_toggle.as_ref().unwrap().aria_expanded.as_deref(),
            Some("false")
        );
        assert!(doc.repo_empty.as_ref().unwrap().hidden);
    }
}
