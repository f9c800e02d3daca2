//! Mobile navigation panel.
//!
//! While the panel is open the document carries exactly one
//! `OutsideNavClick` listener. It is attached on open and detached on close.

use crate::controller::PageState;
use crate::page::{ClickTarget, Document, Focus, Listener};

/// Open or close the nav panel.
///
/// `force` sets the state explicitly, otherwise the current state is flipped.
/// Returns the new state, or None if the page has no nav panel.
pub fn toggle_nav(state: &mut PageState, doc: &mut Document, force: Option<bool>) -> Option<bool> {
    let nav = doc.nav.as_mut()?;

    let open = force.unwrap_or(!state.nav_open);
    state.nav_open = open;
    nav.classes.toggle("open", open);

    if let Some(toggle) = doc.menu_toggle.as_mut() {
        toggle.aria_expanded = Some(open.to_string());
    }
    doc.body.classes.toggle("no-scroll", open);

    if open {
        let first = nav.first_focusable();
        doc.add_listener(Listener::OutsideNavClick);
        if let Some(idx) = first {
            doc.focus = Some(Focus::NavItem(idx));
        }
    } else {
        doc.remove_listener(Listener::OutsideNavClick);
        if doc.menu_toggle.is_some() {
            doc.focus = Some(Focus::MenuToggle);
        }
    }

    tracing::debug!("Navigation {}", if open { "opened" } else { "closed" });
    Some(open)
}

/// Document-level click handler: close the panel when the click landed
/// outside both the panel and the menu button
pub fn handle_outside_click(state: &mut PageState, doc: &mut Document, target: ClickTarget) {
    if target.is_inside_nav() {
        return;
    }
    if target == ClickTarget::MenuToggle && doc.menu_toggle.is_some() {
        return;
    }
    toggle_nav(state, doc, Some(false));
}
