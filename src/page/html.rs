//! HTML rendering of the page model

use maud::{Markup, html};

use super::{ClassList, Document, Focus, NavItem};

fn class_attr(classes: &ClassList) -> Option<String> {
    (!classes.is_empty()).then(|| classes.to_attr())
}

fn nav_item(item: &NavItem, focused: bool) -> Markup {
    html! {
        @match item {
            NavItem::Link { label, href } => {
                a href=[href.as_deref()] autofocus[focused] { (label) }
            }
            NavItem::Button { label, disabled } => {
                button type="button" disabled[*disabled] autofocus[focused] { (label) }
            }
            NavItem::Input { name } => {
                input name=(name) autofocus[focused];
            }
            NavItem::Select { name } => {
                select name=(name) autofocus[focused] {}
            }
            NavItem::Textarea { name } => {
                textarea name=(name) autofocus[focused] {}
            }
            NavItem::Text { text } => {
                span { (text) }
            }
        }
    }
}

fn body(doc: &Document) -> Markup {
    html! {
        body class=[class_attr(&doc.body.classes)] {
            @if let Some(toggle) = &doc.menu_toggle {
                button class="menu-toggle" aria-controls="site-nav"
                    aria-expanded=[toggle.aria_expanded.as_deref()]
                    autofocus[doc.focus == Some(Focus::MenuToggle)] { "Menu" }
            }

            @if let Some(nav) = &doc.nav {
                nav id="site-nav" class=[class_attr(&nav.classes)] {
                    @for (idx, item) in nav.items.iter().enumerate() {
                        (nav_item(item, doc.focus == Some(Focus::NavItem(idx))))
                    }
                }
            }

            @if let Some(toggle) = &doc.theme_toggle {
                button class="theme-toggle" aria-label=[toggle.aria_label.as_deref()] {
                    span class="theme-toggle-icon" { (toggle.icon) }
                }
            }

            @if let Some(list) = &doc.repo_list {
                div class="repo-list" data-repo-list
                    data-repo-limit=[list.dataset.get("repoLimit")]
                    data-repo-sort=[list.dataset.get("repoSort")]
                    data-include-forks=[list.dataset.get("includeForks")] {
                    @for card in &list.cards {
                        (card)
                    }
                }
            }

            @if let Some(empty) = &doc.repo_empty {
                div class="repo-empty" data-repo-empty hidden[empty.hidden] {
                    (empty.placeholder)
                }
            }

            @if let Some(form) = &doc.contact_form {
                form class="contact-form" novalidate {
                    input name="name" value=(form.name);
                    input name="email" type="email" value=(form.email);
                    textarea name="message" { (form.message) }
                    button type="submit" { "Send" }
                }
            }

            @if let Some(feedback) = &doc.feedback {
                @let classes = match class_attr(&feedback.classes) {
                    Some(extra) => format!("form-feedback {}", extra),
                    None => "form-feedback".to_string(),
                };
                p class=(classes) role="status" { (feedback.text) }
            }

            @if let Some(year) = &doc.year_slot {
                footer {
                    span id="year" { (year.text) }
                }
            }
        }
    }
}

/// Render the document body as HTML
pub fn render_document(doc: &Document) -> String {
    body(doc).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageConfig;
    use crate::page::{ContactForm, Feedback};

    #[test]
    fn test_render_default_page() {
        let page = PageConfig {
            repo_limit: Some("3".into()),
            ..PageConfig::default()
        };
        let doc = Document::from_config(&page);
        let html = render_document(&doc);

        assert!(html.starts_with("<body>"));
        assert!(html.contains("<nav id=\"site-nav\">"));
        assert!(html.contains("aria-expanded=\"false\""));
        assert!(html.contains("data-repo-list data-repo-limit=\"3\""));
        assert!(!html.contains("data-repo-sort"));
        assert!(html.contains("data-repo-empty hidden"));
        assert!(html.contains("class=\"form-feedback\""));
        assert!(html.ends_with("</body>"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut doc = Document::from_config(&PageConfig::default());
        doc.contact_form = Some(ContactForm {
            name: "\"><script>".into(),
            email: String::new(),
            message: "a < b & c".into(),
        });
        let mut feedback = Feedback {
            text: "<b>hi</b>".into(),
            ..Feedback::default()
        };
        feedback.classes.add("error");
        doc.feedback = Some(feedback);

        let html = render_document(&doc);
        assert!(html.contains("value=\"&quot;&gt;&lt;script&gt;\""));
        assert!(html.contains("a &lt; b &amp; c"));
        assert!(html.contains("class=\"form-feedback error\""));
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_focused_nav_item_is_marked() {
        let mut doc = Document::from_config(&PageConfig::default());
        doc.focus = Some(Focus::NavItem(1));
        doc.nav.as_mut().unwrap().classes.add("open");

        let html = render_document(&doc);
        assert!(html.contains("<nav id=\"site-nav\" class=\"open\">"));
        assert!(html.contains("<a href=\"#projects\" autofocus>Projects</a>"));
        assert!(html.contains("<a href=\"#about\">About</a>"));
    }
}
