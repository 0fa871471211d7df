//! Content switcher
//!
//! Swaps the main panel between a fixed set of static pages and keeps the
//! menu's `active` class in step. Menu items are any elements with a
//! `data-page` attribute. Also hosts the presentational dark-mode and
//! sidebar toggles.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use cc_dom::{Document, EventType, ListenerOptions, NodeId, SelectorList};

use crate::{ActionError, Page};

const ACTIVE_CLASS: &str = "active";
const DARK_MODE_CLASS: &str = "dark-mode";

/// Static content of one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    pub title: String,
    pub paragraphs: Vec<String>,
}

impl PageContent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            paragraphs: Vec::new(),
        }
    }

    pub fn paragraph(mut self, text: impl Into<String>) -> Self {
        self.paragraphs.push(text.into());
        self
    }
}

/// Renders known pages into a container element
#[derive(Debug)]
pub struct ContentSwitcher {
    container: NodeId,
    pages: BTreeMap<String, PageContent>,
    current: RefCell<Option<String>>,
}

impl ContentSwitcher {
    pub fn new(container: NodeId) -> Self {
        Self {
            container,
            pages: BTreeMap::new(),
            current: RefCell::new(None),
        }
    }

    pub fn with_page(mut self, id: impl Into<String>, content: PageContent) -> Self {
        self.pages.insert(id.into(), content);
        self
    }

    /// Page currently shown
    pub fn current(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    /// Render `id` and highlight its menu items.
    ///
    /// Unknown ids leave the container empty and no item active; returns
    /// whether the id was known.
    pub fn show(&self, page: &Page, id: &str) -> Result<bool, ActionError> {
        let content = self.pages.get(id);

        let old: Vec<NodeId> = page.document().tree().children(self.container).collect();
        for child in old {
            page.release(child);
        }

        let mut doc = page.document_mut();
        if let Some(content) = content {
            render(&mut doc, self.container, content)?;
        }

        let menu = SelectorList::parse("[data-page]")?;
        for item in doc.tree().query_selector_all(NodeId::ROOT, &menu) {
            let selected = content.is_some() && doc.get_attribute(item, "data-page") == Some(id);
            doc.toggle_class(item, ACTIVE_CLASS, Some(selected))?;
        }

        *self.current.borrow_mut() = content.map(|_| id.to_string());
        if content.is_none() {
            tracing::debug!(page = id, "unknown page");
        }
        Ok(content.is_some())
    }

    /// Navigate when a menu item is clicked
    pub fn install(self, page: &Page) -> Result<Rc<Self>, ActionError> {
        let menu = SelectorList::parse("[data-page]")?;
        let switcher = Rc::new(self);
        let handle = switcher.clone();
        page.add_event_listener(NodeId::ROOT, EventType::Click, ListenerOptions::default(), move |page, event| {
            let target = {
                let doc = page.document();
                doc.closest(event.target(), &menu)
                    .and_then(|item| doc.get_attribute(item, "data-page").map(str::to_string))
            };
            let Some(id) = target else { return };
            event.prevent_default();
            if let Err(err) = handle.show(page, &id) {
                tracing::warn!(page = %id, error = %err, "page switch failed");
            }
        });
        Ok(switcher)
    }
}

fn render(doc: &mut Document, container: NodeId, content: &PageContent) -> Result<(), ActionError> {
    let heading = doc.create_element("h2");
    doc.set_text_content(heading, &content.title)?;
    doc.append_child(container, heading)?;
    for text in &content.paragraphs {
        let paragraph = doc.create_element("p");
        doc.set_text_content(paragraph, text)?;
        doc.append_child(container, paragraph)?;
    }
    Ok(())
}

/// Flip the `dark-mode` class on `<body>`; returns whether it is now on
pub fn toggle_dark_mode(page: &Page) -> Result<bool, ActionError> {
    let mut doc = page.document_mut();
    let body = doc.body();
    Ok(doc.toggle_class(body, DARK_MODE_CLASS, None)?)
}

/// Show or hide the sidebar; returns whether it is now visible
pub fn toggle_sidebar(page: &Page, sidebar: NodeId) -> Result<bool, ActionError> {
    let mut doc = page.document_mut();
    let hidden = doc
        .style(sidebar)
        .is_some_and(|style| style.computed("display") == "none");
    doc.set_style(sidebar, "display", if hidden { "block" } else { "none" })?;
    Ok(hidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_platform::{Config, Navigator};

    struct Fixture {
        page: Rc<Page>,
        main: NodeId,
        home_link: NodeId,
        about_link: NodeId,
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new("https://cifras.example/");
        let nav = doc.create_element("nav");
        let home_link = doc.create_element("a");
        doc.set_attribute(home_link, "data-page", "home").unwrap();
        let about_link = doc.create_element("a");
        doc.set_attribute(about_link, "data-page", "about").unwrap();
        let main = doc.create_element("main");
        doc.append_child(doc.body(), nav).unwrap();
        doc.append_child(nav, home_link).unwrap();
        doc.append_child(nav, about_link).unwrap();
        doc.append_child(doc.body(), main).unwrap();
        Fixture {
            page: Page::new(doc, Navigator::minimal(), Config::default()),
            main,
            home_link,
            about_link,
        }
    }

    fn switcher(main: NodeId) -> ContentSwitcher {
        ContentSwitcher::new(main)
            .with_page("home", PageContent::new("Home").paragraph("Latest chords"))
            .with_page("about", PageContent::new("About").paragraph("Made by musicians").paragraph("Since 2010"))
    }

    #[test]
    fn test_show_renders_and_highlights() {
        let f = fixture();
        let switcher = switcher(f.main);

        assert!(switcher.show(&f.page, "about").unwrap());
        let doc = f.page.document();
        assert_eq!(doc.inner_text(f.main), "About Made by musicians Since 2010");
        assert!(doc.class_list(f.about_link).contains("active"));
        assert!(!doc.class_list(f.home_link).contains("active"));
        assert_eq!(switcher.current().as_deref(), Some("about"));
    }

    #[test]
    fn test_unknown_page_renders_nothing() {
        let f = fixture();
        let switcher = switcher(f.main);
        switcher.show(&f.page, "home").unwrap();

        assert!(!switcher.show(&f.page, "missing").unwrap());
        let doc = f.page.document();
        assert_eq!(doc.tree().children(f.main).count(), 0);
        assert!(!doc.class_list(f.home_link).contains("active"));
        assert_eq!(switcher.current(), None);
    }

    #[test]
    fn test_switching_frees_old_panels() {
        let f = fixture();
        let switcher = switcher(f.main);
        switcher.show(&f.page, "home").unwrap();
        let settled = f.page.document().tree().len();

        for _ in 0..50 {
            switcher.show(&f.page, "about").unwrap();
            switcher.show(&f.page, "home").unwrap();
        }
        assert_eq!(f.page.document().tree().len(), settled);
    }

    #[test]
    fn test_menu_click_navigates() {
        let f = fixture();
        let switcher = switcher(f.main).install(&f.page).unwrap();

        let event = f.page.click(f.home_link);
        assert!(event.is_default_prevented());
        assert_eq!(switcher.current().as_deref(), Some("home"));
        assert_eq!(f.page.document().inner_text(f.main), "Home Latest chords");
    }

    #[test]
    fn test_toggles() {
        let f = fixture();
        assert!(toggle_dark_mode(&f.page).unwrap());
        assert!(!toggle_dark_mode(&f.page).unwrap());

        assert!(!toggle_sidebar(&f.page, f.main).unwrap());
        assert_eq!(f.page.document().style(f.main).unwrap().get("display"), Some("none"));
        assert!(toggle_sidebar(&f.page, f.main).unwrap());
    }
}
