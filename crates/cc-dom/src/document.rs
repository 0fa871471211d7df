//! Document - High-level document API

use crate::{
    data_attribute_name, DOMRect, DOMTokenList, DomError, DomTree, NodeId, SelectorList,
    StyleDeclaration,
};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    /// Document URL
    url: String,
    title: String,
    body_element: NodeId,
    /// Element holding focus, if any
    focused: Option<NodeId>,
}

impl Document {
    /// Create a new document with `<html>`, `<head>` and `<body>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created nodes under the root cannot violate hierarchy rules
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            title: String::new(),
            body_element: body,
            focused: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn body(&self) -> NodeId {
        self.body_element
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    // ---- Tree construction ----

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.tree.append_child(parent, child)
    }

    /// Detach a node; removing a detached node is a no-op
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.drop_focus_within(id);
        self.tree.remove(id)
    }

    /// Detach a node and free its subtree; returns the number of nodes freed
    pub fn free(&mut self, id: NodeId) -> usize {
        self.drop_focus_within(id);
        self.tree.free(id)
    }

    fn drop_focus_within(&mut self, id: NodeId) {
        if self.focused.is_some_and(|f| self.tree.contains(id, f)) {
            self.focused = None;
        }
    }

    /// Replace all children with a single text node
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        self.tree.clear_children(id);
        if !text.is_empty() {
            let node = self.tree.create_text(text);
            self.tree.append_child(id, node)?;
        }
        Ok(())
    }

    // ---- Queries ----

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, DomError> {
        let selector = SelectorList::parse(selector)?;
        Ok(self.tree.query_selector(self.tree.root(), &selector))
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let selector = SelectorList::parse(selector)?;
        Ok(self.tree.query_selector_all(self.tree.root(), &selector))
    }

    pub fn closest(&self, id: NodeId, selector: &SelectorList) -> Option<NodeId> {
        self.tree.closest(id, selector)
    }

    pub fn is_connected(&self, id: NodeId) -> bool {
        self.tree.is_connected(id)
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.element(id).ok().map(|e| e.tag.as_str())
    }

    // ---- Attributes ----

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.tree.element(id).ok()?.get_attr(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.tree.element_mut(id)?.attrs.set(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<(), DomError> {
        self.tree.element_mut(id)?.attrs.remove(name);
        Ok(())
    }

    /// `element.dataset[key]` with a camelCase key
    pub fn data(&self, id: NodeId, key: &str) -> Option<&str> {
        self.get_attribute(id, &data_attribute_name(key))
    }

    pub fn class_list(&self, id: NodeId) -> DOMTokenList {
        DOMTokenList::from_string(self.get_attribute(id, "class").unwrap_or_default())
    }

    /// Toggle a class token, returning whether it is now present
    pub fn toggle_class(&mut self, id: NodeId, class: &str, force: Option<bool>) -> Result<bool, DomError> {
        let mut list = self.class_list(id);
        let on = list.toggle(class, force);
        self.set_attribute(id, "class", &list.value())?;
        Ok(on)
    }

    // ---- Text ----

    /// Rendered text: descendants of `display: none` elements are skipped
    /// and whitespace runs collapse to single spaces.
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut raw = String::new();
        self.collect_rendered_text(id, &mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_rendered_text(&self, id: NodeId, out: &mut String) {
        for child in self.tree.children(id) {
            let Some(node) = self.tree.get(child) else { continue };
            if let Some(text) = node.as_text() {
                out.push_str(text);
                out.push(' ');
            } else if let Some(elem) = node.as_element() {
                if elem.style.get("display") != Some("none") {
                    self.collect_rendered_text(child, out);
                }
            }
        }
    }

    pub fn text_content(&self, id: NodeId) -> String {
        self.tree.text_content(id)
    }

    // ---- Style and geometry ----

    pub fn style(&self, id: NodeId) -> Option<&StyleDeclaration> {
        self.tree.element(id).ok().map(|e| &e.style)
    }

    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) -> Result<(), DomError> {
        self.tree.element_mut(id)?.style.set(property, value);
        Ok(())
    }

    /// Record the element's layout box
    pub fn set_rect(&mut self, id: NodeId, rect: DOMRect) -> Result<(), DomError> {
        self.tree.element_mut(id)?.rect = Some(rect);
        Ok(())
    }

    /// Bounding box of a connected element (zero-sized if never laid out)
    pub fn bounding_client_rect(&self, id: NodeId) -> Result<DOMRect, DomError> {
        let elem = self.tree.element(id)?;
        if !self.tree.is_connected(id) {
            return Err(DomError::Detached(id));
        }
        Ok(elem.rect.unwrap_or_default())
    }

    // ---- Focus ----

    /// Focus a connected element
    pub fn focus(&mut self, id: NodeId) -> Result<(), DomError> {
        self.tree.element(id)?;
        if !self.tree.is_connected(id) {
            return Err(DomError::Detached(id));
        }
        tracing::trace!(node = %id, "focus");
        self.focused = Some(id);
        Ok(())
    }

    /// Focused element, falling back to `<body>`
    pub fn active_element(&self) -> NodeId {
        self.focused.unwrap_or(self.body_element)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
