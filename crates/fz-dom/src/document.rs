//! Document - High-level document API
//!
//! Lookup by id and selector, plus the handful of element mutations the
//! page scripts perform: classes, attributes, inline style, text, form
//! values and disabled state.

use crate::{DOMRect, DomTree, NodeId, Selector, SelectorError};

/// Document loading state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    #[default]
    Loading,
    Interactive,
    Complete,
}

/// HTML Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    ready_state: ReadyState,
}

impl Document {
    /// Create a document with `<html><head></head><body></body></html>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            ready_state: ReadyState::Loading,
        }
    }

    /// Create a document with no structure; call `finalize` once filled
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            ready_state: ReadyState::Loading,
        }
    }

    /// Locate `<html>`, `<head>` and `<body>` after the tree was built
    pub fn finalize(&mut self) {
        let find = |tree: &DomTree, parent: NodeId, tag: &str| {
            tree.element_children(parent)
                .find(|&c| tree.element(c).is_some_and(|e| e.tag == tag))
                .unwrap_or(NodeId::NONE)
        };
        self.html_element = find(&self.tree, NodeId::ROOT, "html");
        self.head_element = find(&self.tree, self.html_element, "head");
        self.body_element = find(&self.tree, self.html_element, "body");
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    pub fn head(&self) -> NodeId {
        self.head_element
    }

    pub fn body(&self) -> NodeId {
        self.body_element
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    // === Lookup ===

    /// Get a connected element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(NodeId::ROOT)
            .into_iter()
            .find(|&n| self.tree.element(n).and_then(|e| e.id()) == Some(id))
    }

    /// First element in document order matching `selector`
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        self.query_within(NodeId::ROOT, selector)
    }

    /// All elements in document order matching `selector`
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        self.query_all_within(NodeId::ROOT, selector)
    }

    /// First descendant of `scope` matching `selector`
    pub fn query_within(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .tree
            .descendants(scope)
            .into_iter()
            .find(|&n| selector.matches(&self.tree, n)))
    }

    /// All descendants of `scope` matching `selector`
    pub fn query_all_within(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .tree
            .descendants(scope)
            .into_iter()
            .filter(|&n| selector.matches(&self.tree, n))
            .collect())
    }

    /// Nearest inclusive ancestor matching `selector`
    pub fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .tree
            .ancestors(node)
            .into_iter()
            .find(|&n| selector.matches(&self.tree, n)))
    }

    /// Propagation path of an event targeted at `target`
    pub fn event_path(&self, target: NodeId) -> Vec<NodeId> {
        self.tree.ancestors(target)
    }

    // === Construction ===

    /// Create a detached element with attributes
    pub fn create_element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.tree.create_element(tag);
        if let Some(el) = self.tree.element_mut(id) {
            for (name, value) in attrs {
                el.set_attr(name, value);
            }
        }
        id
    }

    /// Create an element and append it to `parent`
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.create_element(tag, attrs);
        self.tree.append_child(parent, id);
        id
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.tree.append_child(parent, child);
    }

    /// Remove all children (`innerHTML = ''`)
    pub fn clear_children(&mut self, node: NodeId) {
        self.tree.clear_children(node);
    }

    // === Classes ===

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.tree.element(node).is_some_and(|e| e.classes.contains(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> bool {
        self.tree.element_mut(node).is_some_and(|e| e.classes.add(class))
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) -> bool {
        self.tree.element_mut(node).is_some_and(|e| e.classes.remove(class))
    }

    pub fn toggle_class(&mut self, node: NodeId, class: &str, force: Option<bool>) -> bool {
        self.tree
            .element_mut(node)
            .is_some_and(|e| e.classes.toggle(class, force))
    }

    // === Attributes ===

    pub fn get_attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.tree.element(node).and_then(|e| e.get_attr(name))
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.tree.element_mut(node) {
            el.set_attr(name, value);
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.tree.element_mut(node) {
            el.remove_attr(name);
        }
    }

    /// `element.disabled`
    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.tree.element(node).is_some_and(|e| e.has_attr("disabled"))
    }

    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if disabled {
            self.set_attr(node, "disabled", "");
        } else {
            self.remove_attr(node, "disabled");
        }
    }

    // === Style ===

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.tree.element(node).and_then(|e| e.style.get(property))
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(el) = self.tree.element_mut(node) {
            el.style.set(property, value);
        }
    }

    // === Text & forms ===

    pub fn text_content(&self, node: NodeId) -> String {
        self.tree.text_content(node)
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.tree.set_text_content(node, text);
    }

    /// `input.value`
    pub fn value(&self, node: NodeId) -> &str {
        self.tree.element(node).map(|e| e.value()).unwrap_or("")
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(el) = self.tree.element_mut(node) {
            el.value = Some(value.to_string());
        }
    }

    /// `form.reset()`: every control inside the form drops its live value
    pub fn reset_form(&mut self, form: NodeId) {
        let controls: Vec<NodeId> = self.tree.descendants(form);
        let mut count = 0;
        for node in controls {
            if let Some(el) = self.tree.element_mut(node) {
                if matches!(el.tag.as_str(), "input" | "textarea" | "select") {
                    el.value = None;
                    count += 1;
                }
            }
        }
        tracing::debug!("Reset {} form controls", count);
    }

    // === Geometry ===

    /// Layout box in document coordinates
    pub fn rect(&self, node: NodeId) -> Option<DOMRect> {
        self.tree.element(node).and_then(|e| e.rect)
    }

    pub fn set_rect(&mut self, node: NodeId, rect: DOMRect) {
        if let Some(el) = self.tree.element_mut(node) {
            el.rect = Some(rect);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
