//! DOM Tree (arena-based allocation)

use crate::{ElementData, Node, NodeData, NodeId};

/// Arena-based DOM tree. Index 0 is always the document node; detached
/// nodes stay in the arena with no parent.
///
/// Nodes removed by [`DomTree::clear_children`] are freed along with their
/// subtree and their slots are handed out again, so ids held for them stop
/// being valid.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::new(NodeData::Document)], free: Vec::new() }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.index())
            .filter(|n| !matches!(n.data, NodeData::Vacant))
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .filter(|n| !matches!(n.data, NodeData::Vacant))
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    /// Number of arena slots, free ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Slots waiting for reuse
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = Node::new(data);
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Comment(text.to_string()))
    }

    /// Append `child` to `parent`, detaching it from any previous parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        self.detach(child);
        self.nodes[child.index()].parent = parent;
        self.nodes[parent.index()].children.push(child);
    }

    /// Remove a node from its parent
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.get(id).map(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|&c| c != id);
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
        }
    }

    /// Remove every child of `id` (`innerHTML = ''`) and free the removed
    /// subtrees
    pub fn clear_children(&mut self, id: NodeId) {
        let mut stack = match self.get_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        while let Some(child) = stack.pop() {
            let node = &mut self.nodes[child.index()];
            stack.append(&mut node.children);
            node.parent = NodeId::NONE;
            node.data = NodeData::Vacant;
            self.free.push(child);
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Element children only
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.element(c).is_some())
    }

    /// Descendants in document (pre-)order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// `id` followed by its ancestors up to the root
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = Some(id).filter(|_| self.get(id).is_some());
        while let Some(node) = current {
            out.push(node);
            current = self.parent(node);
        }
        out
    }

    /// True if the node is attached under the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.ancestors(id).last() == Some(&NodeId::ROOT)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }

    /// Replace all children with a single text node. A lone text child is
    /// rewritten in place.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if let Some(NodeData::Text(t)) = self.get_mut(id).map(|n| &mut n.data) {
            *t = text.to_string();
            return;
        }
        if let &[only] = self.children(id) {
            if !text.is_empty() {
                if let Some(NodeData::Text(t)) = self.get_mut(only).map(|n| &mut n.data) {
                    *t = text.to_string();
                    return;
                }
            }
        }
        self.clear_children(id);
        if !text.is_empty() {
            let t = self.create_text(text);
            self.append_child(id, t);
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}
