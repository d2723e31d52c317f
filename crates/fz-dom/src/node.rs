//! DOM Node
//!
//! Nodes live in the tree arena and link to each other by `NodeId`.
//! `class` and `style` attributes are kept pre-parsed on the element.

use crate::{ClassList, DOMRect, NodeId, StyleDeclaration};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// Children in document order
    pub children: Vec<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    pub fn new(data: NodeData) -> Self {
        Self { parent: NodeId::NONE, children: Vec::new(), data }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
    /// Freed arena slot waiting for reuse
    Vacant,
}

/// Element-specific data
#[derive(Debug, Default)]
pub struct ElementData {
    /// Lower-case tag name
    pub tag: String,
    /// Attributes other than `class` and `style`
    pub attrs: Vec<(String, String)>,
    pub classes: ClassList,
    pub style: StyleDeclaration,
    /// Live form value; `None` falls back to the `value` attribute
    pub value: Option<String>,
    /// Layout box in document coordinates
    pub rect: Option<DOMRect>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self { tag: tag.to_ascii_lowercase(), ..Default::default() }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match name {
            "class" => self.classes = ClassList::parse(value),
            "style" => self.style = StyleDeclaration::parse(value),
            _ => match self.attrs.iter_mut().find(|(n, _)| n == name) {
                Some((_, v)) => *v = value.to_string(),
                None => self.attrs.push((name.to_string(), value.to_string())),
            },
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(n, _)| n == name)?;
        Some(self.attrs.remove(pos).1)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    pub fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    /// Current form value
    pub fn value(&self) -> &str {
        self.value
            .as_deref()
            .or_else(|| self.get_attr("value"))
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_and_style_attrs_are_parsed() {
        let mut el = ElementData::new("DIV");
        el.set_attr("class", "stat reveal");
        el.set_attr("style", "display: none; color: red");
        el.set_attr("id", "confirmation");

        assert_eq!(el.tag, "div");
        assert!(el.classes.contains("reveal"));
        assert_eq!(el.style.get("display"), Some("none"));
        assert_eq!(el.id(), Some("confirmation"));
        assert!(el.get_attr("class").is_none());
    }

    #[test]
    fn test_value_falls_back_to_attribute() {
        let mut input = ElementData::new("input");
        assert_eq!(input.value(), "");

        input.set_attr("value", "2025-11-12");
        assert_eq!(input.value(), "2025-11-12");

        input.value = Some("2025-11-13".into());
        assert_eq!(input.value(), "2025-11-13");
    }
}
