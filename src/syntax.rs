//! Owned snapshot of a parser's output for one compilation unit.
//!
//! The graph never talks to a parser directly; it consumes this tree. The
//! bundled tree-sitter frontend produces it ([`crate::ts::ParsedSource::to_syntax_tree`]),
//! and because it is plain serde data any other frontend can hand one over as
//! JSON.
//!
//! Elements are stored in pre-order: a parent always has a smaller id than
//! its children, and siblings appear in source order. A tree handed over by
//! another frontend is checked for this when a graph is built over it.

use crate::source::Span;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(u32);

impl ElementId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One named syntax element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Grammar kind, e.g. `call_expression`.
    pub kind: String,
    /// Unit-local byte range.
    pub span: Span,
    /// Field this element occupies in its parent (`name`, `body`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Operator token carried by the element (`+`, `:=`, `<-`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementId>,
}

impl Element {
    pub fn new(kind: impl Into<String>, span: impl Into<Span>) -> Self {
        Self {
            kind: kind.into(),
            span: span.into(),
            field: None,
            operator: None,
            children: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxTree {
    elements: Vec<Element>,
}

impl SyntaxTree {
    /// Tree consisting of a single root element.
    pub fn with_root(root: Element) -> Self {
        let mut tree = Self::default();
        tree.elements.push(root);
        tree
    }

    /// The first element; `None` for an empty tree.
    pub fn root(&self) -> Option<ElementId> {
        (!self.elements.is_empty()).then_some(ElementId(0))
    }

    /// Append `element` as the last child of `parent`.
    ///
    /// Any children listed on `element` are discarded; build subtrees by
    /// pushing children after their parent so ids stay in pre-order.
    pub fn push_child(&mut self, parent: ElementId, mut element: Element) -> ElementId {
        element.children.clear();
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(element);
        debug_assert!(parent < id, "parent {parent:?} must precede child {id:?}");
        if let Some(parent) = self.elements.get_mut(parent.index()) {
            parent.children.push(id);
        }
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All elements with their ids, in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId(i as u32), e))
    }

    /// Ids of the element's children, in order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// Parent of every element, indexed by element id.
    pub fn parents(&self) -> Vec<Option<ElementId>> {
        let mut parents = vec![None; self.elements.len()];
        for (id, element) in self.iter() {
            for child in &element.children {
                parents[child.index()] = Some(id);
            }
        }
        parents
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SyntaxTree {
        let mut tree = SyntaxTree::with_root(Element::new("source_file", 0..20));
        let root = tree.root().unwrap();
        let func = tree.push_child(root, Element::new("function_declaration", 0..20));
        tree.push_child(func, Element::new("identifier", 5..6).with_field("name"));
        tree.push_child(func, Element::new("block", 9..20).with_field("body"));
        tree
    }

    #[test]
    fn ids_are_pre_order() {
        let tree = sample();
        let kinds: Vec<_> = tree.iter().map(|(_, e)| e.kind.as_str()).collect();
        assert_eq!(
            kinds,
            ["source_file", "function_declaration", "identifier", "block"]
        );
        for (id, element) in tree.iter() {
            assert!(element.children.iter().all(|c| *c > id));
        }
    }

    #[test]
    fn parents_are_inverse_of_children() {
        let tree = sample();
        let parents = tree.parents();
        assert_eq!(parents[0], None);
        assert_eq!(parents[2], Some(ElementId(1)));
        assert_eq!(parents[3], Some(ElementId(1)));
    }

    #[test]
    fn json_keeps_fields() {
        let tree = sample();
        let json = tree.to_json().unwrap();
        assert!(json.contains("\"field\":\"name\""));
        assert_eq!(SyntaxTree::from_json(&json).unwrap(), tree);
    }

    #[test]
    fn empty_tree_has_no_root() {
        assert!(SyntaxTree::default().root().is_none());
        assert!(SyntaxTree::default().children(ElementId(3)).is_empty());
    }
}
