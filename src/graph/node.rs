use super::{Graph, NodeId, Origin};
use crate::kind::NodeKind;
use crate::package::Package;
use crate::source::{SourceFile, Span};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Visitor verdict for [`Node::walk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Descend,
    /// Do not visit the children of the current node; siblings still are.
    Skip,
}

/// Handle to one node of a [`Graph`].
///
/// Cheap to copy. Two handles are equal when they point at the same node of
/// the same graph.
#[derive(Clone, Copy)]
pub struct Node<'g> {
    graph: &'g Graph,
    id: NodeId,
}

impl<'g> Node<'g> {
    pub(crate) fn new(graph: &'g Graph, id: NodeId) -> Self {
        Self { graph, id }
    }

    pub fn id(self) -> NodeId {
        self.id
    }

    pub fn graph(self) -> &'g Graph {
        self.graph
    }

    pub fn kind(self) -> NodeKind {
        self.graph.data(self.id, |d| d.kind)
    }

    pub fn is(self, kind: NodeKind) -> bool {
        self.kind() == kind
    }

    /// Grammar kind of the underlying syntax element; `None` for the
    /// synthetic package root.
    pub fn grammar_kind(self) -> Option<&'g str> {
        self.graph.element_of(self.id).map(|e| e.kind.as_str())
    }

    /// Field the node occupies in its parent element (`name`, `body`, ...).
    pub fn field(self) -> Option<&'g str> {
        if self.graph.data(self.id, |d| d.parent.is_none()) {
            return None;
        }
        self.graph.element_of(self.id).and_then(|e| e.field())
    }

    /// Global byte span.
    pub fn span(self) -> Span {
        self.graph.data(self.id, |d| d.span)
    }

    pub fn start(self) -> usize {
        self.span().start
    }

    pub fn end(self) -> usize {
        self.span().end
    }

    /// Distance from the root; the root is level 0.
    pub fn level(self) -> usize {
        self.graph.data(self.id, |d| d.level)
    }

    pub fn is_root(self) -> bool {
        self.graph.data(self.id, |d| d.parent.is_none())
    }

    pub fn parent(self) -> Option<Node<'g>> {
        self.graph
            .data(self.id, |d| d.parent)
            .map(|id| Node::new(self.graph, id))
    }

    /// Direct children in source order, materialized on first call.
    pub fn children(self) -> Vec<Node<'g>> {
        self.graph
            .children_of(self.id)
            .iter()
            .map(|&id| Node::new(self.graph, id))
            .collect()
    }

    pub fn child_count(self) -> usize {
        self.graph.children_of(self.id).len()
    }

    /// Parent, grandparent, ... up to the root.
    pub fn ancestors(self) -> Vec<Node<'g>> {
        std::iter::successors(self.parent(), |n| n.parent()).collect()
    }

    /// The other children of this node's parent.
    pub fn siblings(self) -> Vec<Node<'g>> {
        match self.parent() {
            Some(parent) => parent
                .children()
                .into_iter()
                .filter(|n| *n != self)
                .collect(),
            None => Vec::new(),
        }
    }

    /// True iff this node is a proper ancestor of `other`.
    pub fn contains(self, other: Node<'g>) -> bool {
        if !std::ptr::eq(self.graph, other.graph) {
            return false;
        }
        let level = self.level();
        let mut current = other.parent();
        while let Some(node) = current {
            if node.id == self.id {
                return true;
            }
            if node.level() <= level {
                return false;
            }
            current = node.parent();
        }
        false
    }

    /// Nearest ancestor of `kind`.
    pub fn next_ancestor_of_kind(self, kind: NodeKind) -> Option<Node<'g>> {
        std::iter::successors(self.parent(), |n| n.parent()).find(|n| n.is(kind))
    }

    pub fn is_within_kind(self, kind: NodeKind) -> bool {
        self.next_ancestor_of_kind(kind).is_some()
    }

    /// Pre-order traversal starting with this node.
    ///
    /// Returning [`Visit::Skip`] prunes the children of the visited node
    /// without stopping the traversal.
    pub fn walk(self, mut visitor: impl FnMut(Node<'g>) -> Visit) {
        let graph = self.graph;
        graph.preorder(self.id, &mut |id| visitor(Node::new(graph, id)));
    }

    /// Compilation unit the node belongs to; `None` for the package root.
    pub fn unit(self) -> Option<&'g SourceFile> {
        let unit = self.graph.unit_of(self.id)?;
        self.graph.sources().get(unit)
    }

    /// Source text of the node.
    ///
    /// The package root yields every unit joined by a newline, a file root
    /// yields its whole unit.
    pub fn source_text(self) -> Cow<'g, str> {
        if self.graph.data(self.id, |d| d.origin == Origin::Package) {
            return Cow::Owned(self.graph.sources().joined());
        }
        let text = self
            .unit()
            .and_then(|file| file.slice(self.span()))
            .unwrap_or_default();
        Cow::Borrowed(text)
    }

    /// Package context, if the graph was built for a package.
    pub fn package(self) -> Option<&'g Package> {
        self.graph.package()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl Hash for Node<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.graph, state);
        self.id.hash(state);
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({} {} #{})", self.kind(), self.span(), self.id.index())
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} {}", self.kind(), name),
            None => write!(f, "{}", self.kind()),
        }
    }
}
