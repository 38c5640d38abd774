//! Arena-backed node graph over one or more syntax trees.
//!
//! A [`Graph`] owns the sources, the syntax snapshots and a growing arena of
//! nodes. Only the root exists after construction; the children of a node are
//! created the first time anyone asks for them and cached from then on, so
//! repeated traversals always see the same [`NodeId`]s.
//!
//! The graph is single-threaded: lazy materialization mutates the arena
//! through a `RefCell`. It can be moved to another thread but not shared.

mod named;
mod node;
mod parts;

pub use node::{Node, Visit};

use crate::kind::NodeKind;
use crate::package::Package;
use crate::source::{SourceFile, SourceMap, Span, UnitId};
use crate::symbols::SymbolTable;
use crate::syntax::{Element, ElementId, SyntaxTree};
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("{sources} source units but {trees} syntax trees")]
    UnitCountMismatch { sources: usize, trees: usize },

    #[error("syntax tree for {unit} has no root element")]
    EmptyTree { unit: String },

    #[error("syntax tree for {unit} is malformed: element {element} {defect}")]
    MalformedTree {
        unit: String,
        element: usize,
        defect: TreeDefect,
    },
}

/// Structural problem found in a [`SyntaxTree`] handed to the graph.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeDefect {
    #[error("lists child {0}, which does not come after it")]
    ChildBeforeParent(usize),

    #[error("lists child {0}, which does not exist")]
    MissingChild(usize),

    #[error("lists child {0}, which already has a parent")]
    SharedChild(usize),

    #[error("spans {start}..{end}, which ends before it starts")]
    InvertedSpan { start: usize, end: usize },

    #[error("spans {start}..{end}, outside its parent or its unit")]
    SpanOutOfBounds { start: usize, end: usize },
}

/// Identity of a node inside its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where a node's syntax comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin {
    /// Synthetic package root; its children are the unit roots.
    Package,
    Element { unit: UnitId, element: ElementId },
    /// One name of a multi-name declaration.
    Split {
        unit: UnitId,
        element: ElementId,
        name: ElementId,
    },
}

impl Origin {
    fn unit(self) -> Option<UnitId> {
        match self {
            Origin::Package => None,
            Origin::Element { unit, .. } | Origin::Split { unit, .. } => Some(unit),
        }
    }

    fn element(self) -> Option<(UnitId, ElementId)> {
        match self {
            Origin::Package => None,
            Origin::Element { unit, element } | Origin::Split { unit, element, .. } => {
                Some((unit, element))
            }
        }
    }
}

#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) span: Span,
    pub(crate) parent: Option<NodeId>,
    pub(crate) level: usize,
    pub(crate) origin: Origin,
    children: Option<Arc<[NodeId]>>,
}

pub struct Graph {
    sources: SourceMap,
    trees: Vec<SyntaxTree>,
    nodes: RefCell<Vec<NodeData>>,
    spans: OnceCell<HashMap<Span, Vec<NodeId>>>,
    idents: OnceCell<HashMap<usize, NodeId>>,
    package: Option<Package>,
}

const ROOT: NodeId = NodeId(0);

impl Graph {
    /// Graph over a single file, without package context.
    ///
    /// Navigation and structural queries work; symbol resolution and call
    /// trees return nothing.
    pub fn from_file(file: SourceFile, tree: SyntaxTree) -> Result<Self, GraphError> {
        let mut sources = SourceMap::new();
        sources.push(file);
        Self::build(sources, vec![tree], None)
    }

    /// Graph over every file of a package.
    ///
    /// The root is a synthetic [`NodeKind::Package`] node whose children are
    /// the file roots in `sources` order. `trees[i]` is the syntax of unit
    /// `i`, and `symbols` must use the positions of `sources`.
    pub fn from_package(
        name: impl Into<String>,
        sources: SourceMap,
        trees: Vec<SyntaxTree>,
        symbols: SymbolTable,
    ) -> Result<Self, GraphError> {
        let package = Package::new(name, symbols);
        Self::build(sources, trees, Some(package))
    }

    fn build(
        sources: SourceMap,
        trees: Vec<SyntaxTree>,
        package: Option<Package>,
    ) -> Result<Self, GraphError> {
        if sources.len() != trees.len() {
            return Err(GraphError::UnitCountMismatch {
                sources: sources.len(),
                trees: trees.len(),
            });
        }
        for (file, tree) in sources.files().iter().zip(&trees) {
            if tree.root().is_none() {
                return Err(GraphError::EmptyTree {
                    unit: file.name().to_string(),
                });
            }
            check_tree(tree, file.text().len()).map_err(|(element, defect)| {
                GraphError::MalformedTree {
                    unit: file.name().to_string(),
                    element,
                    defect,
                }
            })?;
        }

        let root = if package.is_some() {
            NodeData {
                kind: NodeKind::Package,
                span: sources.span(),
                parent: None,
                level: 0,
                origin: Origin::Package,
                children: None,
            }
        } else {
            let (kind, span, origin) = unit_root(&sources, &trees, 0)?;
            NodeData {
                kind,
                span,
                parent: None,
                level: 0,
                origin,
                children: None,
            }
        };

        Ok(Self {
            sources,
            trees,
            nodes: RefCell::new(vec![root]),
            spans: OnceCell::new(),
            idents: OnceCell::new(),
            package,
        })
    }

    pub fn root(&self) -> Node<'_> {
        Node::new(self, ROOT)
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    pub fn package(&self) -> Option<&Package> {
        self.package.as_ref()
    }

    pub fn symbols(&self) -> Option<&SymbolTable> {
        self.package.as_ref().map(Package::symbols)
    }

    /// Number of nodes materialized so far.
    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Materialize every node and return the total count.
    pub fn materialize_all(&self) -> usize {
        self.preorder(ROOT, &mut |_| Visit::Descend);
        self.node_count()
    }

    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        (id.index() < self.node_count()).then(|| Node::new(self, id))
    }

    pub(crate) fn data<R>(&self, id: NodeId, f: impl FnOnce(&NodeData) -> R) -> R {
        f(&self.nodes.borrow()[id.index()])
    }

    pub(crate) fn element_of(&self, id: NodeId) -> Option<&Element> {
        let (unit, element) = self.data(id, |d| d.origin.element())?;
        self.trees.get(unit)?.get(element)
    }

    pub(crate) fn unit_of(&self, id: NodeId) -> Option<UnitId> {
        self.data(id, |d| d.origin.unit())
    }

    pub(crate) fn children_of(&self, id: NodeId) -> Arc<[NodeId]> {
        let cached = self.nodes.borrow()[id.index()].children.clone();
        match cached {
            Some(children) => children,
            None => self.materialize(id),
        }
    }

    fn materialize(&self, id: NodeId) -> Arc<[NodeId]> {
        let (origin, level) = self.data(id, |d| (d.origin, d.level));

        let mut pending = Vec::new();
        match origin {
            Origin::Package => {
                for unit in 0..self.trees.len() {
                    if let Ok(root) = unit_root(&self.sources, &self.trees, unit) {
                        pending.push(root);
                    }
                }
            }
            Origin::Element { unit, element } => {
                for &child in self.trees[unit].children(element) {
                    self.wrap(unit, child, &mut pending);
                }
            }
            Origin::Split {
                unit,
                element,
                name,
            } => {
                let tree = &self.trees[unit];
                for &child in tree.children(element) {
                    let is_name = tree.get(child).and_then(Element::field) == Some("name");
                    if child == name || !is_name {
                        self.wrap(unit, child, &mut pending);
                    }
                }
            }
        }

        let mut nodes = self.nodes.borrow_mut();
        let first = nodes.len();
        for (kind, span, origin) in pending {
            nodes.push(NodeData {
                kind,
                span,
                parent: Some(id),
                level: level + 1,
                origin,
                children: None,
            });
        }
        let children: Arc<[NodeId]> = (first..nodes.len()).map(|i| NodeId(i as u32)).collect();
        nodes[id.index()].children = Some(children.clone());
        trace!(node = id.index(), children = children.len(), "materialized children");
        children
    }

    /// Turn one syntax element into pending node(s), splitting multi-name
    /// declarations.
    fn wrap(&self, unit: UnitId, element_id: ElementId, out: &mut Vec<(NodeKind, Span, Origin)>) {
        let tree = &self.trees[unit];
        let Some(element) = tree.get(element_id) else {
            return;
        };
        let base = self.sources.files()[unit].base();
        let kind = NodeKind::classify(&element.kind);
        if kind == NodeKind::Unclassified {
            warn!(
                grammar_kind = %element.kind,
                unit = self.sources.files()[unit].name(),
                "unclassified syntax element"
            );
        }

        if kind.is_splittable() {
            let names: Vec<ElementId> = element
                .children
                .iter()
                .copied()
                .filter(|c| tree.get(*c).and_then(Element::field) == Some("name"))
                .collect();
            if names.len() > 1 {
                for name in names {
                    let start = tree.get(name).map_or(element.span.start, |n| n.span.start);
                    out.push((
                        kind,
                        Span::new(start + base, element.span.end + base),
                        Origin::Split {
                            unit,
                            element: element_id,
                            name,
                        },
                    ));
                }
                return;
            }
        }

        out.push((
            kind,
            element.span.offset(base),
            Origin::Element {
                unit,
                element: element_id,
            },
        ));
    }

    /// Pre-order traversal from `from`, the start node included.
    pub(crate) fn preorder(&self, from: NodeId, visit: &mut dyn FnMut(NodeId) -> Visit) {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if visit(id) == Visit::Skip {
                continue;
            }
            stack.extend(self.children_of(id).iter().rev().copied());
        }
    }

    /// Nodes whose span is exactly `span`, outermost first. The synthetic
    /// package root is never listed.
    pub(crate) fn nodes_with_span(&self, span: Span) -> &[NodeId] {
        let index = self.spans.get_or_init(|| {
            let mut index: HashMap<Span, Vec<NodeId>> = HashMap::new();
            for start in self.unit_roots() {
                self.preorder(start, &mut |id| {
                    let span = self.data(id, |d| d.span);
                    index.entry(span).or_default().push(id);
                    Visit::Descend
                });
            }
            debug!(spans = index.len(), "built span index");
            index
        });
        index.get(&span).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Identifier-like node starting at `pos`.
    pub(crate) fn ident_at(&self, pos: usize) -> Option<NodeId> {
        let index = self.idents.get_or_init(|| {
            let mut index = HashMap::new();
            self.preorder(ROOT, &mut |id| {
                let (kind, start) = self.data(id, |d| (d.kind, d.span.start));
                if kind.is_identifier() {
                    index.entry(start).or_insert(id);
                }
                Visit::Descend
            });
            debug!(idents = index.len(), "built identifier index");
            index
        });
        index.get(&pos).copied()
    }

    fn unit_roots(&self) -> Vec<NodeId> {
        if self.package.is_some() {
            self.children_of(ROOT).to_vec()
        } else {
            vec![ROOT]
        }
    }
}

/// Materialization only terminates on a proper tree: every child exists,
/// comes after its parent and has one parent, and every span is ordered and
/// nested in its parent's (the unit text for the root).
fn check_tree(tree: &SyntaxTree, text_len: usize) -> Result<(), (usize, TreeDefect)> {
    let mut bounds: Vec<Option<Span>> = vec![None; tree.len()];
    if let Some(first) = bounds.first_mut() {
        *first = Some(Span::new(0, text_len));
    }

    for (id, element) in tree.iter() {
        let index = id.index();
        let Span { start, end } = element.span;
        if start > end {
            return Err((index, TreeDefect::InvertedSpan { start, end }));
        }
        // an element nobody lists is unreachable and never materialized
        if let Some(outer) = bounds[index] {
            if start < outer.start || end > outer.end {
                return Err((index, TreeDefect::SpanOutOfBounds { start, end }));
            }
        }

        for child in &element.children {
            let c = child.index();
            if c >= tree.len() {
                return Err((index, TreeDefect::MissingChild(c)));
            }
            if c <= index {
                return Err((index, TreeDefect::ChildBeforeParent(c)));
            }
            if bounds[c].is_some() {
                return Err((index, TreeDefect::SharedChild(c)));
            }
            bounds[c] = Some(element.span);
        }
    }
    Ok(())
}

fn unit_root(
    sources: &SourceMap,
    trees: &[SyntaxTree],
    unit: UnitId,
) -> Result<(NodeKind, Span, Origin), GraphError> {
    let file = &sources.files()[unit];
    let element = trees[unit].root().ok_or_else(|| GraphError::EmptyTree {
        unit: file.name().to_string(),
    })?;
    let kind = trees[unit]
        .get(element)
        .map_or(NodeKind::SourceFile, |e| NodeKind::classify(&e.kind));
    Ok((kind, file.span(), Origin::Element { unit, element }))
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("units", &self.sources.len())
            .field("nodes", &self.node_count())
            .field("package", &self.package.as_ref().map(Package::name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> SyntaxTree {
        // func f(a, b int) { g() }
        let mut tree = SyntaxTree::with_root(Element::new("source_file", 0..24));
        let root = tree.root().unwrap();
        let func = tree.push_child(root, Element::new("function_declaration", 0..24));
        tree.push_child(func, Element::new("identifier", 5..6).with_field("name"));
        let params = tree.push_child(
            func,
            Element::new("parameter_list", 6..16).with_field("parameters"),
        );
        let param = tree.push_child(params, Element::new("parameter_declaration", 7..15));
        tree.push_child(param, Element::new("identifier", 7..8).with_field("name"));
        tree.push_child(param, Element::new("identifier", 10..11).with_field("name"));
        tree.push_child(param, Element::new("type_identifier", 12..15).with_field("type"));
        let body = tree.push_child(func, Element::new("block", 17..24).with_field("body"));
        tree.push_child(body, Element::new("mystery_statement", 19..22));
        tree
    }

    fn graph() -> Graph {
        let file = SourceFile::new("f.go", "func f(a, b int) { g() }");
        Graph::from_file(file, tree()).unwrap()
    }

    fn from_json(text: &str, json: &str) -> Result<Graph, GraphError> {
        let tree = SyntaxTree::from_json(json).unwrap();
        Graph::from_file(SourceFile::new("bad.go", text), tree)
    }

    #[test]
    fn self_referencing_child_is_rejected() {
        let json = r#"{"elements":[{"kind":"source_file","span":{"start":0,"end":0},"children":[0]}]}"#;
        let err = from_json("", json).err().unwrap();
        assert!(matches!(
            err,
            GraphError::MalformedTree {
                element: 0,
                defect: TreeDefect::ChildBeforeParent(0),
                ..
            }
        ));
        assert!(err.to_string().contains("bad.go"));
    }

    #[test]
    fn back_reference_and_missing_child_are_rejected() {
        let back = r#"{"elements":[
            {"kind":"source_file","span":{"start":0,"end":4},"children":[1]},
            {"kind":"block","span":{"start":0,"end":4},"children":[0]}
        ]}"#;
        assert!(matches!(
            from_json("f()\n", back),
            Err(GraphError::MalformedTree {
                element: 1,
                defect: TreeDefect::ChildBeforeParent(0),
                ..
            })
        ));

        let missing = r#"{"elements":[{"kind":"source_file","span":{"start":0,"end":4},"children":[7]}]}"#;
        assert!(matches!(
            from_json("f()\n", missing),
            Err(GraphError::MalformedTree {
                defect: TreeDefect::MissingChild(7),
                ..
            })
        ));
    }

    #[test]
    fn shared_child_is_rejected() {
        let json = r#"{"elements":[
            {"kind":"source_file","span":{"start":0,"end":4},"children":[1,2]},
            {"kind":"block","span":{"start":0,"end":4},"children":[2]},
            {"kind":"identifier","span":{"start":0,"end":1}}
        ]}"#;
        assert!(matches!(
            from_json("f()\n", json),
            Err(GraphError::MalformedTree {
                element: 1,
                defect: TreeDefect::SharedChild(2),
                ..
            })
        ));
    }

    #[test]
    fn bad_spans_are_rejected() {
        let inverted = r#"{"elements":[
            {"kind":"source_file","span":{"start":0,"end":4},"children":[1]},
            {"kind":"identifier","span":{"start":3,"end":1}}
        ]}"#;
        assert!(matches!(
            from_json("f()\n", inverted),
            Err(GraphError::MalformedTree {
                element: 1,
                defect: TreeDefect::InvertedSpan { start: 3, end: 1 },
                ..
            })
        ));

        let escaping = r#"{"elements":[
            {"kind":"source_file","span":{"start":0,"end":4},"children":[1]},
            {"kind":"identifier","span":{"start":2,"end":9}}
        ]}"#;
        assert!(matches!(
            from_json("f()\n", escaping),
            Err(GraphError::MalformedTree {
                defect: TreeDefect::SpanOutOfBounds { start: 2, end: 9 },
                ..
            })
        ));

        let past_text = r#"{"elements":[{"kind":"source_file","span":{"start":0,"end":40}}]}"#;
        assert!(from_json("f()\n", past_text).is_err());
    }

    #[test]
    fn parsed_trees_pass_the_check() {
        let text = "package p\n\nfunc f(a, b int) int { return a + b }\n";
        let (parsed, errors) = crate::pool::parse_to_syntax_tree(text).unwrap();
        assert_eq!(errors, 0);
        assert!(check_tree(&parsed, text.len()).is_ok());
        assert!(check_tree(&tree(), 24).is_ok());
    }

    #[test]
    fn only_root_exists_before_navigation() {
        let graph = graph();
        assert_eq!(graph.node_count(), 1);
        graph.root().children();
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn children_are_materialized_once() {
        let graph = graph();
        let first = graph.children_of(ROOT);
        let count = graph.node_count();
        let second = graph.children_of(ROOT);
        assert_eq!(first, second);
        assert_eq!(graph.node_count(), count);
    }

    #[test]
    fn multi_name_parameter_is_split() {
        let graph = graph();
        let params: Vec<_> = graph
            .root()
            .find_by_kind(NodeKind::Parameter)
            .into_iter()
            .collect();
        assert_eq!(params.len(), 2);

        let names: Vec<_> = params.iter().map(|p| p.name().unwrap()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(params[0].span(), Span::new(7, 15));
        assert_eq!(params[1].span(), Span::new(10, 15));

        for param in params {
            let kinds: Vec<_> = param.children().iter().map(|c| c.kind()).collect();
            assert_eq!(kinds, [NodeKind::Identifier, NodeKind::TypeIdentifier]);
        }
    }

    #[test]
    fn unknown_kind_is_kept_as_unclassified() {
        let graph = graph();
        let node = graph
            .root()
            .find_first_by_kind(NodeKind::Unclassified)
            .unwrap();
        assert_eq!(node.grammar_kind(), Some("mystery_statement"));
        assert_eq!(node.parent().unwrap().kind(), NodeKind::Block);
    }

    #[test]
    fn mismatched_units_are_rejected() {
        let mut sources = SourceMap::new();
        sources.add("a.go", "package a");
        let err = Graph::from_package("a", sources, Vec::new(), SymbolTable::new()).unwrap_err();
        assert!(matches!(
            err,
            GraphError::UnitCountMismatch {
                sources: 1,
                trees: 0
            }
        ));
    }

    #[test]
    fn empty_tree_is_rejected() {
        let err = Graph::from_file(SourceFile::new("a.go", ""), SyntaxTree::default()).unwrap_err();
        assert!(matches!(err, GraphError::EmptyTree { .. }));
    }

    #[test]
    fn package_root_wraps_units() {
        let mut sources = SourceMap::new();
        sources.add("a.go", "package a");
        sources.add("b.go", "package a");
        let trees = vec![
            SyntaxTree::with_root(Element::new("source_file", 0..9)),
            SyntaxTree::with_root(Element::new("source_file", 0..9)),
        ];
        let graph = Graph::from_package("a", sources, trees, SymbolTable::new()).unwrap();
        let root = graph.root();

        assert_eq!(root.kind(), NodeKind::Package);
        let files = root.children();
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].span(), Span::new(10, 19));
        assert!(files.iter().all(|f| f.level() == 1));
        assert_eq!(root.source_text(), "package a\npackage a");
    }

    #[test]
    fn span_index_lists_outermost_first() {
        let graph = graph();
        let ids = graph.nodes_with_span(Span::new(0, 24));
        let kinds: Vec<_> = ids.iter().map(|id| graph.data(*id, |d| d.kind)).collect();
        assert_eq!(kinds, [NodeKind::SourceFile, NodeKind::FuncDecl]);
    }
}
