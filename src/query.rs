//! Structural queries over a node's subtree.
//!
//! `tree_*` and `find_*` operations search every descendant in pre-order and
//! never return the node they start from. `child_*` operations look at direct
//! children only.

use crate::graph::{Node, Visit};
use crate::kind::NodeKind;
use crate::token::Token;

impl<'g> Node<'g> {
    /// All descendants matching `pred`, in pre-order.
    pub fn tree_nodes(self, mut pred: impl FnMut(Node<'g>) -> bool) -> Vec<Node<'g>> {
        let mut found = Vec::new();
        self.walk(|node| {
            if node != self && pred(node) {
                found.push(node);
            }
            Visit::Descend
        });
        found
    }

    /// First descendant matching `pred`, in pre-order.
    pub fn tree_node(self, mut pred: impl FnMut(Node<'g>) -> bool) -> Option<Node<'g>> {
        let mut found = None;
        self.walk(|node| {
            if found.is_some() {
                return Visit::Skip;
            }
            if node != self && pred(node) {
                found = Some(node);
                return Visit::Skip;
            }
            Visit::Descend
        });
        found
    }

    pub fn child_nodes(self, mut pred: impl FnMut(Node<'g>) -> bool) -> Vec<Node<'g>> {
        self.children().into_iter().filter(|n| pred(*n)).collect()
    }

    pub fn child_node(self, mut pred: impl FnMut(Node<'g>) -> bool) -> Option<Node<'g>> {
        self.children().into_iter().find(|n| pred(*n))
    }

    pub fn find_by_kind(self, kind: NodeKind) -> Vec<Node<'g>> {
        self.tree_nodes(|n| n.is(kind))
    }

    pub fn find_first_by_kind(self, kind: NodeKind) -> Option<Node<'g>> {
        self.tree_node(|n| n.is(kind))
    }

    pub fn children_by_kind(self, kind: NodeKind) -> Vec<Node<'g>> {
        self.child_nodes(|n| n.is(kind))
    }

    pub fn child_by_kind(self, kind: NodeKind) -> Option<Node<'g>> {
        self.child_node(|n| n.is(kind))
    }

    /// Descendants whose [`Node::name`] equals `name`.
    pub fn find_by_name(self, name: &str) -> Vec<Node<'g>> {
        self.tree_nodes(|n| n.name().as_deref() == Some(name))
    }

    pub fn find_first_by_name(self, name: &str) -> Option<Node<'g>> {
        self.tree_node(|n| n.name().as_deref() == Some(name))
    }

    /// Identifier-like descendants spelled `name`.
    pub fn find_idents_by_name(self, name: &str) -> Vec<Node<'g>> {
        self.tree_nodes(|n| n.kind().is_identifier() && n.source_text() == name)
    }

    pub fn find_first_ident_by_name(self, name: &str) -> Option<Node<'g>> {
        self.tree_node(|n| n.kind().is_identifier() && n.source_text() == name)
    }

    pub fn child_by_name(self, name: &str) -> Option<Node<'g>> {
        self.child_node(|n| n.name().as_deref() == Some(name))
    }

    /// Descendants whose static type is spelled `ty`.
    pub fn find_by_value_type(self, ty: &str) -> Vec<Node<'g>> {
        self.tree_nodes(|n| n.value_type() == Some(ty))
    }

    /// Descendants of a map type.
    pub fn find_maps(self) -> Vec<Node<'g>> {
        self.tree_nodes(|n| n.value_type().is_some_and(|t| t.starts_with("map")))
    }

    pub fn find_by_token(self, token: Token) -> Vec<Node<'g>> {
        self.tree_nodes(|n| n.token() == Some(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Loader;

    const SOURCE: &str = r#"package raindrops

import "strconv"

func Convert(n int) string {
	out := ""
	if n%3 == 0 {
		out += "Pling"
	}
	if n%5 == 0 {
		out += "Plang"
	}
	if out == "" {
		return strconv.Itoa(n)
	}
	return out
}
"#;

    #[test]
    fn tree_queries_exclude_start_node() {
        let graph = Loader::default().load_source("r.go", SOURCE).unwrap();
        let func = graph.root().find_first_by_kind(NodeKind::FuncDecl).unwrap();

        assert!(func.find_by_kind(NodeKind::FuncDecl).is_empty());
        assert!(func.find_first_by_kind(NodeKind::FuncDecl).is_none());
        assert!(!func.tree_nodes(|_| true).contains(&func));
    }

    #[test]
    fn find_by_kind_is_sound_and_ordered() {
        let graph = Loader::default().load_source("r.go", SOURCE).unwrap();
        let ifs = graph.root().find_by_kind(NodeKind::IfStmt);

        assert_eq!(ifs.len(), 3);
        assert!(ifs.iter().all(|n| n.is(NodeKind::IfStmt)));
        assert!(ifs.windows(2).all(|w| w[0].start() < w[1].start()));
        assert_eq!(
            graph.root().find_first_by_kind(NodeKind::IfStmt),
            ifs.first().copied()
        );
    }

    #[test]
    fn name_queries() {
        let graph = Loader::default().load_source("r.go", SOURCE).unwrap();
        let root = graph.root();

        assert_eq!(
            root.child_by_name("Convert").map(|n| n.kind()),
            Some(NodeKind::FuncDecl)
        );
        assert_eq!(
            root.find_first_by_name("strconv.Itoa").map(|n| n.kind()),
            Some(NodeKind::SelectorExpr)
        );
        assert_eq!(root.find_idents_by_name("out").len(), 5);
        assert!(root.find_first_ident_by_name("missing").is_none());
        // `Convert` appears as the function and as its identifier
        assert_eq!(root.find_by_name("Convert").len(), 2);
    }

    #[test]
    fn child_queries_stay_shallow() {
        let graph = Loader::default().load_source("r.go", SOURCE).unwrap();
        let root = graph.root();

        assert!(root.child_by_kind(NodeKind::IfStmt).is_none());
        assert_eq!(root.children_by_kind(NodeKind::FuncDecl).len(), 1);
        assert!(root.child_by_kind(NodeKind::ImportDecl).is_some());
    }

    #[test]
    fn token_queries() {
        let graph = Loader::default().load_source("r.go", SOURCE).unwrap();
        let root = graph.root();

        assert_eq!(root.find_by_token(Token::AddAssign).len(), 2);
        assert_eq!(root.find_by_token(Token::Rem).len(), 2);
        assert_eq!(root.find_by_token(Token::Eql).len(), 3);
        assert_eq!(root.find_by_token(Token::Define).len(), 1);
        assert!(root.find_by_token(Token::Goto).is_empty());
    }
}
