//! Call-tree traversal: a subtree search that follows calls into the bodies
//! of the package functions they invoke.
//!
//! Every function body is expanded at most once per traversal, including
//! the body the traversal starts in, so recursive and mutually recursive
//! code terminates.

use crate::graph::{Node, NodeId};
use crate::kind::NodeKind;
use std::collections::HashSet;
use std::convert::Infallible;
use std::ops::ControlFlow;

impl<'g> Node<'g> {
    /// Function declaration a call or conversion invokes, looked up by name
    /// in the package function index.
    pub fn callee(self) -> Option<Node<'g>> {
        if !self.kind().is_call() {
            return None;
        }
        let target = self.call_target()?;
        let ident = match target.kind() {
            NodeKind::Identifier => target,
            NodeKind::ArrayType | NodeKind::SliceType => target.ident()?,
            _ => return None,
        };
        self.graph().declaration_by_name(&ident.source_text())
    }

    /// Descendants matching `pred`, plus matches inside every function
    /// reachable through calls.
    ///
    /// Callee declarations are themselves tested against `pred` when first
    /// reached. Results are in traversal order. Without package context the
    /// result is empty.
    pub fn call_tree_nodes(self, mut pred: impl FnMut(Node<'g>) -> bool) -> Vec<Node<'g>> {
        let mut found = Vec::new();
        let flow: ControlFlow<Infallible> = self.call_tree(&mut |node| {
            if pred(node) {
                found.push(node);
            }
            ControlFlow::Continue(())
        });
        match flow {
            ControlFlow::Continue(()) => found,
            ControlFlow::Break(never) => match never {},
        }
    }

    /// First node [`Node::call_tree_nodes`] would report.
    pub fn call_tree_node(self, mut pred: impl FnMut(Node<'g>) -> bool) -> Option<Node<'g>> {
        match self.call_tree(&mut |node| {
            if pred(node) {
                ControlFlow::Break(node)
            } else {
                ControlFlow::Continue(())
            }
        }) {
            ControlFlow::Break(node) => Some(node),
            ControlFlow::Continue(()) => None,
        }
    }

    pub fn find_kind_in_call_tree(self, kind: NodeKind) -> Vec<Node<'g>> {
        self.call_tree_nodes(|n| n.is(kind))
    }

    pub fn find_name_in_call_tree(self, name: &str) -> Vec<Node<'g>> {
        self.call_tree_nodes(|n| n.name().as_deref() == Some(name))
    }

    fn call_tree<B>(
        self,
        visit: &mut dyn FnMut(Node<'g>) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        if self.package().is_none() {
            return ControlFlow::Continue(());
        }
        let mut visited = HashSet::from([self.id()]);
        expand(self, &mut visited, visit)
    }
}

fn expand<'g, B>(
    node: Node<'g>,
    visited: &mut HashSet<NodeId>,
    visit: &mut dyn FnMut(Node<'g>) -> ControlFlow<B>,
) -> ControlFlow<B> {
    for child in node.children() {
        visit(child)?;
        if let Some(callee) = child.callee() {
            if visited.insert(callee.id()) {
                visit(callee)?;
                expand(callee, visited, visit)?;
            }
        }
        expand(child, visited, visit)?;
    }
    ControlFlow::Continue(())
}
