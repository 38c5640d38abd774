//! Scope lookups and position queries over the package symbol table.

use crate::graph::{Node, Visit};
use crate::symbols::Scope;

/// Largest distance between a position and the start of the node reported
/// for it by [`Node::find_by_position`].
pub const POSITION_WINDOW: usize = 50;

impl<'g> Node<'g> {
    /// Innermost scope containing the start of this node.
    pub fn scope(self) -> Option<&'g Scope> {
        self.package()?.symbols().innermost_scope(self.start())
    }

    /// Innermost scope containing this node, with the node owning it.
    ///
    /// When several nodes share the owner's span the outermost one is
    /// returned.
    pub fn enclosing_scope(self) -> Option<(Node<'g>, &'g Scope)> {
        let scope = self.scope()?;
        let graph = self.graph();
        let owner = graph
            .nodes_with_span(scope.owner)
            .first()
            .and_then(|&id| graph.node(id))?;
        Some((owner, scope))
    }

    /// Node of this subtree (this node included) closest to `pos`.
    ///
    /// `pos` must lie in the scope of this node. A node starting exactly at
    /// `pos` wins; otherwise the node whose start precedes `pos` by the
    /// smallest distance below [`POSITION_WINDOW`]. Ties go to the first node
    /// in pre-order.
    pub fn find_by_position(self, pos: usize) -> Option<Node<'g>> {
        if !self.scope()?.contains(pos) {
            return None;
        }

        let mut exact = None;
        let mut nearest: Option<(usize, Node<'g>)> = None;
        self.walk(|node| {
            if exact.is_some() {
                return Visit::Skip;
            }
            let start = node.start();
            if start == pos {
                exact = Some(node);
                return Visit::Skip;
            }
            if let Some(diff) = pos.checked_sub(start) {
                let closer = nearest.map_or(true, |(best, _)| diff < best);
                if diff < POSITION_WINDOW && closer {
                    nearest = Some((diff, node));
                }
            }
            Visit::Descend
        });
        exact.or(nearest.map(|(_, node)| node))
    }
}
