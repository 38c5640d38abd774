//! Typed access to the parts of statements, expressions and functions.
//!
//! Each accessor checks the node kind and returns `None` (or an empty list)
//! for nodes that have no such part.

use super::node::Node;
use crate::kind::NodeKind;

impl<'g> Node<'g> {
    /// Left operand of a binary expression.
    pub fn left(self) -> Option<Node<'g>> {
        self.binary_operand("left")
    }

    /// Right operand of a binary expression.
    pub fn right(self) -> Option<Node<'g>> {
        self.binary_operand("right")
    }

    fn binary_operand(self, field: &str) -> Option<Node<'g>> {
        if !self.is(NodeKind::BinaryExpr) {
            return None;
        }
        self.child_in_field(field)
    }

    /// Targets of an assignment or short variable declaration.
    pub fn lhs(self) -> Vec<Node<'g>> {
        self.assignment_side("left")
    }

    /// Assigned values of an assignment or short variable declaration.
    pub fn rhs(self) -> Vec<Node<'g>> {
        self.assignment_side("right")
    }

    fn assignment_side(self, field: &str) -> Vec<Node<'g>> {
        if !matches!(self.kind(), NodeKind::AssignStmt | NodeKind::ShortVarDecl) {
            return Vec::new();
        }
        list_items(self.child_in_field(field))
    }

    /// Init statement of a three-clause `for`.
    pub fn for_init(self) -> Option<Node<'g>> {
        self.for_clause()?.child_in_field("initializer")
    }

    /// Loop condition, with or without init and post statements.
    pub fn for_cond(self) -> Option<Node<'g>> {
        if let Some(clause) = self.for_clause() {
            return clause.child_in_field("condition");
        }
        if !self.is(NodeKind::ForStmt) {
            return None;
        }
        self.children()
            .into_iter()
            .find(|c| c.field() != Some("body") && !c.is(NodeKind::RangeClause))
    }

    /// Post statement of a three-clause `for`.
    pub fn for_post(self) -> Option<Node<'g>> {
        self.for_clause()?.child_in_field("update")
    }

    fn for_clause(self) -> Option<Node<'g>> {
        match self.kind() {
            NodeKind::ForClause => Some(self),
            NodeKind::ForStmt => self.child_by_kind(NodeKind::ForClause),
            _ => None,
        }
    }

    /// Key of a `for ... range` loop.
    pub fn range_key(self) -> Option<Node<'g>> {
        list_items(self.range_clause()?.child_in_field("left"))
            .into_iter()
            .next()
    }

    /// Value of a `for ... range` loop.
    pub fn range_value(self) -> Option<Node<'g>> {
        list_items(self.range_clause()?.child_in_field("left"))
            .into_iter()
            .nth(1)
    }

    /// Expression a `for ... range` loop ranges over.
    pub fn range_expr(self) -> Option<Node<'g>> {
        self.range_clause()?.child_in_field("right")
    }

    fn range_clause(self) -> Option<Node<'g>> {
        match self.kind() {
            NodeKind::RangeClause => Some(self),
            NodeKind::ForStmt => self.child_by_kind(NodeKind::RangeClause),
            _ => None,
        }
    }

    /// Parameter list of a function, method, function literal or function type.
    pub fn params(self) -> Option<Node<'g>> {
        self.signature_part("parameters")
    }

    /// Result of a function signature: a parameter list, or the single
    /// result type.
    pub fn results(self) -> Option<Node<'g>> {
        self.signature_part("result")
    }

    /// Receiver parameter of a method.
    pub fn receiver(self) -> Option<Node<'g>> {
        if !self.is(NodeKind::MethodDecl) {
            return None;
        }
        self.child_in_field("receiver")?.children().into_iter().next()
    }

    fn signature_part(self, field: &str) -> Option<Node<'g>> {
        use NodeKind::*;
        if !matches!(self.kind(), FuncDecl | MethodDecl | FuncLit | FuncType) {
            return None;
        }
        self.child_in_field(field)
    }

    /// Identifier a selector is qualified with, when its operand is a plain
    /// identifier (`fmt` in `fmt.Println`).
    pub fn package_name(self) -> Option<Node<'g>> {
        if !self.is(NodeKind::SelectorExpr) {
            return None;
        }
        self.child_in_field("operand")
            .filter(|operand| operand.is(NodeKind::Identifier))
    }
}

fn list_items(list: Option<Node<'_>>) -> Vec<Node<'_>> {
    match list {
        Some(list) if list.is(NodeKind::ExpressionList) => list.children(),
        Some(single) => vec![single],
        None => Vec::new(),
    }
}
