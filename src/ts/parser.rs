use crate::source::Span;
use crate::syntax::{Element, ElementId, SyntaxTree};
use crate::ts::errors::TreeSitterError;
use ast_grep_language::{LanguageExt, SupportLang};
use tree_sitter::{Parser, Tree};

/// Tree-sitter parser wrapper for Go source code.
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Result<Self, TreeSitterError> {
        let mut parser = Parser::new();
        let ts_lang = SupportLang::Go.get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| TreeSitterError::LanguageSet)?;

        Ok(Self { parser })
    }

    /// Parse source code into a tree-sitter Tree.
    pub fn parse(&mut self, source: &str) -> Result<Tree, TreeSitterError> {
        self.parser
            .parse(source, None)
            .ok_or(TreeSitterError::ParseFailed)
    }

    /// Parse source code and return the tree along with the source.
    pub fn parse_with_source<'a>(
        &mut self,
        source: &'a str,
    ) -> Result<ParsedSource<'a>, TreeSitterError> {
        let tree = self.parse(source)?;
        Ok(ParsedSource { source, tree })
    }
}

/// A parsed source file with its tree-sitter tree.
pub struct ParsedSource<'a> {
    pub source: &'a str,
    pub tree: Tree,
}

impl<'a> ParsedSource<'a> {
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Check if the tree contains any ERROR or MISSING nodes.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    pub fn error_nodes(&self) -> Vec<ErrorNode> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &mut errors);
        errors
    }

    /// Fail with the first syntax error, if any.
    pub fn check(&self) -> Result<(), TreeSitterError> {
        match self.error_nodes().first() {
            Some(e) => Err(TreeSitterError::SyntaxError {
                byte_start: e.byte_start,
                byte_end: e.byte_end,
            }),
            None => Ok(()),
        }
    }

    pub fn node_text(&self, node: tree_sitter::Node<'_>) -> &'a str {
        &self.source[node.byte_range()]
    }

    /// Name from the `package` clause, if the file has one.
    pub fn package_name(&self) -> Option<&'a str> {
        let root = self.tree.root_node();
        let mut cursor = root.walk();
        let clause = root
            .named_children(&mut cursor)
            .find(|n| n.kind() == "package_clause")?;
        let mut cursor = clause.walk();
        let ident = clause
            .named_children(&mut cursor)
            .find(|n| n.kind() == "package_identifier")?;
        Some(self.node_text(ident))
    }

    /// Snapshot the named nodes of the tree.
    ///
    /// Anonymous tokens are dropped except for the operator a node carries,
    /// which is kept on [`Element::operator`]. MISSING nodes are skipped.
    pub fn to_syntax_tree(&self) -> SyntaxTree {
        let root = self.tree.root_node();
        let mut tree = SyntaxTree::with_root(element_for(root, None));
        if let Some(root_id) = tree.root() {
            convert_children(root, root_id, &mut tree);
        }
        tree
    }
}

/// Information about an ERROR node in the parse tree.
#[derive(Debug, Clone)]
pub struct ErrorNode {
    pub byte_start: usize,
    pub byte_end: usize,
    pub start_point: tree_sitter::Point,
    pub end_point: tree_sitter::Point,
}

fn collect_error_nodes(node: tree_sitter::Node<'_>, errors: &mut Vec<ErrorNode>) {
    if node.is_error() || node.is_missing() {
        errors.push(ErrorNode {
            byte_start: node.start_byte(),
            byte_end: node.end_byte(),
            start_point: node.start_position(),
            end_point: node.end_position(),
        });
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, errors);
    }
}

fn convert_children(node: tree_sitter::Node<'_>, parent: ElementId, tree: &mut SyntaxTree) {
    let mut cursor = node.walk();
    if !cursor.goto_first_child() {
        return;
    }
    loop {
        let child = cursor.node();
        if child.is_named() && !child.is_missing() {
            let id = tree.push_child(parent, element_for(child, cursor.field_name()));
            convert_children(child, id, tree);
        }
        if !cursor.goto_next_sibling() {
            break;
        }
    }
}

fn element_for(node: tree_sitter::Node<'_>, field: Option<&str>) -> Element {
    let mut element = Element::new(node.kind(), Span::from(node.byte_range()));
    if let Some(field) = field {
        element = element.with_field(field);
    }
    if let Some(op) = operator_of(node) {
        element = element.with_operator(op);
    }
    element
}

fn operator_of(node: tree_sitter::Node<'_>) -> Option<&'static str> {
    if let Some(op) = node.child_by_field_name("operator") {
        return Some(op.kind());
    }
    if node.kind() == "range_clause" {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .find(|c| !c.is_named() && matches!(c.kind(), ":=" | "="))
            .map(|c| c.kind());
        return found;
    }
    None
}
