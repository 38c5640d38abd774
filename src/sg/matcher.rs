use crate::cache;
use crate::graph::{Graph, Node};
use crate::kind::NodeKind;
use crate::sg::errors::AstGrepError;
use crate::sg::lang::go;
use crate::source::Span;
use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_core::{AstGrep, NodeMatch};
use ast_grep_language::SupportLang;
use std::collections::HashMap;

/// A match from an ast-grep pattern with captured metavariables.
#[derive(Debug, Clone)]
pub struct PatternMatch {
    /// Byte range of the entire match
    pub byte_start: usize,
    pub byte_end: usize,
    /// Grammar kind of the matched node
    pub kind: String,
    pub text: String,
    /// Captured metavariables: name -> text
    pub captures: HashMap<String, String>,
}

/// Pattern matcher over one Go compilation unit.
///
/// # Metavariable Syntax
///
/// - `$NAME` - Matches a single node and captures it
/// - `$$$NAME` - Matches zero or more nodes (variadic)
/// - `$_` - Matches any single node (anonymous)
///
/// # Example Patterns
///
/// ```text
/// fmt.Println($$$ARGS)          // Match Println calls
/// $X := len($Y)                 // Match length bindings
/// for $I := range $S { $$$ }    // Match range loops
/// ```
pub struct PatternMatcher {
    source: String,
    sg: AstGrep<StrDoc<SupportLang>>,
}

impl PatternMatcher {
    pub fn new(source: &str) -> Self {
        let sg = AstGrep::new(source, go());
        Self {
            source: source.to_string(),
            sg,
        }
    }

    /// Find all matches for a pattern, in source order.
    pub fn find_all(&self, pattern: &str) -> Result<Vec<PatternMatch>, AstGrepError> {
        let pat = cache::compiled_pattern(pattern)?;
        let root = self.sg.root();
        let results = root
            .find_all(&pat)
            .map(|m| self.node_match_to_pattern_match(m))
            .collect();
        Ok(results)
    }

    /// Find matches lying inside `start..end`.
    pub fn find_in_range(
        &self,
        pattern: &str,
        start: usize,
        end: usize,
    ) -> Result<Vec<PatternMatch>, AstGrepError> {
        let matches = self.find_all(pattern)?;
        Ok(matches
            .into_iter()
            .filter(|m| m.byte_start >= start && m.byte_end <= end)
            .collect())
    }

    pub fn has_match(&self, pattern: &str) -> Result<bool, AstGrepError> {
        let pat = cache::compiled_pattern(pattern)?;
        Ok(self.sg.root().find(&pat).is_some())
    }

    fn node_match_to_pattern_match(&self, m: NodeMatch<StrDoc<SupportLang>>) -> PatternMatch {
        let node = m.get_node();
        let range = node.range();
        let byte_start = range.start;
        let byte_end = range.end;
        let text = self.source[byte_start..byte_end].to_string();
        let kind = node.kind().to_string();

        let env = m.get_env().clone();
        let captures: HashMap<String, String> = env.into();

        PatternMatch {
            byte_start,
            byte_end,
            kind,
            text,
            captures,
        }
    }
}

/// A pattern match mapped onto the graph.
#[derive(Debug, Clone)]
pub struct PatternHit<'g> {
    pub node: Node<'g>,
    pub captures: HashMap<String, String>,
}

impl<'g> Node<'g> {
    /// Descendants matching an ast-grep pattern, in source order.
    ///
    /// Each match is mapped to the graph node with the same span and grammar
    /// kind; matches without such a node are dropped.
    pub fn find_by_pattern(self, pattern: &str) -> Result<Vec<PatternHit<'g>>, AstGrepError> {
        let graph = self.graph();
        let units: Vec<Node<'g>> = if self.is(NodeKind::Package) {
            self.children()
        } else {
            vec![self]
        };

        let mut hits = Vec::new();
        for unit_node in units {
            let Some(file) = unit_node.unit() else {
                continue;
            };
            let Some(local) = unit_node.span().local_to(file.base()) else {
                continue;
            };
            let matcher = PatternMatcher::new(file.text());
            for m in matcher.find_in_range(pattern, local.start, local.end)? {
                let span = Span::new(m.byte_start, m.byte_end).offset(file.base());
                let Some(node) = node_for_match(graph, span, &m.kind) else {
                    continue;
                };
                if node != self && self.contains(node) {
                    hits.push(PatternHit {
                        node,
                        captures: m.captures,
                    });
                }
            }
        }
        Ok(hits)
    }
}

fn node_for_match<'g>(graph: &'g Graph, span: Span, kind: &str) -> Option<Node<'g>> {
    let candidates = graph.nodes_with_span(span);
    candidates
        .iter()
        .copied()
        .find(|&id| graph.node(id).and_then(|n| n.grammar_kind()) == Some(kind))
        .or_else(|| candidates.first().copied())
        .and_then(|id| graph.node(id))
}
