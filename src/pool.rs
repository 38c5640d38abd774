//! Thread-local parser pooling.
//!
//! Loading a package parses every file in it; the pool keeps one Go parser
//! per thread and hands it out for each file instead of building a new one.

use crate::syntax::SyntaxTree;
use crate::ts::{GoParser, TreeSitterError};
use std::cell::RefCell;

thread_local! {
    static GO_PARSER: RefCell<Option<GoParser>> = const { RefCell::new(None) };
}

/// Execute function with pooled parser instance.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use astrav::pool::with_parser;
///
/// let has_errors = with_parser(|parser| {
///     parser.parse_with_source("package main").map(|p| p.has_errors())
/// })??;
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(f: F) -> Result<R, TreeSitterError>
where
    F: FnOnce(&mut GoParser) -> R,
{
    GO_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let parser = match slot.take() {
            Some(parser) => parser,
            None => GoParser::new()?,
        };
        Ok(f(slot.insert(parser)))
    })
}

/// Parse `source` with the pooled parser and snapshot it.
///
/// Returns the snapshot together with the number of ERROR/MISSING nodes, so
/// callers can decide whether a partially broken file is acceptable.
pub fn parse_to_syntax_tree(source: &str) -> Result<(SyntaxTree, usize), TreeSitterError> {
    with_parser(|parser| {
        let parsed = parser.parse_with_source(source)?;
        let errors = if parsed.has_errors() {
            parsed.error_nodes().len()
        } else {
            0
        };
        Ok((parsed.to_syntax_tree(), errors))
    })?
}
