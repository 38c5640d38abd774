//! ast-grep integration for pattern-based Go code search.
//!
//! Patterns use ast-grep's metavariable syntax (`$NAME`, `$$$ARGS`, `$_`)
//! and are matched against whole compilation units; [`crate::graph::Node::find_by_pattern`]
//! maps the matches back onto graph nodes.

pub mod errors;
pub mod lang;
pub mod matcher;

pub use errors::AstGrepError;
pub use lang::{go, go_pattern, SupportLang};
pub use matcher::{PatternHit, PatternMatch, PatternMatcher};
