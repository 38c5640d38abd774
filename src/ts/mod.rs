//! Tree-sitter frontend for Go sources.
//!
//! Parses Go text with the grammar bundled in ast-grep-language and converts
//! the concrete syntax tree into the owned [`crate::syntax::SyntaxTree`]
//! snapshot the node graph is built from.

pub mod errors;
pub mod parser;

pub use errors::TreeSitterError;
pub use parser::{ErrorNode, GoParser, ParsedSource};
