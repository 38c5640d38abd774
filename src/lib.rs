//! astrav: navigation, queries and symbol resolution over Go syntax trees
//!
//! Go sources are parsed with tree-sitter into owned [`SyntaxTree`]
//! snapshots. A [`Graph`] wraps one file or a whole package and hands out
//! cheap [`Node`] handles; children are materialized lazily and keep their
//! identity across traversals.
//!
//! # Architecture
//!
//! Structural queries ([`Node::find_by_kind`], [`Node::find_by_name`],
//! [`Node::find_by_pattern`], ...) only need the syntax. Scope lookups,
//! declaration/usage resolution and call trees additionally read the
//! package [`SymbolTable`], an externally produced record of definitions,
//! uses, scopes and expression types keyed by package-wide byte positions.
//!
//! # Example
//!
//! ```no_run
//! use astrav::{Loader, NodeKind};
//!
//! let graphs = Loader::default().load_dir("./hamming")?;
//! for graph in &graphs {
//!     if let Some(distance) = graph.declaration_by_name("Distance") {
//!         for ret in distance.find_kind_in_call_tree(NodeKind::ReturnStmt) {
//!             println!("{}", ret.source_text());
//!         }
//!     }
//! }
//! # Ok::<(), astrav::LoadError>(())
//! ```

pub mod cache;
pub mod calltree;
pub mod config;
pub mod graph;
pub mod kind;
pub mod loader;
pub mod package;
pub mod pool;
pub mod query;
pub mod resolve;
pub mod scope;
pub mod sg;
pub mod source;
pub mod symbols;
pub mod syntax;
pub mod token;
pub mod ts;

// Re-exports
pub use config::{Config, ConfigError, LoadConfig};
pub use graph::{Graph, GraphError, Node, NodeId, TreeDefect, Visit};
pub use kind::NodeKind;
pub use loader::{LoadError, Loader};
pub use package::Package;
pub use scope::POSITION_WINDOW;
pub use sg::{AstGrepError, PatternHit};
pub use source::{SourceFile, SourceMap, Span};
pub use symbols::{Scope, Symbol, SymbolKind, SymbolTable, SymbolsError};
pub use syntax::{Element, ElementId, SyntaxTree};
pub use token::Token;
pub use ts::{GoParser, TreeSitterError};
