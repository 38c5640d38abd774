//! Per-package context: the symbol table, the function index and the
//! resolution caches shared by every node of a package graph.

use crate::graph::{Graph, Node, NodeId, Visit};
use crate::kind::NodeKind;
use crate::symbols::SymbolTable;
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub struct Package {
    name: String,
    symbols: SymbolTable,
    functions: OnceCell<HashMap<String, NodeId>>,
    pub(crate) declarations: RefCell<HashMap<NodeId, Option<NodeId>>>,
    pub(crate) usages: RefCell<HashMap<NodeId, Arc<[NodeId]>>>,
}

impl Package {
    pub(crate) fn new(name: impl Into<String>, symbols: SymbolTable) -> Self {
        Self {
            name: name.into(),
            symbols,
            functions: OnceCell::new(),
            declarations: RefCell::new(HashMap::new()),
            usages: RefCell::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Whether the function name index has been built.
    pub fn is_indexed(&self) -> bool {
        self.functions.get().is_some()
    }
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("name", &self.name)
            .field("indexed", &self.is_indexed())
            .finish()
    }
}

impl Graph {
    /// Top-level function or method declared under `name`.
    ///
    /// The index is built by one scan of the package on first use. When a
    /// plain function and a method share a name the function wins; among
    /// methods the first in source order wins.
    pub fn declaration_by_name(&self, name: &str) -> Option<Node<'_>> {
        let package = self.package()?;
        let index = package.functions.get_or_init(|| self.index_functions());
        index.get(name).and_then(|&id| self.node(id))
    }

    fn index_functions(&self) -> HashMap<String, NodeId> {
        let mut index: HashMap<String, NodeId> = HashMap::new();
        self.root().walk(|node| {
            let kind = node.kind();
            if !kind.is_func_declaration() {
                return Visit::Descend;
            }
            if let Some(name) = node.name() {
                let replace = match index.get(&name) {
                    None => true,
                    Some(&existing) => {
                        kind == NodeKind::FuncDecl
                            && self.node(existing).map(|n| n.kind()) == Some(NodeKind::MethodDecl)
                    }
                };
                if replace {
                    index.insert(name, node.id());
                }
            }
            Visit::Skip
        });
        debug!(
            package = self.package().map(Package::name).unwrap_or_default(),
            functions = index.len(),
            "built function index"
        );
        index
    }
}
