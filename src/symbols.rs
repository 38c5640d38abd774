//! Externally supplied semantic information for one package.
//!
//! The tables are keyed by global positions (see [`crate::source::SourceMap`]):
//! `defs` and `uses` map the start position of an identifier to the object it
//! declares or refers to, `scopes` lists every lexical scope with the span of
//! the syntax node that owns it, and `types` records expression types by span.

use crate::source::Span;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SymbolsError {
    #[error("failed to read symbol table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid symbol table JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    Package,
    Const,
    Type,
    Var,
    Func,
    Label,
    Builtin,
    Nil,
}

/// The object an identifier declares or refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ty: None,
        }
    }

    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }
}

pub type ScopeId = usize;

/// A lexical scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// Span of the syntax node that introduces the scope.
    pub owner: Span,
    /// Positions covered by the scope.
    pub range: Span,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ScopeId>,
}

impl Scope {
    pub fn new(owner: Span, range: Span) -> Self {
        Self {
            owner,
            range,
            names: Vec::new(),
            parent: None,
        }
    }

    /// `range.start <= pos < range.end`
    pub fn contains(&self, pos: usize) -> bool {
        self.range.start <= pos && pos < self.range.end
    }

    pub fn declares(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Type of the expression covering `span`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedExpr {
    pub span: Span,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    #[serde(default)]
    defs: BTreeMap<usize, Symbol>,
    #[serde(default)]
    uses: BTreeMap<usize, Symbol>,
    #[serde(default)]
    scopes: Vec<Scope>,
    #[serde(default)]
    types: Vec<TypedExpr>,
    #[serde(skip)]
    type_index: OnceCell<HashMap<Span, usize>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the identifier starting at `pos` declares `symbol`.
    pub fn define(&mut self, pos: usize, symbol: Symbol) -> &mut Self {
        self.defs.insert(pos, symbol);
        self
    }

    /// Record that the identifier starting at `pos` refers to `symbol`.
    pub fn refer(&mut self, pos: usize, symbol: Symbol) -> &mut Self {
        self.uses.insert(pos, symbol);
        self
    }

    pub fn add_scope(&mut self, scope: Scope) -> ScopeId {
        self.scopes.push(scope);
        self.scopes.len() - 1
    }

    pub fn record_type(&mut self, span: Span, ty: impl Into<String>) -> &mut Self {
        self.types.push(TypedExpr {
            span,
            ty: ty.into(),
        });
        self.type_index.take();
        self
    }

    pub fn defs(&self) -> impl Iterator<Item = (usize, &Symbol)> {
        self.defs.iter().map(|(pos, sym)| (*pos, sym))
    }

    pub fn uses(&self) -> impl Iterator<Item = (usize, &Symbol)> {
        self.uses.iter().map(|(pos, sym)| (*pos, sym))
    }

    pub fn def_at(&self, pos: usize) -> Option<&Symbol> {
        self.defs.get(&pos)
    }

    pub fn use_at(&self, pos: usize) -> Option<&Symbol> {
        self.uses.get(&pos)
    }

    /// Declared or referenced object of the identifier at `pos`.
    pub fn object_at(&self, pos: usize) -> Option<&Symbol> {
        self.def_at(pos).or_else(|| self.use_at(pos))
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id)
    }

    /// Innermost scope containing `pos`: the containing scope with the
    /// greatest start. Earlier scopes win ties.
    pub fn innermost_scope(&self, pos: usize) -> Option<&Scope> {
        self.scopes
            .iter()
            .filter(|s| s.contains(pos))
            .fold(None, |best: Option<&Scope>, s| match best {
                Some(b) if b.range.start >= s.range.start => Some(b),
                _ => Some(s),
            })
    }

    pub fn type_of(&self, span: Span) -> Option<&str> {
        let index = self.type_index.get_or_init(|| {
            let mut index = HashMap::with_capacity(self.types.len());
            for (i, t) in self.types.iter().enumerate() {
                index.entry(t.span).or_insert(i);
            }
            index
        });
        index.get(&span).map(|&i| self.types[i].ty.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty() && self.uses.is_empty() && self.scopes.is_empty()
    }

    pub fn from_json_str(json: &str) -> Result<Self, SymbolsError> {
        serde_json::from_str(json).map_err(|source| SymbolsError::Json { source })
    }

    pub fn to_json_string(&self) -> Result<String, SymbolsError> {
        serde_json::to_string_pretty(self).map_err(|source| SymbolsError::Json { source })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SymbolsError> {
        let contents = read(path.as_ref())?;
        Self::from_json_str(&contents)
    }
}

/// Load a `{ "<package name>": <table>, ... }` file.
pub fn load_package_tables(
    path: impl AsRef<Path>,
) -> Result<BTreeMap<String, SymbolTable>, SymbolsError> {
    let contents = read(path.as_ref())?;
    serde_json::from_str(&contents).map_err(|source| SymbolsError::Json { source })
}

fn read(path: &Path) -> Result<String, SymbolsError> {
    fs::read_to_string(path).map_err(|source| SymbolsError::Io {
        path: path.to_path_buf(),
        source,
    })
}
