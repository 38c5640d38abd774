//! Turning Go sources on disk or in memory into graphs.

use crate::config::LoadConfig;
use crate::graph::{Graph, GraphError};
use crate::pool;
use crate::source::{SourceFile, SourceMap};
use crate::symbols::SymbolTable;
use crate::syntax::SyntaxTree;
use crate::ts::TreeSitterError;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to parse {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: TreeSitterError,
    },

    #[error("{name} has no package clause")]
    MissingPackageClause { name: String },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Builds graphs from Go sources, attaching registered symbol tables to the
/// packages they belong to.
#[derive(Debug, Default)]
pub struct Loader {
    config: LoadConfig,
    symbols: HashMap<String, SymbolTable>,
}

struct ParsedUnit {
    name: String,
    text: String,
    tree: SyntaxTree,
}

impl Loader {
    pub fn new(config: LoadConfig) -> Self {
        Self {
            config,
            symbols: HashMap::new(),
        }
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Use `table` for the package called `package`.
    pub fn with_symbols(mut self, package: impl Into<String>, table: SymbolTable) -> Self {
        self.symbols.insert(package.into(), table);
        self
    }

    pub fn with_symbol_tables(
        mut self,
        tables: impl IntoIterator<Item = (String, SymbolTable)>,
    ) -> Self {
        self.symbols.extend(tables);
        self
    }

    /// Graph over one in-memory file, without package context.
    pub fn load_source(&self, name: &str, text: &str) -> Result<Graph, LoadError> {
        let unit = parse_unit(name.to_string(), text.to_string())?;
        Ok(Graph::from_file(
            SourceFile::new(unit.name, unit.text),
            unit.tree,
        )?)
    }

    /// Graph over one file on disk, without package context.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Graph, LoadError> {
        let path = path.as_ref();
        let text = read(path)?;
        self.load_source(&path.display().to_string(), &text)
    }

    /// Package graph over in-memory `(name, text)` files, in the given order.
    pub fn load_sources(
        &self,
        package: &str,
        files: Vec<(String, String)>,
    ) -> Result<Graph, LoadError> {
        let units = files
            .into_iter()
            .map(|(name, text)| parse_unit(name, text))
            .collect::<Result<Vec<_>, _>>()?;
        self.build_package(package, units)
    }

    /// One package graph per package clause found in `dir`, sorted by
    /// package name. Files are ordered by path inside each package.
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<Graph>, LoadError> {
        let mut packages: BTreeMap<String, Vec<ParsedUnit>> = BTreeMap::new();
        for path in self.discover_files(dir)? {
            let text = read(&path)?;
            let unit = parse_unit(path.display().to_string(), text)?;
            let package = package_name(&unit.tree, &unit.text)
                .ok_or_else(|| LoadError::MissingPackageClause {
                    name: unit.name.clone(),
                })?
                .to_string();
            packages.entry(package).or_default().push(unit);
        }

        packages
            .into_iter()
            .map(|(package, units)| self.build_package(&package, units))
            .collect()
    }

    /// Source files under `dir` accepted by the load configuration.
    pub fn discover_files(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, LoadError> {
        let dir = dir.as_ref();
        let depth = if self.config.recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).max_depth(depth).sort_by_file_name() {
            let entry = entry.map_err(|source| LoadError::Walk {
                path: dir.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let accepted = entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.config.accepts(name));
            if accepted {
                files.push(entry.into_path());
            }
        }
        debug!(dir = %dir.display(), files = files.len(), "discovered sources");
        Ok(files)
    }

    fn build_package(&self, package: &str, units: Vec<ParsedUnit>) -> Result<Graph, LoadError> {
        let mut sources = SourceMap::new();
        let mut trees = Vec::with_capacity(units.len());
        for unit in units {
            sources.add(unit.name, unit.text);
            trees.push(unit.tree);
        }
        let symbols = self.symbols.get(package).cloned().unwrap_or_default();
        if symbols.is_empty() {
            debug!(package, "no symbol table registered");
        }
        info!(package, units = sources.len(), "loaded package");
        Ok(Graph::from_package(package, sources, trees, symbols)?)
    }
}

fn parse_unit(name: String, text: String) -> Result<ParsedUnit, LoadError> {
    let (tree, errors) = pool::parse_to_syntax_tree(&text).map_err(|source| LoadError::Parse {
        name: name.clone(),
        source,
    })?;
    if errors > 0 {
        warn!(unit = %name, errors, "source has syntax errors");
    }
    Ok(ParsedUnit { name, text, tree })
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Name declared by the package clause of a snapshot.
pub fn package_name<'t>(tree: &SyntaxTree, text: &'t str) -> Option<&'t str> {
    let root = tree.root()?;
    let clause = tree
        .children(root)
        .iter()
        .find(|&&id| tree.get(id).is_some_and(|e| e.kind == "package_clause"))?;
    let ident = tree
        .children(*clause)
        .iter()
        .filter_map(|&id| tree.get(id))
        .find(|e| e.kind == "package_identifier")?;
    text.get(ident.span.start..ident.span.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::NodeKind;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, text: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, text).unwrap();
    }

    #[test]
    fn package_name_from_snapshot() {
        let text = "// doc\npackage hamming\n";
        let (tree, _) = pool::parse_to_syntax_tree(text).unwrap();
        assert_eq!(package_name(&tree, text), Some("hamming"));
    }

    #[test]
    fn load_dir_groups_by_package_and_skips_tests() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.go", "package alpha\n\nfunc A() {}\n");
        write(dir.path(), "b.go", "package alpha\n\nfunc B() {}\n");
        write(dir.path(), "c.go", "package gamma\n\nfunc C() {}\n");
        write(dir.path(), "a_test.go", "package alpha\n\nfunc TestA() {}\n");
        write(dir.path(), "notes.txt", "not go");
        write(dir.path(), "sub/d.go", "package delta\n");

        let graphs = Loader::default().load_dir(dir.path()).unwrap();
        let names: Vec<_> = graphs
            .iter()
            .map(|g| g.package().unwrap().name().to_string())
            .collect();
        assert_eq!(names, ["alpha", "gamma"]);

        let alpha = &graphs[0];
        assert_eq!(alpha.sources().len(), 2);
        assert!(alpha.declaration_by_name("A").is_some());
        assert!(alpha.declaration_by_name("B").is_some());
        assert!(alpha.declaration_by_name("TestA").is_none());
    }

    #[test]
    fn recursive_and_test_files_follow_config() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.go", "package alpha\n");
        write(dir.path(), "a_test.go", "package alpha\n");
        write(dir.path(), "sub/d.go", "package delta\n");

        let loader = Loader::new(LoadConfig {
            include_tests: true,
            recursive: true,
            ..LoadConfig::default()
        });
        let graphs = loader.load_dir(dir.path()).unwrap();
        assert_eq!(graphs.len(), 2);
        assert_eq!(graphs[0].sources().len(), 2);
    }

    #[test]
    fn registered_symbols_reach_their_package() {
        let mut table = SymbolTable::new();
        table.define(
            8,
            crate::symbols::Symbol::new("alpha", crate::symbols::SymbolKind::Package),
        );
        let graph = Loader::default()
            .with_symbols("alpha", table)
            .load_sources("alpha", vec![("a.go".into(), "package alpha\n".into())])
            .unwrap();

        let ident = graph
            .root()
            .find_first_by_kind(NodeKind::PackageIdentifier)
            .unwrap();
        assert_eq!(ident.symbol().map(|s| s.name.as_str()), Some("alpha"));
    }

    #[test]
    fn load_file_builds_standalone_graph() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.go", "package alpha\n\nfunc A() {}\n");

        let graph = Loader::default().load_file(dir.path().join("a.go")).unwrap();
        assert!(graph.package().is_none());
        assert_eq!(graph.root().kind(), NodeKind::SourceFile);
        assert_eq!(graph.root().name().as_deref(), Some("alpha"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Loader::default().load_file("/no/such/file.go").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn file_without_package_clause_is_rejected() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "broken.go", "func A() {}\n");
        let err = Loader::default().load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingPackageClause { .. }));
    }
}
