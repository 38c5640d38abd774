use anyhow::{Context, Result};
use astrav::config::{self, Config};
use astrav::symbols::load_package_tables;
use astrav::{Graph, Loader, Node, NodeKind, Token, Visit};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "astrav")]
#[command(about = "Navigate and query Go syntax trees", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to astrav.toml in the target directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the node tree of a file or package directory
    Tree {
        /// Go file or package directory
        path: PathBuf,

        /// Maximum depth below the root
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// Find nodes matching every given filter
    Find {
        /// Go file or package directory
        path: PathBuf,

        /// Node kind tag, e.g. `call-expression`
        #[arg(short, long)]
        kind: Option<String>,

        /// Node name, e.g. `fmt.Println`
        #[arg(short, long)]
        name: Option<String>,

        /// Operator or keyword, e.g. `:=`
        #[arg(short, long)]
        token: Option<String>,

        /// ast-grep pattern, e.g. `len($X)`
        #[arg(short, long)]
        pattern: Option<String>,
    },

    /// Find nodes reachable from a function through calls
    Calls {
        /// Package directory
        path: PathBuf,

        /// Function to start from
        #[arg(short, long)]
        function: String,

        /// Node kind tag to report
        #[arg(short, long, default_value = "return-statement")]
        kind: String,
    },

    /// List declarations of a name and where they are used
    Usages {
        /// Package directory
        path: PathBuf,

        /// Declared name
        #[arg(short, long)]
        name: String,

        /// Symbol tables file (overrides the configuration)
        #[arg(short, long)]
        symbols: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Tree { path, depth } => cmd_tree(&path, cli.config.as_deref(), depth),
        Commands::Find {
            path,
            kind,
            name,
            token,
            pattern,
        } => {
            let filter = Filter::new(kind, name, token, pattern)?;
            cmd_find(&path, cli.config.as_deref(), &filter)
        }
        Commands::Calls {
            path,
            function,
            kind,
        } => cmd_calls(&path, cli.config.as_deref(), &function, &kind),
        Commands::Usages {
            path,
            name,
            symbols,
        } => cmd_usages(&path, cli.config.as_deref(), &name, symbols),
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Load the configuration for `path`: an explicit file wins, otherwise
/// `astrav.toml` next to the sources.
fn resolve_config(path: &Path, explicit: Option<&Path>) -> Result<Config> {
    if let Some(file) = explicit {
        return config::load_from_path(file)
            .with_context(|| format!("failed to load {}", file.display()));
    }
    let dir = if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(Path::new("."))
    };
    Ok(config::discover(dir)?)
}

/// Graphs for a file (no package context) or a directory (one per package).
fn load_graphs(path: &Path, config: &Config, symbols: Option<PathBuf>) -> Result<Vec<Graph>> {
    let mut loader = Loader::new(config.load.clone());
    if let Some(file) = symbols.or_else(|| config.symbols.clone()) {
        let tables = load_package_tables(&file)
            .with_context(|| format!("failed to load symbols from {}", file.display()))?;
        debug!(file = %file.display(), packages = tables.len(), "loaded symbol tables");
        loader = loader.with_symbol_tables(tables);
    }

    if path.is_file() {
        return Ok(vec![loader.load_file(path)?]);
    }
    let graphs = loader.load_dir(path)?;
    if graphs.is_empty() {
        anyhow::bail!("No Go sources found in {}", path.display());
    }
    Ok(graphs)
}

fn location(node: Node<'_>) -> String {
    match node.graph().sources().line_col(node.start()) {
        Some((file, line, col)) => format!("{file}:{line}:{col}"),
        None => node.span().to_string(),
    }
}

fn describe(node: Node<'_>) -> String {
    let kind = node.kind().as_str().cyan();
    match node.name() {
        Some(name) => format!("{} {}", kind, name.bold()),
        None => kind.to_string(),
    }
}

fn print_node(node: Node<'_>) {
    println!("{} {}", location(node).dimmed(), describe(node));
}

fn cmd_tree(path: &Path, config: Option<&Path>, depth: Option<usize>) -> Result<()> {
    let config = resolve_config(path, config)?;
    for graph in load_graphs(path, &config, None)? {
        let root = graph.root();
        println!("{} {}", describe(root), root.span().to_string().dimmed());
        root.walk(|node| {
            let below = node.level() - root.level();
            if depth.is_some_and(|max| below > max) {
                return Visit::Skip;
            }
            if node != root {
                println!(
                    "{}{} {}",
                    "  ".repeat(below),
                    describe(node),
                    node.span().to_string().dimmed()
                );
            }
            Visit::Descend
        });
    }
    Ok(())
}

struct Filter {
    kind: Option<NodeKind>,
    name: Option<String>,
    token: Option<Token>,
    pattern: Option<String>,
}

impl Filter {
    fn new(
        kind: Option<String>,
        name: Option<String>,
        token: Option<String>,
        pattern: Option<String>,
    ) -> Result<Self> {
        if kind.is_none() && name.is_none() && token.is_none() && pattern.is_none() {
            anyhow::bail!("Give at least one of --kind, --name, --token or --pattern");
        }
        Ok(Self {
            kind: kind.map(|k| k.parse::<NodeKind>()).transpose()?,
            name,
            token: token.map(|t| t.parse::<Token>()).transpose()?,
            pattern,
        })
    }

    fn accepts(&self, node: Node<'_>) -> bool {
        self.kind.map_or(true, |k| node.is(k))
            && self
                .name
                .as_deref()
                .map_or(true, |n| node.name().as_deref() == Some(n))
            && self.token.map_or(true, |t| node.token() == Some(t))
    }
}

fn cmd_find(path: &Path, config: Option<&Path>, filter: &Filter) -> Result<()> {
    let config = resolve_config(path, config)?;
    let mut total = 0;
    for graph in load_graphs(path, &config, None)? {
        let root = graph.root();
        let found: Vec<Node<'_>> = match &filter.pattern {
            Some(pattern) => root
                .find_by_pattern(pattern)?
                .into_iter()
                .map(|hit| hit.node)
                .filter(|&n| filter.accepts(n))
                .collect(),
            None => root.tree_nodes(|n| filter.accepts(n)),
        };
        for node in &found {
            print_node(*node);
        }
        total += found.len();
    }
    println!("{}", format!("{total} match(es)").dimmed());
    Ok(())
}

fn cmd_calls(path: &Path, config: Option<&Path>, function: &str, kind: &str) -> Result<()> {
    let kind: NodeKind = kind.parse()?;
    let config = resolve_config(path, config)?;
    let graphs = load_graphs(path, &config, None)?;

    let mut seen = false;
    for graph in &graphs {
        let Some(start) = graph.declaration_by_name(function) else {
            continue;
        };
        seen = true;
        println!("{} {}", "From".bold(), describe(start));
        for node in start.find_kind_in_call_tree(kind) {
            print_node(node);
        }
    }
    if !seen {
        anyhow::bail!("Function {} not declared in {}", function, path.display());
    }
    Ok(())
}

fn cmd_usages(
    path: &Path,
    config: Option<&Path>,
    name: &str,
    symbols: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(path, config)?;
    let graphs = load_graphs(path, &config, symbols)?;

    let mut declarations = 0;
    for graph in &graphs {
        let Some(package) = graph.package() else {
            continue;
        };
        if package.symbols().is_empty() {
            warn!(package = package.name(), "no symbol table registered");
            continue;
        }
        for decl in graph.root().find_declarations() {
            if decl.source_text() != name {
                continue;
            }
            declarations += 1;
            println!("{} {}", "Declared".green().bold(), location(decl));
            for usage in decl.usages() {
                println!("  {} {}", "used".dimmed(), location(usage));
            }
        }
    }
    if declarations == 0 {
        println!("{}", format!("No declarations of {name}").yellow());
    }
    Ok(())
}
