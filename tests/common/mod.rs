//! Shared Go fixtures and a small symbol-table builder.
//!
//! Symbol tables are normally produced by an external type checker. The
//! builder here derives one from the syntax: the caller names which
//! identifier occurrences are definitions, every other identifier is a use,
//! and scopes follow Go's block structure.
#![allow(dead_code)]

use astrav::pool::parse_to_syntax_tree;
use astrav::syntax::SyntaxTree;
use astrav::{Graph, Loader, Scope, Span, Symbol, SymbolKind, SymbolTable};

pub const HAMMING: &str = r#"// Package hamming contains function to calculate amount of character difference between two equal strings.
package hamming

import "fmt"

// NotEqualLengthError is raised if strings supplied to Distance function have different length.
type NotEqualLengthError struct{}

func (error *NotEqualLengthError) Error() string {
	return "strings have different length"
}

const x = 5

// Distance calculates amount of character difference between two equal strings.
func Distance(a, b string) (int, error) {
	var lenA, lenB int
	lenA = len(a)
	lenB = len(b)
	lenC := len(a)
	_ = lenC

	const x = 3

	var (
		lenD int
		lenE = 4
	)
	_ = lenD
	_ = lenE
	_ = x

	if lenA != lenB {
		return -1, &NotEqualLengthError{}
	}

	if lenA == 0 {
		return 0, nil
	}

	var diff int

	for i := range a {
		if a[i] != b[i] {
			diff++
		}
	}

	return diff, nil

}

// Test is a test function
func Test() {
	fmt.Println(x)
}
"#;

/// Definitions of [`HAMMING`] as `(name, nth occurrence)`.
pub const HAMMING_DEFS: &[(&str, usize)] = &[
    ("hamming", 0),
    ("NotEqualLengthError", 0),
    ("error", 0),
    ("Error", 0),
    ("x", 0),
    ("Distance", 0),
    ("a", 0),
    ("b", 0),
    ("lenA", 0),
    ("lenB", 0),
    ("lenC", 0),
    ("x", 1),
    ("lenD", 0),
    ("lenE", 0),
    ("diff", 0),
    ("i", 0),
    ("Test", 0),
];

pub const DIFFSQUARES: &str = r#"// Package diffsquares provides method for square diffs.
package diffsquares

import "math"

// SquareOfSum squares number sum
func SquareOfSum(i int) int {
	sum := 0
	for sum = 0; i > 0; i-- {
		sum += i
	}
	return int(math.Pow(float64(sum), 2))
}

// SumOfSquares sums number square
func SumOfSquares(i int) int {
	if i == 1 {
		return 1
	}
	return int(math.Pow(float64(i), 2)) + SumOfSquares(i-1)
}

// Difference calculates diff of squares of sum and sum of squares
func Difference(i int) int {
	return SquareOfSum(i) - SumOfSquares(i)
}
"#;

pub const DIFFSQUARES_DEFS: &[(&str, usize)] = &[
    ("diffsquares", 0),
    ("SquareOfSum", 0),
    ("i", 0),
    ("sum", 0),
    ("SumOfSquares", 0),
    ("i", 4),
    ("Difference", 0),
    ("i", 8),
];

const IDENT_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "field_identifier",
    "package_identifier",
    "label_name",
];

const FUNC_KINDS: &[&str] = &["function_declaration", "method_declaration", "func_literal"];

const BLOCK_KINDS: &[&str] = &[
    "if_statement",
    "for_statement",
    "expression_switch_statement",
    "type_switch_statement",
    "select_statement",
    "expression_case",
    "type_case",
    "default_case",
    "communication_case",
];

pub struct Fixture {
    pub package: &'static str,
    pub text: &'static str,
    pub tree: SyntaxTree,
}

impl Fixture {
    pub fn parse(package: &'static str, text: &'static str) -> Self {
        let (tree, errors) = parse_to_syntax_tree(text).unwrap();
        assert_eq!(errors, 0, "fixture {package} has syntax errors");
        Self {
            package,
            text,
            tree,
        }
    }

    pub fn hamming() -> Self {
        Self::parse("hamming", HAMMING)
    }

    pub fn diffsquares() -> Self {
        Self::parse("diffsquares", DIFFSQUARES)
    }

    /// Identifier-like elements as `(text, span)`, in position order.
    pub fn idents(&self) -> Vec<(&'static str, Span)> {
        let mut idents: Vec<_> = self
            .tree
            .iter()
            .filter(|(_, e)| IDENT_KINDS.contains(&e.kind.as_str()))
            .map(|(_, e)| (&self.text[e.span.start..e.span.end], e.span))
            .collect();
        idents.sort_by_key(|(_, span)| span.start);
        idents
    }

    /// Position of the `nth` identifier spelled `name`.
    pub fn ident_pos(&self, name: &str, nth: usize) -> usize {
        self.idents()
            .into_iter()
            .filter(|(text, _)| *text == name)
            .nth(nth)
            .map(|(_, span)| span.start)
            .unwrap_or_else(|| panic!("no occurrence {nth} of {name}"))
    }

    /// Go-shaped scopes: the file, every function from its parameters on,
    /// control statements, case clauses and free-standing blocks.
    pub fn scopes(&self) -> Vec<Scope> {
        let whole = Span::new(0, self.text.len());
        let mut scopes = vec![Scope::new(whole, whole)];
        let parents = self.tree.parents();

        for (id, element) in self.tree.iter() {
            let kind = element.kind.as_str();
            if FUNC_KINDS.contains(&kind) {
                let params = self
                    .tree
                    .children(id)
                    .iter()
                    .filter_map(|&c| self.tree.get(c))
                    .find(|c| c.kind == "parameter_list")
                    .map_or(element.span.start, |p| p.span.start);
                scopes.push(Scope::new(
                    element.span,
                    Span::new(params, element.span.end),
                ));
            } else if BLOCK_KINDS.contains(&kind) {
                scopes.push(Scope::new(element.span, element.span));
            } else if kind == "block" {
                let in_function = parents[id.index()]
                    .and_then(|p| self.tree.get(p))
                    .is_some_and(|p| FUNC_KINDS.contains(&p.kind.as_str()));
                if !in_function {
                    scopes.push(Scope::new(element.span, element.span));
                }
            }
        }
        scopes
    }

    /// Symbol table with `defs` as definitions and every other identifier as
    /// a use. Objects named in `typed` carry that type.
    pub fn symbols(&self, defs: &[(&str, usize)], typed: &[(&str, &str)]) -> SymbolTable {
        let def_positions: Vec<usize> = defs
            .iter()
            .map(|&(name, nth)| self.ident_pos(name, nth))
            .collect();

        let mut table = SymbolTable::new();
        for scope in self.scopes() {
            table.add_scope(scope);
        }
        for (name, span) in self.idents() {
            if name == "_" {
                continue;
            }
            let mut symbol = Symbol::new(name, kind_of(name));
            if let Some((_, ty)) = typed.iter().find(|(n, _)| *n == name) {
                symbol = symbol.with_type(*ty);
            }
            if def_positions.contains(&span.start) {
                table.define(span.start, symbol);
            } else {
                table.refer(span.start, symbol);
            }
        }
        table
    }

    pub fn graph(&self, table: SymbolTable) -> Graph {
        Loader::default()
            .with_symbols(self.package, table)
            .load_sources(
                self.package,
                vec![(format!("{}.go", self.package), self.text.to_string())],
            )
            .unwrap()
    }
}

fn kind_of(name: &str) -> SymbolKind {
    match name {
        "hamming" | "diffsquares" | "fmt" | "math" => SymbolKind::Package,
        "x" => SymbolKind::Const,
        "NotEqualLengthError" | "error" | "string" | "int" | "float64" => SymbolKind::Type,
        "len" => SymbolKind::Builtin,
        n if n.starts_with(char::is_uppercase) => SymbolKind::Func,
        _ => SymbolKind::Var,
    }
}

/// The hamming package with `a` and `b` typed as strings.
pub fn hamming_graph() -> Graph {
    let fixture = Fixture::hamming();
    let table = fixture.symbols(HAMMING_DEFS, &[("a", "string"), ("b", "string")]);
    fixture.graph(table)
}

pub fn diffsquares_graph() -> Graph {
    let fixture = Fixture::diffsquares();
    let table = fixture.symbols(DIFFSQUARES_DEFS, &[]);
    fixture.graph(table)
}
