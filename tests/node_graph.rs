//! Navigation invariants of package graphs.

mod common;

use astrav::{Loader, NodeKind, Visit};
use common::{hamming_graph, DIFFSQUARES, HAMMING};

fn two_units() -> astrav::Graph {
    Loader::default()
        .load_sources(
            "shapes",
            vec![
                (
                    "square.go".to_string(),
                    "package shapes\n\nfunc Square(n int) int { return n * n }\n".to_string(),
                ),
                (
                    "cube.go".to_string(),
                    "package shapes\n\nfunc Cube(n int) int { return n * Square(n) }\n"
                        .to_string(),
                ),
            ],
        )
        .unwrap()
}

#[test]
fn package_root_holds_one_file_per_unit() {
    let graph = two_units();
    let root = graph.root();

    assert_eq!(root.kind(), NodeKind::Package);
    assert!(root.is_root());
    assert!(root.field().is_none());
    assert!(root.grammar_kind().is_none());

    let files = root.children();
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.is(NodeKind::SourceFile)));
    assert_eq!(files[0].unit().unwrap().name(), "square.go");
    assert_eq!(files[1].unit().unwrap().name(), "cube.go");
    assert!(files[0].end() < files[1].start());
}

#[test]
fn functions_are_indexed_across_units() {
    let graph = two_units();
    let package = graph.package().unwrap();
    assert!(!package.is_indexed());

    let cube = graph.declaration_by_name("Cube").unwrap();
    assert!(package.is_indexed());
    let call = cube.find_first_by_name("Square").unwrap();
    assert_eq!(call.kind(), NodeKind::CallExpr);
    assert_eq!(call.callee(), graph.declaration_by_name("Square"));
    assert_eq!(call.callee().unwrap().unit().unwrap().name(), "square.go");
}

#[test]
fn levels_and_parents_agree() {
    let graph = hamming_graph();
    let root = graph.root();
    assert_eq!(root.level(), 0);

    root.walk(|node| {
        if let Some(parent) = node.parent() {
            assert_eq!(node.level(), parent.level() + 1);
            assert!(parent.children().contains(&node));
            assert!(parent.contains(node));
            assert!(!node.contains(parent));
        }
        assert!(!node.contains(node));
        Visit::Descend
    });
}

#[test]
fn ancestors_end_at_root() {
    let graph = hamming_graph();
    let diff = graph.root().find_first_ident_by_name("diff").unwrap();

    let ancestors = diff.ancestors();
    assert_eq!(ancestors.last().copied(), Some(graph.root()));
    assert!(ancestors.iter().all(|a| a.contains(diff)));
    assert!(diff.is_within_kind(NodeKind::FuncDecl));
    assert_eq!(
        diff.next_ancestor_of_kind(NodeKind::FuncDecl)
            .and_then(|f| f.name()),
        Some("Distance".to_string())
    );
    assert!(!diff.is_within_kind(NodeKind::MethodDecl));
}

#[test]
fn siblings_exclude_self() {
    let graph = hamming_graph();
    let file = graph.root().children()[0];
    let clause = file.child_by_kind(NodeKind::PackageClause).unwrap();

    let siblings = clause.siblings();
    assert_eq!(siblings.len(), file.child_count() - 1);
    assert!(!siblings.contains(&clause));
    assert!(graph.root().siblings().is_empty());
}

#[test]
fn children_keep_identity() {
    let graph = hamming_graph();
    let first = graph.root().find_by_kind(NodeKind::Identifier);
    let count = graph.node_count();
    let second = graph.root().find_by_kind(NodeKind::Identifier);

    assert_eq!(first, second);
    assert_eq!(graph.node_count(), count);
    assert_eq!(graph.materialize_all(), graph.node_count());
}

#[test]
fn source_text_round_trips() {
    let graph = Loader::default()
        .load_sources(
            "mixed",
            vec![
                ("hamming.go".to_string(), HAMMING.to_string()),
                ("diffsquares.go".to_string(), DIFFSQUARES.to_string()),
            ],
        )
        .unwrap();
    let root = graph.root();

    assert_eq!(root.source_text(), format!("{HAMMING}\n{DIFFSQUARES}"));
    let files = root.children();
    assert_eq!(files[0].source_text(), HAMMING);
    assert_eq!(files[1].source_text(), DIFFSQUARES);

    let difference = graph.declaration_by_name("Difference").unwrap();
    assert!(difference.source_text().starts_with("func Difference(i int) int {"));
    assert!(DIFFSQUARES.contains(difference.source_text().as_ref()));
}

#[test]
fn display_names_kind_and_name() {
    let graph = hamming_graph();
    let distance = graph.declaration_by_name("Distance").unwrap();
    assert_eq!(distance.to_string(), "function-declaration Distance");
}
