//! Go language support via ast-grep-language.

use ast_grep_core::{AstGrep, Language, Pattern, PatternError};
pub use ast_grep_language::SupportLang;

/// Get the Go language for ast-grep operations.
pub fn go() -> SupportLang {
    SupportLang::Go
}

/// Compile a Go pattern.
///
/// A Go file only holds declarations at its top level, so expressions and
/// statements such as `fmt.Println($A)` are parsed inside a function body and
/// the pattern is built from the single statement (or expression) found there.
/// Anything that does not parse cleanly in a body is compiled as written.
pub fn go_pattern(src: &str) -> Result<Pattern, PatternError> {
    match body_pattern(src) {
        Some(pattern) => Ok(pattern),
        None => Pattern::try_new(src, go()),
    }
}

fn body_pattern(src: &str) -> Option<Pattern> {
    let processed = go().pre_process_pattern(src);
    let context = format!("package p\n\nfunc _() {{\n{processed}\n}}\n");
    let sg = AstGrep::new(context, go());
    let root = sg.root();
    if root.dfs().any(|n| n.is_error() || n.is_missing()) {
        return None;
    }

    let func = root
        .children()
        .find(|n| n.kind() == "function_declaration")?;
    let mut node = func.field("body")?;
    while matches!(
        &*node.kind(),
        "block" | "statement_list" | "expression_statement"
    ) {
        let mut named: Vec<_> = node.children().filter(|c| c.is_named()).collect();
        if named.len() != 1 {
            return None;
        }
        node = named.pop()?;
    }
    Some(Pattern::from(node))
}
