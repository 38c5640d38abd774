//! Declaration and usage resolution driven by the package symbol table.
//!
//! Both directions are memoized per package and keyed by node identity, so
//! asking twice returns the same nodes without rescanning the tables.

use crate::graph::Node;
use crate::kind::NodeKind;
use crate::package::Package;
use crate::symbols::Scope;
use std::sync::Arc;

const BLANK: &str = "_";

impl<'g> Node<'g> {
    /// Identifiers in this subtree that declare something, in position
    /// order. Blank identifiers are skipped.
    pub fn find_declarations(self) -> Vec<Node<'g>> {
        let Some(package) = self.package() else {
            return Vec::new();
        };
        let graph = self.graph();
        let span = self.span();
        package
            .symbols()
            .defs()
            .filter(|(pos, symbol)| symbol.name != BLANK && span.start <= *pos && *pos < span.end)
            .filter_map(|(pos, _)| graph.ident_at(pos).and_then(|id| graph.node(id)))
            .filter(|ident| self.contains(*ident))
            .collect()
    }

    /// Declarations whose declaring construct is of `kind`.
    pub fn find_declarations_by_kind(self, kind: NodeKind) -> Vec<Node<'g>> {
        self.find_declarations()
            .into_iter()
            .filter(|ident| ident.declaration_site().is_some_and(|site| site.is(kind)))
            .collect()
    }

    /// Variable and constant declarations: `x := ...`, `var x ...`,
    /// `const x = ...`.
    pub fn find_var_declarations(self) -> Vec<Node<'g>> {
        self.find_declarations()
            .into_iter()
            .filter(|ident| {
                ident.declaration_site().is_some_and(|site| {
                    matches!(
                        site.kind(),
                        NodeKind::ShortVarDecl | NodeKind::VarSpec | NodeKind::ConstSpec
                    )
                })
            })
            .collect()
    }

    /// Construct an identifier is declared by: its parent, looking through
    /// expression lists.
    pub fn declaration_site(self) -> Option<Node<'g>> {
        std::iter::successors(self.parent(), |n| n.parent())
            .find(|n| !n.is(NodeKind::ExpressionList))
    }

    /// Declaration this identifier refers to.
    ///
    /// A name declared exactly once resolves to that declaration. Otherwise
    /// the candidate whose scope contains this identifier and starts last
    /// wins. No candidate in scope means `None`.
    pub fn declaration(self) -> Option<Node<'g>> {
        if !self.kind().is_identifier() {
            return None;
        }
        let package = self.package()?;
        let cached = package.declarations.borrow().get(&self.id()).copied();
        if let Some(cached) = cached {
            return cached.and_then(|id| self.graph().node(id));
        }

        let resolved = self.resolve_declaration(package);
        package
            .declarations
            .borrow_mut()
            .insert(self.id(), resolved.map(Node::id));
        resolved
    }

    fn resolve_declaration(self, package: &'g Package) -> Option<Node<'g>> {
        let text = self.source_text();
        let name: &str = &text;
        if name == BLANK {
            return None;
        }
        let graph = self.graph();
        let candidates: Vec<Node<'g>> = package
            .symbols()
            .defs()
            .filter(|(_, symbol)| symbol.name == name)
            .filter_map(|(pos, _)| graph.ident_at(pos).and_then(|id| graph.node(id)))
            .collect();
        if candidates.len() == 1 {
            return candidates.into_iter().next();
        }

        let pos = self.start();
        candidates
            .into_iter()
            .filter_map(|candidate| {
                let scope = candidate.scope().filter(|s| s.contains(pos))?;
                Some((scope.range.start, candidate))
            })
            .fold(None, |best: Option<(usize, Node<'g>)>, (start, candidate)| match best {
                Some((best_start, _)) if best_start >= start => best,
                _ => Some((start, candidate)),
            })
            .map(|(_, candidate)| candidate)
    }

    /// Identifiers referring to the declaration at this identifier, in
    /// position order.
    ///
    /// Uses inside the scope of another declaration of the same name are
    /// left out.
    pub fn usages(self) -> Vec<Node<'g>> {
        if !self.kind().is_identifier() {
            return Vec::new();
        }
        let Some(package) = self.package() else {
            return Vec::new();
        };
        let graph = self.graph();
        let cached = package.usages.borrow().get(&self.id()).cloned();
        let ids = match cached {
            Some(ids) => ids,
            None => {
                let ids: Arc<[_]> = self
                    .resolve_usages(package)
                    .into_iter()
                    .map(Node::id)
                    .collect();
                package.usages.borrow_mut().insert(self.id(), ids.clone());
                ids
            }
        };
        ids.iter().filter_map(|&id| graph.node(id)).collect()
    }

    fn resolve_usages(self, package: &'g Package) -> Vec<Node<'g>> {
        let Some(scope) = self.scope() else {
            return Vec::new();
        };
        let text = self.source_text();
        let name: &str = &text;
        if name == BLANK {
            return Vec::new();
        }
        let symbols = package.symbols();
        let graph = self.graph();

        let shadowing: Vec<&Scope> = symbols
            .defs()
            .filter(|(pos, symbol)| {
                symbol.name == name && *pos != self.start() && scope.contains(*pos)
            })
            .filter_map(|(pos, _)| symbols.innermost_scope(pos))
            .collect();

        symbols
            .uses()
            .filter(|(pos, symbol)| symbol.name == name && scope.contains(*pos))
            .filter(|(pos, _)| !shadowing.iter().any(|s| s.contains(*pos)))
            .filter_map(|(pos, _)| graph.ident_at(pos).and_then(|id| graph.node(id)))
            .collect()
    }

    /// Usage with the smallest position.
    pub fn first_usage(self) -> Option<Node<'g>> {
        self.usages().into_iter().min_by_key(|n| n.start())
    }
}
