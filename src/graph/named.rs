//! Capabilities some node kinds have: a naming identifier, a name, a token
//! and a static value type.

use super::node::Node;
use crate::kind::NodeKind;
use crate::symbols::Symbol;
use crate::token::Token;

impl<'g> Node<'g> {
    /// First child sitting in the grammar field `field`.
    pub fn child_in_field(self, field: &str) -> Option<Node<'g>> {
        self.children().into_iter().find(|c| c.field() == Some(field))
    }

    /// The identifier that names this node.
    pub fn ident(self) -> Option<Node<'g>> {
        use NodeKind::*;
        let kind = self.kind();
        if kind.is_identifier() {
            return Some(self);
        }
        match kind {
            FuncDecl | MethodDecl | TypeSpec | TypeAlias | ImportSpec | Parameter
            | VariadicParameter | TypeParameter | Field | MethodElem => {
                self.child_in_field("name")
            }
            LabeledStmt => self.child_in_field("label"),
            BreakStmt | ContinueStmt | GotoStmt => {
                self.children().into_iter().find(|c| c.is(LabelName))
            }
            SourceFile => self
                .children()
                .into_iter()
                .find(|c| c.is(PackageClause))?
                .children()
                .into_iter()
                .find(|c| c.is(PackageIdentifier)),
            SelectorExpr => self.child_in_field("field"),
            CallExpr | ConversionExpr => {
                let target = self.call_target()?;
                match target.kind() {
                    Identifier => Some(target),
                    ArrayType | SliceType => target.ident(),
                    _ => None,
                }
            }
            ArrayType | SliceType => self
                .child_in_field("element")
                .filter(|e| e.kind().is_identifier()),
            _ => None,
        }
    }

    /// Expression a call or conversion invokes.
    pub(crate) fn call_target(self) -> Option<Node<'g>> {
        match self.kind() {
            NodeKind::CallExpr => self.child_in_field("function"),
            NodeKind::ConversionExpr => self.child_in_field("type"),
            _ => None,
        }
    }

    /// Display name of the node.
    ///
    /// Selectors on an identifier read `pkg.Name`, slice and array types and
    /// conversions to them read `[]T`; everything else uses its identifier.
    pub fn name(self) -> Option<String> {
        use NodeKind::*;
        match self.kind() {
            SelectorExpr => {
                let field = self.ident()?.source_text();
                match self.child_in_field("operand") {
                    Some(operand) if operand.is(Identifier) => {
                        Some(format!("{}.{}", operand.source_text(), field))
                    }
                    _ => Some(field.into_owned()),
                }
            }
            CallExpr | ConversionExpr => {
                let target = self.call_target()?;
                match target.kind() {
                    ArrayType | SliceType => target.name(),
                    _ => self.ident().map(|i| i.source_text().into_owned()),
                }
            }
            ArrayType | SliceType => Some(format!("[]{}", self.ident()?.source_text())),
            _ => self.ident().map(|i| i.source_text().into_owned()),
        }
    }

    /// Operator, literal kind or keyword the node carries.
    pub fn token(self) -> Option<Token> {
        use NodeKind::*;
        match self.kind() {
            AssignStmt | BinaryExpr | UnaryExpr | RangeClause => self
                .graph()
                .element_of(self.id())
                .and_then(|e| e.operator.as_deref())
                .and_then(Token::from_operator),
            ShortVarDecl => Some(Token::Define),
            IncStmt => Some(Token::Inc),
            DecStmt => Some(Token::Dec),
            SendStmt => Some(Token::Arrow),
            BreakStmt => Some(Token::Break),
            ContinueStmt => Some(Token::Continue),
            GotoStmt => Some(Token::Goto),
            FallthroughStmt => Some(Token::Fallthrough),
            IntLit => Some(Token::Int),
            FloatLit => Some(Token::Float),
            ImaginaryLit => Some(Token::Imag),
            RuneLit => Some(Token::Char),
            StringLit => Some(Token::String),
            VarDecl => Some(Token::Var),
            ConstDecl => Some(Token::Const),
            TypeDecl => Some(Token::Type),
            ImportDecl => Some(Token::Import),
            _ => None,
        }
    }

    /// Object the identifier at this node declares or refers to.
    pub fn symbol(self) -> Option<&'g Symbol> {
        if !self.kind().is_identifier() {
            return None;
        }
        self.package()?.symbols().object_at(self.start())
    }

    /// Static type of the node.
    ///
    /// Expressions use the recorded expression type. Identifiers fall back
    /// to the type of their object. Declarations, composite literals and type
    /// assertions use the type of their `type` identifier.
    pub fn value_type(self) -> Option<&'g str> {
        use NodeKind::*;
        let symbols = self.package()?.symbols();
        if let Some(ty) = symbols.type_of(self.span()) {
            return Some(ty);
        }
        match self.kind() {
            k if k.is_identifier() => self.symbol()?.ty.as_deref(),
            Parameter | Field | VarSpec | ConstSpec | TypeSpec | CompositeLit | TypeAssertExpr => {
                let ty = self.child_in_field("type")?;
                if !ty.kind().is_identifier() {
                    return None;
                }
                ty.value_type()
            }
            _ => None,
        }
    }
}
