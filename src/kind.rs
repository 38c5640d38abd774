//! Closed classification of Go syntax kinds.
//!
//! Every graph node carries exactly one [`NodeKind`]. Grammar kinds coming
//! from the syntax tree are mapped through [`NodeKind::classify`]; a kind the
//! table does not know becomes [`NodeKind::Unclassified`] and the raw grammar
//! string stays reachable through the node.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown node kind tag: {tag}")]
pub struct KindParseError {
    pub tag: String,
}

macro_rules! node_kinds {
    (
        synthetic { $( $(#[$smeta:meta])* $svariant:ident => $stag:literal, )* }
        grammar { $( $(#[$meta:meta])* $variant:ident => $tag:literal : $($grammar:literal)|+ , )* }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NodeKind {
            $( $(#[$smeta])* $svariant, )*
            $( $(#[$meta])* $variant, )*
        }

        impl NodeKind {
            /// Every kind, synthetic ones first.
            pub const ALL: &'static [NodeKind] = &[
                $( NodeKind::$svariant, )*
                $( NodeKind::$variant, )*
            ];

            /// Stable kebab-case tag.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( NodeKind::$svariant => $stag, )*
                    $( NodeKind::$variant => $tag, )*
                }
            }

            /// Map a grammar kind string to its classification.
            pub fn classify(grammar_kind: &str) -> NodeKind {
                match grammar_kind {
                    $( $($grammar)|+ => NodeKind::$variant, )*
                    _ => NodeKind::Unclassified,
                }
            }
        }
    };
}

node_kinds! {
    synthetic {
        /// Aggregate root over the files of one package.
        Package => "package",
        /// Grammar kind without a classification.
        Unclassified => "unclassified",
    }
    grammar {
        SourceFile => "file": "source_file",
        PackageClause => "package-clause": "package_clause",
        Comment => "comment": "comment",
        Bad => "bad": "ERROR",

        Identifier => "identifier": "identifier",
        TypeIdentifier => "type-identifier": "type_identifier",
        FieldIdentifier => "field-identifier": "field_identifier",
        PackageIdentifier => "package-identifier": "package_identifier",
        LabelName => "label-name": "label_name",
        BlankIdentifier => "blank-identifier": "blank_identifier",
        Dot => "dot": "dot",

        ImportDecl => "import-declaration": "import_declaration",
        ImportSpec => "import-spec": "import_spec",
        ImportSpecList => "import-spec-list": "import_spec_list",
        FuncDecl => "function-declaration": "function_declaration",
        MethodDecl => "method-declaration": "method_declaration",
        ParameterList => "parameter-list": "parameter_list",
        Parameter => "parameter": "parameter_declaration",
        VariadicParameter => "variadic-parameter": "variadic_parameter_declaration",
        TypeParameterList => "type-parameter-list": "type_parameter_list",
        TypeParameter => "type-parameter": "type_parameter_declaration",
        VarDecl => "var-declaration": "var_declaration",
        VarSpec => "var-spec": "var_spec",
        VarSpecList => "var-spec-list": "var_spec_list",
        ConstDecl => "const-declaration": "const_declaration",
        ConstSpec => "const-spec": "const_spec",
        TypeDecl => "type-declaration": "type_declaration",
        TypeSpec => "type-spec": "type_spec",
        TypeAlias => "type-alias": "type_alias",

        Block => "block": "block",
        StatementList => "statement-list": "statement_list",
        ExpressionList => "expression-list": "expression_list",
        ShortVarDecl => "short-var-declaration": "short_var_declaration",
        AssignStmt => "assignment-statement": "assignment_statement",
        IncStmt => "inc-statement": "inc_statement",
        DecStmt => "dec-statement": "dec_statement",
        ExprStmt => "expression-statement": "expression_statement",
        SendStmt => "send-statement": "send_statement",
        ReceiveStmt => "receive-statement": "receive_statement",
        GoStmt => "go-statement": "go_statement",
        DeferStmt => "defer-statement": "defer_statement",
        ReturnStmt => "return-statement": "return_statement",
        IfStmt => "if-statement": "if_statement",
        ForStmt => "for-statement": "for_statement",
        ForClause => "for-clause": "for_clause",
        RangeClause => "range-clause": "range_clause",
        SwitchStmt => "switch-statement": "expression_switch_statement",
        TypeSwitchStmt => "type-switch-statement": "type_switch_statement",
        CaseClause => "case-clause": "expression_case" | "type_case",
        DefaultCase => "default-case": "default_case",
        SelectStmt => "select-statement": "select_statement",
        CommClause => "communication-case": "communication_case",
        LabeledStmt => "labeled-statement": "labeled_statement",
        BreakStmt => "break-statement": "break_statement",
        ContinueStmt => "continue-statement": "continue_statement",
        GotoStmt => "goto-statement": "goto_statement",
        FallthroughStmt => "fallthrough-statement": "fallthrough_statement",
        EmptyStmt => "empty-statement": "empty_statement",

        CallExpr => "call-expression": "call_expression",
        ArgumentList => "argument-list": "argument_list",
        ConversionExpr => "conversion-expression": "type_conversion_expression",
        SelectorExpr => "selector-expression": "selector_expression",
        IndexExpr => "index-expression": "index_expression",
        SliceExpr => "slice-expression": "slice_expression",
        TypeAssertExpr => "type-assertion": "type_assertion_expression",
        UnaryExpr => "unary-expression": "unary_expression",
        BinaryExpr => "binary-expression": "binary_expression",
        ParenExpr => "parenthesized-expression": "parenthesized_expression",
        CompositeLit => "composite-literal": "composite_literal",
        LiteralValue => "literal-value": "literal_value",
        LiteralElement => "literal-element": "literal_element",
        KeyedElement => "keyed-element": "keyed_element",
        FuncLit => "function-literal": "func_literal",
        VariadicArgument => "variadic-argument": "variadic_argument",
        TypeInstantiation => "type-instantiation": "type_instantiation_expression",

        IntLit => "int-literal": "int_literal",
        FloatLit => "float-literal": "float_literal",
        ImaginaryLit => "imaginary-literal": "imaginary_literal",
        RuneLit => "rune-literal": "rune_literal",
        StringLit => "string-literal": "interpreted_string_literal" | "raw_string_literal",
        StringContent => "string-content": "interpreted_string_literal_content" | "raw_string_literal_content",
        EscapeSequence => "escape-sequence": "escape_sequence",
        Nil => "nil": "nil",
        True => "true": "true",
        False => "false": "false",
        Iota => "iota": "iota",

        PointerType => "pointer-type": "pointer_type",
        ArrayType => "array-type": "array_type" | "implicit_length_array_type",
        SliceType => "slice-type": "slice_type",
        MapType => "map-type": "map_type",
        ChanType => "channel-type": "channel_type",
        FuncType => "function-type": "function_type",
        StructType => "struct-type": "struct_type",
        FieldList => "field-list": "field_declaration_list",
        Field => "field": "field_declaration",
        InterfaceType => "interface-type": "interface_type",
        MethodElem => "method-element": "method_elem" | "method_spec",
        TypeElem => "type-element": "type_elem" | "constraint_elem",
        QualifiedType => "qualified-type": "qualified_type",
        GenericType => "generic-type": "generic_type",
        TypeArguments => "type-arguments": "type_arguments",
        ParenType => "parenthesized-type": "parenthesized_type",
        NegatedType => "negated-type": "negated_type",
    }
}

impl NodeKind {
    /// Identifier-like leaves: anything that can name or refer to an object.
    pub fn is_identifier(self) -> bool {
        matches!(
            self,
            NodeKind::Identifier
                | NodeKind::TypeIdentifier
                | NodeKind::FieldIdentifier
                | NodeKind::PackageIdentifier
                | NodeKind::LabelName
        )
    }

    /// Expressions that invoke something: calls and `[]T(x)` conversions.
    pub fn is_call(self) -> bool {
        matches!(self, NodeKind::CallExpr | NodeKind::ConversionExpr)
    }

    /// Top-level function-like declarations.
    pub fn is_func_declaration(self) -> bool {
        matches!(self, NodeKind::FuncDecl | NodeKind::MethodDecl)
    }

    /// Declarations that may bind several names sharing one type.
    pub fn is_splittable(self) -> bool {
        matches!(
            self,
            NodeKind::Parameter | NodeKind::TypeParameter | NodeKind::Field
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            NodeKind::IntLit
                | NodeKind::FloatLit
                | NodeKind::ImaginaryLit
                | NodeKind::RuneLit
                | NodeKind::StringLit
        )
    }

    /// Branch statements, named by their optional label.
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            NodeKind::BreakStmt
                | NodeKind::ContinueStmt
                | NodeKind::GotoStmt
                | NodeKind::FallthroughStmt
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| KindParseError { tag: s.to_string() })
    }
}
