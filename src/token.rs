//! Go lexical tokens carried by operator, literal and keyword nodes.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown token: {text}")]
pub struct TokenParseError {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    // literal kinds
    Int,
    Float,
    Imag,
    Char,
    String,

    // operators
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
    LogicalAnd,
    LogicalOr,
    Arrow,
    Inc,
    Dec,
    Eql,
    Neq,
    Lss,
    Gtr,
    Leq,
    Geq,
    Not,
    Tilde,

    // assignment
    Assign,
    Define,
    AddAssign,
    SubAssign,
    MulAssign,
    QuoAssign,
    RemAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    AndNotAssign,

    // keywords
    Break,
    Continue,
    Goto,
    Fallthrough,
    Var,
    Const,
    Type,
    Import,
}

const TABLE: &[(Token, &str)] = &[
    (Token::Int, "INT"),
    (Token::Float, "FLOAT"),
    (Token::Imag, "IMAG"),
    (Token::Char, "CHAR"),
    (Token::String, "STRING"),
    (Token::Add, "+"),
    (Token::Sub, "-"),
    (Token::Mul, "*"),
    (Token::Quo, "/"),
    (Token::Rem, "%"),
    (Token::And, "&"),
    (Token::Or, "|"),
    (Token::Xor, "^"),
    (Token::Shl, "<<"),
    (Token::Shr, ">>"),
    (Token::AndNot, "&^"),
    (Token::LogicalAnd, "&&"),
    (Token::LogicalOr, "||"),
    (Token::Arrow, "<-"),
    (Token::Inc, "++"),
    (Token::Dec, "--"),
    (Token::Eql, "=="),
    (Token::Neq, "!="),
    (Token::Lss, "<"),
    (Token::Gtr, ">"),
    (Token::Leq, "<="),
    (Token::Geq, ">="),
    (Token::Not, "!"),
    (Token::Tilde, "~"),
    (Token::Assign, "="),
    (Token::Define, ":="),
    (Token::AddAssign, "+="),
    (Token::SubAssign, "-="),
    (Token::MulAssign, "*="),
    (Token::QuoAssign, "/="),
    (Token::RemAssign, "%="),
    (Token::AndAssign, "&="),
    (Token::OrAssign, "|="),
    (Token::XorAssign, "^="),
    (Token::ShlAssign, "<<="),
    (Token::ShrAssign, ">>="),
    (Token::AndNotAssign, "&^="),
    (Token::Break, "break"),
    (Token::Continue, "continue"),
    (Token::Goto, "goto"),
    (Token::Fallthrough, "fallthrough"),
    (Token::Var, "var"),
    (Token::Const, "const"),
    (Token::Type, "type"),
    (Token::Import, "import"),
];

impl Token {
    pub fn as_str(self) -> &'static str {
        TABLE
            .iter()
            .find(|(t, _)| *t == self)
            .map(|(_, s)| *s)
            .unwrap_or("?")
    }

    /// Look up an operator or keyword by its source spelling.
    pub fn from_operator(text: &str) -> Option<Token> {
        TABLE.iter().find(|(_, s)| *s == text).map(|(t, _)| *t)
    }

    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            Token::Assign
                | Token::Define
                | Token::AddAssign
                | Token::SubAssign
                | Token::MulAssign
                | Token::QuoAssign
                | Token::RemAssign
                | Token::AndAssign
                | Token::OrAssign
                | Token::XorAssign
                | Token::ShlAssign
                | Token::ShrAssign
                | Token::AndNotAssign
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Token::Int | Token::Float | Token::Imag | Token::Char | Token::String
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Token {
    type Err = TokenParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Token::from_operator(s).ok_or_else(|| TokenParseError {
            text: s.to_string(),
        })
    }
}
