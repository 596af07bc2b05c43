//! Lexical tokens of WGSL.
//!
//! Keywords are lexed as [`TokenKind::Ident`] and recognized by the parser.
//! `<` and `>` are turned into [`TokenKind::TemplateStart`] and
//! [`TokenKind::TemplateEnd`] by template-list discovery before parsing.

use std::fmt;

use wgslx_ast::{FloatSuffix, IntSuffix, Span};

pub use wgslx_ast::names::is_keyword;

/// A token with its kind and source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Int { value: i64, suffix: IntSuffix },
    Float { value: f64, suffix: FloatSuffix },

    // Punctuation
    And,          // &
    AndAnd,       // &&
    Arrow,        // ->
    At,           // @
    Slash,        // /
    Bang,         // !
    LBracket,     // [
    RBracket,     // ]
    LBrace,       // {
    RBrace,       // }
    Colon,        // :
    Comma,        // ,
    Equal,        // =
    EqualEqual,   // ==
    NotEqual,     // !=
    Greater,      // >
    GreaterEqual, // >=
    ShiftRight,   // >>
    Less,         // <
    LessEqual,    // <=
    ShiftLeft,    // <<
    Percent,      // %
    Minus,        // -
    MinusMinus,   // --
    Period,       // .
    Plus,         // +
    PlusPlus,     // ++
    Or,           // |
    OrOr,         // ||
    LParen,       // (
    RParen,       // )
    Semicolon,    // ;
    Star,         // *
    Tilde,        // ~
    Underscore,   // _
    Xor,          // ^
    PlusEqual,    // +=
    MinusEqual,   // -=
    StarEqual,    // *=
    SlashEqual,   // /=
    PercentEqual, // %=
    AndEqual,     // &=
    OrEqual,      // |=
    XorEqual,     // ^=
    ShiftRightEqual, // >>=
    ShiftLeftEqual,  // <<=

    /// A `<` that opens a template argument list.
    TemplateStart,
    /// A `>` that closes a template argument list.
    TemplateEnd,

    Eof,
}

impl TokenKind {
    /// Spelling used in error messages.
    pub fn describe(&self) -> String {
        let text = match self {
            TokenKind::Ident(name) => return format!("'{name}'"),
            TokenKind::Int { value, .. } => return format!("integer literal {value}"),
            TokenKind::Float { value, .. } => return format!("float literal {value}"),
            TokenKind::And => "&",
            TokenKind::AndAnd => "&&",
            TokenKind::Arrow => "->",
            TokenKind::At => "@",
            TokenKind::Slash => "/",
            TokenKind::Bang => "!",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::Equal => "=",
            TokenKind::EqualEqual => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::Greater | TokenKind::TemplateEnd => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::ShiftRight => ">>",
            TokenKind::Less | TokenKind::TemplateStart => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::ShiftLeft => "<<",
            TokenKind::Percent => "%",
            TokenKind::Minus => "-",
            TokenKind::MinusMinus => "--",
            TokenKind::Period => ".",
            TokenKind::Plus => "+",
            TokenKind::PlusPlus => "++",
            TokenKind::Or => "|",
            TokenKind::OrOr => "||",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Semicolon => ";",
            TokenKind::Star => "*",
            TokenKind::Tilde => "~",
            TokenKind::Underscore => "_",
            TokenKind::Xor => "^",
            TokenKind::PlusEqual => "+=",
            TokenKind::MinusEqual => "-=",
            TokenKind::StarEqual => "*=",
            TokenKind::SlashEqual => "/=",
            TokenKind::PercentEqual => "%=",
            TokenKind::AndEqual => "&=",
            TokenKind::OrEqual => "|=",
            TokenKind::XorEqual => "^=",
            TokenKind::ShiftRightEqual => ">>=",
            TokenKind::ShiftLeftEqual => "<<=",
            TokenKind::Eof => return "end of file".to_owned(),
        };
        format!("'{text}'")
    }

    pub fn is_ident(&self, keyword: &str) -> bool {
        matches!(self, TokenKind::Ident(name) if name == keyword)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_tokens() {
        assert_eq!(TokenKind::Ident("foo".into()).describe(), "'foo'");
        assert_eq!(TokenKind::TemplateEnd.describe(), "'>'");
        assert_eq!(TokenKind::Eof.to_string(), "end of file");
    }
}
