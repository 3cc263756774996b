//! Token definitions for annotated headers.
//!
//! Only the handful of constructs the extractor needs are tokens. Everything
//! else in the header (numbers, operators, commas) is dropped by the lexer.

use std::fmt;

/// Kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Punctuation
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `<`
    LeftAngle,
    /// `>`
    RightAngle,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `=`
    Equal,
    /// `*`
    Star,
    /// `&`
    Ampersand,
    /// `#`
    NumberSign,

    // Literals
    /// `"..."`, lexeme includes the quotes
    StringLiteral,
    /// Any identifier not in the keyword table
    Identifier,

    // Reserved words
    /// `class`
    Class,
    /// `struct`
    Struct,
    /// `const`
    Const,
    /// `auto`
    Auto,

    // Annotation markers
    /// `UCLASS`
    TypeMarker,
    /// `USTRUCT`
    AggregateMarker,
    /// `UPROPERTY`
    FieldMarker,
    /// `UFUNCTION`
    MethodMarker,

    /// End of input
    Eof,
}

impl TokenKind {
    /// `UCLASS` or `USTRUCT`: starts a new annotated type.
    pub fn is_type_marker(self) -> bool {
        matches!(self, TokenKind::TypeMarker | TokenKind::AggregateMarker)
    }

    /// Any of the four annotation markers.
    pub fn is_marker(self) -> bool {
        matches!(
            self,
            TokenKind::TypeMarker
                | TokenKind::AggregateMarker
                | TokenKind::FieldMarker
                | TokenKind::MethodMarker
        )
    }

    /// `class` or `struct`.
    pub fn is_type_keyword(self) -> bool {
        matches!(self, TokenKind::Class | TokenKind::Struct)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::LeftAngle => "'<'",
            TokenKind::RightAngle => "'>'",
            TokenKind::Colon => "':'",
            TokenKind::Semicolon => "';'",
            TokenKind::Equal => "'='",
            TokenKind::Star => "'*'",
            TokenKind::Ampersand => "'&'",
            TokenKind::NumberSign => "'#'",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Identifier => "identifier",
            TokenKind::Class => "'class'",
            TokenKind::Struct => "'struct'",
            TokenKind::Const => "'const'",
            TokenKind::Auto => "'auto'",
            TokenKind::TypeMarker => "'UCLASS'",
            TokenKind::AggregateMarker => "'USTRUCT'",
            TokenKind::FieldMarker => "'UPROPERTY'",
            TokenKind::MethodMarker => "'UFUNCTION'",
            TokenKind::Eof => "end of input",
        };
        f.write_str(text)
    }
}

/// Source location of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed)
    pub column: u32,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A token with its location and source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token kind
    pub kind: TokenKind,
    /// Location in the source
    pub span: Span,
    /// Source text (`"EOF"` for the end token)
    pub lexeme: String,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, span: Span, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            lexeme: lexeme.into(),
        }
    }

    /// Line number (1-indexed)
    pub fn line(&self) -> u32 {
        self.span.line
    }

    /// Column number (1-indexed)
    pub fn column(&self) -> u32 {
        self.span.column
    }
}
