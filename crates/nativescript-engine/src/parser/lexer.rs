//! Scanner for annotated headers.
//!
//! Whitespace and comments are skipped by hand, string literals are scanned
//! by hand so an unterminated one can be reported and skipped, and every
//! other token is matched by logos.

use crate::parser::token::{Span, Token, TokenKind};
use logos::Logos;

/// Logos-based token enum for lexing.
///
/// Converted to [`TokenKind`] after lexing.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum LogosToken {
    #[regex(r"[ \t\r\n\f\v]+", logos::skip)]
    Whitespace,

    // Annotation markers (must come before identifiers)
    #[token("UCLASS")]
    TypeMarker,

    #[token("USTRUCT")]
    AggregateMarker,

    #[token("UPROPERTY")]
    FieldMarker,

    #[token("UFUNCTION")]
    MethodMarker,

    // Keywords
    #[token("class")]
    Class,

    #[token("struct")]
    Struct,

    #[token("const")]
    Const,

    #[token("auto")]
    Auto,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    // Single-character tokens
    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("{")]
    LeftBrace,

    #[token("}")]
    RightBrace,

    #[token("<")]
    LeftAngle,

    #[token(">")]
    RightAngle,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token("=")]
    Equal,

    #[token("*")]
    Star,

    #[token("&")]
    Ampersand,

    #[token("#")]
    NumberSign,
}

impl LogosToken {
    fn kind(self) -> TokenKind {
        match self {
            LogosToken::TypeMarker => TokenKind::TypeMarker,
            LogosToken::AggregateMarker => TokenKind::AggregateMarker,
            LogosToken::FieldMarker => TokenKind::FieldMarker,
            LogosToken::MethodMarker => TokenKind::MethodMarker,
            LogosToken::Class => TokenKind::Class,
            LogosToken::Struct => TokenKind::Struct,
            LogosToken::Const => TokenKind::Const,
            LogosToken::Auto => TokenKind::Auto,
            LogosToken::Identifier => TokenKind::Identifier,
            LogosToken::LeftParen => TokenKind::LeftParen,
            LogosToken::RightParen => TokenKind::RightParen,
            LogosToken::LeftBrace => TokenKind::LeftBrace,
            LogosToken::RightBrace => TokenKind::RightBrace,
            LogosToken::LeftAngle => TokenKind::LeftAngle,
            LogosToken::RightAngle => TokenKind::RightAngle,
            LogosToken::Colon => TokenKind::Colon,
            LogosToken::Semicolon => TokenKind::Semicolon,
            LogosToken::Equal => TokenKind::Equal,
            LogosToken::Star => TokenKind::Star,
            LogosToken::Ampersand => TokenKind::Ampersand,
            LogosToken::NumberSign => TokenKind::NumberSign,
            LogosToken::Whitespace => unreachable!("Whitespace should be skipped"),
        }
    }
}

/// Scan diagnostics. None of them stop the scan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanDiagnostic {
    /// A `"` with no closing quote before end of input
    #[error("Unterminated string literal at {span}")]
    UnterminatedString {
        /// Location of the opening quote
        span: Span,
    },
}

impl ScanDiagnostic {
    /// Get the span of this diagnostic
    pub fn span(&self) -> &Span {
        match self {
            ScanDiagnostic::UnterminatedString { span } => span,
        }
    }
}

/// Result of scanning one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    /// Tokens in source order, always ending with one [`TokenKind::Eof`]
    pub tokens: Vec<Token>,
    /// Problems found along the way
    pub diagnostics: Vec<ScanDiagnostic>,
}

/// Scan one file.
pub fn scan(source: &str) -> Scan {
    Lexer::new(source).tokenize()
}

/// Byte position plus 1-indexed line and column.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    pos: usize,
    line: u32,
    column: u32,
}

/// Main lexer structure.
pub struct Lexer<'a> {
    source: &'a str,
    cursor: Cursor,
    tokens: Vec<Token>,
    diagnostics: Vec<ScanDiagnostic>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over one file's text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: Cursor {
                pos: 0,
                line: 1,
                column: 1,
            },
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Run the scan to completion.
    pub fn tokenize(mut self) -> Scan {
        while !self.at_end() {
            self.skip_trivia();
            if self.at_end() {
                break;
            }

            if self.peek() == Some(b'"') {
                self.lex_string();
                continue;
            }

            let mut logos_lexer = LogosToken::lexer(&self.source[self.cursor.pos..]);
            let Some(result) = logos_lexer.next() else {
                break;
            };
            let range = logos_lexer.span();
            let abs_start = self.cursor.pos + range.start;
            let abs_end = self.cursor.pos + range.end;

            match result {
                Ok(logos_token) => {
                    self.bump_to(abs_start);
                    let span = Span::new(abs_start, abs_end, self.cursor.line, self.cursor.column);
                    let lexeme = &self.source[abs_start..abs_end];
                    self.tokens.push(Token::new(logos_token.kind(), span, lexeme));
                    self.bump_to(abs_end);
                }
                Err(()) => {
                    // Outside the token set: drop one character and carry on.
                    let width = self.source[abs_start..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
                    log::trace!(
                        "skipping {:?} at {}:{}",
                        &self.source[abs_start..abs_start + width],
                        self.cursor.line,
                        self.cursor.column
                    );
                    self.bump_to(abs_start + width);
                }
            }
        }

        let eof_span = Span::new(
            self.source.len(),
            self.source.len(),
            self.cursor.line,
            self.cursor.column,
        );
        self.tokens.push(Token::new(TokenKind::Eof, eof_span, "EOF"));

        Scan {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    fn at_end(&self) -> bool {
        self.cursor.pos >= self.source.len()
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.cursor.pos).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.source.as_bytes().get(self.cursor.pos + 1).copied()
    }

    /// Consume one byte, keeping line and column current.
    fn bump(&mut self) {
        let Some(byte) = self.peek() else {
            return;
        };
        self.cursor.pos += 1;
        if byte == b'\n' {
            self.cursor.line += 1;
            self.cursor.column = 1;
        } else if byte & 0xC0 != 0x80 {
            // Continuation bytes of a multi-byte character share its column.
            self.cursor.column += 1;
        }
    }

    fn bump_to(&mut self, pos: usize) {
        while self.cursor.pos < pos && !self.at_end() {
            self.bump();
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(byte) = self.peek() {
            match byte {
                b' ' | b'\t' | b'\r' | b'\n' | b'\x0b' | b'\x0c' => self.bump(),
                b'/' if self.peek_next() == Some(b'/') => {
                    while !self.at_end() && self.peek() != Some(b'\n') {
                        self.bump();
                    }
                }
                b'/' if self.peek_next() == Some(b'*') => {
                    self.bump();
                    self.bump();
                    let remainder = &self.source[self.cursor.pos..];
                    // Unterminated comment - consume to end
                    let end = remainder
                        .find("*/")
                        .map_or(self.source.len(), |i| self.cursor.pos + i + 2);
                    self.bump_to(end);
                }
                _ => break,
            }
        }
    }

    fn lex_string(&mut self) {
        let start = self.cursor;
        self.bump(); // opening quote

        while let Some(byte) = self.peek() {
            match byte {
                b'"' => {
                    self.bump();
                    let span = Span::new(start.pos, self.cursor.pos, start.line, start.column);
                    let lexeme = &self.source[start.pos..self.cursor.pos];
                    self.tokens.push(Token::new(TokenKind::StringLiteral, span, lexeme));
                    return;
                }
                b'\\' => {
                    self.bump();
                    self.bump();
                }
                _ => self.bump(),
            }
        }

        let span = Span::new(start.pos, self.source.len(), start.line, start.column);
        log::warn!("Unterminated string literal at {}", span);
        self.diagnostics.push(ScanDiagnostic::UnterminatedString { span });

        // Resynchronize on the line after the opening quote.
        self.cursor = start;
        while !self.at_end() && self.peek() != Some(b'\n') {
            self.bump();
        }
        self.bump();
    }
}
