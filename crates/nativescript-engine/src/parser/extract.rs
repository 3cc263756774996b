//! Metadata extraction from a token sequence.
//!
//! A single forward cursor walks the tokens. `UCLASS`/`USTRUCT` opens a type,
//! the next `class`/`struct` keyword is followed by its name, and everything
//! up to the next type marker is that type's body. Inside the body each
//! `UPROPERTY(...)` is followed by one field declaration.

use nativescript_sdk::{FieldType, TypeInfo};

use crate::parser::token::{Span, Token, TokenKind};

/// Extraction diagnostics. None of them stop the walk.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractDiagnostic {
    /// A type marker was not followed by `class`/`struct` and a name
    #[error("Annotated type at {span} has no declaration name")]
    MissingTypeName {
        /// Location of the marker
        span: Span,
    },

    /// Field type text is not one of the recognized scalar keywords
    #[error("Field {type_name}::{field} at {span} has unsupported type '{declared}'")]
    UnknownFieldType {
        /// Owning type
        type_name: String,
        /// Field name
        field: String,
        /// Declared type text
        declared: String,
        /// Location of the field name
        span: Span,
    },

    /// A field marker was not followed by a `type name` declaration
    #[error("Annotated field in {type_name} at {span} is not a declaration")]
    MalformedField {
        /// Owning type
        type_name: String,
        /// Location of the marker
        span: Span,
    },

    /// Method reflection is not implemented
    #[error("Annotated method in {type_name} at {span} ignored: method reflection is not supported")]
    MethodIgnored {
        /// Owning type
        type_name: String,
        /// Location of the marker
        span: Span,
    },
}

impl ExtractDiagnostic {
    /// Get the span of this diagnostic
    pub fn span(&self) -> &Span {
        match self {
            ExtractDiagnostic::MissingTypeName { span }
            | ExtractDiagnostic::UnknownFieldType { span, .. }
            | ExtractDiagnostic::MalformedField { span, .. }
            | ExtractDiagnostic::MethodIgnored { span, .. } => span,
        }
    }
}

/// Result of extracting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// One record per annotated type, in source order
    pub types: Vec<TypeInfo>,
    /// Problems found along the way
    pub diagnostics: Vec<ExtractDiagnostic>,
}

/// Extract metadata for every annotated type in a token sequence.
pub fn extract(tokens: &[Token]) -> Extraction {
    let mut extractor = Extractor {
        tokens,
        pos: 0,
        types: Vec::new(),
        diagnostics: Vec::new(),
    };
    extractor.run();
    Extraction {
        types: extractor.types,
        diagnostics: extractor.diagnostics,
    }
}

struct Extractor<'t> {
    tokens: &'t [Token],
    pos: usize,
    types: Vec<TypeInfo>,
    diagnostics: Vec<ExtractDiagnostic>,
}

impl<'t> Extractor<'t> {
    fn run(&mut self) {
        while !self.at_end() {
            if self.kind().is_type_marker() {
                let marker = self.advance().span;
                self.type_declaration(marker);
            } else {
                self.advance();
            }
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len() || self.kind() == TokenKind::Eof
    }

    fn kind(&self) -> TokenKind {
        self.tokens.get(self.pos).map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Return the current token and step past it.
    fn advance(&mut self) -> &'t Token {
        let tokens = self.tokens;
        let token = &tokens[self.pos.min(tokens.len() - 1)];
        if self.pos < tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn type_declaration(&mut self, marker: Span) {
        while !self.at_end() && !self.kind().is_type_keyword() {
            if self.kind().is_type_marker() {
                // Another type starts before this one was declared.
                self.diagnostics.push(ExtractDiagnostic::MissingTypeName { span: marker });
                return;
            }
            self.advance();
        }
        if self.at_end() {
            self.diagnostics.push(ExtractDiagnostic::MissingTypeName { span: marker });
            return;
        }
        self.advance(); // class / struct

        if self.kind() != TokenKind::Identifier {
            self.diagnostics.push(ExtractDiagnostic::MissingTypeName { span: marker });
            return;
        }
        let mut info = TypeInfo::new(self.advance().lexeme.as_str());

        while !self.at_end() && !self.kind().is_type_marker() {
            match self.kind() {
                TokenKind::FieldMarker => self.field(&mut info),
                TokenKind::MethodMarker => {
                    let span = self.advance().span;
                    log::debug!("{}: ignoring annotated method at {}", info.name, span);
                    self.diagnostics.push(ExtractDiagnostic::MethodIgnored {
                        type_name: info.name.clone(),
                        span,
                    });
                }
                _ => {
                    self.advance();
                }
            }
        }

        self.types.push(info);
    }

    fn field(&mut self, info: &mut TypeInfo) {
        let marker = self.advance().span;

        if self.kind() == TokenKind::LeftParen && !self.skip_annotation_arguments() {
            self.diagnostics.push(ExtractDiagnostic::MalformedField {
                type_name: info.name.clone(),
                span: marker,
            });
            return;
        }

        let mut declarator: Vec<&Token> = Vec::new();
        while !self.at_end()
            && !self.kind().is_marker()
            && !matches!(
                self.kind(),
                TokenKind::Semicolon | TokenKind::Equal | TokenKind::LeftBrace
            )
        {
            let token = self.advance();
            if token.kind != TokenKind::Const {
                declarator.push(token);
            }
        }

        // `int x, y;` and `int flags : 4;` declare `x` and `flags`: a scalar
        // keyword followed by a name wins over the general declarator.
        let leading = match declarator.as_slice() {
            [ty, name, ..]
                if ty.kind == TokenKind::Identifier
                    && name.kind == TokenKind::Identifier
                    && FieldType::from_keyword(&ty.lexeme) != FieldType::Unknown =>
            {
                Some((name, &declarator[..1]))
            }
            _ => None,
        };

        let (name, type_tokens) = match leading.or_else(|| declarator.split_last()) {
            Some((name, rest)) if name.kind == TokenKind::Identifier && !rest.is_empty() => (name, rest),
            _ => {
                self.diagnostics.push(ExtractDiagnostic::MalformedField {
                    type_name: info.name.clone(),
                    span: marker,
                });
                return;
            }
        };

        let ty = match type_tokens {
            [single] if single.kind == TokenKind::Identifier => FieldType::from_keyword(&single.lexeme),
            _ => FieldType::Unknown,
        };
        if !ty.is_accessible() {
            let declared = declared_type_text(type_tokens);
            log::warn!(
                "{}::{} at {} has unsupported type '{}'",
                info.name,
                name.lexeme,
                name.span,
                declared
            );
            self.diagnostics.push(ExtractDiagnostic::UnknownFieldType {
                type_name: info.name.clone(),
                field: name.lexeme.clone(),
                declared,
                span: name.span,
            });
        }

        info.push_field(ty, name.lexeme.as_str());
    }

    /// Skip `( ... )` including nested parentheses. Returns false if the
    /// list is not closed before the type body ends.
    fn skip_annotation_arguments(&mut self) -> bool {
        let mut depth = 0usize;
        while !self.at_end() && !self.kind().is_type_marker() {
            match self.advance().kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        return true;
                    }
                }
                _ => {}
            }
        }
        false
    }
}

fn declared_type_text(tokens: &[&Token]) -> String {
    let mut text = String::new();
    let mut previous_word = false;
    for token in tokens {
        let word = matches!(token.kind, TokenKind::Identifier | TokenKind::Auto);
        if word && previous_word {
            text.push(' ');
        }
        text.push_str(&token.lexeme);
        previous_word = word;
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::scan;

    fn extract_source(source: &str) -> Extraction {
        extract(&scan(source).tokens)
    }

    #[test]
    fn test_single_int_field() {
        let result = extract_source(
            r#"
UCLASS()
class TypeA : public Script {
public:
    UPROPERTY()
    int health = 100;
};
"#,
        );
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.types.len(), 1);

        let info = &result.types[0];
        assert_eq!(info.name, "TypeA");
        assert_eq!(info.create, "createTypeA");
        assert_eq!(info.destroy, "destroyTypeA");
        assert_eq!(info.fields.len(), 1);
        assert_eq!(info.fields[0].ty, FieldType::Int);
        assert_eq!(info.fields[0].name, "health");
        assert_eq!(info.fields[0].getter, "TypeA_get_health");
        assert_eq!(info.fields[0].setter, "TypeA_set_health");
    }

    #[test]
    fn test_type_without_fields() {
        let result = extract_source("UCLASS() class Empty { int notAnnotated; };");
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.types.len(), 1);
        assert!(result.types[0].fields.is_empty());
        assert_eq!(result.types[0].create, "createEmpty");
        assert_eq!(result.types[0].destroy, "destroyEmpty");
    }

    #[test]
    fn test_field_order_and_all_scalar_kinds() {
        let result = extract_source(
            r#"
USTRUCT()
struct Stats {
    UPROPERTY() int a;
    UPROPERTY() char b;
    UPROPERTY() bool c;
    UPROPERTY() float d;
    UPROPERTY() double e;
    UPROPERTY() wchar_t f;
};
"#,
        );
        let info = &result.types[0];
        let fields: Vec<_> = info.fields.iter().map(|f| (f.name.as_str(), f.ty)).collect();
        assert_eq!(
            fields,
            vec![
                ("a", FieldType::Int),
                ("b", FieldType::Char),
                ("c", FieldType::Bool),
                ("d", FieldType::Float),
                ("e", FieldType::Double),
                ("f", FieldType::WChar),
            ]
        );
    }

    #[test]
    fn test_unknown_field_type_is_kept() {
        let result = extract_source("UCLASS() class Bag { UPROPERTY() size_t count; UPROPERTY() int weight; };");
        let info = &result.types[0];
        assert_eq!(info.fields.len(), 2);
        assert_eq!(info.fields[0].ty, FieldType::Unknown);
        assert_eq!(info.fields[0].name, "count");
        assert_eq!(info.fields[0].getter, "Bag_get_count");
        assert_eq!(info.fields[1].ty, FieldType::Int);

        assert_eq!(result.diagnostics.len(), 1);
        match &result.diagnostics[0] {
            ExtractDiagnostic::UnknownFieldType { type_name, field, declared, .. } => {
                assert_eq!(type_name, "Bag");
                assert_eq!(field, "count");
                assert_eq!(declared, "size_t");
            }
            other => panic!("Expected UnknownFieldType, got {:?}", other),
        }
    }

    #[test]
    fn test_compound_declarators() {
        let result = extract_source(
            r#"
UCLASS() class Weird {
    UPROPERTY() const int limit;
    UPROPERTY() unsigned int mask;
    UPROPERTY() int* target;
    UPROPERTY() std::vector<int> list;
    UPROPERTY() auto guess = 1;
};
"#,
        );
        let info = &result.types[0];
        let fields: Vec<_> = info.fields.iter().map(|f| (f.name.as_str(), f.ty)).collect();
        assert_eq!(
            fields,
            vec![
                ("limit", FieldType::Int),
                ("mask", FieldType::Unknown),
                ("target", FieldType::Unknown),
                ("list", FieldType::Unknown),
                ("guess", FieldType::Unknown),
            ]
        );

        let declared: Vec<_> = result
            .diagnostics
            .iter()
            .filter_map(|d| match d {
                ExtractDiagnostic::UnknownFieldType { declared, .. } => Some(declared.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(declared, vec!["unsigned int", "int*", "std::vector<int>", "auto"]);
    }

    #[test]
    fn test_scalar_keyword_then_name() {
        let result = extract_source(
            "UCLASS() class Packed { UPROPERTY() int x, y; UPROPERTY() int flags : 4; UPROPERTY() char name[16]; };",
        );
        let info = &result.types[0];
        let fields: Vec<_> = info.fields.iter().map(|f| (f.name.as_str(), f.ty)).collect();
        assert_eq!(
            fields,
            vec![("x", FieldType::Int), ("flags", FieldType::Int), ("name", FieldType::Char)]
        );
        assert_eq!(info.fields[1].getter, "Packed_get_flags");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn test_void_field_is_diagnosed() {
        let result = extract_source("UCLASS() class Odd { UPROPERTY() void nothing; };");
        assert_eq!(result.types[0].fields[0].ty, FieldType::Void);
        match result.diagnostics.as_slice() {
            [ExtractDiagnostic::UnknownFieldType { field, declared, .. }] => {
                assert_eq!(field, "nothing");
                assert_eq!(declared, "void");
            }
            other => panic!("Expected one UnknownFieldType, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_annotation_arguments() {
        let result = extract_source("UCLASS() class A { UPROPERTY(Category(\"x\"), Edit) float speed; };");
        assert_eq!(result.types[0].fields[0].name, "speed");
        assert_eq!(result.types[0].fields[0].ty, FieldType::Float);
    }

    #[test]
    fn test_body_ends_at_next_type_marker() {
        let result = extract_source(
            r#"
UCLASS() class First { UPROPERTY() int a; };
class Helper { UPROPERTY() int b; };
UCLASS() class Second { UPROPERTY() bool c; };
"#,
        );
        assert_eq!(result.types.len(), 2);
        let first: Vec<_> = result.types[0].fields.iter().map(|f| f.name.as_str()).collect();
        // Annotated fields of an unannotated class fall into the preceding body.
        assert_eq!(first, vec!["a", "b"]);
        assert_eq!(result.types[1].name, "Second");
        assert_eq!(result.types[1].fields[0].getter, "Second_get_c");
    }

    #[test]
    fn test_methods_are_ignored() {
        let result = extract_source("UCLASS() class A { UFUNCTION() void jump(); UPROPERTY() int x; };");
        assert!(result.types[0].methods.is_empty());
        assert_eq!(result.types[0].fields.len(), 1);
        assert!(matches!(
            result.diagnostics.as_slice(),
            [ExtractDiagnostic::MethodIgnored { .. }]
        ));
    }

    #[test]
    fn test_marker_without_declaration() {
        let result = extract_source("UCLASS()");
        assert!(result.types.is_empty());
        assert!(matches!(
            result.diagnostics.as_slice(),
            [ExtractDiagnostic::MissingTypeName { .. }]
        ));

        let result = extract_source("UCLASS() UCLASS() class B {};");
        assert_eq!(result.types.len(), 1);
        assert_eq!(result.types[0].name, "B");
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn test_malformed_fields() {
        let result = extract_source("UCLASS() class A { UPROPERTY() health; UPROPERTY( int x; };");
        assert!(result.types[0].fields.is_empty());
        assert!(result
            .diagnostics
            .iter()
            .all(|d| matches!(d, ExtractDiagnostic::MalformedField { .. })));
        assert_eq!(result.diagnostics.len(), 2);
    }

    #[test]
    fn test_unannotated_source() {
        let result = extract_source("class Plain { int x; };");
        assert!(result.types.is_empty());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let source = "UCLASS() class A { UPROPERTY() int x; UPROPERTY() size_t y; };";
        assert_eq!(extract_source(source), extract_source(source));
    }
}
