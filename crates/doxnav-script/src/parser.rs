//! Parser for `var NAME = LITERAL;` scripts.
//!
//! Produces a [`Script`]: the header comment plus every declaration in
//! source order. Values stay untyped ([`Value`]) until decoded.

use std::iter::Peekable;
use std::vec::IntoIter;

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Token, TokenKind, tokenize};

/// Maximum literal nesting accepted by the parser.
pub const MAX_DEPTH: usize = 256;

/// Literal value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Null,
    Str(String),
    Int(u64),
    Array(Vec<Value>),
    /// Object entries in source order.
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Kind of value, for error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Str(_) => "a string",
            Self::Int(_) => "an integer",
            Self::Array(_) => "an array",
            Self::Object(_) => "an object",
        }
    }
}

/// A single `var NAME = VALUE;` declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Variable name.
    pub name: String,
    /// Assigned literal.
    pub value: Value,
    /// Line of the `var` keyword.
    pub line: usize,
}

/// Parsed script.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    /// Block comment before the first declaration.
    pub header: Option<String>,
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
}

impl Script {
    /// Value of the first declaration named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.declarations
            .iter()
            .find(|d| d.name == name)
            .map(|d| &d.value)
    }
}

/// Parse a navigation tree script.
///
/// # Example
///
/// ```
/// use doxnav_script::{Value, parse};
///
/// let script = parse("var SYNCONMSG = 'on';").unwrap();
/// assert_eq!(script.get("SYNCONMSG"), Some(&Value::Str("on".to_owned())));
/// ```
pub fn parse(source: &str) -> Result<Script, ParseError> {
    let tokens = tokenize(source)?;
    Parser {
        tokens: tokens.into_iter().peekable(),
    }
    .script()
}

struct Parser {
    tokens: Peekable<IntoIter<Token>>,
}

impl Parser {
    /// Next significant token. Comments are skipped.
    fn next(&mut self) -> Token {
        loop {
            match self.tokens.next() {
                Some(Token {
                    kind: TokenKind::Comment(_),
                    ..
                }) => {}
                Some(token) => return token,
                // tokenize always ends with Eof; repeat it if asked again
                None => {
                    return Token {
                        kind: TokenKind::Eof,
                        line: 0,
                        column: 0,
                    };
                }
            }
        }
    }

    fn peek_kind(&mut self) -> Option<&TokenKind> {
        while matches!(
            self.tokens.peek(),
            Some(Token {
                kind: TokenKind::Comment(_),
                ..
            })
        ) {
            self.tokens.next();
        }
        self.tokens.peek().map(|t| &t.kind)
    }

    fn unexpected(token: &Token, expected: &'static str) -> ParseError {
        ParseError {
            kind: ParseErrorKind::UnexpectedToken {
                expected,
                found: token.kind.describe(),
            },
            line: token.line,
            column: token.column,
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        let token = self.next();
        if &token.kind == kind {
            Ok(token)
        } else {
            Err(Self::unexpected(&token, expected))
        }
    }

    fn script(mut self) -> Result<Script, ParseError> {
        let header = match self.tokens.peek() {
            Some(Token {
                kind: TokenKind::Comment(body),
                ..
            }) => {
                let body = body.clone();
                self.tokens.next();
                Some(body)
            }
            _ => None,
        };

        let mut declarations = Vec::new();
        loop {
            let token = self.next();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Semi => {}
                TokenKind::Var => declarations.push(self.declaration(token.line)?),
                _ => return Err(Self::unexpected(&token, "`var`")),
            }
        }

        Ok(Script {
            header,
            declarations,
        })
    }

    fn declaration(&mut self, line: usize) -> Result<Declaration, ParseError> {
        let token = self.next();
        let TokenKind::Ident(name) = token.kind else {
            return Err(Self::unexpected(&token, "variable name"));
        };
        self.expect(&TokenKind::Eq, "`=`")?;
        let value = self.value(0)?;
        self.expect(&TokenKind::Semi, "`;`")?;
        Ok(Declaration { name, value, line })
    }

    fn value(&mut self, depth: usize) -> Result<Value, ParseError> {
        let token = self.next();
        if depth > MAX_DEPTH {
            return Err(ParseError {
                kind: ParseErrorKind::TooDeep(MAX_DEPTH),
                line: token.line,
                column: token.column,
            });
        }
        match token.kind {
            TokenKind::Null => Ok(Value::Null),
            TokenKind::Str(s) => Ok(Value::Str(s)),
            TokenKind::Int(n) => Ok(Value::Int(n)),
            TokenKind::LBracket => self.array(depth),
            TokenKind::LBrace => self.object(depth),
            _ => Err(Self::unexpected(&token, "a value")),
        }
    }

    fn array(&mut self, depth: usize) -> Result<Value, ParseError> {
        let mut items = Vec::new();
        loop {
            if self.peek_kind() == Some(&TokenKind::RBracket) {
                self.next();
                return Ok(Value::Array(items));
            }
            items.push(self.value(depth + 1)?);
            let token = self.next();
            match token.kind {
                TokenKind::Comma => {}
                TokenKind::RBracket => return Ok(Value::Array(items)),
                _ => return Err(Self::unexpected(&token, "`,` or `]`")),
            }
        }
    }

    fn object(&mut self, depth: usize) -> Result<Value, ParseError> {
        let mut entries = Vec::new();
        loop {
            let token = self.next();
            let key = match token.kind {
                TokenKind::RBrace => return Ok(Value::Object(entries)),
                TokenKind::Str(key) | TokenKind::Ident(key) => key,
                _ => return Err(Self::unexpected(&token, "object key")),
            };
            self.expect(&TokenKind::Colon, "`:`")?;
            entries.push((key, self.value(depth + 1)?));
            let token = self.next();
            match token.kind {
                TokenKind::Comma => {}
                TokenKind::RBrace => return Ok(Value::Object(entries)),
                _ => return Err(Self::unexpected(&token, "`,` or `}`")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_header_and_declarations() {
        let script = parse("/* license */\nvar A =\n[\n  \"x\", null\n];\n\nvar B = 'y';").unwrap();

        assert_eq!(script.header.as_deref(), Some(" license "));
        assert_eq!(
            script.declarations,
            vec![
                Declaration {
                    name: "A".to_owned(),
                    value: Value::Array(vec![Value::Str("x".to_owned()), Value::Null]),
                    line: 2,
                },
                Declaration {
                    name: "B".to_owned(),
                    value: Value::Str("y".to_owned()),
                    line: 7,
                },
            ]
        );
    }

    #[test]
    fn test_parse_without_header() {
        let script = parse("var A = null;").unwrap();

        assert_eq!(script.header, None);
        assert_eq!(script.get("A"), Some(&Value::Null));
    }

    #[test]
    fn test_comment_after_declaration_is_not_header() {
        let script = parse("var A = null;\n/* trailing */").unwrap();

        assert_eq!(script.header, None);
        assert_eq!(script.declarations.len(), 1);
    }

    #[test]
    fn test_parse_nested_arrays_with_trailing_comma() {
        let script = parse("var A = [ [ \"t\", \"h\", [ ] ], ];").unwrap();

        assert_eq!(
            script.get("A"),
            Some(&Value::Array(vec![Value::Array(vec![
                Value::Str("t".to_owned()),
                Value::Str("h".to_owned()),
                Value::Array(Vec::new()),
            ])]))
        );
    }

    #[test]
    fn test_parse_object() {
        let script = parse("var NAVTREEINDEX0 =\n{\n\"index.html\":[0],\n\"a.html\":[0,3]\n};").unwrap();

        assert_eq!(
            script.get("NAVTREEINDEX0"),
            Some(&Value::Object(vec![
                ("index.html".to_owned(), Value::Array(vec![Value::Int(0)])),
                (
                    "a.html".to_owned(),
                    Value::Array(vec![Value::Int(0), Value::Int(3)])
                ),
            ]))
        );
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse("var A = null\nvar B = null;").unwrap_err();

        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                expected: "`;`",
                found: "`var`".to_owned(),
            }
        );
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_missing_comma_in_array() {
        let err = parse("var A = [ \"a\" \"b\" ];").unwrap_err();

        assert!(matches!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                expected: "`,` or `]`",
                ..
            }
        ));
    }

    #[test]
    fn test_statement_other_than_var_is_rejected() {
        let err = parse("NAVTREE = [];").unwrap_err();

        assert!(err.to_string().contains("expected `var`"));
    }

    #[test]
    fn test_unclosed_array() {
        let err = parse("var A = [ null,").unwrap_err();

        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
    }

    #[test]
    fn test_nesting_limit() {
        let source = format!("var A = {}{};", "[".repeat(MAX_DEPTH + 2), "]".repeat(MAX_DEPTH + 2));

        let err = parse(&source).unwrap_err();

        assert_eq!(err.kind, ParseErrorKind::TooDeep(MAX_DEPTH));
    }
}
