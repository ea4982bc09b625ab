//! Tokenizer for the JavaScript subset used by navigation tree scripts.
//!
//! Recognizes `var` declarations of literals: strings (single or double
//! quoted), non-negative integers, `null`, arrays and objects. Block
//! comments are kept as tokens so the parser can preserve the header
//! comment; line comments are dropped.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{ParseError, ParseErrorKind};

/// Token kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// `var` keyword.
    Var,
    /// Identifier (declaration name).
    Ident(String),
    /// String literal with escapes resolved.
    Str(String),
    /// Non-negative integer literal.
    Int(u64),
    /// `null` keyword.
    Null,
    /// Block comment body without `/*` and `*/`.
    Comment(String),
    Eq,
    Semi,
    Comma,
    Colon,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Short description used in error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Var => "`var`".to_owned(),
            Self::Ident(name) => format!("identifier `{name}`"),
            Self::Str(_) => "string".to_owned(),
            Self::Int(n) => format!("integer {n}"),
            Self::Null => "`null`".to_owned(),
            Self::Comment(_) => "comment".to_owned(),
            Self::Eq => "`=`".to_owned(),
            Self::Semi => "`;`".to_owned(),
            Self::Comma => "`,`".to_owned(),
            Self::Colon => "`:`".to_owned(),
            Self::LBracket => "`[`".to_owned(),
            Self::RBracket => "`]`".to_owned(),
            Self::LBrace => "`{`".to_owned(),
            Self::RBrace => "`}`".to_owned(),
            Self::Eof => "end of input".to_owned(),
        }
    }
}

/// Token with its 1-based source location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

/// Split `source` into tokens, ending with [`TokenKind::Eof`].
pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer {
        chars: source.chars().peekable(),
        line: 1,
        column: 1,
    };
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

impl Lexer<'_> {
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, kind: ParseErrorKind, line: usize, column: usize) -> ParseError {
        ParseError { kind, line, column }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        loop {
            while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
                self.bump();
            }

            let (line, column) = (self.line, self.column);
            let Some(c) = self.bump() else {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    line,
                    column,
                });
            };

            let kind = match c {
                '=' => TokenKind::Eq,
                ';' => TokenKind::Semi,
                ',' => TokenKind::Comma,
                ':' => TokenKind::Colon,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                '"' | '\'' => TokenKind::Str(self.string(c, line, column)?),
                '/' => match self.chars.peek() {
                    Some('*') => {
                        self.bump();
                        TokenKind::Comment(self.block_comment(line, column)?)
                    }
                    Some('/') => {
                        while self.chars.peek().is_some_and(|&c| c != '\n') {
                            self.bump();
                        }
                        continue;
                    }
                    _ => return Err(self.error(ParseErrorKind::UnexpectedChar('/'), line, column)),
                },
                '0'..='9' => TokenKind::Int(self.integer(c, line, column)?),
                c if is_ident_start(c) => {
                    let mut word = String::from(c);
                    while let Some(&next) = self.chars.peek() {
                        if !is_ident_continue(next) {
                            break;
                        }
                        word.push(next);
                        self.bump();
                    }
                    match word.as_str() {
                        "var" => TokenKind::Var,
                        "null" => TokenKind::Null,
                        _ => TokenKind::Ident(word),
                    }
                }
                other => return Err(self.error(ParseErrorKind::UnexpectedChar(other), line, column)),
            };

            return Ok(Token { kind, line, column });
        }
    }

    fn block_comment(&mut self, line: usize, column: usize) -> Result<String, ParseError> {
        let mut body = String::new();
        loop {
            match self.bump() {
                Some('*') if self.chars.peek() == Some(&'/') => {
                    self.bump();
                    return Ok(body);
                }
                Some(c) => body.push(c),
                None => {
                    return Err(self.error(ParseErrorKind::UnterminatedComment, line, column));
                }
            }
        }
    }

    fn integer(&mut self, first: char, line: usize, column: usize) -> Result<u64, ParseError> {
        let mut value = u64::from(first.to_digit(10).unwrap_or_default());
        while let Some(digit) = self.chars.peek().and_then(|c| c.to_digit(10)) {
            self.bump();
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(digit)))
                .ok_or_else(|| self.error(ParseErrorKind::IntegerOverflow, line, column))?;
        }
        Ok(value)
    }

    fn string(&mut self, quote: char, line: usize, column: usize) -> Result<String, ParseError> {
        let mut value = String::new();
        loop {
            let (esc_line, esc_column) = (self.line, self.column);
            match self.bump() {
                None | Some('\n') => {
                    return Err(self.error(ParseErrorKind::UnterminatedString, line, column));
                }
                Some(c) if c == quote => return Ok(value),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('u') => self.unicode_escape(esc_line, esc_column)?,
                        Some(c @ ('\\' | '"' | '\'' | '/')) => c,
                        Some(other) => {
                            return Err(self.error(
                                ParseErrorKind::InvalidEscape(format!("\\{other}")),
                                esc_line,
                                esc_column,
                            ));
                        }
                        None => {
                            return Err(self.error(ParseErrorKind::UnterminatedString, line, column));
                        }
                    };
                    value.push(escaped);
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn unicode_escape(&mut self, line: usize, column: usize) -> Result<char, ParseError> {
        let mut hex = String::with_capacity(4);
        for _ in 0..4 {
            match self.chars.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(*c);
                    self.bump();
                }
                _ => break,
            }
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .filter(|_| hex.len() == 4)
            .and_then(char::from_u32)
            .ok_or_else(|| {
                self.error(
                    ParseErrorKind::InvalidEscape(format!("\\u{hex}")),
                    line,
                    column,
                )
            })
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_declaration_tokens() {
        assert_eq!(
            kinds("var NAVTREE = [ \"A\", null ];"),
            vec![
                TokenKind::Var,
                TokenKind::Ident("NAVTREE".to_owned()),
                TokenKind::Eq,
                TokenKind::LBracket,
                TokenKind::Str("A".to_owned()),
                TokenKind::Comma,
                TokenKind::Null,
                TokenKind::RBracket,
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_single_quoted_string_with_apostrophe_escape() {
        assert_eq!(
            kinds(r"'EAR\'s flags'"),
            vec![TokenKind::Str("EAR's flags".to_owned()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_double_quoted_string_keeps_single_quote() {
        assert_eq!(
            kinds(r#""Disabling EAR's affinity masks usage""#),
            vec![
                TokenKind::Str("Disabling EAR's affinity masks usage".to_owned()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_escapes() {
        assert_eq!(
            kinds(r#""a\"b\\c\/d\né""#),
            vec![TokenKind::Str("a\"b\\c/d\né".to_owned()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_block_comment_kept_line_comment_dropped() {
        assert_eq!(
            kinds("/* header */\n// note\n{ }"),
            vec![
                TokenKind::Comment(" header ".to_owned()),
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_integers_and_object_punctuation() {
        assert_eq!(
            kinds("{\"a\":[0,12]}"),
            vec![
                TokenKind::LBrace,
                TokenKind::Str("a".to_owned()),
                TokenKind::Colon,
                TokenKind::LBracket,
                TokenKind::Int(0),
                TokenKind::Comma,
                TokenKind::Int(12),
                TokenKind::RBracket,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_token_locations() {
        let tokens = tokenize("var\n  X").unwrap();

        assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("var X = \"abc").unwrap_err();

        assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
        assert_eq!((err.line, err.column), (1, 9));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = tokenize("/* never closed").unwrap_err();

        assert_eq!(err.kind, ParseErrorKind::UnterminatedComment);
    }

    #[test]
    fn test_invalid_escape() {
        let err = tokenize(r#""\x41""#).unwrap_err();

        assert_eq!(err.kind, ParseErrorKind::InvalidEscape("\\x".to_owned()));
    }

    #[test]
    fn test_short_unicode_escape() {
        let err = tokenize(r#""\u12""#).unwrap_err();

        assert_eq!(err.kind, ParseErrorKind::InvalidEscape("\\u12".to_owned()));
    }

    #[test]
    fn test_unexpected_char() {
        let err = tokenize("var X = @").unwrap_err();

        assert_eq!(err.kind, ParseErrorKind::UnexpectedChar('@'));
        assert_eq!(err.column, 9);
    }

    #[test]
    fn test_integer_overflow() {
        let err = tokenize("99999999999999999999999").unwrap_err();

        assert_eq!(err.kind, ParseErrorKind::IntegerOverflow);
    }
}
