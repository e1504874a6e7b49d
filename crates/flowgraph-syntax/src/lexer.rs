//! A hand-rolled, single-pass lexer over `&str`, producing a flat `Vec<Token>`
//! ahead of parsing. No streaming, no parser-combinator dependency.

use crate::error::LexError;
use crate::span::Span;
use crate::token::{keyword, Token, TokenKind};

pub struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let start = self.pos;
            let Some(ch) = self.peek() else {
                tokens.push(Token::new(TokenKind::Eof, Span::new(start, start)));
                break;
            };

            let kind = if ch == '-' && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
                self.lex_number()?
            } else if ch.is_ascii_digit() {
                self.lex_number()?
            } else if ch == '"' {
                self.lex_string()?
            } else if is_ident_start(ch) {
                self.lex_ident_or_keyword()
            } else {
                self.lex_punct()?
            };

            let span = Span::new(start, self.pos);
            tokens.push(Token::new(kind, span));
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_at(&self, offset_chars: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(offset_chars)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_number(&mut self) -> Result<TokenKind, LexError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        let mut is_float = false;
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        let text = &self.src[start..self.pos];
        if is_float {
            Ok(TokenKind::Float(text.parse().expect("lexer produced a valid float literal")))
        } else {
            Ok(TokenKind::Int(text.parse().expect("lexer produced a valid int literal")))
        }
    }

    fn lex_string(&mut self) -> Result<TokenKind, LexError> {
        let start = self.pos;
        self.bump(); // opening quote
        let mut out = String::new();
        loop {
            match self.bump() {
                None => {
                    return Err(LexError::UnterminatedString {
                        span: Span::new(start, self.pos),
                    })
                }
                Some('"') => break,
                Some('\\') => {
                    let esc_start = self.pos - 1;
                    match self.bump() {
                        Some('"') => out.push('"'),
                        Some('\\') => out.push('\\'),
                        Some('n') => out.push('\n'),
                        Some(other) => {
                            return Err(LexError::InvalidEscape {
                                ch: other,
                                span: Span::new(esc_start, self.pos),
                            })
                        }
                        None => {
                            return Err(LexError::UnterminatedString {
                                span: Span::new(start, self.pos),
                            })
                        }
                    }
                }
                Some(c) => out.push(c),
            }
        }
        Ok(TokenKind::Str(out))
    }

    fn lex_ident_or_keyword(&mut self) -> TokenKind {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
        let text = &self.src[start..self.pos];
        keyword(text).unwrap_or_else(|| TokenKind::Ident(text.to_string()))
    }

    fn lex_punct(&mut self) -> Result<TokenKind, LexError> {
        let start = self.pos;
        let ch = self.bump().expect("caller already peeked a character");
        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '<' => TokenKind::LAngle,
            '>' => TokenKind::RAngle,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            '=' => TokenKind::Eq,
            '!' => TokenKind::Bang,
            ':' => {
                if self.peek() == Some(':') {
                    self.bump();
                    TokenKind::ColonColon
                } else {
                    TokenKind::Colon
                }
            }
            '-' if self.peek() == Some('>') => {
                self.bump();
                TokenKind::Arrow
            }
            other => {
                return Err(LexError::UnrecognizedChar {
                    ch: other,
                    span: Span::new(start, self.pos),
                })
            }
        };
        Ok(kind)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience wrapper matching the other stages' `fn(&str) -> Result<_, _>`
/// shape.
pub fn lex(src: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(src).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_identifiers_and_keywords() {
        assert_eq!(
            kinds("foo if Int"),
            vec![
                TokenKind::Ident("foo".into()),
                TokenKind::KwIf,
                TokenKind::TyInt,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lexes_negative_and_positive_numbers() {
        assert_eq!(
            kinds("-12 34 -1.5 2.0"),
            vec![
                TokenKind::Int(-12),
                TokenKind::Int(34),
                TokenKind::Float(-1.5),
                TokenKind::Float(2.0),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn integer_without_decimal_point_never_becomes_float() {
        assert_eq!(kinds("7"), vec![TokenKind::Int(7), TokenKind::Eof]);
    }

    #[test]
    fn lexes_string_with_escapes() {
        assert_eq!(
            kinds(r#""a\"b\\c\nd""#),
            vec![TokenKind::Str("a\"b\\c\nd".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(matches!(
            lex("\"abc"),
            Err(LexError::UnterminatedString { .. })
        ));
    }

    #[test]
    fn invalid_escape_is_an_error() {
        assert!(matches!(
            lex(r#""a\qb""#),
            Err(LexError::InvalidEscape { ch: 'q', .. })
        ));
    }

    #[test]
    fn skips_line_comments() {
        assert_eq!(
            kinds("a // comment\nb"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Ident("b".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lexes_multi_char_punctuation() {
        assert_eq!(
            kinds("-> :: . !"),
            vec![
                TokenKind::Arrow,
                TokenKind::ColonColon,
                TokenKind::Dot,
                TokenKind::Bang,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn unrecognized_character_is_an_error() {
        assert!(matches!(
            lex("a @ b"),
            Err(LexError::UnrecognizedChar { ch: '@', .. })
        ));
    }

    #[test]
    fn true_false_are_keywords_not_identifiers() {
        assert_eq!(kinds("true false"), vec![TokenKind::True, TokenKind::False, TokenKind::Eof]);
    }
}
