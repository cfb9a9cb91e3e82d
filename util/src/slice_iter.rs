use ast::{DebugToken, Name, Pos, Token, Type};
use std::fmt::{self, Debug, Formatter};
use std::iter::Iterator;

/// Byte cursor over source text that keeps track of line and column.
#[derive(Clone)]
pub struct SliceIter<'a> {
    rest: &'a [u8],
    pos: Pos,
}

impl Iterator for SliceIter<'_> {
    type Item = u8;
    fn next(&mut self) -> Option<u8> {
        let (&first, rest) = self.rest.split_first()?;
        self.rest = rest;
        if first == b'\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        Some(first)
    }
}

impl<'a> SliceIter<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            rest: bytes,
            pos: Pos::new(1, 1),
        }
    }

    pub const fn as_bytes(&self) -> &'a [u8] {
        self.rest
    }

    pub const fn pos(&self) -> Pos {
        self.pos
    }

    pub fn peek(&self) -> Option<u8> {
        self.rest.first().copied()
    }

    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            self.next();
        }
    }

    pub fn next_if(&mut self, f: impl Fn(u8) -> bool) -> Option<u8> {
        let next = self.peek()?;
        if f(next) {
            self.next()
        } else {
            None
        }
    }

    /// Consumes bytes while `f` holds and returns them.
    pub fn take_while(&mut self, f: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.rest;
        let mut len = 0;
        while self.next_if(&f).is_some() {
            len += 1;
        }
        &start[..len]
    }
}

pub struct TokenIter {
    tokens: std::vec::IntoIter<DebugToken>,
    end: Pos,
}

impl Debug for TokenIter {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.peek() {
            Some(t) => write!(f, "TokenIter{{{t:?}}}"),
            None => write!(f, "TokenIter{{_}}"),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Expected {
    #[error("{0}: unexpected end of input")]
    Eof(Pos),
    #[error("{pos}: expected identifier, got {got}")]
    Identifier { got: Token, pos: Pos },
    #[error("{pos}: expected {expected}, got {got}")]
    Token {
        expected: Token,
        got: Token,
        pos: Pos,
    },
    #[error("{pos}: expected type, got {got}")]
    Type { got: Token, pos: Pos },
}

impl TokenIter {
    pub fn new(tokens: Box<[DebugToken]>) -> Self {
        let end = tokens.last().map(DebugToken::pos).unwrap_or_default();
        let tokens: Vec<DebugToken> = tokens.into();
        Self {
            tokens: tokens.into_iter(),
            end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.peek().is_none()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.as_slice().first().map(|t| &t.token)
    }

    /// Position of the next token, or of the last one at end of input.
    pub fn peek_pos(&self) -> Pos {
        self.tokens
            .as_slice()
            .first()
            .map_or(self.end, DebugToken::pos)
    }

    pub fn peek_any(&self) -> Result<&Token, Expected> {
        self.peek().ok_or(Expected::Eof(self.end))
    }

    pub fn next_if(&mut self, f: impl Fn(&Token) -> bool) -> Option<DebugToken> {
        let next = self.peek()?;
        if f(next) {
            self.next()
        } else {
            None
        }
    }

    pub fn consume_any(&mut self) -> Result<DebugToken, Expected> {
        let end = self.end;
        self.next().ok_or(Expected::Eof(end))
    }

    pub fn consume(&mut self, token: impl Into<Token>) -> Result<Pos, Expected> {
        let expected = token.into();
        let got = self.consume_any()?;
        if got.token == expected {
            Ok(got.pos)
        } else {
            Err(Expected::Token {
                expected,
                got: got.token,
                pos: got.pos,
            })
        }
    }

    pub fn consume_identifier(&mut self) -> Result<Name, Expected> {
        match self.consume_any()?.into_inner() {
            (Token::Ident(ident), pos) => Ok(Name { ident, pos }),
            (got, pos) => Err(Expected::Identifier { got, pos }),
        }
    }

    pub fn consume_type(&mut self) -> Result<Type, Expected> {
        let (got, pos) = self.consume_any()?.into_inner();
        got.type_name().ok_or(Expected::Type { got, pos })
    }
}

impl Iterator for TokenIter {
    type Item = DebugToken;
    fn next(&mut self) -> Option<DebugToken> {
        self.tokens.next()
    }
}
