use super::{Constant, Ident, Pos, Type};
use std::fmt::{Display, Formatter};

#[derive(PartialEq, Debug, Clone)]
pub enum Token {
    // Keywords
    Bool,
    Int,
    Double,
    String,
    Void,
    If,
    Else,
    While,
    For,
    Return,

    Const(Constant),
    Ident(Ident),
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Semicolon,
    Comma,

    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    Increment,
    Decrement,
    LogicalAnd,
    LogicalOr,
    EqualTo,
    NotEqual,
    LessThan,
    GreaterThan,
    Leq,
    Geq,
    Equals,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        use Token::*;
        f.write_str(match self {
            Bool => "bool",
            Int => "int",
            Double => "double",
            String => "string",
            Void => "void",
            If => "if",
            Else => "else",
            While => "while",
            For => "for",
            Return => "return",
            Const(c) => return write!(f, "{c}"),
            Ident(ident) => return write!(f, "{ident}"),
            OpenParen => "(",
            CloseParen => ")",
            OpenBrace => "{",
            CloseBrace => "}",
            Semicolon => ";",
            Comma => ",",
            Plus => "+",
            Minus => "-",
            Asterisk => "*",
            Slash => "/",
            Percent => "%",
            Increment => "++",
            Decrement => "--",
            LogicalAnd => "&&",
            LogicalOr => "||",
            EqualTo => "==",
            NotEqual => "!=",
            LessThan => "<",
            GreaterThan => ">",
            Leq => "<=",
            Geq => ">=",
            Equals => "=",
        })
    }
}

impl Token {
    pub const fn type_name(&self) -> Option<Type> {
        match self {
            Self::Bool => Some(Type::Bool),
            Self::Int => Some(Type::Int),
            Self::Double => Some(Type::Double),
            Self::String => Some(Type::String),
            Self::Void => Some(Type::Void),
            _ => None,
        }
    }
}

/// A token and the position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugToken {
    pub token: Token,
    pub pos: Pos,
}

impl DebugToken {
    pub fn into_inner(self) -> (Token, Pos) {
        (self.token, self.pos)
    }

    pub const fn pos(&self) -> Pos {
        self.pos
    }
}

impl std::ops::Deref for DebugToken {
    type Target = Token;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl From<DebugToken> for Token {
    fn from(debug: DebugToken) -> Token {
        debug.token
    }
}
