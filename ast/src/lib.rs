pub mod parse;
pub mod token;
pub mod typed;
pub mod types;

pub use token::{DebugToken, Token};
pub use types::{Signature, Type};

use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

pub type Ident = Rc<str>;

/// 1-based source location.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Display for Pos {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// An identifier together with where it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct Name {
    pub ident: Ident,
    pub pos: Pos,
}

impl Name {
    pub fn new(ident: impl Into<Ident>, pos: Pos) -> Self {
        Self {
            ident: ident.into(),
            pos,
        }
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.ident)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Constant {
    Bool(bool),
    Int(i32),
    Double(f64),
    Str(Rc<str>),
}

impl Constant {
    pub const fn ty(&self) -> Type {
        match self {
            Self::Bool(_) => Type::Bool,
            Self::Int(_) => Type::Int,
            Self::Double(_) => Type::Double,
            Self::Str(_) => Type::String,
        }
    }
}

impl Display for Constant {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Double(d) => write!(f, "{d:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Bop {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    LessThan,
    GreaterThan,
    Leq,
    Geq,
    EqualTo,
    NotEqual,
    LogAnd,
    LogOr,
    Equals,
}

impl Bop {
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Multiply | Self::Divide | Self::Remainder => 50,
            Self::Add | Self::Subtract => 45,
            Self::LessThan | Self::GreaterThan | Self::Leq | Self::Geq => 35,
            Self::EqualTo | Self::NotEqual => 30,
            Self::LogAnd => 10,
            Self::LogOr => 5,
            Self::Equals => 1,
        }
    }

    pub const fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide | Self::Remainder
        )
    }

    pub const fn is_relational(&self) -> bool {
        matches!(
            self,
            Self::LessThan
                | Self::GreaterThan
                | Self::Leq
                | Self::Geq
                | Self::EqualTo
                | Self::NotEqual
        )
    }

    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::LogAnd | Self::LogOr)
    }
}

impl Display for Bop {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Remainder => "%",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::Leq => "<=",
            Self::Geq => ">=",
            Self::EqualTo => "==",
            Self::NotEqual => "!=",
            Self::LogAnd => "&&",
            Self::LogOr => "||",
            Self::Equals => "=",
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IncDec {
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

impl IncDec {
    pub const fn is_post(&self) -> bool {
        matches!(self, Self::PostInc | Self::PostDec)
    }

    pub const fn is_inc(&self) -> bool {
        matches!(self, Self::PreInc | Self::PostInc)
    }
}

impl Display for IncDec {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(if self.is_inc() { "++" } else { "--" })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnOp {
    Negate,
}
