//! Untyped syntax tree, as produced by the parser.
use super::{Bop, Constant, IncDec, Name, Pos, Type, UnOp};

#[derive(Debug, Clone, PartialEq)]
pub struct Program(pub Box<[FnDef]>);

#[derive(Debug, Clone, PartialEq)]
pub struct FnDef {
    pub ret: Type,
    pub name: Name,
    pub params: Box<[Param]>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: Type,
    pub name: Name,
}

pub type Block = Box<[Stmnt]>;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmnt {
    Decl {
        ty: Type,
        names: Box<[Name]>,
    },
    Init {
        ty: Type,
        var: Name,
        init: Expr,
    },
    Exp(Expr),
    Ret {
        value: Option<Expr>,
        pos: Pos,
    },
    Compound(Block),
    While {
        condition: Expr,
        body: Box<Self>,
    },
    For {
        init: Option<Expr>,
        condition: Option<Expr>,
        step: Option<Expr>,
        body: Box<Self>,
    },
    If {
        condition: Expr,
        then: Box<Self>,
        r#else: Option<Box<Self>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const {
        c: Constant,
        pos: Pos,
    },
    Var(Name),
    Assignment {
        dst: Name,
        src: Box<Self>,
    },
    FunctionCall {
        name: Name,
        args: Box<[Self]>,
    },
    Bin(Binary),
    IncDec {
        op: IncDec,
        var: Name,
    },
    Unary(Unary),
    Nested(Box<Self>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub left: Box<Expr>,
    pub operator: Bop,
    pub right: Box<Expr>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub op: UnOp,
    pub exp: Box<Expr>,
    pub pos: Pos,
}

impl Expr {
    /// Position of the leftmost token of the expression.
    pub fn pos(&self) -> Pos {
        match self {
            Self::Const { pos, .. } => *pos,
            Self::Var(name)
            | Self::Assignment { dst: name, .. }
            | Self::FunctionCall { name, .. }
            | Self::IncDec { var: name, .. } => name.pos,
            Self::Bin(Binary { left, .. }) => left.pos(),
            Self::Unary(Unary { pos, .. }) => *pos,
            Self::Nested(inner) => inner.pos(),
        }
    }

    pub const fn as_lvalue(&self) -> Option<&Name> {
        match self {
            Self::Var(name) => Some(name),
            _ => None,
        }
    }
}
