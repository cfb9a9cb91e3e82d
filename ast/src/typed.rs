//! Typed tree produced by semantic analysis and consumed by code generation.
//!
//! Every expression carries its inferred type, implicit widenings appear as
//! explicit [`Expr::Cast`] nodes and every variable reference carries the
//! [`VarId`] of the declaration it resolved to.
use super::{Bop, Constant, IncDec, Ident, Signature, Type, UnOp};

/// Identity of a declared variable, unique within one function.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

impl std::fmt::Display for VarId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "var.{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program(pub Box<[FnDef]>);

#[derive(Debug, Clone, PartialEq)]
pub struct FnDef {
    pub name: Ident,
    pub sig: Signature,
    pub params: Box<[VarDec]>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDec {
    pub id: VarId,
    pub name: Ident,
    pub ty: Type,
}

pub type Block = Box<[Stmnt]>;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmnt {
    Decl(Box<[VarDec]>),
    Init {
        var: VarDec,
        init: Expr,
    },
    Exp(Expr),
    Ret(Option<Expr>),
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
    Const(Constant),
    Var {
        id: VarId,
        ty: Type,
    },
    Assignment {
        var: VarId,
        src: Box<Self>,
        ty: Type,
    },
    FunctionCall {
        name: Ident,
        args: Box<[Self]>,
        ty: Type,
    },
    Bin(Binary),
    IncDec {
        op: IncDec,
        var: VarId,
        ty: Type,
    },
    Unary(Unary),
    Cast {
        target: Type,
        exp: Box<Self>,
    },
}

/// `operand_ty` is the (already unified) type of both operands, `ty` the
/// type of the result.
#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub left: Box<Expr>,
    pub operator: Bop,
    pub right: Box<Expr>,
    pub operand_ty: Type,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub op: UnOp,
    pub exp: Box<Expr>,
    pub ty: Type,
}

impl Expr {
    pub const fn typ(&self) -> Type {
        match self {
            Self::Const(c) => c.ty(),
            Self::Var { ty, .. }
            | Self::Assignment { ty, .. }
            | Self::FunctionCall { ty, .. }
            | Self::Bin(Binary { ty, .. })
            | Self::IncDec { ty, .. }
            | Self::Unary(Unary { ty, .. }) => *ty,
            Self::Cast { target, .. } => *target,
        }
    }
}
