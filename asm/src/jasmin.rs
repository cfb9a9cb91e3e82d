use ast::{Ident, Type};
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

/// Branch target, printed as `L<n>`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Label(pub u32);

impl Display for Label {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Arith {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
}

impl Display for Arith {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Rem => "rem",
            Self::And => "and",
            Self::Or => "or",
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CondCode {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Display for CondCode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Gt => "gt",
            Self::Le => "le",
            Self::Ge => "ge",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    IConst(i32),
    DConst(f64),
    SConst(Rc<str>),
    Load { ty: Type, slot: u16 },
    Store { ty: Type, slot: u16 },
    Arith { op: Arith, ty: Type },
    Neg(Type),
    I2d,
    /// `dcmpg`, NaN compares as 1.
    Dcmpg,
    /// `dcmpl`, NaN compares as -1.
    Dcmpl,
    IfIcmp { cond: CondCode, target: Label },
    If { cond: CondCode, target: Label },
    Goto(Label),
    Dup(Type),
    Pop(Type),
    Invoke {
        method: Ident,
        args: u16,
        ret: u16,
    },
    Return(Type),
    Label(Label),
}

const fn type_prefix(ty: Type) -> &'static str {
    match ty {
        Type::String => "a",
        Type::Double => "d",
        Type::Int | Type::Bool => "i",
        Type::Void => "",
    }
}

impl Instruction {
    /// Net change of the operand stack depth, in words.
    pub fn stack_effect(&self) -> i32 {
        let size = |ty: &Type| i32::from(ty.size());
        match self {
            Self::IConst(_) | Self::SConst(_) => 1,
            Self::DConst(_) => 2,
            Self::Load { ty, .. } | Self::Dup(ty) => size(ty),
            Self::Store { ty, .. } | Self::Pop(ty) | Self::Return(ty) => -size(ty),
            Self::Arith { ty, .. } => -size(ty),
            Self::Neg(_) | Self::Goto(_) | Self::Label(_) => 0,
            Self::I2d => 1,
            Self::Dcmpg | Self::Dcmpl => -3,
            Self::IfIcmp { .. } => -2,
            Self::If { .. } => -1,
            Self::Invoke { args, ret, .. } => i32::from(*ret) - i32::from(*args),
        }
    }

    pub const fn is_label(&self) -> bool {
        matches!(self, Self::Label(_))
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::IConst(-1) => f.write_str("iconst_m1"),
            Self::IConst(i @ 0..=5) => write!(f, "iconst_{i}"),
            Self::IConst(i @ -128..=127) => write!(f, "bipush {i}"),
            Self::IConst(i @ -32768..=32767) => write!(f, "sipush {i}"),
            Self::IConst(i) => write!(f, "ldc {i}"),
            Self::DConst(d) if *d == 0.0 && d.is_sign_positive() => f.write_str("dconst_0"),
            Self::DConst(d) if *d == 1.0 => f.write_str("dconst_1"),
            Self::DConst(d) => write!(f, "ldc2_w {}", DoubleLiteral(*d)),
            Self::SConst(s) => write!(f, "ldc {}", StringLiteral(s)),
            Self::Load { ty, slot } => write!(f, "{}load {slot}", type_prefix(*ty)),
            Self::Store { ty, slot } => write!(f, "{}store {slot}", type_prefix(*ty)),
            Self::Arith { op, ty } => write!(f, "{}{op}", type_prefix(*ty)),
            Self::Neg(ty) => write!(f, "{}neg", type_prefix(*ty)),
            Self::I2d => f.write_str("i2d"),
            Self::Dcmpg => f.write_str("dcmpg"),
            Self::Dcmpl => f.write_str("dcmpl"),
            Self::IfIcmp { cond, target } => write!(f, "if_icmp{cond} {target}"),
            Self::If { cond, target } => write!(f, "if{cond} {target}"),
            Self::Goto(target) => write!(f, "goto {target}"),
            Self::Dup(ty) => f.write_str(if ty.size() == 2 { "dup2" } else { "dup" }),
            Self::Pop(ty) => f.write_str(if ty.size() == 2 { "pop2" } else { "pop" }),
            Self::Invoke { method, .. } => write!(f, "invokestatic {method}"),
            Self::Return(ty) => write!(f, "{}return", type_prefix(*ty)),
            Self::Label(label) => write!(f, "{label}:"),
        }
    }
}

struct DoubleLiteral(f64);

impl Display for DoubleLiteral {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let text = format!("{:?}", self.0);
        match text.split_once('e') {
            Some((mantissa, exp)) if !mantissa.contains('.') => write!(f, "{mantissa}.0e{exp}"),
            _ => f.write_str(&text),
        }
    }
}

struct StringLiteral<'a>(&'a str);

impl Display for StringLiteral<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\t' => f.write_str("\\t")?,
                '\r' => f.write_str("\\r")?,
                c => write!(f, "{c}")?,
            }
        }
        f.write_str("\"")
    }
}
