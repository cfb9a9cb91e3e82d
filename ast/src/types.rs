use std::fmt::{self, Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    String,
    Void,
    Int,
    Double,
}

impl Type {
    pub const fn is_numerical(&self) -> bool {
        matches!(self, Self::Int | Self::Double)
    }

    /// Identity, or the single implicit widening int -> double.
    pub const fn is_convertible_to(&self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Bool, Self::Bool)
                | (Self::String, Self::String)
                | (Self::Void, Self::Void)
                | (Self::Int, Self::Int)
                | (Self::Double, Self::Double)
                | (Self::Int, Self::Double)
        )
    }

    /// Storage size in machine words (local slots / operand stack entries).
    pub const fn size(&self) -> u16 {
        match self {
            Self::Double => 2,
            Self::Void => 0,
            Self::Bool | Self::String | Self::Int => 1,
        }
    }

    pub const fn descriptor(&self) -> &'static str {
        match self {
            Self::Bool => "Z",
            Self::String => "Ljava/lang/String;",
            Self::Void => "V",
            Self::Int => "I",
            Self::Double => "D",
        }
    }

    /// The wider of two numerical types.
    pub const fn common(self, other: Self) -> Self {
        match (self, other) {
            (Self::Double, _) | (_, Self::Double) => Self::Double,
            _ => self,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Void => "void",
            Self::Int => "int",
            Self::Double => "double",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub ret: Type,
    pub params: Box<[Type]>,
}

impl Signature {
    pub fn new(ret: Type, params: impl Into<Box<[Type]>>) -> Self {
        Self {
            ret,
            params: params.into(),
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// JVM method descriptor, e.g. `(ID)V`.
    pub fn descriptor(&self) -> String {
        let mut desc = String::from("(");
        for param in &self.params {
            desc.push_str(param.descriptor());
        }
        desc.push(')');
        desc.push_str(self.ret.descriptor());
        desc
    }

    pub fn params_size(&self) -> u16 {
        self.params.iter().map(Type::size).sum()
    }
}
