mod typecheck;

use crate::builtins;
use ast::parse::Program as AstProgram;
use ast::typed;
use ast::{Bop, Ident, Pos, Signature, Type};
use symtab::SymbolTable;
use tracing::debug;

use typecheck::typecheck_function;

/// Validates a parsed program and produces its typed form.
///
/// Every signature (builtins first, then user functions in order) is
/// registered before any body is looked at, so functions may call functions
/// defined later in the file. The first error found aborts the analysis.
pub fn check(program: &AstProgram) -> Result<typed::Program, Error> {
    let mut table = SymbolTable::new();
    for (name, sig) in builtins::signatures() {
        table
            .add_function(name.into(), sig)
            .map_err(|e| Error::from_table(e, Pos::default()))?;
    }

    for f in &program.0 {
        let sig = Signature::new(f.ret, f.params.iter().map(|p| p.ty).collect::<Vec<_>>());
        table
            .add_function(f.name.ident.clone(), sig)
            .map_err(|e| Error::from_table(e, f.name.pos))?;
    }
    debug!(functions = program.0.len(), "registered signatures");

    match table.lookup_function("main") {
        Ok(sig) if sig.arity() == 0 && sig.ret == Type::Void => {}
        _ => return Err(Error::InvalidMain),
    }

    let mut functions = Vec::with_capacity(program.0.len());
    for f in &program.0 {
        functions.push(typecheck_function(f, &mut table)?);
    }
    Ok(typed::Program(functions.into()))
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    #[error("{pos}: undefined function {name}")]
    UndefinedFunction { name: Ident, pos: Pos },
    #[error("{pos}: undefined variable {name}")]
    UndefinedVariable { name: Ident, pos: Pos },
    #[error("{pos}: function {name} is already defined")]
    DuplicateFunction { name: Ident, pos: Pos },
    #[error("{pos}: variable {name} is already declared in this scope")]
    DuplicateVariable { name: Ident, pos: Pos },
    #[error("{pos}: variable {name} cannot have type void")]
    VoidVariable { name: Ident, pos: Pos },
    #[error("{pos}: {name} expects {expected} arguments, got {actual}")]
    ArityMismatch {
        name: Ident,
        expected: usize,
        actual: usize,
        pos: Pos,
    },
    #[error("{pos}: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: Type,
        actual: Type,
        pos: Pos,
    },
    #[error("program must define void main()")]
    InvalidMain,
    #[error("{pos}: cannot compare {left} {op} {right}")]
    IllTypedComparison {
        op: Bop,
        left: Type,
        right: Type,
        pos: Pos,
    },
    #[error("{pos}: {op} needs bool operands, got {left} and {right}")]
    IllTypedLogical {
        op: Bop,
        left: Type,
        right: Type,
        pos: Pos,
    },
    #[error("{pos}: arithmetic on non-numerical type {ty}")]
    NonNumericalArithmetic { ty: Type, pos: Pos },
    #[error("{pos}: cannot increment or decrement a variable of type {ty}")]
    NonNumericalIncrDecr { ty: Type, pos: Pos },
}

impl Error {
    fn from_table(e: symtab::Error, pos: Pos) -> Self {
        match e {
            symtab::Error::DuplicateFunction(name) => Self::DuplicateFunction { name, pos },
            symtab::Error::UndefinedFunction(name) => Self::UndefinedFunction { name, pos },
            symtab::Error::DuplicateVariable(name) => Self::DuplicateVariable { name, pos },
            symtab::Error::UndefinedVariable(name) => Self::UndefinedVariable { name, pos },
            symtab::Error::VoidVariable(name) => Self::VoidVariable { name, pos },
            symtab::Error::NoScope => unreachable!("variables are only declared inside functions"),
        }
    }

    pub const fn pos(&self) -> Option<Pos> {
        match self {
            Self::UndefinedFunction { pos, .. }
            | Self::UndefinedVariable { pos, .. }
            | Self::DuplicateFunction { pos, .. }
            | Self::DuplicateVariable { pos, .. }
            | Self::VoidVariable { pos, .. }
            | Self::ArityMismatch { pos, .. }
            | Self::TypeMismatch { pos, .. }
            | Self::IllTypedComparison { pos, .. }
            | Self::IllTypedLogical { pos, .. }
            | Self::NonNumericalArithmetic { pos, .. }
            | Self::NonNumericalIncrDecr { pos, .. } => Some(*pos),
            Self::InvalidMain => None,
        }
    }
}
