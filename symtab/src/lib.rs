use ast::typed::VarId;
use ast::{Ident, Signature, Type};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Variable {
    pub id: VarId,
    pub ty: Type,
}

/// Function signatures for the whole program plus the lexical scopes of the
/// function currently being checked.
#[derive(Debug, Default)]
pub struct SymbolTable {
    functions: HashMap<Ident, Signature>,
    scopes: Vec<HashMap<Ident, Variable>>,
    next_var: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_function(&mut self, name: Ident, sig: Signature) -> Result<(), Error> {
        match self.functions.entry(name) {
            Entry::Occupied(e) => Err(Error::DuplicateFunction(e.key().clone())),
            Entry::Vacant(e) => {
                e.insert(sig);
                Ok(())
            }
        }
    }

    pub fn lookup_function(&self, name: &str) -> Result<&Signature, Error> {
        self.functions
            .get(name)
            .ok_or_else(|| Error::UndefinedFunction(name.into()))
    }

    /// Drops every open scope and restarts variable numbering.
    pub fn enter_function(&mut self) {
        self.scopes.clear();
        self.next_var = 0;
        self.push_scope();
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn declare_variable(&mut self, ty: Type, name: Ident) -> Result<VarId, Error> {
        if ty == Type::Void {
            return Err(Error::VoidVariable(name));
        }
        let id = VarId(self.next_var);
        let scope = self.scopes.last_mut().ok_or(Error::NoScope)?;
        match scope.entry(name) {
            Entry::Occupied(e) => Err(Error::DuplicateVariable(e.key().clone())),
            Entry::Vacant(e) => {
                e.insert(Variable { id, ty });
                self.next_var += 1;
                Ok(id)
            }
        }
    }

    pub fn resolve_variable(&self, name: &str) -> Result<Variable, Error> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .copied()
            .ok_or_else(|| Error::UndefinedVariable(name.into()))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("function {0} is already defined")]
    DuplicateFunction(Ident),
    #[error("undefined function {0}")]
    UndefinedFunction(Ident),
    #[error("variable {0} is already declared in this scope")]
    DuplicateVariable(Ident),
    #[error("undefined variable {0}")]
    UndefinedVariable(Ident),
    #[error("variable {0} declared void")]
    VoidVariable(Ident),
    #[error("variable declared outside of any scope")]
    NoScope,
}
