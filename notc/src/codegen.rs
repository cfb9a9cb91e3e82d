mod expression;
mod function;

use crate::builtins;
use ast::typed;
use ast::{Ident, Signature, Type};
use std::collections::HashMap;
use tracing::debug;

/// How to call a function: its fully qualified `Class/name(desc)` and the
/// stack words it consumes and produces.
#[derive(Debug, Clone)]
pub struct Callee {
    pub method: Ident,
    pub args: u16,
    pub ret: Type,
}

pub type CallTable = HashMap<Ident, Callee>;

fn callee(class_name: &str, name: &str, sig: &Signature) -> Callee {
    Callee {
        method: format!("{class_name}/{name}{}", sig.descriptor()).into(),
        args: sig.params_size(),
        ret: sig.ret,
    }
}

pub fn call_table(program: &typed::Program, class_name: &str) -> CallTable {
    let builtins = builtins::signatures().map(|(name, sig)| (Ident::from(name), sig));
    let user = program.0.iter().map(|f| (f.name.clone(), f.sig.clone()));
    builtins
        .chain(user)
        .map(|(name, sig)| {
            let callee = callee(class_name, &name, &sig);
            (name, callee)
        })
        .collect()
}

/// Produces the complete Jasmin module for a checked program.
pub fn generate(program: &typed::Program, class_name: &str) -> String {
    let mut text = builtins::boilerplate(class_name);
    let calls = call_table(program, class_name);
    for f in &program.0 {
        text.push('\n');
        text.push_str(&function::generate(f, &calls));
    }
    debug!(class = class_name, bytes = text.len(), "generated module");
    text
}
