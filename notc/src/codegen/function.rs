use super::CallTable;
use asm::{CondCode, Instruction, Method};
use ast::typed::{Expr, FnDef, Stmnt, VarDec};
use ast::Type;
use tracing::trace;

pub(super) struct FunctionGen<'a> {
    pub(super) method: Method,
    pub(super) calls: &'a CallTable,
}

pub fn generate(f: &FnDef, calls: &CallTable) -> String {
    let mut method = Method::new(format!("{}{}", f.name, f.sig.descriptor()));
    for param in &f.params {
        method.reserve_slot(param.id, param.ty);
    }

    let mut gen = FunctionGen { method, calls };
    for stmnt in &f.body {
        gen.statement(stmnt);
    }
    if f.sig.ret == Type::Void && !gen.method.ends_in_return() {
        gen.method.emit(Instruction::Return(Type::Void));
    }

    trace!(
        function = %f.name,
        stack = gen.method.max_stack(),
        locals = gen.method.locals(),
        "generated method"
    );
    gen.method.finalize()
}

impl FunctionGen<'_> {
    pub(super) fn slot(&self, var: &ast::typed::VarId) -> u16 {
        self.method
            .address_of(*var)
            .unwrap_or_else(|| panic!("{var} used before its slot was reserved"))
    }

    fn declare(&mut self, var: &VarDec) -> u16 {
        self.method.reserve_slot(var.id, var.ty)
    }

    fn statement(&mut self, stmnt: &Stmnt) {
        match stmnt {
            Stmnt::Decl(vars) => {
                for var in vars {
                    self.declare(var);
                }
            }
            Stmnt::Init { var, init } => {
                self.expression(init);
                let slot = self.declare(var);
                self.method.emit(Instruction::Store { ty: var.ty, slot });
            }
            Stmnt::Exp(e) => self.discarded(e),
            Stmnt::Ret(None) => self.method.emit(Instruction::Return(Type::Void)),
            Stmnt::Ret(Some(e)) => {
                self.expression(e);
                self.method.emit(Instruction::Return(e.typ()));
            }
            Stmnt::Compound(block) => {
                for stmnt in block {
                    self.statement(stmnt);
                }
            }
            Stmnt::While { condition, body } => {
                let test = self.method.new_label();
                let end = self.method.new_label();
                self.method.label(test);
                self.branch_if_false(condition, end);
                self.statement(body);
                self.method.emit(Instruction::Goto(test));
                self.method.label(end);
            }
            Stmnt::For {
                init,
                condition,
                step,
                body,
            } => {
                if let Some(init) = init {
                    self.discarded(init);
                }
                let test = self.method.new_label();
                let end = self.method.new_label();
                self.method.label(test);
                if let Some(condition) = condition {
                    self.branch_if_false(condition, end);
                }
                self.statement(body);
                if let Some(step) = step {
                    self.discarded(step);
                }
                self.method.emit(Instruction::Goto(test));
                self.method.label(end);
            }
            Stmnt::If {
                condition,
                then,
                r#else: None,
            } => {
                let end = self.method.new_label();
                self.branch_if_false(condition, end);
                self.statement(then);
                self.method.label(end);
            }
            Stmnt::If {
                condition,
                then,
                r#else: Some(r#else),
            } => {
                let else_label = self.method.new_label();
                let end = self.method.new_label();
                self.branch_if_false(condition, else_label);
                self.statement(then);
                if !self.method.ends_in_return() {
                    self.method.emit(Instruction::Goto(end));
                }
                self.method.label(else_label);
                self.statement(r#else);
                self.method.label(end);
            }
        }
    }

    /// Evaluates `e` for its side effects only.
    fn discarded(&mut self, e: &Expr) {
        self.expression(e);
        let ty = e.typ();
        if ty != Type::Void {
            self.method.emit(Instruction::Pop(ty));
        }
    }

    fn branch_if_false(&mut self, condition: &Expr, target: asm::Label) {
        self.expression(condition);
        self.method.emit(Instruction::If {
            cond: CondCode::Eq,
            target,
        });
    }
}
