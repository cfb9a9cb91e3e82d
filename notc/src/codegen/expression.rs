use super::function::FunctionGen;
use asm::{Arith, CondCode, Instruction};
use ast::typed::{Binary, Expr, Unary};
use ast::{Bop, Constant, IncDec, Type, UnOp};

const fn arith(op: Bop) -> Option<Arith> {
    Some(match op {
        Bop::Add => Arith::Add,
        Bop::Subtract => Arith::Sub,
        Bop::Multiply => Arith::Mul,
        Bop::Divide => Arith::Div,
        Bop::Remainder => Arith::Rem,
        Bop::LogAnd => Arith::And,
        Bop::LogOr => Arith::Or,
        _ => return None,
    })
}

const fn cond_code(op: Bop) -> Option<CondCode> {
    Some(match op {
        Bop::LessThan => CondCode::Lt,
        Bop::GreaterThan => CondCode::Gt,
        Bop::Leq => CondCode::Le,
        Bop::Geq => CondCode::Ge,
        Bop::EqualTo => CondCode::Eq,
        Bop::NotEqual => CondCode::Ne,
        _ => return None,
    })
}

impl FunctionGen<'_> {
    pub(super) fn expression(&mut self, e: &Expr) {
        match e {
            Expr::Const(c) => self.method.emit(match c {
                Constant::Bool(b) => Instruction::IConst(i32::from(*b)),
                Constant::Int(i) => Instruction::IConst(*i),
                Constant::Double(d) => Instruction::DConst(*d),
                Constant::Str(s) => Instruction::SConst(s.clone()),
            }),
            Expr::Var { id, ty } => {
                let slot = self.slot(id);
                self.method.emit(Instruction::Load { ty: *ty, slot });
            }
            Expr::Assignment { var, src, ty } => {
                self.expression(src);
                let slot = self.slot(var);
                self.method.emit(Instruction::Dup(*ty));
                self.method.emit(Instruction::Store { ty: *ty, slot });
            }
            Expr::FunctionCall { name, args, .. } => {
                for arg in args {
                    self.expression(arg);
                }
                let callee = self
                    .calls
                    .get(name)
                    .unwrap_or_else(|| panic!("no call descriptor for {name}"));
                self.method.emit(Instruction::Invoke {
                    method: callee.method.clone(),
                    args: callee.args,
                    ret: callee.ret.size(),
                });
            }
            Expr::Bin(binary) => self.binary(binary),
            Expr::IncDec { op, var, ty } => self.inc_dec(*op, var, *ty),
            Expr::Unary(Unary {
                op: UnOp::Negate,
                exp,
                ty,
            }) => {
                self.expression(exp);
                self.method.emit(Instruction::Neg(*ty));
            }
            Expr::Cast { target, exp } => {
                self.expression(exp);
                match (exp.typ(), target) {
                    (Type::Int, Type::Double) => self.method.emit(Instruction::I2d),
                    (from, to) => unreachable!("no conversion from {from} to {to}"),
                }
            }
        }
    }

    fn binary(&mut self, binary: &Binary) {
        let Binary {
            left,
            operator,
            right,
            operand_ty,
            ..
        } = binary;

        if let Some(cond) = cond_code(*operator) {
            return self.comparison(cond, left, right, *operand_ty);
        }

        let op = arith(*operator)
            .unwrap_or_else(|| unreachable!("{operator} is not a binary operation"));
        if operator.is_logical() {
            // both sides are always evaluated, then combined bitwise
            self.boolean(|gen, target| {
                gen.expression(left);
                gen.expression(right);
                gen.method.emit(Instruction::Arith { op, ty: Type::Int });
                gen.method.emit(Instruction::If {
                    cond: CondCode::Ne,
                    target,
                });
            });
        } else {
            self.expression(left);
            self.expression(right);
            self.method.emit(Instruction::Arith {
                op,
                ty: *operand_ty,
            });
        }
    }

    fn comparison(&mut self, cond: CondCode, left: &Expr, right: &Expr, operand_ty: Type) {
        self.boolean(|gen, target| {
            gen.expression(left);
            gen.expression(right);
            if operand_ty == Type::Double {
                // NaN must make every comparison but != false
                gen.method.emit(match cond {
                    CondCode::Lt | CondCode::Le => Instruction::Dcmpg,
                    _ => Instruction::Dcmpl,
                });
                gen.method.emit(Instruction::If { cond, target });
            } else {
                gen.method.emit(Instruction::IfIcmp { cond, target });
            }
        });
    }

    /// Pushes `true` and runs `test`, which jumps to the label it is given to
    /// keep it. Falling through replaces it with `false`.
    fn boolean(&mut self, test: impl FnOnce(&mut Self, asm::Label)) {
        let end = self.method.new_label();
        self.method.emit(Instruction::IConst(1));
        test(self, end);
        self.method.emit(Instruction::Pop(Type::Bool));
        self.method.emit(Instruction::IConst(0));
        self.method.label(end);
    }

    fn inc_dec(&mut self, op: IncDec, var: &ast::typed::VarId, ty: Type) {
        let slot = self.slot(var);
        self.method.emit(Instruction::Load { ty, slot });
        if op.is_post() {
            self.method.emit(Instruction::Dup(ty));
        }
        self.method.emit(match ty {
            Type::Double => Instruction::DConst(1.0),
            _ => Instruction::IConst(1),
        });
        self.method.emit(Instruction::Arith {
            op: if op.is_inc() { Arith::Add } else { Arith::Sub },
            ty,
        });
        if !op.is_post() {
            self.method.emit(Instruction::Dup(ty));
        }
        self.method.emit(Instruction::Store { ty, slot });
    }
}
