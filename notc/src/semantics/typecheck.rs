use super::Error;
use ast::parse as ast_parse;
use ast::typed::{Binary, Block, Expr, FnDef, Stmnt, Unary, VarDec};
use ast::{Bop, Name, Pos, Type};
use symtab::SymbolTable;
use tracing::trace;

pub(super) fn typecheck_function(f: &ast_parse::FnDef, table: &mut SymbolTable) -> Result<FnDef, Error> {
    trace!(function = %f.name, "checking body");
    table.enter_function();

    let mut params = Vec::with_capacity(f.params.len());
    for param in &f.params {
        params.push(declare(param.ty, &param.name, table)?);
    }

    let body = typecheck_block(&f.body, table, f.ret)?;

    let sig = table
        .lookup_function(&f.name.ident)
        .map_err(|e| Error::from_table(e, f.name.pos))?
        .clone();
    Ok(FnDef {
        name: f.name.ident.clone(),
        sig,
        params: params.into(),
        body,
    })
}

fn declare(ty: Type, name: &Name, table: &mut SymbolTable) -> Result<VarDec, Error> {
    let id = table
        .declare_variable(ty, name.ident.clone())
        .map_err(|e| Error::from_table(e, name.pos))?;
    Ok(VarDec {
        id,
        name: name.ident.clone(),
        ty,
    })
}

fn typecheck_block(
    block: &[ast_parse::Stmnt],
    table: &mut SymbolTable,
    ret: Type,
) -> Result<Block, Error> {
    block
        .iter()
        .map(|stmnt| typecheck_statement(stmnt, table, ret))
        .collect()
}

/// Checks `stmnt` in a scope of its own.
fn scoped_statement(
    stmnt: &ast_parse::Stmnt,
    table: &mut SymbolTable,
    ret: Type,
) -> Result<Stmnt, Error> {
    table.push_scope();
    let stmnt = typecheck_statement(stmnt, table, ret)?;
    table.pop_scope();
    Ok(stmnt)
}

fn typecheck_statement(
    stmnt: &ast_parse::Stmnt,
    table: &mut SymbolTable,
    ret: Type,
) -> Result<Stmnt, Error> {
    match stmnt {
        ast_parse::Stmnt::Decl { ty, names } => {
            let decs = names
                .iter()
                .map(|name| declare(*ty, name, table))
                .collect::<Result<_, _>>()?;
            Ok(Stmnt::Decl(decs))
        }
        ast_parse::Stmnt::Init { ty, var, init } => {
            // the initializer can't see the variable it initializes
            let init = check_against(init, *ty, table)?;
            let var = declare(*ty, var, table)?;
            Ok(Stmnt::Init { var, init })
        }
        ast_parse::Stmnt::Exp(e) => typecheck_expression(e, table).map(Stmnt::Exp),
        ast_parse::Stmnt::Ret { value, pos } => typecheck_return(value.as_ref(), *pos, table, ret),
        ast_parse::Stmnt::Compound(block) => {
            table.push_scope();
            let block = typecheck_block(block, table, ret)?;
            table.pop_scope();
            Ok(Stmnt::Compound(block))
        }
        ast_parse::Stmnt::While { condition, body } => {
            let condition = check_against(condition, Type::Bool, table)?;
            let body = Box::new(scoped_statement(body, table, ret)?);
            Ok(Stmnt::While { condition, body })
        }
        ast_parse::Stmnt::For {
            init,
            condition,
            step,
            body,
        } => {
            let init = init
                .as_ref()
                .map(|e| typecheck_expression(e, table))
                .transpose()?;
            let condition = condition
                .as_ref()
                .map(|e| check_against(e, Type::Bool, table))
                .transpose()?;
            let step = step
                .as_ref()
                .map(|e| typecheck_expression(e, table))
                .transpose()?;
            let body = Box::new(scoped_statement(body, table, ret)?);
            Ok(Stmnt::For {
                init,
                condition,
                step,
                body,
            })
        }
        ast_parse::Stmnt::If {
            condition,
            then,
            r#else,
        } => {
            let condition = check_against(condition, Type::Bool, table)?;
            let then = Box::new(scoped_statement(then, table, ret)?);
            let r#else = r#else
                .as_ref()
                .map(|stmnt| scoped_statement(stmnt, table, ret).map(Box::new))
                .transpose()?;
            Ok(Stmnt::If {
                condition,
                then,
                r#else,
            })
        }
    }
}

fn typecheck_return(
    value: Option<&ast_parse::Expr>,
    pos: Pos,
    table: &SymbolTable,
    ret: Type,
) -> Result<Stmnt, Error> {
    match (value, ret) {
        (None, Type::Void) => Ok(Stmnt::Ret(None)),
        (None, expected) => Err(Error::TypeMismatch {
            expected,
            actual: Type::Void,
            pos,
        }),
        (Some(value), Type::Void) => {
            let actual = typecheck_expression(value, table)?.typ();
            Err(Error::TypeMismatch {
                expected: Type::Void,
                actual,
                pos: value.pos(),
            })
        }
        (Some(value), expected) => check_against(value, expected, table).map(|e| Stmnt::Ret(Some(e))),
    }
}

/// Infers the type of `e` and requires it to be convertible to `expected`,
/// inserting the widening if one is needed.
fn check_against(e: &ast_parse::Expr, expected: Type, table: &SymbolTable) -> Result<Expr, Error> {
    let typed = typecheck_expression(e, table)?;
    let actual = typed.typ();
    if actual.is_convertible_to(expected) {
        Ok(convert_to(typed, expected))
    } else {
        Err(Error::TypeMismatch {
            expected,
            actual,
            pos: e.pos(),
        })
    }
}

fn convert_to(e: Expr, target: Type) -> Expr {
    if e.typ() == target {
        e
    } else {
        Expr::Cast {
            target,
            exp: Box::new(e),
        }
    }
}

fn resolve(name: &Name, table: &SymbolTable) -> Result<symtab::Variable, Error> {
    table
        .resolve_variable(&name.ident)
        .map_err(|e| Error::from_table(e, name.pos))
}

fn typecheck_expression(e: &ast_parse::Expr, table: &SymbolTable) -> Result<Expr, Error> {
    match e {
        ast_parse::Expr::Const { c, .. } => Ok(Expr::Const(c.clone())),
        ast_parse::Expr::Var(name) => {
            let var = resolve(name, table)?;
            Ok(Expr::Var {
                id: var.id,
                ty: var.ty,
            })
        }
        ast_parse::Expr::Assignment { dst, src } => {
            let var = resolve(dst, table)?;
            let src = Box::new(check_against(src, var.ty, table)?);
            Ok(Expr::Assignment {
                var: var.id,
                src,
                ty: var.ty,
            })
        }
        ast_parse::Expr::FunctionCall { name, args } => {
            let sig = table
                .lookup_function(&name.ident)
                .map_err(|e| Error::from_table(e, name.pos))?;
            if sig.arity() != args.len() {
                return Err(Error::ArityMismatch {
                    name: name.ident.clone(),
                    expected: sig.arity(),
                    actual: args.len(),
                    pos: name.pos,
                });
            }
            let args = args
                .iter()
                .zip(sig.params.iter())
                .map(|(arg, ty)| check_against(arg, *ty, table))
                .collect::<Result<_, _>>()?;
            Ok(Expr::FunctionCall {
                name: name.ident.clone(),
                args,
                ty: sig.ret,
            })
        }
        ast_parse::Expr::Bin(binary) => typecheck_binary(binary, table).map(Expr::Bin),
        ast_parse::Expr::IncDec { op, var } => {
            let resolved = resolve(var, table)?;
            if !resolved.ty.is_numerical() {
                return Err(Error::NonNumericalIncrDecr {
                    ty: resolved.ty,
                    pos: var.pos,
                });
            }
            Ok(Expr::IncDec {
                op: *op,
                var: resolved.id,
                ty: resolved.ty,
            })
        }
        ast_parse::Expr::Unary(ast_parse::Unary { op, exp, pos }) => {
            let exp = typecheck_expression(exp, table)?;
            let ty = exp.typ();
            if !ty.is_numerical() {
                return Err(Error::NonNumericalArithmetic { ty, pos: *pos });
            }
            Ok(Expr::Unary(Unary {
                op: *op,
                exp: Box::new(exp),
                ty,
            }))
        }
        ast_parse::Expr::Nested(inner) => typecheck_expression(inner, table),
    }
}

fn typecheck_binary(binary: &ast_parse::Binary, table: &SymbolTable) -> Result<Binary, Error> {
    let ast_parse::Binary {
        left,
        operator,
        right,
        pos,
    } = binary;
    let (left_pos, right_pos) = (left.pos(), right.pos());
    let left = typecheck_expression(left, table)?;
    let right = typecheck_expression(right, table)?;
    let (lt, rt) = (left.typ(), right.typ());

    let (operand_ty, ty) = match operator {
        op if op.is_arithmetic() => {
            if !lt.is_numerical() {
                return Err(Error::NonNumericalArithmetic {
                    ty: lt,
                    pos: left_pos,
                });
            }
            if !rt.is_numerical() {
                return Err(Error::NonNumericalArithmetic {
                    ty: rt,
                    pos: right_pos,
                });
            }
            let common = lt.common(rt);
            (common, common)
        }
        op if op.is_relational() => match (lt, rt) {
            (l, r) if l.is_numerical() && r.is_numerical() => (l.common(r), Type::Bool),
            (Type::Bool, Type::Bool) => (Type::Bool, Type::Bool),
            _ => {
                return Err(Error::IllTypedComparison {
                    op: *op,
                    left: lt,
                    right: rt,
                    pos: *pos,
                })
            }
        },
        op if op.is_logical() => {
            if lt != Type::Bool || rt != Type::Bool {
                return Err(Error::IllTypedLogical {
                    op: *op,
                    left: lt,
                    right: rt,
                    pos: *pos,
                });
            }
            (Type::Bool, Type::Bool)
        }
        Bop::Equals => unreachable!("assignments are parsed as Expr::Assignment"),
        op => unreachable!("unclassified operator {op}"),
    };

    Ok(Binary {
        left: Box::new(convert_to(left, operand_ty)),
        operator: *operator,
        right: Box::new(convert_to(right, operand_ty)),
        operand_ty,
        ty,
    })
}
