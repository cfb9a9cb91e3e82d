mod common;

use ast::typed::{Expr, Stmnt};
use ast::{Pos, Type};
use common::check;
use notc::semantics::Error;

fn error(source: &str) -> Error {
    match check(source) {
        Ok(_) => panic!("expected a semantic error in\n{source}"),
        Err(e) => e,
    }
}

#[test]
fn main_is_required() {
    assert_eq!(error("void f() {}"), Error::InvalidMain);
    assert_eq!(error("int main() { return 0; }"), Error::InvalidMain);
    assert_eq!(error("void main(int x) {}"), Error::InvalidMain);
    assert!(check("void main() {}").is_ok());
}

#[test]
fn arity_is_checked_before_argument_types() {
    let e = error("void f(int a, int b) {} void main() { f(true); }");
    assert!(matches!(
        e,
        Error::ArityMismatch {
            expected: 2,
            actual: 1,
            ..
        }
    ));
    let e = error("void main() { printInt(1, 2); }");
    assert!(matches!(e, Error::ArityMismatch { ref name, .. } if &**name == "printInt"));
}

#[test]
fn too_few_arguments() {
    let e = error("void f(int a, int b) {} void main(){ f(1); }");
    assert!(matches!(
        e,
        Error::ArityMismatch {
            ref name,
            expected: 2,
            actual: 1,
            ..
        } if &**name == "f"
    ));
}

#[test]
fn call_to_undeclared_function() {
    let e = error("void main(){ foo(); }");
    assert!(matches!(e, Error::UndefinedFunction { ref name, .. } if &**name == "foo"));
    assert!(matches!(
        notc::compile_source("void main(){ foo(); }", "Test"),
        Err(notc::Error::Semantics(Error::UndefinedFunction { .. }))
    ));
}

#[test]
fn int_widens_to_double_but_not_back() {
    let program = check("void main() { double d = 1; printDouble(2); }").unwrap();
    let body = &program.0[0].body;
    match &body[0] {
        Stmnt::Init { init, .. } => assert!(matches!(
            init,
            Expr::Cast {
                target: Type::Double,
                ..
            }
        )),
        other => panic!("unexpected {other:?}"),
    }
    match &body[1] {
        Stmnt::Exp(Expr::FunctionCall { args, .. }) => {
            assert!(matches!(args[0], Expr::Cast { .. }))
        }
        other => panic!("unexpected {other:?}"),
    }

    assert!(matches!(
        error("void main() { int i = 1.5; }"),
        Error::TypeMismatch {
            expected: Type::Int,
            actual: Type::Double,
            ..
        }
    ));
    assert!(matches!(
        error("int f() { return 1.0; } void main() {}"),
        Error::TypeMismatch {
            expected: Type::Int,
            actual: Type::Double,
            ..
        }
    ));
    assert!(matches!(
        error("void main() { int i; i = true; }"),
        Error::TypeMismatch {
            expected: Type::Int,
            actual: Type::Bool,
            ..
        }
    ));
}

#[test]
fn duplicate_variables_and_shadowing() {
    assert!(matches!(
        error("void main() { int x; double x; }"),
        Error::DuplicateVariable { .. }
    ));
    assert!(matches!(
        error("void f(int a, bool a) {} void main() {}"),
        Error::DuplicateVariable { .. }
    ));
    // parameters share the body's outermost scope
    assert!(matches!(
        error("void f(int a) { int a; } void main() {}"),
        Error::DuplicateVariable { .. }
    ));

    let program = check("void main() { int x = 1; { double x = 2.0; x++; } x++; }").unwrap();
    let body = &program.0[0].body;
    let Stmnt::Compound(inner) = &body[1] else {
        panic!("expected a block")
    };
    assert!(matches!(
        inner[1],
        Stmnt::Exp(Expr::IncDec {
            ty: Type::Double,
            ..
        })
    ));
    assert!(matches!(
        body[2],
        Stmnt::Exp(Expr::IncDec { ty: Type::Int, .. })
    ));

    // sibling blocks are independent
    assert!(check("void main() { { int y; } { bool y; } }").is_ok());
    assert!(matches!(
        error("void main() { { int y; } y = 2; }"),
        Error::UndefinedVariable { .. }
    ));
}

#[test]
fn branches_and_loop_bodies_get_their_own_scope() {
    assert!(check("void main() { if (true) int x = 1; else int x = 2; while (false) int x; }").is_ok());
    assert!(matches!(
        error("void main() { if (true) int x = 1; x = 2; }"),
        Error::UndefinedVariable { .. }
    ));
}

#[test]
fn void_variables_are_rejected() {
    assert!(matches!(
        error("void main() { void v; }"),
        Error::VoidVariable { .. }
    ));
    assert!(matches!(
        error("void f(void v) {} void main() {}"),
        Error::VoidVariable { .. }
    ));
}

#[test]
fn ill_typed_operators() {
    assert!(matches!(
        error(r#"void main() { bool b = 1 < "s"; }"#),
        Error::IllTypedComparison { .. }
    ));
    assert!(matches!(
        error("void main() { bool b = 1 == true; }"),
        Error::IllTypedComparison {
            left: Type::Int,
            right: Type::Bool,
            ..
        }
    ));
    assert!(matches!(
        error("void main() { bool b = 1 && true; }"),
        Error::IllTypedLogical { .. }
    ));
    assert!(matches!(
        error("void main() { int x = true + 1; }"),
        Error::NonNumericalArithmetic { ty: Type::Bool, .. }
    ));
    assert!(matches!(
        error(r#"void main() { int x = 1 * "two"; }"#),
        Error::NonNumericalArithmetic {
            ty: Type::String,
            ..
        }
    ));
    assert!(matches!(
        error("void main() { bool b = true; b++; }"),
        Error::NonNumericalIncrDecr { ty: Type::Bool, .. }
    ));
    assert!(matches!(
        error("void main() { bool b = -true; }"),
        Error::NonNumericalArithmetic { ty: Type::Bool, .. }
    ));
    assert!(check("void main() { bool b = true == false; bool c = 1 < 2.5; }").is_ok());
}

#[test]
fn mixed_arithmetic_is_double() {
    let program = check("void main() { double d = 1 + 2.5; }").unwrap();
    let Stmnt::Init { init, .. } = &program.0[0].body[0] else {
        panic!("expected an initializer")
    };
    let Expr::Bin(binary) = init else {
        panic!("expected a binary expression, got {init:?}")
    };
    assert_eq!(binary.ty, Type::Double);
    assert!(matches!(*binary.left, Expr::Cast { .. }));
    assert!(matches!(*binary.right, Expr::Const(_)));
}

#[test]
fn functions() {
    assert!(matches!(
        error("void main() { g(); }"),
        Error::UndefinedFunction { .. }
    ));
    assert!(matches!(
        error("void f() {} void f() {} void main() {}"),
        Error::DuplicateFunction { .. }
    ));
    assert!(matches!(
        error("void printInt(int x) {} void main() {}"),
        Error::DuplicateFunction { .. }
    ));
    assert!(check("void main() { printInt(later(3)); } int later(int x) { return x; }").is_ok());
    assert!(check("int fact(int n) { if (n < 2) return 1; return n * fact(n - 1); } void main() {}").is_ok());
}

#[test]
fn initializer_cannot_see_its_variable() {
    assert!(matches!(
        error("void main() { int x = x + 1; }"),
        Error::UndefinedVariable { .. }
    ));
    // but an outer variable of the same name is visible
    assert!(check("void main() { int x = 1; { int x = x + 1; } }").is_ok());
}

#[test]
fn return_rules() {
    assert!(check("void main() { return; }").is_ok());
    assert!(matches!(
        error("int f() { return; } void main() {}"),
        Error::TypeMismatch {
            expected: Type::Int,
            actual: Type::Void,
            ..
        }
    ));
    assert!(matches!(
        error("void main() { return 1; }"),
        Error::TypeMismatch {
            expected: Type::Void,
            actual: Type::Int,
            ..
        }
    ));
    assert!(check("double f() { return 1; } void main() {}").is_ok());
}

#[test]
fn first_error_wins() {
    let e = error("void main() { int x = true; y = 1; }");
    assert!(matches!(e, Error::TypeMismatch { .. }));
}

#[test]
fn errors_carry_positions() {
    let e = error("void main() {\n  undefined = 2;\n}");
    assert_eq!(e.pos(), Some(Pos::new(2, 3)));
    assert_eq!(e.to_string(), "2:3: undefined variable undefined");
    assert_eq!(Error::InvalidMain.pos(), None);
}
