use ast::{Signature, Type};

/// I/O primitives every program can call without defining them.
pub const BUILTINS: [(&str, Type, &[Type]); 6] = [
    ("printInt", Type::Void, &[Type::Int]),
    ("readInt", Type::Int, &[]),
    ("printDouble", Type::Void, &[Type::Double]),
    ("readDouble", Type::Double, &[]),
    ("printString", Type::Void, &[Type::String]),
    ("readString", Type::String, &[]),
];

pub fn signatures() -> impl Iterator<Item = (&'static str, Signature)> {
    BUILTINS
        .iter()
        .map(|(name, ret, params)| (*name, Signature::new(*ret, *params)))
}

/// Module prologue and the Jasmin bodies of the builtins. `$CLASSNAME$` is
/// replaced by the name of the generated class.
pub const BOILERPLATE: &str = include_str!("boilerplate.j");

pub fn boilerplate(class_name: &str) -> String {
    BOILERPLATE.replace("$CLASSNAME$", class_name)
}
