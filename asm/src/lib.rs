pub mod jasmin;
pub mod method;

pub use jasmin::{Arith, CondCode, Instruction, Label};
pub use method::Method;
