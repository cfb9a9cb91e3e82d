use super::jasmin::{Instruction, Label};
use ast::typed::VarId;
use ast::Type;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// Instruction stream for one method being generated.
///
/// Tracks the operand stack depth statically, hands out labels and local
/// variable slots. Slots are never reused within a method.
#[derive(Debug)]
pub struct Method {
    spec: String,
    body: Vec<Instruction>,
    depth: i32,
    max_depth: i32,
    next_label: u32,
    next_slot: u16,
    slots: HashMap<VarId, u16>,
}

impl Method {
    /// `spec` is the name and descriptor, e.g. `main()V`.
    pub fn new(spec: impl Into<String>) -> Self {
        Self {
            spec: spec.into(),
            body: Vec::new(),
            depth: 0,
            max_depth: 0,
            next_label: 0,
            next_slot: 0,
            slots: HashMap::new(),
        }
    }

    pub fn emit(&mut self, instruction: Instruction) {
        self.depth += instruction.stack_effect();
        debug_assert!(
            self.depth >= 0,
            "negative stack depth after {instruction} in {}",
            self.spec
        );
        self.max_depth = self.max_depth.max(self.depth);
        self.body.push(instruction);
    }

    pub fn new_label(&mut self) -> Label {
        let label = Label(self.next_label);
        self.next_label += 1;
        label
    }

    pub fn label(&mut self, label: Label) {
        self.emit(Instruction::Label(label));
    }

    pub fn reserve_slot(&mut self, var: VarId, ty: Type) -> u16 {
        let slot = self.next_slot;
        self.next_slot += ty.size();
        self.slots.insert(var, slot);
        slot
    }

    pub fn address_of(&self, var: VarId) -> Option<u16> {
        self.slots.get(&var).copied()
    }

    #[cfg(test)]
    const fn depth(&self) -> i32 {
        self.depth
    }

    pub const fn max_stack(&self) -> i32 {
        self.max_depth
    }

    pub const fn locals(&self) -> u16 {
        self.next_slot
    }

    pub fn ends_in_return(&self) -> bool {
        matches!(self.body.last(), Some(Instruction::Return(_)))
    }

    /// The complete method text, `.limit` directives included.
    pub fn finalize(self) -> String {
        self.to_string()
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, ".method public static {}", self.spec)?;
        writeln!(f, "    .limit locals {}", self.next_slot)?;
        writeln!(f, "    .limit stack {}", self.max_depth)?;
        for instruction in &self.body {
            if instruction.is_label() {
                writeln!(f, "{instruction}")?;
            } else {
                writeln!(f, "    {instruction}")?;
            }
        }
        writeln!(f, ".end method")
    }
}
