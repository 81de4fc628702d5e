//! Structured stack IR for one compilation unit.
//!
//! Every value is an `f64`. Instructions push and pop an implicit operand stack,
//! and control flow is structured (loops and if/else regions) so a unit can be
//! encoded straight into a Wasm function body without a relooper.

/// A mutable local holding one number.
/// Parameters are always the first slots of their function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub enum IrInst {
    Const(f64),

    LoadSlot(SlotId),
    StoreSlot(SlotId),

    // Store and leave the stored value on the stack
    TeeSlot(SlotId),

    Add,
    Sub,
    Mul,

    // Unordered or less than, so a NaN operand compares as true.
    // Leaves a boolean that must go through BoolToNumber before it is used as a value.
    LessThanUnordered,
    BoolToNumber,

    // Ordered not equal to zero, so NaN is false
    NumberToBool,

    // Calls are by name and resolved when the unit is encoded.
    // The callee is either defined in the same unit or declared external.
    Call { callee: String, argument_count: usize },

    Drop,

    // Runs its body once, a ContinueIf inside jumps back to the start
    Loop(Vec<IrInst>),

    // Pops a boolean and jumps back to the start of the innermost loop if it is true
    ContinueIf,

    // Pops a boolean, both blocks leave exactly one number
    IfElse {
        then_block: Vec<IrInst>,
        else_block: Vec<IrInst>,
    },
}

/// A function defined in a unit.
/// Always returns one number and takes `parameters.len()` numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct IrFunction {
    pub name: String,
    pub parameters: Vec<String>,

    // Total slot count, parameters included
    pub slot_count: u32,
    pub body: Vec<IrInst>,
}

impl IrFunction {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Slots that are not parameters, these become the function's extra locals
    pub fn local_count(&self) -> u32 {
        self.slot_count.saturating_sub(self.parameters.len() as u32)
    }
}

/// A function the unit calls but does not define.
/// Linked against a symbol already resident in the engine when the unit is finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalDecl {
    pub name: String,
    pub arity: usize,
}
