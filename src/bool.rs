//! Boolean circuit representation
//!
//! The boolean layer is the intermediate representation that integer arithmetic is
//! compiled into before the circuit is flattened to CNF.
//!
//! Key types:
//! - `BooleanValue`: Trait for all boolean values (constants, variables, formulas)
//! - `BooleanConstant`: TRUE (label 0) or FALSE (label -1)
//! - `BooleanVariable`: Variables with positive integer labels
//! - `BoolValue<'arena>`: Enum encompassing all boolean value types
//! - `BooleanFormula`: Boolean gates (AND, OR, NOT, ITE)
//! - `Operator`: Boolean operators
//! - `BooleanAccumulator`: Incremental builder for n-ary AND/OR gates
//! - `BooleanFactory`: Factory for creating and caching boolean circuits
//! - `Int`: Two's complement integer encoded as a vector of circuit nodes

mod accumulator;
mod factory;
pub mod arena;
pub mod int;
pub mod var_allocator;

pub use accumulator::BooleanAccumulator;
pub use arena::CircuitArena;
pub use factory::{BooleanFactory, Options};
pub use int::{Int, TwosComplementBits};
pub use var_allocator::VariableAllocator;

use std::marker::PhantomData;

/// Index handle for a value stored in the arena
///
/// A lightweight copy-able reference to a value allocated in a [`CircuitArena`].
/// The lifetime parameter `'arena` ties the handle to the arena borrow it was
/// allocated from, so a handle can never outlive its storage.
///
/// Equality and hashing are by address: two handles are equal iff they point to
/// the same allocation. Can point to either a single value `Handle<'arena, T>` or
/// a slice `Handle<'arena, [T]>`.
#[derive(Eq, PartialEq, Hash)]
pub struct Handle<'arena, T: ?Sized> {
    ptr: *const T,
    _phantom: PhantomData<&'arena T>,
}

impl<'arena, T: ?Sized + std::fmt::Debug> std::fmt::Debug for Handle<'arena, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // NOTE: recursion follows gate inputs, which always form a DAG
        self.get().fmt(f)
    }
}

impl<'arena, T: ?Sized> Copy for Handle<'arena, T> {}

impl<'arena, T: ?Sized> Clone for Handle<'arena, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'arena, T: ?Sized> Handle<'arena, T> {
    /// Creates a handle to an arena allocation
    pub(crate) fn new(value: &'arena T) -> Self {
        Self {
            ptr: value as *const T,
            _phantom: PhantomData,
        }
    }

    /// Resolves the handle to the value it points to
    pub fn get(self) -> &'arena T {
        // SAFETY: `ptr` was created from a `&'arena T` in `Handle::new`, and the
        // handle cannot outlive `'arena`.
        unsafe { &*self.ptr }
    }
}

/// Trait for all Boolean values
///
/// Each boolean value has an integer label used in CNF translation.
pub trait BooleanValue {
    /// Returns the label for this boolean value.
    /// - Constants: TRUE=0, FALSE=-1
    /// - Variables: positive integers
    /// - Formulas: assigned by factory during construction
    fn label(&self) -> i32;
}

/// Boolean constant (TRUE or FALSE)
///
/// Constants have special labels:
/// - TRUE has label 0
/// - FALSE has label -1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanConstant {
    /// TRUE constant (label 0)
    TRUE,
    /// FALSE constant (label -1)
    FALSE,
}

impl BooleanConstant {
    /// Returns the constant for the given boolean
    pub fn of(value: bool) -> Self {
        if value {
            BooleanConstant::TRUE
        } else {
            BooleanConstant::FALSE
        }
    }

    /// Returns the label for this constant
    pub fn label(&self) -> i32 {
        match self {
            BooleanConstant::TRUE => 0,
            BooleanConstant::FALSE => -1,
        }
    }

    /// Returns the boolean value of this constant
    pub fn boolean_value(&self) -> bool {
        *self == BooleanConstant::TRUE
    }

    /// Returns the opposite constant
    pub fn negation(&self) -> Self {
        match self {
            BooleanConstant::TRUE => BooleanConstant::FALSE,
            BooleanConstant::FALSE => BooleanConstant::TRUE,
        }
    }
}

impl BooleanValue for BooleanConstant {
    fn label(&self) -> i32 {
        self.label()
    }
}

/// Boolean variable with a positive integer label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BooleanVariable {
    label: i32,
}

impl BooleanVariable {
    /// Creates a new boolean variable with the given label.
    ///
    /// # Panics
    /// Panics if label is not positive (must be > 0).
    pub fn new(label: i32) -> Self {
        assert!(label > 0, "Variable labels must be positive");
        Self { label }
    }

    /// Returns the label for this variable
    pub fn label(&self) -> i32 {
        self.label
    }
}

impl BooleanValue for BooleanVariable {
    fn label(&self) -> i32 {
        self.label
    }
}

/// Boolean formula (gate)
///
/// Formulas have identity-based equality using their unique labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BooleanFormula<'arena> {
    label: i32,
    kind: FormulaKind<'arena>,
}

impl<'arena> BooleanFormula<'arena> {
    /// Creates a new formula with the given label and kind
    pub(crate) fn new(label: i32, kind: FormulaKind<'arena>) -> Self {
        Self { label, kind }
    }

    /// Returns the label for this formula
    pub fn label(&self) -> i32 {
        self.label
    }

    /// Returns the kind of this formula
    pub fn kind(&self) -> &FormulaKind<'arena> {
        &self.kind
    }

    /// Returns the operator of this gate
    pub fn op(&self) -> Operator {
        match self.kind {
            FormulaKind::And(_) => Operator::AND,
            FormulaKind::Or(_) => Operator::OR,
            FormulaKind::Not(_) => Operator::NOT,
            FormulaKind::Ite { .. } => Operator::ITE,
        }
    }
}

impl<'arena> BooleanValue for BooleanFormula<'arena> {
    fn label(&self) -> i32 {
        self.label
    }
}

/// Formula kind (gate type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormulaKind<'arena> {
    /// Multi-input AND gate - handle to slice of inputs in arena
    And(Handle<'arena, [BoolValue<'arena>]>),
    /// Multi-input OR gate - handle to slice of inputs in arena
    Or(Handle<'arena, [BoolValue<'arena>]>),
    /// NOT gate - handle to the negated input in arena
    Not(Handle<'arena, BoolValue<'arena>>),
    /// If-then-else gate - handles to inputs in arena
    Ite {
        /// Condition
        condition: Handle<'arena, BoolValue<'arena>>,
        /// Then branch
        then_val: Handle<'arena, BoolValue<'arena>>,
        /// Else branch
        else_val: Handle<'arena, BoolValue<'arena>>,
    },
}

/// Unified boolean value type
///
/// Encompasses constants, variables, and formulas. Values are cheap to copy:
/// a formula is a label plus arena handles to its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolValue<'arena> {
    /// Constant (TRUE or FALSE)
    Constant(BooleanConstant),
    /// Variable
    Variable(BooleanVariable),
    /// Formula (gate)
    Formula(BooleanFormula<'arena>),
}

impl<'arena> BoolValue<'arena> {
    /// The TRUE constant
    pub const TRUE: Self = BoolValue::Constant(BooleanConstant::TRUE);
    /// The FALSE constant
    pub const FALSE: Self = BoolValue::Constant(BooleanConstant::FALSE);

    /// Returns the label for this value
    pub fn label(&self) -> i32 {
        match self {
            BoolValue::Constant(c) => c.label(),
            BoolValue::Variable(v) => v.label(),
            BoolValue::Formula(f) => f.label(),
        }
    }

    /// Returns true if this is a constant
    pub fn is_constant(&self) -> bool {
        matches!(self, BoolValue::Constant(_))
    }

    /// Returns true if this is a variable
    pub fn is_variable(&self) -> bool {
        matches!(self, BoolValue::Variable(_))
    }

    /// Returns true if this is a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, BoolValue::Formula(_))
    }

    /// Returns the constant this value denotes, if any
    pub fn as_constant(&self) -> Option<BooleanConstant> {
        match self {
            BoolValue::Constant(c) => Some(*c),
            _ => None,
        }
    }

    /// If this value is a NOT gate, returns the negated input
    pub fn not_input(&self) -> Option<BoolValue<'arena>> {
        match self {
            BoolValue::Formula(f) => match f.kind() {
                FormulaKind::Not(input) => Some(*input.get()),
                _ => None,
            },
            _ => None,
        }
    }
}

impl<'arena> BooleanValue for BoolValue<'arena> {
    fn label(&self) -> i32 {
        self.label()
    }
}

impl<'arena> From<BooleanConstant> for BoolValue<'arena> {
    fn from(c: BooleanConstant) -> Self {
        BoolValue::Constant(c)
    }
}

impl<'arena> From<BooleanVariable> for BoolValue<'arena> {
    fn from(v: BooleanVariable) -> Self {
        BoolValue::Variable(v)
    }
}

impl<'arena> From<BooleanFormula<'arena>> for BoolValue<'arena> {
    fn from(f: BooleanFormula<'arena>) -> Self {
        BoolValue::Formula(f)
    }
}

impl<'arena> From<bool> for BoolValue<'arena> {
    fn from(b: bool) -> Self {
        BoolValue::Constant(BooleanConstant::of(b))
    }
}

/// Boolean operators for formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Logical AND
    AND,
    /// Logical OR
    OR,
    /// Logical NOT
    NOT,
    /// If-Then-Else (ternary conditional)
    ITE,
}

impl Operator {
    /// Returns true for the operators that take any number of inputs
    pub fn is_nary(&self) -> bool {
        matches!(self, Operator::AND | Operator::OR)
    }

    /// The constant that decides an n-ary gate regardless of its other inputs
    pub fn short_circuit(&self) -> Option<BooleanConstant> {
        match self {
            Operator::AND => Some(BooleanConstant::FALSE),
            Operator::OR => Some(BooleanConstant::TRUE),
            Operator::NOT | Operator::ITE => None,
        }
    }

    /// The constant an n-ary gate ignores (and evaluates to when it has no inputs)
    pub fn identity(&self) -> Option<BooleanConstant> {
        self.short_circuit().map(|c| c.negation())
    }
}
