//! Incremental builder for n-ary AND/OR gates

use super::{BoolValue, BooleanConstant, Operator};

/// Collects the inputs of an n-ary AND or OR gate one at a time
///
/// Identity constants are dropped as they arrive. Once the operator's
/// short-circuit constant is added, the accumulator forgets its inputs and
/// reports the constant from every subsequent [`add`](Self::add), so callers can
/// stop building inputs that cannot matter. The gate itself is only created by
/// [`BooleanFactory::accumulate`](super::BooleanFactory::accumulate).
#[derive(Debug, Clone)]
pub struct BooleanAccumulator<'arena> {
    op: Operator,
    short_circuit: BooleanConstant,
    inputs: Vec<BoolValue<'arena>>,
    short_circuited: bool,
}

impl<'arena> BooleanAccumulator<'arena> {
    /// Creates an empty accumulator for the given n-ary operator
    ///
    /// # Panics
    /// Panics if `op` is not AND or OR.
    pub fn tree_gate(op: Operator) -> Self {
        let short_circuit = op
            .short_circuit()
            .unwrap_or_else(|| panic!("{:?} is not an n-ary operator", op));
        Self {
            op,
            short_circuit,
            inputs: Vec::new(),
            short_circuited: false,
        }
    }

    /// Creates an accumulator seeded with one input
    pub fn tree_gate_with(op: Operator, first: BoolValue<'arena>) -> Self {
        let mut acc = Self::tree_gate(op);
        acc.add(first);
        acc
    }

    /// Creates an accumulator holding all the given inputs
    pub fn tree_gate_of<I>(op: Operator, values: I) -> Self
    where
        I: IntoIterator<Item = BoolValue<'arena>>,
    {
        let mut acc = Self::tree_gate(op);
        for value in values {
            if acc.add(value).is_some() {
                break;
            }
        }
        acc
    }

    /// Adds an input to the gate
    ///
    /// Returns the short-circuit constant if the gate is now decided by it,
    /// `None` otherwise.
    pub fn add(&mut self, value: BoolValue<'arena>) -> Option<BooleanConstant> {
        if self.short_circuited {
            return Some(self.short_circuit);
        }
        match value {
            BoolValue::Constant(c) if c == self.short_circuit => {
                self.short_circuited = true;
                self.inputs.clear();
                Some(self.short_circuit)
            }
            BoolValue::Constant(_) => None,
            _ => {
                self.inputs.push(value);
                None
            }
        }
    }

    /// Returns the operator of this gate
    pub fn operator(&self) -> Operator {
        self.op
    }

    /// Returns true once the short-circuit constant has been added
    pub fn is_short_circuited(&self) -> bool {
        self.short_circuited
    }

    /// Number of non-constant inputs collected so far
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Returns true if no non-constant input has been collected
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Splits the accumulator into its operator, decided value and inputs
    pub(crate) fn into_parts(self) -> (Operator, Option<BooleanConstant>, Vec<BoolValue<'arena>>) {
        let decided = self.short_circuited.then_some(self.short_circuit);
        (self.op, decided, self.inputs)
    }
}
