//! Boolean factory with gate caching
//!
//! The factory creates boolean values and formulas, with automatic deduplication
//! and constant folding. Uses interior mutability (Cell/RefCell) to avoid
//! `&mut self` everywhere.

use super::{
    BoolValue, BooleanAccumulator, BooleanConstant, BooleanFormula, BooleanVariable, CircuitArena,
    FormulaKind, Int, Operator,
};
use crate::{KodkodError, Result};
use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::{Cell, RefCell};
use std::ops::Range;

/// Largest supported integer bitwidth
pub const MAX_BITWIDTH: usize = 32;

/// Options for boolean factory
#[derive(Debug, Clone)]
pub struct Options {
    /// Enable sharing of boolean formulas (default: true)
    pub sharing: bool,
    /// Number of bits used to represent integers (default: 4)
    pub bitwidth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sharing: true,
            bitwidth: 4,
        }
    }
}

impl Options {
    /// Returns these options with the given integer bitwidth
    pub fn with_bitwidth(mut self, bitwidth: usize) -> Self {
        self.bitwidth = bitwidth;
        self
    }

    /// Checks that the options describe a usable factory
    pub fn validate(&self) -> Result<()> {
        if self.bitwidth == 0 || self.bitwidth > MAX_BITWIDTH {
            return Err(KodkodError::InvalidArgument(format!(
                "bitwidth must be in 1..={}, got {}",
                MAX_BITWIDTH, self.bitwidth
            )));
        }
        Ok(())
    }
}

/// Boolean circuit factory with caching
///
/// Creates boolean values and formulas, with automatic deduplication of gates.
/// Gate inputs live in the borrowed [`CircuitArena`]; gates are identified by
/// labels, starting right after the last variable label.
pub struct BooleanFactory<'arena> {
    num_variables: u32,
    next_label: Cell<u32>,
    options: Options,
    // Key: (kind, input labels) -> cached formula
    cache: RefCell<FxHashMap<CacheKey, BooleanFormula<'arena>>>,
    arena: &'arena CircuitArena,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Nary(Operator, Vec<i32>),
    Not(i32),
    Ite(i32, i32, i32),
}

impl<'arena> BooleanFactory<'arena> {
    /// Creates a new boolean factory
    ///
    /// # Arguments
    /// * `arena` - Storage for gate inputs
    /// * `num_variables` - Number of variables, labelled `1..=num_variables`
    /// * `options` - Factory options
    pub fn new(arena: &'arena CircuitArena, num_variables: u32, options: Options) -> Result<Self> {
        options.validate()?;
        if num_variables >= i32::MAX as u32 {
            return Err(KodkodError::InvalidArgument(format!(
                "too many variables: {}",
                num_variables
            )));
        }
        debug!(
            "new factory: {} variables, bitwidth {}, sharing {}",
            num_variables, options.bitwidth, options.sharing
        );
        Ok(Self {
            num_variables,
            // Start labels after variables (variables are 1..=num_variables)
            next_label: Cell::new(num_variables + 1),
            options,
            cache: RefCell::new(FxHashMap::default()),
            arena,
        })
    }

    /// Returns the number of variables
    pub fn num_variables(&self) -> u32 {
        self.num_variables
    }

    /// Returns the number of gates created so far
    pub fn num_gates(&self) -> u32 {
        self.next_label.get() - self.num_variables - 1
    }

    /// Returns the largest label handed out so far
    pub fn max_label(&self) -> u32 {
        self.next_label.get() - 1
    }

    /// Returns the options this factory was created with
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the bitwidth used for integer operations
    pub fn bitwidth(&self) -> usize {
        self.options.bitwidth
    }

    /// Creates a boolean variable
    pub fn variable(&self, label: i32) -> BoolValue<'arena> {
        assert!(
            label > 0 && label <= self.num_variables as i32,
            "Variable label must be in range 1..={}",
            self.num_variables
        );
        BoolValue::Variable(BooleanVariable::new(label))
    }

    /// Creates a constant
    pub fn constant(&self, value: bool) -> BoolValue<'arena> {
        BoolValue::Constant(BooleanConstant::of(value))
    }

    /// Creates an AND gate
    pub fn and(&self, left: BoolValue<'arena>, right: BoolValue<'arena>) -> BoolValue<'arena> {
        self.nary(Operator::AND, vec![left, right])
    }

    /// Creates a multi-input AND gate
    pub fn and_multi(&self, inputs: Vec<BoolValue<'arena>>) -> BoolValue<'arena> {
        self.nary(Operator::AND, inputs)
    }

    /// Creates an OR gate
    pub fn or(&self, left: BoolValue<'arena>, right: BoolValue<'arena>) -> BoolValue<'arena> {
        self.nary(Operator::OR, vec![left, right])
    }

    /// Creates a multi-input OR gate
    pub fn or_multi(&self, inputs: Vec<BoolValue<'arena>>) -> BoolValue<'arena> {
        self.nary(Operator::OR, inputs)
    }

    /// Builds the gate collected by the given accumulator
    pub fn accumulate(&self, acc: BooleanAccumulator<'arena>) -> BoolValue<'arena> {
        match acc.into_parts() {
            (_, Some(decided), _) => BoolValue::Constant(decided),
            (op, None, inputs) => self.nary(op, inputs),
        }
    }

    fn nary(&self, op: Operator, inputs: Vec<BoolValue<'arena>>) -> BoolValue<'arena> {
        let (short_circuit, identity) = match op {
            Operator::AND => (BooleanConstant::FALSE, BooleanConstant::TRUE),
            Operator::OR => (BooleanConstant::TRUE, BooleanConstant::FALSE),
            Operator::NOT | Operator::ITE => unreachable!("{:?} is not n-ary", op),
        };

        let mut seen = FxHashSet::default();
        let mut flat = Vec::with_capacity(inputs.len());
        for value in inputs {
            match value {
                BoolValue::Constant(c) if c == short_circuit => return BoolValue::Constant(c),
                BoolValue::Constant(_) => {}
                _ => {
                    if seen.insert(value.label()) {
                        flat.push(value);
                    }
                }
            }
        }

        // x and ¬x together decide the gate
        let complementary = flat
            .iter()
            .filter_map(|v| v.not_input())
            .any(|negated| seen.contains(&negated.label()));
        if complementary {
            return BoolValue::Constant(short_circuit);
        }

        match flat.len() {
            0 => BoolValue::Constant(identity),
            1 => flat[0],
            _ => {
                let key = self.options.sharing.then(|| {
                    let mut labels: Vec<i32> = flat.iter().map(|v| v.label()).collect();
                    labels.sort_unstable();
                    CacheKey::Nary(op, labels)
                });
                self.cached(key, || {
                    let handle = self.arena.alloc_slice_handle(&flat);
                    if op == Operator::AND {
                        FormulaKind::And(handle)
                    } else {
                        FormulaKind::Or(handle)
                    }
                })
            }
        }
    }

    /// Creates a NOT gate
    pub fn not(&self, input: BoolValue<'arena>) -> BoolValue<'arena> {
        if let BoolValue::Constant(c) = input {
            return BoolValue::Constant(c.negation());
        }
        if let Some(inner) = input.not_input() {
            return inner;
        }

        let key = self.options.sharing.then(|| CacheKey::Not(input.label()));
        self.cached(key, || FormulaKind::Not(self.arena.alloc_handle(input)))
    }

    /// Creates an if-then-else gate
    pub fn ite(
        &self,
        condition: BoolValue<'arena>,
        then_val: BoolValue<'arena>,
        else_val: BoolValue<'arena>,
    ) -> BoolValue<'arena> {
        if let BoolValue::Constant(c) = condition {
            return if c.boolean_value() { then_val } else { else_val };
        }
        if then_val == else_val {
            return then_val;
        }

        // Constant or repeated branches reduce to a single AND/OR
        match (then_val, else_val) {
            (BoolValue::Constant(BooleanConstant::TRUE), _) => return self.or(condition, else_val),
            (BoolValue::Constant(BooleanConstant::FALSE), _) => {
                return self.and(self.not(condition), else_val)
            }
            (_, BoolValue::Constant(BooleanConstant::TRUE)) => {
                return self.or(self.not(condition), then_val)
            }
            (_, BoolValue::Constant(BooleanConstant::FALSE)) => return self.and(condition, then_val),
            _ => {}
        }
        if condition == then_val {
            return self.or(condition, else_val);
        }
        if condition == else_val {
            return self.and(condition, then_val);
        }

        let key = self
            .options
            .sharing
            .then(|| CacheKey::Ite(condition.label(), then_val.label(), else_val.label()));
        self.cached(key, || FormulaKind::Ite {
            condition: self.arena.alloc_handle(condition),
            then_val: self.arena.alloc_handle(then_val),
            else_val: self.arena.alloc_handle(else_val),
        })
    }

    /// XOR operation: a XOR b = ITE(a, NOT b, b)
    pub fn xor(&self, a: BoolValue<'arena>, b: BoolValue<'arena>) -> BoolValue<'arena> {
        self.ite(a, self.not(b), b)
    }

    /// IFF (if and only if): a IFF b = ITE(a, b, NOT b)
    pub fn iff(&self, a: BoolValue<'arena>, b: BoolValue<'arena>) -> BoolValue<'arena> {
        self.ite(a, b, self.not(b))
    }

    /// IMPLIES: a IMPLIES b = NOT a OR b
    pub fn implies(&self, a: BoolValue<'arena>, b: BoolValue<'arena>) -> BoolValue<'arena> {
        self.or(self.not(a), b)
    }

    /// Full adder sum: a XOR b XOR cin
    pub fn sum(
        &self,
        a: BoolValue<'arena>,
        b: BoolValue<'arena>,
        cin: BoolValue<'arena>,
    ) -> BoolValue<'arena> {
        self.xor(cin, self.xor(a, b))
    }

    /// Full adder carry out: (a AND b) OR (cin AND (a XOR b))
    pub fn carry(
        &self,
        a: BoolValue<'arena>,
        b: BoolValue<'arena>,
        cin: BoolValue<'arena>,
    ) -> BoolValue<'arena> {
        let a_and_b = self.and(a, b);
        let cin_and_xor = self.and(cin, self.xor(a, b));
        self.or(a_and_b, cin_and_xor)
    }

    /// Returns an integer constant
    pub fn integer(&'arena self, number: i32) -> Int<'arena> {
        Int::literal(self, number, BoolValue::TRUE)
    }

    /// Returns an integer that is `number` if `bit` is true and 0 otherwise
    pub fn integer_with(&'arena self, number: i32, bit: BoolValue<'arena>) -> Int<'arena> {
        Int::literal(self, number, bit)
    }

    /// Returns a free integer whose two's complement bits are the given variables
    ///
    /// The first variable of the range is the least significant bit.
    pub fn int_variable(&'arena self, vars: Range<u32>) -> Result<Int<'arena>> {
        if vars.is_empty() || vars.start == 0 || vars.end - 1 > self.num_variables {
            return Err(KodkodError::InvalidArgument(format!(
                "variable range {:?} is not within 1..={}",
                vars, self.num_variables
            )));
        }
        let bits = vars.map(|label| self.variable(label as i32)).collect();
        Int::from_bits(self, bits)
    }

    fn cached<F>(&self, key: Option<CacheKey>, make: F) -> BoolValue<'arena>
    where
        F: FnOnce() -> FormulaKind<'arena>,
    {
        if let Some(key) = &key {
            if let Some(cached) = self.cache.borrow().get(key) {
                return BoolValue::Formula(*cached);
            }
        }

        let formula = BooleanFormula::new(self.allocate_label(), make());
        trace!("gate {} = {:?}", formula.label(), formula.op());
        if let Some(key) = key {
            self.cache.borrow_mut().insert(key, formula);
        }
        BoolValue::Formula(formula)
    }

    fn allocate_label(&self) -> i32 {
        let label = self.next_label.get();
        self.next_label.set(label + 1);
        label as i32
    }
}
