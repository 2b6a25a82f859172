//! Boolean circuit to CNF translation
//!
//! Converts boolean gates to CNF clauses using Tseitin transformation.
//! Each gate's label doubles as its Tseitin variable.

use crate::bool::{BoolValue, BooleanFormula, FormulaKind};
use log::debug;
use rustc_hash::FxHashSet;

/// CNF representation
#[derive(Debug, Clone, Default)]
pub struct CNF {
    /// Number of variables
    pub num_variables: u32,
    /// CNF clauses (each clause is a vec of literals, negative = negated)
    pub clauses: Vec<Vec<i32>>,
}

impl CNF {
    /// Creates a new empty CNF
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a clause to the CNF
    pub fn add_clause(&mut self, clause: Vec<i32>) {
        // Update max variable
        for &lit in &clause {
            let var = lit.unsigned_abs();
            if var > self.num_variables {
                self.num_variables = var;
            }
        }
        self.clauses.push(clause);
    }

    /// Number of clauses
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }
}

/// Translates boolean circuits to CNF
///
/// Gates never have constant inputs (the factory folds them away), so only the
/// top-level value can be a constant.
#[derive(Default)]
pub struct CNFTranslator {
    cnf: CNF,
    /// Track which formulas have already been translated (by label)
    visited: FxHashSet<i32>,
}

impl CNFTranslator {
    /// Creates a new CNF translator
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates a boolean value to CNF
    ///
    /// Returns the label of the value and the CNF clauses.
    /// The formula is satisfiable iff the returned label is true.
    pub fn translate(mut self, value: &BoolValue<'_>) -> (i32, CNF) {
        let label = self.translate_value(value);

        match value {
            BoolValue::Constant(c) => {
                if !c.boolean_value() {
                    // FALSE: add empty clause to make formula UNSAT
                    self.cnf.add_clause(vec![]);
                }
                // TRUE needs no clauses; 0 is not a valid DIMACS literal
            }
            _ => self.cnf.add_clause(vec![label]),
        }

        debug!(
            "CNF: {} variables, {} clauses, {} gates",
            self.cnf.num_variables,
            self.cnf.num_clauses(),
            self.visited.len()
        );
        (label, self.cnf)
    }

    /// Translates a boolean value and returns its label
    fn translate_value(&mut self, value: &BoolValue<'_>) -> i32 {
        match value {
            BoolValue::Constant(c) => c.label(),
            BoolValue::Variable(v) => v.label(),
            BoolValue::Formula(f) => self.translate_formula(f),
        }
    }

    /// Translates a boolean formula using Tseitin transformation
    fn translate_formula(&mut self, formula: &BooleanFormula<'_>) -> i32 {
        let output = formula.label();

        // Skip if already translated
        if !self.visited.insert(output) {
            return output;
        }

        match formula.kind() {
            FormulaKind::And(inputs) => self.translate_and(output, inputs.get()),
            FormulaKind::Or(inputs) => self.translate_or(output, inputs.get()),
            FormulaKind::Not(input) => self.translate_not(output, input.get()),
            FormulaKind::Ite {
                condition,
                then_val,
                else_val,
            } => self.translate_ite(output, condition.get(), then_val.get(), else_val.get()),
        }

        output
    }

    /// Translates AND gate: output = a1 ∧ a2 ∧ ... ∧ an
    ///
    /// CNF encoding:
    /// - (¬a1 ∨ ¬a2 ∨ ... ∨ ¬an ∨ output) - if all inputs true, output true
    /// - (a1 ∨ ¬output) - if output true, each input must be true
    /// - (a2 ∨ ¬output)
    /// - ...
    fn translate_and(&mut self, output: i32, inputs: &[BoolValue<'_>]) {
        let input_labels: Vec<i32> = inputs.iter().map(|v| self.translate_value(v)).collect();

        let mut clause: Vec<i32> = input_labels.iter().map(|&l| -l).collect();
        clause.push(output);
        self.cnf.add_clause(clause);

        for &input in &input_labels {
            self.cnf.add_clause(vec![input, -output]);
        }
    }

    /// Translates OR gate: output = a1 ∨ a2 ∨ ... ∨ an
    ///
    /// CNF encoding:
    /// - (a1 ∨ a2 ∨ ... ∨ an ∨ ¬output) - if output true, some input is true
    /// - (¬a1 ∨ output) - if any input true, output true
    /// - (¬a2 ∨ output)
    /// - ...
    fn translate_or(&mut self, output: i32, inputs: &[BoolValue<'_>]) {
        let input_labels: Vec<i32> = inputs.iter().map(|v| self.translate_value(v)).collect();

        let mut clause = input_labels.clone();
        clause.push(-output);
        self.cnf.add_clause(clause);

        for &input in &input_labels {
            self.cnf.add_clause(vec![-input, output]);
        }
    }

    /// Translates NOT gate: output = ¬input
    fn translate_not(&mut self, output: i32, input: &BoolValue<'_>) {
        let input_label = self.translate_value(input);

        self.cnf.add_clause(vec![input_label, output]);
        self.cnf.add_clause(vec![-input_label, -output]);
    }

    /// Translates ITE gate: output = if cond then then_val else else_val
    ///
    /// CNF encoding:
    /// - (¬cond ∨ ¬then ∨ output)
    /// - (¬cond ∨ then ∨ ¬output)
    /// - (cond ∨ ¬else ∨ output)
    /// - (cond ∨ else ∨ ¬output)
    fn translate_ite(
        &mut self,
        output: i32,
        condition: &BoolValue<'_>,
        then_val: &BoolValue<'_>,
        else_val: &BoolValue<'_>,
    ) {
        let cond = self.translate_value(condition);
        let then_label = self.translate_value(then_val);
        let else_label = self.translate_value(else_val);

        // cond → (then → output)
        self.cnf.add_clause(vec![-cond, -then_label, output]);
        // cond → (output → then)
        self.cnf.add_clause(vec![-cond, then_label, -output]);
        // ¬cond → (else → output)
        self.cnf.add_clause(vec![cond, -else_label, output]);
        // ¬cond → (output → else)
        self.cnf.add_clause(vec![cond, else_label, -output]);
    }
}
