//! Main solver API
//!
//! The solver flattens a circuit to CNF, runs a SAT back end and returns a
//! [`Model`] that evaluates circuit nodes and integers under the assignment.

use crate::bool::{int, BoolValue, BooleanFactory, FormulaKind, Int};
use crate::cnf::CNFTranslator;
use crate::engine::{RustSatAdapter, SATSolver};
use crate::Result;
use log::debug;
use rustc_hash::FxHashMap;
use rustsat_batsat::BasicSolver;
use std::cell::RefCell;
use std::time::{Duration, Instant};

/// Main solver (uses batsat by default)
///
/// Finds an assignment to the factory's variables that makes a circuit true.
#[derive(Debug, Default)]
pub struct Solver;

impl Solver {
    /// Creates a new solver (uses batsat backend)
    pub fn new() -> Self {
        Self
    }

    /// Solves a formula built by the given factory using batsat backend
    ///
    /// Returns a Solution indicating SAT/UNSAT and containing
    /// statistics and (if SAT) a satisfying model.
    pub fn solve(&self, factory: &BooleanFactory<'_>, formula: &BoolValue<'_>) -> Result<Solution> {
        let mut sat_solver = RustSatAdapter::new(BasicSolver::default());
        self.solve_with(&mut sat_solver, factory, formula)
    }

    /// Solves a formula with a custom SAT solver
    pub fn solve_with<S: SATSolver>(
        &self,
        sat_solver: &mut S,
        factory: &BooleanFactory<'_>,
        formula: &BoolValue<'_>,
    ) -> Result<Solution> {
        // Constant formulas never reach the SAT solver
        if let BoolValue::Constant(c) = formula {
            debug!("formula is trivially {}", c.boolean_value());
            let stats = Statistics::default();
            return Ok(if c.boolean_value() {
                Solution::Sat {
                    model: Model::new(Vec::new()),
                    stats,
                }
            } else {
                Solution::Unsat { stats }
            });
        }

        // Step 1: Convert boolean circuit to CNF
        let translation_start = Instant::now();
        let (_top_level_var, cnf) = CNFTranslator::new().translate(formula);
        let translation_time = translation_start.elapsed();

        // Step 2: Run SAT solver
        let solving_start = Instant::now();
        let num_variables = cnf.num_variables.max(factory.max_label());
        sat_solver.add_variables(num_variables);
        for clause in &cnf.clauses {
            sat_solver.add_clause(clause)?;
        }
        let is_sat = sat_solver.solve()?;
        let solving_time = solving_start.elapsed();

        let stats = Statistics {
            translation_time,
            solving_time,
            num_variables,
            num_clauses: cnf.num_clauses() as u32,
        };
        debug!(
            "{}: {} variables, {} clauses, solved in {:?}",
            if is_sat { "SAT" } else { "UNSAT" },
            stats.num_variables,
            stats.num_clauses,
            solving_time
        );

        if is_sat {
            // Only the factory's primary variables are kept
            let assignment = (1..=factory.num_variables())
                .map(|var| sat_solver.value_of(var))
                .collect();
            Ok(Solution::Sat {
                model: Model::new(assignment),
                stats,
            })
        } else {
            Ok(Solution::Unsat { stats })
        }
    }
}

/// Solution to a circuit
#[derive(Debug)]
pub enum Solution {
    /// Formula is satisfiable
    Sat {
        /// Satisfying assignment
        model: Model,
        /// Solving statistics
        stats: Statistics,
    },
    /// Formula is unsatisfiable
    Unsat {
        /// Solving statistics
        stats: Statistics,
    },
}

impl Solution {
    /// Returns true if the formula is satisfiable
    pub fn is_sat(&self) -> bool {
        matches!(self, Solution::Sat { .. })
    }

    /// Returns true if the formula is unsatisfiable
    pub fn is_unsat(&self) -> bool {
        matches!(self, Solution::Unsat { .. })
    }

    /// Returns the model if the solution is SAT
    pub fn model(&self) -> Option<&Model> {
        match self {
            Solution::Sat { model, .. } => Some(model),
            Solution::Unsat { .. } => None,
        }
    }

    /// Returns the statistics
    pub fn stats(&self) -> &Statistics {
        match self {
            Solution::Sat { stats, .. } => stats,
            Solution::Unsat { stats } => stats,
        }
    }
}

/// Assignment of the primary variables found by the SAT solver
///
/// Gates are evaluated from their inputs on demand, so a model answers for any
/// node of the factory that produced it, including nodes the solved formula
/// does not mention.
#[derive(Debug)]
pub struct Model {
    assignment: Vec<bool>,
    // gate label -> value
    memo: RefCell<FxHashMap<i32, bool>>,
}

impl Model {
    fn new(assignment: Vec<bool>) -> Self {
        Self {
            assignment,
            memo: RefCell::new(FxHashMap::default()),
        }
    }

    /// Returns the value of a circuit node under this model
    ///
    /// Variables outside the solved problem are false.
    pub fn value_of(&self, value: &BoolValue<'_>) -> bool {
        match value {
            BoolValue::Constant(c) => c.boolean_value(),
            BoolValue::Variable(v) => self
                .assignment
                .get(v.label() as usize - 1)
                .copied()
                .unwrap_or(false),
            BoolValue::Formula(f) => {
                if let Some(&cached) = self.memo.borrow().get(&f.label()) {
                    return cached;
                }
                let result = match f.kind() {
                    FormulaKind::And(inputs) => inputs.get().iter().all(|v| self.value_of(v)),
                    FormulaKind::Or(inputs) => inputs.get().iter().any(|v| self.value_of(v)),
                    FormulaKind::Not(input) => !self.value_of(input.get()),
                    FormulaKind::Ite {
                        condition,
                        then_val,
                        else_val,
                    } => {
                        if self.value_of(condition.get()) {
                            self.value_of(then_val.get())
                        } else {
                            self.value_of(else_val.get())
                        }
                    }
                };
                self.memo.borrow_mut().insert(f.label(), result);
                result
            }
        }
    }

    /// Returns the value of an integer under this model
    pub fn int_value(&self, value: &Int<'_>) -> i32 {
        let bits: Vec<bool> = (0..value.width())
            .map(|i| self.value_of(&value.bit(i)))
            .collect();
        int::decode(&bits)
    }
}

/// Statistics collected during solving
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    translation_time: Duration,
    solving_time: Duration,
    num_variables: u32,
    num_clauses: u32,
}

impl Statistics {
    /// Returns CNF translation time in milliseconds
    pub fn translation_time(&self) -> u64 {
        self.translation_time.as_millis() as u64
    }

    /// Returns solving time in milliseconds
    pub fn solving_time(&self) -> u64 {
        self.solving_time.as_millis() as u64
    }

    /// Returns total time in milliseconds
    pub fn total_time(&self) -> u64 {
        self.translation_time() + self.solving_time()
    }

    /// Returns number of variables
    pub fn num_variables(&self) -> u32 {
        self.num_variables
    }

    /// Returns number of clauses
    pub fn num_clauses(&self) -> u32 {
        self.num_clauses
    }
}
