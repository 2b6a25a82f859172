//! Adapters for rustsat solver backends
//!
//! Provides adapters to use rustsat-compatible SAT solvers with kodkod.

use super::SATSolver;
use crate::{KodkodError, Result};
use rustsat::solvers::{Solve, SolverResult};
use rustsat::types::{Assignment, Clause, Lit, TernaryVal, Var};

/// Adapter that wraps rustsat solvers to implement our SATSolver trait
///
/// This allows any rustsat-compatible solver to be used with kodkod.
///
/// # Example
///
/// ```
/// use kodkod_arith::engine::{RustSatAdapter, SATSolver};
/// use rustsat_batsat::BasicSolver;
///
/// let mut solver = RustSatAdapter::new(BasicSolver::default());
/// solver.add_variables(1);
/// solver.add_clause(&[1]).unwrap();
/// assert!(solver.solve().unwrap());
/// assert!(solver.value_of(1));
/// ```
pub struct RustSatAdapter<S> {
    solver: S,
    num_vars: u32,
    num_clauses: u32,
    // largest variable mentioned by a clause
    max_var: u32,
    model: Option<Assignment>,
}

impl<S> RustSatAdapter<S> {
    /// Creates a new adapter wrapping the given solver
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            num_vars: 0,
            num_clauses: 0,
            max_var: 0,
            model: None,
        }
    }
}

fn backend<E: std::fmt::Display>(err: E) -> KodkodError {
    KodkodError::Backend(err.to_string())
}

impl<S: Solve> SATSolver for RustSatAdapter<S> {
    fn add_variables(&mut self, num_vars: u32) {
        // RustSat creates variables as clauses mention them; only track the count
        self.num_vars += num_vars;
    }

    fn add_clause(&mut self, lits: &[i32]) -> Result<()> {
        let lits = lits
            .iter()
            .map(|&lit| {
                if lit == 0 || lit.unsigned_abs() - 1 > Var::MAX_IDX {
                    return Err(KodkodError::Backend(format!(
                        "literal {} is out of range",
                        lit
                    )));
                }
                let var = Var::new(lit.unsigned_abs() - 1);
                Ok(if lit > 0 { var.pos_lit() } else { var.neg_lit() })
            })
            .collect::<Result<Vec<Lit>>>()?;

        if let Some(max) = lits.iter().map(|lit| lit.var().idx32() + 1).max() {
            self.max_var = self.max_var.max(max);
        }
        self.num_clauses += 1;
        self.solver
            .add_clause(Clause::from(&lits[..]))
            .map_err(backend)
    }

    fn solve(&mut self) -> Result<bool> {
        self.model = None;
        match self.solver.solve().map_err(backend)? {
            SolverResult::Sat => {
                if self.max_var > 0 {
                    let high_var = Var::new(self.max_var - 1);
                    self.model = Some(self.solver.solution(high_var).map_err(backend)?);
                }
                Ok(true)
            }
            SolverResult::Unsat => Ok(false),
            other => Err(KodkodError::Backend(format!(
                "SAT solver returned {:?}",
                other
            ))),
        }
    }

    fn value_of(&self, var: u32) -> bool {
        // variables no clause mentions are unconstrained
        if var == 0 || var > self.num_vars || var > self.max_var {
            return false;
        }
        self.model
            .as_ref()
            .is_some_and(|model| model.var_value(Var::new(var - 1)) == TernaryVal::True)
    }

    fn num_variables(&self) -> u32 {
        self.num_vars
    }

    fn num_clauses(&self) -> u32 {
        self.num_clauses
    }
}
