//! # kodkod-arith
//!
//! Bounded-width two's-complement integers for the Kodkod relational model finder.
//!
//! Integers are encoded as vectors of shared boolean circuit nodes, one node per
//! bit. Arithmetic, comparison, shifts and bitwise operations build circuits
//! through a [`BooleanFactory`], which folds constants and shares identical
//! gates. A circuit can then be flattened to CNF and handed to a SAT solver;
//! the resulting [`Model`] decodes the integers back.
//!
//! All arithmetic wraps at the factory's bitwidth.
//!
//! ## Example
//!
//! ```rust
//! use kodkod_arith::bool::{BooleanFactory, CircuitArena, Options, VariableAllocator};
//! use kodkod_arith::solver::Solver;
//!
//! # fn main() -> kodkod_arith::Result<()> {
//! let mut vars = VariableAllocator::new();
//! let x_vars = vars.allocate_int("x", 4);
//!
//! let arena = CircuitArena::new();
//! let factory = BooleanFactory::new(&arena, vars.num_variables(), Options::default())?;
//!
//! // x * 3 == -6 at bitwidth 4
//! let x = factory.int_variable(x_vars)?;
//! let formula = x.multiply(&factory.integer(3)).eq(&factory.integer(-6));
//!
//! let solution = Solver::new().solve(&factory, &formula)?;
//! let model = solution.model().expect("satisfiable");
//! assert_eq!(model.int_value(&x), -2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2024_compatibility)]

/// Boolean circuit representation and integer encoding
pub mod bool;

/// Boolean circuit to CNF translation
pub mod cnf;

/// SAT solver backends
pub mod engine;

/// Main solver API
pub mod solver;

/// Error types
pub mod error {
    //! Error types for kodkod-arith

    use thiserror::Error;

    /// Errors reported by circuit construction and solving
    #[derive(Error, Debug)]
    pub enum KodkodError {
        /// A concrete value was requested from a symbolic integer
        #[error("not constant: {0}")]
        NonConstant(String),

        /// Bit index outside the bitwidth
        #[error("bit index {index} out of bounds for bitwidth {bitwidth}")]
        IndexOutOfBounds {
            /// Requested index
            index: usize,
            /// Bitwidth of the factory
            bitwidth: usize,
        },

        /// Invalid argument
        #[error("invalid argument: {0}")]
        InvalidArgument(String),

        /// The SAT back end failed
        #[error("SAT backend error: {0}")]
        Backend(String),
    }

    /// Result type for kodkod-arith operations
    pub type Result<T> = std::result::Result<T, KodkodError>;
}

// Re-export commonly used types
pub use bool::{BoolValue, BooleanFactory, CircuitArena, Int, Options};
pub use error::{KodkodError, Result};
pub use solver::{Model, Solution, Solver};
