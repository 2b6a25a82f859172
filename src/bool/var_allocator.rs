//! Variable allocation for SAT encoding
//!
//! Pre-allocates SAT variable IDs for named integer variables before the
//! factory is created.

use rustc_hash::FxHashMap;
use std::ops::Range;

/// Allocates SAT variables for the bits of named integers
///
/// Each integer gets `width` consecutive variables, least significant bit first.
/// Pass [`num_variables`](Self::num_variables) to
/// [`BooleanFactory::new`](super::BooleanFactory::new) and hand each range to
/// [`BooleanFactory::int_variable`](super::BooleanFactory::int_variable).
#[derive(Debug)]
pub struct VariableAllocator {
    next_var: u32,
    int_vars: FxHashMap<String, Range<u32>>,
}

impl VariableAllocator {
    /// Creates a new variable allocator
    pub fn new() -> Self {
        Self {
            next_var: 1, // Variables start at 1 (DIMACS convention)
            int_vars: FxHashMap::default(),
        }
    }

    /// Allocates `width` variables for the integer called `name`
    ///
    /// # Returns
    /// Range of variable IDs allocated; its first variable is the LSB
    ///
    /// # Panics
    /// Panics if `name` was already allocated or `width` is zero.
    pub fn allocate_int(&mut self, name: &str, width: usize) -> Range<u32> {
        assert!(width > 0, "integer {} must have at least one bit", name);
        assert!(
            !self.int_vars.contains_key(name),
            "integer {} is already allocated",
            name
        );

        let start = self.next_var;
        let end = start + width as u32;
        let range = start..end;

        self.int_vars.insert(name.to_string(), range.clone());
        self.next_var = end;

        range
    }

    /// Returns the total number of variables allocated
    pub fn num_variables(&self) -> u32 {
        self.next_var - 1
    }

    /// Gets the variable range for an integer
    pub fn range_of(&self, name: &str) -> Option<&Range<u32>> {
        self.int_vars.get(name)
    }
}

impl Default for VariableAllocator {
    fn default() -> Self {
        Self::new()
    }
}
