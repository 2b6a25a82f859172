//! Arena allocator for gate inputs
//!
//! Wraps `bumpalo::Bump`. Every gate the factory builds stores its inputs here,
//! and `BoolValue`s refer to them through [`Handle`]s. All allocations are freed
//! at once when the arena is dropped.

use super::Handle;
use bumpalo::Bump;

/// Arena that owns the input lists of circuit gates
///
/// Create one per problem and lend it to a [`BooleanFactory`](super::BooleanFactory);
/// the borrow checker then guarantees no circuit node outlives its inputs.
pub struct CircuitArena {
    bump: Bump,
}

impl CircuitArena {
    /// Creates a new arena allocator
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Allocates a value and returns a handle to it
    pub(crate) fn alloc_handle<T>(&self, value: T) -> Handle<'_, T> {
        let allocated: &T = self.bump.alloc(value);
        Handle::new(allocated)
    }

    /// Copies a slice into the arena and returns a handle to it
    pub(crate) fn alloc_slice_handle<T: Copy>(&self, slice: &[T]) -> Handle<'_, [T]> {
        let allocated: &[T] = self.bump.alloc_slice_copy(slice);
        Handle::new(allocated)
    }

    /// Total bytes reserved by the arena so far
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for CircuitArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_resolve_to_allocated_values() {
        let arena = CircuitArena::new();
        let one = arena.alloc_handle(7u32);
        let many = arena.alloc_slice_handle(&[1, 2, 3]);

        assert_eq!(*one.get(), 7);
        assert_eq!(many.get(), &[1, 2, 3]);
        assert!(arena.allocated_bytes() > 0);
    }

    #[test]
    fn handles_compare_by_address() {
        let arena = CircuitArena::new();
        let a = arena.alloc_handle(1u8);
        let b = arena.alloc_handle(1u8);

        assert_eq!(a, a);
        assert_ne!(a, b);
    }
}
