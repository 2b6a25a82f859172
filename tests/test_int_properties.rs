//! Property tests for Int arithmetic at wider bitwidths
//!
//! Exhaustive checks stop at small widths; these sample operands at widths up to 32.

use kodkod_arith::bool::{BooleanFactory, CircuitArena, Options};
use proptest::prelude::*;

fn wrap(value: i64, bitwidth: usize) -> i32 {
    let shift = 64 - bitwidth;
    ((value << shift) >> shift) as i32
}

proptest! {
    #[test]
    fn arithmetic_matches_wrapping_integers(
        bitwidth in 8usize..=32,
        x in any::<i32>(),
        y in any::<i32>(),
    ) {
        let (x, y) = (wrap(x as i64, bitwidth), wrap(y as i64, bitwidth));
        let arena = CircuitArena::new();
        let factory = BooleanFactory::new(&arena, 0, Options::default().with_bitwidth(bitwidth)).unwrap();
        let (a, b) = (factory.integer(x), factory.integer(y));
        let (x64, y64) = (x as i64, y as i64);

        prop_assert_eq!(a.value().unwrap(), x);
        prop_assert_eq!(a.plus(&b).value().unwrap(), wrap(x64 + y64, bitwidth));
        prop_assert_eq!(a.minus(&b).value().unwrap(), wrap(x64 - y64, bitwidth));
        prop_assert_eq!(a.multiply(&b).value().unwrap(), wrap(x64 * y64, bitwidth));
        prop_assert_eq!(a.lt(&b).as_constant().unwrap().boolean_value(), x < y);
        prop_assert_eq!(a.lte(&b).as_constant().unwrap().boolean_value(), x <= y);
        prop_assert_eq!(a.eq(&b).as_constant().unwrap().boolean_value(), x == y);
    }

    #[test]
    fn division_round_trips(
        bitwidth in 8usize..=32,
        x in any::<i32>(),
        y in any::<i32>(),
    ) {
        let (x, y) = (wrap(x as i64, bitwidth), wrap(y as i64, bitwidth));
        prop_assume!(y != 0);
        let arena = CircuitArena::new();
        let factory = BooleanFactory::new(&arena, 0, Options::default().with_bitwidth(bitwidth)).unwrap();
        let (a, b) = (factory.integer(x), factory.integer(y));

        let q = a.divide(&b).value().unwrap();
        let r = a.modulo(&b).value().unwrap();
        prop_assert_eq!(q, wrap(x as i64 / y as i64, bitwidth));
        prop_assert_eq!(r, wrap(x as i64 % y as i64, bitwidth));
        // q * y + r == x, modulo the bitwidth
        prop_assert_eq!(wrap(q as i64 * y as i64 + r as i64, bitwidth), x);
        prop_assert!(r == 0 || (r < 0) == (x < 0));
    }

    #[test]
    fn shifts_match_native_shifts(
        bitwidth in 8usize..=32,
        x in any::<i32>(),
        k in 0usize..32,
    ) {
        prop_assume!(k < bitwidth);
        let x = wrap(x as i64, bitwidth);
        let arena = CircuitArena::new();
        let factory = BooleanFactory::new(&arena, 0, Options::default().with_bitwidth(bitwidth)).unwrap();
        let a = factory.integer(x);
        let shift = factory.integer(k as i32);
        let mask = (1i64 << bitwidth) - 1;

        prop_assert_eq!(a.shl(&shift).value().unwrap(), wrap((x as i64) << k, bitwidth));
        prop_assert_eq!(a.shr(&shift).value().unwrap(), wrap((x as i64 & mask) >> k, bitwidth));
        prop_assert_eq!(a.sha(&shift).value().unwrap(), wrap(x as i64 >> k, bitwidth));
    }

    #[test]
    fn negate_and_sign_agree(bitwidth in 2usize..=32, x in any::<i32>()) {
        let x = wrap(x as i64, bitwidth);
        let arena = CircuitArena::new();
        let factory = BooleanFactory::new(&arena, 0, Options::default().with_bitwidth(bitwidth)).unwrap();
        let a = factory.integer(x);

        prop_assert_eq!(a.negate().value().unwrap(), wrap(-(x as i64), bitwidth));
        prop_assert_eq!(a.sgn().value().unwrap(), x.signum());
        prop_assert_eq!(a.abs().value().unwrap(), wrap((x as i64).abs(), bitwidth));
    }
}
