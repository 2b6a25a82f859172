//! Comprehensive tests for Int operations on constants
//!
//! Constant integers fold to constant results, so every operation can be
//! checked against native arithmetic truncated to the bitwidth.

use kodkod_arith::bool::{BooleanFactory, CircuitArena, Int, Options};
use kodkod_arith::{BoolValue, KodkodError};

fn factory(arena: &CircuitArena, bitwidth: usize) -> BooleanFactory<'_> {
    BooleanFactory::new(arena, 0, Options::default().with_bitwidth(bitwidth)).unwrap()
}

/// Truncates `value` to `bitwidth` bits and sign-extends the result
fn wrap(value: i64, bitwidth: usize) -> i32 {
    let shift = 64 - bitwidth;
    ((value << shift) >> shift) as i32
}

fn range(bitwidth: usize) -> std::ops::Range<i32> {
    -(1 << (bitwidth - 1))..(1 << (bitwidth - 1))
}

fn truth(value: BoolValue<'_>) -> bool {
    match value.as_constant() {
        Some(c) => c.boolean_value(),
        None => panic!("{:?} is not constant", value),
    }
}

#[test]
fn test_scenario_bitwidth_4() {
    let arena = CircuitArena::new();
    let factory = factory(&arena, 4);

    let a = factory.integer(3);
    let b = factory.integer(-5);

    assert_eq!(a.plus(&b).value().unwrap(), -2);
    // -15 truncated to 4 bits
    assert_eq!(a.multiply(&b).value().unwrap(), 1);
    assert!(!truth(a.lt(&b)));
    assert_eq!(a.divide(&b).value().unwrap(), 0);
    assert_eq!(a.modulo(&b).value().unwrap(), 3);
}

#[test]
fn test_scenario_shifts_bitwidth_8() {
    let arena = CircuitArena::new();
    let factory = factory(&arena, 8);

    let one = factory.integer(1);
    let minus_eight = factory.integer(-8);

    assert_eq!(one.shl(&factory.integer(3)).value().unwrap(), 8);
    // 11111000 >>> 1 = 01111100
    assert_eq!(minus_eight.shr(&one).value().unwrap(), 124);
    assert_eq!(minus_eight.sha(&one).value().unwrap(), -4);
}

#[test]
fn test_literals_round_trip() {
    for bitwidth in 1..=8 {
        let arena = CircuitArena::new();
        let factory = factory(&arena, bitwidth);
        for n in range(bitwidth) {
            let int = factory.integer(n);
            assert!(int.is_constant());
            assert!(int.width() <= bitwidth);
            assert_eq!(int.value().unwrap(), n, "bitwidth {}", bitwidth);
        }
    }
}

#[test]
fn test_full_bitwidth_literals() {
    let arena = CircuitArena::new();
    let factory = factory(&arena, 32);

    for n in [i32::MIN, i32::MIN + 1, -1, 0, 1, i32::MAX] {
        assert_eq!(factory.integer(n).value().unwrap(), n);
    }
    assert_eq!(factory.integer(i32::MAX).width(), 32);
    assert_eq!(factory.integer(0).width(), 1);
}

#[test]
fn test_exhaustive_arithmetic() {
    for bitwidth in 1..=5 {
        let arena = CircuitArena::new();
        let factory = factory(&arena, bitwidth);
        for x in range(bitwidth) {
            let a = factory.integer(x);
            for y in range(bitwidth) {
                let b = factory.integer(y);
                let (x64, y64) = (x as i64, y as i64);
                let ctx = format!("bitwidth {}: {} op {}", bitwidth, x, y);

                assert_eq!(a.plus(&b).value().unwrap(), wrap(x64 + y64, bitwidth), "{}", ctx);
                assert_eq!(a.minus(&b).value().unwrap(), wrap(x64 - y64, bitwidth), "{}", ctx);
                assert_eq!(
                    a.multiply(&b).value().unwrap(),
                    wrap(x64 * y64, bitwidth),
                    "{}",
                    ctx
                );
                if y != 0 {
                    assert_eq!(a.divide(&b).value().unwrap(), wrap(x64 / y64, bitwidth), "{}", ctx);
                    assert_eq!(a.modulo(&b).value().unwrap(), wrap(x64 % y64, bitwidth), "{}", ctx);
                }
            }
        }
    }
}

#[test]
fn test_exhaustive_comparisons() {
    for bitwidth in 1..=5 {
        let arena = CircuitArena::new();
        let factory = factory(&arena, bitwidth);
        for x in range(bitwidth) {
            let a = factory.integer(x);
            for y in range(bitwidth) {
                let b = factory.integer(y);

                assert_eq!(truth(a.eq(&b)), x == y);
                assert_eq!(truth(a.neq(&b)), x != y);
                assert_eq!(truth(a.lt(&b)), x < y);
                assert_eq!(truth(a.lte(&b)), x <= y);
                assert_eq!(truth(a.gt(&b)), x > y);
                assert_eq!(truth(a.gte(&b)), x >= y);

                // exactly one of a < b, a = b, b < a
                let holding = [a.lt(&b), a.eq(&b), b.lt(&a)]
                    .into_iter()
                    .filter(|&v| truth(v))
                    .count();
                assert_eq!(holding, 1);
            }
        }
    }
}

#[test]
fn test_exhaustive_shifts() {
    for bitwidth in 1..=6 {
        let arena = CircuitArena::new();
        let factory = factory(&arena, bitwidth);
        let mask = (1i64 << bitwidth) - 1;
        for x in range(bitwidth) {
            let a = factory.integer(x);
            for k in 0..bitwidth {
                let shift = factory.integer(k as i32);
                let x64 = x as i64;

                assert_eq!(a.shl(&shift).value().unwrap(), wrap(x64 << k, bitwidth));
                assert_eq!(a.shr(&shift).value().unwrap(), wrap((x64 & mask) >> k, bitwidth));
                assert_eq!(a.sha(&shift).value().unwrap(), wrap(x64 >> k, bitwidth));
            }
            assert_eq!(a.sha(&factory.integer(0)).value().unwrap(), x);
        }
    }
}

#[test]
fn test_exhaustive_bitwise_and_sign() {
    for bitwidth in 1..=5 {
        let arena = CircuitArena::new();
        let factory = factory(&arena, bitwidth);
        let min = -(1 << (bitwidth - 1));
        for x in range(bitwidth) {
            let a = factory.integer(x);

            assert_eq!(a.not().value().unwrap(), !x);
            assert_eq!(a.sgn().value().unwrap(), wrap(x.signum() as i64, bitwidth));
            assert_eq!(a.negate().value().unwrap(), wrap(-(x as i64), bitwidth));
            assert_eq!(a.abs().value().unwrap(), wrap((x as i64).abs(), bitwidth));
            if x != min {
                assert_eq!(a.negate().negate().value().unwrap(), x);
            }

            for y in range(bitwidth) {
                let b = factory.integer(y);
                assert_eq!(a.and(&b).value().unwrap(), x & y);
                assert_eq!(a.or(&b).value().unwrap(), x | y);
                assert_eq!(a.xor(&b).value().unwrap(), x ^ y);
                assert_eq!(a.choice(BoolValue::TRUE, &b).value().unwrap(), x);
                assert_eq!(a.choice(BoolValue::FALSE, &b).value().unwrap(), y);
            }
        }
    }
}

#[test]
fn test_identities() {
    let arena = CircuitArena::new();
    let factory = factory(&arena, 6);
    let zero = factory.integer(0);
    let one = factory.integer(1);

    for x in range(6) {
        let a = factory.integer(x);
        assert_eq!(a.plus(&zero).value().unwrap(), x);
        assert_eq!(a.multiply(&one).value().unwrap(), x);
        assert_eq!(one.multiply(&a).value().unwrap(), x);
        assert_eq!(a.minus(&a).value().unwrap(), 0);
    }
}

#[test]
fn test_variadic_operations() {
    let arena = CircuitArena::new();
    let factory = factory(&arena, 8);
    let values = [3, -7, 12, 5, -1];
    let ints: Vec<Int<'_>> = values.iter().map(|&n| factory.integer(n)).collect();
    let (first, rest) = ints.split_first().unwrap();

    let sum: i64 = values.iter().map(|&n| n as i64).sum();
    let product: i64 = values.iter().map(|&n| n as i64).product();
    assert_eq!(first.plus_all(rest).value().unwrap(), wrap(sum, 8));
    assert_eq!(first.multiply_all(rest).value().unwrap(), wrap(product, 8));
    assert_eq!(
        first.and_all(rest).value().unwrap(),
        values.iter().fold(-1, |acc, &n| acc & n)
    );
    assert_eq!(
        first.or_all(rest).value().unwrap(),
        values.iter().fold(0, |acc, &n| acc | n)
    );
}

#[test]
fn test_results_stay_within_bitwidth() {
    let arena = CircuitArena::new();
    let factory = factory(&arena, 4);
    let a = factory.integer(7);
    let b = factory.integer(-8);

    for result in [
        a.plus(&b),
        a.minus(&b),
        a.multiply(&b),
        a.divide(&b),
        a.modulo(&b),
        a.shl(&b),
        a.sha(&b),
        a.sgn(),
        a.negate(),
    ] {
        assert!(result.width() >= 1 && result.width() <= 4, "{:?}", result);
    }
}

#[test]
fn test_value_of_symbolic_integer() {
    let arena = CircuitArena::new();
    let factory = BooleanFactory::new(&arena, 3, Options::default()).unwrap();
    let x = factory.int_variable(1..4).unwrap();

    assert!(!x.is_constant());
    assert!(matches!(x.value(), Err(KodkodError::NonConstant(_))));

    // masking every symbolic bit leaves a constant
    let masked = x.and(&factory.integer(0));
    assert!(masked.is_constant());
    assert_eq!(masked.value().unwrap(), 0);
}

#[test]
fn test_twos_complement_bits_bounds() {
    let arena = CircuitArena::new();
    let factory = factory(&arena, 8);
    let minus_three = factory.integer(-3);
    let bits = minus_three.twos_complement_bits();

    assert_eq!(bits.len(), 8);
    let decoded: Vec<bool> = bits.iter().map(truth).collect();
    assert_eq!(decoded, [true, false, true, true, true, true, true, true]);
    assert!(bits.get(7).is_ok());
    assert!(matches!(
        bits.get(8),
        Err(KodkodError::IndexOutOfBounds {
            index: 8,
            bitwidth: 8
        })
    ));
}

#[test]
fn test_selector_literal() {
    let arena = CircuitArena::new();
    let factory = BooleanFactory::new(&arena, 1, Options::default()).unwrap();

    // the literal is 6 when the selector holds, 0 otherwise
    let selected = factory.integer_with(6, BoolValue::TRUE);
    let unselected = factory.integer_with(6, BoolValue::FALSE);
    assert_eq!(selected.value().unwrap(), factory.integer(6).value().unwrap());
    assert_eq!(unselected.value().unwrap(), 0);

    let symbolic = factory.integer_with(6, factory.variable(1));
    assert!(!symbolic.is_constant());
}
