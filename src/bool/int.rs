//! Integer representation as bit-vector circuits
//!
//! Represents integers using bit-vectors in two's complement form.
//! Bits are stored in little-endian order (LSB first), and every vector is
//! implicitly sign-extended: reading past the stored width yields the sign bit.
//!
//! All arithmetic wraps at the factory's bitwidth. Results are never wider than
//! the bitwidth, so overflow silently truncates.

use crate::bool::{BoolValue, BooleanAccumulator, BooleanFactory, Operator};
use crate::{KodkodError, Result};
use log::debug;
use std::fmt;

/// Represents an integer using boolean values (bits) in two's complement form.
///
/// Bits are indexed from 0 (LSB) to width-1 (sign bit). An `Int` is immutable:
/// every operation returns a new vector built through the owning factory.
#[derive(Clone)]
pub struct Int<'a> {
    factory: &'a BooleanFactory<'a>,
    bits: Vec<BoolValue<'a>>,
}

impl<'a> Int<'a> {
    fn new(factory: &'a BooleanFactory<'a>, bits: Vec<BoolValue<'a>>) -> Self {
        debug_assert!(!bits.is_empty() && bits.len() <= factory.bitwidth());
        Self { factory, bits }
    }

    /// Creates an Int for `number` whose 1-bits are all `bit`
    ///
    /// Uses the fewest bits that represent `number` (capped at the bitwidth);
    /// 0-bits are FALSE. With `bit = TRUE` this is the constant `number`,
    /// otherwise the result is `number` when `bit` holds and 0 when it doesn't.
    pub(crate) fn literal(factory: &'a BooleanFactory<'a>, number: i32, bit: BoolValue<'a>) -> Self {
        let width = literal_width(number, factory.bitwidth());
        let bits = (0..width)
            .map(|i| {
                if (number >> i) & 1 == 0 {
                    BoolValue::FALSE
                } else {
                    bit
                }
            })
            .collect();
        Self::new(factory, bits)
    }

    /// Creates an Int with the given bits
    /// bits[0] is LSB, bits[width-1] is sign bit (two's complement)
    pub fn from_bits(factory: &'a BooleanFactory<'a>, bits: Vec<BoolValue<'a>>) -> Result<Self> {
        if bits.is_empty() || bits.len() > factory.bitwidth() {
            return Err(KodkodError::InvalidArgument(format!(
                "integer width must be in 1..={}, got {}",
                factory.bitwidth(),
                bits.len()
            )));
        }
        Ok(Self::new(factory, bits))
    }

    /// Returns the factory that built this integer
    pub fn factory(&self) -> &'a BooleanFactory<'a> {
        self.factory
    }

    /// Returns the number of stored bits
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// Returns the bit at the given index (LSB = 0)
    ///
    /// Indices at or past the width return the sign bit.
    pub fn bit(&self, i: usize) -> BoolValue<'a> {
        self.bits[i.min(self.bits.len() - 1)]
    }

    fn sign(&self) -> BoolValue<'a> {
        self.bits[self.bits.len() - 1]
    }

    /// Returns true if all bits are constants
    pub fn is_constant(&self) -> bool {
        self.bits.iter().all(|b| b.is_constant())
    }

    /// If constant, returns the value
    pub fn value(&self) -> Result<i32> {
        let mut concrete = Vec::with_capacity(self.bits.len());
        for bit in &self.bits {
            match bit.as_constant() {
                Some(c) => concrete.push(c.boolean_value()),
                None => {
                    return Err(KodkodError::NonConstant(format!("{:?} is not constant", self)))
                }
            }
        }
        Ok(decode(&concrete))
    }

    /// Returns a view of this integer's bits, sign-extended to the bitwidth
    pub fn twos_complement_bits(&self) -> TwosComplementBits<'_, 'a> {
        TwosComplementBits { int: self }
    }

    fn validate(&self, other: &Int<'a>) {
        assert!(
            std::ptr::eq(self.factory, other.factory),
            "{:?} and {:?} belong to different factories",
            self,
            other
        );
    }

    fn max_width(&self, other: &Int<'a>) -> usize {
        self.width().max(other.width())
    }

    // ---- Comparison ----

    /// Returns a circuit that holds iff this and the other integer are equal
    pub fn eq(&self, other: &Int<'a>) -> BoolValue<'a> {
        self.validate(other);
        let f = self.factory;
        let mut cmp = BooleanAccumulator::tree_gate(Operator::AND);
        for i in 0..self.max_width(other) {
            if cmp.add(f.iff(self.bit(i), other.bit(i))).is_some() {
                return BoolValue::FALSE;
            }
        }
        f.accumulate(cmp)
    }

    /// Returns a circuit that holds iff the integers differ
    pub fn neq(&self, other: &Int<'a>) -> BoolValue<'a> {
        self.factory.not(self.eq(other))
    }

    /// Returns a circuit encoding signed `self <= other`
    ///
    /// Ripple comparator from the sign bit down: a lower bit pair only matters
    /// while all higher bits are equal.
    pub fn lte(&self, other: &Int<'a>) -> BoolValue<'a> {
        self.validate(other);
        let f = self.factory;
        let last = self.max_width(other) - 1;
        let mut cmp = BooleanAccumulator::tree_gate(Operator::AND);

        // if other is negative, this must be negative too
        cmp.add(f.implies(other.bit(last), self.bit(last)));
        let mut prev_equals = f.iff(self.bit(last), other.bit(last));

        for i in (0..last).rev() {
            let (v0, v1) = (self.bit(i), other.bit(i));
            if cmp.add(f.implies(prev_equals, f.implies(v0, v1))).is_some() {
                break;
            }
            prev_equals = f.and(prev_equals, f.iff(v0, v1));
        }
        f.accumulate(cmp)
    }

    /// Returns a circuit encoding signed `self < other`
    pub fn lt(&self, other: &Int<'a>) -> BoolValue<'a> {
        let f = self.factory;
        let leq = self.lte(other);
        let differs = BooleanAccumulator::tree_gate_of(
            Operator::OR,
            (0..self.max_width(other)).map(|i| f.xor(self.bit(i), other.bit(i))),
        );
        f.and(leq, f.accumulate(differs))
    }

    /// Returns a circuit encoding signed `self > other`
    pub fn gt(&self, other: &Int<'a>) -> BoolValue<'a> {
        other.lt(self)
    }

    /// Returns a circuit encoding signed `self >= other`
    pub fn gte(&self, other: &Int<'a>) -> BoolValue<'a> {
        other.lte(self)
    }

    // ---- Arithmetic ----

    /// Returns `self + other`
    pub fn plus(&self, other: &Int<'a>) -> Int<'a> {
        self.ripple_add(other, false)
    }

    /// Returns `self - other`, computed as `self + !other + 1`
    pub fn minus(&self, other: &Int<'a>) -> Int<'a> {
        self.ripple_add(other, true)
    }

    fn ripple_add(&self, other: &Int<'a>, subtract: bool) -> Int<'a> {
        self.validate(other);
        let f = self.factory;
        // one extra bit for the carry out, within the bitwidth
        let width = (self.max_width(other) + 1).min(f.bitwidth());
        let mut carry = BoolValue::from(subtract);
        let bits = (0..width)
            .map(|i| {
                let v0 = self.bit(i);
                let v1 = if subtract {
                    f.not(other.bit(i))
                } else {
                    other.bit(i)
                };
                let sum = f.sum(v0, v1, carry);
                carry = f.carry(v0, v1, carry);
                sum
            })
            .collect();
        Int::new(f, bits)
    }

    /// Returns `self * other`
    ///
    /// Shift-add multiplier. The row of the sign bit has negative weight, so it
    /// is subtracted (added negated with carry-in TRUE) instead of added.
    pub fn multiply(&self, other: &Int<'a>) -> Int<'a> {
        self.validate(other);
        let f = self.factory;
        let width = (self.width() + other.width()).min(f.bitwidth());

        let first = self.bit(0);
        let mut mult: Vec<BoolValue<'a>> =
            (0..width).map(|j| f.and(first, other.bit(j))).collect();

        let last = width - 1;
        for i in 1..last {
            let i_bit = self.bit(i);
            let mut carry = BoolValue::FALSE;
            for j in 0..width - i {
                carry = add_and_carry(f, &mut mult, j + i, f.and(i_bit, other.bit(j)), carry);
            }
        }

        // With a single bit the first row is also the last one
        if last > 0 {
            let row = f.not(f.and(self.bit(last), other.bit(0)));
            add_and_carry(f, &mut mult, last, row, BoolValue::TRUE);
        }
        Int::new(f, mult)
    }

    /// Returns `self / other`, rounding towards zero
    ///
    /// The result of dividing by zero is unspecified.
    pub fn divide(&self, other: &Int<'a>) -> Int<'a> {
        self.validate(other);
        Int::new(self.factory, self.non_restoring_division(other, true))
    }

    /// Returns `self % other`; a non-zero remainder has the sign of `self`
    ///
    /// The result of dividing by zero is unspecified.
    pub fn modulo(&self, other: &Int<'a>) -> Int<'a> {
        self.validate(other);
        Int::new(self.factory, self.non_restoring_division(other, false))
    }

    /// Sign-extends the stored bits to `ext_width`
    fn extend(&self, ext_width: usize) -> Vec<BoolValue<'a>> {
        let sign = self.sign();
        let mut ext = self.bits.clone();
        ext.resize(ext_width.max(self.width()), sign);
        ext
    }

    /// Non-restoring division of `self` by `d`
    ///
    /// The partial remainder `s` is a ring buffer of `2 * bitwidth + 1` bits;
    /// shifting it left moves `sleft` instead of the data. Quotient digits are
    /// predicted from sign agreement and the result is corrected once at the end.
    fn non_restoring_division(&self, d: &Int<'a>, quotient: bool) -> Vec<BoolValue<'a>> {
        let f = self.factory;
        let width = f.bitwidth();
        let extended = width * 2 + 1;

        let mut s = self.extend(extended);
        let mut q = vec![BoolValue::FALSE; width];
        // svalues[i] is FALSE iff the i-th partial remainder is zero
        let mut svalues = Vec::with_capacity(width);
        let d_msb = d.bit(width);

        // index of the LSB of s
        let mut sleft = 0;
        for i in 0..width {
            svalues.push(f.accumulate(BooleanAccumulator::tree_gate_of(
                Operator::OR,
                s.iter().copied(),
            )));
            // index of the MSB of s
            let sright = (sleft + extended - 1) % extended;

            // next quotient digit is 1 iff sign(s) = sign(d)
            let qbit = f.iff(s[sright], d_msb);
            q[width - i - 1] = qbit;

            // shift left by one: the old MSB slot becomes the new LSB
            s[sright] = BoolValue::FALSE;
            sleft = sright;

            // subtract (2^width)d from s if qbit holds, add it otherwise
            let mut carry = qbit;
            let mut si = (sleft + width) % extended;
            for di in 0..=width {
                let dbit = f.xor(qbit, d.bit(di));
                let sbit = s[si];
                s[si] = f.sum(sbit, dbit, carry);
                carry = f.carry(sbit, dbit, carry);
                si = (si + 1) % extended;
            }
        }

        // s[0..=width] now holds the high order bits of the remainder
        debug_assert_eq!((sleft + width) % extended, 0);

        // correction needed if some partial remainder was zero, or the final
        // remainder is non-zero with a sign different from the dividend's
        let some_zero = f.not(f.accumulate(BooleanAccumulator::tree_gate_of(
            Operator::AND,
            svalues,
        )));
        let nonzero = f.accumulate(BooleanAccumulator::tree_gate_of(
            Operator::OR,
            s.iter().copied(),
        ));
        let incorrect = f.or(some_zero, f.and(f.xor(s[width], self.bit(width)), nonzero));
        let corrector = f.iff(s[width], d.bit(width));

        let bits = if quotient {
            // to two's complement: shift left by one and set the LSB
            q.rotate_right(1);
            q[0] = BoolValue::TRUE;

            // when incorrect: increment if corrector holds, decrement otherwise
            let sign = f.and(incorrect, f.not(corrector));
            let mut carry = f.and(incorrect, corrector);
            for qi in q.iter_mut() {
                let qbit = *qi;
                *qi = f.sum(qbit, sign, carry);
                carry = f.carry(qbit, sign, carry);
            }
            q
        } else {
            // when incorrect: subtract (2^width)d if corrector holds, add it otherwise
            let mut carry = f.and(incorrect, corrector);
            for (i, si) in s.iter_mut().take(width + 1).enumerate() {
                let dbit = f.and(incorrect, f.xor(corrector, d.bit(i)));
                let sbit = *si;
                *si = f.sum(sbit, dbit, carry);
                carry = f.carry(sbit, dbit, carry);
            }
            s.truncate(width);
            s
        };

        debug!(
            "{}-bit {} built, factory now has {} gates",
            width,
            if quotient { "quotient" } else { "remainder" },
            f.num_gates()
        );
        bits
    }

    /// Returns `-self`
    pub fn negate(&self) -> Int<'a> {
        Int::new(self.factory, vec![BoolValue::FALSE]).minus(self)
    }

    /// Returns the absolute value of `self`
    pub fn abs(&self) -> Int<'a> {
        self.choice(self.factory.not(self.sign()), &self.negate())
    }

    /// Returns -1, 0 or 1 according to the sign of `self`
    pub fn sgn(&self) -> Int<'a> {
        let f = self.factory;
        let nonzero = f.accumulate(BooleanAccumulator::tree_gate_of(
            Operator::OR,
            self.bits.iter().copied(),
        ));
        let mut bits = vec![nonzero, self.sign()];
        // at bitwidth 1 the only values are 0 and -1, both exact with one bit
        bits.truncate(f.bitwidth());
        Int::new(f, bits)
    }

    // ---- Shifts ----

    /// Returns `self << other`
    ///
    /// Barrel shifter: stage `i` shifts by `2^i` when bit `i` of `other` holds.
    /// Only the low `ceil(log2(bitwidth))` bits of `other` are consulted.
    pub fn shl(&self, other: &Int<'a>) -> Int<'a> {
        self.validate(other);
        let f = self.factory;
        let width = f.bitwidth();
        let mut shifted = self.extend(width);
        for stage in 0..shift_stages(width) {
            let shift = 1usize << stage;
            let bit = other.bit(stage);
            // high to low, so shifted[j - shift] still holds the previous stage
            for j in (0..width).rev() {
                let moved = if j < shift {
                    BoolValue::FALSE
                } else {
                    shifted[j - shift]
                };
                shifted[j] = f.ite(bit, moved, shifted[j]);
            }
        }
        debug!("{}-bit shl built in {} stages", width, shift_stages(width));
        Int::new(f, shifted)
    }

    /// Returns `self >>> other`, filling with zeros
    pub fn shr(&self, other: &Int<'a>) -> Int<'a> {
        self.shift_right(other, BoolValue::FALSE)
    }

    /// Returns `self >> other`, filling with the sign bit
    pub fn sha(&self, other: &Int<'a>) -> Int<'a> {
        self.shift_right(other, self.sign())
    }

    fn shift_right(&self, other: &Int<'a>, fill: BoolValue<'a>) -> Int<'a> {
        self.validate(other);
        let f = self.factory;
        let width = f.bitwidth();
        let mut shifted = self.extend(width);
        for stage in 0..shift_stages(width) {
            let shift = 1usize << stage;
            let bit = other.bit(stage);
            for j in 0..width {
                let moved = if j + shift < width {
                    shifted[j + shift]
                } else {
                    fill
                };
                shifted[j] = f.ite(bit, moved, shifted[j]);
            }
        }
        debug!("{}-bit right shift built in {} stages", width, shift_stages(width));
        Int::new(f, shifted)
    }

    // ---- Bitwise ----

    /// Returns the bitwise complement of `self`
    pub fn not(&self) -> Int<'a> {
        let f = self.factory;
        Int::new(f, self.bits.iter().map(|&b| f.not(b)).collect())
    }

    /// Returns the bitwise AND of the integers
    pub fn and(&self, other: &Int<'a>) -> Int<'a> {
        self.zip_with(other, |f, a, b| f.and(a, b))
    }

    /// Returns the bitwise OR of the integers
    pub fn or(&self, other: &Int<'a>) -> Int<'a> {
        self.zip_with(other, |f, a, b| f.or(a, b))
    }

    /// Returns the bitwise XOR of the integers
    pub fn xor(&self, other: &Int<'a>) -> Int<'a> {
        self.zip_with(other, |f, a, b| f.xor(a, b))
    }

    /// Returns `self` if `condition` holds and `other` otherwise
    pub fn choice(&self, condition: BoolValue<'a>, other: &Int<'a>) -> Int<'a> {
        self.zip_with(other, |f, a, b| f.ite(condition, a, b))
    }

    fn zip_with<F>(&self, other: &Int<'a>, gate: F) -> Int<'a>
    where
        F: Fn(&'a BooleanFactory<'a>, BoolValue<'a>, BoolValue<'a>) -> BoolValue<'a>,
    {
        self.validate(other);
        let f = self.factory;
        let bits = (0..self.max_width(other))
            .map(|i| gate(f, self.bit(i), other.bit(i)))
            .collect();
        Int::new(f, bits)
    }

    // ---- Variadic ----

    /// Returns the sum of `self` and all `others`, added as a balanced tree
    pub fn plus_all(&self, others: &[Int<'a>]) -> Int<'a> {
        self.reduce(others, Int::plus)
    }

    /// Returns the product of `self` and all `others`, multiplied as a balanced tree
    pub fn multiply_all(&self, others: &[Int<'a>]) -> Int<'a> {
        self.reduce(others, Int::multiply)
    }

    /// Returns the bitwise AND of `self` and all `others`
    pub fn and_all(&self, others: &[Int<'a>]) -> Int<'a> {
        self.apply_nary(Operator::AND, others)
    }

    /// Returns the bitwise OR of `self` and all `others`
    pub fn or_all(&self, others: &[Int<'a>]) -> Int<'a> {
        self.apply_nary(Operator::OR, others)
    }

    fn reduce<F>(&self, others: &[Int<'a>], op: F) -> Int<'a>
    where
        F: Fn(&Int<'a>, &Int<'a>) -> Int<'a>,
    {
        let mut ints = Vec::with_capacity(others.len() + 1);
        ints.push(self.clone());
        ints.extend_from_slice(others);

        // combine neighbours pairwise; an odd one out moves up a level unchanged
        while ints.len() > 1 {
            ints = ints
                .chunks(2)
                .map(|pair| match pair {
                    [a, b] => op(a, b),
                    [a] => a.clone(),
                    _ => unreachable!("chunks(2) yields one or two elements"),
                })
                .collect();
        }
        ints.swap_remove(0)
    }

    fn apply_nary(&self, op: Operator, others: &[Int<'a>]) -> Int<'a> {
        let f = self.factory;
        let width = others.iter().fold(self.width(), |width, other| {
            self.validate(other);
            width.max(other.width())
        });
        let bits = (0..width)
            .map(|i| {
                let mut acc = BooleanAccumulator::tree_gate_with(op, self.bit(i));
                for other in others {
                    if acc.add(other.bit(i)).is_some() {
                        break;
                    }
                }
                f.accumulate(acc)
            })
            .collect();
        Int::new(f, bits)
    }
}

impl fmt::Debug for Int<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b[")?;
        for (i, bit) in self.bits.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", bit.label())?;
        }
        write!(f, "]")
    }
}

/// Read-only view of an integer's bits over the full bitwidth
///
/// Positions past the integer's stored width read as its sign bit.
#[derive(Clone, Copy)]
pub struct TwosComplementBits<'i, 'a> {
    int: &'i Int<'a>,
}

impl<'i, 'a> TwosComplementBits<'i, 'a> {
    /// Returns the bitwidth of the owning factory
    pub fn len(&self) -> usize {
        self.int.factory.bitwidth()
    }

    /// Always false: the bitwidth is at least 1
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns bit `index`, or an error if it is outside `0..bitwidth`
    pub fn get(&self, index: usize) -> Result<BoolValue<'a>> {
        if index >= self.len() {
            return Err(KodkodError::IndexOutOfBounds {
                index,
                bitwidth: self.len(),
            });
        }
        Ok(self.int.bit(index))
    }

    /// Iterates over all `bitwidth` bits, LSB first
    pub fn iter(&self) -> impl Iterator<Item = BoolValue<'a>> + 'i {
        let int = self.int;
        (0..self.len()).map(move |i| int.bit(i))
    }
}

/// Number of bits needed to represent `number`, capped at `bitwidth`
fn literal_width(number: i32, bitwidth: usize) -> usize {
    if number == 0 {
        return 1;
    }
    let magnitude = if number < 0 { !number } else { number };
    (33 - magnitude.leading_zeros() as usize).min(bitwidth)
}

/// Barrel shifter stages for the given bitwidth: `ceil(log2(bitwidth))`
fn shift_stages(bitwidth: usize) -> usize {
    bitwidth.next_power_of_two().trailing_zeros() as usize
}

/// Adds `new_bit` with carry-in `cin` into `bits[index]`, returning the carry out
fn add_and_carry<'a>(
    f: &BooleanFactory<'a>,
    bits: &mut [BoolValue<'a>],
    index: usize,
    new_bit: BoolValue<'a>,
    cin: BoolValue<'a>,
) -> BoolValue<'a> {
    let old_bit = bits[index];
    bits[index] = f.sum(old_bit, new_bit, cin);
    f.carry(old_bit, new_bit, cin)
}

/// Decodes two's complement bits (LSB first); the top bit has negative weight
pub(crate) fn decode(bits: &[bool]) -> i32 {
    let last = bits.len() - 1;
    let mut value = 0i64;
    for (i, &set) in bits.iter().enumerate() {
        if set {
            if i == last {
                value -= 1i64 << i;
            } else {
                value += 1i64 << i;
            }
        }
    }
    value as i32
}
