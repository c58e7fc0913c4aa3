use std::fmt;

use num_bigint::BigUint;
use num_traits::{One, Zero};

pub trait BitWord: Clone + Ord + Eq + fmt::Debug + From<u64> + Send + Sync + 'static {
    const MAX_VARS: Option<u32>;

    fn zero() -> Self;

    fn low_ones(count: u32) -> Self;

    fn pow2(exp: u32) -> Self;

    fn bit(&self, pos: u32) -> bool;

    fn set_bit(&mut self, pos: u32);

    fn and(&self, other: &Self) -> Self;

    fn and_not(&self, other: &Self) -> Self;

    fn masked_eq(&self, mask: &Self, expected: &Self) -> bool;

    fn lowest_set_bit(&self) -> Option<u32>;

    fn add_pow2(&mut self, exp: u32);

    // false, leaving self untouched, when the result would be negative
    fn sub_pow2(&mut self, exp: u32) -> bool;

    fn reached_limit(&self, num_vars: u32) -> bool;
}

impl BitWord for u64 {
    // bit N and a jump of 2^N must both fit
    const MAX_VARS: Option<u32> = Some(62);

    fn zero() -> Self {
        0
    }

    fn low_ones(count: u32) -> Self {
        if count >= u64::BITS {
            u64::MAX
        } else {
            (1u64 << count) - 1
        }
    }

    fn pow2(exp: u32) -> Self {
        1u64 << exp
    }

    fn bit(&self, pos: u32) -> bool {
        pos < u64::BITS && (*self >> pos) & 1 == 1
    }

    fn set_bit(&mut self, pos: u32) {
        *self |= 1u64 << pos;
    }

    fn and(&self, other: &Self) -> Self {
        *self & *other
    }

    fn and_not(&self, other: &Self) -> Self {
        *self & !*other
    }

    fn masked_eq(&self, mask: &Self, expected: &Self) -> bool {
        *self & *mask == *expected
    }

    fn lowest_set_bit(&self) -> Option<u32> {
        if *self == 0 {
            None
        } else {
            Some(self.trailing_zeros())
        }
    }

    fn add_pow2(&mut self, exp: u32) {
        *self += 1u64 << exp;
    }

    fn sub_pow2(&mut self, exp: u32) -> bool {
        match self.checked_sub(1u64 << exp) {
            Some(v) => {
                *self = v;
                true
            }
            None => false,
        }
    }

    fn reached_limit(&self, num_vars: u32) -> bool {
        *self >= 1u64 << num_vars
    }
}

impl BitWord for BigUint {
    const MAX_VARS: Option<u32> = None;

    fn zero() -> Self {
        Zero::zero()
    }

    fn low_ones(count: u32) -> Self {
        (BigUint::one() << count) - 1u32
    }

    fn pow2(exp: u32) -> Self {
        BigUint::one() << exp
    }

    fn bit(&self, pos: u32) -> bool {
        BigUint::bit(self, u64::from(pos))
    }

    fn set_bit(&mut self, pos: u32) {
        BigUint::set_bit(self, u64::from(pos), true);
    }

    fn and(&self, other: &Self) -> Self {
        self & other
    }

    fn and_not(&self, other: &Self) -> Self {
        self ^ &(self & other)
    }

    fn masked_eq(&self, mask: &Self, expected: &Self) -> bool {
        let mut value = self.iter_u64_digits();
        let mut mask = mask.iter_u64_digits();
        let mut expected = expected.iter_u64_digits();
        loop {
            let v = value.next().unwrap_or(0);
            match (mask.next(), expected.next()) {
                (None, None) => return true,
                (m, e) => {
                    if v & m.unwrap_or(0) != e.unwrap_or(0) {
                        return false;
                    }
                }
            }
        }
    }

    fn lowest_set_bit(&self) -> Option<u32> {
        // positions are bounded by the variable count, which is a u32
        self.trailing_zeros().map(|tz| tz as u32)
    }

    fn add_pow2(&mut self, exp: u32) {
        *self += BigUint::one() << exp;
    }

    fn sub_pow2(&mut self, exp: u32) -> bool {
        let step = BigUint::one() << exp;
        if *self < step {
            return false;
        }
        *self -= step;
        true
    }

    // a jump never exceeds 2^N and the counter stays below 2^N before it,
    // so probing the guard bit is exact
    fn reached_limit(&self, num_vars: u32) -> bool {
        BitWord::bit(self, num_vars)
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::BitWord;

    #[test]
    fn masked_eq_matches_materialised_and() {
        let value = BigUint::from(0b1011_0110u64) << 70u32;
        let mask = BigUint::from(0b0011_1100u64) << 70u32;
        let expected = value.and(&mask);
        assert!(value.masked_eq(&mask, &expected));
        assert!(!value.masked_eq(&mask, &(expected.clone() + 1u32)));
        assert!(!BigUint::from(0u64).masked_eq(&BigUint::from(1u64), &BigUint::from(1u64)));
    }

    #[test]
    fn guard_bit_agrees_with_numeric_limit() {
        for n in [1u32, 5, 40, 62] {
            let mut fixed = <u64 as BitWord>::pow2(n) - 1;
            let mut wide = <BigUint as BitWord>::pow2(n) - 1u32;
            assert!(!fixed.reached_limit(n));
            assert!(!wide.reached_limit(n));
            fixed.add_pow2(0);
            wide.add_pow2(0);
            assert!(fixed.reached_limit(n));
            assert!(wide.reached_limit(n));
        }
    }

    #[test]
    fn and_not_clears_other_bits() {
        assert_eq!(BitWord::and_not(&0b1110u64, &0b0110), 0b1000);
        let a = BigUint::from(0b1110u64);
        let b = BigUint::from(0b0110u64);
        assert_eq!(a.and_not(&b), BigUint::from(0b1000u64));
    }

    #[test]
    fn sub_pow2_refuses_to_go_negative() {
        let mut fixed = 0b0110u64;
        assert!(fixed.sub_pow2(2));
        assert_eq!(fixed, 0b0010);
        assert!(!fixed.sub_pow2(2));
        assert_eq!(fixed, 0b0010);

        let mut wide = BigUint::from(1u64) << 70u32;
        assert!(wide.sub_pow2(0));
        assert_eq!(wide, <BigUint as BitWord>::low_ones(70));
        assert!(!wide.sub_pow2(70));
        assert_eq!(wide, <BigUint as BitWord>::low_ones(70));
    }

    #[test]
    fn lowest_set_bit_of_zero_is_none() {
        assert_eq!(0u64.lowest_set_bit(), None);
        assert_eq!(<BigUint as BitWord>::zero().lowest_set_bit(), None);
        assert_eq!(0b1000u64.lowest_set_bit(), Some(3));
    }
}
