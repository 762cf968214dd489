//! Packed three-valued lanes and per-gate lifted logic used by [`crate::fsim::Fsim`].

use crate::circuit::PrimType;

/// Number of simulation lanes packed into one machine word (§3, §4.3)
pub const WORD_WIDTH: usize = 64;

/// A word of `WORD_WIDTH` independent three-valued lanes, using the same
/// `(v0, v1)` convention as [`crate::bitvec::BitVector`]: lane bit pair
/// `(1, 0)` is a defined 0, `(0, 1)` is a defined 1, `(1, 1)` is X. `(0, 0)`
/// never occurs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lanes {
    pub v0: u64,
    pub v1: u64,
}

impl Lanes {
    pub const ZERO: Lanes = Lanes { v0: !0, v1: 0 };
    pub const ONE: Lanes = Lanes { v0: 0, v1: !0 };
    pub const X: Lanes = Lanes { v0: !0, v1: !0 };

    /// Evaluate `prim` over its inputs, lane by lane. `inputs` must match
    /// the gate's fanin arity (already checked at network build time).
    pub fn eval(prim: PrimType, inputs: &[Lanes]) -> Lanes {
        match prim {
            PrimType::C0 => Lanes::ZERO,
            PrimType::C1 => Lanes::ONE,
            PrimType::Buff => inputs[0],
            PrimType::Not => Lanes::not(inputs[0]),
            PrimType::And => Lanes::and(inputs),
            PrimType::Nand => Lanes::not(Lanes::and(inputs)),
            PrimType::Or => Lanes::or(inputs),
            PrimType::Nor => Lanes::not(Lanes::or(inputs)),
            PrimType::Xor => Lanes::xor(inputs),
            PrimType::Xnor => Lanes::not(Lanes::xor(inputs)),
        }
    }

    fn not(a: Lanes) -> Lanes {
        Lanes { v0: a.v1, v1: a.v0 }
    }

    /// output is 0 if any input is 0, 1 only if all inputs are 1, else X
    fn and(inputs: &[Lanes]) -> Lanes {
        let mut v0 = 0u64;
        let mut v1 = !0u64;
        for a in inputs {
            v0 |= a.v0;
            v1 &= a.v1;
        }
        Lanes { v0, v1 }
    }

    /// output is 1 if any input is 1, 0 only if all inputs are 0, else X
    fn or(inputs: &[Lanes]) -> Lanes {
        let mut v0 = !0u64;
        let mut v1 = 0u64;
        for a in inputs {
            v0 &= a.v0;
            v1 |= a.v1;
        }
        Lanes { v0, v1 }
    }

    /// X poisons the parity: if any input is X the output is X, otherwise
    /// the output is the XOR of the defined bits
    fn xor(inputs: &[Lanes]) -> Lanes {
        let mut any_x = 0u64;
        let mut parity = 0u64;
        for a in inputs {
            any_x |= a.v0 & a.v1;
            parity ^= a.v1;
        }
        Lanes {
            v0: !parity | any_x,
            v1: parity | any_x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_with_x_and_controlling_zero() {
        let r = Lanes::and(&[Lanes::X, Lanes::ZERO]);
        assert_eq!(r, Lanes::ZERO);
    }

    #[test]
    fn test_and_with_x_and_noncontrolling_one() {
        let r = Lanes::and(&[Lanes::X, Lanes::ONE]);
        assert_eq!(r, Lanes::X);
    }

    #[test]
    fn test_xor_with_x_is_x() {
        let r = Lanes::xor(&[Lanes::X, Lanes::ONE]);
        assert_eq!(r, Lanes::X);
    }

    #[test]
    fn test_xor_defined() {
        let r = Lanes::xor(&[Lanes::ONE, Lanes::ONE]);
        assert_eq!(r, Lanes::ZERO);
        let r = Lanes::xor(&[Lanes::ONE, Lanes::ZERO]);
        assert_eq!(r, Lanes::ONE);
    }

    #[test]
    fn test_nand_of_ones_is_zero() {
        let r = Lanes::eval(PrimType::Nand, &[Lanes::ONE, Lanes::ONE]);
        assert_eq!(r, Lanes::ZERO);
    }
}
