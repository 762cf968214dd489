//! `TestVector`, `InputVector` and `DffVector`: length-specialized wrappers
//! around [`BitVector`].

use crate::bitvec::bitvector::{BitVector, Val3};
use crate::ids::FaultType;

/// A three-valued vector over primary inputs only
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InputVector(BitVector);

impl InputVector {
    /// Create a new all-X input vector over `nb_inputs` primary inputs
    pub fn new(nb_inputs: usize) -> Self {
        InputVector(BitVector::new_x(nb_inputs))
    }

    /// Read the underlying bit vector
    pub fn bits(&self) -> &BitVector {
        &self.0
    }

    /// Read the value of input `i`
    pub fn val(&self, i: usize) -> Val3 {
        self.0.val(i)
    }

    /// Set the value of input `i`
    pub fn set(&mut self, i: usize, v: Val3) {
        self.0.set(i, v);
    }
}

/// A three-valued vector over DFF state only
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DffVector(BitVector);

impl DffVector {
    /// Create a new all-X DFF vector over `nb_dffs` flip-flops
    pub fn new(nb_dffs: usize) -> Self {
        DffVector(BitVector::new_x(nb_dffs))
    }

    /// Read the underlying bit vector
    pub fn bits(&self) -> &BitVector {
        &self.0
    }

    /// Read the value of DFF `i`
    pub fn val(&self, i: usize) -> Val3 {
        self.0.val(i)
    }

    /// Set the value of DFF `i`
    pub fn set(&mut self, i: usize, v: Val3) {
        self.0.set(i, v);
    }
}

/// A full test pattern, wrapping a [`BitVector`] of length `input_num`
/// (stuck-at) or `2 * input_num + dff_num` (transition-delay).
///
/// Ordering: for stuck-at, `[inputs, DFFs]`; for transition-delay,
/// `[inputs-time-0, DFFs-time-0, inputs-time-1]`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TestVector {
    fault_type: FaultType,
    nb_inputs: usize,
    nb_dffs: usize,
    bits: BitVector,
}

impl TestVector {
    /// Create a new all-X test vector for the given fault model and network shape
    pub fn new(fault_type: FaultType, nb_inputs: usize, nb_dffs: usize) -> Self {
        let len = match fault_type {
            FaultType::StuckAt => nb_inputs + nb_dffs,
            FaultType::TransitionDelay => 2 * nb_inputs + nb_dffs,
        };
        TestVector {
            fault_type,
            nb_inputs,
            nb_dffs,
            bits: BitVector::new_x(len),
        }
    }

    /// The fault model this vector is laid out for
    pub fn fault_type(&self) -> FaultType {
        self.fault_type
    }

    /// The underlying packed bits, in the ordering documented on [`TestVector`]
    pub fn bits(&self) -> &BitVector {
        &self.bits
    }

    /// Mutable access to the underlying packed bits
    pub fn bits_mut(&mut self) -> &mut BitVector {
        &mut self.bits
    }

    /// Index of primary input `i` at time 0 (always valid) or time 1
    /// (transition-delay only) within the packed bit vector
    fn input_index(&self, i: usize, time1: bool) -> usize {
        assert!(i < self.nb_inputs);
        if !time1 {
            i
        } else {
            assert_eq!(self.fault_type, FaultType::TransitionDelay);
            self.nb_inputs + self.nb_dffs + i
        }
    }

    fn dff_index(&self, i: usize) -> usize {
        assert!(i < self.nb_dffs);
        self.nb_inputs + i
    }

    /// Value of primary input `i` at time 0
    pub fn input_val(&self, i: usize) -> Val3 {
        self.bits.val(self.input_index(i, false))
    }

    /// Set primary input `i` at time 0
    pub fn set_input(&mut self, i: usize, v: Val3) {
        let idx = self.input_index(i, false);
        self.bits.set(idx, v);
    }

    /// Value of primary input `i` at time 1 (transition-delay only)
    pub fn input_val_time1(&self, i: usize) -> Val3 {
        self.bits.val(self.input_index(i, true))
    }

    /// Set primary input `i` at time 1 (transition-delay only)
    pub fn set_input_time1(&mut self, i: usize, v: Val3) {
        let idx = self.input_index(i, true);
        self.bits.set(idx, v);
    }

    /// Value of DFF `i` (time 0: the only meaningful frame for DFF state)
    pub fn dff_val(&self, i: usize) -> Val3 {
        self.bits.val(self.dff_index(i))
    }

    /// Set DFF `i`
    pub fn set_dff(&mut self, i: usize, v: Val3) {
        let idx = self.dff_index(i);
        self.bits.set(idx, v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stuck_at_layout() {
        let mut tv = TestVector::new(FaultType::StuckAt, 3, 2);
        assert_eq!(tv.bits().len(), 5);
        tv.set_input(0, Val3::One);
        tv.set_dff(1, Val3::Zero);
        assert_eq!(tv.input_val(0), Val3::One);
        assert_eq!(tv.dff_val(1), Val3::Zero);
    }

    #[test]
    fn test_transition_delay_layout() {
        let mut tv = TestVector::new(FaultType::TransitionDelay, 2, 1);
        assert_eq!(tv.bits().len(), 5); // 2*2 + 1
        tv.set_input(0, Val3::Zero);
        tv.set_input_time1(0, Val3::One);
        assert_eq!(tv.input_val(0), Val3::Zero);
        assert_eq!(tv.input_val_time1(0), Val3::One);
    }
}
