//! Packed three-valued vectors: [`BitVector`] is the primitive, [`TestVector`],
//! [`InputVector`] and [`DffVector`] are length-specialized wrappers over it.

mod bitvector;
mod testvector;

pub use bitvector::{BitVector, Val3, WORD_WIDTH};
pub use testvector::{DffVector, InputVector, TestVector};
