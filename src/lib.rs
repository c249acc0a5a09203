//! Cycle-counting SM83 simulator with a pre-decoding assembler.

#![warn(missing_docs)]

pub mod asm;
pub mod isa;
pub mod parse;
pub mod proc;
