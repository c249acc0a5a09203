//! Pure arithmetic, logic, bit, and shift micro-operations.  Each function
//! takes its operands and the incoming F register, and returns the result
//! together with the outgoing F register.

use super::regs::{PROC_FLAG_C, PROC_FLAG_H, PROC_FLAG_N, PROC_FLAG_Z};

//===========================================================================//

fn flags(z: bool, n: bool, h: bool, c: bool) -> u8 {
    let mut f = 0;
    if z {
        f |= PROC_FLAG_Z;
    }
    if n {
        f |= PROC_FLAG_N;
    }
    if h {
        f |= PROC_FLAG_H;
    }
    if c {
        f |= PROC_FLAG_C;
    }
    f
}

fn carry_in(f: u8) -> u16 {
    u16::from((f & PROC_FLAG_C) != 0)
}

//===========================================================================//

/// An 8-bit operation that combines the accumulator with an operand.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AluOp {
    /// Add with carry.
    Adc,
    /// Add.
    Add,
    /// Bitwise AND.
    And,
    /// Compare (subtract without storing the result).
    Cp,
    /// Bitwise OR.
    Or,
    /// Subtract with carry.
    Sbc,
    /// Subtract.
    Sub,
    /// Bitwise XOR.
    Xor,
}

/// Applies an accumulator operation, returning the new accumulator value
/// and flags.  For [`AluOp::Cp`] the accumulator is returned unchanged.
pub fn alu8(op: AluOp, a: u8, val: u8, f: u8) -> (u8, u8) {
    match op {
        AluOp::Adc => add_with(a, val, carry_in(f)),
        AluOp::Add => add_with(a, val, 0),
        AluOp::And => {
            let result = a & val;
            (result, flags(result == 0, false, true, false))
        }
        AluOp::Cp => (a, sub_with(a, val, 0).1),
        AluOp::Or => {
            let result = a | val;
            (result, flags(result == 0, false, false, false))
        }
        AluOp::Sbc => sub_with(a, val, carry_in(f)),
        AluOp::Sub => sub_with(a, val, 0),
        AluOp::Xor => {
            let result = a ^ val;
            (result, flags(result == 0, false, false, false))
        }
    }
}

fn add_with(a: u8, val: u8, carry: u16) -> (u8, u8) {
    let (a, val) = (u16::from(a), u16::from(val));
    let tmp = a + val + carry;
    let h = (0x10 & (a ^ val ^ tmp)) != 0;
    let c = (0x100 & tmp) != 0;
    (tmp as u8, flags(tmp as u8 == 0, false, h, c))
}

fn sub_with(a: u8, val: u8, carry: u16) -> (u8, u8) {
    let (a, val) = (u16::from(a), u16::from(val));
    let tmp = a.wrapping_sub(val).wrapping_sub(carry);
    let h = (0x10 & (a ^ val ^ tmp)) != 0;
    let c = (0x100 & tmp) != 0;
    (tmp as u8, flags(tmp as u8 == 0, true, h, c))
}

/// Increments a byte.  Carry is preserved.
pub fn inc8(val: u8, f: u8) -> (u8, u8) {
    let result = val.wrapping_add(1);
    let h = (0x10 & (val ^ result)) != 0;
    (result, flags(result == 0, false, h, false) | (f & PROC_FLAG_C))
}

/// Decrements a byte.  Carry is preserved.
pub fn dec8(val: u8, f: u8) -> (u8, u8) {
    let result = val.wrapping_sub(1);
    let h = (0x10 & (val ^ result)) != 0;
    (result, flags(result == 0, true, h, false) | (f & PROC_FLAG_C))
}

/// Adds a 16-bit value to HL.  Zero is preserved.
pub fn add16(hl: u16, val: u16, f: u8) -> (u16, u8) {
    let (hl, val) = (u32::from(hl), u32::from(val));
    let tmp = hl + val;
    let h = (0x1000 & (hl ^ val ^ tmp)) != 0;
    let c = (0x10000 & tmp) != 0;
    (tmp as u16, flags(false, false, h, c) | (f & PROC_FLAG_Z))
}

/// Adds a signed offset to the stack pointer.  Half-carry and carry come
/// from the unsigned addition of the low bytes; zero and subtract are
/// always cleared.
pub fn add_sp_e8(sp: u16, offset: i8) -> (u16, u8) {
    let val = offset as i16 as u16;
    let tmp = sp.wrapping_add(val);
    let carries = sp ^ val ^ tmp;
    let h = (0x10 & carries) != 0;
    let c = (0x100 & carries) != 0;
    (tmp, flags(false, false, h, c))
}

/// Decimal-adjusts the accumulator after a BCD addition.  Subtract is
/// preserved and half-carry cleared.
pub fn daa(a: u8, f: u8) -> (u8, u8) {
    let mut tmp = u16::from(a);
    if (tmp & 0x0f) > 0x09 || (f & PROC_FLAG_H) != 0 {
        tmp += 0x06;
    }
    if (tmp & 0xf0) > 0x90 || (f & PROC_FLAG_C) != 0 {
        tmp += 0x60;
    }
    let z = tmp as u8 == 0;
    let c = (0x100 & tmp) != 0;
    (tmp as u8, flags(z, false, false, c) | (f & PROC_FLAG_N))
}

/// Complements the accumulator, setting subtract and half-carry.
pub fn cpl(a: u8, f: u8) -> (u8, u8) {
    (!a, f | PROC_FLAG_N | PROC_FLAG_H)
}

/// Inverts the carry flag, preserving zero.
pub fn ccf(f: u8) -> u8 {
    (f & PROC_FLAG_Z) | (!f & PROC_FLAG_C)
}

/// Sets the carry flag, preserving zero.
pub fn scf(f: u8) -> u8 {
    (f & PROC_FLAG_Z) | PROC_FLAG_C
}

//===========================================================================//

/// Tests bit `bit` (masked to 0-7) of `val`.  Carry is preserved.
pub fn bit(bit: u16, val: u8, f: u8) -> u8 {
    let z = (val & (1 << (bit & 7))) == 0;
    flags(z, false, true, false) | (f & PROC_FLAG_C)
}

/// Clears bit `bit` (masked to 0-7) of `val`.
pub fn res(bit: u16, val: u8) -> u8 {
    val & !(1 << (bit & 7))
}

/// Sets bit `bit` (masked to 0-7) of `val`.
pub fn set(bit: u16, val: u8) -> u8 {
    val | (1 << (bit & 7))
}

/// Exchanges the nibbles of a byte.
pub fn swap(val: u8) -> (u8, u8) {
    let result = val.rotate_right(4);
    (result, flags(result == 0, false, false, false))
}

//===========================================================================//

/// A rotate or shift operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShiftOp {
    /// Rotate left through carry.
    Rl,
    /// Rotate left.
    Rlc,
    /// Rotate right through carry.
    Rr,
    /// Rotate right.
    Rrc,
    /// Shift left, filling with zero.
    Sla,
    /// Shift right, filling with the sign bit.
    Sra,
    /// Shift right, filling with zero.
    Srl,
}

/// Applies a rotate or shift, setting zero from the result and carry from
/// the bit shifted out.
pub fn shift(op: ShiftOp, val: u8, f: u8) -> (u8, u8) {
    let carry = (f & PROC_FLAG_C) != 0;
    let (result, c) = match op {
        ShiftOp::Rl => ((val << 1) | u8::from(carry), val & 0x80 != 0),
        ShiftOp::Rlc => (val.rotate_left(1), val & 0x80 != 0),
        ShiftOp::Rr => ((val >> 1) | (u8::from(carry) << 7), val & 1 != 0),
        ShiftOp::Rrc => (val.rotate_right(1), val & 1 != 0),
        ShiftOp::Sla => (val << 1, val & 0x80 != 0),
        ShiftOp::Sra => ((val >> 1) | (val & 0x80), val & 1 != 0),
        ShiftOp::Srl => (val >> 1, val & 1 != 0),
    };
    (result, flags(result == 0, false, false, c))
}

/// Applies an accumulator-only rotate (`rla`, `rlca`, `rra`, `rrca`).
/// Unlike [`shift`], zero is always cleared.
pub fn shift_a(op: ShiftOp, a: u8, f: u8) -> (u8, u8) {
    let (result, f) = shift(op, a, f);
    (result, f & PROC_FLAG_C)
}

//===========================================================================//


//===========================================================================//
