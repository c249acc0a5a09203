//! Facilities for describing pre-decoded SM83 instructions.

mod program;

pub use program::{Instruction, Program};
use std::fmt;

//===========================================================================//

/// A general-purpose 8-bit register for an SM83 processor.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Reg8 {
    /// The A register (accumulator).
    A,
    /// The B register.
    B,
    /// The C register.
    C,
    /// The D register.
    D,
    /// The E register.
    E,
    /// The H register.
    H,
    /// The L register.
    L,
}

impl Reg8 {
    /// All 8-bit registers, in selector order.
    pub const ALL: [Reg8; 7] =
        [Reg8::A, Reg8::B, Reg8::C, Reg8::D, Reg8::E, Reg8::H, Reg8::L];

    /// Returns the selector value stored in an instruction parameter slot
    /// for this register.
    pub fn selector(self) -> u16 {
        self as u16
    }

    /// Decodes an instruction parameter slot as an 8-bit register selector.
    pub fn from_selector(selector: u16) -> Option<Reg8> {
        Reg8::ALL.get(usize::from(selector)).copied()
    }

    /// Looks up an 8-bit register by its assembler keyword.
    pub fn from_name(name: &str) -> Option<Reg8> {
        Reg8::ALL.into_iter().find(|reg| reg.name() == name)
    }

    /// Returns the assembler keyword for this register.
    pub fn name(self) -> &'static str {
        match self {
            Reg8::A => "a",
            Reg8::B => "b",
            Reg8::C => "c",
            Reg8::D => "d",
            Reg8::E => "e",
            Reg8::H => "h",
            Reg8::L => "l",
        }
    }
}

impl fmt::Display for Reg8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//===========================================================================//

/// A general-purpose 16-bit register pair for an SM83 processor.  The AF
/// pair and the stack pointer are not included, since they are only ever
/// addressed by dedicated operations.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Reg16 {
    /// The combined BC register.
    Bc,
    /// The combined DE register.
    De,
    /// The combined HL register.
    Hl,
}

impl Reg16 {
    /// All general-purpose 16-bit registers, in selector order.
    pub const ALL: [Reg16; 3] = [Reg16::Bc, Reg16::De, Reg16::Hl];

    /// Returns the selector value stored in an instruction parameter slot
    /// for this register pair.
    pub fn selector(self) -> u16 {
        self as u16
    }

    /// Decodes an instruction parameter slot as a 16-bit register selector.
    pub fn from_selector(selector: u16) -> Option<Reg16> {
        Reg16::ALL.get(usize::from(selector)).copied()
    }

    /// Looks up a 16-bit register pair by its assembler keyword.
    pub fn from_name(name: &str) -> Option<Reg16> {
        Reg16::ALL.into_iter().find(|reg| reg.name() == name)
    }

    /// Returns the assembler keyword for this register pair.
    pub fn name(self) -> &'static str {
        match self {
            Reg16::Bc => "bc",
            Reg16::De => "de",
            Reg16::Hl => "hl",
        }
    }
}

impl fmt::Display for Reg16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//===========================================================================//

/// A condition under which a conditional SM83 operation will be executed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Condition {
    /// Execute the operation if the zero flag is not set.
    Nz,
}

impl Condition {
    /// Returns the selector value stored in an instruction parameter slot
    /// for this condition.
    pub fn selector(self) -> u16 {
        self as u16
    }

    /// Decodes an instruction parameter slot as a condition selector.
    pub fn from_selector(selector: u16) -> Option<Condition> {
        match selector {
            0 => Some(Condition::Nz),
            _ => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Condition::Nz => "nz",
        })
    }
}

//===========================================================================//

/// An operation that can be executed by the simulator.  The meaning of an
/// instruction's two parameter slots depends on the operation; see the
/// documentation of each variant.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operation {
    /// Add an 8-bit register (p1) to A with carry.
    AdcAR8,
    /// Add the byte at [HL] to A with carry.
    AdcAMhl,
    /// Add an 8-bit immediate (p1) to A with carry.
    AdcAI8,
    /// Add an 8-bit register (p1) to A.
    AddAR8,
    /// Add the byte at [HL] to A.
    AddAMhl,
    /// Add an 8-bit immediate (p1) to A.
    AddAI8,
    /// Bitwise-AND an 8-bit register (p1) into A.
    AndAR8,
    /// Bitwise-AND the byte at [HL] into A.
    AndAMhl,
    /// Bitwise-AND an 8-bit immediate (p1) into A.
    AndAI8,
    /// Compare A to an 8-bit register (p1).
    CpAR8,
    /// Compare A to the byte at [HL].
    CpAMhl,
    /// Compare A to an 8-bit immediate (p1).
    CpAI8,
    /// Decrement an 8-bit register (p1).
    DecR8,
    /// Decrement the byte at [HL].
    DecMhl,
    /// Increment an 8-bit register (p1).
    IncR8,
    /// Increment the byte at [HL].
    IncMhl,
    /// Bitwise-OR an 8-bit register (p1) into A.
    OrAR8,
    /// Bitwise-OR the byte at [HL] into A.
    OrAMhl,
    /// Bitwise-OR an 8-bit immediate (p1) into A.
    OrAI8,
    /// Subtract an 8-bit register (p1) from A with carry.
    SbcAR8,
    /// Subtract the byte at [HL] from A with carry.
    SbcAMhl,
    /// Subtract an 8-bit immediate (p1) from A with carry.
    SbcAI8,
    /// Subtract an 8-bit register (p1) from A.
    SubAR8,
    /// Subtract the byte at [HL] from A.
    SubAMhl,
    /// Subtract an 8-bit immediate (p1) from A.
    SubAI8,
    /// Bitwise-XOR an 8-bit register (p1) into A.
    XorAR8,
    /// Bitwise-XOR the byte at [HL] into A.
    XorAMhl,
    /// Bitwise-XOR an 8-bit immediate (p1) into A.
    XorAI8,

    /// Add a 16-bit register (p1) to HL.
    AddHlR16,
    /// Decrement a 16-bit register (p1).
    DecR16,
    /// Increment a 16-bit register (p1).
    IncR16,

    /// Test bit p1 of an 8-bit register (p2).
    BitU3R8,
    /// Test bit p1 of the byte at [HL].
    BitU3Mhl,
    /// Clear bit p1 of an 8-bit register (p2).
    ResU3R8,
    /// Clear bit p1 of the byte at [HL].
    ResU3Mhl,
    /// Set bit p1 of an 8-bit register (p2).
    SetU3R8,
    /// Set bit p1 of the byte at [HL].
    SetU3Mhl,
    /// Swap the nibbles of an 8-bit register (p1).
    SwapR8,
    /// Swap the nibbles of the byte at [HL].
    SwapMhl,

    /// Rotate an 8-bit register (p1) left through the carry flag.
    RlR8,
    /// Rotate the byte at [HL] left through the carry flag.
    RlMhl,
    /// Rotate A left through the carry flag.
    Rla,
    /// Rotate an 8-bit register (p1) left.
    RlcR8,
    /// Rotate the byte at [HL] left.
    RlcMhl,
    /// Rotate A left.
    Rlca,
    /// Rotate an 8-bit register (p1) right through the carry flag.
    RrR8,
    /// Rotate the byte at [HL] right through the carry flag.
    RrMhl,
    /// Rotate A right through the carry flag.
    Rra,
    /// Rotate an 8-bit register (p1) right.
    RrcR8,
    /// Rotate the byte at [HL] right.
    RrcMhl,
    /// Rotate A right.
    Rrca,
    /// Shift an 8-bit register (p1) left arithmetically.
    SlaR8,
    /// Shift the byte at [HL] left arithmetically.
    SlaMhl,
    /// Shift an 8-bit register (p1) right arithmetically.
    SraR8,
    /// Shift the byte at [HL] right arithmetically.
    SraMhl,
    /// Shift an 8-bit register (p1) right logically.
    SrlR8,
    /// Shift the byte at [HL] right logically.
    SrlMhl,

    /// Load one 8-bit register (p2) into another (p1).
    LdR8R8,
    /// Load an 8-bit immediate (p2) into an 8-bit register (p1).
    LdR8I8,
    /// Load a 16-bit immediate (p2) into a 16-bit register (p1).
    LdR16I16,
    /// Store an 8-bit register (p1) at [HL].
    LdMhlR8,
    /// Store an 8-bit immediate (p1) at [HL].
    LdMhlI8,
    /// Load the byte at [HL] into an 8-bit register (p1).
    LdR8Mhl,
    /// Store A at the address held in a 16-bit register (p1).
    LdMr16A,
    /// Store A at a 16-bit immediate address (p1).
    LdM16A,
    /// Store A at a high-page address (p1).
    LdhM16A,
    /// Store A at the high-page address selected by C.
    LdhMcA,
    /// Load the byte at the address held in a 16-bit register (p1) into A.
    LdAMr16,
    /// Load the byte at a 16-bit immediate address (p1) into A.
    LdAM16,
    /// Load the byte at a high-page address (p1) into A.
    LdhAM16,
    /// Load the byte at the high-page address selected by C into A.
    LdhAMc,
    /// Store A at [HL], then increment HL.
    LdMhliA,
    /// Store A at [HL], then decrement HL.
    LdMhldA,
    /// Load the byte at [HL] into A, then increment HL.
    LdAMhli,
    /// Load the byte at [HL] into A, then decrement HL.
    LdAMhld,

    /// Call the subroutine at a 16-bit immediate address (p1).
    CallI16,
    /// Conditionally (p1) call the subroutine at a 16-bit address (p2).
    CallCcI16,
    /// Jump to the address held in HL.
    JpHl,
    /// Jump to a 16-bit immediate address (p1).
    JpI16,
    /// Conditionally (p1) jump to a 16-bit immediate address (p2).
    JpCcI16,
    /// Jump by a signed instruction count (p1).
    JrE8,
    /// Conditionally (p1) jump by a signed instruction count (p2).
    JrCcE8,
    /// Conditionally (p1) return from subroutine.
    RetCc,
    /// Return from subroutine.
    Ret,
    /// Return from interrupt.
    Reti,
    /// Call the subroutine at a fixed restart vector (p1).
    Rst,

    /// Add the stack pointer to HL.
    AddHlSp,
    /// Add a signed 8-bit immediate (p1) to the stack pointer.
    AddSpE8,
    /// Decrement the stack pointer.
    DecSp,
    /// Increment the stack pointer.
    IncSp,
    /// Load a 16-bit immediate (p1) into the stack pointer.
    LdSpI16,
    /// Store the stack pointer at a 16-bit immediate address (p1).
    LdM16Sp,
    /// Load the stack pointer plus a signed 8-bit offset (p1) into HL.
    LdHlSpE8,
    /// Load HL into the stack pointer.
    LdSpHl,
    /// Pop the AF register pair from the stack.
    PopAf,
    /// Pop a 16-bit register (p1) from the stack.
    PopR16,
    /// Push the AF register pair onto the stack.
    PushAf,
    /// Push a 16-bit register (p1) onto the stack.
    PushR16,

    /// Complement the carry flag.
    Ccf,
    /// Complement the A register.
    Cpl,
    /// Decimal adjust accumulator.
    Daa,
    /// Disable interrupts.
    Di,
    /// Enable interrupts.
    Ei,
    /// Pause execution until the next interrupt.
    Halt,
    /// No-op.
    Nop,
    /// Set the carry flag.
    Scf,
    /// Stop execution and enter very-low-power mode.
    Stop,
}

impl Operation {
    /// Returns the assembler mnemonic for this operation.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Operation::AdcAR8 | Operation::AdcAMhl | Operation::AdcAI8 => {
                "adc"
            }
            Operation::AddAR8
            | Operation::AddAMhl
            | Operation::AddAI8
            | Operation::AddHlR16
            | Operation::AddHlSp
            | Operation::AddSpE8 => "add",
            Operation::AndAR8 | Operation::AndAMhl | Operation::AndAI8 => {
                "and"
            }
            Operation::CpAR8 | Operation::CpAMhl | Operation::CpAI8 => "cp",
            Operation::DecR8
            | Operation::DecMhl
            | Operation::DecR16
            | Operation::DecSp => "dec",
            Operation::IncR8
            | Operation::IncMhl
            | Operation::IncR16
            | Operation::IncSp => "inc",
            Operation::OrAR8 | Operation::OrAMhl | Operation::OrAI8 => "or",
            Operation::SbcAR8 | Operation::SbcAMhl | Operation::SbcAI8 => {
                "sbc"
            }
            Operation::SubAR8 | Operation::SubAMhl | Operation::SubAI8 => {
                "sub"
            }
            Operation::XorAR8 | Operation::XorAMhl | Operation::XorAI8 => {
                "xor"
            }
            Operation::BitU3R8 | Operation::BitU3Mhl => "bit",
            Operation::ResU3R8 | Operation::ResU3Mhl => "res",
            Operation::SetU3R8 | Operation::SetU3Mhl => "set",
            Operation::SwapR8 | Operation::SwapMhl => "swap",
            Operation::RlR8 | Operation::RlMhl => "rl",
            Operation::Rla => "rla",
            Operation::RlcR8 | Operation::RlcMhl => "rlc",
            Operation::Rlca => "rlca",
            Operation::RrR8 | Operation::RrMhl => "rr",
            Operation::Rra => "rra",
            Operation::RrcR8 | Operation::RrcMhl => "rrc",
            Operation::Rrca => "rrca",
            Operation::SlaR8 | Operation::SlaMhl => "sla",
            Operation::SraR8 | Operation::SraMhl => "sra",
            Operation::SrlR8 | Operation::SrlMhl => "srl",
            Operation::LdhM16A
            | Operation::LdhMcA
            | Operation::LdhAM16
            | Operation::LdhAMc => "ldh",
            Operation::LdR8R8
            | Operation::LdR8I8
            | Operation::LdR16I16
            | Operation::LdMhlR8
            | Operation::LdMhlI8
            | Operation::LdR8Mhl
            | Operation::LdMr16A
            | Operation::LdM16A
            | Operation::LdAMr16
            | Operation::LdAM16
            | Operation::LdMhliA
            | Operation::LdMhldA
            | Operation::LdAMhli
            | Operation::LdAMhld
            | Operation::LdSpI16
            | Operation::LdM16Sp
            | Operation::LdHlSpE8
            | Operation::LdSpHl => "ld",
            Operation::CallI16 | Operation::CallCcI16 => "call",
            Operation::JpHl | Operation::JpI16 | Operation::JpCcI16 => "jp",
            Operation::JrE8 | Operation::JrCcE8 => "jr",
            Operation::RetCc | Operation::Ret => "ret",
            Operation::Reti => "reti",
            Operation::Rst => "rst",
            Operation::PopAf | Operation::PopR16 => "pop",
            Operation::PushAf | Operation::PushR16 => "push",
            Operation::Ccf => "ccf",
            Operation::Cpl => "cpl",
            Operation::Daa => "daa",
            Operation::Di => "di",
            Operation::Ei => "ei",
            Operation::Halt => "halt",
            Operation::Nop => "nop",
            Operation::Scf => "scf",
            Operation::Stop => "stop",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{Condition, Operation, Reg8, Reg16};

    #[test]
    fn reg8_selectors_round_trip() {
        for reg in Reg8::ALL {
            assert_eq!(Reg8::from_selector(reg.selector()), Some(reg));
        }
        assert_eq!(Reg8::A.selector(), 0);
        assert_eq!(Reg8::L.selector(), 6);
        assert_eq!(Reg8::from_selector(7), None);
    }

    #[test]
    fn reg16_selectors() {
        assert_eq!(Reg16::Bc.selector(), 0);
        assert_eq!(Reg16::Hl.selector(), 2);
        assert_eq!(Reg16::from_selector(1), Some(Reg16::De));
        assert_eq!(Reg16::from_selector(3), None);
    }

    #[test]
    fn condition_selectors() {
        assert_eq!(Condition::from_selector(0), Some(Condition::Nz));
        assert_eq!(Condition::from_selector(1), None);
    }

    #[test]
    fn mnemonics() {
        assert_eq!(Operation::AdcAMhl.mnemonic(), "adc");
        assert_eq!(Operation::LdhAMc.mnemonic(), "ldh");
        assert_eq!(Operation::LdHlSpE8.mnemonic(), "ld");
        assert_eq!(Operation::JrCcE8.to_string(), "jr");
    }
}

//===========================================================================//
