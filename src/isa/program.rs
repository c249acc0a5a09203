use super::{Condition, Operation, Reg8, Reg16};
use std::fmt;

//===========================================================================//

/// A single pre-decoded instruction: an operation tag plus two parameter
/// slots whose meaning depends on the operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Instruction {
    /// The operation to execute.
    pub op: Operation,
    /// The first parameter slot.
    pub p1: u16,
    /// The second parameter slot.
    pub p2: u16,
}

impl Instruction {
    /// Constructs an instruction with both parameter slots set.
    pub fn new(op: Operation, p1: u16, p2: u16) -> Instruction {
        Instruction { op, p1, p2 }
    }

    /// Constructs an instruction that takes no parameters.
    pub fn bare(op: Operation) -> Instruction {
        Instruction { op, p1: 0, p2: 0 }
    }

    fn format_operands(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (p1, p2) = (self.p1, self.p2);
        match self.op {
            Operation::AdcAR8
            | Operation::AddAR8
            | Operation::AndAR8
            | Operation::CpAR8
            | Operation::OrAR8
            | Operation::SbcAR8
            | Operation::SubAR8
            | Operation::XorAR8 => write!(f, " a, {}", R8(p1)),
            Operation::AdcAMhl
            | Operation::AddAMhl
            | Operation::AndAMhl
            | Operation::CpAMhl
            | Operation::OrAMhl
            | Operation::SbcAMhl
            | Operation::SubAMhl
            | Operation::XorAMhl => write!(f, " a, [hl]"),
            Operation::AdcAI8
            | Operation::AddAI8
            | Operation::AndAI8
            | Operation::CpAI8
            | Operation::OrAI8
            | Operation::SbcAI8
            | Operation::SubAI8
            | Operation::XorAI8 => write!(f, " a, ${:02x}", p1 as u8),
            Operation::DecR8
            | Operation::IncR8
            | Operation::SwapR8
            | Operation::RlR8
            | Operation::RlcR8
            | Operation::RrR8
            | Operation::RrcR8
            | Operation::SlaR8
            | Operation::SraR8
            | Operation::SrlR8 => write!(f, " {}", R8(p1)),
            Operation::DecMhl
            | Operation::IncMhl
            | Operation::SwapMhl
            | Operation::RlMhl
            | Operation::RlcMhl
            | Operation::RrMhl
            | Operation::RrcMhl
            | Operation::SlaMhl
            | Operation::SraMhl
            | Operation::SrlMhl => write!(f, " [hl]"),
            Operation::AddHlR16 => write!(f, " hl, {}", R16(p1)),
            Operation::DecR16
            | Operation::IncR16
            | Operation::PopR16
            | Operation::PushR16 => write!(f, " {}", R16(p1)),
            Operation::BitU3R8 | Operation::ResU3R8 | Operation::SetU3R8 => {
                write!(f, " {}, {}", p1, R8(p2))
            }
            Operation::BitU3Mhl
            | Operation::ResU3Mhl
            | Operation::SetU3Mhl => write!(f, " {p1}, [hl]"),
            Operation::LdR8R8 => write!(f, " {}, {}", R8(p1), R8(p2)),
            Operation::LdR8I8 => write!(f, " {}, ${:02x}", R8(p1), p2 as u8),
            Operation::LdR16I16 => write!(f, " {}, ${:04x}", R16(p1), p2),
            Operation::LdMhlR8 => write!(f, " [hl], {}", R8(p1)),
            Operation::LdMhlI8 => write!(f, " [hl], ${:02x}", p1 as u8),
            Operation::LdR8Mhl => write!(f, " {}, [hl]", R8(p1)),
            Operation::LdMr16A => write!(f, " [{}], a", R16(p1)),
            Operation::LdM16A | Operation::LdhM16A => {
                write!(f, " [${p1:04x}], a")
            }
            Operation::LdhMcA => write!(f, " [c], a"),
            Operation::LdAMr16 => write!(f, " a, [{}]", R16(p1)),
            Operation::LdAM16 | Operation::LdhAM16 => {
                write!(f, " a, [${p1:04x}]")
            }
            Operation::LdhAMc => write!(f, " a, [c]"),
            Operation::LdMhliA => write!(f, " [hli], a"),
            Operation::LdMhldA => write!(f, " [hld], a"),
            Operation::LdAMhli => write!(f, " a, [hli]"),
            Operation::LdAMhld => write!(f, " a, [hld]"),
            Operation::CallI16 | Operation::JpI16 => write!(f, " ${p1:04x}"),
            Operation::CallCcI16 | Operation::JpCcI16 => {
                write!(f, " {}, ${:04x}", Cc(p1), p2)
            }
            Operation::JpHl => write!(f, " hl"),
            Operation::JrE8 => write!(f, " {}", p1 as i16),
            Operation::JrCcE8 => write!(f, " {}, {}", Cc(p1), p2 as i16),
            Operation::RetCc => write!(f, " {}", Cc(p1)),
            Operation::Rst => write!(f, " ${:02x}", p1 as u8),
            Operation::AddHlSp => write!(f, " hl, sp"),
            Operation::AddSpE8 => write!(f, " sp, {}", p1 as i8),
            Operation::DecSp | Operation::IncSp => write!(f, " sp"),
            Operation::LdSpI16 => write!(f, " sp, ${p1:04x}"),
            Operation::LdM16Sp => write!(f, " [${p1:04x}], sp"),
            Operation::LdHlSpE8 => {
                let offset = p1 as i8;
                if offset < 0 {
                    write!(f, " hl, sp-{}", offset.unsigned_abs())
                } else {
                    write!(f, " hl, sp+{offset}")
                }
            }
            Operation::LdSpHl => write!(f, " sp, hl"),
            Operation::PopAf | Operation::PushAf => write!(f, " af"),
            Operation::Ret
            | Operation::Reti
            | Operation::Rla
            | Operation::Rlca
            | Operation::Rra
            | Operation::Rrca
            | Operation::Ccf
            | Operation::Cpl
            | Operation::Daa
            | Operation::Di
            | Operation::Ei
            | Operation::Halt
            | Operation::Nop
            | Operation::Scf
            | Operation::Stop => Ok(()),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.op.mnemonic())?;
        self.format_operands(f)
    }
}

struct R8(u16);

impl fmt::Display for R8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Reg8::from_selector(self.0) {
            Some(reg) => reg.fmt(f),
            None => write!(f, "r8?{}", self.0),
        }
    }
}

struct R16(u16);

impl fmt::Display for R16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Reg16::from_selector(self.0) {
            Some(reg) => reg.fmt(f),
            None => write!(f, "r16?{}", self.0),
        }
    }
}

struct Cc(u16);

impl fmt::Display for Cc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Condition::from_selector(self.0) {
            Some(cond) => cond.fmt(f),
            None => write!(f, "cc?{}", self.0),
        }
    }
}

//===========================================================================//

/// An assembled program: an ordered sequence of pre-decoded instructions
/// that can no longer be modified.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Program {
    instructions: Box<[Instruction]>,
}

impl Program {
    /// The maximum number of instructions in a program.  Relative branch
    /// offsets between any two instructions always fit in an `i16`.
    pub const MAX_LEN: usize = i16::MAX as usize;

    /// Freezes a sequence of instructions into a program.
    pub fn from_instructions(instructions: Vec<Instruction>) -> Program {
        Program { instructions: instructions.into_boxed_slice() }
    }

    /// Returns the number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program contains no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns the instruction at the given index, if any.
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Returns all instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, instruction) in self.instructions.iter().enumerate() {
            writeln!(f, "{index:04}: {instruction}")?;
        }
        Ok(())
    }
}

//===========================================================================//


//===========================================================================//
