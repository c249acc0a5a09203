use crate::isa::{Condition, Reg8, Reg16};
use std::fmt;

//===========================================================================//

/// Zero flag: set when an operation's result is zero.
pub const PROC_FLAG_Z: u8 = 0b1000_0000;
/// Subtract flag: set by subtract-family operations.
pub const PROC_FLAG_N: u8 = 0b0100_0000;
/// Half-carry flag: carry/borrow between the low and high nibble.
pub const PROC_FLAG_H: u8 = 0b0010_0000;
/// Carry flag.
pub const PROC_FLAG_C: u8 = 0b0001_0000;

/// The bits of the F register that can ever be set.
pub const REG_F_MASK: u8 =
    PROC_FLAG_Z | PROC_FLAG_N | PROC_FLAG_H | PROC_FLAG_C;

pub(crate) fn pack(hi: u8, lo: u8) -> u16 {
    (u16::from(hi) << 8) | u16::from(lo)
}

pub(crate) fn unpack(word: u16) -> (u8, u8) {
    ((word >> 8) as u8, word as u8)
}

//===========================================================================//

/// The register file of a simulated SM83 processor.  The 8-bit registers
/// are stored only as halves of their 16-bit pairs, so writing either view
/// is immediately visible through the other.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Registers {
    af: u16,
    bc: u16,
    de: u16,
    hl: u16,
    sp: u16,
    pc: u16,
}

impl Registers {
    /// Returns a register file with every register zeroed.
    pub fn new() -> Registers {
        Registers::default()
    }

    /// Returns the value of an 8-bit general register.
    pub fn get_r8(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => unpack(self.af).0,
            Reg8::B => unpack(self.bc).0,
            Reg8::C => unpack(self.bc).1,
            Reg8::D => unpack(self.de).0,
            Reg8::E => unpack(self.de).1,
            Reg8::H => unpack(self.hl).0,
            Reg8::L => unpack(self.hl).1,
        }
    }

    /// Sets the value of an 8-bit general register.
    pub fn set_r8(&mut self, reg: Reg8, value: u8) {
        let (pair, high) = match reg {
            Reg8::A => (&mut self.af, true),
            Reg8::B => (&mut self.bc, true),
            Reg8::C => (&mut self.bc, false),
            Reg8::D => (&mut self.de, true),
            Reg8::E => (&mut self.de, false),
            Reg8::H => (&mut self.hl, true),
            Reg8::L => (&mut self.hl, false),
        };
        let (hi, lo) = unpack(*pair);
        *pair = if high { pack(value, lo) } else { pack(hi, value) };
    }

    /// Returns the value of a general 16-bit register pair.
    pub fn get_r16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::Bc => self.bc,
            Reg16::De => self.de,
            Reg16::Hl => self.hl,
        }
    }

    /// Sets the value of a general 16-bit register pair.
    pub fn set_r16(&mut self, reg: Reg16, word: u16) {
        match reg {
            Reg16::Bc => self.bc = word,
            Reg16::De => self.de = word,
            Reg16::Hl => self.hl = word,
        }
    }

    /// Returns the A register.
    pub fn a(&self) -> u8 {
        self.get_r8(Reg8::A)
    }

    /// Sets the A register.
    pub fn set_a(&mut self, value: u8) {
        self.set_r8(Reg8::A, value);
    }

    /// Returns the F (flags) register.
    pub fn f(&self) -> u8 {
        unpack(self.af).1
    }

    /// Sets the F (flags) register.  The low nibble is always cleared.
    pub fn set_f(&mut self, value: u8) {
        self.af = pack(self.a(), value & REG_F_MASK);
    }

    /// Returns the combined AF register.
    pub fn af(&self) -> u16 {
        self.af
    }

    /// Sets the combined AF register.  The low nibble of F is always
    /// cleared.
    pub fn set_af(&mut self, word: u16) {
        self.af = word & !u16::from(!REG_F_MASK);
    }

    /// Returns the stack pointer.
    pub fn sp(&self) -> u16 {
        self.sp
    }

    /// Sets the stack pointer.
    pub fn set_sp(&mut self, word: u16) {
        self.sp = word;
    }

    /// Returns the program counter.  The simulator does not use this to
    /// drive execution of pre-decoded programs.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Sets the program counter.
    pub fn set_pc(&mut self, word: u16) {
        self.pc = word;
    }

    /// Returns true if the given flag bit is set.
    pub fn get_flag(&self, flag: u8) -> bool {
        (self.f() & flag) != 0
    }

    /// Sets or clears the given flag bit.
    pub fn set_flag(&mut self, flag: u8, value: bool) {
        let f = self.f();
        self.set_f(if value { f | flag } else { f & !flag });
    }

    /// Returns true if the given condition currently holds.
    pub fn condition_met(&self, cond: Condition) -> bool {
        match cond {
            Condition::Nz => !self.get_flag(PROC_FLAG_Z),
        }
    }

    /// Returns the value of a register by its assembler keyword (e.g. `"a"`
    /// or `"hl"`), including `"f"`, `"af"`, `"sp"`, and `"pc"`.
    pub fn get_named(&self, name: &str) -> Option<u16> {
        match name {
            "f" => Some(u16::from(self.f())),
            "af" => Some(self.af),
            "sp" => Some(self.sp),
            "pc" => Some(self.pc),
            _ => match (Reg8::from_name(name), Reg16::from_name(name)) {
                (Some(reg), _) => Some(u16::from(self.get_r8(reg))),
                (None, Some(reg)) => Some(self.get_r16(reg)),
                (None, None) => None,
            },
        }
    }

    /// Sets a register by its assembler keyword.  Values are truncated to
    /// the register's width.  Returns false if the name is unknown.
    pub fn set_named(&mut self, name: &str, value: u16) -> bool {
        match name {
            "f" => self.set_f(value as u8),
            "af" => self.set_af(value),
            "sp" => self.sp = value,
            "pc" => self.pc = value,
            _ => match (Reg8::from_name(name), Reg16::from_name(name)) {
                (Some(reg), _) => self.set_r8(reg, value as u8),
                (None, Some(reg)) => self.set_r16(reg, value),
                (None, None) => return false,
            },
        }
        true
    }

    fn flag_string(&self) -> String {
        [
            (PROC_FLAG_Z, 'Z'),
            (PROC_FLAG_N, 'N'),
            (PROC_FLAG_H, 'H'),
            (PROC_FLAG_C, 'C'),
        ]
        .into_iter()
        .map(|(flag, chr)| if self.get_flag(flag) { chr } else { '-' })
        .collect()
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs = [
            ("A", "F", "AF", self.af),
            ("B", "C", "BC", self.bc),
            ("D", "E", "DE", self.de),
            ("H", "L", "HL", self.hl),
        ];
        for (hi_name, lo_name, pair_name, word) in pairs {
            let (hi, lo) = unpack(word);
            writeln!(
                f,
                "{hi_name}: {hi:02x}  {lo_name}: {lo:02x}  \
                 ({pair_name}: {word:04x})"
            )?;
        }
        writeln!(f, "PC: {:04x}  SP: {:04x}", self.pc, self.sp)?;
        writeln!(f, "F: [{}]", self.flag_string())
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{
        PROC_FLAG_C, PROC_FLAG_H, PROC_FLAG_N, PROC_FLAG_Z, REG_F_MASK,
        Registers,
    };
    use crate::isa::{Condition, Reg8, Reg16};

    #[test]
    fn halves_alias_pairs() {
        let mut regs = Registers::new();
        regs.set_r16(Reg16::Hl, 0x1234);
        assert_eq!(regs.get_r8(Reg8::H), 0x12);
        assert_eq!(regs.get_r8(Reg8::L), 0x34);
        regs.set_r8(Reg8::L, 0xcd);
        assert_eq!(regs.get_r16(Reg16::Hl), 0x12cd);
        regs.set_r8(Reg8::B, 0xab);
        regs.set_r8(Reg8::C, 0x01);
        assert_eq!(regs.get_r16(Reg16::Bc), 0xab01);
        regs.set_r8(Reg8::D, 0x77);
        assert_eq!(regs.get_r16(Reg16::De), 0x7700);
    }

    #[test]
    fn f_register_is_masked() {
        let mut regs = Registers::new();
        regs.set_f(0xff);
        assert_eq!(regs.f(), REG_F_MASK);
        regs.set_af(0x12ff);
        assert_eq!(regs.af(), 0x12f0);
        assert_eq!(regs.a(), 0x12);
    }

    #[test]
    fn flags() {
        let mut regs = Registers::new();
        regs.set_flag(PROC_FLAG_Z, true);
        regs.set_flag(PROC_FLAG_C, true);
        assert_eq!(regs.f(), PROC_FLAG_Z | PROC_FLAG_C);
        assert!(!regs.condition_met(Condition::Nz));
        regs.set_flag(PROC_FLAG_Z, false);
        assert!(regs.condition_met(Condition::Nz));
        assert!(!regs.get_flag(PROC_FLAG_N));
        assert!(!regs.get_flag(PROC_FLAG_H));
    }

    #[test]
    fn named_registers() {
        let mut regs = Registers::new();
        assert!(regs.set_named("a", 0x1ff));
        assert_eq!(regs.get_named("a"), Some(0xff));
        assert!(regs.set_named("de", 0xbeef));
        assert_eq!(regs.get_named("d"), Some(0xbe));
        assert!(regs.set_named("sp", 0xfffe));
        assert_eq!(regs.get_named("sp"), Some(0xfffe));
        assert!(!regs.set_named("ix", 0));
        assert_eq!(regs.get_named("ix"), None);
    }

    #[test]
    fn status_dump() {
        let mut regs = Registers::new();
        regs.set_a(0x05);
        regs.set_flag(PROC_FLAG_Z, true);
        regs.set_flag(PROC_FLAG_H, true);
        regs.set_sp(0xfffe);
        regs.set_r16(Reg16::Bc, 0x1234);
        assert_eq!(
            regs.to_string(),
            "A: 05  F: a0  (AF: 05a0)\n\
             B: 12  C: 34  (BC: 1234)\n\
             D: 00  E: 00  (DE: 0000)\n\
             H: 00  L: 00  (HL: 0000)\n\
             PC: 0000  SP: fffe\n\
             F: [Z-H-]\n"
        );
    }
}

//===========================================================================//
