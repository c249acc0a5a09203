use super::alu::{self, AluOp, ShiftOp};
use super::mem::HIGH_PAGE_START;
use super::{Machine, SimError};
use crate::isa::{Condition, Instruction, Operation, Reg8, Reg16};

//===========================================================================//

/// The outcome of executing one instruction.
pub(super) struct Executed {
    /// The number of machine cycles consumed.
    pub cost: u8,
    /// How many instructions to skip (or rewind) beyond the next one.
    pub offset: i16,
}

fn cost(cost: u8) -> Result<Executed, SimError> {
    Ok(Executed { cost, offset: 0 })
}

//===========================================================================//

impl Machine {
    pub(super) fn execute(
        &mut self,
        inst: Instruction,
        index: usize,
    ) -> Result<Executed, SimError> {
        let (p1, p2) = (inst.p1, inst.p2);
        match inst.op {
            Operation::AdcAR8 => self.alu_a_r8(AluOp::Adc, p1, index),
            Operation::AdcAMhl => self.alu_a_mhl(AluOp::Adc),
            Operation::AdcAI8 => self.alu_a_i8(AluOp::Adc, p1),
            Operation::AddAR8 => self.alu_a_r8(AluOp::Add, p1, index),
            Operation::AddAMhl => self.alu_a_mhl(AluOp::Add),
            Operation::AddAI8 => self.alu_a_i8(AluOp::Add, p1),
            Operation::AndAR8 => self.alu_a_r8(AluOp::And, p1, index),
            Operation::AndAMhl => self.alu_a_mhl(AluOp::And),
            Operation::AndAI8 => self.alu_a_i8(AluOp::And, p1),
            Operation::CpAR8 => self.alu_a_r8(AluOp::Cp, p1, index),
            Operation::CpAMhl => self.alu_a_mhl(AluOp::Cp),
            Operation::CpAI8 => self.alu_a_i8(AluOp::Cp, p1),
            Operation::OrAR8 => self.alu_a_r8(AluOp::Or, p1, index),
            Operation::OrAMhl => self.alu_a_mhl(AluOp::Or),
            Operation::OrAI8 => self.alu_a_i8(AluOp::Or, p1),
            Operation::SbcAR8 => self.alu_a_r8(AluOp::Sbc, p1, index),
            Operation::SbcAMhl => self.alu_a_mhl(AluOp::Sbc),
            Operation::SbcAI8 => self.alu_a_i8(AluOp::Sbc, p1),
            Operation::SubAR8 => self.alu_a_r8(AluOp::Sub, p1, index),
            Operation::SubAMhl => self.alu_a_mhl(AluOp::Sub),
            Operation::SubAI8 => self.alu_a_i8(AluOp::Sub, p1),
            Operation::XorAR8 => self.alu_a_r8(AluOp::Xor, p1, index),
            Operation::XorAMhl => self.alu_a_mhl(AluOp::Xor),
            Operation::XorAI8 => self.alu_a_i8(AluOp::Xor, p1),

            Operation::DecR8 => self.update_r8(p1, index, 1, alu::dec8),
            Operation::DecMhl => self.update_mhl(3, alu::dec8),
            Operation::IncR8 => self.update_r8(p1, index, 1, alu::inc8),
            Operation::IncMhl => self.update_mhl(3, alu::inc8),

            Operation::AddHlR16 => {
                let val = self.regs.get_r16(r16(p1, index)?);
                self.add_hl(val)
            }
            Operation::AddHlSp => self.add_hl(self.regs.sp()),
            Operation::DecR16 => {
                let reg = r16(p1, index)?;
                let word = self.regs.get_r16(reg).wrapping_sub(1);
                self.regs.set_r16(reg, word);
                cost(2)
            }
            Operation::IncR16 => {
                let reg = r16(p1, index)?;
                let word = self.regs.get_r16(reg).wrapping_add(1);
                self.regs.set_r16(reg, word);
                cost(2)
            }
            Operation::DecSp => {
                self.regs.set_sp(self.regs.sp().wrapping_sub(1));
                cost(2)
            }
            Operation::IncSp => {
                self.regs.set_sp(self.regs.sp().wrapping_add(1));
                cost(2)
            }

            Operation::BitU3R8 => {
                let val = self.regs.get_r8(r8(p2, index)?);
                self.regs.set_f(alu::bit(p1, val, self.regs.f()));
                cost(2)
            }
            Operation::BitU3Mhl => {
                let val = self.mem.read_byte(self.hl());
                self.regs.set_f(alu::bit(p1, val, self.regs.f()));
                cost(3)
            }
            Operation::ResU3R8 => {
                self.update_r8(p2, index, 2, |val, f| (alu::res(p1, val), f))
            }
            Operation::ResU3Mhl => {
                self.update_mhl(4, |val, f| (alu::res(p1, val), f))
            }
            Operation::SetU3R8 => {
                self.update_r8(p2, index, 2, |val, f| (alu::set(p1, val), f))
            }
            Operation::SetU3Mhl => {
                self.update_mhl(4, |val, f| (alu::set(p1, val), f))
            }
            Operation::SwapR8 => {
                self.update_r8(p1, index, 2, |val, _| alu::swap(val))
            }
            Operation::SwapMhl => self.update_mhl(4, |val, _| alu::swap(val)),

            Operation::RlR8 => self.shift_r8(ShiftOp::Rl, p1, index),
            Operation::RlMhl => self.shift_mhl(ShiftOp::Rl),
            Operation::Rla => self.shift_a(ShiftOp::Rl),
            Operation::RlcR8 => self.shift_r8(ShiftOp::Rlc, p1, index),
            Operation::RlcMhl => self.shift_mhl(ShiftOp::Rlc),
            Operation::Rlca => self.shift_a(ShiftOp::Rlc),
            Operation::RrR8 => self.shift_r8(ShiftOp::Rr, p1, index),
            Operation::RrMhl => self.shift_mhl(ShiftOp::Rr),
            Operation::Rra => self.shift_a(ShiftOp::Rr),
            Operation::RrcR8 => self.shift_r8(ShiftOp::Rrc, p1, index),
            Operation::RrcMhl => self.shift_mhl(ShiftOp::Rrc),
            Operation::Rrca => self.shift_a(ShiftOp::Rrc),
            Operation::SlaR8 => self.shift_r8(ShiftOp::Sla, p1, index),
            Operation::SlaMhl => self.shift_mhl(ShiftOp::Sla),
            Operation::SraR8 => self.shift_r8(ShiftOp::Sra, p1, index),
            Operation::SraMhl => self.shift_mhl(ShiftOp::Sra),
            Operation::SrlR8 => self.shift_r8(ShiftOp::Srl, p1, index),
            Operation::SrlMhl => self.shift_mhl(ShiftOp::Srl),

            Operation::LdR8R8 => {
                let val = self.regs.get_r8(r8(p2, index)?);
                self.regs.set_r8(r8(p1, index)?, val);
                cost(1)
            }
            Operation::LdR8I8 => {
                self.regs.set_r8(r8(p1, index)?, p2 as u8);
                cost(2)
            }
            Operation::LdR16I16 => {
                self.regs.set_r16(r16(p1, index)?, p2);
                cost(3)
            }
            Operation::LdMhlR8 => {
                let val = self.regs.get_r8(r8(p1, index)?);
                self.mem.write_byte(self.hl(), val);
                cost(2)
            }
            Operation::LdMhlI8 => {
                self.mem.write_byte(self.hl(), p1 as u8);
                cost(3)
            }
            Operation::LdR8Mhl => {
                let val = self.mem.read_byte(self.hl());
                self.regs.set_r8(r8(p1, index)?, val);
                cost(2)
            }
            Operation::LdMr16A => {
                let addr = self.regs.get_r16(r16(p1, index)?);
                self.mem.write_byte(addr, self.regs.a());
                cost(2)
            }
            Operation::LdM16A => {
                self.mem.write_byte(p1, self.regs.a());
                cost(4)
            }
            Operation::LdhM16A => {
                let addr = high_page(p1, index)?;
                self.mem.write_byte(addr, self.regs.a());
                cost(3)
            }
            Operation::LdhMcA => {
                let c = self.regs.get_r8(Reg8::C);
                let addr = HIGH_PAGE_START | u16::from(c);
                self.mem.write_byte(addr, self.regs.a());
                cost(2)
            }
            Operation::LdAMr16 => {
                let addr = self.regs.get_r16(r16(p1, index)?);
                self.regs.set_a(self.mem.read_byte(addr));
                cost(2)
            }
            Operation::LdAM16 => {
                self.regs.set_a(self.mem.read_byte(p1));
                cost(4)
            }
            Operation::LdhAM16 => {
                let addr = high_page(p1, index)?;
                self.regs.set_a(self.mem.read_byte(addr));
                cost(3)
            }
            Operation::LdhAMc => {
                let c = self.regs.get_r8(Reg8::C);
                let addr = HIGH_PAGE_START | u16::from(c);
                self.regs.set_a(self.mem.read_byte(addr));
                cost(2)
            }
            Operation::LdMhliA => {
                let addr = self.hl();
                self.mem.write_byte(addr, self.regs.a());
                self.regs.set_r16(Reg16::Hl, addr.wrapping_add(1));
                cost(2)
            }
            Operation::LdMhldA => {
                let addr = self.hl();
                self.mem.write_byte(addr, self.regs.a());
                self.regs.set_r16(Reg16::Hl, addr.wrapping_sub(1));
                cost(2)
            }
            Operation::LdAMhli => {
                let addr = self.hl();
                self.regs.set_a(self.mem.read_byte(addr));
                self.regs.set_r16(Reg16::Hl, addr.wrapping_add(1));
                cost(2)
            }
            Operation::LdAMhld => {
                let addr = self.hl();
                self.regs.set_a(self.mem.read_byte(addr));
                self.regs.set_r16(Reg16::Hl, addr.wrapping_sub(1));
                cost(2)
            }

            Operation::JrCcE8 => {
                if self.regs.condition_met(condition(p1, index)?) {
                    Ok(Executed { cost: 3, offset: p2 as i16 })
                } else {
                    cost(2)
                }
            }
            Operation::CallI16
            | Operation::CallCcI16
            | Operation::JpHl
            | Operation::JpI16
            | Operation::JpCcI16
            | Operation::JrE8
            | Operation::RetCc
            | Operation::Ret
            | Operation::Reti
            | Operation::Rst
            | Operation::Di
            | Operation::Ei
            | Operation::Halt
            | Operation::Stop => {
                Err(SimError::Unimplemented { op: inst.op, index })
            }

            Operation::AddSpE8 => {
                let (sp, f) = alu::add_sp_e8(self.regs.sp(), p1 as i8);
                self.regs.set_sp(sp);
                self.regs.set_f(f);
                cost(4)
            }
            Operation::LdSpI16 => {
                self.regs.set_sp(p1);
                cost(3)
            }
            Operation::LdM16Sp => {
                self.mem.write_word(p1, self.regs.sp());
                cost(5)
            }
            Operation::LdHlSpE8 => {
                let (hl, f) = alu::add_sp_e8(self.regs.sp(), p1 as i8);
                self.regs.set_r16(Reg16::Hl, hl);
                self.regs.set_f(f);
                cost(3)
            }
            Operation::LdSpHl => {
                self.regs.set_sp(self.hl());
                cost(2)
            }
            Operation::PopAf => {
                let word = self.pop();
                self.regs.set_af(word);
                cost(3)
            }
            Operation::PopR16 => {
                let reg = r16(p1, index)?;
                let word = self.pop();
                self.regs.set_r16(reg, word);
                cost(3)
            }
            Operation::PushAf => {
                self.push(self.regs.af());
                cost(4)
            }
            Operation::PushR16 => {
                let word = self.regs.get_r16(r16(p1, index)?);
                self.push(word);
                cost(4)
            }

            Operation::Ccf => {
                self.regs.set_f(alu::ccf(self.regs.f()));
                cost(1)
            }
            Operation::Cpl => self.update_a(alu::cpl),
            Operation::Daa => self.update_a(alu::daa),
            Operation::Nop => cost(1),
            Operation::Scf => {
                self.regs.set_f(alu::scf(self.regs.f()));
                cost(1)
            }
        }
    }

    fn hl(&self) -> u16 {
        self.regs.get_r16(Reg16::Hl)
    }

    fn alu_a(&mut self, op: AluOp, val: u8) {
        let (a, f) = alu::alu8(op, self.regs.a(), val, self.regs.f());
        self.regs.set_a(a);
        self.regs.set_f(f);
    }

    fn alu_a_r8(
        &mut self,
        op: AluOp,
        sel: u16,
        index: usize,
    ) -> Result<Executed, SimError> {
        let val = self.regs.get_r8(r8(sel, index)?);
        self.alu_a(op, val);
        cost(1)
    }

    fn alu_a_mhl(&mut self, op: AluOp) -> Result<Executed, SimError> {
        let val = self.mem.read_byte(self.hl());
        self.alu_a(op, val);
        cost(2)
    }

    fn alu_a_i8(&mut self, op: AluOp, imm: u16) -> Result<Executed, SimError> {
        self.alu_a(op, imm as u8);
        cost(2)
    }

    fn add_hl(&mut self, val: u16) -> Result<Executed, SimError> {
        let (hl, f) = alu::add16(self.hl(), val, self.regs.f());
        self.regs.set_r16(Reg16::Hl, hl);
        self.regs.set_f(f);
        cost(2)
    }

    fn update_a(
        &mut self,
        func: impl FnOnce(u8, u8) -> (u8, u8),
    ) -> Result<Executed, SimError> {
        let (a, f) = func(self.regs.a(), self.regs.f());
        self.regs.set_a(a);
        self.regs.set_f(f);
        cost(1)
    }

    fn update_r8(
        &mut self,
        sel: u16,
        index: usize,
        cycles: u8,
        func: impl FnOnce(u8, u8) -> (u8, u8),
    ) -> Result<Executed, SimError> {
        let reg = r8(sel, index)?;
        let (val, f) = func(self.regs.get_r8(reg), self.regs.f());
        self.regs.set_r8(reg, val);
        self.regs.set_f(f);
        cost(cycles)
    }

    fn update_mhl(
        &mut self,
        cycles: u8,
        func: impl FnOnce(u8, u8) -> (u8, u8),
    ) -> Result<Executed, SimError> {
        let addr = self.hl();
        let (val, f) = func(self.mem.read_byte(addr), self.regs.f());
        self.mem.write_byte(addr, val);
        self.regs.set_f(f);
        cost(cycles)
    }

    fn shift_r8(
        &mut self,
        op: ShiftOp,
        sel: u16,
        index: usize,
    ) -> Result<Executed, SimError> {
        self.update_r8(sel, index, 2, |val, f| alu::shift(op, val, f))
    }

    fn shift_mhl(&mut self, op: ShiftOp) -> Result<Executed, SimError> {
        self.update_mhl(4, |val, f| alu::shift(op, val, f))
    }

    fn shift_a(&mut self, op: ShiftOp) -> Result<Executed, SimError> {
        self.update_a(|a, f| alu::shift_a(op, a, f))
    }

    fn push(&mut self, word: u16) {
        let sp = self.regs.sp().wrapping_sub(2);
        self.regs.set_sp(sp);
        self.mem.write_word(sp, word);
    }

    fn pop(&mut self) -> u16 {
        let sp = self.regs.sp();
        let word = self.mem.read_word(sp);
        self.regs.set_sp(sp.wrapping_add(2));
        word
    }
}

//===========================================================================//

fn r8(selector: u16, index: usize) -> Result<Reg8, SimError> {
    Reg8::from_selector(selector)
        .ok_or(SimError::InvalidRegister { selector, index })
}

fn r16(selector: u16, index: usize) -> Result<Reg16, SimError> {
    Reg16::from_selector(selector)
        .ok_or(SimError::InvalidRegister { selector, index })
}

fn condition(selector: u16, index: usize) -> Result<Condition, SimError> {
    Condition::from_selector(selector)
        .ok_or(SimError::InvalidCondition { selector, index })
}

fn high_page(addr: u16, index: usize) -> Result<u16, SimError> {
    if addr >= HIGH_PAGE_START {
        Ok(addr)
    } else {
        Err(SimError::HighPageOutOfRange { addr, index })
    }
}

//===========================================================================//


//===========================================================================//
