//! Facilities for simulating an SM83 processor running a pre-decoded
//! program.

mod alu;
mod exec;
mod mem;
mod regs;

pub use alu::{AluOp, alu8};
pub use mem::{HIGH_PAGE_START, MEMORY_SIZE, Memory};
pub use regs::{
    PROC_FLAG_C, PROC_FLAG_H, PROC_FLAG_N, PROC_FLAG_Z, REG_F_MASK, Registers,
};

use crate::isa::{Operation, Program};
use thiserror::Error;
use tracing::{debug, trace};

//===========================================================================//

/// A fatal condition encountered while executing a program.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SimError {
    /// The program executed an operation that the simulator does not
    /// implement.
    #[error("unimplemented operation `{op}` at instruction {index}")]
    Unimplemented {
        /// The offending operation.
        op: Operation,
        /// The index of the instruction within the program.
        index: usize,
    },
    /// A high-page load or store addressed memory outside $ff00-$ffff.
    #[error(
        "address ${addr:04x} is outside the high page at instruction {index}"
    )]
    HighPageOutOfRange {
        /// The offending address.
        addr: u16,
        /// The index of the instruction within the program.
        index: usize,
    },
    /// An instruction named a register that does not exist.
    #[error("invalid register selector {selector} at instruction {index}")]
    InvalidRegister {
        /// The offending selector value.
        selector: u16,
        /// The index of the instruction within the program.
        index: usize,
    },
    /// An instruction named a condition that does not exist.
    #[error("invalid condition selector {selector} at instruction {index}")]
    InvalidCondition {
        /// The offending selector value.
        selector: u16,
        /// The index of the instruction within the program.
        index: usize,
    },
    /// A relative jump landed outside the program.
    #[error(
        "jump to instruction {target} at instruction {index} is out of range"
    )]
    BranchOutOfRange {
        /// The instruction index the jump would have landed on.
        target: i64,
        /// The index of the jump instruction within the program.
        index: usize,
    },
}

//===========================================================================//

/// A simulated machine: an SM83 register file, a flat 64KB memory, and a
/// cycle counter for the most recent run.
#[derive(Clone, Debug, Default)]
pub struct Machine {
    regs: Registers,
    mem: Memory,
    cycles: u64,
}

impl Machine {
    /// Returns a new machine with all registers and memory zeroed.
    pub fn new() -> Machine {
        Machine::default()
    }

    /// Returns the machine's registers.
    pub fn regs(&self) -> &Registers {
        &self.regs
    }

    /// Returns the machine's registers for modification.
    pub fn regs_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    /// Returns the machine's memory.
    pub fn mem(&self) -> &Memory {
        &self.mem
    }

    /// Returns the machine's memory for modification.
    pub fn mem_mut(&mut self) -> &mut Memory {
        &mut self.mem
    }

    /// Returns the number of machine cycles consumed by the most recent
    /// call to [`Machine::run`], plus any steps taken since.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Runs a program from its first instruction until the instruction
    /// cursor reaches the end of the program.  The cycle counter is reset
    /// first.
    pub fn run(&mut self, program: &Program) -> Result<(), SimError> {
        self.cycles = 0;
        let mut cursor = 0;
        while cursor < program.len() {
            cursor = self.step(program, cursor)?;
        }
        debug!(
            instructions = program.len(),
            cycles = self.cycles,
            "program finished"
        );
        Ok(())
    }

    /// Executes the single instruction at `index` and returns the index of
    /// the next instruction to execute.  Returns `index` unchanged if it is
    /// past the end of the program.
    pub fn step(
        &mut self,
        program: &Program,
        index: usize,
    ) -> Result<usize, SimError> {
        let Some(&instruction) = program.get(index) else {
            return Ok(index);
        };
        let executed = self.execute(instruction, index)?;
        self.cycles += u64::from(executed.cost);
        trace!(
            index,
            cost = executed.cost,
            a = self.regs.a(),
            f = self.regs.f(),
            "{instruction}"
        );
        let target = index as i64 + 1 + i64::from(executed.offset);
        if target < 0 || target > program.len() as i64 {
            return Err(SimError::BranchOutOfRange { target, index });
        }
        Ok(target as usize)
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{Machine, PROC_FLAG_Z, SimError};
    use crate::isa::{Condition, Instruction, Operation, Program, Reg8};

    fn ld_b(value: u16) -> Instruction {
        Instruction::new(Operation::LdR8I8, Reg8::B.selector(), value)
    }

    #[test]
    fn run_resets_cycles() {
        let program = Program::from_instructions(vec![
            Instruction::bare(Operation::Nop),
            ld_b(3),
        ]);
        let mut machine = Machine::new();
        machine.run(&program).unwrap();
        assert_eq!(machine.cycles(), 3);
        machine.run(&program).unwrap();
        assert_eq!(machine.cycles(), 3);
        assert_eq!(machine.regs().get_r8(Reg8::B), 3);
    }

    #[test]
    fn empty_program() {
        let mut machine = Machine::new();
        machine.run(&Program::default()).unwrap();
        assert_eq!(machine.cycles(), 0);
    }

    #[test]
    fn step_past_end() {
        let program = Program::from_instructions(vec![ld_b(1)]);
        let mut machine = Machine::new();
        assert_eq!(machine.step(&program, 0), Ok(1));
        assert_eq!(machine.step(&program, 1), Ok(1));
        assert_eq!(machine.cycles(), 2);
    }

    #[test]
    fn countdown_loop() {
        let nz = Condition::Nz.selector();
        let program = Program::from_instructions(vec![
            ld_b(3),
            Instruction::new(Operation::DecR8, Reg8::B.selector(), 0),
            Instruction::new(Operation::JrCcE8, nz, (-2i16) as u16),
        ]);
        let mut machine = Machine::new();
        machine.run(&program).unwrap();
        assert_eq!(machine.regs().get_r8(Reg8::B), 0);
        assert!(machine.regs().get_flag(PROC_FLAG_Z));
        // ld (2) + 3 * dec (1) + 2 taken jr (3) + 1 untaken jr (2).
        assert_eq!(machine.cycles(), 2 + 3 + 6 + 2);
    }

    #[test]
    fn branch_out_of_range() {
        let nz = Condition::Nz.selector();
        let program = Program::from_instructions(vec![Instruction::new(
            Operation::JrCcE8,
            nz,
            (-5i16) as u16,
        )]);
        let mut machine = Machine::new();
        assert_eq!(
            machine.run(&program),
            Err(SimError::BranchOutOfRange { target: -4, index: 0 })
        );
    }

    #[test]
    fn unimplemented_operation() {
        let program = Program::from_instructions(vec![
            Instruction::bare(Operation::Nop),
            Instruction::new(Operation::CallI16, 0x1234, 0),
        ]);
        let mut machine = Machine::new();
        assert_eq!(
            machine.run(&program),
            Err(SimError::Unimplemented { op: Operation::CallI16, index: 1 })
        );
    }
}

//===========================================================================//
