//! Facilities for assembling source files into pre-decoded programs.

mod file;
mod label;
mod mnemonic;
mod signature;
mod symbol;

pub use file::{MAX_SOURCE_LEN, SourceError, load_source, read_source};
pub use label::{LabelField, LabelResolver};
pub use mnemonic::Mnemonic;
pub use signature::{Selected, Shape, lookup, select};
pub use symbol::{MAX_SYMBOL_NAME_LEN, Symbol, SymbolError, SymbolTable};

use crate::isa::{Instruction, Program};
use crate::parse::{
    Operand, ParseError, ParseErrorKind, ParseResult, SourceLine,
    classify_operand, source_lines, split_line,
};
use tracing::debug;

//===========================================================================//

/// Assembles a program from source code, resolving any identifiers that
/// are not keywords against `symbols`.  Assembly stops at the first error.
pub fn assemble_source(
    symbols: &SymbolTable,
    source: &str,
) -> ParseResult<Program> {
    let mut assembler = Assembler::new(symbols);
    for (number, offset, text) in source_lines(source) {
        let line = split_line(text, offset, number)?;
        assembler.visit_line(&line)?;
    }
    assembler.finish()
}

//===========================================================================//

struct Assembler<'s> {
    symbols: &'s SymbolTable,
    instructions: Vec<Instruction>,
    labels: LabelResolver,
}

impl<'s> Assembler<'s> {
    fn new(symbols: &'s SymbolTable) -> Assembler<'s> {
        Assembler {
            symbols,
            instructions: Vec::new(),
            labels: LabelResolver::new(),
        }
    }

    fn visit_line(&mut self, line: &SourceLine<'_>) -> ParseResult<()> {
        if line.label.is_some() {
            self.labels.define(self.instructions.len());
        }
        let Some(field) = line.mnemonic else {
            return Ok(());
        };
        let Some(mnemonic) = Mnemonic::from_name(field.text) else {
            return Err(ParseError::new(
                ParseErrorKind::InvalidInstruction,
                field.span,
                line.number,
                "invalid instruction",
            ));
        };
        let operands = line
            .operands
            .iter()
            .map(|field| classify_operand(field, self.symbols, line.number))
            .collect::<ParseResult<Vec<Operand>>>()?;
        let selected = select(mnemonic, &operands, line.span, line.number)?;
        self.visit_instruction(line, selected)
    }

    fn visit_instruction(
        &mut self,
        line: &SourceLine<'_>,
        selected: Selected,
    ) -> ParseResult<()> {
        let index = self.instructions.len();
        if index >= Program::MAX_LEN {
            return Err(ParseError::new(
                ParseErrorKind::TooManyInstructions,
                line.span,
                line.number,
                format!(
                    "programs may have at most {} instructions",
                    Program::MAX_LEN
                ),
            ));
        }
        if let Some((field, operand)) = selected.label {
            self.labels.refer(
                index,
                field,
                operand.value,
                operand.span,
                line.number,
            );
        }
        self.instructions.push(selected.instruction);
        Ok(())
    }

    fn finish(mut self) -> ParseResult<Program> {
        self.labels.resolve(&mut self.instructions)?;
        debug!(
            instructions = self.instructions.len(),
            labels = self.labels.num_definitions(),
            references = self.labels.num_references(),
            "assembled program"
        );
        Ok(Program::from_instructions(self.instructions))
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{Symbol, SymbolTable, assemble_source};
    use crate::isa::{Instruction, Operation, Program, Reg8, Reg16};
    use crate::parse::ParseErrorKind;

    fn assemble(source: &str) -> Program {
        assemble_source(&SymbolTable::default(), source).unwrap()
    }

    fn error_of(source: &str) -> (ParseErrorKind, usize, String) {
        let error =
            assemble_source(&SymbolTable::default(), source).unwrap_err();
        let text = source[error.span.byte_range()].to_string();
        (error.kind, error.line, text)
    }

    #[test]
    fn empty_source() {
        assert!(assemble("").is_empty());
        assert!(assemble("\n  ; nothing here\n\n").is_empty());
    }

    #[test]
    fn simple_instructions() {
        let program = assemble("nop\n  ld b, 5 ; five\nadd a, b\n");
        assert_eq!(
            program.instructions(),
            &[
                Instruction::bare(Operation::Nop),
                Instruction::new(Operation::LdR8I8, Reg8::B.selector(), 5),
                Instruction::new(Operation::AddAR8, Reg8::B.selector(), 0),
            ]
        );
    }

    #[test]
    fn symbols() {
        let symbols = SymbolTable::new(&[
            Symbol::new("src", 0xc000),
            Symbol::new("len", 5),
        ])
        .unwrap();
        let program =
            assemble_source(&symbols, "ld hl, src\nld c, len\n").unwrap();
        assert_eq!(
            program.instructions(),
            &[
                Instruction::new(
                    Operation::LdR16I16,
                    Reg16::Hl.selector(),
                    0xc000
                ),
                Instruction::new(Operation::LdR8I8, Reg8::C.selector(), 5),
            ]
        );
    }

    #[test]
    fn countdown_labels() {
        let program = assemble("  ld b, 3\n:\n  dec b\n  jr nz, :-\n");
        assert_eq!(program.len(), 3);
        assert_eq!(program.instructions()[2].p2 as i16, -2);
    }

    #[test]
    fn label_and_instruction_on_one_line() {
        let program = assemble(": dec b\n  jr nz, :-\n");
        assert_eq!(program.instructions()[1].p2 as i16, -2);
    }

    #[test]
    fn forward_label() {
        let program = assemble("  jr nz, :+\n  inc a\n:\n  nop\n");
        assert_eq!(program.instructions()[0].p2, 1);
    }

    #[test]
    fn invalid_instruction() {
        assert_eq!(
            error_of("nop\n  mov a, b\n"),
            (ParseErrorKind::InvalidInstruction, 2, "mov".to_string())
        );
    }

    #[test]
    fn invalid_argument() {
        assert_eq!(
            error_of("ld a, foo\n"),
            (ParseErrorKind::InvalidArgument, 1, "foo".to_string())
        );
    }

    #[test]
    fn invalid_combination() {
        assert_eq!(
            error_of("push sp\n"),
            (ParseErrorKind::InvalidCombination, 1, "push sp".to_string())
        );
    }

    #[test]
    fn bit_index_out_of_range() {
        assert_eq!(
            error_of("bit 9,a\n"),
            (ParseErrorKind::OutOfRange, 1, "9".to_string())
        );
    }

    #[test]
    fn missing_label() {
        assert_eq!(
            error_of(":\n  dec b\n  jr nz, :--\n"),
            (ParseErrorKind::UnresolvedLabel, 3, ":--".to_string())
        );
    }

    #[test]
    fn too_many_instructions() {
        let source = "nop\n".repeat(Program::MAX_LEN);
        assert_eq!(assemble(&source).len(), Program::MAX_LEN);
        let source = "nop\n".repeat(Program::MAX_LEN + 1);
        let (kind, line, _) = error_of(&source);
        assert_eq!(kind, ParseErrorKind::TooManyInstructions);
        assert_eq!(line, Program::MAX_LEN + 1);
    }
}

//===========================================================================//
