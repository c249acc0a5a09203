//! Bookkeeping for anonymous labels, which are defined in one pass over
//! the source and resolved once every definition is known.

use crate::isa::Instruction;
use crate::parse::{ParseError, ParseErrorKind, ParseResult, SrcSpan};

//===========================================================================//

/// Which parameter slot of an instruction receives a resolved label offset.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LabelField {
    /// The first parameter slot.
    P1,
    /// The second parameter slot.
    P2,
}

#[derive(Clone, Copy, Debug)]
struct LabelRef {
    index: usize,
    field: LabelField,
    depth: i32,
    span: SrcSpan,
    line: usize,
}

//===========================================================================//

/// Records anonymous-label definitions and references, then patches the
/// referencing instructions with relative offsets.
#[derive(Debug, Default)]
pub struct LabelResolver {
    definitions: Vec<usize>,
    references: Vec<LabelRef>,
}

impl LabelResolver {
    /// Creates an empty resolver.
    pub fn new() -> LabelResolver {
        LabelResolver::default()
    }

    /// Records a label that marks the position of the instruction at
    /// `index` (the program length when the label is reached).
    pub fn define(&mut self, index: usize) {
        self.definitions.push(index);
    }

    /// Records that the instruction at `index` refers to a label by its
    /// signed nesting `depth` (negative for backward references).
    pub fn refer(
        &mut self,
        index: usize,
        field: LabelField,
        depth: i32,
        span: SrcSpan,
        line: usize,
    ) {
        self.references.push(LabelRef { index, field, depth, span, line });
    }

    /// Returns the number of labels defined so far.
    pub fn num_definitions(&self) -> usize {
        self.definitions.len()
    }

    /// Returns the number of label references recorded so far.
    pub fn num_references(&self) -> usize {
        self.references.len()
    }

    /// Resolves every recorded reference, writing the offset from the
    /// instruction after the reference to the target into the referenced
    /// parameter slot.
    pub fn resolve(
        &self,
        instructions: &mut [Instruction],
    ) -> ParseResult<()> {
        let mut cursor = 0;
        for reference in &self.references {
            while cursor < self.definitions.len()
                && self.definitions[cursor] < reference.index
            {
                cursor += 1;
            }
            let target = self.target(cursor, reference)?;
            let offset = target as i64 - reference.index as i64 - 1;
            let Some(inst) = instructions.get_mut(reference.index) else {
                return Err(unresolved(reference));
            };
            // Program length limits keep the offset within i16.
            let value = offset as i16 as u16;
            match reference.field {
                LabelField::P1 => inst.p1 = value,
                LabelField::P2 => inst.p2 = value,
            }
        }
        Ok(())
    }

    fn target(
        &self,
        cursor: usize,
        reference: &LabelRef,
    ) -> ParseResult<usize> {
        let depth = reference.depth.unsigned_abs() as usize;
        let slot = if reference.depth < 0 {
            cursor.checked_sub(depth)
        } else {
            (cursor + depth).checked_sub(1)
        };
        slot.and_then(|slot| self.definitions.get(slot))
            .copied()
            .ok_or_else(|| unresolved(reference))
    }
}

fn unresolved(reference: &LabelRef) -> ParseError {
    ParseError::new(
        ParseErrorKind::UnresolvedLabel,
        reference.span,
        reference.line,
        "anonymous label does not exist",
    )
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{LabelField, LabelResolver};
    use crate::isa::{Instruction, Operation};
    use crate::parse::{ParseErrorKind, SrcSpan};

    fn jumps(count: usize) -> Vec<Instruction> {
        vec![Instruction::new(Operation::JrCcE8, 0, 0); count]
    }

    fn span() -> SrcSpan {
        SrcSpan::from_byte_range(4..6)
    }

    #[test]
    fn backward_reference() {
        // 0: nop / label at 1 / 1: dec b / 2: jr nz, :-
        let mut resolver = LabelResolver::new();
        resolver.define(1);
        resolver.refer(2, LabelField::P2, -1, span(), 4);
        let mut insts = jumps(3);
        resolver.resolve(&mut insts).unwrap();
        assert_eq!(insts[2].p2 as i16, -2);
        assert_eq!(insts[2].p1, 0);
    }

    #[test]
    fn reference_on_labelled_line() {
        // label at 0 / 0: jr nz, :+
        let mut resolver = LabelResolver::new();
        resolver.define(0);
        resolver.refer(0, LabelField::P2, 1, span(), 2);
        let mut insts = jumps(1);
        resolver.resolve(&mut insts).unwrap();
        assert_eq!(insts[0].p2 as i16, -1);

        // label at 0 / 0: jr nz, :-
        let mut resolver = LabelResolver::new();
        resolver.define(0);
        resolver.refer(0, LabelField::P2, -1, span(), 2);
        let error = resolver.resolve(&mut jumps(1)).unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::UnresolvedLabel);
    }

    #[test]
    fn forward_references() {
        // 0: jr :+ / 1: jr :++ / label at 2 / 2: nop / label at 3
        let mut resolver = LabelResolver::new();
        resolver.refer(0, LabelField::P1, 1, span(), 1);
        resolver.refer(1, LabelField::P1, 2, span(), 2);
        resolver.define(2);
        resolver.define(3);
        let mut insts = jumps(3);
        resolver.resolve(&mut insts).unwrap();
        assert_eq!(insts[0].p1, 1);
        assert_eq!(insts[1].p1, 1);
        assert_eq!(resolver.num_definitions(), 2);
        assert_eq!(resolver.num_references(), 2);
    }

    #[test]
    fn nested_backward_reference() {
        let mut resolver = LabelResolver::new();
        resolver.define(0);
        resolver.define(2);
        resolver.refer(4, LabelField::P2, -2, span(), 6);
        let mut insts = jumps(5);
        resolver.resolve(&mut insts).unwrap();
        assert_eq!(insts[4].p2 as i16, -5);
    }

    #[test]
    fn missing_labels() {
        let mut resolver = LabelResolver::new();
        resolver.define(0);
        resolver.refer(1, LabelField::P2, -2, span(), 3);
        let error = resolver.resolve(&mut jumps(2)).unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::UnresolvedLabel);
        assert_eq!(error.span, span());
        assert_eq!(error.line, 3);

        let mut resolver = LabelResolver::new();
        resolver.refer(0, LabelField::P1, 1, span(), 1);
        let error = resolver.resolve(&mut jumps(1)).unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::UnresolvedLabel);
    }
}

//===========================================================================//
