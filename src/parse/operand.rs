use super::lex::{TokenKind, tokenize};
use super::line::Field;
use super::types::{ParseError, ParseErrorKind, ParseResult, SrcSpan};
use crate::asm::SymbolTable;
use crate::isa::{Condition, Reg8, Reg16};
use num_bigint::BigInt;
use std::fmt;

//===========================================================================//

/// The category of a classified operand.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OperandKind {
    /// A numeric value: a literal or a symbol (e.g. `$ff`, `len`).
    N,
    /// An 8-bit register (e.g. `a`); the value is its selector.
    R8,
    /// A 16-bit register pair (e.g. `hl`); the value is its selector.
    R16,
    /// Memory addressed by `bc` or `de` (e.g. `[de]`); the value is the
    /// register pair selector.
    IR16,
    /// Memory addressed by HL (`[hl]`).
    IHL,
    /// Memory addressed by HL, then HL incremented (`[hli]` or `[hl+]`).
    IHLI,
    /// Memory addressed by HL, then HL decremented (`[hld]` or `[hl-]`).
    IHLD,
    /// Memory at an absolute address (e.g. `[$c000]`).
    IN16,
    /// High-page memory addressed by register C (`[c]`).
    IC,
    /// A condition (`nz`); the value is its selector.
    Cc,
    /// The stack pointer (`sp`).
    Sp,
    /// The accumulator and flags pair (`af`).
    Af,
    /// The stack pointer plus an offset (e.g. `sp+4`); the value is the
    /// offset.
    SpE8,
    /// An anonymous-label reference (e.g. `:-`); the value is the signed
    /// nesting depth, negative for backward references.
    Label,
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperandKind::N => "number",
            OperandKind::R8 => "8-bit register",
            OperandKind::R16 => "16-bit register",
            OperandKind::IR16 => "[r16]",
            OperandKind::IHL => "[hl]",
            OperandKind::IHLI => "[hli]",
            OperandKind::IHLD => "[hld]",
            OperandKind::IN16 => "[n16]",
            OperandKind::IC => "[c]",
            OperandKind::Cc => "condition",
            OperandKind::Sp => "sp",
            OperandKind::Af => "af",
            OperandKind::SpE8 => "sp+e8",
            OperandKind::Label => "anonymous label",
        })
    }
}

/// A classified operand.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Operand {
    /// The operand's category.
    pub kind: OperandKind,
    /// The operand's value; its meaning depends on the kind.
    pub value: i32,
    /// The location of the operand in the source file.
    pub span: SrcSpan,
}

//===========================================================================//

/// Returns true if `name` is a reserved assembler keyword that can never be
/// used as a symbol name.
pub fn is_keyword(name: &str) -> bool {
    keyword(name).is_some() || matches!(name, "hli" | "hld")
}

fn keyword(name: &str) -> Option<(OperandKind, i32)> {
    if let Some(reg) = Reg8::from_name(name) {
        return Some((OperandKind::R8, i32::from(reg.selector())));
    }
    if let Some(reg) = Reg16::from_name(name) {
        return Some((OperandKind::R16, i32::from(reg.selector())));
    }
    match name {
        "sp" => Some((OperandKind::Sp, 0)),
        "af" => Some((OperandKind::Af, 0)),
        "nz" => Some((OperandKind::Cc, i32::from(Condition::Nz.selector()))),
        _ => None,
    }
}

//===========================================================================//

struct Classifier<'s> {
    symbols: &'s SymbolTable,
    span: SrcSpan,
    line: usize,
}

impl Classifier<'_> {
    fn invalid(&self) -> ParseError {
        self.invalid_at(self.span)
    }

    fn invalid_at(&self, span: SrcSpan) -> ParseError {
        ParseError::new(
            ParseErrorKind::InvalidArgument,
            span,
            self.line,
            "invalid argument",
        )
    }

    fn out_of_range(&self) -> ParseError {
        ParseError::new(
            ParseErrorKind::OutOfRange,
            self.span,
            self.line,
            "number is too large",
        )
    }

    fn number(&self, value: &BigInt) -> ParseResult<i32> {
        i32::try_from(value).map_err(|_| self.out_of_range())
    }

    fn symbol(&self, name: &str) -> ParseResult<i32> {
        if keyword(name).is_some() {
            return Err(self.invalid());
        }
        self.symbols.get(name).ok_or_else(|| self.invalid())
    }

    fn negate(&self, value: i32) -> ParseResult<i32> {
        value.checked_neg().ok_or_else(|| self.out_of_range())
    }

    /// Evaluates a plain numeric operand: a literal or symbol, optionally
    /// preceded by a minus sign.
    fn scalar(&self, tokens: &[&TokenKind<'_>]) -> ParseResult<i32> {
        match tokens {
            [TokenKind::Number(value)] => self.number(value),
            [TokenKind::Minus, TokenKind::Number(value)] => {
                self.number(&-value)
            }
            [TokenKind::Identifier(name)] => self.symbol(name),
            [TokenKind::Minus, TokenKind::Identifier(name)] => {
                let value = self.symbol(name)?;
                self.negate(value)
            }
            _ => Err(self.invalid()),
        }
    }

    fn indirect(
        &self,
        inner: &[&TokenKind<'_>],
    ) -> ParseResult<(OperandKind, i32)> {
        match inner {
            [TokenKind::Identifier("bc")] => {
                Ok((OperandKind::IR16, i32::from(Reg16::Bc.selector())))
            }
            [TokenKind::Identifier("de")] => {
                Ok((OperandKind::IR16, i32::from(Reg16::De.selector())))
            }
            [TokenKind::Identifier("c")] => Ok((OperandKind::IC, 0)),
            [TokenKind::Identifier("hl")] => Ok((OperandKind::IHL, 0)),
            [TokenKind::Identifier("hli")]
            | [TokenKind::Identifier("hl"), TokenKind::Plus] => {
                Ok((OperandKind::IHLI, 0))
            }
            [TokenKind::Identifier("hld")]
            | [TokenKind::Identifier("hl"), TokenKind::Minus] => {
                Ok((OperandKind::IHLD, 0))
            }
            _ => Ok((OperandKind::IN16, self.scalar(inner)?)),
        }
    }

    fn classify(
        &self,
        tokens: &[&TokenKind<'_>],
    ) -> ParseResult<(OperandKind, i32)> {
        match tokens {
            [TokenKind::Identifier(name)] => match keyword(name) {
                Some(kind_value) => Ok(kind_value),
                None => Ok((OperandKind::N, self.symbol(name)?)),
            },
            [TokenKind::BackwardLabel(depth)] => {
                Ok((OperandKind::Label, -i32::from(*depth)))
            }
            [TokenKind::ForwardLabel(depth)] => {
                Ok((OperandKind::Label, i32::from(*depth)))
            }
            [TokenKind::OpenBracket, inner @ .., TokenKind::CloseBracket] => {
                self.indirect(inner)
            }
            [TokenKind::Identifier("sp"), TokenKind::Plus, rest @ ..] => {
                Ok((OperandKind::SpE8, self.scalar(rest)?))
            }
            [TokenKind::Identifier("sp"), TokenKind::Minus, rest @ ..] => {
                let value = self.scalar(rest)?;
                Ok((OperandKind::SpE8, self.negate(value)?))
            }
            _ => Ok((OperandKind::N, self.scalar(tokens)?)),
        }
    }
}

/// Classifies one operand field into exactly one [`OperandKind`].  Keywords
/// take priority; any other identifier is looked up in `symbols`.
pub fn classify_operand(
    field: &Field<'_>,
    symbols: &SymbolTable,
    line: usize,
) -> ParseResult<Operand> {
    let classifier = Classifier { symbols, span: field.span, line };
    let tokens = tokenize(field.text, field.span.start())
        .map_err(|span| classifier.invalid_at(span))?;
    let kinds: Vec<&TokenKind<'_>> = tokens.iter().collect();
    let (kind, value) = classifier.classify(&kinds)?;
    Ok(Operand { kind, value, span: field.span })
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{OperandKind, classify_operand, is_keyword};
    use crate::asm::{Symbol, SymbolTable};
    use crate::parse::{Field, ParseErrorKind, SrcSpan};

    fn classify(text: &str) -> Result<(OperandKind, i32), ParseErrorKind> {
        let symbols = SymbolTable::new(&[
            Symbol::new("dst", 0xc000),
            Symbol::new("len", 5),
        ])
        .unwrap();
        let field = Field {
            text,
            span: SrcSpan::from_byte_range(0..text.len()),
        };
        classify_operand(&field, &symbols, 1)
            .map(|operand| (operand.kind, operand.value))
            .map_err(|error| error.kind)
    }

    #[test]
    fn numbers() {
        assert_eq!(classify("42"), Ok((OperandKind::N, 42)));
        assert_eq!(classify("-128"), Ok((OperandKind::N, -128)));
        assert_eq!(classify("%101"), Ok((OperandKind::N, 5)));
        assert_eq!(classify("$FFfe"), Ok((OperandKind::N, 0xfffe)));
        assert_eq!(classify("len"), Ok((OperandKind::N, 5)));
        assert_eq!(classify("-len"), Ok((OperandKind::N, -5)));
        assert_eq!(classify("4294967296"), Err(ParseErrorKind::OutOfRange));
        assert_eq!(classify("-2147483648"), Ok((OperandKind::N, i32::MIN)));
    }

    #[test]
    fn registers() {
        assert_eq!(classify("a"), Ok((OperandKind::R8, 0)));
        assert_eq!(classify("l"), Ok((OperandKind::R8, 6)));
        assert_eq!(classify("de"), Ok((OperandKind::R16, 1)));
        assert_eq!(classify("sp"), Ok((OperandKind::Sp, 0)));
        assert_eq!(classify("af"), Ok((OperandKind::Af, 0)));
        assert_eq!(classify("nz"), Ok((OperandKind::Cc, 0)));
        assert_eq!(classify("A"), Err(ParseErrorKind::InvalidArgument));
    }

    #[test]
    fn indirect() {
        assert_eq!(classify("[bc]"), Ok((OperandKind::IR16, 0)));
        assert_eq!(classify("[ de ]"), Ok((OperandKind::IR16, 1)));
        assert_eq!(classify("[hl]"), Ok((OperandKind::IHL, 0)));
        assert_eq!(classify("[hli]"), Ok((OperandKind::IHLI, 0)));
        assert_eq!(classify("[hl+]"), Ok((OperandKind::IHLI, 0)));
        assert_eq!(classify("[hld]"), Ok((OperandKind::IHLD, 0)));
        assert_eq!(classify("[hl-]"), Ok((OperandKind::IHLD, 0)));
        assert_eq!(classify("[c]"), Ok((OperandKind::IC, 0)));
        assert_eq!(classify("[$ff80]"), Ok((OperandKind::IN16, 0xff80)));
        assert_eq!(classify("[dst]"), Ok((OperandKind::IN16, 0xc000)));
        assert_eq!(classify("[a]"), Err(ParseErrorKind::InvalidArgument));
        assert_eq!(classify("[hl"), Err(ParseErrorKind::InvalidArgument));
    }

    #[test]
    fn stack_offsets() {
        assert_eq!(classify("sp+4"), Ok((OperandKind::SpE8, 4)));
        assert_eq!(classify("sp - 2"), Ok((OperandKind::SpE8, -2)));
        assert_eq!(classify("sp+len"), Ok((OperandKind::SpE8, 5)));
    }

    #[test]
    fn labels() {
        assert_eq!(classify(":-"), Ok((OperandKind::Label, -1)));
        assert_eq!(classify(":--"), Ok((OperandKind::Label, -2)));
        assert_eq!(classify(":+"), Ok((OperandKind::Label, 1)));
    }

    #[test]
    fn invalid() {
        assert_eq!(classify("src"), Err(ParseErrorKind::InvalidArgument));
        assert_eq!(classify("1 2"), Err(ParseErrorKind::InvalidArgument));
        assert_eq!(classify("a@"), Err(ParseErrorKind::InvalidArgument));
        assert_eq!(classify("-a"), Err(ParseErrorKind::InvalidArgument));
    }

    #[test]
    fn keywords() {
        assert!(is_keyword("hl"));
        assert!(is_keyword("hli"));
        assert!(is_keyword("nz"));
        assert!(!is_keyword("z"));
        assert!(!is_keyword("len"));
    }
}

//===========================================================================//
