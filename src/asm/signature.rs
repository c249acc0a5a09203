//! The instruction-signature table: the complete set of legal operand
//! combinations for each mnemonic, and the rules for turning classified
//! operands into instruction parameters.

use super::label::LabelField;
use super::mnemonic::Mnemonic;
use crate::isa::{Instruction, Operation, Reg8, Reg16};
use crate::parse::{
    Operand, OperandKind, ParseError, ParseErrorKind, ParseResult, SrcSpan,
};
use std::collections::HashMap;
use std::sync::LazyLock;

//===========================================================================//

/// How to extract instruction parameters from the operands of a matched
/// signature, and which constraints those operands must satisfy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Shape {
    /// No parameters.
    None,
    /// `r8`: p1 = register.
    R8,
    /// `n8`: p1 = immediate.
    N8,
    /// `a, r8`: p1 = register.
    AR8,
    /// `a, [hl]` and similar: no parameters.
    AFixed,
    /// `a, n8`: p1 = immediate.
    AN8,
    /// `hl, r16`: p1 = register pair.
    HlR16,
    /// `r16`: p1 = register pair.
    R16,
    /// `u3, r8`: p1 = bit index, p2 = register.
    U3R8,
    /// `u3, [hl]`: p1 = bit index.
    U3Fixed,
    /// `r8, r8`: p1 = destination, p2 = source.
    R8R8,
    /// `r8, n8`: p1 = register, p2 = immediate.
    R8N8,
    /// `r16, n16`: p1 = register pair, p2 = immediate.
    R16N16,
    /// `[hl], r8`: p1 = register.
    FixedR8,
    /// `[hl], n8`: p1 = immediate.
    FixedN8,
    /// `r8, [hl]`: p1 = register.
    R8Fixed,
    /// `[r16], a`: p1 = register pair.
    IR16A,
    /// `[n16], a`: p1 = address.
    IN16A,
    /// `[c], a` and similar: no parameters.
    FixedA,
    /// `a, [r16]`: p1 = register pair.
    AIR16,
    /// `a, [n16]`: p1 = address.
    AIN16,
    /// `n16`: p1 = immediate.
    N16,
    /// `cc, n16`: p1 = condition, p2 = immediate.
    CcN16,
    /// `hl`: no parameters.
    Hl,
    /// `e8`: p1 = raw relative offset.
    E8,
    /// `label`: p1 = relative offset, resolved later.
    Label,
    /// `cc, e8`: p1 = condition, p2 = raw relative offset.
    CcE8,
    /// `cc, label`: p1 = condition, p2 = relative offset, resolved later.
    CcLabel,
    /// `cc`: p1 = condition.
    Cc,
    /// `vec`: p1 = restart vector.
    Vec,
    /// `hl, sp`: no parameters.
    HlSp,
    /// `sp, e8`: p1 = offset.
    SpE8,
    /// `sp, n16`: p1 = immediate.
    SpN16,
    /// `[n16], sp`: p1 = address.
    IN16Sp,
    /// `hl, sp+e8`: p1 = offset.
    HlSpE8,
    /// `sp, hl`: no parameters.
    SpHl,
}

//===========================================================================//

type Kind = Option<OperandKind>;

const NONE: Kind = None;
const N: Kind = Some(OperandKind::N);
const R8: Kind = Some(OperandKind::R8);
const R16: Kind = Some(OperandKind::R16);
const IR16: Kind = Some(OperandKind::IR16);
const IHL: Kind = Some(OperandKind::IHL);
const IHLI: Kind = Some(OperandKind::IHLI);
const IHLD: Kind = Some(OperandKind::IHLD);
const IN16: Kind = Some(OperandKind::IN16);
const IC: Kind = Some(OperandKind::IC);
const CC: Kind = Some(OperandKind::Cc);
const SP: Kind = Some(OperandKind::Sp);
const AF: Kind = Some(OperandKind::Af);
const SPE8: Kind = Some(OperandKind::SpE8);
const LABEL: Kind = Some(OperandKind::Label);

#[rustfmt::skip]
static SIGNATURES: &[(Mnemonic, Kind, Kind, Operation, Shape)] = &[
    (Mnemonic::Adc,  R8,   NONE, Operation::AdcAR8,    Shape::R8),
    (Mnemonic::Adc,  IHL,  NONE, Operation::AdcAMhl,   Shape::None),
    (Mnemonic::Adc,  N,    NONE, Operation::AdcAI8,    Shape::N8),
    (Mnemonic::Adc,  R8,   R8,   Operation::AdcAR8,    Shape::AR8),
    (Mnemonic::Adc,  R8,   IHL,  Operation::AdcAMhl,   Shape::AFixed),
    (Mnemonic::Adc,  R8,   N,    Operation::AdcAI8,    Shape::AN8),

    (Mnemonic::Add,  R8,   NONE, Operation::AddAR8,    Shape::R8),
    (Mnemonic::Add,  IHL,  NONE, Operation::AddAMhl,   Shape::None),
    (Mnemonic::Add,  N,    NONE, Operation::AddAI8,    Shape::N8),
    (Mnemonic::Add,  R8,   R8,   Operation::AddAR8,    Shape::AR8),
    (Mnemonic::Add,  R8,   IHL,  Operation::AddAMhl,   Shape::AFixed),
    (Mnemonic::Add,  R8,   N,    Operation::AddAI8,    Shape::AN8),
    (Mnemonic::Add,  R16,  R16,  Operation::AddHlR16,  Shape::HlR16),
    (Mnemonic::Add,  R16,  SP,   Operation::AddHlSp,   Shape::HlSp),
    (Mnemonic::Add,  SP,   N,    Operation::AddSpE8,   Shape::SpE8),

    (Mnemonic::And,  R8,   NONE, Operation::AndAR8,    Shape::R8),
    (Mnemonic::And,  IHL,  NONE, Operation::AndAMhl,   Shape::None),
    (Mnemonic::And,  N,    NONE, Operation::AndAI8,    Shape::N8),
    (Mnemonic::And,  R8,   R8,   Operation::AndAR8,    Shape::AR8),
    (Mnemonic::And,  R8,   IHL,  Operation::AndAMhl,   Shape::AFixed),
    (Mnemonic::And,  R8,   N,    Operation::AndAI8,    Shape::AN8),

    (Mnemonic::Cp,   R8,   NONE, Operation::CpAR8,     Shape::R8),
    (Mnemonic::Cp,   IHL,  NONE, Operation::CpAMhl,    Shape::None),
    (Mnemonic::Cp,   N,    NONE, Operation::CpAI8,     Shape::N8),
    (Mnemonic::Cp,   R8,   R8,   Operation::CpAR8,     Shape::AR8),
    (Mnemonic::Cp,   R8,   IHL,  Operation::CpAMhl,    Shape::AFixed),
    (Mnemonic::Cp,   R8,   N,    Operation::CpAI8,     Shape::AN8),

    (Mnemonic::Dec,  R8,   NONE, Operation::DecR8,     Shape::R8),
    (Mnemonic::Dec,  IHL,  NONE, Operation::DecMhl,    Shape::None),
    (Mnemonic::Dec,  R16,  NONE, Operation::DecR16,    Shape::R16),
    (Mnemonic::Dec,  SP,   NONE, Operation::DecSp,     Shape::None),

    (Mnemonic::Inc,  R8,   NONE, Operation::IncR8,     Shape::R8),
    (Mnemonic::Inc,  IHL,  NONE, Operation::IncMhl,    Shape::None),
    (Mnemonic::Inc,  R16,  NONE, Operation::IncR16,    Shape::R16),
    (Mnemonic::Inc,  SP,   NONE, Operation::IncSp,     Shape::None),

    (Mnemonic::Or,   R8,   NONE, Operation::OrAR8,     Shape::R8),
    (Mnemonic::Or,   IHL,  NONE, Operation::OrAMhl,    Shape::None),
    (Mnemonic::Or,   N,    NONE, Operation::OrAI8,     Shape::N8),
    (Mnemonic::Or,   R8,   R8,   Operation::OrAR8,     Shape::AR8),
    (Mnemonic::Or,   R8,   IHL,  Operation::OrAMhl,    Shape::AFixed),
    (Mnemonic::Or,   R8,   N,    Operation::OrAI8,     Shape::AN8),

    (Mnemonic::Sbc,  R8,   NONE, Operation::SbcAR8,    Shape::R8),
    (Mnemonic::Sbc,  IHL,  NONE, Operation::SbcAMhl,   Shape::None),
    (Mnemonic::Sbc,  N,    NONE, Operation::SbcAI8,    Shape::N8),
    (Mnemonic::Sbc,  R8,   R8,   Operation::SbcAR8,    Shape::AR8),
    (Mnemonic::Sbc,  R8,   IHL,  Operation::SbcAMhl,   Shape::AFixed),
    (Mnemonic::Sbc,  R8,   N,    Operation::SbcAI8,    Shape::AN8),

    (Mnemonic::Sub,  R8,   NONE, Operation::SubAR8,    Shape::R8),
    (Mnemonic::Sub,  IHL,  NONE, Operation::SubAMhl,   Shape::None),
    (Mnemonic::Sub,  N,    NONE, Operation::SubAI8,    Shape::N8),
    (Mnemonic::Sub,  R8,   R8,   Operation::SubAR8,    Shape::AR8),
    (Mnemonic::Sub,  R8,   IHL,  Operation::SubAMhl,   Shape::AFixed),
    (Mnemonic::Sub,  R8,   N,    Operation::SubAI8,    Shape::AN8),

    (Mnemonic::Xor,  R8,   NONE, Operation::XorAR8,    Shape::R8),
    (Mnemonic::Xor,  IHL,  NONE, Operation::XorAMhl,   Shape::None),
    (Mnemonic::Xor,  N,    NONE, Operation::XorAI8,    Shape::N8),
    (Mnemonic::Xor,  R8,   R8,   Operation::XorAR8,    Shape::AR8),
    (Mnemonic::Xor,  R8,   IHL,  Operation::XorAMhl,   Shape::AFixed),
    (Mnemonic::Xor,  R8,   N,    Operation::XorAI8,    Shape::AN8),

    (Mnemonic::Bit,  N,    R8,   Operation::BitU3R8,   Shape::U3R8),
    (Mnemonic::Bit,  N,    IHL,  Operation::BitU3Mhl,  Shape::U3Fixed),
    (Mnemonic::Res,  N,    R8,   Operation::ResU3R8,   Shape::U3R8),
    (Mnemonic::Res,  N,    IHL,  Operation::ResU3Mhl,  Shape::U3Fixed),
    (Mnemonic::Set,  N,    R8,   Operation::SetU3R8,   Shape::U3R8),
    (Mnemonic::Set,  N,    IHL,  Operation::SetU3Mhl,  Shape::U3Fixed),
    (Mnemonic::Swap, R8,   NONE, Operation::SwapR8,    Shape::R8),
    (Mnemonic::Swap, IHL,  NONE, Operation::SwapMhl,   Shape::None),

    (Mnemonic::Rl,   R8,   NONE, Operation::RlR8,      Shape::R8),
    (Mnemonic::Rl,   IHL,  NONE, Operation::RlMhl,     Shape::None),
    (Mnemonic::Rla,  NONE, NONE, Operation::Rla,       Shape::None),
    (Mnemonic::Rlc,  R8,   NONE, Operation::RlcR8,     Shape::R8),
    (Mnemonic::Rlc,  IHL,  NONE, Operation::RlcMhl,    Shape::None),
    (Mnemonic::Rlca, NONE, NONE, Operation::Rlca,      Shape::None),
    (Mnemonic::Rr,   R8,   NONE, Operation::RrR8,      Shape::R8),
    (Mnemonic::Rr,   IHL,  NONE, Operation::RrMhl,     Shape::None),
    (Mnemonic::Rra,  NONE, NONE, Operation::Rra,       Shape::None),
    (Mnemonic::Rrc,  R8,   NONE, Operation::RrcR8,     Shape::R8),
    (Mnemonic::Rrc,  IHL,  NONE, Operation::RrcMhl,    Shape::None),
    (Mnemonic::Rrca, NONE, NONE, Operation::Rrca,      Shape::None),
    (Mnemonic::Sla,  R8,   NONE, Operation::SlaR8,     Shape::R8),
    (Mnemonic::Sla,  IHL,  NONE, Operation::SlaMhl,    Shape::None),
    (Mnemonic::Sra,  R8,   NONE, Operation::SraR8,     Shape::R8),
    (Mnemonic::Sra,  IHL,  NONE, Operation::SraMhl,    Shape::None),
    (Mnemonic::Srl,  R8,   NONE, Operation::SrlR8,     Shape::R8),
    (Mnemonic::Srl,  IHL,  NONE, Operation::SrlMhl,    Shape::None),

    (Mnemonic::Ld,   R8,   R8,   Operation::LdR8R8,    Shape::R8R8),
    (Mnemonic::Ld,   R8,   N,    Operation::LdR8I8,    Shape::R8N8),
    (Mnemonic::Ld,   R16,  N,    Operation::LdR16I16,  Shape::R16N16),
    (Mnemonic::Ld,   IHL,  R8,   Operation::LdMhlR8,   Shape::FixedR8),
    (Mnemonic::Ld,   IHL,  N,    Operation::LdMhlI8,   Shape::FixedN8),
    (Mnemonic::Ld,   R8,   IHL,  Operation::LdR8Mhl,   Shape::R8Fixed),
    (Mnemonic::Ld,   IR16, R8,   Operation::LdMr16A,   Shape::IR16A),
    (Mnemonic::Ld,   IN16, R8,   Operation::LdM16A,    Shape::IN16A),
    (Mnemonic::Ld,   R8,   IR16, Operation::LdAMr16,   Shape::AIR16),
    (Mnemonic::Ld,   R8,   IN16, Operation::LdAM16,    Shape::AIN16),
    (Mnemonic::Ld,   IHLI, R8,   Operation::LdMhliA,   Shape::FixedA),
    (Mnemonic::Ld,   IHLD, R8,   Operation::LdMhldA,   Shape::FixedA),
    (Mnemonic::Ld,   R8,   IHLI, Operation::LdAMhli,   Shape::AFixed),
    (Mnemonic::Ld,   R8,   IHLD, Operation::LdAMhld,   Shape::AFixed),
    (Mnemonic::Ld,   SP,   N,    Operation::LdSpI16,   Shape::SpN16),
    (Mnemonic::Ld,   IN16, SP,   Operation::LdM16Sp,   Shape::IN16Sp),
    (Mnemonic::Ld,   R16,  SPE8, Operation::LdHlSpE8,  Shape::HlSpE8),
    (Mnemonic::Ld,   SP,   R16,  Operation::LdSpHl,    Shape::SpHl),

    (Mnemonic::Ldh,  N,    R8,   Operation::LdhM16A,   Shape::IN16A),
    (Mnemonic::Ldh,  IN16, R8,   Operation::LdhM16A,   Shape::IN16A),
    (Mnemonic::Ldh,  IC,   R8,   Operation::LdhMcA,    Shape::FixedA),
    (Mnemonic::Ldh,  R8,   N,    Operation::LdhAM16,   Shape::AIN16),
    (Mnemonic::Ldh,  R8,   IN16, Operation::LdhAM16,   Shape::AIN16),
    (Mnemonic::Ldh,  R8,   IC,   Operation::LdhAMc,    Shape::AFixed),

    (Mnemonic::Call, N,    NONE, Operation::CallI16,   Shape::N16),
    (Mnemonic::Call, CC,   N,    Operation::CallCcI16, Shape::CcN16),
    (Mnemonic::Jp,   R16,  NONE, Operation::JpHl,      Shape::Hl),
    (Mnemonic::Jp,   N,    NONE, Operation::JpI16,     Shape::N16),
    (Mnemonic::Jp,   CC,   N,    Operation::JpCcI16,   Shape::CcN16),
    (Mnemonic::Jr,   N,    NONE, Operation::JrE8,      Shape::E8),
    (Mnemonic::Jr,   LABEL, NONE, Operation::JrE8,     Shape::Label),
    (Mnemonic::Jr,   CC,   N,    Operation::JrCcE8,    Shape::CcE8),
    (Mnemonic::Jr,   CC,   LABEL, Operation::JrCcE8,   Shape::CcLabel),
    (Mnemonic::Ret,  CC,   NONE, Operation::RetCc,     Shape::Cc),
    (Mnemonic::Ret,  NONE, NONE, Operation::Ret,       Shape::None),
    (Mnemonic::Reti, NONE, NONE, Operation::Reti,      Shape::None),
    (Mnemonic::Rst,  N,    NONE, Operation::Rst,       Shape::Vec),

    (Mnemonic::Pop,  AF,   NONE, Operation::PopAf,     Shape::None),
    (Mnemonic::Pop,  R16,  NONE, Operation::PopR16,    Shape::R16),
    (Mnemonic::Push, AF,   NONE, Operation::PushAf,    Shape::None),
    (Mnemonic::Push, R16,  NONE, Operation::PushR16,   Shape::R16),

    (Mnemonic::Ccf,  NONE, NONE, Operation::Ccf,       Shape::None),
    (Mnemonic::Cpl,  NONE, NONE, Operation::Cpl,       Shape::None),
    (Mnemonic::Daa,  NONE, NONE, Operation::Daa,       Shape::None),
    (Mnemonic::Di,   NONE, NONE, Operation::Di,        Shape::None),
    (Mnemonic::Ei,   NONE, NONE, Operation::Ei,        Shape::None),
    (Mnemonic::Halt, NONE, NONE, Operation::Halt,      Shape::None),
    (Mnemonic::Nop,  NONE, NONE, Operation::Nop,       Shape::None),
    (Mnemonic::Scf,  NONE, NONE, Operation::Scf,       Shape::None),
    (Mnemonic::Stop, NONE, NONE, Operation::Stop,      Shape::None),
];

type SignatureKey = (Mnemonic, Kind, Kind);

static SIGNATURE_MAP: LazyLock<HashMap<SignatureKey, (Operation, Shape)>> =
    LazyLock::new(|| {
        SIGNATURES
            .iter()
            .map(|&(mnemonic, kind1, kind2, op, shape)| {
                ((mnemonic, kind1, kind2), (op, shape))
            })
            .collect()
    });

/// Looks up the operation and shape for a mnemonic applied to operands of
/// the given kinds.  Returns `None` if the combination is not legal.
pub fn lookup(
    mnemonic: Mnemonic,
    kind1: Option<OperandKind>,
    kind2: Option<OperandKind>,
) -> Option<(Operation, Shape)> {
    SIGNATURE_MAP.get(&(mnemonic, kind1, kind2)).copied()
}

//===========================================================================//

/// An instruction selected from the signature table, along with any
/// anonymous-label operand that still needs to be resolved.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Selected {
    /// The instruction, with any label field left as zero.
    pub instruction: Instruction,
    /// The unresolved label operand and the field it will be written to.
    pub label: Option<(LabelField, Operand)>,
}

/// Selects and builds the instruction for a mnemonic and its classified
/// operands, enforcing every operand constraint of the matched shape.
/// `span` locates the whole instruction, for errors that are not specific
/// to a single operand.
pub fn select(
    mnemonic: Mnemonic,
    operands: &[Operand],
    span: SrcSpan,
    line: usize,
) -> ParseResult<Selected> {
    let first = operands.first().copied();
    let second = operands.get(1).copied();
    let Some((op, shape)) = lookup(
        mnemonic,
        first.map(|operand| operand.kind),
        second.map(|operand| operand.kind),
    ) else {
        return Err(ParseError::new(
            ParseErrorKind::InvalidCombination,
            span,
            line,
            "invalid arguments for instruction",
        ));
    };
    let extractor = Extractor { line };
    // The table guarantees that each shape's operands are present.
    let missing = || {
        ParseError::new(
            ParseErrorKind::InvalidCombination,
            span,
            line,
            "invalid arguments for instruction",
        )
    };
    let x = || first.ok_or_else(missing);
    let y = || second.ok_or_else(missing);
    let mut label = None;
    let (p1, p2) = match shape {
        Shape::None => (0, 0),
        Shape::R8 | Shape::R16 | Shape::R8Fixed | Shape::Cc => {
            (x()?.value as u16, 0)
        }
        Shape::N8 => (extractor.n8(x()?)?, 0),
        Shape::AR8 | Shape::AIR16 => {
            extractor.a(x()?)?;
            (y()?.value as u16, 0)
        }
        Shape::AFixed => {
            extractor.a(x()?)?;
            (0, 0)
        }
        Shape::AN8 => {
            extractor.a(x()?)?;
            (extractor.n8(y()?)?, 0)
        }
        Shape::AIN16 => {
            extractor.a(x()?)?;
            (extractor.n16(y()?)?, 0)
        }
        Shape::HlR16 => {
            extractor.hl(x()?)?;
            (y()?.value as u16, 0)
        }
        Shape::U3R8 => (extractor.u3(x()?)?, y()?.value as u16),
        Shape::U3Fixed => (extractor.u3(x()?)?, 0),
        Shape::R8R8 => (x()?.value as u16, y()?.value as u16),
        Shape::R8N8 => (x()?.value as u16, extractor.n8(y()?)?),
        Shape::R16N16 | Shape::CcN16 => {
            (x()?.value as u16, extractor.n16(y()?)?)
        }
        Shape::FixedR8 => (y()?.value as u16, 0),
        Shape::FixedN8 => (extractor.n8(y()?)?, 0),
        Shape::IR16A => {
            extractor.a(y()?)?;
            (x()?.value as u16, 0)
        }
        Shape::IN16A => {
            extractor.a(y()?)?;
            (extractor.n16(x()?)?, 0)
        }
        Shape::FixedA => {
            extractor.a(y()?)?;
            (0, 0)
        }
        Shape::N16 => (extractor.n16(x()?)?, 0),
        Shape::Hl | Shape::HlSp => {
            extractor.hl(x()?)?;
            (0, 0)
        }
        Shape::E8 => (extractor.e8(x()?)?, 0),
        Shape::Label => {
            label = Some((LabelField::P1, x()?));
            (0, 0)
        }
        Shape::CcE8 => (x()?.value as u16, extractor.e8(y()?)?),
        Shape::CcLabel => {
            label = Some((LabelField::P2, y()?));
            (x()?.value as u16, 0)
        }
        Shape::Vec => (extractor.vec(x()?)?, 0),
        Shape::SpE8 => (extractor.e8(y()?)?, 0),
        Shape::SpN16 => (extractor.n16(y()?)?, 0),
        Shape::IN16Sp => (extractor.n16(x()?)?, 0),
        Shape::HlSpE8 => {
            extractor.hl(x()?)?;
            (extractor.e8(y()?)?, 0)
        }
        Shape::SpHl => {
            extractor.hl(y()?)?;
            (0, 0)
        }
    };
    Ok(Selected { instruction: Instruction::new(op, p1, p2), label })
}

//===========================================================================//

struct Extractor {
    line: usize,
}

impl Extractor {
    fn error(&self, operand: Operand, message: &str) -> ParseError {
        ParseError::new(
            ParseErrorKind::OutOfRange,
            operand.span,
            self.line,
            message,
        )
    }

    fn ranged(
        &self,
        operand: Operand,
        min: i32,
        max: i32,
        message: &str,
    ) -> ParseResult<u16> {
        if operand.value < min || operand.value > max {
            return Err(self.error(operand, message));
        }
        Ok(operand.value as u16)
    }

    fn a(&self, operand: Operand) -> ParseResult<()> {
        if operand.value != i32::from(Reg8::A.selector()) {
            return Err(self.error(operand, "argument must be register A"));
        }
        Ok(())
    }

    fn hl(&self, operand: Operand) -> ParseResult<()> {
        if operand.value != i32::from(Reg16::Hl.selector()) {
            return Err(self.error(operand, "argument must be register HL"));
        }
        Ok(())
    }

    fn u3(&self, operand: Operand) -> ParseResult<u16> {
        self.ranged(operand, 0, 7, "argument must be 3-bit unsigned")
    }

    fn n8(&self, operand: Operand) -> ParseResult<u16> {
        let value = self.ranged(operand, -128, 255, "argument must be 8-bit")?;
        Ok(value & 0xff)
    }

    fn e8(&self, operand: Operand) -> ParseResult<u16> {
        self.ranged(operand, -128, 127, "argument must be 8-bit offset")
    }

    fn n16(&self, operand: Operand) -> ParseResult<u16> {
        self.ranged(operand, -32768, 65535, "argument must be 16-bit")
    }

    fn vec(&self, operand: Operand) -> ParseResult<u16> {
        const MESSAGE: &str = "argument must be a restart vector";
        let value = self.ranged(operand, 0, 0x38, MESSAGE)?;
        if value % 8 != 0 {
            return Err(self.error(operand, MESSAGE));
        }
        Ok(value)
    }
}

//===========================================================================//


//===========================================================================//
