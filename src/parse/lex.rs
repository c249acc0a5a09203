use super::types::SrcSpan;
use logos::{self, Logos};
use num_bigint::BigInt;

//===========================================================================//

fn binary_literal_callback<'a>(
    lex: &mut logos::Lexer<'a, TokenKind<'a>>,
) -> Option<BigInt> {
    BigInt::parse_bytes(&lex.slice().as_bytes()[1..], 2)
}

fn decimal_literal_callback<'a>(
    lex: &mut logos::Lexer<'a, TokenKind<'a>>,
) -> Option<BigInt> {
    BigInt::parse_bytes(lex.slice().as_bytes(), 10)
}

fn hex_literal_callback<'a>(
    lex: &mut logos::Lexer<'a, TokenKind<'a>>,
) -> Option<BigInt> {
    BigInt::parse_bytes(&lex.slice().as_bytes()[1..], 16)
}

fn label_depth_callback<'a>(
    lex: &mut logos::Lexer<'a, TokenKind<'a>>,
) -> u16 {
    (lex.slice().len() - 1).min(usize::from(u16::MAX)) as u16
}

/// A lexical token within a single operand.
#[derive(Clone, Debug, Eq, Logos, PartialEq)]
#[logos(skip r"[ \t]+")]
pub(crate) enum TokenKind<'a> {
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[regex(r":-+", label_depth_callback)]
    BackwardLabel(u16),
    #[regex(r":\++", label_depth_callback)]
    ForwardLabel(u16),
    #[regex(r"%[01]+", binary_literal_callback)]
    #[regex(r"[0-9]+", decimal_literal_callback)]
    #[regex(r"\$[0-9a-fA-F]+", hex_literal_callback)]
    Number(BigInt),
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice())]
    Identifier(&'a str),
}

//===========================================================================//

/// Splits operand text into tokens.  `offset` is the byte offset of `text`
/// within the whole source file.  On failure, returns the span of the first
/// unrecognized character.
pub(crate) fn tokenize(
    text: &str,
    offset: usize,
) -> Result<Vec<TokenKind<'_>>, SrcSpan> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(text);
    while let Some(result) = lexer.next() {
        match result {
            Ok(kind) => tokens.push(kind),
            Err(()) => {
                let span = SrcSpan::from_byte_range(lexer.span());
                return Err(span.shifted(offset));
            }
        }
    }
    Ok(tokens)
}

//===========================================================================//


//===========================================================================//
