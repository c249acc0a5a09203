//! Facilities for breaking assembly source text into classified tokens.

mod lex;
mod line;
mod operand;
mod types;

pub use line::{Field, SourceLine, source_lines, split_line};
pub use operand::{Operand, OperandKind, classify_operand, is_keyword};
pub use types::{ParseError, ParseErrorKind, ParseResult, SrcSpan};

//===========================================================================//
