use std::ops::Range;
use thiserror::Error;

//===========================================================================//

/// A span of byte offsets within a source code file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SrcSpan {
    start: usize,
    end: usize,
}

impl SrcSpan {
    /// Constructs a span from the given the byte range.
    pub fn from_byte_range(range: Range<usize>) -> SrcSpan {
        debug_assert!(range.start <= range.end);
        SrcSpan { start: range.start, end: range.end.max(range.start) }
    }

    /// Returns the byte range represented by this span.
    pub fn byte_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns the starting byte offset of this span.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the ending byte offset of this span.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns this span shifted later in the file by `offset` bytes.
    pub(crate) fn shifted(&self, offset: usize) -> SrcSpan {
        SrcSpan { start: self.start + offset, end: self.end + offset }
    }
}

//===========================================================================//

/// The category of a [`ParseError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParseErrorKind {
    /// The mnemonic is not a known instruction.
    InvalidInstruction,
    /// An operand could not be classified.
    InvalidArgument,
    /// An instruction was given more than two operands.
    TooManyArguments,
    /// The instruction does not accept this combination of operands.
    InvalidCombination,
    /// An operand was of the right kind but had a disallowed value.
    OutOfRange,
    /// An anonymous-label reference does not name any label.
    UnresolvedLabel,
    /// The program has more instructions than can be addressed.
    TooManyInstructions,
}

//===========================================================================//

/// A specialized `Result` type for parsing operations.
pub type ParseResult<V> = Result<V, ParseError>;

/// An error encountered while assembling a source code file.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{message} at line {line}")]
pub struct ParseError {
    /// The category of the error.
    pub kind: ParseErrorKind,
    /// The location in the file where the error occurred.
    pub span: SrcSpan,
    /// The 1-based line number containing the start of the span.
    pub line: usize,
    /// The error message to report to the user.
    pub message: String,
}

impl ParseError {
    /// Constructs a parse error.
    pub fn new(
        kind: ParseErrorKind,
        span: SrcSpan,
        line: usize,
        message: impl Into<String>,
    ) -> ParseError {
        ParseError { kind, span, line, message: message.into() }
    }

    /// Formats the error for display to a user, quoting the offending
    /// source line with `~` characters marking the span.
    pub fn render(&self, source: &str) -> String {
        let start = self.span.start.min(source.len());
        let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[line_start..]
            .find('\n')
            .map_or(source.len(), |i| line_start + i);
        let text = source[line_start..line_end].trim_end_matches('\r');
        let markings: String = text
            .char_indices()
            .map(|(i, _)| {
                let offset = line_start + i;
                let marked = self.span.byte_range().contains(&offset);
                if marked { '~' } else { ' ' }
            })
            .collect();
        format!(
            "{} at line {}\n\n{}\n{}\n",
            self.message,
            self.line,
            text,
            markings.trim_end()
        )
    }
}

//===========================================================================//


//===========================================================================//
