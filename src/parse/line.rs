use super::types::{ParseError, ParseErrorKind, ParseResult, SrcSpan};

//===========================================================================//

/// A piece of text from a source line, with its location in the file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Field<'a> {
    /// The text of the field, with surrounding whitespace removed.
    pub text: &'a str,
    /// The location of the text in the source file.
    pub span: SrcSpan,
}

impl<'a> Field<'a> {
    fn trimmed(text: &'a str, offset: usize) -> Field<'a> {
        let start = text.len() - text.trim_start().len();
        let inner = text.trim();
        let start = offset + start;
        Field {
            text: inner,
            span: SrcSpan::from_byte_range(start..(start + inner.len())),
        }
    }
}

/// One source line, broken into its syntactic parts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceLine<'a> {
    /// The 1-based line number.
    pub number: usize,
    /// The location of the anonymous-label marker, if the line defines one.
    pub label: Option<SrcSpan>,
    /// The instruction mnemonic, if the line holds an instruction.
    pub mnemonic: Option<Field<'a>>,
    /// The operands following the mnemonic (at most two).
    pub operands: Vec<Field<'a>>,
    /// The location of the whole instruction (mnemonic and operands).
    pub span: SrcSpan,
}

//===========================================================================//

/// Iterates over the lines of a source file, yielding each line's 1-based
/// number, byte offset within the file, and text (without the newline).
pub fn source_lines(
    source: &str,
) -> impl Iterator<Item = (usize, usize, &str)> {
    let mut offset = 0;
    source.split('\n').enumerate().map(move |(index, text)| {
        let start = offset;
        offset += text.len() + 1;
        (index + 1, start, text)
    })
}

/// Splits a single source line into an optional anonymous-label marker, a
/// mnemonic, and up to two comma-separated operands.  A `;` starts a
/// comment that runs to the end of the line.
pub fn split_line(
    text: &str,
    offset: usize,
    number: usize,
) -> ParseResult<SourceLine<'_>> {
    let code = match text.find(';') {
        Some(index) => &text[..index],
        None => text,
    };
    let mut rest = Field::trimmed(code, offset);

    let mut label = None;
    if rest.text.starts_with(':') {
        let colons = rest.text.len() - rest.text.trim_start_matches(':').len();
        let start = rest.span.start();
        label = Some(SrcSpan::from_byte_range(start..(start + colons)));
        rest = Field::trimmed(&rest.text[colons..], start + colons);
    }

    let mut line = SourceLine {
        number,
        label,
        mnemonic: None,
        operands: Vec::new(),
        span: rest.span,
    };
    if rest.text.is_empty() {
        return Ok(line);
    }

    let start = rest.span.start();
    let (mnemonic, args) = match rest.text.find(char::is_whitespace) {
        Some(index) => rest.text.split_at(index),
        None => (rest.text, ""),
    };
    line.mnemonic = Some(Field::trimmed(mnemonic, start));
    let args_offset = start + mnemonic.len();
    if args.trim().is_empty() {
        return Ok(line);
    }

    let mut part_offset = args_offset;
    for part in args.split(',') {
        let field = Field::trimmed(part, part_offset);
        if line.operands.len() == 2 {
            let end = rest.span.end();
            let span = SrcSpan::from_byte_range(field.span.start()..end);
            return Err(ParseError::new(
                ParseErrorKind::TooManyArguments,
                span,
                number,
                "too many arguments",
            ));
        }
        if field.text.is_empty() {
            let span = SrcSpan::from_byte_range(args_offset..rest.span.end());
            return Err(ParseError::new(
                ParseErrorKind::InvalidArgument,
                span,
                number,
                "missing argument",
            ));
        }
        line.operands.push(field);
        part_offset += part.len() + 1;
    }
    Ok(line)
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{source_lines, split_line};
    use crate::parse::ParseErrorKind;

    #[test]
    fn lines_and_offsets() {
        let lines: Vec<_> = source_lines("nop\n  ld a, b\n").collect();
        assert_eq!(
            lines,
            vec![(1, 0, "nop"), (2, 4, "  ld a, b"), (3, 14, "")]
        );
    }

    #[test]
    fn blank_and_comment_lines() {
        let line = split_line("   ; just a comment", 0, 1).unwrap();
        assert_eq!(line.label, None);
        assert_eq!(line.mnemonic, None);
        let line = split_line("", 0, 1).unwrap();
        assert_eq!(line.mnemonic, None);
    }

    #[test]
    fn mnemonic_and_operands() {
        let line = split_line("  ld a , [hl+] ; load", 100, 7).unwrap();
        assert_eq!(line.number, 7);
        let mnemonic = line.mnemonic.unwrap();
        assert_eq!(mnemonic.text, "ld");
        assert_eq!(mnemonic.span.byte_range(), 102..104);
        let texts: Vec<&str> = line.operands.iter().map(|f| f.text).collect();
        assert_eq!(texts, vec!["a", "[hl+]"]);
        assert_eq!(line.operands[0].span.byte_range(), 105..106);
        assert_eq!(line.operands[1].span.byte_range(), 109..114);
        assert_eq!(line.span.byte_range(), 102..114);
    }

    #[test]
    fn label_only_line() {
        let line = split_line("::", 10, 2).unwrap();
        assert_eq!(line.label.unwrap().byte_range(), 10..12);
        assert_eq!(line.mnemonic, None);
    }

    #[test]
    fn label_with_instruction() {
        let line = split_line(":  dec b", 0, 1).unwrap();
        assert_eq!(line.label.unwrap().byte_range(), 0..1);
        assert_eq!(line.mnemonic.unwrap().text, "dec");
        assert_eq!(line.operands[0].text, "b");
        assert_eq!(line.operands[0].span.byte_range(), 7..8);
    }

    #[test]
    fn too_many_arguments() {
        let error = split_line("ld a, b, c", 0, 3).unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::TooManyArguments);
        assert_eq!(error.line, 3);
        assert_eq!(error.span.byte_range(), 9..10);
    }

    #[test]
    fn missing_argument() {
        let error = split_line("ld a,", 0, 1).unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::InvalidArgument);
        assert_eq!(error.span.byte_range(), 2..5);
    }
}

//===========================================================================//
