use gbsim::asm::{Symbol, SymbolTable, assemble_source};
use gbsim::parse::{ParseError, ParseErrorKind};

//===========================================================================//

fn assemble_error(source: &str) -> ParseError {
    let symbols = SymbolTable::new(&[Symbol::new("len", 5)]).unwrap();
    assemble_source(&symbols, source).unwrap_err()
}

fn test_diagnostic(source: &str, kind: ParseErrorKind, rendered: &str) {
    let error = assemble_error(source);
    assert_eq!(error.kind, kind);
    assert_eq!(error.render(source), rendered);
}

//===========================================================================//

#[test]
fn invalid_instruction() {
    test_diagnostic(
        "nop\n  frob a\n",
        ParseErrorKind::InvalidInstruction,
        "invalid instruction at line 2\n\n  frob a\n  ~~~~\n",
    );
}

#[test]
fn mnemonics_are_case_sensitive() {
    test_diagnostic(
        "NOP\n",
        ParseErrorKind::InvalidInstruction,
        "invalid instruction at line 1\n\nNOP\n~~~\n",
    );
}

#[test]
fn invalid_argument() {
    test_diagnostic(
        "ld a, [hl+1]\n",
        ParseErrorKind::InvalidArgument,
        "invalid argument at line 1\n\nld a, [hl+1]\n      ~~~~~~\n",
    );
}

#[test]
fn invalid_character_is_marked() {
    test_diagnostic(
        "ld a, b@c\n",
        ParseErrorKind::InvalidArgument,
        "invalid argument at line 1\n\nld a, b@c\n       ~\n",
    );
}

#[test]
fn too_many_arguments() {
    test_diagnostic(
        "ld a, b, c\n",
        ParseErrorKind::TooManyArguments,
        "too many arguments at line 1\n\nld a, b, c\n         ~\n",
    );
}

#[test]
fn invalid_combination() {
    test_diagnostic(
        "ld [hl], [hl]\n",
        ParseErrorKind::InvalidCombination,
        "invalid arguments for instruction at line 1\n\n\
         ld [hl], [hl]\n~~~~~~~~~~~~~\n",
    );
}

#[test]
fn bit_index_out_of_range() {
    test_diagnostic(
        "bit 9,a\n",
        ParseErrorKind::OutOfRange,
        "argument must be 3-bit unsigned at line 1\n\nbit 9,a\n    ~\n",
    );
}

#[test]
fn operand_widths_are_checked() {
    test_diagnostic(
        "ld b, 256\n",
        ParseErrorKind::OutOfRange,
        "argument must be 8-bit at line 1\n\nld b, 256\n      ~~~\n",
    );
    test_diagnostic(
        "ld hl, $10000\n",
        ParseErrorKind::OutOfRange,
        "argument must be 16-bit at line 1\n\nld hl, $10000\n       ~~~~~~\n",
    );
    test_diagnostic(
        "jr nz, 128\n",
        ParseErrorKind::OutOfRange,
        "argument must be 8-bit offset at line 1\n\njr nz, 128\n       ~~~\n",
    );
}

#[test]
fn accumulator_required() {
    test_diagnostic(
        "add b, c\n",
        ParseErrorKind::OutOfRange,
        "argument must be register A at line 1\n\nadd b, c\n    ~\n",
    );
    test_diagnostic(
        "ld [de], b\n",
        ParseErrorKind::OutOfRange,
        "argument must be register A at line 1\n\nld [de], b\n         ~\n",
    );
}

#[test]
fn hl_required() {
    test_diagnostic(
        "add de, bc\n",
        ParseErrorKind::OutOfRange,
        "argument must be register HL at line 1\n\nadd de, bc\n    ~~\n",
    );
}

#[test]
fn unresolved_label() {
    test_diagnostic(
        "  ld b, len\n:\n  dec b\n  jr nz, :--\n",
        ParseErrorKind::UnresolvedLabel,
        "anonymous label does not exist at line 4\n\n  jr nz, :--\n\
         \x20        ~~~\n",
    );
}

#[test]
fn forward_label_past_end() {
    let error = assemble_error("  jr nz, :+\n  nop\n");
    assert_eq!(error.kind, ParseErrorKind::UnresolvedLabel);
    assert_eq!(error.line, 1);
}

#[test]
fn first_error_wins() {
    let error = assemble_error("frob\nbit 9, a\n");
    assert_eq!(error.kind, ParseErrorKind::InvalidInstruction);
    assert_eq!(error.line, 1);
}

#[test]
fn error_display() {
    let error = assemble_error("nop\nnop\nld a, nowhere\n");
    assert_eq!(error.to_string(), "invalid argument at line 3");
}

//===========================================================================//
