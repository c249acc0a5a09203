use gbsim::asm::{Symbol, SymbolTable, assemble_source};
use gbsim::isa::{Program, Reg8, Reg16};
use gbsim::proc::{Machine, SimError};

//===========================================================================//

const HELLO: &str = include_str!("../demos/hello.asm");
const NEGATE: &str = include_str!("../demos/negate.asm");
const EXTEND: &str = include_str!("../demos/extend.asm");

fn assemble(symbols: &[Symbol], source: &str) -> Program {
    let symbols = SymbolTable::new(symbols).unwrap();
    match assemble_source(&symbols, source) {
        Ok(program) => program,
        Err(error) => panic!("{}", error.render(source)),
    }
}

//===========================================================================//

#[test]
fn hello_copies_buffer() {
    let program = assemble(
        &[
            Symbol::new("dst", 0xc000),
            Symbol::new("src", 0x0100),
            Symbol::new("len", 5),
        ],
        HELLO,
    );
    let mut machine = Machine::new();
    machine.mem_mut().load(0x0100, b"hello");
    machine.run(&program).unwrap();
    assert_eq!(machine.mem().read_range(0xc000, 5), b"hello".to_vec());
    assert_eq!(machine.mem().read_byte(0xc005), 0);
    assert_eq!(machine.regs().get_r16(Reg16::Hl), 0x0105);
    assert_eq!(machine.regs().get_r16(Reg16::De), 0xc005);
    // 8 cycles of setup, 5 loop iterations of 10, minus the final branch.
    assert_eq!(machine.cycles(), 57);
}

#[test]
fn hello_listing() {
    let program = assemble(
        &[
            Symbol::new("dst", 0xc000),
            Symbol::new("src", 0x0100),
            Symbol::new("len", 5),
        ],
        HELLO,
    );
    assert_eq!(program.len(), 8);
    let listing = program.to_string();
    assert!(listing.starts_with("0000: ld hl, $0100\n"));
    assert!(listing.ends_with("0007: jr nz, -5\n"));
}

#[test]
fn hello_without_symbols() {
    let error =
        assemble_source(&SymbolTable::default(), HELLO).unwrap_err();
    assert_eq!(error.line, 5);
    assert_eq!(&HELLO[error.span.byte_range()], "src");
}

#[test]
fn negate_all_bytes() {
    let program = assemble(&[], NEGATE);
    let mut machine = Machine::new();
    for value in -128i16..=127 {
        machine.regs_mut().set_a(value as u8);
        machine.run(&program).unwrap();
        assert_eq!(machine.regs().a(), (-value) as u8);
        assert_eq!(machine.cycles(), 2);
    }
}

#[test]
fn extend_all_bytes() {
    let program = assemble(&[], EXTEND);
    let mut machine = Machine::new();
    for value in -128i16..=127 {
        machine.regs_mut().set_a(value as u8);
        machine.run(&program).unwrap();
        assert_eq!(machine.regs().get_r16(Reg16::Hl), value as u16);
        assert_eq!(machine.cycles(), 4);
    }
}

#[test]
fn status_dump_after_run() {
    let program = assemble(&[], "ld a, $05\nld hl, $1234\nscf\n");
    let mut machine = Machine::new();
    machine.run(&program).unwrap();
    let dump = machine.regs().to_string();
    assert!(dump.starts_with("A: 05  F: 10  (AF: 0510)\n"));
    assert!(dump.contains("H: 12  L: 34  (HL: 1234)\n"));
    assert!(dump.ends_with("PC: 0000  SP: 0000\nF: [---C]\n"));
}

#[test]
fn forward_label_skips_instruction() {
    let program = assemble(
        &[],
        "  ld b, 1\n  dec b\n  inc b\n  jr nz, :+\n  ld c, $ff\n:\n  \
         ld d, c\n",
    );
    let mut machine = Machine::new();
    machine.run(&program).unwrap();
    assert_eq!(machine.regs().get_r8(Reg8::C), 0);
    assert_eq!(machine.regs().get_r8(Reg8::D), 0);
    // ld (2) + dec (1) + inc (1) + taken jr (3) + ld (1).
    assert_eq!(machine.cycles(), 8);

    let mut machine = Machine::new();
    machine.regs_mut().set_r8(Reg8::B, 0xff);
    let program = assemble(
        &[],
        "  inc b\n  jr nz, :+\n  ld c, $ff\n:\n  ld d, c\n",
    );
    machine.run(&program).unwrap();
    assert_eq!(machine.regs().get_r8(Reg8::C), 0xff);
    assert_eq!(machine.regs().get_r8(Reg8::D), 0xff);
    // inc (1) + untaken jr (2) + ld (2) + ld (1).
    assert_eq!(machine.cycles(), 6);
}

#[test]
fn stubbed_operations_fail_at_run_time() {
    let program = assemble(&[], "nop\ncall $1000\n");
    let mut machine = Machine::new();
    let error = machine.run(&program).unwrap_err();
    assert!(matches!(error, SimError::Unimplemented { index: 1, .. }));
    assert_eq!(machine.cycles(), 1);
}

#[test]
fn high_page_loads() {
    let program = assemble(
        &[],
        "ld a, $42\nldh [$ff80], a\nld a, 0\nldh a, $ff80\nld c, $81\n\
         ldh [c], a\n",
    );
    let mut machine = Machine::new();
    machine.run(&program).unwrap();
    assert_eq!(machine.regs().a(), 0x42);
    assert_eq!(machine.mem().read_byte(0xff81), 0x42);

    let program = assemble(&[], "ldh a, [$1234]\n");
    assert_eq!(
        Machine::new().run(&program),
        Err(SimError::HighPageOutOfRange { addr: 0x1234, index: 0 })
    );
}

#[test]
fn stack_round_trip() {
    let program = assemble(
        &[],
        "ld sp, $fffe\nld bc, $beef\npush bc\nld bc, 0\npop de\n",
    );
    let mut machine = Machine::new();
    machine.run(&program).unwrap();
    assert_eq!(machine.regs().get_r16(Reg16::De), 0xbeef);
    assert_eq!(machine.regs().sp(), 0xfffe);
    assert_eq!(machine.mem().read_byte(0xfffd), 0xbe);
    assert_eq!(machine.mem().read_byte(0xfffc), 0xef);
}

//===========================================================================//
