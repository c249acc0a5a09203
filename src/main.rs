use clap::{Parser, Subcommand};
use gbsim::asm::{
    SourceError, Symbol, SymbolError, SymbolTable, assemble_source,
    load_source,
};
use gbsim::isa::Program;
use gbsim::proc::{Machine, SimError};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

//===========================================================================//

#[derive(Parser)]
#[clap(author, about, long_about = None, version)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assembles and runs a program, then prints the machine state.
    Run {
        /// The assembly source file to run.
        file: PathBuf,
        /// Defines a symbol that the source can refer to.
        #[clap(
            short = 'D',
            value_name = "NAME=VALUE",
            value_parser = parse_define
        )]
        define: Vec<Symbol>,
        /// Copies a file into memory before running.
        #[clap(long, value_name = "ADDR=FILE", value_parser = parse_load)]
        load: Vec<(u16, PathBuf)>,
        /// Stores a byte into memory before running.
        #[clap(long, value_name = "ADDR=BYTE", value_parser = parse_poke)]
        poke: Vec<(u16, u8)>,
        /// Sets a register before running.
        #[clap(long, value_name = "REG=VALUE", value_parser = parse_set)]
        set: Vec<(String, u16)>,
        /// Prints a range of memory after running.
        #[clap(long, value_name = "ADDR:LEN", value_parser = parse_dump)]
        dump: Option<(u16, usize)>,
    },
    /// Assembles a program without running it.
    Check {
        /// The assembly source file to check.
        file: PathBuf,
        /// Defines a symbol that the source can refer to.
        #[clap(
            short = 'D',
            value_name = "NAME=VALUE",
            value_parser = parse_define
        )]
        define: Vec<Symbol>,
        /// Prints the assembled instructions.
        #[clap(long)]
        listing: bool,
    },
}

//===========================================================================//

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Symbol(#[from] SymbolError),
    #[error("{0}")]
    Parse(String),
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error("could not read {}: {error}", .path.display())]
    Load { path: PathBuf, error: io::Error },
    #[error("unknown register `{0}`")]
    UnknownRegister(String),
}

//===========================================================================//

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();
    match run_command(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run_command(command: Command) -> Result<(), CliError> {
    match command {
        Command::Run { file, define, load, poke, set, dump } => {
            let program = assemble_file(&file, &define)?;
            let mut machine = Machine::new();
            for (addr, path) in load {
                let data = std::fs::read(&path)
                    .map_err(|error| CliError::Load { path, error })?;
                machine.mem_mut().load(addr, &data);
            }
            for (addr, byte) in poke {
                machine.mem_mut().write_byte(addr, byte);
            }
            for (name, value) in set {
                if !machine.regs_mut().set_named(&name, value) {
                    return Err(CliError::UnknownRegister(name));
                }
            }
            machine.run(&program)?;
            println!("Cycles: {}", machine.cycles());
            print!("{}", machine.regs());
            if let Some((addr, len)) = dump {
                let data = machine.mem().read_range(addr, len);
                print!("{}", hex_dump(addr, &data));
            }
        }
        Command::Check { file, define, listing } => {
            let program = assemble_file(&file, &define)?;
            if listing {
                print!("{program}");
            } else {
                let count = program.len();
                println!("{}: {count} instructions", file.display());
            }
        }
    }
    Ok(())
}

fn assemble_file(
    path: &Path,
    symbols: &[Symbol],
) -> Result<Program, CliError> {
    let symbols = SymbolTable::new(symbols)?;
    let source = load_source(path)?;
    assemble_source(&symbols, &source)
        .map_err(|error| CliError::Parse(error.render(&source)))
}

fn hex_dump(addr: u16, data: &[u8]) -> String {
    let mut output = String::new();
    for (row, chunk) in data.chunks(16).enumerate() {
        let start = addr.wrapping_add((row * 16) as u16);
        let bytes: Vec<String> =
            chunk.iter().map(|byte| format!("{byte:02x}")).collect();
        output.push_str(&format!("${start:04x}: {}\n", bytes.join(" ")));
    }
    output
}

//===========================================================================//

fn parse_number(text: &str) -> Result<i64, String> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (radix, digits) = if let Some(hex) = digits.strip_prefix('$') {
        (16, hex)
    } else if let Some(hex) = digits.strip_prefix("0x") {
        (16, hex)
    } else if let Some(bin) = digits.strip_prefix('%') {
        (2, bin)
    } else {
        (10, digits)
    };
    let value = i64::from_str_radix(digits, radix)
        .map_err(|_| format!("invalid number `{text}`"))?;
    Ok(if negative { -value } else { value })
}

fn parse_ranged<T: TryFrom<i64>>(text: &str) -> Result<T, String> {
    T::try_from(parse_number(text)?)
        .map_err(|_| format!("number `{text}` is out of range"))
}

fn split_pair(text: &str, separator: char) -> Result<(&str, &str), String> {
    text.split_once(separator)
        .ok_or_else(|| format!("expected `{separator}` in `{text}`"))
}

fn parse_define(text: &str) -> Result<Symbol, String> {
    let (name, value) = split_pair(text, '=')?;
    Ok(Symbol::new(name, parse_ranged::<i32>(value)?))
}

fn parse_load(text: &str) -> Result<(u16, PathBuf), String> {
    let (addr, path) = split_pair(text, '=')?;
    Ok((parse_ranged(addr)?, PathBuf::from(path)))
}

fn parse_poke(text: &str) -> Result<(u16, u8), String> {
    let (addr, byte) = split_pair(text, '=')?;
    let byte = parse_ranged::<i16>(byte)?;
    if !(-128..=255).contains(&byte) {
        return Err(format!("byte `{text}` is out of range"));
    }
    Ok((parse_ranged(addr)?, byte as u8))
}

fn parse_set(text: &str) -> Result<(String, u16), String> {
    let (name, value) = split_pair(text, '=')?;
    let value = parse_ranged::<i32>(value)?;
    if !(-32768..=65535).contains(&value) {
        return Err(format!("value `{text}` is out of range"));
    }
    Ok((name.to_string(), value as u16))
}

fn parse_dump(text: &str) -> Result<(u16, usize), String> {
    let (addr, len) = split_pair(text, ':')?;
    Ok((parse_ranged(addr)?, parse_ranged(len)?))
}

//===========================================================================//


//===========================================================================//
