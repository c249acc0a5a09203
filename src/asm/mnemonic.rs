use std::fmt;

//===========================================================================//

macro_rules! mnemonics {
    ($($variant:ident => $name:literal,)*) => {
        /// An instruction name recognized by the assembler.
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[allow(missing_docs)]
        pub enum Mnemonic {
            $($variant,)*
        }

        impl Mnemonic {
            /// All mnemonics known to the assembler.
            pub const ALL: &'static [Mnemonic] = &[$(Mnemonic::$variant,)*];

            /// Returns the source spelling of this mnemonic.
            pub fn name(self) -> &'static str {
                match self {
                    $(Mnemonic::$variant => $name,)*
                }
            }
        }
    };
}

mnemonics! {
    Adc => "adc",
    Add => "add",
    And => "and",
    Cp => "cp",
    Dec => "dec",
    Inc => "inc",
    Or => "or",
    Sbc => "sbc",
    Sub => "sub",
    Xor => "xor",
    Bit => "bit",
    Res => "res",
    Set => "set",
    Swap => "swap",
    Rl => "rl",
    Rla => "rla",
    Rlc => "rlc",
    Rlca => "rlca",
    Rr => "rr",
    Rra => "rra",
    Rrc => "rrc",
    Rrca => "rrca",
    Sla => "sla",
    Sra => "sra",
    Srl => "srl",
    Ld => "ld",
    Ldh => "ldh",
    Call => "call",
    Jp => "jp",
    Jr => "jr",
    Ret => "ret",
    Reti => "reti",
    Rst => "rst",
    Pop => "pop",
    Push => "push",
    Ccf => "ccf",
    Cpl => "cpl",
    Daa => "daa",
    Di => "di",
    Ei => "ei",
    Halt => "halt",
    Nop => "nop",
    Scf => "scf",
    Stop => "stop",
}

impl Mnemonic {
    /// Looks up a mnemonic by its exact (case-sensitive) source spelling.
    pub fn from_name(name: &str) -> Option<Mnemonic> {
        Mnemonic::ALL.iter().copied().find(|mnemonic| mnemonic.name() == name)
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//===========================================================================//


//===========================================================================//
