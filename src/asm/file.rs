use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;

//===========================================================================//

/// The size, in bytes, at or above which a source file is rejected.
pub const MAX_SOURCE_LEN: usize = 0x10000;

/// An error encountered while loading a source file.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be opened or read.
    #[error("could not read source file: {0}")]
    Io(#[from] io::Error),
    /// The file is too large to assemble.
    #[error(
        "source file must be smaller than {max} bytes",
        max = MAX_SOURCE_LEN
    )]
    TooLarge,
    /// The file is not valid UTF-8 text.
    #[error("source file is not valid UTF-8")]
    NotUtf8,
}

//===========================================================================//

/// Reads a whole source file into memory.
pub fn load_source(path: &Path) -> Result<String, SourceError> {
    let file = File::open(path)?;
    read_source(io::BufReader::new(file))
}

/// Reads source text from an arbitrary reader, enforcing the same size
/// limit as [`load_source`].
pub fn read_source<R: Read>(reader: R) -> Result<String, SourceError> {
    let mut bytes = Vec::new();
    reader.take(MAX_SOURCE_LEN as u64).read_to_end(&mut bytes)?;
    if bytes.len() >= MAX_SOURCE_LEN {
        return Err(SourceError::TooLarge);
    }
    String::from_utf8(bytes).map_err(|_| SourceError::NotUtf8)
}

//===========================================================================//


//===========================================================================//
