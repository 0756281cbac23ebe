//! Error related data structures.

use std::fmt::{self, Display, Formatter};

/// Top level enum for error handling within the emulator.
///
/// Every fallible operation of the crate surfaces one of these
/// variants, all of them at machine construction time. Once a
/// machine exists, emulation itself is infallible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    RomSize,
    RomType(u8),
    RamSize,
    CustomError(String),
}

impl Error {
    pub fn description(&self) -> String {
        match self {
            Error::RomSize => String::from("Invalid ROM size"),
            Error::RomType(rom_type) => format!("Unsupported ROM type 0x{:02x}", rom_type),
            Error::RamSize => String::from("Cartridge declares more RAM than supported"),
            Error::CustomError(message) => String::from(message),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
