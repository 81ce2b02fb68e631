//! Error types for the PostScript scanner.

use core::fmt;

/// A specialized [`Result`] type for scanner operations.
pub type Result<T> = core::result::Result<T, Error>;

/// An error encountered while scanning a PostScript token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A syntax error in the input. The scanner has advanced past the
    /// offending byte, so scanning may continue.
    SyntaxError,
    /// A string extended to the end of the input without its closing
    /// delimiter. This is not recoverable.
    UnterminatedString,
    /// A PostScript type outside the recognized subset was encountered
    /// (dictionaries and procedures). The scanner has advanced past the
    /// opening delimiter, so scanning may continue.
    UnsupportedType,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SyntaxError => f.write_str("syntaxerror"),
            Self::UnterminatedString => f.write_str("unterminated string"),
            Self::UnsupportedType => f.write_str("unsupported type"),
        }
    }
}

impl core::error::Error for Error {}
