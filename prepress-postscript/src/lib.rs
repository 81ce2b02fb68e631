/*!
A lightweight PostScript scanner.

This crate tokenizes PostScript programs into typed [`Token`]s: numbers,
names, strings, arrays and comments. Document Structuring Conventions
comments (`%%…` at the start of a line) are surfaced as their own token
kind so that a consumer can harvest structural metadata such as
`%%BoundingBox`.

Only the subset of the language needed to capture page geometry is
implemented. Dictionaries and procedures are reported as
[`Error::UnsupportedType`]; the scanner skips their delimiters so that
scanning can continue. Malformed numbers degrade to executable names.

The scanner tracks the 1-based line number of the token it most recently
produced, for use in diagnostics.

## Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![no_std]
#![forbid(unsafe_code)]
#![allow(missing_docs)]

extern crate alloc;

mod array;
mod cursor;
mod error;
mod name;
mod number;
mod string;
mod token;

pub use array::Array;
pub use error::{Error, Result};
pub use name::Name;
pub use number::Number;
pub use string::String;
pub use token::Token;

use cursor::Cursor;

/// A scanner producing [`Token`]s from the bytes of a PostScript program.
pub struct Scanner<'a> {
    cursor: Cursor<'a>,
    line: u32,
    counted_to: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner over the given bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
            line: 1,
            counted_to: 0,
        }
    }

    /// Produce the next token, or `Ok(None)` at the end of the input.
    ///
    /// On [`Error::SyntaxError`] and [`Error::UnsupportedType`] the scanner
    /// has advanced past the offending bytes, so the caller may keep
    /// scanning. [`Error::UnterminatedString`] is terminal.
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>> {
        self.cursor.take_while(cursor::is_whitespace);
        self.advance_line();

        token::read(&mut self.cursor)
    }

    /// The 1-based line number at which the most recently returned token
    /// (or error) begins.
    pub fn line(&self) -> u32 {
        self.line
    }

    fn advance_line(&mut self) {
        let data = self.cursor.bytes;
        let upto = self.cursor.pos();

        let mut i = self.counted_to;
        while i < upto {
            match data[i] {
                b'\n' => self.line += 1,
                b'\r' => {
                    self.line += 1;
                    // A CR-LF pair counts as a single line break.
                    if data.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                }
                _ => {}
            }
            i += 1;
        }

        self.counted_to = upto;
    }
}
