mod ascii_hex;
mod literal;

use alloc::vec::Vec;

use crate::cursor::Cursor;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringInner<'a> {
    Literal(&'a [u8]),
    Hex(&'a [u8]),
}

/// A PostScript string object, either a literal `(…)` string or a hex
/// `<…>` string. The content is decoded on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct String<'a> {
    inner: StringInner<'a>,
}

impl<'a> String<'a> {
    pub(crate) const fn from_literal(data: &'a [u8]) -> Self {
        Self {
            inner: StringInner::Literal(data),
        }
    }

    pub(crate) const fn from_hex(data: &'a [u8]) -> Self {
        Self {
            inner: StringInner::Hex(data),
        }
    }

    /// Decode the string content into `out`, replacing any previous contents.
    pub fn decode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        out.clear();
        match self.inner {
            StringInner::Literal(data) => literal::decode_into(data, out),
            StringInner::Hex(data) => ascii_hex::decode_into(data, out),
        }
        .ok_or(Error::SyntaxError)
    }

    /// Decode the string content.
    pub fn decode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.decode_into(&mut out)?;
        Ok(out)
    }
}

/// Consume a literal string, returning the span between the outer parentheses.
pub(crate) fn parse_literal<'a>(cur: &mut Cursor<'a>) -> Result<&'a [u8]> {
    if !cur.accept(b'(') {
        return Err(Error::SyntaxError);
    }
    let body = *cur;

    let mut depth = 1_u32;
    while depth > 0 {
        match cur.bump().ok_or(Error::UnterminatedString)? {
            b'\\' => {
                cur.bump().ok_or(Error::UnterminatedString)?;
            }
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ => {}
        }
    }

    // The closing parenthesis was consumed with the span.
    let span = cur.since(body);
    Ok(&span[..span.len() - 1])
}

/// Consume a hex string, returning the span between the angle brackets.
pub(crate) fn parse_hex<'a>(cur: &mut Cursor<'a>) -> Result<&'a [u8]> {
    if !cur.accept(b'<') {
        return Err(Error::SyntaxError);
    }
    let body = *cur;

    while let Some(b) = cur.bump() {
        if b == b'>' {
            let span = cur.since(body);
            return Ok(&span[..span.len() - 1]);
        }
    }

    Err(Error::UnterminatedString)
}
