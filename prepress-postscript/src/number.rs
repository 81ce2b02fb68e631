use crate::cursor::{Cursor, is_delimiter, is_whitespace};
use crate::error::{Error, Result};

/// A PostScript number object (integer or real).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

impl Number {
    /// Return the value as an `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(v) => v as f64,
            Self::Real(v) => v,
        }
    }

    /// Return the value as an `i64`. Reals are truncated.
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Integer(v) => v,
            Self::Real(v) => v as i64,
        }
    }
}

/// True when a number token may end at the cursor: end of input,
/// whitespace or a delimiter.
fn at_token_boundary(cur: &Cursor<'_>) -> bool {
    cur.first().is_none_or(|b| is_whitespace(b) || is_delimiter(b))
}

pub(crate) fn read(cur: &mut Cursor<'_>) -> Result<Number> {
    let start = *cur;

    let signed = matches!(cur.first(), Some(b'+' | b'-'));
    if signed {
        cur.bump();
    }

    let whole = cur.take_while(|b| b.is_ascii_digit());

    // A `base#digits` radix number; the form takes no sign.
    if !signed && !whole.is_empty() && cur.accept(b'#') {
        return read_radix(cur, whole);
    }

    let mut real = false;

    if cur.accept(b'.') {
        real = true;
        cur.take_while(|b| b.is_ascii_digit());
    }

    if (!whole.is_empty() || real) && matches!(cur.first(), Some(b'e' | b'E')) {
        real = true;
        cur.bump();
        if matches!(cur.first(), Some(b'+' | b'-')) {
            cur.bump();
        }
        cur.take_while(|b| b.is_ascii_digit());
    }

    if !at_token_boundary(cur) {
        return Err(Error::SyntaxError);
    }

    let text = core::str::from_utf8(cur.since(start)).map_err(|_| Error::SyntaxError)?;

    if real {
        text.parse::<f64>()
            .map(Number::Real)
            .map_err(|_| Error::SyntaxError)
    } else if whole.is_empty() {
        Err(Error::SyntaxError)
    } else {
        text.parse::<i64>()
            .map(Number::Integer)
            .map_err(|_| Error::SyntaxError)
    }
}

/// Scan the digits of `base#digits`, with the base already consumed.
fn read_radix(cur: &mut Cursor<'_>, base_digits: &[u8]) -> Result<Number> {
    let base = core::str::from_utf8(base_digits)
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|base| (2..=36).contains(base))
        .ok_or(Error::SyntaxError)?;

    let digits = cur.take_while(|b| b.is_ascii_alphanumeric());
    if digits.is_empty() || !at_token_boundary(cur) {
        return Err(Error::SyntaxError);
    }

    let digits = core::str::from_utf8(digits).map_err(|_| Error::SyntaxError)?;
    i64::from_str_radix(digits, base)
        .map(Number::Integer)
        .map_err(|_| Error::SyntaxError)
}
