use alloc::string::String;

use crate::cursor::{Cursor, is_regular};

/// A PostScript name object.
///
/// Literal names (`/foo`) are surfaced with the leading slash stripped and
/// [`is_literal`](Self::is_literal) set; executable names (`foo`) are the
/// candidates for operator dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Name<'a> {
    data: &'a [u8],
    literal: bool,
}

impl<'a> Name<'a> {
    pub(crate) fn new(data: &'a [u8], literal: bool) -> Self {
        Self { data, literal }
    }

    /// Returns `true` if this is a literal name.
    pub fn is_literal(&self) -> bool {
        self.literal
    }

    /// The raw bytes of the name, without the leading slash.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the name as a string if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&'a str> {
        core::str::from_utf8(self.data).ok()
    }

    /// The name as an owned string, with non-UTF-8 bytes replaced.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.data).into_owned()
    }
}

pub(crate) fn parse_literal<'a>(cur: &mut Cursor<'a>) -> Option<&'a [u8]> {
    if !cur.accept(b'/') {
        return None;
    }

    Some(cur.take_while(is_regular))
}

pub(crate) fn parse_executable<'a>(cur: &mut Cursor<'a>) -> Option<&'a [u8]> {
    let span = cur.take_while(is_regular);
    if span.is_empty() { None } else { Some(span) }
}
