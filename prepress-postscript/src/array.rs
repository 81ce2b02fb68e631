use crate::cursor::{Cursor, is_eol};
use crate::error::{Error, Result};
use crate::string;

/// A PostScript array object.
///
/// Only the raw span between the brackets is captured; the elements are
/// scanned on demand via [`objects`](Self::objects). The interpreter uses
/// this for matrix operands (`concat`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Array<'a> {
    data: &'a [u8],
}

impl<'a> Array<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Return a [`Scanner`](crate::Scanner) over the objects inside this array.
    pub fn objects(&self) -> crate::Scanner<'a> {
        crate::Scanner::new(self.data)
    }
}

pub(crate) fn parse<'a>(cur: &mut Cursor<'a>) -> Result<&'a [u8]> {
    if !cur.accept(b'[') {
        return Err(Error::SyntaxError);
    }
    let body = *cur;

    let mut depth = 1_u32;
    while depth > 0 {
        match cur.first().ok_or(Error::SyntaxError)? {
            b'[' => {
                cur.bump();
                depth += 1;
            }
            b']' => {
                cur.bump();
                depth -= 1;
            }
            // Strings and comments may contain unbalanced brackets.
            b'(' => {
                string::parse_literal(cur)?;
            }
            b'<' => {
                string::parse_hex(cur)?;
            }
            b'%' => {
                cur.take_while(|b| !is_eol(b));
            }
            _ => {
                cur.bump();
            }
        }
    }

    // The closing bracket was consumed with the span.
    let span = cur.since(body);
    Ok(&span[..span.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_array(input: &[u8]) -> Result<&[u8]> {
        let mut cur = Cursor::new(input);
        parse(&mut cur)
    }

    #[test]
    fn empty() {
        assert_eq!(parse_array(b"[]").unwrap(), b"");
    }

    #[test]
    fn simple() {
        assert_eq!(parse_array(b"[1 2 3]").unwrap(), b"1 2 3");
    }

    #[test]
    fn matrix() {
        assert_eq!(
            parse_array(b"[1 0 0 1 72 72] concat").unwrap(),
            b"1 0 0 1 72 72"
        );
    }

    #[test]
    fn nested() {
        assert_eq!(parse_array(b"[1 [2 3] 4]").unwrap(), b"1 [2 3] 4");
    }

    #[test]
    fn bracket_inside_string() {
        assert_eq!(parse_array(b"[1 (str]) 2]").unwrap(), b"1 (str]) 2");
    }

    #[test]
    fn bracket_inside_comment() {
        assert_eq!(
            parse_array(b"[1 % comment with ]\n2]").unwrap(),
            b"1 % comment with ]\n2"
        );
    }

    #[test]
    fn unterminated() {
        assert_eq!(parse_array(b"[1 2"), Err(Error::SyntaxError));
    }
}
