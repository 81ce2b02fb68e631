use crate::array::{self, Array};
use crate::cursor::{Cursor, is_eol, is_whitespace};
use crate::error::{Error, Result};
use crate::name::{self, Name};
use crate::number::{self, Number};
use crate::string::{self, String};

/// A single token of a PostScript program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'a> {
    /// A number object.
    Number(Number),
    /// A name object, literal or executable.
    Name(Name<'a>),
    /// A string object.
    String(String<'a>),
    /// An array object.
    Array(Array<'a>),
    /// A `%%…` Document Structuring Conventions comment starting at the
    /// beginning of a line. Carries the text after the `%%` marker, up to
    /// but not including the end of the line.
    DscComment(&'a [u8]),
    /// A `%…` line comment.
    Comment,
}

pub(crate) fn read<'a>(cur: &mut Cursor<'a>) -> Result<Option<Token<'a>>> {
    cur.take_while(is_whitespace);

    let Some(b) = cur.first() else {
        return Ok(None);
    };

    let token = match b {
        b'%' => read_comment(cur),
        b'(' => {
            let data = string::parse_literal(cur)?;
            Token::String(String::from_literal(data))
        }
        b'<' => {
            if cur.second() == Some(b'<') {
                // Dictionaries are outside the recognized subset.
                cur.bump();
                cur.bump();
                return Err(Error::UnsupportedType);
            }

            let data = string::parse_hex(cur)?;
            Token::String(String::from_hex(data))
        }
        b'>' => {
            cur.bump();
            if cur.accept(b'>') {
                return Err(Error::UnsupportedType);
            }

            return Err(Error::SyntaxError);
        }
        b'/' => {
            let data = name::parse_literal(cur).ok_or(Error::SyntaxError)?;
            Token::Name(Name::new(data, true))
        }
        b'[' => Token::Array(Array::new(array::parse(cur)?)),
        b'{' | b'}' => {
            // Procedures are outside the recognized subset.
            cur.bump();
            return Err(Error::UnsupportedType);
        }
        b']' | b')' => {
            cur.bump();
            return Err(Error::SyntaxError);
        }
        b'.' | b'+' | b'-' | b'0'..=b'9' => {
            // A malformed number degrades to an executable name.
            let mark = *cur;
            match number::read(cur) {
                Ok(n) => Token::Number(n),
                Err(_) => {
                    *cur = mark;
                    let data = name::parse_executable(cur).ok_or(Error::SyntaxError)?;
                    Token::Name(Name::new(data, false))
                }
            }
        }
        _ => match name::parse_executable(cur) {
            Some(data) => Token::Name(Name::new(data, false)),
            None => {
                cur.bump();
                return Err(Error::SyntaxError);
            }
        },
    };

    Ok(Some(token))
}

fn read_comment<'a>(cur: &mut Cursor<'a>) -> Token<'a> {
    let at_line_start = cur.prev().is_none_or(is_eol);

    cur.bump();

    if at_line_start && cur.accept(b'%') {
        Token::DscComment(cur.take_while(|b| !is_eol(b)))
    } else {
        cur.take_while(|b| !is_eol(b));

        Token::Comment
    }
}
