use alloc::vec::Vec;

use crate::cursor::Cursor;

/// Decode the body of a literal string (the bytes between the outer
/// parentheses) into `out`.
pub(crate) fn decode_into(data: &[u8], out: &mut Vec<u8>) -> Option<()> {
    let mut cur = Cursor::new(data);

    while let Some(byte) = cur.bump() {
        match byte {
            b'\\' => {
                let next = cur.bump()?;

                if is_octal_digit(next) {
                    // Up to two more octal digits may follow.
                    let mut value = u32::from(next - b'0');
                    for _ in 0..2 {
                        match cur.accept_if(is_octal_digit) {
                            Some(d) => value = value * 8 + u32::from(d - b'0'),
                            None => break,
                        }
                    }

                    // High-order overflow is ignored, per the PostScript
                    // language reference.
                    out.push((value & 0xFF) as u8);
                } else {
                    match next {
                        b'n' => out.push(b'\n'),
                        b'r' => out.push(b'\r'),
                        b't' => out.push(b'\t'),
                        b'b' => out.push(0x08),
                        b'f' => out.push(0x0C),
                        b'(' => out.push(b'('),
                        b')' => out.push(b')'),
                        b'\\' => out.push(b'\\'),
                        // Line continuation: the backslash and the newline
                        // are both dropped.
                        b'\r' => {
                            cur.accept(b'\n');
                        }
                        b'\n' => {}
                        // An unknown escape stands for the escaped byte.
                        other => out.push(other),
                    }
                }
            }
            // A bare end-of-line inside a string reads as a single LF.
            b'\r' => {
                cur.accept(b'\n');
                out.push(b'\n');
            }
            other => out.push(other),
        }
    }

    Some(())
}

fn is_octal_digit(byte: u8) -> bool {
    matches!(byte, b'0'..=b'7')
}
