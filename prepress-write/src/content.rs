//! Composition of per-page content streams.

use std::fmt::Write;

use prepress_interpret::{Page, PageItem, PathBatch, PathElement, TextElement};

/// Compose the content stream body for one page.
///
/// The stream is wrapped in `q … Q`, opens with black stroke and fill
/// colors, unit line width and round caps and joins, then replays the
/// page's items in commit order. The body carries no trailing newline;
/// its exact length becomes the stream's `/Length`.
pub fn page_content(page: &Page) -> Vec<u8> {
    let mut out = String::new();

    push_line(&mut out, "q");
    push_line(&mut out, "0 0 0 RG");
    push_line(&mut out, "0 0 0 rg");
    push_line(&mut out, "1 w");
    push_line(&mut out, "1 J");
    push_line(&mut out, "1 j");

    for item in &page.items {
        match item {
            PageItem::Paths(batch) => write_batch(&mut out, batch),
            PageItem::Text(text) => write_text(&mut out, text),
        }
    }

    out.push('Q');
    out.into_bytes()
}

fn write_batch(out: &mut String, batch: &PathBatch) {
    let stroked = batch.elements.last() == Some(&PathElement::PaintStroke);

    // Reflect the state captured at the paint operator.
    let [r, g, b] = batch.color;
    if stroked {
        push_line(
            out,
            &format!("{} {} {} RG", fmt_num(r), fmt_num(g), fmt_num(b)),
        );
        push_line(out, &format!("{} w", fmt_num(batch.line_width)));
    } else {
        push_line(
            out,
            &format!("{} {} {} rg", fmt_num(r), fmt_num(g), fmt_num(b)),
        );
    }

    for element in &batch.elements {
        match *element {
            PathElement::MoveTo { x, y } => {
                push_line(out, &format!("{} {} m", fmt_num(x), fmt_num(y)));
            }
            PathElement::LineTo { x, y } => {
                push_line(out, &format!("{} {} l", fmt_num(x), fmt_num(y)));
            }
            PathElement::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x3,
                y3,
            } => {
                push_line(
                    out,
                    &format!(
                        "{} {} {} {} {} {} c",
                        fmt_num(x1),
                        fmt_num(y1),
                        fmt_num(x2),
                        fmt_num(y2),
                        fmt_num(x3),
                        fmt_num(y3)
                    ),
                );
            }
            PathElement::ClosePath => push_line(out, "h"),
            PathElement::PaintStroke => push_line(out, "S"),
            PathElement::PaintFill => push_line(out, "f"),
        }
    }
}

fn write_text(out: &mut String, text: &TextElement) {
    let [r, g, b] = text.color;

    push_line(out, "BT");
    push_line(out, &format!("/F1 {} Tf", fmt_num(text.font_size)));
    push_line(
        out,
        &format!("{} {} {} rg", fmt_num(r), fmt_num(g), fmt_num(b)),
    );
    push_line(
        out,
        &format!("1 0 0 1 {} {} Tm", fmt_num(text.x), fmt_num(text.y)),
    );
    push_line(out, &format!("({}) Tj", escape_string(&text.text)));
    push_line(out, "ET");
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

/// Format a coordinate or color component with up to six decimal places,
/// trailing zeros trimmed. Six places keep the emitted value within 5e-7
/// of the computed one.
pub(crate) fn fmt_num(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e12 {
        return format!("{}", v as i64);
    }

    let mut s = format!("{v:.6}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Escape a string for a `(…)` literal: backslash, parentheses, and any
/// byte outside the printable ASCII range as three-digit octal.
pub(crate) fn escape_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());

    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            0x20..=0x7E => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{b:03o}");
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with(items: Vec<PageItem>) -> Page {
        Page {
            width_pts: 595.276,
            height_pts: 841.890,
            items,
        }
    }

    fn stroke_batch(elements: Vec<PathElement>) -> PathBatch {
        PathBatch {
            elements,
            color: [0.0, 0.0, 0.0],
            line_width: 1.0,
        }
    }

    #[test]
    fn empty_page_is_just_the_wrapper() {
        let body = page_content(&page_with(vec![]));
        assert_eq!(body, b"q\n0 0 0 RG\n0 0 0 rg\n1 w\n1 J\n1 j\nQ");
    }

    #[test]
    fn stroke_batch_layout() {
        let body = page_content(&page_with(vec![PageItem::Paths(stroke_batch(vec![
            PathElement::MoveTo { x: 10.0, y: 20.0 },
            PathElement::LineTo { x: 30.0, y: 40.0 },
            PathElement::PaintStroke,
        ]))]));
        let text = String::from_utf8(body).unwrap();

        assert!(text.contains("10 20 m\n30 40 l\nS"));
        // One path only, no fills or text.
        assert_eq!(text.matches(" m\n").count(), 1);
        assert!(!text.contains("BT"));
        assert!(!text.contains("\nf\n"));
    }

    #[test]
    fn fill_batch_sets_fill_color() {
        let body = page_content(&page_with(vec![PageItem::Paths(PathBatch {
            elements: vec![
                PathElement::MoveTo { x: 0.0, y: 0.0 },
                PathElement::LineTo { x: 10.0, y: 0.0 },
                PathElement::LineTo { x: 5.0, y: 8.6 },
                PathElement::ClosePath,
                PathElement::PaintFill,
            ],
            color: [1.0, 0.0, 0.0],
            line_width: 1.0,
        })]));
        let text = String::from_utf8(body).unwrap();

        assert!(text.contains("1 0 0 rg"));
        let m = text.find(" m\n").unwrap();
        let h = text.find("\nh\n").unwrap();
        let f = text.find("\nf\n").unwrap();
        assert!(m < h && h < f);
    }

    #[test]
    fn text_block_layout() {
        let body = page_content(&page_with(vec![PageItem::Text(TextElement {
            x: 100.0,
            y: 200.0,
            text: b"Hello".to_vec(),
            font_name: "Helvetica".into(),
            font_size: 12.0,
            color: [0.0, 0.0, 0.0],
        })]));
        let text = String::from_utf8(body).unwrap();

        assert!(text.contains("BT\n/F1 12 Tf\n0 0 0 rg\n1 0 0 1 100 200 Tm\n(Hello) Tj\nET"));
    }

    #[test]
    fn coordinates_keep_six_decimals() {
        assert_eq!(fmt_num(59.527600), "59.5276");
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(-3.5), "-3.5");
        assert_eq!(fmt_num(0.0000004), "0");
        assert_eq!(fmt_num(123.4567894), "123.456789");
    }

    #[test]
    fn escape_round_trip() {
        let input = b"a(b)c\\d\ne\x01".to_vec();
        let escaped = escape_string(&input);
        assert_eq!(escaped, "a\\(b\\)c\\\\d\\012e\\001");

        // Reversing the escape rules restores the original bytes.
        let mut restored = Vec::new();
        let mut chars = escaped.bytes().peekable();
        while let Some(b) = chars.next() {
            if b != b'\\' {
                restored.push(b);
                continue;
            }
            match chars.next().unwrap() {
                b'\\' => restored.push(b'\\'),
                b'(' => restored.push(b'('),
                b')' => restored.push(b')'),
                d @ b'0'..=b'7' => {
                    let mut v = u32::from(d - b'0');
                    for _ in 0..2 {
                        match chars.peek() {
                            Some(&o @ b'0'..=b'7') => {
                                v = v * 8 + u32::from(o - b'0');
                                chars.next();
                            }
                            _ => break,
                        }
                    }
                    restored.push(v as u8);
                }
                other => panic!("unexpected escape {other}"),
            }
        }
        assert_eq!(restored, input);
    }
}
