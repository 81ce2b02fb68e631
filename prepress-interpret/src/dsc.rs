//! Harvesting of Document Structuring Conventions comments.

use log::{debug, warn};

use crate::page::DocMeta;
use crate::transform::BoundingBox;

/// Apply one `%%` comment (the text after the marker) to the document
/// metadata. Recognized keywords are `Title:`, `Creator:` and
/// `BoundingBox:`; `PageSize:` is noted but currently informational.
pub(crate) fn apply(text: &[u8], meta: &mut DocMeta, bbox: &mut BoundingBox) {
    meta.dsc_compliant = true;

    if let Some(rest) = text.strip_prefix(b"Title:") {
        meta.title = Some(trimmed_string(rest));
    } else if let Some(rest) = text.strip_prefix(b"Creator:") {
        meta.creator = Some(trimmed_string(rest));
    } else if let Some(rest) = text.strip_prefix(b"BoundingBox:") {
        match parse_bounding_box(rest) {
            Some(parsed) => *bbox = parsed,
            None => warn!("ignoring malformed %%BoundingBox: comment"),
        }
    } else if text.starts_with(b"PageSize:") {
        debug!("%%PageSize comment noted: {}", trimmed_string(text));
    }
}

/// Parse the four numbers of a `%%BoundingBox:` comment. `(atend)`
/// placeholders are not resolvable in a single pass and read as absent.
fn parse_bounding_box(rest: &[u8]) -> Option<BoundingBox> {
    let text = std::str::from_utf8(rest).ok()?;

    let mut numbers = text.split_whitespace().map(|w| w.parse::<f64>());
    let x1 = numbers.next()?.ok()?;
    let y1 = numbers.next()?.ok()?;
    let x2 = numbers.next()?.ok()?;
    let y2 = numbers.next()?.ok()?;

    Some(BoundingBox {
        x1,
        y1,
        x2,
        y2,
        valid: true,
    })
}

fn trimmed_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> (DocMeta, BoundingBox) {
        (DocMeta::default(), BoundingBox::default())
    }

    #[test]
    fn title_and_creator() {
        let (mut meta, mut bbox) = fresh();
        apply(b"Title: A drawing ", &mut meta, &mut bbox);
        apply(b"Creator: some-tool 1.2", &mut meta, &mut bbox);

        assert_eq!(meta.title.as_deref(), Some("A drawing"));
        assert_eq!(meta.creator.as_deref(), Some("some-tool 1.2"));
        assert!(meta.dsc_compliant);
    }

    #[test]
    fn bounding_box() {
        let (mut meta, mut bbox) = fresh();
        apply(b"BoundingBox: 0 0 612 792", &mut meta, &mut bbox);

        assert!(bbox.valid);
        assert_eq!((bbox.x1, bbox.y1, bbox.x2, bbox.y2), (0.0, 0.0, 612.0, 792.0));
    }

    #[test]
    fn bounding_box_tolerates_extra_whitespace_and_reals() {
        let (mut meta, mut bbox) = fresh();
        apply(b"BoundingBox:   10.5  20   100.25 200", &mut meta, &mut bbox);

        assert!(bbox.valid);
        assert_eq!(bbox.x1, 10.5);
        assert_eq!(bbox.x2, 100.25);
    }

    #[test]
    fn malformed_bounding_box_is_ignored() {
        let (mut meta, mut bbox) = fresh();
        apply(b"BoundingBox: (atend)", &mut meta, &mut bbox);
        assert!(!bbox.valid);

        apply(b"BoundingBox: 0 0 612", &mut meta, &mut bbox);
        assert!(!bbox.valid);
    }

    #[test]
    fn unrelated_comment_only_marks_compliance() {
        let (mut meta, mut bbox) = fresh();
        apply(b"Pages: 3", &mut meta, &mut bbox);

        assert!(meta.dsc_compliant);
        assert!(meta.title.is_none());
        assert!(!bbox.valid);
    }
}
