//! Construction of the indirect-object graph.

use std::fmt::Write;

use prepress_interpret::Page;

use crate::content::{fmt_num, page_content};

/// An indirect PDF object: its 1-based id and its body bytes. The
/// generation number is always zero; byte offsets are recorded by the
/// serializer while writing, not stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfObject {
    pub id: u32,
    pub body: Vec<u8>,
}

/// The id of the document catalog, always the first object.
pub const CATALOG_ID: u32 = 1;
/// The id of the page-tree root, always the second object.
pub const PAGE_TREE_ID: u32 = 2;

/// Build the object graph for the given pages.
///
/// Objects are created in a fixed order with sequential ids: catalog,
/// page tree, then one page object followed by its content stream per
/// page, and finally the shared Helvetica font object.
pub fn build_document(pages: &[Page]) -> Vec<PdfObject> {
    let page_count = pages.len() as u32;
    let font_id = PAGE_TREE_ID + 1 + page_count * 2;

    let mut objects = Vec::with_capacity(pages.len() * 2 + 3);

    objects.push(PdfObject {
        id: CATALOG_ID,
        body: format!("<< /Type /Catalog /Pages {PAGE_TREE_ID} 0 R >>").into_bytes(),
    });

    let mut kids = String::new();
    for i in 0..page_count {
        if i > 0 {
            kids.push(' ');
        }
        let _ = write!(kids, "{} 0 R", page_object_id(i));
    }
    objects.push(PdfObject {
        id: PAGE_TREE_ID,
        body: format!("<< /Type /Pages /Count {page_count} /Kids [{kids}] >>").into_bytes(),
    });

    for (i, page) in pages.iter().enumerate() {
        let page_id = page_object_id(i as u32);
        let contents_id = page_id + 1;

        objects.push(PdfObject {
            id: page_id,
            body: format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] /Contents {} 0 R \
                 /Resources << /Font << /F1 {} 0 R >> >> >>",
                PAGE_TREE_ID,
                fmt_num(page.width_pts),
                fmt_num(page.height_pts),
                contents_id,
                font_id
            )
            .into_bytes(),
        });

        let stream = page_content(page);
        let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        body.extend_from_slice(&stream);
        body.extend_from_slice(b"\nendstream");

        objects.push(PdfObject {
            id: contents_id,
            body,
        });
    }

    objects.push(PdfObject {
        id: font_id,
        body: b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_vec(),
    });

    objects
}

fn page_object_id(page_index: u32) -> u32 {
    PAGE_TREE_ID + 1 + page_index * 2
}
