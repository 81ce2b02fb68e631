/*!
Assembly and serialization of PDF documents from a captured page model.

The [`document`] module builds the indirect-object graph (catalog, page
tree, page and content-stream pairs, shared font); the [`content`] module
composes each page's content stream from its path batches and text
placements; the [`file`] module writes the whole file in one linear pass,
recording byte offsets as objects are emitted so the cross-reference
table is exact by construction.

Content streams are written uncompressed and their `/Length` entries are
exact byte counts, which keeps the output verifiable down to the byte.

## Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]

pub mod content;
pub mod document;
pub mod file;

pub use content::page_content;
pub use document::{CATALOG_ID, PAGE_TREE_ID, PdfObject, build_document};
pub use file::{WriteStats, write_document};

/// The PDF version stamped into the file header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PdfVersion {
    Pdf14,
    Pdf15,
    Pdf16,
    #[default]
    Pdf17,
}

impl PdfVersion {
    /// The minor version digit of the `%PDF-1.x` header.
    pub fn minor(self) -> u8 {
        match self {
            Self::Pdf14 => 4,
            Self::Pdf15 => 5,
            Self::Pdf16 => 6,
            Self::Pdf17 => 7,
        }
    }
}
