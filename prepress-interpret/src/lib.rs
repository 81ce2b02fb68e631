/*!
Interpretation of PostScript programs into a page model.

This crate drives the [`prepress-postscript`](prepress_postscript) scanner
through a small stack machine: non-operator tokens are pushed onto an
operand stack, recognized operators mutate the graphics state, build up
paths, place text and delimit pages. The captured [`ParsedDocument`] holds,
per page, the committed path batches and text placements in PDF user-space
coordinates, ready for serialization.

Only the operator subset needed for page geometry is recognized; everything
else is logged through the [`log`] facade and skipped, which is the
tolerance real-world PostScript requires.

## Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]

mod dsc;
mod error;
mod interpret;
mod page;
mod path;
mod state;
mod transform;

pub use error::InterpretError;
pub use interpret::interpret;
pub use page::{DocMeta, Page, PageItem, ParsedDocument, PathBatch, TextElement};
pub use path::{Paint, PathBuilder, PathElement};
pub use state::{GraphicsState, MAX_STATE_DEPTH, StateStack};
pub use transform::{BoundingBox, CoordinateTransform};
