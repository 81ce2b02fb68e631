/*!
Convert PostScript and EPS documents to PDF.

The conversion pipeline is: scan the input
([`prepress-postscript`](prepress_postscript)), interpret the recognized
operator subset into a page model of path batches and text placements
([`prepress-interpret`](prepress_interpret)), then assemble and serialize
the PDF object graph ([`prepress-write`](prepress_write)). This crate
composes the pipeline behind the [`Processor`] façade and defines the
option and error surfaces.

```no_run
use prepress::{ProcessingOptions, Processor};

let options = ProcessingOptions {
    input_files: vec!["drawing.ps".into()],
    output_file: Some("drawing.pdf".into()),
    ..Default::default()
};

let summary = Processor::new(options)?.process()?;
println!("{} pages written", summary.pages);
# Ok::<(), prepress::Error>(())
```

Diagnostics are reported through the [`log`] facade; the library never
installs a logger.

## Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]

mod device;
mod error;
mod options;
mod processor;

pub use device::OutputDevice;
pub use error::Error;
pub use options::{CompatibilityLevel, PaperSize, ProcessingOptions, Quality};
pub use processor::{CancelFlag, DocumentInfo, ProgressFn, Processor, Summary};

pub use prepress_interpret::{
    BoundingBox, CoordinateTransform, Page, PageItem, ParsedDocument, PathBatch, PathElement,
    TextElement, interpret,
};
pub use prepress_write::{PdfObject, PdfVersion, build_document, write_document};
