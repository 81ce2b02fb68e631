//! The processor façade: sequence init → parse → generate → write.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::info;
use prepress_interpret::{InterpretError, Page, interpret};
use prepress_write::{build_document, write_document};

use crate::device::OutputDevice;
use crate::error::Error;
use crate::options::ProcessingOptions;

/// A progress callback, called with `(current, total, status)` once per
/// input file begin and end and at serializer start.
pub type ProgressFn = Arc<dyn Fn(usize, usize, &str) + Send + Sync>;

/// A cooperative cancellation flag, checked between input files and
/// before serialization starts.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the associated run.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Metadata describing the produced document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    /// From `%%Title:` or the options override.
    pub title: Option<String>,
    /// From `%%Creator:` or the options override.
    pub creator: Option<String>,
    /// This converter's name and version.
    pub producer: String,
    /// The header version, e.g. `"1.7"`.
    pub pdf_version: String,
}

/// The result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub pages: usize,
    pub objects: usize,
    pub bytes_written: u64,
    pub info: DocumentInfo,
}

/// Converts PostScript inputs into a single PDF document.
pub struct Processor {
    options: ProcessingOptions,
    progress: Option<ProgressFn>,
    cancel: CancelFlag,
}

impl Processor {
    /// Validate the options and build a processor.
    pub fn new(options: ProcessingOptions) -> Result<Self, Error> {
        let device = OutputDevice::from_name(&options.device_name)?;
        if device == OutputDevice::PrinterSpool {
            return Err(Error::InvalidArgument(
                "printer spooling is not supported on this platform".into(),
            ));
        }

        if options.input_files.is_empty() {
            return Err(Error::InvalidArgument("no input files given".into()));
        }
        if options.output_file.is_none() {
            return Err(Error::InvalidArgument("no output file given".into()));
        }
        options.paper_dimensions()?;

        Ok(Self {
            options,
            progress: None,
            cancel: CancelFlag::new(),
        })
    }

    /// Install a progress callback.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// A handle that cancels this processor's next checkpoint.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Run the conversion: interpret every input in order, concatenate
    /// their pages, and serialize the document to the output file.
    ///
    /// On any failure after the output file was created, the partial
    /// output is deleted.
    pub fn process(&self) -> Result<Summary, Error> {
        let (paper_w, paper_h) = self.options.paper_dimensions()?;
        let output_file = self
            .options
            .output_file
            .clone()
            .ok_or_else(|| Error::InvalidArgument("no output file given".into()))?;

        let total = self.options.input_files.len() + 1;

        let mut pages: Vec<Page> = Vec::new();
        let mut title: Option<String> = None;
        let mut creator: Option<String> = None;

        for (index, path) in self.options.input_files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            self.report(index, total, &format!("processing {}", path.display()));

            let data = read_input(path)?;
            let parsed = interpret(&data, paper_w, paper_h).map_err(|e| match e {
                InterpretError::Tokenize { line, source } => Error::Tokenize {
                    path: path.clone(),
                    line,
                    source,
                },
                other => Error::Interpret {
                    path: path.clone(),
                    source: other,
                },
            })?;

            // The first input to carry metadata wins.
            title = title.or(parsed.meta.title);
            creator = creator.or(parsed.meta.creator);
            pages.extend(parsed.pages);

            self.report(index + 1, total, &format!("finished {}", path.display()));
        }

        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        self.report(total - 1, total, "writing output");

        let objects = build_document(&pages);
        let version = self.options.compatibility_level.into();

        let file = File::create(&output_file).map_err(Error::OutputUnwritable)?;
        let sink = BufWriter::new(LimitedWriter::new(file, self.options.max_output_bytes));

        let stats = match write_document(sink, version, &objects) {
            Ok(stats) => stats,
            Err(e) => {
                // Discard the partial output.
                let _ = fs::remove_file(&output_file);
                return Err(Error::OutputUnwritable(e));
            }
        };

        info!(
            "wrote {} ({} pages, {} objects, {} bytes)",
            output_file.display(),
            pages.len(),
            stats.object_count,
            stats.bytes_written
        );

        Ok(Summary {
            pages: pages.len(),
            objects: stats.object_count,
            bytes_written: stats.bytes_written,
            info: DocumentInfo {
                title: self.options.title.clone().or(title),
                creator: self.options.creator.clone().or(creator),
                producer: format!("prepress {}", env!("CARGO_PKG_VERSION")),
                pdf_version: format!("1.{}", self.options.compatibility_level.minor()),
            },
        })
    }

    fn report(&self, current: usize, total: usize, status: &str) {
        if self.options.quiet {
            return;
        }
        if let Some(progress) = &self.progress {
            progress(current, total, status);
        }
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>, Error> {
    match fs::read(path) {
        Ok(data) => Ok(data),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(Error::InputNotFound(PathBuf::from(path)))
        }
        Err(e) => Err(Error::InputUnreadable {
            path: PathBuf::from(path),
            source: e,
        }),
    }
}

/// A sink wrapper enforcing the optional output size limit.
struct LimitedWriter<W: Write> {
    inner: W,
    remaining: Option<u64>,
}

impl<W: Write> LimitedWriter<W> {
    fn new(inner: W, limit: Option<u64>) -> Self {
        Self {
            inner,
            remaining: limit,
        }
    }
}

impl<W: Write> Write for LimitedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(remaining) = self.remaining {
            if (buf.len() as u64) > remaining {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    "output size limit exceeded",
                ));
            }
        }

        let n = self.inner.write(buf)?;
        if let Some(remaining) = &mut self.remaining {
            *remaining -= n as u64;
        }

        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
