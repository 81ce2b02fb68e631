//! The low-level PDF file layer: header, body, cross-reference table and
//! trailer, written in one pass over a counting sink.

use std::io::{self, Write};

use crate::PdfVersion;
use crate::document::{CATALOG_ID, PdfObject};

/// A sink wrapper that tracks the number of bytes written, so that object
/// offsets can be recorded as objects are emitted.
struct CountingWriter<W: Write> {
    inner: W,
    written: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    fn position(&self) -> u64 {
        self.written
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Byte counts reported after a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteStats {
    /// Total bytes written, including the trailer.
    pub bytes_written: u64,
    /// The byte offset of the `xref` keyword.
    pub xref_offset: u64,
    /// The number of indirect objects emitted.
    pub object_count: usize,
}

/// Serialize a complete PDF file to `sink`.
///
/// Objects are written in the given order; each object's byte offset is
/// captured at emission time and replayed into the cross-reference table,
/// whose entry lines are exactly 20 bytes each. The sink is flushed
/// before returning.
pub fn write_document<W: Write>(
    sink: W,
    version: PdfVersion,
    objects: &[PdfObject],
) -> io::Result<WriteStats> {
    let mut out = CountingWriter::new(sink);

    // Header line, then a comment with four high-bit bytes marking the
    // file as binary.
    write!(out, "%PDF-1.{}\n", version.minor())?;
    out.write_all(b"%\xE2\xE3\xCF\xD3\n")?;

    let mut offsets = Vec::with_capacity(objects.len());
    for object in objects {
        offsets.push(out.position());

        write!(out, "{} 0 obj\n", object.id)?;
        out.write_all(&object.body)?;
        out.write_all(b"\nendobj\n\n")?;
    }

    let xref_offset = out.position();
    write!(out, "xref\n0 {}\n", objects.len() + 1)?;
    out.write_all(b"0000000000 65535 f \n")?;
    for offset in &offsets {
        // Each entry line is exactly 20 bytes, newline included.
        write!(out, "{offset:010} 00000 n \n")?;
    }

    write!(
        out,
        "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        CATALOG_ID,
        xref_offset
    )?;

    out.flush()?;

    Ok(WriteStats {
        bytes_written: out.position(),
        xref_offset,
        object_count: objects.len(),
    })
}
