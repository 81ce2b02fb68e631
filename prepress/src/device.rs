//! Output device routing.

use crate::error::Error;

/// Where the finished document bytes go. PDF file output is the
/// implemented path; raw spooling to an OS print queue is the alternate
/// sink and is reported unsupported where no spooler backend exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputDevice {
    /// Write a PDF file (`pdfwrite`).
    PdfWrite,
    /// Spool raw bytes to the platform print system (`mswinpr2`).
    PrinterSpool,
}

impl OutputDevice {
    /// Resolve a Ghostscript-style device name.
    pub fn from_name(name: &str) -> Result<Self, Error> {
        match name {
            "pdfwrite" => Ok(Self::PdfWrite),
            "mswinpr2" => Ok(Self::PrinterSpool),
            other => Err(Error::InvalidArgument(format!(
                "unknown device `{other}`"
            ))),
        }
    }
}
