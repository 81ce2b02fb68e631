//! The recognized processing options.

use std::path::PathBuf;
use std::str::FromStr;

use prepress_write::PdfVersion;

use crate::error::Error;

/// A target paper size. Dimensions are in points (1/72 inch).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
    Legal,
    A3,
    A5,
    Executive,
    /// Dimensions taken from `custom_width_points`/`custom_height_points`.
    Custom,
}

impl PaperSize {
    /// The page dimensions in points, or `None` for [`PaperSize::Custom`].
    pub fn dimensions(self) -> Option<(f64, f64)> {
        match self {
            Self::A4 => Some((595.276, 841.890)),
            Self::Letter => Some((612.0, 792.0)),
            Self::Legal => Some((612.0, 1008.0)),
            Self::A3 => Some((841.890, 1190.551)),
            Self::A5 => Some((419.528, 595.276)),
            Self::Executive => Some((522.0, 756.0)),
            Self::Custom => None,
        }
    }
}

impl FromStr for PaperSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            "a3" => Ok(Self::A3),
            "a5" => Ok(Self::A5),
            "executive" => Ok(Self::Executive),
            "custom" => Ok(Self::Custom),
            other => Err(Error::InvalidArgument(format!(
                "unknown paper size `{other}`"
            ))),
        }
    }
}

/// A distiller quality preset. Informational in the base emitter; it
/// influences no output bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Quality {
    Screen,
    #[default]
    Default,
    Ebook,
    Printer,
    Prepress,
}

impl FromStr for Quality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        // Ghostscript spells these `/screen`, `/ebook`, …
        match s.trim_start_matches('/').to_ascii_lowercase().as_str() {
            "screen" => Ok(Self::Screen),
            "default" => Ok(Self::Default),
            "ebook" => Ok(Self::Ebook),
            "printer" => Ok(Self::Printer),
            "prepress" => Ok(Self::Prepress),
            other => Err(Error::InvalidArgument(format!(
                "unknown quality preset `{other}`"
            ))),
        }
    }
}

/// The PDF compatibility level stamped into the output header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompatibilityLevel {
    Pdf14,
    Pdf15,
    Pdf16,
    #[default]
    Pdf17,
}

impl CompatibilityLevel {
    /// The minor version digit.
    pub fn minor(self) -> u8 {
        PdfVersion::from(self).minor()
    }
}

impl From<CompatibilityLevel> for PdfVersion {
    fn from(level: CompatibilityLevel) -> Self {
        match level {
            CompatibilityLevel::Pdf14 => Self::Pdf14,
            CompatibilityLevel::Pdf15 => Self::Pdf15,
            CompatibilityLevel::Pdf16 => Self::Pdf16,
            CompatibilityLevel::Pdf17 => Self::Pdf17,
        }
    }
}

impl FromStr for CompatibilityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "1.4" => Ok(Self::Pdf14),
            "1.5" => Ok(Self::Pdf15),
            "1.6" => Ok(Self::Pdf16),
            "1.7" => Ok(Self::Pdf17),
            other => Err(Error::InvalidArgument(format!(
                "unsupported compatibility level `{other}`"
            ))),
        }
    }
}

/// Everything a [`Processor`](crate::Processor) needs to run.
#[derive(Debug, Clone)]
pub struct ProcessingOptions {
    /// Input PS/EPS paths, processed in order.
    pub input_files: Vec<PathBuf>,
    /// Destination PDF path.
    pub output_file: Option<PathBuf>,
    /// The output device; must resolve to `pdfwrite` for PDF output.
    pub device_name: String,
    pub paper_size: PaperSize,
    /// Used when `paper_size` is [`PaperSize::Custom`].
    pub custom_width_points: f64,
    pub custom_height_points: f64,
    pub compatibility_level: CompatibilityLevel,
    pub quality: Quality,
    /// Suppress progress callbacks.
    pub quiet: bool,
    /// Accepted for command-line compatibility; no effect.
    pub batch_mode: bool,
    /// Accepted for command-line compatibility; no effect.
    pub no_pause: bool,
    /// Abort the write when the output would exceed this many bytes.
    pub max_output_bytes: Option<u64>,
    /// Overrides the `%%Title:` harvested from the input.
    pub title: Option<String>,
    /// Overrides the `%%Creator:` harvested from the input.
    pub creator: Option<String>,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            input_files: Vec::new(),
            output_file: None,
            device_name: "pdfwrite".into(),
            paper_size: PaperSize::default(),
            custom_width_points: 0.0,
            custom_height_points: 0.0,
            compatibility_level: CompatibilityLevel::default(),
            quality: Quality::default(),
            quiet: false,
            batch_mode: false,
            no_pause: false,
            max_output_bytes: None,
            title: None,
            creator: None,
        }
    }
}

impl ProcessingOptions {
    /// Resolve the target paper dimensions in points.
    pub fn paper_dimensions(&self) -> Result<(f64, f64), Error> {
        match self.paper_size.dimensions() {
            Some(dims) => Ok(dims),
            None => {
                if self.custom_width_points > 0.0 && self.custom_height_points > 0.0 {
                    Ok((self.custom_width_points, self.custom_height_points))
                } else {
                    Err(Error::InvalidArgument(
                        "custom paper size requires positive width and height".into(),
                    ))
                }
            }
        }
    }
}
