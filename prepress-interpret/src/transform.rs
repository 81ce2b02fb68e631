//! Mapping from PostScript coordinates to PDF user space.

/// The source bounding box, from `%%BoundingBox:` or the A4 default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// `true` when the box came from a `%%BoundingBox:` comment.
    pub valid: bool,
}

impl Default for BoundingBox {
    fn default() -> Self {
        // An A4-sized box, used when the input carries no bounding box.
        Self {
            x1: 0.0,
            y1: 0.0,
            x2: 595.276,
            y2: 841.890,
            valid: false,
        }
    }
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

/// A uniform scale-and-center mapping of the source bounding box onto the
/// target paper, derived once per document after the DSC prelude.
///
/// The Y axis is flipped relative to the PostScript origin
/// (`yp = H - (ys*scale + oy)`), reproducing the behavior of the reference
/// converter. Dropping the flip, should it turn out to be unintended,
/// only changes [`map`](Self::map).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub pdf_page_height: f64,
}

impl CoordinateTransform {
    /// Derive the transform fitting `bbox` onto paper of `paper_w` ×
    /// `paper_h` points, preserving aspect ratio and centering.
    ///
    /// A degenerate (zero-area) box falls back to the identity mapping.
    pub fn new(bbox: &BoundingBox, paper_w: f64, paper_h: f64) -> Self {
        let ps_w = bbox.width();
        let ps_h = bbox.height();

        if ps_w <= 0.0 || ps_h <= 0.0 {
            return Self {
                scale: 1.0,
                offset_x: 0.0,
                offset_y: 0.0,
                pdf_page_height: ps_h,
            };
        }

        let scale = (paper_w / ps_w).min(paper_h / ps_h);

        let scaled_w = ps_w * scale;
        let scaled_h = ps_h * scale;
        let offset_x = (paper_w - scaled_w) / 2.0 - bbox.x1 * scale;
        let offset_y = (paper_h - scaled_h) / 2.0 - bbox.y1 * scale;

        Self {
            scale,
            offset_x,
            offset_y,
            pdf_page_height: paper_h,
        }
    }

    /// Map a PostScript point to PDF user space.
    pub fn map(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.scale + self.offset_x,
            self.pdf_page_height - (y * self.scale + self.offset_y),
        )
    }
}
