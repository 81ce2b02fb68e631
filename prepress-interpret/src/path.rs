use log::warn;

/// A single element of a committed path batch, in PDF user-space
/// coordinates. The paint markers appear only as the final element of a
/// batch, never inside a subpath.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathElement {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    CurveTo { x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64 },
    ClosePath,
    PaintStroke,
    PaintFill,
}

/// The paint operator that commits a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Stroke,
    Fill,
}

/// Accumulates path elements between paint operators.
#[derive(Debug, Default)]
pub struct PathBuilder {
    elements: Vec<PathElement>,
    has_subpath: bool,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.elements.push(PathElement::MoveTo { x, y });
        self.has_subpath = true;
    }

    /// Append a line segment. A `lineto` without a current subpath is
    /// treated as a `moveto`.
    pub fn line_to(&mut self, x: f64, y: f64) {
        if !self.has_subpath {
            warn!("lineto without a current point, treating as moveto");
            self.move_to(x, y);
            return;
        }

        self.elements.push(PathElement::LineTo { x, y });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        if !self.has_subpath {
            warn!("curveto without a current point, starting at first control point");
            self.move_to(x1, y1);
        }

        self.elements.push(PathElement::CurveTo {
            x1,
            y1,
            x2,
            y2,
            x3,
            y3,
        });
    }

    /// Close the current subpath. Closing twice in a row collapses to a
    /// single `ClosePath`.
    pub fn close_path(&mut self) {
        if self.has_subpath && self.elements.last() != Some(&PathElement::ClosePath) {
            self.elements.push(PathElement::ClosePath);
        }
    }

    /// Terminate the accumulated elements with the paint marker and return
    /// the batch, leaving the builder empty.
    pub fn flush(&mut self, paint: Paint) -> Vec<PathElement> {
        let mut batch = std::mem::take(&mut self.elements);
        batch.push(match paint {
            Paint::Stroke => PathElement::PaintStroke,
            Paint::Fill => PathElement::PaintFill,
        });
        self.has_subpath = false;

        batch
    }

    /// Clear the accumulated elements without committing them (`newpath`).
    pub fn discard(&mut self) {
        self.elements.clear();
        self.has_subpath = false;
    }
}
