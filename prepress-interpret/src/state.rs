use kurbo::{Affine, Point};
use log::warn;

/// The maximum nesting depth of `gsave`/`grestore`.
pub const MAX_STATE_DEPTH: usize = 256;

/// The graphics state tracked while interpreting a program.
///
/// The current point is kept in PostScript coordinates; the coordinate
/// transform is applied when elements are committed to the page model.
/// The CTM is recorded as seen but never composed into coordinates in
/// this subset.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphicsState {
    pub current_point: Point,
    pub line_width: f64,
    pub color: [f64; 3],
    pub font_name: String,
    pub font_size: f64,
    pub ctm: Affine,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            current_point: Point::ZERO,
            line_width: 1.0,
            color: [0.0, 0.0, 0.0],
            font_name: "Helvetica".into(),
            font_size: 12.0,
            ctm: Affine::IDENTITY,
        }
    }
}

/// The `gsave`/`grestore` stack. The bottom entry is always present.
#[derive(Debug)]
pub struct StateStack {
    states: Vec<GraphicsState>,
}

impl Default for StateStack {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStack {
    pub fn new() -> Self {
        Self {
            states: vec![GraphicsState::default()],
        }
    }

    /// The active graphics state.
    pub fn current(&self) -> &GraphicsState {
        // Guaranteed non-empty by `pop`.
        self.states.last().unwrap()
    }

    /// The active graphics state, mutably.
    pub fn current_mut(&mut self) -> &mut GraphicsState {
        self.states.last_mut().unwrap()
    }

    /// The number of live states, counting the bottom entry.
    pub fn depth(&self) -> usize {
        self.states.len()
    }

    /// Push a copy of the active state (`gsave`). The caller is expected
    /// to enforce [`MAX_STATE_DEPTH`] beforehand.
    pub fn push(&mut self) {
        self.states.push(self.current().clone());
    }

    /// Restore the previously saved state (`grestore`). Popping the bottom
    /// entry is a no-op, matching the tolerance of existing consumers.
    pub fn pop(&mut self) {
        if self.states.len() > 1 {
            self.states.pop();
        } else {
            warn!("grestore without matching gsave");
        }
    }
}
