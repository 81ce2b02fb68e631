//! The operator dispatch loop driving the scanner.

use kurbo::{Affine, Point};
use log::{debug, warn};
use prepress_postscript::{Error as ScanError, Scanner, Token};
use smallvec::SmallVec;

use crate::dsc;
use crate::error::InterpretError;
use crate::page::{DocMeta, Page, PageItem, ParsedDocument, PathBatch, TextElement};
use crate::path::{Paint, PathBuilder};
use crate::state::{MAX_STATE_DEPTH, StateStack};
use crate::transform::{BoundingBox, CoordinateTransform};

/// Interpret a PostScript program, capturing its pages.
///
/// `paper_width` and `paper_height` are the target page dimensions in
/// points. Recoverable problems are logged and skipped; only the
/// conditions in [`InterpretError`] fail the run.
pub fn interpret(
    data: &[u8],
    paper_width: f64,
    paper_height: f64,
) -> Result<ParsedDocument, InterpretError> {
    Interpreter::new(paper_width, paper_height).run(data)
}

/// An operand on the interpreter stack.
#[derive(Debug, Clone, PartialEq)]
enum Value {
    Number(f64),
    String(Vec<u8>),
    Name(String),
    Matrix(SmallVec<[f64; 6]>),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Name(_) => "name",
            Self::Matrix(_) => "array",
        }
    }
}

/// How an operator bailed out: `Skip` after a logged recovery,
/// `Fatal` to fail the run.
enum OpError {
    Skip,
    Fatal(InterpretError),
}

type OpResult<T = ()> = Result<T, OpError>;

struct Interpreter {
    paper_width: f64,
    paper_height: f64,
    page_width: f64,
    page_height: f64,
    bbox: BoundingBox,
    transform: CoordinateTransform,
    prelude_done: bool,
    states: StateStack,
    path: PathBuilder,
    operands: Vec<Value>,
    pages: Vec<Page>,
    current: Page,
    meta: DocMeta,
    line: u32,
}

impl Interpreter {
    fn new(paper_width: f64, paper_height: f64) -> Self {
        Self {
            paper_width,
            paper_height,
            page_width: paper_width,
            page_height: paper_height,
            bbox: BoundingBox::default(),
            transform: CoordinateTransform::new(
                &BoundingBox::default(),
                paper_width,
                paper_height,
            ),
            prelude_done: false,
            states: StateStack::new(),
            path: PathBuilder::new(),
            operands: Vec::new(),
            pages: Vec::new(),
            current: Page::new(paper_width, paper_height),
            meta: DocMeta::default(),
            line: 1,
        }
    }

    fn run(mut self, data: &[u8]) -> Result<ParsedDocument, InterpretError> {
        let mut scanner = Scanner::new(data);

        loop {
            match scanner.next_token() {
                Ok(Some(token)) => {
                    self.line = scanner.line();
                    self.handle_token(token)?;
                }
                Ok(None) => break,
                Err(ScanError::SyntaxError | ScanError::UnsupportedType) => {
                    warn!("line {}: skipping unrecognized input", scanner.line());
                }
                Err(source) => {
                    return Err(InterpretError::Tokenize {
                        line: scanner.line(),
                        source,
                    });
                }
            }
        }

        Ok(self.finish())
    }

    fn handle_token(&mut self, token: Token<'_>) -> Result<(), InterpretError> {
        match token {
            Token::Comment => {}
            Token::DscComment(text) => {
                if self.prelude_done {
                    self.meta.dsc_compliant = true;
                } else {
                    dsc::apply(text, &mut self.meta, &mut self.bbox);
                }
            }
            Token::Number(n) => self.operands.push(Value::Number(n.as_f64())),
            Token::String(s) => match s.decode() {
                Ok(bytes) => self.operands.push(Value::String(bytes)),
                Err(_) => warn!("line {}: skipping undecodable string", self.line),
            },
            Token::Array(a) => {
                let mut numbers = SmallVec::new();
                let mut inner = a.objects();
                loop {
                    match inner.next_token() {
                        Ok(Some(Token::Number(n))) => numbers.push(n.as_f64()),
                        Ok(Some(Token::Comment | Token::DscComment(_))) => {}
                        Ok(Some(_)) | Err(_) => {
                            warn!("line {}: ignoring non-numeric array element", self.line);
                        }
                        Ok(None) => break,
                    }
                }
                self.operands.push(Value::Matrix(numbers));
            }
            Token::Name(name) => {
                if name.is_literal() {
                    self.operands.push(Value::Name(name.to_string_lossy()));
                } else {
                    match self.execute(&name.to_string_lossy()) {
                        Ok(()) => {}
                        Err(OpError::Skip) => {}
                        Err(OpError::Fatal(e)) => return Err(e),
                    }
                }
            }
        }

        Ok(())
    }

    fn execute(&mut self, operator: &str) -> OpResult {
        if !self.prelude_done {
            self.finalize_prelude();
        }

        match operator {
            "gsave" | "q" => {
                if self.states.depth() >= MAX_STATE_DEPTH {
                    return Err(OpError::Fatal(InterpretError::StackOverflow {
                        line: self.line,
                    }));
                }
                self.states.push();
            }
            "grestore" | "Q" => self.states.pop(),
            "setlinewidth" | "w" => {
                let width = self.pop_number(operator)?;
                self.states.current_mut().line_width = width;
            }
            "setrgbcolor" | "rg" => {
                let b = self.pop_number(operator)?;
                let g = self.pop_number(operator)?;
                let r = self.pop_number(operator)?;
                self.states.current_mut().color = [clamp01(r), clamp01(g), clamp01(b)];
            }
            "setgray" => {
                let g = clamp01(self.pop_number(operator)?);
                self.states.current_mut().color = [g, g, g];
            }
            "moveto" | "m" => {
                let (x, y) = self.pop_point(operator)?;
                self.states.current_mut().current_point = Point::new(x, y);
                let (px, py) = self.transform.map(x, y);
                self.path.move_to(px, py);
            }
            "lineto" | "l" => {
                let (x, y) = self.pop_point(operator)?;
                self.states.current_mut().current_point = Point::new(x, y);
                let (px, py) = self.transform.map(x, y);
                self.path.line_to(px, py);
            }
            "curveto" | "c" => {
                let (x3, y3) = self.pop_point(operator)?;
                let (x2, y2) = self.pop_point(operator)?;
                let (x1, y1) = self.pop_point(operator)?;
                self.states.current_mut().current_point = Point::new(x3, y3);

                let (px1, py1) = self.transform.map(x1, y1);
                let (px2, py2) = self.transform.map(x2, y2);
                let (px3, py3) = self.transform.map(x3, y3);
                self.path.curve_to(px1, py1, px2, py2, px3, py3);
            }
            "closepath" | "h" => self.path.close_path(),
            "newpath" => self.path.discard(),
            "stroke" | "s" | "S" => self.flush_path(Paint::Stroke),
            "fill" | "f" | "F" => self.flush_path(Paint::Fill),
            "findfont" => {
                // Font lookup is collapsed; the name round-trips.
                let name = self.pop_name(operator)?;
                self.operands.push(Value::Name(name));
            }
            "scalefont" => {
                let size = self.pop_number(operator)?;
                let name = self.pop_name(operator)?;
                self.states.current_mut().font_size = size;
                self.operands.push(Value::Name(name));
            }
            "setfont" => {
                let name = self.pop_name(operator)?;
                self.states.current_mut().font_name = name;
            }
            "show" | "Tj" => {
                let text = self.pop_string(operator)?;
                let state = self.states.current();
                let p = state.current_point;
                let (x, y) = self.transform.map(p.x, p.y);

                self.current.items.push(PageItem::Text(TextElement {
                    x,
                    y,
                    text,
                    font_name: state.font_name.clone(),
                    font_size: state.font_size,
                    color: state.color,
                }));
            }
            "translate" => {
                let y = self.pop_number(operator)?;
                let x = self.pop_number(operator)?;
                self.record_ctm(operator, Affine::translate((x, y)));
            }
            "scale" => {
                let y = self.pop_number(operator)?;
                let x = self.pop_number(operator)?;
                self.record_ctm(operator, Affine::scale_non_uniform(x, y));
            }
            "rotate" => {
                let degrees = self.pop_number(operator)?;
                self.record_ctm(operator, Affine::rotate(degrees.to_radians()));
            }
            "concat" => {
                let m = self.pop_matrix(operator)?;
                self.record_ctm(operator, Affine::new(m));
            }
            "showpage" => {
                // The in-progress path does not survive the page boundary.
                self.path.discard();
                let finished = std::mem::replace(
                    &mut self.current,
                    Page::new(self.page_width, self.page_height),
                );
                self.pages.push(finished);
            }
            "setpagedevice" => {
                debug!("line {}: setpagedevice ignored", self.line);
            }
            _ => {
                warn!("line {}: unknown operator `{}`", self.line, operator);
            }
        }

        Ok(())
    }

    fn finalize_prelude(&mut self) {
        self.prelude_done = true;
        self.transform =
            CoordinateTransform::new(&self.bbox, self.paper_width, self.paper_height);

        // A degenerate box maps identically, onto a page of its own extent.
        if self.bbox.width() <= 0.0 || self.bbox.height() <= 0.0 {
            self.page_width = self.bbox.width();
            self.page_height = self.bbox.height();
        }

        self.current.width_pts = self.page_width;
        self.current.height_pts = self.page_height;
    }

    fn flush_path(&mut self, paint: Paint) {
        if self.path.is_empty() {
            return;
        }

        let state = self.states.current();
        let batch = PathBatch {
            elements: self.path.flush(paint),
            color: state.color,
            line_width: state.line_width,
        };
        self.current.items.push(PageItem::Paths(batch));
    }

    fn record_ctm(&mut self, operator: &str, t: Affine) {
        let state = self.states.current_mut();
        state.ctm *= t;
        debug!(
            "line {}: `{}` recorded, ctm now {:?}",
            self.line, operator, state.ctm
        );
    }

    fn finish(mut self) -> ParsedDocument {
        // A trailing page only appears if it received items; the implicit
        // first page appears even when empty.
        if !self.current.items.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }

        ParsedDocument {
            pages: self.pages,
            meta: self.meta,
        }
    }

    fn pop(&mut self, operator: &str) -> OpResult<Value> {
        self.operands.pop().ok_or_else(|| {
            OpError::Fatal(InterpretError::StackUnderflow {
                operator: operator.to_string(),
                line: self.line,
            })
        })
    }

    fn pop_number(&mut self, operator: &str) -> OpResult<f64> {
        match self.pop(operator)? {
            Value::Number(n) => Ok(n),
            other => Err(self.type_mismatch(operator, "number", &other)),
        }
    }

    /// Pop `y` then `x`, matching postfix operand order.
    fn pop_point(&mut self, operator: &str) -> OpResult<(f64, f64)> {
        let y = self.pop_number(operator)?;
        let x = self.pop_number(operator)?;
        Ok((x, y))
    }

    fn pop_name(&mut self, operator: &str) -> OpResult<String> {
        match self.pop(operator)? {
            Value::Name(n) => Ok(n),
            other => Err(self.type_mismatch(operator, "name", &other)),
        }
    }

    fn pop_string(&mut self, operator: &str) -> OpResult<Vec<u8>> {
        match self.pop(operator)? {
            Value::String(s) => Ok(s),
            other => Err(self.type_mismatch(operator, "string", &other)),
        }
    }

    fn pop_matrix(&mut self, operator: &str) -> OpResult<[f64; 6]> {
        match self.pop(operator)? {
            Value::Matrix(m) if m.len() == 6 => Ok([m[0], m[1], m[2], m[3], m[4], m[5]]),
            Value::Matrix(m) => {
                warn!(
                    "line {}: `{}` expected a six-element matrix, found {} elements",
                    self.line,
                    operator,
                    m.len()
                );
                Err(OpError::Skip)
            }
            other => Err(self.type_mismatch(operator, "array", &other)),
        }
    }

    fn type_mismatch(&self, operator: &str, expected: &str, found: &Value) -> OpError {
        warn!(
            "line {}: `{}` expected a {}, found a {}; operator skipped",
            self.line,
            operator,
            expected,
            found.kind()
        );
        OpError::Skip
    }
}

fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}
