//! End-to-end conversion scenarios and output-layout properties.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use prepress::{
    BoundingBox, CompatibilityLevel, CoordinateTransform, Error, PaperSize, ProcessingOptions,
    Processor,
};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A scratch directory removed on drop.
struct Workspace {
    dir: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!(
            "prepress-test-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&dir).unwrap();
        Self { dir }
    }

    fn file(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

fn convert_with(input: &[u8], tweak: impl FnOnce(&mut ProcessingOptions)) -> Vec<u8> {
    let ws = Workspace::new();
    let output = ws.path("output.pdf");
    let mut options = ProcessingOptions {
        input_files: vec![ws.file("input.ps", input)],
        output_file: Some(output.clone()),
        ..Default::default()
    };
    tweak(&mut options);

    Processor::new(options).unwrap().process().unwrap();
    fs::read(&output).unwrap()
}

fn convert(input: &[u8]) -> Vec<u8> {
    convert_with(input, |_| {})
}

/// View the output as text, byte-for-byte: the only non-ASCII bytes are
/// the four of the binary marker, and mapping each to one ASCII char keeps
/// every byte offset valid for string indexing.
fn as_text(pdf: &[u8]) -> String {
    pdf.iter()
        .map(|&b| if b.is_ascii() { b as char } else { '.' })
        .collect()
}

/// The content-stream bodies, in object order.
fn content_streams(text: &str) -> Vec<&str> {
    text.split(">>\nstream\n")
        .skip(1)
        .map(|rest| rest.split("\nendstream").next().unwrap())
        .collect()
}

fn count_objects(text: &str) -> usize {
    text.matches(" 0 obj\n").count()
}

fn tokens<'a>(stream: &'a str) -> Vec<&'a str> {
    stream.split_whitespace().collect()
}

const S1: &[u8] = b"%!PS-Adobe-3.0\n%%BoundingBox: 0 0 100 100\nshowpage\n";
const S2: &[u8] =
    b"%!PS-Adobe-3.0\n%%BoundingBox: 0 0 100 100\n10 10 moveto 90 90 lineto stroke showpage\n";

#[test]
fn s1_empty_document() {
    let pdf = convert(S1);
    let text = as_text(&pdf);

    assert!(pdf.starts_with(b"%PDF-1.7\n"));
    // Catalog, Pages, Page, Contents, Font.
    assert_eq!(count_objects(&text), 5);
    assert!(text.contains("/Type /Catalog"));
    assert!(text.contains("/Count 1"));
    assert!(text.contains("/BaseFont /Helvetica"));
}

#[test]
fn s2_single_stroked_line() {
    let pdf = convert(S2);
    let text = as_text(&pdf);

    let streams = content_streams(&text);
    assert_eq!(streams.len(), 1);
    let toks = tokens(streams[0]);

    assert_eq!(toks.iter().filter(|t| **t == "m").count(), 1);
    assert_eq!(toks.iter().filter(|t| **t == "l").count(), 1);
    assert!(toks.contains(&"S"));
    assert!(!toks.contains(&"c"));
    assert!(!toks.contains(&"f"));
    assert!(!toks.contains(&"BT"));
    assert!(!toks.contains(&"ET"));
    assert_eq!(toks.first(), Some(&"q"));
    assert_eq!(toks.last(), Some(&"Q"));
}

#[test]
fn s3_two_page_document() {
    let pdf = convert(
        b"%!PS-Adobe-3.0\n%%BoundingBox: 0 0 612 792\n/Helvetica findfont 12 scalefont setfont \
          100 100 moveto (Hello) show showpage 100 100 moveto (World) show showpage\n",
    );
    let text = as_text(&pdf);

    assert!(text.contains("/Count 2"));
    assert!(text.contains("/Kids [3 0 R 5 0 R]"));

    let streams = content_streams(&text);
    assert_eq!(streams.len(), 2);
    for (stream, literal) in streams.iter().zip(["(Hello) Tj", "(World) Tj"]) {
        assert_eq!(stream.matches("BT\n").count(), 1);
        assert_eq!(stream.matches("\nET").count(), 1);
        assert!(stream.contains(literal));
    }
}

#[test]
fn s4_closed_triangle_fill() {
    let pdf = convert(
        b"%!PS-Adobe-3.0\n%%BoundingBox: 0 0 100 100\n0 0 moveto 100 0 lineto 50 86 lineto closepath fill showpage\n",
    );
    let text = as_text(&pdf);

    let streams = content_streams(&text);
    let toks = tokens(streams[0]);
    let painted: Vec<_> = toks
        .iter()
        .filter(|t| matches!(**t, "m" | "l" | "h" | "f" | "S"))
        .copied()
        .collect();

    assert_eq!(painted, vec!["m", "l", "l", "h", "f"]);
    assert_eq!(toks.first(), Some(&"q"));
    assert_eq!(toks.last(), Some(&"Q"));
}

#[test]
fn s5_gsave_grestore_isolation() {
    let pdf = convert(
        b"%%BoundingBox: 0 0 100 100\n0.5 0.5 0.5 setrgbcolor gsave 1 0 0 setrgbcolor \
          0 0 moveto 10 0 lineto stroke grestore 0 0 moveto 20 0 lineto stroke showpage\n",
    );
    let text = as_text(&pdf);

    let stream = content_streams(&text)[0];
    let red = stream.find("1 0 0 RG").expect("red stroke color");
    let gray = stream.find("0.5 0.5 0.5 RG").expect("gray stroke color");
    assert!(red < gray);

    let toks = tokens(stream);
    assert_eq!(toks.iter().filter(|t| **t == "S").count(), 2);
}

#[test]
fn s6_malformed_operator_is_tolerated() {
    let pdf = convert(
        b"%%BoundingBox: 0 0 100 100\n10 10 moveto BOGUS 90 90 lineto stroke showpage\n",
    );
    let text = as_text(&pdf);

    let toks = tokens(content_streams(&text)[0]);
    assert_eq!(toks.iter().filter(|t| **t == "m").count(), 1);
    assert_eq!(toks.iter().filter(|t| **t == "l").count(), 1);
}

#[test]
fn header_tracks_compatibility_level() {
    let pdf = convert_with(S1, |o| o.compatibility_level = CompatibilityLevel::Pdf14);
    assert!(pdf.starts_with(b"%PDF-1.4\n"));
}

#[test]
fn trailer_ends_with_eof() {
    let pdf = convert(S1);
    assert!(pdf.ends_with(b"%%EOF\n"));
}

#[test]
fn xref_is_aligned_and_sized() {
    let pdf = convert(S2);
    let text = as_text(&pdf);

    let idx = text.rfind("startxref\n").unwrap() + "startxref\n".len();
    let xref_offset: usize = text[idx..].lines().next().unwrap().parse().unwrap();
    assert!(text[xref_offset..].starts_with("xref\n"));

    let object_count = count_objects(&text);
    let subsection = format!("xref\n0 {}\n", object_count + 1);
    assert!(text[xref_offset..].starts_with(&subsection));

    let entries_start = xref_offset + subsection.len();
    let entries = &text[entries_start..entries_start + 20 * (object_count + 1)];
    let lines: Vec<_> = entries.split_inclusive('\n').collect();
    assert_eq!(lines.len(), object_count + 1);
    for line in &lines {
        assert_eq!(line.len(), 20, "xref entry must be exactly 20 bytes");
    }

    assert_eq!(lines[0], "0000000000 65535 f \n");
    for (k, line) in lines[1..].iter().enumerate() {
        let offset: usize = line[..10].parse().unwrap();
        assert!(
            text[offset..].starts_with(&format!("{} 0 obj\n", k + 1)),
            "xref entry {} does not point at its object",
            k + 1
        );
    }

    let size = format!("/Size {}", object_count + 1);
    assert!(text.contains(&size));
}

#[test]
fn catalog_and_pages_identity() {
    let pdf = convert(S1);
    let text = as_text(&pdf);

    assert!(text.contains("/Root 1 0 R"));

    let catalog = text.split("1 0 obj\n").nth(1).unwrap();
    assert!(catalog.starts_with("<< /Type /Catalog /Pages 2 0 R >>"));

    let pages = text.split("2 0 obj\n").nth(1).unwrap();
    assert!(pages.starts_with("<< /Type /Pages /Count 1 /Kids [3 0 R] >>"));
}

#[test]
fn content_stream_length_is_exact() {
    let pdf = convert(S2);
    let text = as_text(&pdf);

    for chunk in text.split("/Length ").skip(1) {
        let length: usize = chunk.split_whitespace().next().unwrap().parse().unwrap();
        let start = chunk.find(">>\nstream\n").unwrap() + ">>\nstream\n".len();
        let end = chunk.find("\nendstream").unwrap();
        assert_eq!(length, end - start);
    }
}

#[test]
fn comments_only_input_produces_one_empty_page() {
    let pdf = convert(b"%!PS-Adobe-3.0\n% just a comment\n%%Title: nothing\n");
    let text = as_text(&pdf);

    assert_eq!(count_objects(&text), 5);
    let streams = content_streams(&text);
    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0], "q\n0 0 0 RG\n0 0 0 rg\n1 w\n1 J\n1 j\nQ");
}

#[test]
fn path_coordinates_round_trip() {
    let pdf = convert(S2);
    let text = as_text(&pdf);

    let bbox = BoundingBox {
        x1: 0.0,
        y1: 0.0,
        x2: 100.0,
        y2: 100.0,
        valid: true,
    };
    let (paper_w, paper_h) = PaperSize::A4.dimensions().unwrap();
    let transform = CoordinateTransform::new(&bbox, paper_w, paper_h);

    let stream = content_streams(&text)[0];
    let toks = tokens(stream);

    let m = toks.iter().position(|t| *t == "m").unwrap();
    let l = toks.iter().position(|t| *t == "l").unwrap();

    let (ex_m_x, ex_m_y) = transform.map(10.0, 10.0);
    let (ex_l_x, ex_l_y) = transform.map(90.0, 90.0);

    let parse = |s: &str| s.parse::<f64>().unwrap();
    assert!((parse(toks[m - 2]) - ex_m_x).abs() < 1e-6);
    assert!((parse(toks[m - 1]) - ex_m_y).abs() < 1e-6);
    assert!((parse(toks[l - 2]) - ex_l_x).abs() < 1e-6);
    assert!((parse(toks[l - 1]) - ex_l_y).abs() < 1e-6);
}

#[test]
fn string_escapes_reverse_to_the_original() {
    // The literal decodes to `a(b)c\d`.
    let pdf = convert(
        b"%%BoundingBox: 0 0 100 100\n10 10 moveto (a\\(b\\)c\\\\d) show showpage\n",
    );
    let text = as_text(&pdf);

    let stream = content_streams(&text)[0];
    let operand_start = stream.find("(").unwrap() + 1;
    let operand_end = stream.rfind(") Tj").unwrap();
    let escaped = &stream[operand_start..operand_end];

    let mut restored = Vec::new();
    let mut bytes = escaped.bytes().peekable();
    while let Some(b) = bytes.next() {
        if b != b'\\' {
            restored.push(b);
            continue;
        }
        match bytes.next().unwrap() {
            b'\\' => restored.push(b'\\'),
            b'(' => restored.push(b'('),
            b')' => restored.push(b')'),
            d @ b'0'..=b'7' => {
                let mut v = u32::from(d - b'0');
                while let Some(&o @ b'0'..=b'7') = bytes.peek() {
                    v = v * 8 + u32::from(o - b'0');
                    bytes.next();
                }
                restored.push(v as u8);
            }
            other => panic!("unexpected escape `{}`", other as char),
        }
    }

    assert_eq!(restored, b"a(b)c\\d");
}

#[test]
fn letter_paper_sets_media_box() {
    let pdf = convert_with(S1, |o| o.paper_size = PaperSize::Letter);
    assert!(as_text(&pdf).contains("/MediaBox [0 0 612 792]"));
}

#[test]
fn inputs_are_concatenated_in_order() {
    let ws = Workspace::new();
    let first = ws.file(
        "first.ps",
        b"%%Title: First\n%%BoundingBox: 0 0 100 100\n(one) show showpage\n",
    );
    let second = ws.file(
        "second.ps",
        b"%%Title: Second\n%%BoundingBox: 0 0 100 100\n(two) show showpage\n",
    );
    let output = ws.path("out.pdf");

    let summary = Processor::new(ProcessingOptions {
        input_files: vec![first, second],
        output_file: Some(output.clone()),
        ..Default::default()
    })
    .unwrap()
    .process()
    .unwrap();

    assert_eq!(summary.pages, 2);
    assert_eq!(summary.info.title.as_deref(), Some("First"));
    assert_eq!(summary.info.pdf_version, "1.7");

    let text = as_text(&fs::read(&output).unwrap());
    let streams = content_streams(&text);
    assert!(streams[0].contains("(one) Tj"));
    assert!(streams[1].contains("(two) Tj"));
}

#[test]
fn progress_events_fire_per_file_and_at_serialization() {
    let ws = Workspace::new();
    let input = ws.file("in.ps", S1);
    let output = ws.path("out.pdf");

    let events: Arc<Mutex<Vec<(usize, usize, String)>>> = Arc::default();
    let sink = events.clone();

    Processor::new(ProcessingOptions {
        input_files: vec![input],
        output_file: Some(output),
        ..Default::default()
    })
    .unwrap()
    .with_progress(Arc::new(move |current, total, status| {
        sink.lock().unwrap().push((current, total, status.to_string()));
    }))
    .process()
    .unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].1, 2);
    assert!(events[2].2.contains("writing"));
}

#[test]
fn quiet_suppresses_progress() {
    let ws = Workspace::new();
    let input = ws.file("in.ps", S1);
    let output = ws.path("out.pdf");

    let events: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = events.clone();

    Processor::new(ProcessingOptions {
        input_files: vec![input],
        output_file: Some(output),
        quiet: true,
        ..Default::default()
    })
    .unwrap()
    .with_progress(Arc::new(move |_, _, status| {
        sink.lock().unwrap().push(status.to_string());
    }))
    .process()
    .unwrap();

    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn cancellation_writes_nothing() {
    let ws = Workspace::new();
    let input = ws.file("in.ps", S1);
    let output = ws.path("out.pdf");

    let processor = Processor::new(ProcessingOptions {
        input_files: vec![input],
        output_file: Some(output.clone()),
        ..Default::default()
    })
    .unwrap();

    processor.cancel_flag().cancel();
    assert!(matches!(processor.process(), Err(Error::Cancelled)));
    assert!(!output.exists());
}

#[test]
fn size_limit_discards_partial_output() {
    let ws = Workspace::new();
    let input = ws.file("in.ps", S1);
    let output = ws.path("out.pdf");

    let result = Processor::new(ProcessingOptions {
        input_files: vec![input],
        output_file: Some(output.clone()),
        max_output_bytes: Some(64),
        ..Default::default()
    })
    .unwrap()
    .process();

    assert!(matches!(result, Err(Error::OutputUnwritable(_))));
    assert!(!output.exists());
}

#[test]
fn missing_input_is_reported() {
    let ws = Workspace::new();
    let result = Processor::new(ProcessingOptions {
        input_files: vec![ws.path("does-not-exist.ps")],
        output_file: Some(ws.path("out.pdf")),
        ..Default::default()
    })
    .unwrap()
    .process();

    assert!(matches!(result, Err(Error::InputNotFound(_))));
}

#[test]
fn option_validation() {
    assert!(matches!(
        Processor::new(ProcessingOptions::default()),
        Err(Error::InvalidArgument(_))
    ));

    let ws = Workspace::new();
    let input = ws.file("in.ps", S1);

    assert!(matches!(
        Processor::new(ProcessingOptions {
            input_files: vec![input.clone()],
            output_file: Some(ws.path("out.pdf")),
            device_name: "nullpage".into(),
            ..Default::default()
        }),
        Err(Error::InvalidArgument(_))
    ));

    assert!(matches!(
        Processor::new(ProcessingOptions {
            input_files: vec![input],
            ..Default::default()
        }),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn unterminated_string_aborts_with_line_number() {
    let ws = Workspace::new();
    let input = ws.file("in.ps", b"%!PS\n10 10 moveto\n(never closed show\n");
    let output = ws.path("out.pdf");

    let result = Processor::new(ProcessingOptions {
        input_files: vec![input],
        output_file: Some(output.clone()),
        ..Default::default()
    })
    .unwrap()
    .process();

    match result {
        Err(Error::Tokenize { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected a tokenize error, got {other:?}"),
    }
    assert!(!output.exists());
}
