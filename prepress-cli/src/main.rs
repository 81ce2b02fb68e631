//! prepress - convert PostScript and EPS documents to PDF.
//!
//! Accepts both clap-native long options and the Ghostscript-style
//! `-sKEY=VALUE` / `-dKEY[=VALUE]` switches the original tooling used,
//! so existing invocations like
//! `prepress -dBATCH -sDEVICE=pdfwrite -sOutputFile=out.pdf in.ps`
//! keep working.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{ArgAction, Parser};
use prepress::{Error, PaperSize, ProcessingOptions, Processor, Quality};

/// Convert PostScript and EPS documents to PDF.
#[derive(Parser, Debug)]
#[command(name = "prepress")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more input PostScript/EPS files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Destination PDF path
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Ghostscript-style string parameter (DEVICE, OutputFile, PAPERSIZE)
    #[arg(short = 's', value_name = "KEY=VALUE", action = ArgAction::Append)]
    string_params: Vec<String>,

    /// Ghostscript-style definition (BATCH, NOPAUSE, QUIET,
    /// CompatibilityLevel=…, PDFSETTINGS=…, DEVICEWIDTHPOINTS=…,
    /// DEVICEHEIGHTPOINTS=…)
    #[arg(short = 'd', value_name = "KEY[=VALUE]", action = ArgAction::Append)]
    define_params: Vec<String>,

    /// Paper size: a4, letter, legal, a3, a5, executive or custom
    #[arg(long = "paper-size")]
    paper_size: Option<String>,

    /// Page width in points, with `--paper-size custom`
    #[arg(long = "custom-width")]
    custom_width: Option<f64>,

    /// Page height in points, with `--paper-size custom`
    #[arg(long = "custom-height")]
    custom_height: Option<f64>,

    /// PDF compatibility level: 1.4, 1.5, 1.6 or 1.7
    #[arg(long = "compatibility-level")]
    compatibility_level: Option<String>,

    /// Quality preset: screen, default, ebook, printer or prepress
    #[arg(long)]
    quality: Option<String>,

    /// Document title, overriding the input's %%Title
    #[arg(long)]
    title: Option<String>,

    /// Document creator, overriding the input's %%Creator
    #[arg(long)]
    creator: Option<String>,

    /// Abort if the output would exceed this many bytes
    #[arg(long = "max-output-bytes")]
    max_output_bytes: Option<u64>,

    /// Suppress progress output
    #[arg(short = 'q', long, action = ArgAction::SetTrue)]
    quiet: bool,

    /// Process the inputs and exit (compatibility flag)
    #[arg(long = "batch", action = ArgAction::SetTrue)]
    batch: bool,

    /// Do not pause between pages (compatibility flag)
    #[arg(long = "no-pause", action = ArgAction::SetTrue)]
    no_pause: bool,
}

fn build_options(args: Args) -> Result<ProcessingOptions, Error> {
    let mut options = ProcessingOptions {
        input_files: args.inputs,
        output_file: args.output,
        quiet: args.quiet,
        batch_mode: args.batch,
        no_pause: args.no_pause,
        max_output_bytes: args.max_output_bytes,
        title: args.title,
        creator: args.creator,
        ..Default::default()
    };

    if let Some(paper) = &args.paper_size {
        options.paper_size = paper.parse()?;
    }
    if let Some(level) = &args.compatibility_level {
        options.compatibility_level = level.parse()?;
    }
    if let Some(quality) = &args.quality {
        options.quality = quality.parse()?;
    }
    if let Some(width) = args.custom_width {
        options.custom_width_points = width;
    }
    if let Some(height) = args.custom_height {
        options.custom_height_points = height;
    }

    for param in &args.string_params {
        let (key, value) = split_param(param)?;
        let value = value.ok_or_else(|| {
            Error::InvalidArgument(format!("-s{key} requires a value"))
        })?;

        match key {
            "DEVICE" => options.device_name = value.to_string(),
            "OutputFile" => options.output_file = Some(PathBuf::from(value)),
            "PAPERSIZE" => options.paper_size = value.parse()?,
            other => {
                return Err(Error::InvalidArgument(format!(
                    "unrecognized parameter -s{other}"
                )));
            }
        }
    }

    for param in &args.define_params {
        let (key, value) = split_param(param)?;

        match (key, value) {
            ("BATCH", None) => options.batch_mode = true,
            ("NOPAUSE", None) => options.no_pause = true,
            ("QUIET", None) => options.quiet = true,
            // Accepted for Ghostscript compatibility; the interpreter is
            // always sandboxed to the recognized subset.
            ("SAFER", None) => {}
            ("CompatibilityLevel", Some(v)) => {
                options.compatibility_level = v.parse()?;
            }
            ("PDFSETTINGS", Some(v)) => options.quality = v.parse::<Quality>()?,
            ("DEVICEWIDTHPOINTS", Some(v)) => {
                options.custom_width_points = parse_points(key, v)?;
                options.paper_size = PaperSize::Custom;
            }
            ("DEVICEHEIGHTPOINTS", Some(v)) => {
                options.custom_height_points = parse_points(key, v)?;
                options.paper_size = PaperSize::Custom;
            }
            (other, _) => {
                return Err(Error::InvalidArgument(format!(
                    "unrecognized parameter -d{other}"
                )));
            }
        }
    }

    Ok(options)
}

fn split_param(param: &str) -> Result<(&str, Option<&str>), Error> {
    match param.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, Some(value))),
        Some(_) => Err(Error::InvalidArgument(format!(
            "malformed parameter `{param}`"
        ))),
        None => Ok((param, None)),
    }
}

fn parse_points(key: &str, value: &str) -> Result<f64, Error> {
    value
        .parse::<f64>()
        .map_err(|_| Error::InvalidArgument(format!("-d{key} expects a number, got `{value}`")))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let options = match build_options(args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("prepress: {e}");
            return ExitCode::from(2);
        }
    };
    let quiet = options.quiet;

    let mut processor = match Processor::new(options) {
        Ok(processor) => processor,
        Err(e) => {
            eprintln!("prepress: {e}");
            return ExitCode::from(2);
        }
    };

    if !quiet {
        processor = processor.with_progress(Arc::new(|current, total, status| {
            eprintln!("[{current}/{total}] {status}");
        }));
    }

    match processor.process() {
        Ok(summary) => {
            if !quiet {
                eprintln!(
                    "wrote {} page{} in {} objects ({} bytes)",
                    summary.pages,
                    if summary.pages == 1 { "" } else { "s" },
                    summary.objects,
                    summary.bytes_written
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("prepress: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prepress::CompatibilityLevel;

    fn parse(argv: &[&str]) -> ProcessingOptions {
        build_options(Args::parse_from(argv)).unwrap()
    }

    #[test]
    fn native_options() {
        let options = parse(&[
            "prepress",
            "-o",
            "out.pdf",
            "--paper-size",
            "letter",
            "--compatibility-level",
            "1.5",
            "in.ps",
        ]);

        assert_eq!(options.input_files, vec![PathBuf::from("in.ps")]);
        assert_eq!(options.output_file.as_deref(), Some("out.pdf".as_ref()));
        assert_eq!(options.paper_size, PaperSize::Letter);
        assert_eq!(options.compatibility_level, CompatibilityLevel::Pdf15);
    }

    #[test]
    fn ghostscript_style_options() {
        let options = parse(&[
            "prepress",
            "-dBATCH",
            "-dNOPAUSE",
            "-dQUIET",
            "-sDEVICE=pdfwrite",
            "-sOutputFile=out.pdf",
            "-sPAPERSIZE=a5",
            "-dPDFSETTINGS=/ebook",
            "-dCompatibilityLevel=1.4",
            "in.ps",
        ]);

        assert!(options.batch_mode);
        assert!(options.no_pause);
        assert!(options.quiet);
        assert_eq!(options.device_name, "pdfwrite");
        assert_eq!(options.output_file.as_deref(), Some("out.pdf".as_ref()));
        assert_eq!(options.paper_size, PaperSize::A5);
        assert_eq!(options.quality, Quality::Ebook);
        assert_eq!(options.compatibility_level, CompatibilityLevel::Pdf14);
    }

    #[test]
    fn device_points_switch_to_custom_paper() {
        let options = parse(&[
            "prepress",
            "-dDEVICEWIDTHPOINTS=300",
            "-dDEVICEHEIGHTPOINTS=500",
            "in.ps",
        ]);

        assert_eq!(options.paper_size, PaperSize::Custom);
        assert_eq!(options.custom_width_points, 300.0);
        assert_eq!(options.custom_height_points, 500.0);
    }

    #[test]
    fn unknown_parameter_is_rejected() {
        let args = Args::parse_from(["prepress", "-dNOCACHE", "in.ps"]);
        assert!(build_options(args).is_err());
    }
}
