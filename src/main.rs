//! # CharsetProbe CLI - Text Encoding Detection and Conversion
//!
//! Command-line interface for detecting file encodings and converting text
//! files between charsets with a validation gate against silent
//! corruption.

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use serde::Serialize;

#[cfg(feature = "cli")]
use charset_probe::detection::{DETECTABLE_CHARSETS, EncodingDetector};
#[cfg(feature = "cli")]
use charset_probe::target::TARGET_NAMES;
#[cfg(feature = "cli")]
use charset_probe::{Converter, validate};

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI features disabled. Enable with --features cli");
    std::process::exit(1);
}

/// CharsetProbe: text encoding detection and validated conversion
#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "charset-probe")]
#[command(version, about, long_about = None)]
#[command(author = "CharsetProbe Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Detect the encoding of an input file
    Detect(DetectArgs),

    /// Check that a file decodes losslessly under a charset
    Validate(ValidateArgs),

    /// Convert a file to a target encoding, validating first
    Convert(ConvertArgs),

    /// List detectable charsets and logical target names
    List(ListArgs),
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct DetectArgs {
    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Maximum bytes to read for detection (whole input if not specified)
    #[arg(long)]
    max_bytes: Option<usize>,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ValidateArgs {
    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Charset to validate against
    #[arg(short, long)]
    charset: String,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ConvertArgs {
    /// Source charset (detected from the input if not specified)
    #[arg(short = 'f', long = "from")]
    from: Option<String>,

    /// Logical target encoding, e.g. utf-8, utf-8-bom, utf-16BE
    #[arg(short = 't', long = "to")]
    to: String,

    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Convert in-place (overwrite input file)
    #[arg(long, conflicts_with = "output")]
    in_place: bool,

    /// Maximum bytes to read when detecting the source charset
    #[arg(long)]
    max_bytes: Option<usize>,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ListArgs {
    /// Show only detectable charset names
    #[arg(long, conflicts_with = "targets")]
    detectable: bool,

    /// Show only logical conversion target names
    #[arg(long)]
    targets: bool,
}

#[cfg(feature = "cli")]
#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct ConversionReport {
    from: String,
    to: String,
    emits_signature: bool,
    bytes_read: usize,
    bytes_written: usize,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Detect(ref args) => detect_command(args, &cli)?,
        Commands::Validate(ref args) => validate_command(args, &cli)?,
        Commands::Convert(ref args) => convert_command(args, &cli)?,
        Commands::List(ref args) => list_command(args, &cli)?,
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn read_input(input: Option<&PathBuf>) -> Result<Vec<u8>> {
    if let Some(path) = input {
        fs::read(path).with_context(|| format!("Failed to read input file: {}", path.display()))
    } else {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    }
}

#[cfg(feature = "cli")]
fn build_detector(max_bytes: Option<usize>) -> Result<EncodingDetector> {
    match max_bytes {
        Some(max) => EncodingDetector::with_max_read(max).context("Invalid --max-bytes"),
        None => Ok(EncodingDetector::new()),
    }
}

#[cfg(feature = "cli")]
fn detect_command(args: &DetectArgs, cli: &Cli) -> Result<()> {
    let detector = build_detector(args.max_bytes)?;

    let detection = if let Some(ref path) = args.input {
        if cli.verbose {
            eprintln!("Reading from: {}", path.display());
        }
        detector.detect_file(path)?
    } else {
        let data = read_input(None)?;
        detector.detect(&data)
    };

    match cli.format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "charset": detection.as_ref().map(|d| d.charset),
                "has_signature": detection.as_ref().is_some_and(|d| d.has_signature),
                "confidence": detection.as_ref().and_then(|d| d.confidence),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => match detection {
            Some(detection) => {
                println!("Detected encoding: {}", detection.charset);
                println!(
                    "Signature: {}",
                    if detection.has_signature { "Yes" } else { "No" }
                );
                if let Some(confidence) = detection.confidence {
                    println!("Confidence: {:.1}%", confidence * 100.0);
                }
            }
            None => println!("Detected encoding: (unknown)"),
        },
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn validate_command(args: &ValidateArgs, cli: &Cli) -> Result<()> {
    let encoding = encoding_rs::Encoding::for_label(args.charset.as_bytes())
        .with_context(|| format!("Unknown charset: {}", args.charset))?;

    let data = read_input(args.input.as_ref())?;
    let validity = validate(encoding, &data);

    match cli.format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "charset": encoding.name(),
                "valid": validity.is_valid(),
                "bytes_checked": data.len(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if validity.is_valid() {
                println!("✓ Input is valid {}", encoding.name());
            } else {
                println!("✗ Input is not valid {}", encoding.name());
            }
        }
    }

    if !validity.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn convert_command(args: &ConvertArgs, cli: &Cli) -> Result<()> {
    let data = read_input(args.input.as_ref())?;

    let from_label = match args.from {
        Some(ref label) => label.clone(),
        None => {
            let detector = build_detector(args.max_bytes)?;
            match detector.detect(&data) {
                Some(detection) => {
                    if cli.verbose {
                        eprintln!("Detected source encoding: {}", detection.charset);
                    }
                    detection.charset.to_string()
                }
                None => anyhow::bail!("Could not detect the source encoding; pass --from"),
            }
        }
    };

    let converter = Converter::new(&from_label, &args.to)
        .with_context(|| format!("Cannot convert from {} to {}", from_label, args.to))?;

    if cli.verbose {
        eprintln!(
            "Converting from {} to {}",
            converter.from_encoding().name(),
            converter.target().name()
        );
    }

    let Some(converted) = converter.convert(&data) else {
        eprintln!(
            "✗ Input does not decode losslessly as {}; conversion skipped",
            converter.from_encoding().name()
        );
        std::process::exit(1);
    };

    if args.in_place {
        let Some(ref path) = args.input else {
            anyhow::bail!("Cannot use --in-place without input file");
        };
        fs::write(path, &converted)
            .with_context(|| format!("Failed to write to input file: {}", path.display()))?;
        if cli.verbose {
            eprintln!("Updated file in-place: {}", path.display());
        }
    } else if let Some(ref path) = args.output {
        fs::write(path, &converted)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        if cli.verbose {
            eprintln!("Wrote to: {}", path.display());
        }
    } else {
        io::stdout()
            .write_all(&converted)
            .context("Failed to write to stdout")?;
    }

    match cli.format {
        OutputFormat::Json => {
            let report = ConversionReport {
                from: converter.from_encoding().name().to_string(),
                to: converter.target().name().to_string(),
                emits_signature: converter.target().emits_signature(),
                bytes_read: data.len(),
                bytes_written: converted.len(),
            };
            eprintln!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if cli.verbose {
                eprintln!(
                    "✓ Converted {} bytes -> {} bytes",
                    data.len(),
                    converted.len()
                );
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn list_command(args: &ListArgs, cli: &Cli) -> Result<()> {
    let show_detectable = !args.targets;
    let show_targets = !args.detectable;

    match cli.format {
        OutputFormat::Json => {
            let mut report = serde_json::Map::new();
            if show_detectable {
                report.insert("detectable".into(), serde_json::json!(DETECTABLE_CHARSETS));
            }
            if show_targets {
                report.insert("targets".into(), serde_json::json!(TARGET_NAMES));
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::Value::Object(report))?
            );
        }
        OutputFormat::Text => {
            if show_detectable {
                println!("Detectable charsets ({} total):", DETECTABLE_CHARSETS.len());
                for name in DETECTABLE_CHARSETS {
                    println!("  {}", name);
                }
            }
            if show_targets {
                if show_detectable {
                    println!();
                }
                println!("Logical target names (plus any charset label):");
                for name in TARGET_NAMES {
                    println!("  {}", name);
                }
            }
        }
    }

    Ok(())
}
