// ABOUTME: CLI binary for the policy-driven HTML sanitizer.
// ABOUTME: Sanitizes a file or stdin with a preset or JSON policy and writes the result.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use htmlsanitizer::{
    default_policy, sanitize_reader, strict_policy, strip_tags_reader, Policy, PolicyConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "htmlsan")]
#[command(about = "Sanitize untrusted HTML against an allow-list policy")]
struct Args {
    /// HTML file to sanitize (default: stdin)
    #[arg()]
    input: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Start from the strict preset instead of the permissive default
    #[arg(long = "strict", conflicts_with = "policy")]
    strict: bool,

    /// JSON policy configuration file
    #[arg(long = "policy")]
    policy: Option<PathBuf>,

    /// Remove disallowed elements together with their content
    #[arg(long = "strip")]
    strip: bool,

    /// Wrap bare http(s) URLs in text with anchors
    #[arg(long = "linkify")]
    linkify: bool,

    /// Maximum element nesting depth (0 = unlimited)
    #[arg(long = "max-depth")]
    max_depth: Option<usize>,

    /// Output plain text with every tag removed
    #[arg(long = "text")]
    text: bool,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,
}

fn build_policy(args: &Args) -> anyhow::Result<Policy> {
    let base = match &args.policy {
        Some(path) => PolicyConfig::from_path(path)?.build(),
        None if args.strict => strict_policy(),
        None => default_policy(),
    };

    let mut builder = base.to_builder();
    if args.strip {
        builder = builder.strip_disallowed(true);
    }
    if args.linkify {
        builder = builder.linkify(true);
    }
    if let Some(depth) = args.max_depth {
        builder = builder.max_depth(depth);
    }
    Ok(builder.build())
}

fn open_input(input: Option<&PathBuf>) -> anyhow::Result<Box<dyn Read>> {
    match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn run(args: &Args) -> anyhow::Result<String> {
    let reader = open_input(args.input.as_ref())?;
    if args.text {
        return Ok(strip_tags_reader(reader)?);
    }
    let policy = build_policy(args)?;
    tracing::debug!(?policy, "sanitizing");
    Ok(sanitize_reader(reader, &policy)?)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let start = Instant::now();
    let output = match run(&args) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(1);
        }
    };
    let elapsed = start.elapsed();

    let written = match &args.output {
        Some(path) => fs::write(path, &output)
            .with_context(|| format!("writing to {}", path.display())),
        None => io::stdout()
            .write_all(output.as_bytes())
            .context("writing to stdout"),
    };

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }

    if let Err(e) = written {
        eprintln!("error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
