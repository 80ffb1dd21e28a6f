use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use captions_editor::logging;
use captions_editor::{
    Captions, Endpoint, Opts, OutputType, TimestampParsing, decode, write_captions,
};

fn main() -> Result<ExitCode> {
    logging::init();
    let params = Params::parse();
    let opts = load_opts(&params)?;

    match params.command {
        Command::Check { file } => {
            let captions = read_captions(&file, &opts)?;
            let problems = report(&captions, &mut io::stdout().lock())?;
            Ok(if problems == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Shift {
            file,
            from,
            delta,
            anchor,
            output,
        } => {
            let captions = read_captions(&file, &opts)?;
            let target = from
                .checked_sub(1)
                .and_then(|index| captions.cues().get(index))
                .with_context(|| format!("no cue numbered {from} in '{}'", file.display()))?
                .id();
            let shifted = captions.shift_cascade(target, delta, anchor)?;
            info!(from, delta, ?anchor, "cascade shift applied");
            write_output(&shifted, output.as_deref(), opts.output_type)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Format { file, output } => {
            let captions = read_captions(&file, &opts)?;
            write_output(&captions, output.as_deref(), opts.output_type)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "captions-cli")]
#[command(about = "Check, shift and reformat WebVTT caption tracks")]
struct Params {
    /// JSON file with library options (timestamp parsing, rule limits, output type).
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Reject malformed timestamps instead of reading them as zero.
    #[arg(long = "strict", global = true, default_value_t = false)]
    strict: bool,

    /// Output format for commands that write a track.
    #[arg(short = 'o', long = "output-type", global = true, value_enum)]
    output_type: Option<OutputType>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report overlapping cues and style rule violations.
    Check { file: PathBuf },

    /// Shift a cue and every cue after it.
    Shift {
        file: PathBuf,

        /// Cue number (1-based) to start shifting from.
        #[arg(long = "from")]
        from: usize,

        /// Seconds to shift by; negative moves cues earlier.
        #[arg(long = "delta", allow_negative_numbers = true)]
        delta: f64,

        /// `start` keeps the first cue's duration, `end` stretches it.
        #[arg(long = "anchor", value_enum, default_value = "start")]
        anchor: Endpoint,

        /// Write here instead of stdout.
        #[arg(long = "out")]
        output: Option<PathBuf>,
    },

    /// Renumber and re-encode a track.
    Format {
        file: PathBuf,

        /// Write here instead of stdout.
        #[arg(long = "out")]
        output: Option<PathBuf>,
    },
}

fn load_opts(params: &Params) -> Result<Opts> {
    let mut opts = match &params.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config '{}'", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid config '{}'", path.display()))?
        }
        None => Opts::default(),
    };

    if params.strict {
        opts.timestamp_parsing = TimestampParsing::Strict;
    }
    if let Some(output_type) = params.output_type {
        opts.output_type = output_type;
    }
    Ok(opts)
}

fn read_captions(path: &Path, opts: &Opts) -> Result<Captions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let captions =
        decode(&text, opts).with_context(|| format!("failed to decode '{}'", path.display()))?;
    Ok(captions)
}

fn write_output(captions: &Captions, path: Option<&Path>, output_type: OutputType) -> Result<()> {
    match path {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("failed to create '{}'", path.display()))?;
            write_captions(captions, file, output_type)?;
        }
        None => write_captions(captions, io::stdout().lock(), output_type)?,
    }
    Ok(())
}

/// Print one line per problem and return how many cues had problems.
fn report(captions: &Captions, w: &mut dyn Write) -> Result<usize> {
    let mut w = BufWriter::new(w);
    let mut problems = 0;

    for cue in captions {
        if !cue.is_overlap_prev() && cue.is_valid() {
            continue;
        }
        problems += 1;

        let mut issues = Vec::new();
        if cue.is_overlap_prev() {
            issues.push("overlaps previous cue".to_string());
        }
        for id in cue.validation_errors() {
            let label = captions
                .rules()
                .get(id)
                .map(|rule| format!("{} ({})", rule.name(), rule.description()))
                .unwrap_or_else(|| "unknown rule".to_string());
            issues.push(format!("{id} {label}"));
        }

        writeln!(
            w,
            "{} [{} --> {}]: {}",
            cue.cue_number(),
            cue.start(),
            cue.end(),
            issues.join("; ")
        )?;
    }

    writeln!(w, "{} cues, {} with problems", captions.len(), problems)?;
    w.flush()?;
    Ok(problems)
}
