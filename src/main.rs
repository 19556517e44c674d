//! scheme-writer - CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use scheme_writer::runtime::value::{Heap, Value};
use scheme_writer::util::{config, logger};
use scheme_writer::writer::{self, Port, WriteMode};
use scheme_writer::{NAME, VERSION};
use tracing::debug;

/// Print Scheme values described as JSON
#[derive(Parser, Debug)]
#[command(name = "scheme-writer")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a value given as JSON
    Write {
        /// Value to write (arrays are lists, "'name" is a symbol)
        #[arg(value_name = "JSON")]
        value: String,

        /// Output mode
        #[arg(short, long, value_enum)]
        mode: Option<Mode>,

        /// Label shared structure
        #[arg(short, long)]
        circular: Option<bool>,

        /// Truncate output to this many characters
        #[arg(short, long)]
        width: Option<usize>,
    },

    /// Run a format string (`~a`, `~s`, `~d`, ...) over JSON arguments
    Format {
        /// Format string
        #[arg(value_name = "FMT")]
        fmt: String,

        /// Arguments
        #[arg(value_name = "JSON-ARGS")]
        args: Vec<String>,
    },

    /// Print version information
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Write,
    Display,
    Debug,
}

impl From<Mode> for WriteMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Write => WriteMode::Write,
            Mode::Display => WriteMode::Display,
            Mode::Debug => WriteMode::Debug,
        }
    }
}

fn parse_value(
    heap: &mut Heap,
    json: &str,
) -> Result<Value> {
    let json: serde_json::Value =
        serde_json::from_str(json).with_context(|| format!("Invalid JSON: {}", json))?;
    Ok(heap.from_json(&json))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::load_config().context("Failed to load configuration")?;

    let level = if args.verbose {
        logger::LogLevel::Debug
    } else {
        config.log.level
    };
    logger::init_with_level(level);
    debug!("{} version: {}", NAME, VERSION);

    let mut heap = Heap::new();
    let port = Port::stdout();

    match args.command {
        Commands::Write {
            value,
            mode,
            circular,
            width,
        } => {
            let value = parse_value(&mut heap, &value)?;
            let mode = mode.map_or(config.writer.default_mode, WriteMode::from);
            let circular = circular.unwrap_or(config.writer.circular);
            let width = width.or(config.writer.width_limit);

            match (circular, width) {
                (true, width) => {
                    writer::write_circular(&heap, value, &port, mode, width)?;
                }
                (false, Some(width)) => {
                    writer::write_limited(&heap, value, &port, mode, width)?;
                }
                (false, None) => writer::write(&heap, value, &port, mode)?,
            }
            port.put_char('\n')?;
        }
        Commands::Format { fmt, args } => {
            let values = args
                .iter()
                .map(|arg| parse_value(&mut heap, arg))
                .collect::<Result<Vec<_>>>()?;
            writer::format(&heap, &port, &fmt, &values, config.writer.circular)
                .with_context(|| format!("Failed to format: {:?}", fmt))?;
            port.put_char('\n')?;
        }
        Commands::Version => {
            println!("{} {}", NAME, VERSION);
        }
    }

    port.flush()?;
    Ok(())
}
