//! CLI entry point for the LFSR machine simulator.

use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use lfsr_core::{
    cycle_length, disassemble_sequence, CoreConfig, LeftOp, Machine, OpcodeNumbering, PcMode,
    ShiftSource, StreamDevice, TextTrace, TraceFormat, DEFAULT_MEMORY_WORDS,
};
#[cfg(test)]
use tempfile as _;
use tracing_subscriber::EnvFilter;

const EXIT_USAGE: i32 = 1;
const EXIT_OPEN: i32 = 2;
const EXIT_READ: i32 = 3;
const EXIT_EXECUTION: i32 = 4;
const EXIT_CONFIG: i32 = 5;

/// Environment variable that enables the instruction trace on stderr.
const DEBUG_VAR: &str = "DEBUG";

/// Simulates the 16-bit accumulator machine whose program counter is an LFSR.
#[derive(Debug, Parser, PartialEq, Eq)]
#[command(version)]
struct Args {
    /// Program image: hex words separated by whitespace or commas
    program: PathBuf,
    /// Advance the PC with +1 instead of the LFSR
    #[arg(long)]
    increment: bool,
    /// Make opcode 2 add the operand instead of shifting
    #[arg(long)]
    accumulate: bool,
    /// Shift the accumulator instead of the fetched operand
    #[arg(long)]
    shift_accumulator: bool,
    /// Decode opcode field 0 as xor and 1 as and, matching the VHDL core
    #[arg(long)]
    reference_opcodes: bool,
    /// LFSR tap mask in hex
    #[arg(long, value_parser = parse_hex_u8, default_value = "b8")]
    polynomial: u8,
    /// Memory capacity in words (power of two)
    #[arg(long, default_value_t = DEFAULT_MEMORY_WORDS)]
    memory_words: usize,
    /// Reset PC in hex
    #[arg(long, value_parser = parse_hex_u8, default_value = "0")]
    entry: u8,
    /// Append the raw instruction word and cycle index to trace lines
    #[arg(long)]
    extended_trace: bool,
    /// Stop after this many instructions if the program has not halted
    #[arg(long)]
    max_steps: Option<u64>,
    /// Print the program in fetch order and exit
    #[arg(long)]
    disassemble: bool,
}

impl Args {
    fn core_config(&self, tracing_enabled: bool) -> CoreConfig {
        CoreConfig {
            polynomial: self.polynomial,
            pc_mode: if self.increment {
                PcMode::Increment
            } else {
                PcMode::Lfsr
            },
            left_op: if self.accumulate {
                LeftOp::Accumulate
            } else {
                LeftOp::Shift
            },
            shift_source: if self.shift_accumulator {
                ShiftSource::Accumulator
            } else {
                ShiftSource::Operand
            },
            opcode_numbering: if self.reference_opcodes {
                OpcodeNumbering::Reference
            } else {
                OpcodeNumbering::Listing
            },
            memory_words: self.memory_words,
            entry_pc: self.entry,
            tracing_enabled,
        }
    }

    const fn trace_format(&self) -> TraceFormat {
        if self.extended_trace {
            TraceFormat::Extended
        } else {
            TraceFormat::Compact
        }
    }
}

fn parse_hex_u8(text: &str) -> Result<u8, String> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u8::from_str_radix(digits, 16).map_err(|e| format!("`{text}` is not an 8-bit hex value: {e}"))
}

/// Integer value of an environment option, read the way C's `atoi` does.
///
/// Unset or non-numeric values are 0.
fn lazy_option(value: Option<OsString>) -> i64 {
    let Some(value) = value else {
        return 0;
    };
    let text = value.to_string_lossy();
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = rest
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
        });
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args, debug: bool) -> Result<(), i32> {
    let config = args.core_config(debug);
    let mut machine = Machine::new(config, StreamDevice::stdio()).map_err(|e| {
        eprintln!("error: {e}");
        EXIT_CONFIG
    })?;

    let file = File::open(&args.program).map_err(|e| {
        eprintln!(
            "Unable to open file `{}` for reading: {e}",
            args.program.display()
        );
        EXIT_OPEN
    })?;
    let report = machine.load_image(file).map_err(|e| {
        eprintln!("error: failed to read `{}`: {e}", args.program.display());
        EXIT_READ
    })?;
    tracing::debug!(words = report.words, stop = ?report.stop, "image ready");

    if args.disassemble {
        let config = machine.config();
        let count = cycle_length(config.entry_pc, config.polynomial, config.pc_mode).unwrap_or(256);
        for row in disassemble_sequence(machine.memory(), config, count) {
            println!("{row}");
        }
        return Ok(());
    }

    let mut machine = machine.with_trace(TextTrace::with_format(io::stderr(), args.trace_format()));
    let result = match args.max_steps {
        Some(limit) => machine.run_for(limit),
        None => machine.run(),
    };
    match result {
        Ok(outcome) => {
            tracing::info!(
                steps = outcome.steps,
                halted = outcome.halted,
                pc = outcome.registers.pc(),
                a = outcome.registers.a(),
                "run finished"
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {e}");
            Err(EXIT_EXECUTION)
        }
    }
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) => {
            let code = match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_USAGE,
            };
            let _ = error.print();
            std::process::exit(code);
        }
    };

    init_logging();
    let debug = lazy_option(std::env::var_os(DEBUG_VAR)) != 0;

    let exit_code = match run(&args, debug) {
        Ok(()) => 0,
        Err(code) => code,
    };
    std::process::exit(exit_code);
}
