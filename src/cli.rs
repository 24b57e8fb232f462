// Command-line interface for diffscan.
//
// Mirrors the classic single-pass workflow: positional REF and DIFF values
// (or a pattern string via --string) select match mode; --print-strings with
// a map file selects extraction mode. Input comes from a positional file, or
// from stdin when it is piped. Negative DIFF values go after `--`.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueHint};

use crate::charmap::{self, CharMap};
use crate::engine::{self, ScanConfig};
use crate::io as fio;
use crate::ledger::MatchRecord;
use crate::pattern::DiffPattern;
use crate::word::{Endianness, Width};

// ---------------------------------------------------------------------------
// Value parsers
// ---------------------------------------------------------------------------

fn parse_bits(s: &str) -> Result<Width, String> {
    s.parse::<u32>()
        .ok()
        .and_then(Width::from_bits)
        .ok_or_else(|| format!("invalid bit size `{s}` (valid options are 8, 16, 24 or 32)"))
}

fn parse_offset(s: &str) -> Result<u64, String> {
    match charmap::parse_int(s) {
        Some(v) if v >= 0 => Ok(v as u64),
        Some(_) => Err(format!("offset `{s}` cannot be negative")),
        None => Err(format!("invalid offset `{s}`")),
    }
}

fn parse_scale(s: &str) -> Result<i64, String> {
    charmap::parse_int(s).ok_or_else(|| format!("invalid scale `{s}`"))
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Scan a byte stream for a pattern of relative differences between words.
#[derive(Parser, Debug)]
#[command(
    name = "diffscan",
    version,
    about = "Relative-difference pattern scanner for binary streams",
    after_help = "\
Examples:
  Check file.bin for a pattern similar to `abcdjj' or `ABCDJJ':
      diffscan file.bin 1 2 3 4 10 0x0a
  Check piped input for a sequence of 4 bytes descending by 10:
      cat file.bin | diffscan -- 0 -10 -20 -30
  Check file.bin for 16-bit matches in the order of the string `castle'
  with a difference of 32 (0x20) between each character:
      diffscan -b 16 -s castle -S 0x20 file.bin
  Print all strings in file.bin recognized by map.txt between 0x4000
  and 0x6000:
      diffscan -M map.txt -o 0x4000 -O 0x6000 -p file.bin"
)]
struct Cli {
    /// Read 8-, 16-, 24-, or 32-bit words.
    #[arg(short = 'b', long = "bits", value_name = "BITS", value_parser = parse_bits, default_value = "8")]
    width: Width,

    /// Arrange bytes for big endian.
    #[arg(short = 'E', long = "big-endian")]
    big_endian: bool,

    /// Arrange bytes for little endian (default).
    #[arg(short = 'e', long = "little-endian", conflicts_with = "big_endian")]
    little_endian: bool,

    /// Character map file for --string translation and --print-strings.
    #[arg(short = 'M', long = "map", value_name = "FILE", value_hint = ValueHint::FilePath)]
    map: Option<PathBuf>,

    /// Start scanning at OFFSET.
    #[arg(short = 'o', long = "start", value_name = "OFFSET", value_parser = parse_offset)]
    start: Option<u64>,

    /// Stop scanning before reaching OFFSET.
    #[arg(short = 'O', long = "stop", value_name = "OFFSET", value_parser = parse_offset)]
    stop: Option<u64>,

    /// Print strings recognized by the character map instead of matching.
    /// REF, DIFF values and --string are ignored.
    #[arg(short = 'p', long = "print-strings", requires = "map")]
    print_strings: bool,

    /// Translate STRING into the difference pattern. REF and DIFF values
    /// are ignored.
    #[arg(short = 's', long = "string", value_name = "STRING")]
    string: Option<String>,

    /// Multiply all differences by SCALE.
    #[arg(short = 'S', long = "scale", value_name = "SCALE", value_parser = parse_scale, default_value = "1")]
    scale: i64,

    /// Show each matched word, not just the anchor offset.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Ignore duplicate-mapping warnings.
    #[arg(short = 'w', long = "ignore-warnings")]
    ignore_warnings: bool,

    /// The reference word must be matched exactly.
    #[arg(short = 'x', long = "exact")]
    exact: bool,

    /// Input file (omitted when stdin is piped), then REF and DIFF values.
    /// Use `--` before negative values.
    #[arg(value_name = "FILE|VALUE")]
    args: Vec<String>,
}

// ---------------------------------------------------------------------------
// Resolved run parameters
// ---------------------------------------------------------------------------

enum Mode {
    Match(DiffPattern),
    Extract,
}

struct Run {
    config: ScanConfig,
    mode: Mode,
    map: Option<CharMap>,
    input: Option<PathBuf>,
    verbose: bool,
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("diffscan: {msg}");
    process::exit(1);
}

/// Validate arguments and build everything needed before stream I/O starts.
/// Every fatal condition surfaces here, never mid-stream.
fn resolve(cli: Cli, piped: bool) -> Run {
    let width = cli.width;
    let endianness = match (cli.big_endian, cli.little_endian) {
        (true, _) => Endianness::Big,
        _ => Endianness::Little,
    };

    let mut values = cli.args;
    let input = if piped {
        None
    } else {
        if values.is_empty() {
            fail("missing input file");
        }
        Some(PathBuf::from(values.remove(0)))
    };

    let map = cli.map.map(|path| {
        match CharMap::load(&path, width, cli.ignore_warnings) {
            Ok(m) => m,
            Err(e) => fail(format_args!("character map file `{}': {e}", path.display())),
        }
    });

    let mode = if cli.print_strings {
        Mode::Extract
    } else if let Some(s) = &cli.string {
        match DiffPattern::from_str(s, map.as_ref()) {
            Ok(p) => Mode::Match(p.scaled(cli.scale)),
            Err(e) => fail(e),
        }
    } else {
        if values.is_empty() {
            fail("missing reference word");
        }
        if values.len() < 2 {
            fail("missing difference word(s)");
        }
        let numbers: Vec<i64> = values
            .iter()
            .map(|v| match charmap::parse_int(v) {
                Some(n) => n,
                None => fail(format_args!("invalid numeric argument `{v}'")),
            })
            .collect();
        match DiffPattern::from_values(numbers[0], &numbers[1..]) {
            Ok(p) => Mode::Match(p.scaled(cli.scale)),
            Err(e) => fail(e),
        }
    };

    Run {
        config: ScanConfig {
            width,
            endianness,
            start_offset: cli.start.unwrap_or(0),
            stop_offset: cli.stop,
            exact: cli.exact,
        },
        mode,
        map,
        input,
        verbose: cli.verbose,
    }
}

// ---------------------------------------------------------------------------
// Report formatting
// ---------------------------------------------------------------------------

fn print_match(m: &MatchRecord, verbose: bool, width: Width) {
    if !verbose {
        println!("0x{:08x}", m.anchor_offset);
        return;
    }
    let digits = width.hex_digits();
    let mut line = format!("Match at 0x{:08x}", m.anchor_offset);
    for (i, &u) in m.words_u.iter().enumerate() {
        let sep = if i == 0 { " | " } else { " " };
        line.push_str(&format!("{sep}0x{u:0digits$x}"));
    }
    println!("{line}");
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn run_on_reader<R: Read>(reader: &mut R, run: &Run) -> Result<(), engine::ScanError> {
    match &run.mode {
        Mode::Match(pattern) => {
            let verbose = run.verbose;
            let width = run.config.width;
            engine::scan(reader, &run.config, pattern, |m| {
                print_match(&m, verbose, width);
            })?;
        }
        Mode::Extract => {
            // `requires = "map"` guarantees the map is present here.
            let map = run.map.as_ref().unwrap();
            engine::extract(reader, &run.config, map, |r| {
                println!("0x{:08x}: \"{}\"", r.start_offset, r.text);
            })?;
        }
    }
    Ok(())
}

fn execute(run: &Run) -> Result<(), engine::ScanError> {
    match &run.input {
        Some(path) => {
            let mut reader = fio::open_at(path, &run.config)
                .map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", path.display())))?;
            run_on_reader(&mut reader, run)
        }
        None => {
            let stdin = io::stdin();
            let mut reader = stdin.lock();
            fio::skip_bytes(&mut reader, run.config.start_offset)?;
            run_on_reader(&mut reader, run)
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let piped = !io::stdin().is_terminal();
    let cli = Cli::parse();
    let run = resolve(cli, piped);

    match execute(&run) {
        Ok(()) => process::exit(0),
        Err(e) => fail(e),
    }
}
