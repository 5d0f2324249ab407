//! Command-line front end for the arithmetic coder.
//!
//! ```text
//! arcoder -c [-a] [-i infile] [-o outfile]   compress
//! arcoder -d [-a] [-i infile] [-o outfile]   decompress
//! ```
//!
//! `-a` selects the adaptive model; without it the static (two-pass) model
//! is used. `-i`/`-o` default to stdin/stdout.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use arcoder::{CoderError, Decoder, Encoder, Mode};

struct Config {
    decompress: bool,
    mode: Mode,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl Config {
    fn parse(args: &[String]) -> Result<Config, String> {
        let mut cfg = Config {
            decompress: false,
            mode: Mode::Static,
            input: None,
            output: None,
        };
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-c" => cfg.decompress = false,
                "-d" => cfg.decompress = true,
                "-a" => cfg.mode = Mode::Adaptive,
                "-i" => {
                    let path = iter.next().ok_or("-i requires a file path")?;
                    cfg.input = Some(PathBuf::from(path));
                }
                "-o" => {
                    let path = iter.next().ok_or("-o requires a file path")?;
                    cfg.output = Some(PathBuf::from(path));
                }
                "-h" | "-?" => {
                    print_usage();
                    process::exit(0);
                }
                other => return Err(format!("unrecognized option: {other}")),
            }
        }
        Ok(cfg)
    }
}

fn print_usage() {
    println!("arcoder: static/adaptive arithmetic coder");
    println!("Usage:");
    println!("\tarcoder -c [-a] [-i infile] [-o outfile]   compress");
    println!("\tarcoder -d [-a] [-i infile] [-o outfile]   decompress");
    println!("Options:");
    println!("\t-c          compress (default)");
    println!("\t-d          decompress");
    println!("\t-a          use the adaptive model instead of the static one");
    println!("\t-i <file>   read input from <file> instead of stdin");
    println!("\t-o <file>   write output to <file> instead of stdout");
    println!("\t-h          print this message");
}

fn read_input(path: &Option<PathBuf>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    match path {
        Some(p) => File::open(p)?.read_to_end(&mut buf)?,
        None => io::stdin().read_to_end(&mut buf)?,
    };
    Ok(buf)
}

fn write_output(path: &Option<PathBuf>, bytes: &[u8]) -> io::Result<()> {
    match path {
        Some(p) => File::create(p)?.write_all(bytes),
        None => io::stdout().write_all(bytes),
    }
}

fn run(cfg: Config) -> Result<(), CoderError> {
    let input = read_input(&cfg.input)?;
    let output = if cfg.decompress {
        let mut decoder = Decoder::new(cfg.mode);
        decoder.decode(io::Cursor::new(input))?
    } else {
        let mut encoder = Encoder::new(cfg.mode);
        encoder.encode(&input, Vec::new())?
    };
    write_output(&cfg.output, &output)?;
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cfg = match Config::parse(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("arcoder: {e}");
            print_usage();
            process::exit(2);
        }
    };

    if let Err(e) = run(cfg) {
        log::error!("{e}");
        eprintln!("arcoder: {e}");
        process::exit(1);
    }
}
