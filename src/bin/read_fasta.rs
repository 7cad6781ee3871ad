//! read_fasta : rewrites a fasta file with one sequence line per record.
//!
//! read_fasta --input [-i] infile.fasta [--output [-o] output.fasta] [--min-size [-m] n] [-v]
//!
//! - output defaults to stdout
//! - records shorter than min-size are dropped (default 0, keep all)
//! - -v sets log level to debug

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use env_logger::Builder;

use contigmatch::contigs::flatten_fasta;

// install a logger facility, verbose forces debug level
pub fn init_log(verbose: bool) -> u64 {
    let mut builder = Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
    1
}

fn main() -> anyhow::Result<()> {
    let matches = Command::new("read_fasta")
        .about("Flattens a fasta file, optionally dropping short sequences")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(Arg::new("input")
            .short('i')
            .long("input")
            .value_name("FILE")
            .help("input fasta file (possibly gzipped)")
            .required(true)
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("FILE")
            .help("output fasta file, stdout if absent")
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("min_size")
            .short('m')
            .long("min-size")
            .help("minimum sequence length kept")
            .default_value("0")
            .value_parser(value_parser!(usize)))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("debug logging")
            .action(ArgAction::SetTrue))
        .get_matches();
    //
    let _ = init_log(matches.get_flag("verbose"));
    // input is required, clap exits before if absent
    let input = matches
        .get_one::<PathBuf>("input")
        .context("missing input file")?;
    let min_size = *matches.get_one::<usize>("min_size").unwrap_or(&0);
    //
    let mut out: Box<dyn Write> = match matches.get_one::<PathBuf>("output") {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let summary = flatten_fasta(input, &mut *out, min_size)
        .with_context(|| format!("flattening {:?}", input))?;
    log::info!(
        "read_fasta {:?} : nb read {}, nb written {}, nb shorter than {} : {}",
        input,
        summary.nb_read,
        summary.nb_written,
        min_size,
        summary.nb_filtered
    );
    //
    Ok(())
} // end of main
