//! contigmatch : identifies contigs common to all samples of a group.
//!
//! contigmatch [--config file] [--assembly [-a] dir] [--group [-g] name] [--kmer [-k] size] [--outdir [-o] dir]
//!             [--min-identity n] [--aligner cmd] [--revcomp] [--all-rows] [samples...]
//!
//! - samples : samples of the group, first one is the target. Each sample must have been assembled
//!   in assembly_dir/sample-kmer/contigs-afg.fa
//!
//! --config : json file with run parameters (see RunParams). Command line values override it.
//!
//! --revcomp : reverse complement query contigs aligned on minus strand when they become the common sequence.
//!
//! --all-rows : also dumps ContigTable-group.all.txt with every common contig, NF for samples without match.
//!
//! Outputs go in outdir/group : one psl per pass, ContigTable-group.txt and CommonContigBuild-group.fa

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

// for logging (debug mostly, switched at compile time in cargo.toml)
use env_logger::Builder;

use contigmatch::align::BlatAligner;
use contigmatch::pipeline::ContigMatcher;
use contigmatch::utils::RunParams;

// install a logger facility
pub fn init_log() -> u64 {
    Builder::from_default_env().init();
    println!("\n ************** initializing logger *****************\n");
    1
}

/// builds run parameters : defaults, then config file, then command line
fn parse_params(matches: &ArgMatches) -> anyhow::Result<RunParams> {
    let mut params = match matches.get_one::<PathBuf>("config") {
        Some(path) => RunParams::reload_json(path)
            .with_context(|| format!("reading configuration file {:?}", path))?,
        None => RunParams::default(),
    };
    //
    if let Some(dir) = matches.get_one::<PathBuf>("assembly") {
        params.assembly_dir = dir.clone();
    }
    if let Some(group) = matches.get_one::<String>("group") {
        params.group = group.clone();
    }
    if let Some(kmer) = matches.get_one::<usize>("kmer") {
        params.kmer = *kmer;
    }
    if let Some(outdir) = matches.get_one::<PathBuf>("outdir") {
        params.outdir = outdir.clone();
    }
    if let Some(identity) = matches.get_one::<u32>("min_identity") {
        params.aligner.min_identity = *identity;
    }
    if let Some(cmd) = matches.get_one::<String>("aligner") {
        params.aligner.command = cmd.clone();
    }
    if matches.get_flag("revcomp") {
        params.revcomp_minus = true;
    }
    if matches.get_flag("all_rows") {
        params.all_rows = true;
    }
    if let Some(samples) = matches.get_many::<String>("samples") {
        params.samples = samples.cloned().collect();
    }
    //
    Ok(params)
} // end of parse_params

fn main() -> anyhow::Result<()> {
    let _ = init_log();
    let start_t = chrono::Local::now();
    log::info!("\n contigmatch begins at time:{:#?} \n ", start_t);
    //
    let matches = Command::new("contigmatch")
        .about("Screens assembled samples of a group with blat to find their common contigs")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(Arg::new("config")
            .long("config")
            .value_name("FILE")
            .help("json file of run parameters")
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("assembly")
            .short('a')
            .long("assembly")
            .value_name("DIR")
            .help("directory containing sample-kmer assembly directories [default: 03-Assembly]")
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("group")
            .short('g')
            .long("group")
            .help("group name [default: Mus-A2]")
            .value_parser(value_parser!(String)))
        .arg(Arg::new("kmer")
            .short('k')
            .long("kmer")
            .help("kmer size used in assemblies [default: 21]")
            .value_parser(value_parser!(usize)))
        .arg(Arg::new("outdir")
            .short('o')
            .long("outdir")
            .value_name("DIR")
            .help("output root directory, results go in outdir/group [default: 04-Quants]")
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("min_identity")
            .long("min-identity")
            .help("blat minimum identity in percent [default: 96]")
            .value_parser(value_parser!(u32).range(0..=100)))
        .arg(Arg::new("aligner")
            .long("aligner")
            .value_name("CMD")
            .help("aligner executable [default: blat]")
            .value_parser(value_parser!(String)))
        .arg(Arg::new("revcomp")
            .long("revcomp")
            .help("reverse complement minus strand query contigs kept as common sequence")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("all_rows")
            .long("all-rows")
            .help("also dump the table of all common contigs, NF for samples without match")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("samples")
            .help("samples of the group, the first one is the target [default: MusA2a MusA2b]")
            .num_args(1..)
            .value_parser(value_parser!(String)))
        .get_matches();
    //
    let params = parse_params(&matches)?;
    log::info!("run parameters : {:?}", params);
    //
    let aligner = BlatAligner::new(params.aligner.clone());
    let group = params.group.clone();
    let mut matcher = ContigMatcher::new(params, aligner).context("checking run parameters")?;
    let summary = matcher
        .run()
        .with_context(|| format!("processing group {}", group))?;
    //
    println!(
        "\n group {} : {} common contigs, {} found in all samples",
        group, summary.report.nb_common, summary.report.nb_complete
    );
    println!(" table : {}", display_path(&summary.table_path));
    println!(" fasta : {}", display_path(&summary.fasta_path));
    //
    let end_t = chrono::Local::now();
    log::info!("\n contigmatch ends at time:{:#?} \n ", end_t);
    //
    Ok(())
} // end of main

fn display_path(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
