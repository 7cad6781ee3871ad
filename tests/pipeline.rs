//! whole group runs with an aligner writing prepared psl files

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use contigmatch::align::{read_psl_hits, Aligner, AlignmentHit};
use contigmatch::pipeline::ContigMatcher;
use contigmatch::utils::RunParams;
use contigmatch::{ContigMatchError, Result};
use tempfile::TempDir;

const PSL_HEADER: &str = "psLayout version 3\n\nmatch\tmis-\trep.\tN's\tQ gap\tQ gap\tT gap\tT gap\tstrand\tQ\tQ\tQ\tQ\tT\tT\tT\tT\tblock\tblockSizes\tqStarts\ttStarts\n     \tmatch\tmatch\t   \tcount\tbases\tcount\tbases\t      \tname\tsize\tstart\tend\tname\tsize\tstart\tend\tcount\n---------------------------------------------------------------------------------------------------------------------------------------------------------------\n";

fn psl_row(qname : &str, qsize : usize, tname : &str, tsize : usize) -> String {
    let m = qsize.min(tsize);
    format!(
        "{m}\t0\t0\t0\t0\t0\t0\t0\t+\t{qname}\t{qsize}\t0\t{m}\t{tname}\t{tsize}\t0\t{m}\t1\t{m},\t0,\t0,\n"
    )
}

/// writes one prepared psl per call, records calls
struct ScriptedAligner {
    outputs : VecDeque<Vec<String>>,
    calls : Vec<(PathBuf, PathBuf, PathBuf)>,
}

impl ScriptedAligner {
    fn new(outputs: Vec<Vec<String>>) -> Self {
        ScriptedAligner {
            outputs: outputs.into(),
            calls: Vec::new(),
        }
    }
}

impl Aligner for ScriptedAligner {
    fn align(&mut self, reference: &Path, query: &Path, output: &Path) -> Result<Vec<AlignmentHit>> {
        self.calls
            .push((reference.to_path_buf(), query.to_path_buf(), output.to_path_buf()));
        let rows = self.outputs.pop_front().unwrap_or_default();
        let mut text = String::from(PSL_HEADER);
        for row in rows {
            text.push_str(&row);
        }
        fs::write(output, text).unwrap();
        read_psl_hits(output)
    }
}

/// an aligner that always fails
struct BrokenAligner;

impl Aligner for BrokenAligner {
    fn align(&mut self, _reference: &Path, _query: &Path, _output: &Path) -> Result<Vec<AlignmentHit>> {
        Err(ContigMatchError::AlignerFailed {
            command: String::from("blat"),
            status: String::from("exit status: 255"),
        })
    }
}

fn seq(base : char, len : usize) -> String {
    std::iter::repeat(base).take(len).collect()
}

fn write_sample(assembly : &Path, sample : &str, records : &[(&str, String)]) {
    let dir = assembly.join(format!("{}-21", sample));
    fs::create_dir_all(&dir).unwrap();
    let mut text = String::new();
    for (name, s) in records {
        text.push_str(&format!(">{}\n{}\n", name, s));
    }
    fs::write(dir.join("contigs-afg.fa"), text).unwrap();
} // end of write_sample

/// samples A, B, C. A contig 1 (100), B contig 5 (120), C contig 9 (90) and 7 (60)
fn setup() -> (TempDir, RunParams) {
    let tmp = TempDir::new().unwrap();
    let assembly = tmp.path().join("03-Assembly");
    write_sample(&assembly, "A", &[("NODE_1_length_100_cov_10.0", seq('A', 100))]);
    write_sample(&assembly, "B", &[("NODE_5_length_120_cov_10.0", seq('C', 120))]);
    write_sample(
        &assembly,
        "C",
        &[
            ("NODE_7_length_60_cov_10.0", seq('T', 60)),
            ("NODE_9_length_90_cov_10.0", seq('G', 90)),
        ],
    );
    let mut params = RunParams::default();
    params.assembly_dir = assembly;
    params.outdir = tmp.path().join("04-Quants");
    params.group = String::from("G");
    params.kmer = 21;
    params.samples = vec![String::from("A"), String::from("B"), String::from("C")];
    (tmp, params)
}

#[test]
fn row_excluded_when_a_sample_misses() {
    let (_tmp, mut params) = setup();
    params.all_rows = true;
    let aligner = ScriptedAligner::new(vec![
        vec![psl_row("NODE_5_length_120_cov_10.0", 120, "NODE_1_length_100_cov_10.0", 100)],
        vec![],
    ]);
    let mut matcher = ContigMatcher::new(params, aligner).unwrap();
    let summary = matcher.run().unwrap();
    assert_eq!(summary.report.nb_common, 1);
    assert_eq!(summary.report.nb_complete, 0);
    assert_eq!(fs::read_to_string(&summary.table_path).unwrap(), "CID\tA\tB\tC\n");
    assert_eq!(fs::read_to_string(&summary.fasta_path).unwrap(), "");
    let all = fs::read_to_string(matcher.get_layout().all_rows_table_path()).unwrap();
    assert_eq!(all, "CID\tA\tB\tC\n000001\t1\t5\tNF\n");
}

#[test]
fn row_reported_when_all_samples_match() {
    let (_tmp, params) = setup();
    let aligner = ScriptedAligner::new(vec![
        vec![psl_row("NODE_5_length_120_cov_10.0", 120, "NODE_1_length_100_cov_10.0", 100)],
        vec![
            psl_row("NODE_9_length_90_cov_10.0", 90, "NODE_000001", 120),
            // second hit of the same query contig is ignored
            psl_row("NODE_9_length_90_cov_10.0", 90, "NODE_000001", 120),
        ],
    ]);
    let mut matcher = ContigMatcher::new(params, aligner).unwrap();
    let summary = matcher.run().unwrap();
    //
    assert_eq!(summary.passes.len(), 2);
    assert_eq!(summary.passes[1].nb_duplicates, 1);
    assert_eq!(summary.report.nb_complete, 1);
    assert_eq!(
        fs::read_to_string(&summary.table_path).unwrap(),
        "CID\tA\tB\tC\n000001\t1\t5\t9\n"
    );
    assert_eq!(
        fs::read_to_string(&summary.fasta_path).unwrap(),
        format!(">CNODE_000001\n{}\n", seq('C', 120))
    );
    // parameters of the run are kept with outputs
    assert!(matcher.get_layout().get_group_dir().join("parameters.json").exists());
}

#[test]
fn later_passes_align_on_consolidated_fasta() {
    let (_tmp, params) = setup();
    let target_fasta = params.assembly_dir.join("A-21").join("contigs-afg.fa");
    let aligner = ScriptedAligner::new(vec![
        vec![psl_row("NODE_5", 120, "NODE_1", 100)],
        vec![psl_row("NODE_9", 90, "NODE_000001", 120)],
    ]);
    let mut matcher = ContigMatcher::new(params, aligner).unwrap();
    matcher.run().unwrap();
    let layout = matcher.get_layout().clone();
    let calls = &matcher_aligner_calls(matcher);
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, target_fasta);
    assert_eq!(calls[0].2, layout.alignment_path(1));
    assert_eq!(calls[1].0, layout.build_fasta_path());
    assert_eq!(calls[1].2, layout.alignment_path(2));
    assert!(layout.alignment_path(2).exists());
}

fn matcher_aligner_calls(matcher: ContigMatcher<ScriptedAligner>) -> Vec<(PathBuf, PathBuf, PathBuf)> {
    matcher.into_aligner().calls
}

#[test]
fn aligner_failure_aborts_run() {
    let (_tmp, params) = setup();
    let mut matcher = ContigMatcher::new(params, BrokenAligner).unwrap();
    let res = matcher.run();
    assert!(matches!(res, Err(ContigMatchError::AlignerFailed { .. })));
    assert!(!matcher.get_layout().table_path().exists());
}

#[test]
fn missing_sample_file_aborts_before_any_output() {
    let (_tmp, mut params) = setup();
    params.samples.push(String::from("D"));
    let mut matcher = ContigMatcher::new(params, ScriptedAligner::new(vec![])).unwrap();
    let res = matcher.run();
    assert!(matches!(res, Err(ContigMatchError::MissingInput(_))));
    assert!(!matcher.get_layout().get_group_dir().exists());
}

#[test]
fn single_sample_rejected() {
    let (_tmp, mut params) = setup();
    params.samples.truncate(1);
    let res = ContigMatcher::new(params, BrokenAligner);
    assert!(matches!(res, Err(ContigMatchError::TooFewSamples(1))));
}
