//! Runs a group : one alignment and merge pass per query sample, then the report.
//!
//! Passes are strictly sequential, the reference of a pass being the consolidated fasta of the previous one.
//! Any error aborts the run, the consolidated fasta of the last successful pass stays on disk.

use std::path::PathBuf;
use std::time::SystemTime;

use cpu_time::ProcessTime;

use crate::align::Aligner;
use crate::contigs::{write_fasta_records, ContigSet};
use crate::errors::{ContigMatchError, Result};
use crate::merge::{MergeAccumulator, PassSummary};
use crate::report::{write_all_rows, write_report, ReportSummary};
use crate::samples::SampleSet;
use crate::utils::files::{contig_fasta_path, OutputLayout};
use crate::utils::parameters::RunParams;

/// what a run produced
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub passes: Vec<PassSummary>,
    pub report: ReportSummary,
    pub table_path: PathBuf,
    pub fasta_path: PathBuf,
}

/// Drives the passes of a group with a given aligner
pub struct ContigMatcher<A: Aligner> {
    params: RunParams,
    samples: SampleSet,
    layout: OutputLayout,
    aligner: A,
}

impl<A: Aligner> ContigMatcher<A> {
    /// checks parameters and samples, nothing is written yet
    pub fn new(params: RunParams, aligner: A) -> Result<Self> {
        params.check()?;
        let samples = SampleSet::new(params.samples.clone())?;
        let layout = OutputLayout::new(&params.outdir, &params.group);
        Ok(ContigMatcher {
            params,
            samples,
            layout,
            aligner,
        })
    }

    pub fn get_layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// gives back the aligner, once runs are done
    pub fn into_aligner(self) -> A {
        self.aligner
    }

    fn sample_fasta(&self, sample: &str) -> PathBuf {
        contig_fasta_path(&self.params.assembly_dir, sample, self.params.kmer)
    }

    /// all input files must be there before we start writing anything
    fn check_inputs(&self) -> Result<()> {
        for sample in self.samples.get_all() {
            let path = self.sample_fasta(sample);
            if !path.is_file() {
                log::error!("no contig file for sample {} : {:?}", sample, path);
                return Err(ContigMatchError::MissingInput(path));
            }
        }
        Ok(())
    } // end of check_inputs

    pub fn run(&mut self) -> Result<RunSummary> {
        let start_t = SystemTime::now();
        let cpu_start = ProcessTime::now();
        //
        self.check_inputs()?;
        self.layout.create()?;
        self.params.dump_json(self.layout.get_group_dir())?;
        //
        let target = self.samples.get_target().to_string();
        let queries = self.samples.get_queries().to_vec();
        log::info!("comparing samples of group {}, target : {}, queries : {:?}", self.params.group, target, queries);
        //
        let mut acc = MergeAccumulator::new(&target, self.params.revcomp_minus);
        let mut passes = Vec::<PassSummary>::with_capacity(queries.len());
        let build_path = self.layout.build_fasta_path();
        let mut reference_path = self.sample_fasta(&target);
        //
        for (rank, query) in queries.iter().enumerate() {
            let pass = rank + 1;
            let query_path = self.sample_fasta(query);
            let psl_path = self.layout.alignment_path(pass);
            log::info!("pass {}, query : {}, reference : {:?}", pass, query, reference_path);
            //
            let hits = self.aligner.align(&reference_path, &query_path, &psl_path)?;
            let reference = ContigSet::from_file(&reference_path)?;
            let query_contigs = ContigSet::from_file(&query_path)?;
            let summary = acc.merge_pass(query, &hits, &reference, &query_contigs)?;
            log::info!(
                "pass {} : {} hits, {} used, {} duplicate query contigs, {} new common ids, {} consolidated sequences",
                pass,
                summary.nb_hits,
                summary.nb_used,
                summary.nb_duplicates,
                summary.nb_new_ids,
                summary.nb_sequences
            );
            // the consolidated fasta is completely rewritten at each pass
            let records = acc.consolidated().map(|(cid, seq)| (cid.node_name(), seq));
            write_fasta_records(&build_path, records)?;
            passes.push(summary);
            reference_path = build_path.clone();
        } // end of for on queries
        //
        let table_path = self.layout.table_path();
        let report = write_report(&acc, &self.samples, &table_path, &build_path)?;
        if self.params.all_rows {
            write_all_rows(&acc, &self.samples, &self.layout.all_rows_table_path())?;
        }
        //
        let cpu_time = cpu_start.elapsed().as_secs_f32();
        if let Ok(elapsed) = start_t.elapsed() {
            log::info!(
                "group {} done, elapsed time(s) {:.3}, cpu time(s) {:.3}",
                self.params.group,
                elapsed.as_secs_f32(),
                cpu_time
            );
        }
        //
        Ok(RunSummary {
            passes,
            report,
            table_path,
            fasta_path: build_path,
        })
    } // end of run
} // end of impl ContigMatcher
