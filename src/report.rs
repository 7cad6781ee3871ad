//! Final outputs : contig table and fasta of common contigs found in all samples.
//!
//! The table is tab separated, header CID then samples in input order.
//! A common id gets a row only if every sample has a match, a missing entry and NF are the same thing.

use std::path::Path;

use csv::WriterBuilder;

use crate::contigs::write_fasta_records;
use crate::errors::{ContigMatchError, Result};
use crate::merge::{CommonId, MergeAccumulator};
use crate::samples::SampleSet;
use crate::utils::files::write_atomically;

/// counts of a report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// nb of common ids created during the run
    pub nb_common : usize,
    /// nb of common ids found in all samples
    pub nb_complete : usize,
}

/// dumps a table, one row per cid. Missing entries are written as NF
fn write_table<I>(path : &Path, acc : &MergeAccumulator, samples : &SampleSet, ids : I) -> Result<usize>
where
    I: IntoIterator<Item = CommonId>,
{
    let table = acc.get_table();
    let mut nb_rows = 0;
    write_atomically(path, |out| {
        let to_err = |source: csv::Error| ContigMatchError::Table {
            path: path.to_path_buf(),
            source,
        };
        let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(out);
        let mut header = Vec::<&str>::with_capacity(samples.len() + 1);
        header.push("CID");
        header.extend(samples.get_all().iter().map(|s| s.as_str()));
        wtr.write_record(&header).map_err(to_err)?;
        for cid in ids {
            let mut record = Vec::<String>::with_capacity(samples.len() + 1);
            record.push(cid.to_string());
            record.extend(samples.get_all().iter().map(|s| table.get_display(cid, s)));
            wtr.write_record(&record).map_err(to_err)?;
            nb_rows += 1;
        }
        wtr.flush().map_err(|e| ContigMatchError::io(path, e))?;
        Ok(())
    })?;
    //
    return Ok(nb_rows);
} // end of write_table

/// Writes the table and fasta of common contigs matched in every sample.
/// Fasta records are named CNODE_cccccc.
pub fn write_report(
    acc : &MergeAccumulator,
    samples : &SampleSet,
    table_path : &Path,
    fasta_path : &Path,
) -> Result<ReportSummary> {
    let table = acc.get_table();
    let complete: Vec<CommonId> = table.complete_ids(samples.get_all()).collect();
    log::info!(
        "report : {} common contigs, {} found in all {} samples",
        table.len(),
        complete.len(),
        samples.len()
    );
    //
    write_table(table_path, acc, samples, complete.iter().copied())?;
    //
    let mut records = Vec::<(String, &[u8])>::with_capacity(complete.len());
    for cid in &complete {
        match acc.get_sequence(*cid) {
            Some(seq) => records.push((cid.report_name(), seq)),
            None => log::warn!("no consolidated sequence for common contig {}", cid),
        }
    }
    write_fasta_records(fasta_path, records)?;
    //
    let summary = ReportSummary { nb_common : table.len(), nb_complete : complete.len() };
    return Ok(summary);
} // end of write_report

/// Writes every common id, NF marking samples without match
pub fn write_all_rows(acc : &MergeAccumulator, samples : &SampleSet, path : &Path) -> Result<usize> {
    let ids: Vec<CommonId> = acc.get_table().ids().collect();
    log::info!("dumping all {} common contigs in {:?}", ids.len(), path);
    write_table(path, acc, samples, ids)
} // end of write_all_rows
