//! This file contains file naming of inputs and outputs and the atomic rewrite of output files

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::errors::{ContigMatchError, Result};

/// name of contig file in each sample assembly directory
pub const CONTIG_FILE: &str = "contigs-afg.fa";

/// returns the contig file of a sample : assembly_dir/sample-kmer/contigs-afg.fa
pub fn contig_fasta_path(assembly_dir: &Path, sample: &str, kmer: usize) -> PathBuf {
    assembly_dir
        .join(format!("{}-{}", sample, kmer))
        .join(CONTIG_FILE)
} // end of contig_fasta_path

/// Paths of everything a group run writes, all in outdir/group
#[derive(Clone, Debug)]
pub struct OutputLayout {
    group: String,
    group_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(outdir: &Path, group: &str) -> Self {
        OutputLayout {
            group: group.to_string(),
            group_dir: outdir.join(group),
        }
    }

    /// creates the group directory (and outdir if necessary)
    pub fn create(&self) -> Result<()> {
        fs::create_dir_all(&self.group_dir).map_err(|e| ContigMatchError::io(&self.group_dir, e))
    }

    pub fn get_group_dir(&self) -> &Path {
        &self.group_dir
    }

    /// psl output of a pass, pass numbering starts at 1
    pub fn alignment_path(&self, pass: usize) -> PathBuf {
        self.group_dir.join(format!("00-blatout-{}.psl", pass))
    }

    /// consolidated fasta, rewritten at each pass and finally replaced by the report fasta
    pub fn build_fasta_path(&self) -> PathBuf {
        self.group_dir
            .join(format!("CommonContigBuild-{}.fa", self.group))
    }

    pub fn table_path(&self) -> PathBuf {
        self.group_dir.join(format!("ContigTable-{}.txt", self.group))
    }

    /// table with every common id, complete or not
    pub fn all_rows_table_path(&self) -> PathBuf {
        self.group_dir
            .join(format!("ContigTable-{}.all.txt", self.group))
    }
} // end of impl OutputLayout

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Writes a file through path.tmp and renames it to path once fill succeeded,
/// so path is never left half written. On error the temporary file is removed.
pub fn write_atomically<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let tmp = tmp_path(path);
    log::trace!("writing {:?} through {:?}", path, tmp);
    //
    let res = File::create(&tmp)
        .map_err(|e| ContigMatchError::io(&tmp, e))
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            fill(&mut writer)?;
            writer.flush().map_err(|e| ContigMatchError::io(&tmp, e))
        });
    match res {
        Ok(()) => fs::rename(&tmp, path).map_err(|e| ContigMatchError::io(path, e)),
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
} // end of write_atomically
