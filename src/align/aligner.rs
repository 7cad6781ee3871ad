//! Aligner abstraction and the blat implementation

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::SystemTime;

use crate::errors::{ContigMatchError, Result};
use crate::utils::parameters::AlignerParams;

use super::psl::{read_psl_hits, AlignmentHit};

/// Aligns the contigs of query file against the contigs of reference file.
/// Implementations must leave their raw output in output and return the gapless hits in output order.
pub trait Aligner {
    fn align(&mut self, reference: &Path, query: &Path, output: &Path) -> Result<Vec<AlignmentHit>>;
}

/// runs blat -minIdentity=nn [extra args] reference query output
pub struct BlatAligner {
    params: AlignerParams,
}

impl BlatAligner {
    pub fn new(params: AlignerParams) -> Self {
        BlatAligner { params }
    }

    /// the command as it will be launched
    pub fn command(&self, reference: &Path, query: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.params.command);
        cmd.arg(format!("-minIdentity={}", self.params.min_identity))
            .args(&self.params.extra_args)
            .arg(reference)
            .arg(query)
            .arg(output);
        cmd
    }
} // end of impl BlatAligner

impl Aligner for BlatAligner {
    fn align(&mut self, reference: &Path, query: &Path, output: &Path) -> Result<Vec<AlignmentHit>> {
        let mut cmd = self.command(reference, query, output);
        log::info!("running {:?}", cmd);
        // blat chatters on stdout, we keep it only when debugging
        if !log::log_enabled!(log::Level::Debug) {
            cmd.stdout(Stdio::null());
        }
        let start_t = SystemTime::now();
        let status = cmd.status().map_err(|source| ContigMatchError::AlignerSpawn {
            command: self.params.command.clone(),
            source,
        })?;
        if !status.success() {
            log::error!("{} failed : {}", self.params.command, status);
            return Err(ContigMatchError::AlignerFailed {
                command: self.params.command.clone(),
                status: status.to_string(),
            });
        }
        if let Ok(elapsed) = start_t.elapsed() {
            log::debug!("{} done in {} ms", self.params.command, elapsed.as_millis());
        }
        read_psl_hits(output)
    } // end of align
} // end of impl Aligner for BlatAligner
