//! structures related to run parameters
//!
//! All parameters have defaults reproducing the historical hard coded run (group Mus-A2, kmer 21).
//! They can be read from a json file, overridden by command line and are dumped in the group
//! output directory so a run can be traced.

use std::fs::OpenOptions;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::to_writer_pretty;

use crate::errors::{ContigMatchError, Result};
use crate::utils::files::write_atomically;

/// name of the parameters dump in the group directory
pub const PARAMETERS_DUMP: &str = "parameters.json";

/// default identity threshold passed to blat (percent)
pub const DEFAULT_MIN_IDENTITY: u32 = 96;

//===========================================================

/// How we call the external aligner
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignerParams {
    /// executable name or path
    pub command : String,
    /// minimum identity in percent, passed as -minIdentity=
    pub min_identity : u32,
    /// other flags inserted before positional arguments
    pub extra_args : Vec<String>,
}

impl Default for AlignerParams {
    fn default() -> Self {
        AlignerParams {
            command: String::from("blat"),
            min_identity: DEFAULT_MIN_IDENTITY,
            extra_args: Vec::new(),
        }
    }
} // end of default for AlignerParams

//======================================================================================

/// Gathers all parameters of a group run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParams {
    /// directory containing one sub directory sample-kmer per assembled sample
    pub assembly_dir : PathBuf,
    /// group name, used to name output directory and files
    pub group : String,
    /// kmer size used by the assembler, part of assembly directory names
    pub kmer : usize,
    /// ordered samples. first is the target
    pub samples : Vec<String>,
    /// root of outputs. Outputs go in outdir/group
    pub outdir : PathBuf,
    /// aligner invocation
    pub aligner : AlignerParams,
    /// reverse complement query sequences of minus strand hits when they are kept as common sequence
    pub revcomp_minus : bool,
    /// also dump the table with all common ids, NF marking samples without a match
    pub all_rows : bool,
}

impl Default for RunParams {
    fn default() -> Self {
        RunParams {
            assembly_dir: PathBuf::from("03-Assembly"),
            group: String::from("Mus-A2"),
            kmer: 21,
            samples: vec![String::from("MusA2a"), String::from("MusA2b")],
            outdir: PathBuf::from("04-Quants"),
            aligner: AlignerParams::default(),
            revcomp_minus: false,
            all_rows: false,
        }
    }
} // end of default for RunParams

impl RunParams {
    /// checks values that would make a run meaningless
    pub fn check(&self) -> Result<()> {
        if self.group.is_empty() {
            return Err(ContigMatchError::Config(String::from("group name is empty")));
        }
        if self.kmer == 0 {
            return Err(ContigMatchError::Config(String::from("kmer size must be > 0")));
        }
        if self.aligner.min_identity > 100 {
            return Err(ContigMatchError::Config(format!(
                "min identity must be a percentage, got {}",
                self.aligner.min_identity
            )));
        }
        if self.aligner.command.is_empty() {
            return Err(ContigMatchError::Config(String::from("aligner command is empty")));
        }
        Ok(())
    } // end of check

    /// dumps parameters in dirpath/parameters.json, through a temporary file as every output
    pub fn dump_json(&self, dirpath: &Path) -> Result<()> {
        //
        let filepath = dirpath.join(PARAMETERS_DUMP);
        //
        log::info!("dumping RunParams in json file : {:?}", filepath);
        //
        write_atomically(&filepath, |out| {
            to_writer_pretty(out, &self).map_err(|e| {
                log::error!("RunParams dump : could not write {:?}", filepath.as_os_str());
                ContigMatchError::Config(format!("RunParams dump failed : {}", e))
            })
        })?;
        //
        return Ok(());
    } // end of dump_json

    /// reload from a json file. Missing fields get their default value.
    pub fn reload_json(filepath: &Path) -> Result<Self> {
        log::info!("in reload_json, file : {:?}", filepath);
        //
        if !filepath.exists() {
            log::error!("RunParams reload_json : no file {:?}", filepath.as_os_str());
            return Err(ContigMatchError::MissingInput(filepath.to_path_buf()));
        }
        let loadfile = OpenOptions::new()
            .read(true)
            .open(filepath)
            .map_err(|e| ContigMatchError::io(filepath, e))?;
        let reader = BufReader::new(loadfile);
        let params: Self = serde_json::from_reader(reader).map_err(|e| {
            ContigMatchError::Config(format!("could not decode {:?} : {}", filepath, e))
        })?;
        //
        log::info!(
            "RunParams reload, group : {}, nb samples : {}",
            params.group,
            params.samples.len()
        );
        //
        Ok(params)
    } // end of reload_json
} // end of impl RunParams

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_historical_run() {
        let params = RunParams::default();
        assert_eq!(params.group, "Mus-A2");
        assert_eq!(params.kmer, 21);
        assert_eq!(params.samples, vec!["MusA2a", "MusA2b"]);
        assert_eq!(params.aligner.command, "blat");
        assert_eq!(params.aligner.min_identity, 96);
        assert!(params.check().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{"group": "G", "samples": ["A", "B", "C"], "aligner": {"min_identity": 90}}"#)
            .unwrap();
        let params = RunParams::reload_json(&path).unwrap();
        assert_eq!(params.group, "G");
        assert_eq!(params.samples.len(), 3);
        assert_eq!(params.kmer, 21);
        assert_eq!(params.aligner.min_identity, 90);
        assert_eq!(params.aligner.command, "blat");
    }

    #[test]
    fn dump_then_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut params = RunParams::default();
        params.group = String::from("G");
        params.revcomp_minus = true;
        params.dump_json(dir.path()).unwrap();
        let reloaded = RunParams::reload_json(&dir.path().join(PARAMETERS_DUMP)).unwrap();
        assert_eq!(params, reloaded);
    }

    // a dump that cannot reach the disk must not be reported as done
    #[cfg(target_os = "linux")]
    #[test]
    fn dump_on_full_device_fails() {
        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join(format!("{}.tmp", PARAMETERS_DUMP));
        std::os::unix::fs::symlink("/dev/full", &tmp).unwrap();
        //
        let res = RunParams::default().dump_json(dir.path());
        assert!(res.is_err());
        assert!(!dir.path().join(PARAMETERS_DUMP).exists());
    }

    #[test]
    fn bad_identity_rejected() {
        let mut params = RunParams::default();
        params.aligner.min_identity = 120;
        assert!(matches!(params.check(), Err(ContigMatchError::Config(_))));
    }

    #[test]
    fn missing_config_file() {
        let res = RunParams::reload_json(Path::new("/nonexistent/run.json"));
        assert!(matches!(res, Err(ContigMatchError::MissingInput(_))));
    }
}
