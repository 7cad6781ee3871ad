//! ordered samples of a group : the first one is the target, the others are queried in order

use std::collections::HashSet;

use crate::errors::{ContigMatchError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleSet {
    samples: Vec<String>,
}

impl SampleSet {
    /// needs at least 2 distinct samples
    pub fn new(samples: Vec<String>) -> Result<Self> {
        if samples.len() < 2 {
            return Err(ContigMatchError::TooFewSamples(samples.len()));
        }
        let mut seen = HashSet::<&str>::with_capacity(samples.len());
        for s in &samples {
            if !seen.insert(s.as_str()) {
                return Err(ContigMatchError::DuplicateSample(s.clone()));
            }
        }
        Ok(SampleSet { samples })
    } // end of new

    /// splits a whitespace separated list, as "MusA2a MusA2b"
    pub fn from_list(list: &str) -> Result<Self> {
        Self::new(list.split_whitespace().map(String::from).collect())
    }

    pub fn get_target(&self) -> &str {
        &self.samples[0]
    }

    /// samples to align on the reference, in processing order
    pub fn get_queries(&self) -> &[String] {
        &self.samples[1..]
    }

    /// all samples in input order, target first
    pub fn get_all(&self) -> &[String] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }
} // end of impl SampleSet
