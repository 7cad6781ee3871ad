//! nucleotide helpers

#[inline]
fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'a' => b't',
        b't' => b'a',
        b'c' => b'g',
        b'g' => b'c',
        // N and other IUPAC symbols are kept as is
        other => other,
    }
} // end of complement

/// reverse complement of a dna sequence. Only ACGT (either case) are complemented.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|b| complement(*b)).collect()
}
