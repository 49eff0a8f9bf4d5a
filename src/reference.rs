use std::collections::HashMap;
use std::fs::File;
use std::io::{stdin, BufRead, BufReader};
use std::path::Path;

use bio::io::fasta;
use log::warn;

use crate::error::{Result, VcfNormError};

fn open_fasta_source<T: AsRef<Path>>(path: &T) -> Result<Box<dyn BufRead>> {
    if path.as_ref() == Path::new("-") {
        Ok(Box::new(BufReader::new(stdin())))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

/// In-memory index of one or more FASTA files, keyed by sequence name
/// (the record id, i.e. everything before the first whitespace on the
/// `>` line). Holds full sequences rather than an mmap'd/streamed view:
/// this crate is built for per-chromosome clusters, not whole-genome
/// random access, and chromosomes are visited once each in sorted order.
pub struct ReferenceIndex {
    chroms: HashMap<String, Vec<u8>>,
}

impl ReferenceIndex {
    /// Load and concatenate every record from each path in `paths`. A
    /// sequence name seen in more than one file logs a warning and keeps
    /// the first occurrence (matching the `DuplicateChrom` recoverable
    /// condition).
    pub fn load<T: AsRef<Path>>(paths: &[T]) -> Result<Self> {
        let mut chroms = HashMap::new();
        for path in paths {
            let reader = fasta::Reader::new(open_fasta_source(path)?);
            for result in reader.records() {
                let record = result.map_err(|e| {
                    VcfNormError::BadRecord(format!(
                        "malformed FASTA record in '{}': {}",
                        path.as_ref().display(),
                        e
                    ))
                })?;
                let id = record.id().to_string();
                if chroms.contains_key(&id) {
                    warn!("duplicate chromosome '{}', keeping first occurrence", id);
                    continue;
                }
                chroms.insert(id, record.seq().to_owned());
            }
        }
        Ok(ReferenceIndex { chroms })
    }

    pub fn len_of(&self, chrom: &str) -> Option<usize> {
        self.chroms.get(chrom).map(Vec::len)
    }

    pub fn contains(&self, chrom: &str) -> bool {
        self.chroms.contains_key(chrom)
    }

    /// Fetch the base at a 1-based position.
    pub fn base_at(&self, chrom: &str, pos: u64) -> Option<u8> {
        self.chroms
            .get(chrom)
            .and_then(|seq| seq.get((pos - 1) as usize).copied())
    }

    /// Fetch a 1-based, inclusive `[start, end]` slice.
    pub fn slice(&self, chrom: &str, start: u64, end: u64) -> Option<&[u8]> {
        let seq = self.chroms.get(chrom)?;
        if start == 0 || start > end {
            return None;
        }
        seq.get((start - 1) as usize..end as usize)
    }

    /// The padding base used to anchor an indel-only window: the base
    /// immediately before `pos`, or the literal `N` if `pos` is 1 (there
    /// is nothing upstream to borrow from).
    pub fn pad_base(&self, chrom: &str, pos: u64) -> u8 {
        if pos <= 1 {
            b'N'
        } else {
            self.base_at(chrom, pos - 1).unwrap_or(b'N')
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fasta(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_and_indexes_sequences() {
        let dir = std::env::temp_dir();
        let path = write_fasta(&dir, "refidx_test1.fa", ">chr1 some description\nACGTACGT\n");
        let idx = ReferenceIndex::load(&[path]).unwrap();
        assert!(idx.contains("chr1"));
        assert_eq!(idx.len_of("chr1"), Some(8));
        assert_eq!(idx.base_at("chr1", 1), Some(b'A'));
        assert_eq!(idx.base_at("chr1", 8), Some(b'T'));
        assert_eq!(idx.slice("chr1", 2, 4), Some(&b"CGT"[..]));
    }

    #[test]
    fn pad_base_falls_back_to_n_at_window_start() {
        let dir = std::env::temp_dir();
        let path = write_fasta(&dir, "refidx_test2.fa", ">chr1\nACGT\n");
        let idx = ReferenceIndex::load(&[path]).unwrap();
        assert_eq!(idx.pad_base("chr1", 1), b'N');
        assert_eq!(idx.pad_base("chr1", 2), b'A');
    }
}
