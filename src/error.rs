use thiserror::Error;

/// Fatal and recoverable conditions raised while reading, normalizing or
/// combining a VCF stream.
///
/// `UnknownChrom` and `DuplicateChrom` are logged as warnings by their
/// callers and never propagated to `main`; every other variant is fatal
/// and terminates the process with a non-zero exit code.
#[derive(Error, Debug)]
pub enum VcfNormError {
    #[error("{0}")]
    BadArgs(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed VCF record: {0}")]
    BadRecord(String),

    #[error("malformed VCF header: {0}")]
    BadHeader(String),

    #[error("VCF not sorted: {chrom}:{pos} precedes cluster head at {head_pos}")]
    NotSorted {
        chrom: String,
        pos: u64,
        head_pos: u64,
    },

    #[error("REF extends past the end of {chrom} (pos {pos}, reflen {reflen}, chrom length {chrom_len})")]
    OutOfBounds {
        chrom: String,
        pos: u64,
        reflen: usize,
        chrom_len: usize,
    },
}

pub type Result<T> = std::result::Result<T, VcfNormError>;
