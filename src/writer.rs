use std::io::Write;

use crate::error::Result;

/// A cluster's resolved output: the merged REF/ALT window and the
/// metadata carried over from the cluster's anchor variant.
pub struct ResolvedRecord<'a> {
    pub chrom: &'a str,
    pub pos: u64,
    pub id: &'a str,
    pub reference: &'a [u8],
    pub alts: &'a [Vec<u8>],
    pub suffix: &'a str,
}

/// Write one tab-delimited VCF data line for `record`.
pub fn write_record<W: Write>(w: &mut W, record: &ResolvedRecord) -> Result<()> {
    let alt = record
        .alts
        .iter()
        .map(|a| String::from_utf8_lossy(a))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(
        w,
        "{}\t{}\t{}\t{}\t{}\t{}",
        record.chrom,
        record.pos,
        record.id,
        String::from_utf8_lossy(record.reference),
        alt,
        record.suffix,
    )?;
    Ok(())
}

/// Write a single line unchanged: used for a cluster that never merges
/// (n == 1), which is re-emitted byte-for-byte rather than reconstructed
/// from its (possibly normalized) fields.
pub fn write_raw_line<W: Write>(w: &mut W, line: &str) -> Result<()> {
    writeln!(w, "{}", line)?;
    Ok(())
}
