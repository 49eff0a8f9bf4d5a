use std::io::{BufRead, Write};

use log::warn;

use crate::error::Result;
use crate::reference::ReferenceIndex;

/// Standalone pass that keeps only biallelic records whose REF — or,
/// with `swap`, whose ALT — matches the loaded reference at that
/// position. Unlike `combine`, header lines (anything starting with `#`)
/// pass through byte-for-byte, sample columns included: this tool never
/// touches genotypes, so there is nothing to truncate.
///
/// Independent of the cluster accumulator and enumerator; it never
/// normalizes or merges records, only drops or rewrites them in place.
pub fn run<R: BufRead, W: Write>(reader: R, mut writer: W, refidx: &ReferenceIndex, swap: bool) -> Result<()> {
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            writeln!(writer, "{}", line)?;
            continue;
        }
        if let Some(rewritten) = filter_line(&line, refidx, swap) {
            writeln!(writer, "{}", rewritten)?;
        }
    }
    Ok(())
}

fn filter_line(line: &str, refidx: &ReferenceIndex, swap: bool) -> Option<String> {
    let mut cols: Vec<&str> = line.splitn(9, '\t').collect();
    if cols.len() < 5 {
        warn!("skipping malformed ref-filter line: '{}'", line);
        return None;
    }

    let chrom = cols[0];
    let pos: u64 = match cols[1].parse() {
        Ok(p) => p,
        Err(_) => {
            warn!("skipping line with unparseable POS: '{}'", line);
            return None;
        }
    };
    let reference = cols[3];
    let alt = cols[4];

    if alt.contains(',') {
        warn!("dropping multiallelic record at {}:{}", chrom, pos);
        return None;
    }
    if !refidx.contains(chrom) {
        warn!("unknown chromosome '{}', dropping record", chrom);
        return None;
    }

    let genome_slice = refidx.slice(chrom, pos, pos + reference.len() as u64 - 1);
    let ref_matches = genome_slice
        .map(|s| s.eq_ignore_ascii_case(reference.as_bytes()))
        .unwrap_or(false);

    if ref_matches {
        return Some(line.to_string());
    }

    if swap {
        let alt_slice = refidx.slice(chrom, pos, pos + alt.len() as u64 - 1);
        let alt_matches = alt_slice
            .map(|s| s.eq_ignore_ascii_case(alt.as_bytes()))
            .unwrap_or(false);
        if alt_matches {
            cols[3] = alt;
            cols[4] = reference;
            return Some(cols.join("\t"));
        }
    }

    warn!("dropping record not matching reference at {}:{}", chrom, pos);
    None
}
