use std::io::{BufRead, Write};

use log::warn;

use crate::cluster::ClusterAccumulator;
use crate::enumerate::{build_window, enumerate_genotypes};
use crate::error::{Result, VcfNormError};
use crate::linear::merge_cluster;
use crate::normalize::normalize;
use crate::reference::ReferenceIndex;
use crate::variant::{parse_data_line, truncate_sample_columns, Variant};
use crate::writer::{write_raw_line, write_record, ResolvedRecord};

/// Stream `reader` through header passthrough, `k`-base clustering on raw
/// coordinates, and (once a cluster closes) normalization followed by
/// either the combinatorial enumerator or the two-variant linear merge,
/// writing the resolved stream to `writer`.
pub fn run<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    refidx: &ReferenceIndex,
    k: u64,
    linear: bool,
) -> Result<()> {
    let mut header_seen = false;
    let mut acc = ClusterAccumulator::new(k);

    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix('#') {
            if rest.starts_with("CHROM") {
                writeln!(writer, "{}", truncate_sample_columns(&line))?;
                header_seen = true;
            } else {
                writeln!(writer, "{}", line)?;
            }
            continue;
        }

        if !header_seen {
            return Err(VcfNormError::BadHeader(
                "data record precedes #CHROM header".to_string(),
            ));
        }

        let variant = parse_data_line(&line)?;

        if !refidx.contains(&variant.chrom) {
            warn!("unknown chromosome '{}', passing record through", variant.chrom);
            writeln!(writer, "{}", line)?;
            continue;
        }
        // Checked on the raw, pre-normalization reflen: normalization only
        // ever trims REF, so this is the tighter (and sufficient) bound.
        check_bounds(&variant, refidx)?;

        // Clustering groups on raw, pre-normalization coordinates -- the
        // same footprint the upstream VCF declares -- deferring
        // normalization to flush time, once a cluster's full membership
        // is known.
        if let Some(cluster) = acc.push(variant)? {
            flush_cluster(cluster, refidx, linear, &mut writer)?;
        }
    }

    if let Some(cluster) = acc.finish() {
        flush_cluster(cluster, refidx, linear, &mut writer)?;
    }

    Ok(())
}

fn check_bounds(variant: &Variant, refidx: &ReferenceIndex) -> Result<()> {
    let chrom_len = refidx.len_of(&variant.chrom).unwrap_or(0);
    let end = variant.pos + variant.reflen() as u64 - 1;
    if variant.reflen() > 0 && end as usize > chrom_len {
        return Err(VcfNormError::OutOfBounds {
            chrom: variant.chrom.clone(),
            pos: variant.pos,
            reflen: variant.reflen(),
            chrom_len,
        });
    }
    Ok(())
}

fn flush_cluster<W: Write>(
    mut cluster: Vec<Variant>,
    refidx: &ReferenceIndex,
    linear: bool,
    writer: &mut W,
) -> Result<()> {
    for v in cluster.iter_mut() {
        normalize(v);
    }
    // A variant whose every ALT normalized away to match REF has nothing
    // left to report.
    cluster.retain(|v| !v.alts.is_empty());
    if cluster.is_empty() {
        return Ok(());
    }

    // A cluster that never merges (whether it started as a singleton, or
    // shrank to one survivor above) is re-emitted exactly as read -- no
    // normalization, no window widening, no padding base -- per the
    // identity requirement for n == 1.
    if cluster.len() == 1 {
        return write_raw_line(writer, &cluster[0].raw);
    }

    if linear {
        let merged = merge_cluster(&cluster, refidx);
        write_record(writer, &merged.as_record())
    } else {
        // Metadata is carried over from the first variant as read, before
        // the cluster is reordered below for the enumerator.
        let id = cluster[0].id.clone();
        let suffix = cluster[0].suffix.clone();

        // Left-trim during normalization can push a variant's pos past a
        // later-arriving neighbor's; the enumerator's compatibility scan
        // assumes ascending (pos, reflen), so the cluster must be
        // re-sorted here, same as the original `vset_merge`'s
        // `vars_sort` call after trimming.
        cluster.sort_by_key(|v| (v.pos, v.reflen()));

        let window = build_window(&cluster, refidx);
        let genotypes = enumerate_genotypes(&cluster, &window);
        let pos = if window.start == 0 { 1 } else { window.start };
        let record = ResolvedRecord {
            chrom: &window.chrom,
            pos,
            id: &id,
            reference: &window.reference,
            alts: &genotypes,
            suffix: &suffix,
        };
        write_record(writer, &record)
    }
}
