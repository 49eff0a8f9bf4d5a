use crate::reference::ReferenceIndex;
use crate::variant::Variant;

/// Does `v` have at least one empty allele, i.e. is it a deletion or an
/// insertion (REF or an ALT with zero length)? Such variants need an
/// anchor base prepended, borrowed from one position upstream, when they
/// take part in a combinatorial window.
fn is_indel(v: &Variant) -> bool {
    v.reference.is_empty() || v.alts.iter().any(|a| a.is_empty())
}

/// A cluster's variants projected onto a single shared reference window:
/// absolute genome coordinates translated to 0-based offsets into
/// `reference`, with indel variants anchored one base upstream so their
/// alt alleles read as valid VCF (a shared base, then the change).
pub struct ClusterWindow {
    pub chrom: String,
    /// 0-based offset, relative to the window, of each variant's span.
    /// Parallel to the cluster's variant slice.
    pub offsets: Vec<usize>,
    /// Span length, in window bytes, of each variant (includes the
    /// anchor base for indels). Parallel to `offsets`.
    pub spans: Vec<usize>,
    /// The literal reference bases spanning every variant in the cluster,
    /// uppercased. Index 0 corresponds to `start`.
    pub reference: Vec<u8>,
    /// Absolute 1-based position corresponding to `reference[0]`. A
    /// leading synthetic `N` (when an indel sits at position 1, with no
    /// real upstream base to borrow) is still covered by `reference[0]`,
    /// but does not correspond to a real reference coordinate.
    pub start: u64,
}

/// Lay a cluster of (already left/right-trimmed) variants onto one
/// contiguous reference window, applying the one-base upstream anchor to
/// any indel so its alt allele carries a shared base before the change.
pub fn build_window(cluster: &[Variant], refidx: &ReferenceIndex) -> ClusterWindow {
    let chrom = cluster[0].chrom.clone();

    // Absolute, padded [start, end) per variant, end always exclusive.
    // `v.pos` is always >= 1, so `v.pos - 1` never underflows; a result of
    // 0 means the indel sits at the very first base of the chromosome,
    // with no real upstream base to anchor on.
    let mut starts = Vec::with_capacity(cluster.len());
    let mut ends = Vec::with_capacity(cluster.len());
    for v in cluster {
        let end = v.pos + v.reflen() as u64;
        let start = if is_indel(v) { v.pos - 1 } else { v.pos };
        starts.push(start);
        ends.push(end);
    }

    let min_start = *starts.iter().min().unwrap();
    let max_end = *ends.iter().max().unwrap();
    let needs_origin_pad = min_start == 0;

    let mut reference = if needs_origin_pad {
        let mut buf = vec![refidx.pad_base(&chrom, 1)];
        buf.extend(refidx.slice(&chrom, 1, max_end - 1).unwrap_or(&[]));
        buf
    } else {
        refidx
            .slice(&chrom, min_start, max_end - 1)
            .unwrap_or(&[])
            .to_vec()
    };
    reference.make_ascii_uppercase();

    let offsets = starts
        .iter()
        .map(|s| (*s - min_start) as usize)
        .collect::<Vec<_>>();
    let spans = starts
        .iter()
        .zip(ends.iter())
        .map(|(s, e)| (*e - *s) as usize)
        .collect();

    ClusterWindow {
        chrom,
        offsets,
        spans,
        reference,
        start: min_start,
    }
}

/// Are `a` and `b` (in ascending position order) compatible as members of
/// the same haplotype? Their spans must not overlap, and two pure
/// insertions cannot share an anchor position.
fn compatible(
    a_end: usize,
    a_is_ins: bool,
    a_offset: usize,
    b_offset: usize,
    b_is_ins: bool,
) -> bool {
    a_end <= b_offset && !(a_is_ins && b_is_ins && a_offset == b_offset)
}

/// Enumerate every maximal compatible subset of `window`'s variants (as
/// selected by a bitmask of the half-open range `1..2^n`) and materialize
/// each one's full-window allele string. The mask never includes 0 (no
/// variant selected): that case is the REF allele itself and is not an
/// ALT. Callers only run clusters with 2 or more variants through this
/// path — a singleton cluster has nothing to combine and is emitted
/// unchanged by the driver.
///
/// Incompatible prefixes are skipped in bulk rather than walked one mask
/// at a time: variant `i` is assigned bit `n-1-i`, so a conflict
/// discovered while scanning variants in position order (the scan walks
/// bits from most to least significant) lets the whole remaining span of
/// masks that share that conflicting prefix be skipped by jumping the
/// counter forward by the power of two at the conflicting bit.
pub fn enumerate_genotypes(cluster: &[Variant], window: &ClusterWindow) -> Vec<Vec<u8>> {
    let n = cluster.len();
    debug_assert!(n >= 2, "enumerate_genotypes expects a multi-variant cluster");

    let is_ins: Vec<bool> = cluster.iter().map(|v| v.is_pure_insertion()).collect();
    let is_indel: Vec<bool> = cluster.iter().map(is_indel).collect();
    let ends: Vec<usize> = (0..n).map(|i| window.offsets[i] + window.spans[i]).collect();

    let mut genotypes: Vec<Vec<u8>> = Vec::new();
    let max: u64 = 1u64 << n;
    let mut mask: u64 = 1;

    while mask < max {
        let mut set: Vec<usize> = Vec::with_capacity(n);
        let mut conflict_bit: Option<usize> = None;

        for i in 0..n {
            let bit = n - 1 - i;
            if mask & (1 << bit) == 0 {
                continue;
            }
            match set.last() {
                None => set.push(i),
                Some(&prev) => {
                    if compatible(ends[prev], is_ins[prev], window.offsets[prev], window.offsets[i], is_ins[i])
                    {
                        set.push(i);
                    } else {
                        conflict_bit = Some(bit);
                        break;
                    }
                }
            }
        }

        match conflict_bit {
            Some(bit) => mask += 1 << bit,
            None => {
                for alleles in cartesian_alleles(&set, cluster) {
                    genotypes.push(materialize(window, &alleles, &is_indel));
                }
                mask += 1;
            }
        }
    }

    genotypes.sort();
    genotypes.dedup();
    genotypes
}

/// All ways of assigning one ALT allele to each variant in `set` (the
/// REF base itself is never re-offered for a selected variant, since a
/// selected variant is by definition changed).
fn cartesian_alleles<'v>(set: &[usize], cluster: &'v [Variant]) -> Vec<Vec<(usize, &'v [u8])>> {
    let mut combos: Vec<Vec<(usize, &[u8])>> = vec![Vec::new()];
    for &idx in set {
        let alts = &cluster[idx].alts;
        let mut next = Vec::with_capacity(combos.len() * alts.len());
        for combo in &combos {
            for alt in alts {
                let mut c = combo.clone();
                c.push((idx, alt.as_slice()));
                next.push(c);
            }
        }
        combos = next;
    }
    combos
}

/// Stitch one allele string for the whole window: literal reference in
/// the gaps, each selected variant's chosen alt allele where its span
/// sits, ordered by window offset (the caller always supplies `alleles`
/// sorted by variant index, which is itself position-sorted).
///
/// An indel's span starts one base upstream of its real change (the
/// anchor base `build_window` borrowed so the alt reads as valid VCF),
/// but its stored alt allele was trimmed of that same base during
/// normalization. So the anchor byte is re-inserted here, straight from
/// the window, between the literal-reference gap and the alt.
fn materialize(window: &ClusterWindow, alleles: &[(usize, &[u8])], is_indel: &[bool]) -> Vec<u8> {
    let mut out = Vec::with_capacity(window.reference.len());
    let mut cursor = 0usize;
    for &(idx, alt) in alleles {
        let start = window.offsets[idx];
        let end = start + window.spans[idx];
        if start > cursor {
            out.extend_from_slice(&window.reference[cursor..start]);
        }
        if is_indel[idx] {
            out.push(window.reference[start]);
        }
        out.extend_from_slice(alt);
        cursor = end;
    }
    if cursor < window.reference.len() {
        out.extend_from_slice(&window.reference[cursor..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::parse_data_line;
    use std::fs::File;
    use std::io::Write;

    fn ref_index(name: &str, contents: &str) -> ReferenceIndex {
        let dir = std::env::temp_dir();
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        ReferenceIndex::load(&[path]).unwrap()
    }

    #[test]
    fn two_independent_snps_produce_three_alt_haplotypes() {
        let refidx = ref_index("enum_test2.fa", ">c1\nAAAAAAAA\n");
        let v1 = parse_data_line("c1\t2\t.\tA\tC\t.\t.\t.\t.").unwrap();
        let v2 = parse_data_line("c1\t4\t.\tA\tG\t.\t.\t.\t.").unwrap();
        let cluster = vec![v1, v2];
        let window = build_window(&cluster, &refidx);
        let gts = enumerate_genotypes(&cluster, &window);
        // The reference-only combination (mask 0) is never an ALT.
        assert_eq!(gts.len(), 3);
        assert!(gts.contains(&b"CAA".to_vec()));
        assert!(gts.contains(&b"AAG".to_vec()));
        assert!(gts.contains(&b"CAG".to_vec()));
    }

    #[test]
    fn overlapping_variants_never_cooccur() {
        let refidx = ref_index("enum_test3.fa", ">c1\nAAAAAAAA\n");
        // Both span position 2-3: can never both be selected.
        let v1 = parse_data_line("c1\t2\t.\tAA\tC\t.\t.\t.\t.").unwrap();
        let v2 = parse_data_line("c1\t2\t.\tAA\tG\t.\t.\t.\t.").unwrap();
        let cluster = vec![v1, v2];
        let window = build_window(&cluster, &refidx);
        let gts = enumerate_genotypes(&cluster, &window);
        assert_eq!(gts, vec![b"C".to_vec(), b"G".to_vec()]);
    }

    #[test]
    fn snp_combined_with_deletion_keeps_anchor_base() {
        let refidx = ref_index("enum_test4.fa", ">c1\nACCAT\n");
        let mut v1 = parse_data_line("c1\t1\t.\tA\tT\t.\t.\t.\t.").unwrap();
        let mut v2 = parse_data_line("c1\t2\t.\tCC\tC\t.\t.\t.\t.").unwrap();
        crate::normalize::normalize(&mut v1);
        crate::normalize::normalize(&mut v2);
        let cluster = vec![v1, v2];
        let window = build_window(&cluster, &refidx);
        let gts = enumerate_genotypes(&cluster, &window);
        assert_eq!(
            gts,
            vec![b"AC".to_vec(), b"TC".to_vec(), b"TCC".to_vec()]
        );
    }

    #[test]
    fn insertions_at_same_position_are_incompatible_but_each_keeps_anchor() {
        let refidx = ref_index("enum_test5.fa", ">c1\nAT\n");
        let mut v1 = parse_data_line("c1\t1\t.\tA\tAG\t.\t.\t.\t.").unwrap();
        let mut v2 = parse_data_line("c1\t1\t.\tA\tAC\t.\t.\t.\t.").unwrap();
        crate::normalize::normalize(&mut v1);
        crate::normalize::normalize(&mut v2);
        let cluster = vec![v1, v2];
        let window = build_window(&cluster, &refidx);
        let gts = enumerate_genotypes(&cluster, &window);
        assert_eq!(gts, vec![b"AC".to_vec(), b"AG".to_vec()]);
    }
}
