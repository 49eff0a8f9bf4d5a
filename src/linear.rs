use crate::reference::ReferenceIndex;
use crate::variant::Variant;
use crate::writer::ResolvedRecord;

/// Two-variant-at-a-time fold: each subsequent overlapping variant merges
/// against the already-merged record rather than against the raw
/// cluster, so a third overlapping record never sees the first two
/// individually. Anchored at the first variant's `pos`, which never
/// moves; the window only ever grows to the right. Case is carried
/// straight from the reference/ALT bytes as parsed — this mode never
/// uppercases, unlike the combinatorial enumerator.
pub struct LinearMerge {
    chrom: String,
    pos: u64,
    id: String,
    suffix: String,
    reference: Vec<u8>,
    alts: Vec<Vec<u8>>,
    end: u64,
}

impl LinearMerge {
    pub fn start(v0: &Variant) -> Self {
        LinearMerge {
            chrom: v0.chrom.clone(),
            pos: v0.pos,
            id: v0.id.clone(),
            suffix: v0.suffix.clone(),
            reference: v0.reference.clone(),
            alts: v0.alts.clone(),
            end: v0.pos + v0.reflen() as u64,
        }
    }

    /// Fold `v` into the merge. `v` must be on the same chromosome and
    /// `v.pos` must fall within, or immediately continue, the current
    /// window — the caller (the cluster driver) guarantees this via the
    /// same `k`-base grouping used for the combinatorial path.
    pub fn merge(&mut self, v: &Variant, refidx: &ReferenceIndex) {
        let new_end = self.end.max(v.pos + v.reflen() as u64);
        if new_end > self.end {
            let gap = refidx
                .slice(&self.chrom, self.end, new_end - 1)
                .unwrap_or(&[]);
            self.reference.extend_from_slice(gap);
            for alt in self.alts.iter_mut() {
                alt.extend_from_slice(gap);
            }
            self.end = new_end;
        }

        let local_start = (v.pos - self.pos) as usize;
        let local_end = local_start + v.reflen();
        for alt in &v.alts {
            let mut spliced = self.reference[..local_start].to_vec();
            spliced.extend_from_slice(alt);
            spliced.extend_from_slice(&self.reference[local_end..]);
            self.alts.push(spliced);
        }

        dedup_case_insensitive(&mut self.alts, &self.reference);
    }

    pub fn as_record(&self) -> ResolvedRecord<'_> {
        ResolvedRecord {
            chrom: &self.chrom,
            pos: self.pos,
            id: &self.id,
            reference: &self.reference,
            alts: &self.alts,
            suffix: &self.suffix,
        }
    }
}

fn dedup_case_insensitive(alts: &mut Vec<Vec<u8>>, reference: &[u8]) {
    alts.sort_by(|a, b| a.to_ascii_uppercase().cmp(&b.to_ascii_uppercase()));
    let ref_upper = reference.to_ascii_uppercase();
    alts.retain(|a| a.to_ascii_uppercase() != ref_upper);
    alts.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
}

/// Fold a whole cluster (already sorted, length >= 2) through the
/// linear-merge chain, returning the single resulting record.
pub fn merge_cluster(cluster: &[Variant], refidx: &ReferenceIndex) -> LinearMerge {
    let mut merged = LinearMerge::start(&cluster[0]);
    for v in &cluster[1..] {
        merged.merge(v, refidx);
    }
    merged
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
    fn merges_two_overlapping_snps_preserving_case() {
        let refidx = ref_index("linear_test1.fa", ">c1\nacgtacgt\n");
        let v0 = parse_data_line("c1\t2\t.\tc\tt\t.\t.\t.\t.").unwrap();
        let v1 = parse_data_line("c1\t3\t.\tg\ta\t.\t.\t.\t.").unwrap();
        let cluster = vec![v0, v1];
        let merged = merge_cluster(&cluster, &refidx);
        let record = merged.as_record();
        assert_eq!(record.pos, 2);
        assert_eq!(record.reference, b"cg");
        assert!(record.alts.contains(&b"tg".to_vec()));
        assert!(record.alts.contains(&b"ca".to_vec()));
    }

    #[test]
    fn widens_window_as_later_variant_extends_past_the_first() {
        let refidx = ref_index("linear_test2.fa", ">c1\nAAAAAAAA\n");
        let v0 = parse_data_line("c1\t2\t.\tA\tC\t.\t.\t.\t.").unwrap();
        let v1 = parse_data_line("c1\t3\t.\tAA\tG\t.\t.\t.\t.").unwrap();
        let cluster = vec![v0, v1];
        let merged = merge_cluster(&cluster, &refidx);
        let record = merged.as_record();
        assert_eq!(record.pos, 2);
        assert_eq!(record.reference, b"AAA");
        assert!(record.alts.contains(&b"CAA".to_vec()));
        assert!(record.alts.contains(&b"AG".to_vec()));
    }
}
