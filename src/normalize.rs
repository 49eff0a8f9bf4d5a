use crate::variant::Variant;

/// Trim common leading/trailing bases from REF and every ALT, adjusting
/// `pos` accordingly, then deduplicate ALTs.
///
/// Alt comparison (REF equality and mutual duplicates) is case-insensitive;
/// the bytes that survive keep their original case. After this call
/// `variant.alts` may be empty if every ALT equalled REF — the caller is
/// responsible for dropping such a variant before it reaches a cluster.
pub fn normalize(variant: &mut Variant) {
    left_trim(variant);
    right_trim(variant);
    dedup_alts(variant);
}

fn left_trim(variant: &mut Variant) {
    let bound = std::iter::once(variant.reference.len())
        .chain(variant.alts.iter().map(Vec::len))
        .min()
        .unwrap_or(0);

    let mut p = 0;
    while p < bound {
        let c = variant.reference[p];
        if variant.alts.iter().all(|a| a[p] == c) {
            p += 1;
        } else {
            break;
        }
    }

    if p > 0 {
        variant.pos += p as u64;
        variant.reference.drain(0..p);
        for alt in variant.alts.iter_mut() {
            alt.drain(0..p);
        }
    }
}

fn right_trim(variant: &mut Variant) {
    let bound = std::iter::once(variant.reference.len())
        .chain(variant.alts.iter().map(Vec::len))
        .min()
        .unwrap_or(0);

    let mut s = 0;
    while s < bound {
        let c = variant.reference[variant.reference.len() - 1 - s];
        if variant.alts.iter().all(|a| a[a.len() - 1 - s] == c) {
            s += 1;
        } else {
            break;
        }
    }

    if s > 0 {
        let new_reflen = variant.reference.len() - s;
        variant.reference.truncate(new_reflen);
        for alt in variant.alts.iter_mut() {
            let new_len = alt.len() - s;
            alt.truncate(new_len);
        }
    }
}

fn dedup_alts(variant: &mut Variant) {
    variant
        .alts
        .sort_by(|a, b| a.to_ascii_uppercase().cmp(&b.to_ascii_uppercase()));
    let ref_upper = variant.reference.to_ascii_uppercase();
    variant.alts.retain(|a| a.to_ascii_uppercase() != ref_upper);
    variant
        .alts
        .dedup_by(|a, b| a.eq_ignore_ascii_case(b));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(pos: u64, reference: &str, alts: &[&str]) -> Variant {
        Variant {
            chrom: "c1".to_string(),
            pos,
            id: ".".to_string(),
            reference: reference.as_bytes().to_vec(),
            alts: alts.iter().map(|a| a.as_bytes().to_vec()).collect(),
            suffix: ".\t.\t.\t.".to_string(),
            raw: format!("c1\t{}\t.\t{}\t{}\t.\t.\t.\t.", pos, reference, alts.join(",")),
        }
    }

    #[test]
    fn left_trims_common_prefix() {
        let mut v = var(10, "GA", &["GC"]);
        normalize(&mut v);
        assert_eq!(v.pos, 11);
        assert_eq!(v.reference, b"A");
        assert_eq!(v.alts, vec![b"C".to_vec()]);
    }

    #[test]
    fn right_trims_common_suffix() {
        let mut v = var(10, "CAT", &["GAT"]);
        normalize(&mut v);
        assert_eq!(v.pos, 10);
        assert_eq!(v.reference, b"C");
        assert_eq!(v.alts, vec![b"G".to_vec()]);
    }

    #[test]
    fn drops_alts_equal_to_ref() {
        let mut v = var(1, "A", &["A", "T"]);
        normalize(&mut v);
        assert_eq!(v.alts, vec![b"T".to_vec()]);
    }

    #[test]
    fn all_alts_equal_ref_yields_empty() {
        let mut v = var(1, "A", &["a"]);
        normalize(&mut v);
        assert!(v.alts.is_empty());
    }

    #[test]
    fn dedups_case_insensitively_preserving_case() {
        let mut v = var(1, "A", &["T", "t", "G"]);
        normalize(&mut v);
        assert_eq!(v.alts, vec![b"G".to_vec(), b"T".to_vec()]);
    }

    #[test]
    fn pure_insertion_leaves_empty_ref() {
        // REF "A", ALT "AG": common prefix "A" trims to REF="" ALT="G".
        let mut v = var(5, "A", &["AG"]);
        normalize(&mut v);
        assert_eq!(v.pos, 6);
        assert!(v.reference.is_empty());
        assert_eq!(v.alts, vec![b"G".to_vec()]);
        assert!(v.is_pure_insertion());
    }
}
