use crate::error::{Result, VcfNormError};

/// A parsed VCF data record, owning all of its field storage.
///
/// Sample columns (anything past FORMAT) are dropped during parsing; no
/// field borrows from the line it was parsed from, so a `Variant` outlives
/// the buffer that produced it.
#[derive(Debug, Clone)]
pub struct Variant {
    pub chrom: String,
    /// 1-based start position, as in the VCF file.
    pub pos: u64,
    pub id: String,
    pub reference: Vec<u8>,
    pub alts: Vec<Vec<u8>>,
    /// QUAL, FILTER, INFO and FORMAT, tab-joined, sample columns already dropped.
    pub suffix: String,
    /// The line as read, sample columns already truncated but otherwise
    /// untouched by normalization. Kept so a cluster that never merges can
    /// be re-emitted byte-for-byte instead of reconstructed from the
    /// (possibly trimmed) parsed fields.
    pub raw: String,
}

impl Variant {
    pub fn reflen(&self) -> usize {
        self.reference.len()
    }

    pub fn is_pure_insertion(&self) -> bool {
        self.reference.is_empty()
    }

    /// Render this variant as a tab-delimited VCF line, sample columns
    /// already dropped.
    pub fn to_line(&self) -> String {
        let alt = self
            .alts
            .iter()
            .map(|a| String::from_utf8_lossy(a).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.chrom,
            self.pos,
            self.id,
            String::from_utf8_lossy(&self.reference),
            alt,
            self.suffix,
        )
    }
}

/// Truncate a tab-delimited VCF line (header or data) at the first tab
/// after the ninth column (FORMAT), dropping any sample columns.
pub fn truncate_sample_columns(line: &str) -> &str {
    let mut seen = 0;
    for (i, c) in line.char_indices() {
        if c == '\t' {
            seen += 1;
            if seen == 9 {
                return &line[..i];
            }
        }
    }
    line
}

/// Parse one chomped VCF data line into its nine canonical columns,
/// dropping any sample columns past FORMAT.
pub fn parse_data_line(line: &str) -> Result<Variant> {
    let mut cols = line.splitn(9, '\t');
    let mut next = |what: &str| {
        cols.next()
            .ok_or_else(|| bad_record(what, line))
    };

    let chrom = next("CHROM")?;
    let pos_str = next("POS")?;
    let id = next("ID")?;
    let reference = next("REF")?;
    let alt = next("ALT")?;
    let qual = next("QUAL")?;
    let filter = next("FILTER")?;
    let info = next("INFO")?;
    let format_and_samples = next("FORMAT")?;
    let format = format_and_samples.split('\t').next().unwrap_or("");

    let pos: u64 = pos_str
        .parse()
        .map_err(|_| bad_record(&format!("unparseable POS '{}'", pos_str), line))?;
    if pos == 0 {
        return Err(bad_record("POS must be a positive integer", line));
    }

    let alts = alt.split(',').map(|a| a.as_bytes().to_vec()).collect();

    Ok(Variant {
        chrom: chrom.to_string(),
        pos,
        id: id.to_string(),
        reference: reference.as_bytes().to_vec(),
        alts,
        suffix: format!("{}\t{}\t{}\t{}", qual, filter, info, format),
        raw: truncate_sample_columns(line).to_string(),
    })
}

fn bad_record(what: &str, line: &str) -> VcfNormError {
    VcfNormError::BadRecord(format!("{} (line: '{}')", what, line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_record() {
        let v = parse_data_line("c1\t2\t.\tC\tG\t.\t.\t.\t.").unwrap();
        assert_eq!(v.chrom, "c1");
        assert_eq!(v.pos, 2);
        assert_eq!(v.reference, b"C");
        assert_eq!(v.alts, vec![b"G".to_vec()]);
        assert_eq!(v.suffix, ".\t.\t.\t.");
    }

    #[test]
    fn splits_multiple_alts() {
        let v = parse_data_line("c1\t1\t.\tA\tC,G,T\t.\t.\t.\tGT").unwrap();
        assert_eq!(
            v.alts,
            vec![b"C".to_vec(), b"G".to_vec(), b"T".to_vec()]
        );
    }

    #[test]
    fn drops_sample_columns() {
        let v =
            parse_data_line("c1\t1\t.\tA\tC\t.\t.\t.\tGT\t0|1\t1|1").unwrap();
        assert_eq!(v.suffix, ".\t.\t.\tGT");
    }

    #[test]
    fn rejects_zero_pos() {
        let err = parse_data_line("c1\t0\t.\tA\tC\t.\t.\t.\t.").unwrap_err();
        assert!(matches!(err, VcfNormError::BadRecord(_)));
    }

    #[test]
    fn rejects_unparseable_pos() {
        let err = parse_data_line("c1\tabc\t.\tA\tC\t.\t.\t.\t.").unwrap_err();
        assert!(matches!(err, VcfNormError::BadRecord(_)));
    }

    #[test]
    fn rejects_too_few_columns() {
        let err = parse_data_line("c1\t1\t.\tA\tC").unwrap_err();
        assert!(matches!(err, VcfNormError::BadRecord(_)));
    }

    #[test]
    fn truncates_header_samples() {
        let line = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNA001\tNA002";
        assert_eq!(
            truncate_sample_columns(line),
            "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT"
        );
    }

    #[test]
    fn truncate_is_noop_without_samples() {
        let line = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT";
        assert_eq!(truncate_sample_columns(line), line);
    }

    #[test]
    fn roundtrips_to_line() {
        let v = parse_data_line("c1\t5\trs1\tA\tC,G\t30\tPASS\tDP=10\tGT").unwrap();
        assert_eq!(v.to_line(), "c1\t5\trs1\tA\tC,G\t30\tPASS\tDP=10\tGT");
    }
}
