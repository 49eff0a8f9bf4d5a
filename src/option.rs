use std::path::PathBuf;
use structopt::StructOpt;

/// Data structure for command line options.
#[derive(Debug, StructOpt)]
#[structopt(
    name = "vcfnorm",
    about = "Streaming overlap resolution and normalization for VCF variant records."
)]
pub struct Opt {
    /// Enable verbose mode
    #[structopt(short, long, global = true)]
    pub verbose: bool,

    /// Input VCF file, stdin if not specified
    #[structopt(short, long, global = true, default_value = "-", parse(from_os_str))]
    pub input: PathBuf,

    /// Output file, stdout if not specified
    #[structopt(short, long, global = true, default_value = "-", parse(from_os_str))]
    pub output: PathBuf,

    /// Gzip output, detected by file extension by default
    #[structopt(short, long, global = true)]
    pub gzip: bool,

    /// Reference FASTA file(s); stdin is read as FASTA if none are given
    #[structopt(short, long = "reference", global = true, parse(from_os_str))]
    pub reference: Vec<PathBuf>,

    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Cluster and normalize overlapping variants within k bases of one another
    Combine {
        /// Overlap tolerance in bases
        k: u64,

        /// Use the two-variant linear-merge mode instead of the full
        /// combinatorial enumerator
        #[structopt(short, long)]
        linear: bool,
    },

    /// Retain only biallelic records whose REF (or, with --swap, ALT)
    /// matches the reference
    #[structopt(name = "ref-filter")]
    RefFilter {
        /// Swap REF/ALT when ALT matches the reference instead of REF
        #[structopt(short, long)]
        swap: bool,
    },
}
