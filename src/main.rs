pub mod cluster;
pub mod combine;
pub mod enumerate;
pub mod error;
pub mod io;
pub mod linear;
pub mod normalize;
pub mod option;
pub mod reference;
pub mod reffilter;
pub mod variant;
pub mod writer;

use std::path::PathBuf;

use env_logger::Env;
use log::{error, info};
use structopt::StructOpt;

use crate::error::Result;
use crate::io::path_or;
use crate::option::{Command, Opt};
use crate::reference::ReferenceIndex;

fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
}

fn run(opt: &Opt) -> Result<()> {
    let refidx = if opt.reference.is_empty() {
        if opt.input == PathBuf::from("-") {
            return Err(crate::error::VcfNormError::BadArgs(
                "no --reference given and --input reads stdin: stdin cannot serve as both \
                 the genome and the VCF stream"
                    .to_string(),
            ));
        }
        ReferenceIndex::load(&[PathBuf::from("-")])?
    } else {
        ReferenceIndex::load(&opt.reference)?
    };

    let reader = crate::io::open_reader(&opt.input)?;
    let writer = crate::io::open_writer(&opt.output, opt.gzip)?;

    match &opt.cmd {
        Command::Combine { k, linear } => combine::run(reader, writer, &refidx, *k, *linear),
        Command::RefFilter { swap } => reffilter::run(reader, writer, &refidx, *swap),
    }
}

fn main() {
    let opt = Opt::from_args();
    init_logger(opt.verbose);

    info!("parameter: verbose\t\t= {}", opt.verbose);
    info!("parameter: input\t\t= {}", path_or(&opt.input, "stdin"));
    info!("parameter: output\t\t= {}", path_or(&opt.output, "stdout"));
    info!("parameter: gzip\t\t= {}", opt.gzip);
    info!("parameter: reference\t= {} file(s)", opt.reference.len());

    if let Err(e) = run(&opt) {
        error!("{}", e);
        std::process::exit(1);
    }
}
