use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, stdin, stdout, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::Result;

pub enum StreamType {
    File,
    Stdio,
}

pub fn stream_type<T: AsRef<Path>>(path: &T) -> StreamType {
    if path.as_ref() == Path::new("-") {
        StreamType::Stdio
    } else {
        StreamType::File
    }
}

/// Render a path for diagnostics, substituting `stdio` for `-`.
pub fn path_or<T: AsRef<Path>>(path: &T, stdio: &str) -> String {
    if path.as_ref() == Path::new("-") {
        stdio.to_string()
    } else {
        path.as_ref().display().to_string()
    }
}

fn peek_is_gzip<R: Read + BufRead>(r: &mut R) -> io::Result<bool> {
    let buf = r.fill_buf()?;
    Ok(buf.len() >= 2 && buf[0] == 0x1f && buf[1] == 0x8b)
}

/// Open `path` (or stdin, for `-`) as a line reader, auto-detecting gzip
/// from the leading magic bytes rather than the file extension — the
/// writer side, by contrast, keys compression off `--gzip`/extension,
/// since there is nothing to sniff before any bytes are written.
pub fn open_reader<T: AsRef<Path>>(path: &T) -> Result<Box<dyn BufRead>> {
    match stream_type(path) {
        StreamType::Stdio => {
            let mut r = BufReader::new(stdin());
            if peek_is_gzip(&mut r)? {
                Ok(Box::new(BufReader::new(MultiGzDecoder::new(r))))
            } else {
                Ok(Box::new(r))
            }
        }
        StreamType::File => {
            let mut r = BufReader::new(File::open(path)?);
            if peek_is_gzip(&mut r)? {
                Ok(Box::new(BufReader::new(MultiGzDecoder::new(r))))
            } else {
                Ok(Box::new(r))
            }
        }
    }
}

/// Open `path` (or stdout, for `-`) as a writer. `gzip` forces gzip
/// compression regardless of extension; otherwise a `.gz`/`.bgz`
/// extension on a file path turns it on.
pub fn open_writer<T: AsRef<Path>>(path: &T, gzip: bool) -> Result<Box<dyn Write>> {
    let ext_gz = path
        .as_ref()
        .to_string_lossy()
        .ends_with(".gz")
        || path.as_ref().to_string_lossy().ends_with(".bgz");

    match stream_type(path) {
        StreamType::Stdio => {
            if gzip {
                Ok(Box::new(BufWriter::new(GzEncoder::new(
                    stdout(),
                    Compression::default(),
                ))))
            } else {
                Ok(Box::new(BufWriter::new(stdout())))
            }
        }
        StreamType::File => {
            let file = File::create(path)?;
            if gzip || ext_gz {
                Ok(Box::new(BufWriter::new(GzEncoder::new(
                    file,
                    Compression::default(),
                ))))
            } else {
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}
