//! Helpers for command line arguments.

use std::{convert::Infallible, fs::File, io, path::PathBuf, str::FromStr};

/// Output destination: a file path, or `-` for stdout.
#[derive(Clone)]
pub(super) struct OutFilePath(OutFileType);

impl OutFilePath {
    pub(super) fn open(&self) -> io::Result<Box<dyn io::Write>> {
        match &self.0 {
            OutFileType::File(path) => Ok(Box::new(io::BufWriter::new(File::create(path)?))),
            OutFileType::Stdout => Ok(Box::new(io::stdout().lock())),
        }
    }
}

impl FromStr for OutFilePath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Infallible> {
        Ok(if s == "-" {
            OutFilePath(OutFileType::Stdout)
        } else {
            OutFilePath(OutFileType::File(PathBuf::from(s)))
        })
    }
}

#[derive(Clone)]
enum OutFileType {
    File(PathBuf),
    Stdout,
}
