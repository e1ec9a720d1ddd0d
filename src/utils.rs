//! Utility functions and structures.

use crate::Error;

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::io::{self, BufRead, BufReader, Read};

use flate2::read::MultiGzDecoder;

//-----------------------------------------------------------------------------

/// Returns the full file name for a specific test file.
pub fn get_test_data(filename: &'static str) -> PathBuf {
    let mut buf = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    buf.push("test-data");
    buf.push(filename);
    buf
}

//-----------------------------------------------------------------------------

// Utilities for working with files.

/// Extension of the line index stored next to a GFA file.
pub const INDEX_EXTENSION: &str = "gfai";

const SIZE_UNITS: [(f64, &str); 6] = [
    (1.0, "B"),
    (1024.0, "KiB"),
    (1024.0 * 1024.0, "MiB"),
    (1024.0 * 1024.0 * 1024.0, "GiB"),
    (1024.0 * 1024.0 * 1024.0 * 1024.0, "TiB"),
    (1024.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0, "PiB"),
];

/// Returns a human-readable representation of the given number of bytes.
pub fn human_readable_size(bytes: u64) -> String {
    let mut unit = 0;
    let value = bytes as f64;
    while unit + 1 < SIZE_UNITS.len() && value >= SIZE_UNITS[unit + 1].0 {
        unit += 1;
    }
    format!("{:.3} {}", value / SIZE_UNITS[unit].0, SIZE_UNITS[unit].1)
}

/// Returns a human-readable size of the file.
pub fn file_size<P: AsRef<Path>>(filename: P) -> Option<String> {
    let metadata = fs::metadata(filename).ok()?;
    Some(human_readable_size(metadata.len()))
}

/// Returns `true` if the file exists.
pub fn file_exists<P: AsRef<Path>>(filename: P) -> bool {
    fs::metadata(filename).is_ok()
}

/// Returns the name of the line index file for the given GFA file.
///
/// The extension of the GFA file is replaced with [`INDEX_EXTENSION`].
pub fn index_file_name<P: AsRef<Path>>(gfa_file: P) -> PathBuf {
    gfa_file.as_ref().with_extension(INDEX_EXTENSION)
}

/// Returns `true` if the file appears to be gzip-compressed.
pub fn is_gzipped<P: AsRef<Path>>(filename: P) -> bool {
    let file = match File::open(filename) {
        Ok(file) => file,
        Err(_) => return false,
    };
    let mut reader = BufReader::new(file);
    let mut magic = [0; 2];
    let len = reader.read(&mut magic).ok();
    len == Some(2) && magic == [0x1F, 0x8B]
}

/// Returns a buffered reader for the file, which may be gzip-compressed.
///
/// Returns [`Error::FileNotFound`] if the file cannot be opened.
pub fn open_file<P: AsRef<Path>>(filename: P) -> Result<Box<dyn BufRead>, Error> {
    let file = File::open(&filename).map_err(|source| Error::FileNotFound {
        path: filename.as_ref().to_path_buf(),
        source,
    })?;
    let inner = BufReader::new(file);
    if is_gzipped(&filename) {
        let inner = MultiGzDecoder::new(inner);
        Ok(Box::new(BufReader::new(inner)))
    } else {
        Ok(Box::new(inner))
    }
}

/// Converts the result of reading a CSV row into a row or an error.
///
/// Invalid UTF-8 becomes [`Error::MalformedInput`] at the given 1-based line.
/// Other read errors are passed through.
pub fn csv_row(row: io::Result<String>, path: &Path, line: usize) -> Result<String, Error> {
    row.map_err(|err| {
        if err.kind() == io::ErrorKind::InvalidData {
            Error::MalformedInput { path: path.to_path_buf(), line, message: err.to_string() }
        } else {
            Error::Io(err)
        }
    })
}

//-----------------------------------------------------------------------------


//-----------------------------------------------------------------------------
