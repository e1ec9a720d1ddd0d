//! A byte-offset index over the lines of a GFA file.
//!
//! The index stores the type code and the starting offset of every line in file order, followed by a sentinel record at the end of the file.
//! Line `i` therefore occupies bytes `offset[i]..offset[i + 1]`, including its trailing newline.
//!
//! The index can be stored in a companion file as a sequence of fixed-width records.
//! Each record is the type code (1 byte) followed by the offset (8 bytes, native byte order).
//! There is no header, version, or checksum.

use crate::Error;

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::ops::Range;
use std::path::Path;

use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, warn};

#[cfg(test)]
mod tests;

//-----------------------------------------------------------------------------

/// Type code and starting offset for a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineRecord {
    /// The first byte of the line.
    pub line_type: u8,
    /// Byte offset of the first byte of the line.
    pub offset: u64,
}

impl LineRecord {
    /// Creates a new record.
    pub fn new(line_type: u8, offset: u64) -> Self {
        LineRecord { line_type, offset }
    }
}

//-----------------------------------------------------------------------------

/// Line index for a GFA file.
///
/// The index is built once by scanning the file or loaded from a companion file, and it is immutable afterwards.
/// Line positions refer to real lines in file order.
/// The sentinel record is not a line, and it does not belong to any type group.
///
/// # Examples
///
/// ```
/// use gfa_index::{LineIndex, LineRecord};
///
/// let gfa = b"H\tVN:Z:1.0\nS\t1\tACGT\nS\t2\tTTTT\nL\t1\t+\t2\t+\t4M\n";
/// let index = LineIndex::build(&gfa[..]).unwrap();
/// assert_eq!(index.len(), 4);
/// assert_eq!(index.lines_of_type(b'S'), &[1, 2]);
/// assert_eq!(index.line_range(1).unwrap(), 11..20);
/// assert_eq!(index.sentinel(), Some(LineRecord::new(LineIndex::EOF_CODE, gfa.len() as u64)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineIndex {
    // Lines in file order, followed by the sentinel.
    records: Vec<LineRecord>,

    // Line positions for each type code in file order.
    by_type: BTreeMap<u8, Vec<usize>>,
}

/// Type codes.
impl LineIndex {
    /// Type code for the sentinel record at the end of the file.
    pub const EOF_CODE: u8 = b'X';

    /// Type code for header lines.
    pub const HEADER: u8 = b'H';

    /// Type code for sequence (segment) lines.
    pub const SEGMENT: u8 = b'S';

    /// Type code for link lines.
    pub const LINK: u8 = b'L';

    /// Size of a serialized record in bytes.
    pub const RECORD_SIZE: usize = 9;
}

/// Construction.
impl LineIndex {
    /// Builds the index by scanning the input.
    ///
    /// A line starts at the first byte after a newline (or at the start of the input) that is not itself a newline.
    /// Empty lines are therefore included in the preceding line.
    pub fn build<R: Read>(reader: R) -> io::Result<Self> {
        let mut reader = BufReader::new(reader);
        let mut result = LineIndex::default();
        let mut offset: u64 = 0;
        let mut newline = true;

        loop {
            let buffer = reader.fill_buf()?;
            if buffer.is_empty() {
                break;
            }
            for &c in buffer {
                if c == b'\n' {
                    newline = true;
                } else if newline {
                    result.push_line(LineRecord::new(c, offset));
                    newline = false;
                }
                offset += 1;
            }
            let len = buffer.len();
            reader.consume(len);
        }

        result.records.push(LineRecord::new(Self::EOF_CODE, offset));
        Ok(result)
    }

    /// Builds the index for the given file.
    ///
    /// Returns [`Error::FileNotFound`] if the file cannot be opened.
    pub fn build_from_file<P: AsRef<Path>>(filename: P) -> Result<Self, Error> {
        let file = File::open(&filename).map_err(|source| Error::FileNotFound {
            path: filename.as_ref().to_path_buf(),
            source,
        })?;
        let index = Self::build(file)?;
        Ok(index)
    }

    // Appends a real line.
    fn push_line(&mut self, record: LineRecord) {
        self.by_type.entry(record.line_type).or_default().push(self.records.len());
        self.records.push(record);
    }
}

//-----------------------------------------------------------------------------

/// Serialization.
impl LineIndex {
    /// Writes the records, including the sentinel, to the output.
    pub fn serialize<W: Write>(&self, output: &mut W) -> io::Result<()> {
        for record in self.records.iter() {
            output.write_u8(record.line_type)?;
            output.write_u64::<NativeEndian>(record.offset)?;
        }
        Ok(())
    }

    /// Reads `records` serialized records from the input.
    ///
    /// The last record is taken to be the sentinel.
    pub fn deserialize<R: Read>(input: &mut R, records: usize) -> io::Result<Self> {
        let mut result = LineIndex::default();
        for i in 0..records {
            let line_type = input.read_u8()?;
            let offset = input.read_u64::<NativeEndian>()?;
            let record = LineRecord::new(line_type, offset);
            if i + 1 < records {
                result.push_line(record);
            } else {
                result.records.push(record);
            }
        }
        Ok(result)
    }

    /// Stores the index in the given file, overwriting it if it exists.
    pub fn save_to<P: AsRef<Path>>(&self, filename: P) -> Result<(), Error> {
        let file = File::create(&filename)?;
        let mut writer = BufWriter::new(file);
        self.serialize(&mut writer)?;
        writer.flush()?;
        debug!("Wrote {} index records to {}", self.records.len(), filename.as_ref().display());
        Ok(())
    }

    /// Loads the index from the given file.
    ///
    /// The number of records is determined by the file size.
    /// The contents are not validated.
    pub fn load_from<P: AsRef<Path>>(filename: P) -> Result<Self, Error> {
        let file = File::open(&filename).map_err(|source| Error::FileNotFound {
            path: filename.as_ref().to_path_buf(),
            source,
        })?;
        let len = fs::metadata(&filename)?.len() as usize;
        if len % Self::RECORD_SIZE != 0 {
            warn!(
                "Index file {} has {} trailing bytes",
                filename.as_ref().display(), len % Self::RECORD_SIZE
            );
        }
        let mut reader = BufReader::new(file);
        let index = Self::deserialize(&mut reader, len / Self::RECORD_SIZE)?;
        Ok(index)
    }
}

//-----------------------------------------------------------------------------

/// Queries.
impl LineIndex {
    /// Returns the number of lines, excluding the sentinel.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len().saturating_sub(1)
    }

    /// Returns `true` if the index contains no lines.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns all records, including the sentinel.
    #[inline]
    pub fn records(&self) -> &[LineRecord] {
        &self.records
    }

    /// Returns the record for the given line.
    pub fn record(&self, index: usize) -> Option<LineRecord> {
        if index < self.len() {
            Some(self.records[index])
        } else {
            None
        }
    }

    /// Returns the sentinel record, or [`None`] if the index is empty.
    pub fn sentinel(&self) -> Option<LineRecord> {
        self.records.last().copied()
    }

    /// Returns the total length of the indexed file in bytes.
    pub fn file_len(&self) -> u64 {
        self.sentinel().map(|record| record.offset).unwrap_or(0)
    }

    /// Returns the byte range of the given line, including the trailing newline.
    ///
    /// Returns [`Error::IndexOutOfRange`] if the position is not a real line.
    /// Returns [`Error::InvalidLineRange`] if the range is decreasing or extends past the sentinel, which can only happen with a corrupt index.
    pub fn line_range(&self, index: usize) -> Result<Range<u64>, Error> {
        if index >= self.len() {
            return Err(Error::IndexOutOfRange { index, len: self.len() });
        }
        let start = self.records[index].offset;
        let end = self.records[index + 1].offset;
        if end < start || end > self.file_len() {
            return Err(Error::InvalidLineRange { index, start, end });
        }
        Ok(start..end)
    }

    /// Returns the positions of the lines of the given type in file order.
    pub fn lines_of_type(&self, line_type: u8) -> &[usize] {
        self.by_type.get(&line_type).map(|lines| lines.as_slice()).unwrap_or(&[])
    }

    /// Returns an iterator over the type codes and the number of lines of each type.
    pub fn type_counts(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.by_type.iter().map(|(line_type, lines)| (*line_type, lines.len()))
    }
}

//-----------------------------------------------------------------------------
