//! Random access to the lines of an indexed GFA file.
//!
//! [`GFAReader`] combines a GFA file with its [`LineIndex`].
//! It can read any line by its position in the index and map node names to the positions of their segment and link lines.
//! All output is copied from the original file byte by byte.
//!
//! Segment lines are expected to be `S\tname\tsequence...` and link lines `L\tfrom\tstrand\tto\tstrand...`.
//! Orientations are ignored.

use crate::{utils, Error, LineIndex};

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::hash::{BuildHasher, Hash};
use std::borrow::Borrow;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, info, warn};


//-----------------------------------------------------------------------------

/// An indexed GFA file.
///
/// Opening the reader loads the line index from the companion file or builds the index and stores it in the companion file.
/// The existence of the companion file is the only check for its freshness.
///
/// The file descriptor is opened once with the reader and used for all reads.
/// Reads use positioned I/O without a shared cursor, so the reader can be shared between threads.
///
/// # Examples
///
/// ```
/// use gfa_index::GFAReader;
/// use std::collections::HashSet;
/// use std::fs;
///
/// let gfa_file = std::env::temp_dir().join(format!("gfa-reader-doc-{}.gfa", std::process::id()));
/// fs::write(&gfa_file, "H\tVN:Z:1.0\nS\t1\tACGT\nS\t2\tTTTT\nL\t1\t+\t2\t+\t4M\n").unwrap();
///
/// let reader = GFAReader::open(&gfa_file).unwrap();
/// let line = reader.sequence_line("1").unwrap();
/// assert_eq!(reader.read_line(line).unwrap(), b"S\t1\tACGT\n");
/// assert_eq!(reader.sequence_length("2").unwrap(), 4);
///
/// let nodes: HashSet<String> = ["1", "2"].iter().map(|x| x.to_string()).collect();
/// let mut output: Vec<u8> = Vec::new();
/// reader.write_link_subset(&nodes, &mut output).unwrap();
/// assert_eq!(output, b"L\t1\t+\t2\t+\t4M\n");
///
/// drop(reader);
/// fs::remove_file(&gfa_file).unwrap();
/// fs::remove_file(gfa_index::utils::index_file_name(&gfa_file)).unwrap();
/// ```
#[derive(Debug)]
pub struct GFAReader {
    gfa_path: PathBuf,
    index_path: PathBuf,
    index: LineIndex,

    // Length of the GFA file when it was opened.
    gfa_len: u64,

    // Opened with the reader and shared by all reads.
    file: OnceLock<File>,

    // Node name to the position of its segment line.
    sequence_lines: OnceLock<HashMap<String, usize>>,

    // Node name to the positions of the link lines that mention it.
    link_lines: OnceLock<HashMap<String, BTreeSet<usize>>>,
}

//-----------------------------------------------------------------------------

/// Construction and basic information.
impl GFAReader {
    /// Opens the GFA file and loads or builds its line index.
    ///
    /// The index is stored in a companion file with the extension [`utils::INDEX_EXTENSION`].
    /// If the companion file does not exist, the index is built and written to it.
    ///
    /// Returns [`Error::FileNotFound`] if the GFA file cannot be opened.
    pub fn open<P: AsRef<Path>>(filename: P) -> Result<Self, Error> {
        let gfa_path = filename.as_ref().to_path_buf();
        let index_path = utils::index_file_name(&gfa_path);

        // Test the file.
        let file = File::open(&gfa_path).map_err(|source| Error::FileNotFound {
            path: gfa_path.clone(),
            source,
        })?;
        let gfa_len = file.metadata()?.len();

        let index = if utils::file_exists(&index_path) {
            info!("Found index, loading from disk: {}", index_path.display());
            LineIndex::load_from(&index_path)?
        } else {
            info!("No index found, generating {} for {}", index_path.display(), gfa_path.display());
            let index = LineIndex::build_from_file(&gfa_path)?;
            index.save_to(&index_path)?;
            index
        };
        info!("Index covers {} lines in {} bytes", index.len(), index.file_len());
        if index.file_len() != gfa_len {
            warn!(
                "Index {} covers {} bytes but {} has {} bytes",
                index_path.display(), index.file_len(), gfa_path.display(), gfa_len
            );
        }

        Ok(GFAReader {
            gfa_path,
            index_path,
            index,
            gfa_len,
            file: OnceLock::from(file),
            sequence_lines: OnceLock::new(),
            link_lines: OnceLock::new(),
        })
    }

    /// Returns the name of the GFA file.
    pub fn gfa_path(&self) -> &Path {
        &self.gfa_path
    }

    /// Returns the name of the companion index file.
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Returns the line index.
    #[inline]
    pub fn index(&self) -> &LineIndex {
        &self.index
    }
}

//-----------------------------------------------------------------------------

/// Reading lines.
impl GFAReader {
    // Returns the shared file descriptor, opening it if necessary.
    fn file(&self) -> Result<&File, Error> {
        if let Some(file) = self.file.get() {
            return Ok(file);
        }
        let file = self.open_gfa()?;
        Ok(self.file.get_or_init(|| file))
    }

    /// Reads line `index` into the buffer, replacing its contents.
    ///
    /// The line includes the trailing newline, if present.
    /// Returns [`Error::IndexOutOfRange`] if the position is not a real line.
    /// Returns [`Error::InvalidLineRange`] if the index places the line outside the file.
    pub fn read_line_into(&self, index: usize, buffer: &mut Vec<u8>) -> Result<(), Error> {
        let range = self.index.line_range(index)?;
        if range.end > self.gfa_len {
            return Err(Error::InvalidLineRange { index, start: range.start, end: range.end });
        }
        buffer.clear();
        buffer.resize((range.end - range.start) as usize, 0);
        read_exact_at(self.file()?, buffer, range.start)?;
        Ok(())
    }

    /// Returns line `index`, including the trailing newline.
    ///
    /// Returns [`Error::IndexOutOfRange`] if the position is not a real line.
    pub fn read_line(&self, index: usize) -> Result<Vec<u8>, Error> {
        let mut buffer = Vec::new();
        self.read_line_into(index, &mut buffer)?;
        Ok(buffer)
    }
}

//-----------------------------------------------------------------------------

/// Node attribute maps.
impl GFAReader {
    /// Returns a map from node names to the positions of their segment lines.
    ///
    /// The map is built on first use by reading the name from each segment line.
    /// If the same name occurs on multiple lines, the last one is used.
    pub fn map_sequences_by_node(&self) -> Result<&HashMap<String, usize>, Error> {
        if let Some(map) = self.sequence_lines.get() {
            return Ok(map);
        }

        info!("Mapping GFA S lines to node names");
        let mut map: HashMap<String, usize> = HashMap::new();
        let mut line_buf: Vec<u8> = Vec::new();
        let mut token: Vec<u8> = Vec::new();
        for &line in self.index.lines_of_type(LineIndex::SEGMENT) {
            self.read_line_into(line, &mut line_buf)?;
            let mut fields = FieldReader::new(line_body(&line_buf));
            if fields.next_field(&mut token)? {
                map.insert(String::from_utf8_lossy(&token).into_owned(), line);
            }
        }
        info!("Mapped {} nodes to S lines", map.len());

        Ok(self.sequence_lines.get_or_init(|| map))
    }

    /// Returns a map from node names to the positions of the link lines where they occur as either endpoint.
    ///
    /// The map is built on first use by reading the endpoints from each link line.
    pub fn map_links_by_node(&self) -> Result<&HashMap<String, BTreeSet<usize>>, Error> {
        if let Some(map) = self.link_lines.get() {
            return Ok(map);
        }

        info!("Mapping GFA L lines to node names");
        let mut map: HashMap<String, BTreeSet<usize>> = HashMap::new();
        let mut line_buf: Vec<u8> = Vec::new();
        let mut from: Vec<u8> = Vec::new();
        let mut to: Vec<u8> = Vec::new();
        for &line in self.index.lines_of_type(LineIndex::LINK) {
            self.read_line_into(line, &mut line_buf)?;
            let mut fields = FieldReader::new(line_body(&line_buf));
            if fields.endpoints(&mut from, &mut to)? {
                for name in [&from, &to] {
                    let name = String::from_utf8_lossy(name).into_owned();
                    map.entry(name).or_default().insert(line);
                }
            }
        }
        info!("Mapped {} nodes to L lines", map.len());

        Ok(self.link_lines.get_or_init(|| map))
    }

    /// Returns the position of the segment line for the given node.
    ///
    /// Returns [`Error::NodeNotFound`] if there is no such line.
    pub fn sequence_line(&self, node: &str) -> Result<usize, Error> {
        let map = self.map_sequences_by_node()?;
        map.get(node).copied().ok_or_else(|| Error::NodeNotFound { node: node.to_string() })
    }

    /// Returns the positions of the link lines for the given node in file order.
    ///
    /// Returns [`Error::NodeNotFound`] if the node is not an endpoint of any link.
    pub fn link_lines(&self, node: &str) -> Result<&BTreeSet<usize>, Error> {
        let map = self.map_links_by_node()?;
        map.get(node).ok_or_else(|| Error::NodeNotFound { node: node.to_string() })
    }

    /// Returns the length of the sequence of the given node.
    ///
    /// The length is the number of bytes in the third field of the segment line.
    /// Returns [`Error::NodeNotFound`] if the node has no segment line.
    pub fn sequence_length(&self, node: &str) -> Result<usize, Error> {
        let line = self.sequence_line(node)?;
        let line_buf = self.read_line(line)?;
        let mut fields = FieldReader::new(line_body(&line_buf));
        if !fields.skip_field()? {
            return Ok(0);
        }
        let len = fields.count_field()?;
        Ok(len)
    }

    fn open_gfa(&self) -> Result<File, Error> {
        File::open(&self.gfa_path).map_err(|source| Error::FileNotFound {
            path: self.gfa_path.clone(),
            source,
        })
    }
}

//-----------------------------------------------------------------------------

/// Writing subgraphs.
impl GFAReader {
    /// Writes all link lines where both endpoints are in the given set.
    ///
    /// Lines are written in file order as exact copies.
    /// Returns the number of lines written.
    pub fn write_link_subset<S, T, W>(&self, nodes: &HashSet<S, T>, output: &mut W) -> Result<usize, Error>
    where
        S: Borrow<str> + Hash + Eq,
        T: BuildHasher,
        W: Write,
    {
        info!("Writing GFA L lines for {} nodes", nodes.len());
        let mut line_buf: Vec<u8> = Vec::new();
        let mut from: Vec<u8> = Vec::new();
        let mut to: Vec<u8> = Vec::new();
        let mut written = 0;
        for &line in self.index.lines_of_type(LineIndex::LINK) {
            self.read_line_into(line, &mut line_buf)?;
            let mut fields = FieldReader::new(line_body(&line_buf));
            if !fields.endpoints(&mut from, &mut to)? {
                continue;
            }
            let found_a = str_member(nodes, &from);
            let found_b = str_member(nodes, &to);
            if found_a && found_b {
                output.write_all(&line_buf)?;
                written += 1;
            }
        }
        debug!("Wrote {} L lines", written);
        Ok(written)
    }

    /// Writes the segment lines for the given nodes in the given order.
    ///
    /// All nodes are located before anything is written.
    /// Returns [`Error::NodeNotFound`] if any of the nodes has no segment line.
    pub fn write_segments<'a, I, W>(&self, nodes: I, output: &mut W) -> Result<usize, Error>
    where
        I: IntoIterator<Item = &'a str>,
        W: Write,
    {
        let mut lines: Vec<usize> = Vec::new();
        for node in nodes {
            lines.push(self.sequence_line(node)?);
        }
        self.write_lines(&lines, output)?;
        Ok(lines.len())
    }

    /// Writes the subgraph induced by the given nodes.
    ///
    /// The output contains the segment lines for the nodes in the iteration order of the set, followed by [`GFAReader::write_link_subset`].
    /// Returns [`Error::NodeNotFound`] without writing anything if any of the nodes has no segment line.
    pub fn write_subgraph<S, T, W>(&self, nodes: &HashSet<S, T>, output: &mut W) -> Result<(), Error>
    where
        S: Borrow<str> + Hash + Eq,
        T: BuildHasher,
        W: Write,
    {
        self.write_segments(nodes.iter().map(|node| Borrow::<str>::borrow(node)), output)?;
        self.write_link_subset(nodes, output)?;
        Ok(())
    }

    /// Writes the given lines as exact copies.
    pub fn write_lines<W: Write>(&self, lines: &[usize], output: &mut W) -> Result<(), Error> {
        let mut buffer: Vec<u8> = Vec::new();
        for &line in lines {
            self.read_line_into(line, &mut buffer)?;
            output.write_all(&buffer)?;
        }
        Ok(())
    }
}

//-----------------------------------------------------------------------------

// The fields of a line after the type code and the following separator.
fn line_body(line: &[u8]) -> &[u8] {
    &line[2.min(line.len())..]
}

fn str_member<S, T>(nodes: &HashSet<S, T>, name: &[u8]) -> bool
where
    S: Borrow<str> + Hash + Eq,
    T: BuildHasher,
{
    match std::str::from_utf8(name) {
        Ok(name) => nodes.contains(name),
        Err(_) => false,
    }
}

//-----------------------------------------------------------------------------

// Tab-separated fields of a single line.
// The underlying reader must end at the end of the line.
struct FieldReader<R: Read> {
    inner: BufReader<R>,
    // Set after the line terminator or the end of input.
    done: bool,
}

impl<R: Read> FieldReader<R> {
    fn new(reader: R) -> Self {
        FieldReader { inner: BufReader::new(reader), done: false }
    }

    // Reads the next field into the buffer.
    // Returns `false` if there are no more fields.
    fn next_field(&mut self, buffer: &mut Vec<u8>) -> io::Result<bool> {
        buffer.clear();
        if self.done {
            return Ok(false);
        }
        loop {
            let available = self.inner.fill_buf()?;
            if available.is_empty() {
                self.done = true;
                return Ok(!buffer.is_empty());
            }
            match available.iter().position(|&c| c == b'\t' || c == b'\n') {
                Some(pos) => {
                    buffer.extend_from_slice(&available[..pos]);
                    if available[pos] == b'\n' {
                        self.done = true;
                    }
                    self.inner.consume(pos + 1);
                    if buffer.last() == Some(&b'\r') {
                        buffer.pop();
                    }
                    return Ok(true);
                },
                None => {
                    buffer.extend_from_slice(available);
                    let len = available.len();
                    self.inner.consume(len);
                },
            }
        }
    }

    // Skips the next field.
    fn skip_field(&mut self) -> io::Result<bool> {
        let mut buffer = Vec::new();
        self.next_field(&mut buffer)
    }

    // Counts the bytes in the next field without storing it.
    fn count_field(&mut self) -> io::Result<usize> {
        let mut len = 0;
        if self.done {
            return Ok(len);
        }
        loop {
            let available = self.inner.fill_buf()?;
            if available.is_empty() {
                self.done = true;
                return Ok(len);
            }
            match available.iter().position(|&c| c == b'\t' || c == b'\n' || c == b'\r') {
                Some(pos) => {
                    len += pos;
                    self.inner.consume(pos + 1);
                    return Ok(len);
                },
                None => {
                    len += available.len();
                    let consumed = available.len();
                    self.inner.consume(consumed);
                },
            }
        }
    }

    // Reads the first and the third field of a link line into the buffers.
    // Returns `false` if the line has fewer than three fields.
    fn endpoints(&mut self, from: &mut Vec<u8>, to: &mut Vec<u8>) -> io::Result<bool> {
        if !self.next_field(from)? || !self.skip_field()? {
            return Ok(false);
        }
        self.next_field(to)
    }
}

//-----------------------------------------------------------------------------

// Positioned reads that do not move a shared cursor.

#[cfg(unix)]
fn read_exact_at(file: &File, buffer: &mut [u8], offset: u64) -> io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.read_exact_at(buffer, offset)
}

#[cfg(windows)]
fn read_exact_at(file: &File, mut buffer: &mut [u8], mut offset: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;
    while !buffer.is_empty() {
        match file.seek_read(buffer, offset) {
            Ok(0) => return Err(io::Error::from(io::ErrorKind::UnexpectedEof)),
            Ok(n) => {
                let rest = buffer;
                buffer = &mut rest[n..];
                offset += n as u64;
            },
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {},
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

#[cfg(not(any(unix, windows)))]
fn read_exact_at(file: &File, buffer: &mut [u8], offset: u64) -> io::Result<()> {
    use std::io::{Seek, SeekFrom};
    let mut file = file.try_clone()?;
    file.seek(SeekFrom::Start(offset))?;
    file.read_exact(buffer)
}

//-----------------------------------------------------------------------------
