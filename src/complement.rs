//! Pairs of nodes that are reverse complements of each other.
//!
//! The pairs are read from an assembly summary CSV with the format:
//!
//! ```text
//! Rank,EdgeId,EdgeIdRc,Length,CumulativeLength,LengthFraction,CumulativeFraction
//! 0,800526,800527,169589,169589,5.80388e-05,5.80388e-05
//! ```
//!
//! The second and the third field of each row are the forward node and its reverse complement.

use crate::{utils, Error};

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use log::info;


//-----------------------------------------------------------------------------

/// A bijection between forward nodes and their reverse complements.
///
/// Each node may belong to at most one pair.
/// Lookups work from either side.
///
/// # Examples
///
/// ```
/// use gfa_index::NodeComplementMap;
///
/// let mut complements = NodeComplementMap::new();
/// complements.insert("10", "11").unwrap();
/// assert_eq!(complements.complement("10"), Some("11"));
/// assert_eq!(complements.complement("11"), Some("10"));
/// assert_eq!(complements.complement("12"), None);
///
/// // A node cannot have two complements.
/// assert!(complements.insert("10", "12").is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeComplementMap {
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
}

impl NodeComplementMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a pair of complementary nodes.
    ///
    /// Inserting the same pair again has no effect.
    /// A node may be its own complement.
    ///
    /// Returns [`Error::DuplicateComplement`] if either node already belongs to another pair.
    /// The map is not modified in that case.
    pub fn insert(&mut self, forward: &str, reverse: &str) -> Result<(), Error> {
        if let Some(existing) = self.complement(forward) {
            if existing == reverse {
                return Ok(());
            }
            return Err(Error::DuplicateComplement {
                node: forward.to_string(),
                existing: existing.to_string(),
                new: reverse.to_string(),
            });
        }
        if let Some(existing) = self.complement(reverse) {
            return Err(Error::DuplicateComplement {
                node: reverse.to_string(),
                existing: existing.to_string(),
                new: forward.to_string(),
            });
        }

        self.forward.insert(forward.to_string(), reverse.to_string());
        self.reverse.insert(reverse.to_string(), forward.to_string());
        Ok(())
    }

    /// Returns the complement of the node, looking it up from either side.
    pub fn complement(&self, node: &str) -> Option<&str> {
        self.forward.get(node).or_else(|| self.reverse.get(node)).map(|x| x.as_str())
    }

    /// Returns the number of pairs.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Returns `true` if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Returns an iterator over the (forward, reverse) pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.forward.iter().map(|(forward, reverse)| (forward.as_str(), reverse.as_str()))
    }
}

//-----------------------------------------------------------------------------

/// Reading assembly summaries.
impl NodeComplementMap {
    /// Reads the node pairs from an assembly summary CSV, which may be gzip-compressed.
    ///
    /// Returns [`Error::FileNotFound`] if the file cannot be opened.
    /// See [`NodeComplementMap::from_reader`] for other errors.
    pub fn from_assembly_summary<P: AsRef<Path>>(filename: P) -> Result<Self, Error> {
        let reader = utils::open_file(&filename)?;
        let result = Self::from_reader(reader, filename.as_ref())?;
        info!("Read {} complementary node pairs from {}", result.len(), filename.as_ref().display());
        Ok(result)
    }

    /// Reads the node pairs from assembly summary rows.
    ///
    /// The first row is a header and it is skipped.
    /// `path` is used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`] for an empty row or a row with fewer than three fields.
    /// Passes through errors from [`NodeComplementMap::insert`].
    pub fn from_reader<R: BufRead>(reader: R, path: &Path) -> Result<Self, Error> {
        let mut result = NodeComplementMap::new();
        for (i, row) in reader.lines().enumerate() {
            let row = utils::csv_row(row, path, i + 1)?;
            if i == 0 {
                continue;
            }
            if row.is_empty() {
                return Err(Error::MalformedInput {
                    path: path.to_path_buf(),
                    line: i + 1,
                    message: String::from("empty line"),
                });
            }
            let mut fields = row.split(',').skip(1);
            match (fields.next(), fields.next()) {
                (Some(forward), Some(reverse)) if !forward.is_empty() && !reverse.is_empty() => {
                    result.insert(forward, reverse)?;
                },
                _ => {
                    return Err(Error::MalformedInput {
                        path: path.to_path_buf(),
                        line: i + 1,
                        message: format!("expected a node and its reverse complement in fields 2 and 3: {}", row),
                    });
                },
            }
        }
        Ok(result)
    }
}

//-----------------------------------------------------------------------------
