//! Bubble chains described in a CSV file.
//!
//! Each row of the file is a component of a bubble chain:
//!
//! ```text
//! Chain,Circular,Position,Segment0,Segment1,...
//! 1,No,0,10,
//! 1,No,1,20,30,
//! ```
//!
//! A component is either a single haploid segment or a polyploid bubble with multiple alternative segments.
//! Consecutive rows with the same chain identifier form a chain.
//! Only chains with more than one component are retained.

use crate::{utils, Error};

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::io::BufRead;
use std::path::Path;

use log::{debug, info};


//-----------------------------------------------------------------------------

/// A component of a bubble chain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BubbleChainComponent {
    /// Chain identifier.
    pub chain_id: u64,
    /// Is the chain circular?
    pub circular: bool,
    /// Position of the component in the chain.
    pub position: u64,
    /// Node names: one for a haploid segment, several for a polyploid bubble.
    pub segments: Vec<String>,
}

impl BubbleChainComponent {
    /// Parses a component from a CSV row.
    ///
    /// The fields are `chain_id, circular, position, segment, ...`.
    /// Empty segment fields are ignored.
    /// `path` and `line` (1-based) are used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedBoolean`] if the circular field is not `Yes` or `No`.
    /// Returns [`Error::MalformedInput`] if a field is missing, an integer cannot be parsed, or there are no segments.
    pub fn parse(row: &str, path: &Path, line: usize) -> Result<Self, Error> {
        let malformed = |message: String| Error::MalformedInput { path: path.to_path_buf(), line, message };

        let mut fields = row.split(',');
        let chain_id = fields.next().ok_or_else(|| malformed(String::from("missing chain identifier")))?;
        let chain_id = chain_id.trim().parse::<u64>().map_err(|err| {
            malformed(format!("invalid chain identifier {}: {}", chain_id, err))
        })?;
        let circular = fields.next().ok_or_else(|| malformed(String::from("missing circular field")))?;
        let circular = parse_bool(circular).ok_or_else(|| Error::MalformedBoolean {
            path: path.to_path_buf(),
            line,
            token: circular.to_string(),
        })?;
        let position = fields.next().ok_or_else(|| malformed(String::from("missing position")))?;
        let position = position.trim().parse::<u64>().map_err(|err| {
            malformed(format!("invalid position {}: {}", position, err))
        })?;

        let segments: Vec<String> = fields.filter(|x| !x.is_empty()).map(String::from).collect();
        if segments.is_empty() {
            return Err(malformed(String::from("no segments")));
        }

        Ok(BubbleChainComponent { chain_id, circular, position, segments })
    }

    /// Returns `true` if the component is a polyploid bubble.
    pub fn is_bubble(&self) -> bool {
        self.segments.len() > 1
    }
}

impl Display for BubbleChainComponent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.chain_id, if self.circular { "Yes" } else { "No" }, self.position)?;
        for segment in self.segments.iter() {
            write!(f, "\t{}", segment)?;
        }
        Ok(())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "Yes" => Some(true),
        "No" => Some(false),
        _ => None,
    }
}

//-----------------------------------------------------------------------------

/// A bubble chain: components with the same chain identifier in file order.
///
/// A chain always has at least one component, and every component has at least one segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chain {
    components: Vec<BubbleChainComponent>,
}

impl Chain {
    /// Creates a chain from its components.
    ///
    /// Returns [`None`] if there are no components or if a component has no segments.
    pub fn new(components: Vec<BubbleChainComponent>) -> Option<Self> {
        if components.is_empty() || components.iter().any(|component| component.segments.is_empty()) {
            None
        } else {
            Some(Chain { components })
        }
    }

    /// Returns the chain identifier.
    pub fn id(&self) -> u64 {
        self.first().chain_id
    }

    /// Returns `true` if the chain is circular.
    pub fn is_circular(&self) -> bool {
        self.first().circular
    }

    /// Returns the number of components.
    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Always `false`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns the components in order.
    #[inline]
    pub fn components(&self) -> &[BubbleChainComponent] {
        &self.components
    }

    /// Returns the first component.
    pub fn first(&self) -> &BubbleChainComponent {
        &self.components[0]
    }

    /// Returns the last component.
    pub fn last(&self) -> &BubbleChainComponent {
        &self.components[self.components.len() - 1]
    }

    /// Returns the first segment of the first component.
    pub fn start_node(&self) -> &str {
        &self.first().segments[0]
    }

    /// Returns an iterator over the node names in all components in order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.components.iter().flat_map(|component| component.segments.iter().map(|x| x.as_str()))
    }

    /// Returns an iterator over the node names in the first and the last component.
    pub fn boundary_nodes(&self) -> impl Iterator<Item = &str> {
        self.first().segments.iter().chain(self.last().segments.iter()).map(|x| x.as_str())
    }
}

//-----------------------------------------------------------------------------

/// Maps the boundary nodes of each chain to the chain.
///
/// A node may be a boundary of only one chain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainBoundaryIndex {
    // Node name to (chain offset, chain identifier).
    chains: HashMap<String, (usize, u64)>,
}

impl ChainBoundaryIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the boundary nodes of the chain stored at `offset`.
    ///
    /// Returns [`Error::DuplicateBoundary`] if one of the nodes is already a boundary of another chain.
    /// Nothing is inserted in that case.
    pub fn insert(&mut self, offset: usize, chain: &Chain) -> Result<(), Error> {
        for node in chain.boundary_nodes() {
            if let Some(&(other, other_id)) = self.chains.get(node) {
                if other != offset {
                    return Err(Error::DuplicateBoundary {
                        node: node.to_string(),
                        first: other_id,
                        second: chain.id(),
                    });
                }
            }
        }
        for node in chain.boundary_nodes() {
            self.chains.insert(node.to_string(), (offset, chain.id()));
        }
        Ok(())
    }

    /// Returns the offset of the chain with the given boundary node.
    pub fn chain(&self, node: &str) -> Option<usize> {
        self.chains.get(node).map(|(offset, _)| *offset)
    }

    /// Returns the number of boundary nodes.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Returns `true` if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

//-----------------------------------------------------------------------------

/// Bubble chains parsed from a CSV file with an index of their boundary nodes.
///
/// # Examples
///
/// ```
/// use gfa_index::BubbleChains;
/// use std::path::Path;
///
/// let csv = "Chain,Circular,Position,Segment0,Segment1,\n\
///     1,No,0,A,\n\
///     1,No,1,B,C,\n\
///     1,No,2,D,\n\
///     2,No,0,E,\n";
/// let chains = BubbleChains::from_reader(csv.as_bytes(), Path::new("chains.csv")).unwrap();
///
/// // Chain 2 has only one component.
/// assert_eq!(chains.len(), 1);
/// let chain = chains.chain(0).unwrap();
/// assert_eq!(chain.id(), 1);
/// assert_eq!(chain.len(), 3);
/// assert_eq!(chain.nodes().collect::<Vec<_>>(), vec!["A", "B", "C", "D"]);
/// assert_eq!(chains.chain_with_boundary("D"), Some(0));
/// assert_eq!(chains.chain_with_boundary("B"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BubbleChains {
    chains: Vec<Chain>,
    boundaries: ChainBoundaryIndex,
}

impl BubbleChains {
    /// Reads bubble chains from a CSV file, which may be gzip-compressed.
    ///
    /// Returns [`Error::FileNotFound`] if the file cannot be opened.
    /// See [`BubbleChains::from_reader`] for other errors.
    pub fn from_file<P: AsRef<Path>>(filename: P) -> Result<Self, Error> {
        let reader = utils::open_file(&filename)?;
        let result = Self::from_reader(reader, filename.as_ref())?;
        info!(
            "Read {} bubble chains with {} boundary nodes from {}",
            result.len(), result.boundaries.len(), filename.as_ref().display()
        );
        Ok(result)
    }

    /// Reads bubble chains from CSV rows.
    ///
    /// The first row is a header and it is skipped.
    /// A chain ends when the chain identifier changes or the input ends.
    /// `path` is used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`] for an empty row and passes through errors from [`BubbleChainComponent::parse`].
    /// Returns [`Error::DuplicateBoundary`] if a node is a boundary of two chains.
    pub fn from_reader<R: BufRead>(reader: R, path: &Path) -> Result<Self, Error> {
        let mut result = BubbleChains::default();
        let mut chain: Vec<BubbleChainComponent> = Vec::new();

        for (i, row) in reader.lines().enumerate() {
            let mut row = utils::csv_row(row, path, i + 1)?;
            if i == 0 {
                continue;
            }
            if row.ends_with('\r') {
                row.pop();
            }
            if row.is_empty() {
                return Err(Error::MalformedInput {
                    path: path.to_path_buf(),
                    line: i + 1,
                    message: String::from("empty line"),
                });
            }

            let component = BubbleChainComponent::parse(&row, path, i + 1)?;
            if let Some(last) = chain.last() {
                if last.chain_id != component.chain_id {
                    result.close_chain(&mut chain)?;
                }
            }
            chain.push(component);
        }
        result.close_chain(&mut chain)?;

        Ok(result)
    }

    // Retains the chain if it has more than one component.
    fn close_chain(&mut self, components: &mut Vec<BubbleChainComponent>) -> Result<(), Error> {
        let components = std::mem::take(components);
        if components.len() <= 1 {
            return Ok(());
        }
        if let Some(chain) = Chain::new(components) {
            debug!("Chain {} with {} components", chain.id(), chain.len());
            self.boundaries.insert(self.chains.len(), &chain)?;
            self.chains.push(chain);
        }
        Ok(())
    }

    /// Returns the number of retained chains.
    #[inline]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Returns `true` if there are no chains.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Returns the chain at the given offset.
    pub fn chain(&self, offset: usize) -> Option<&Chain> {
        self.chains.get(offset)
    }

    /// Returns an iterator over the chains in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Chain> {
        self.chains.iter()
    }

    /// Returns the offset of the chain that has the given node in its first or last component.
    pub fn chain_with_boundary(&self, node: &str) -> Option<usize> {
        self.boundaries.chain(node)
    }

    /// Returns the boundary node index.
    pub fn boundaries(&self) -> &ChainBoundaryIndex {
        &self.boundaries
    }
}

//-----------------------------------------------------------------------------
