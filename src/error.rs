//! Error types for GFA indexing and bubble chain extraction.

use crate::bubble_chain::BubbleChainComponent;

use std::fmt::{self, Display};
use std::io;
use std::path::PathBuf;

use thiserror::Error;

//-----------------------------------------------------------------------------

/// Errors that can occur while indexing, querying, or extracting from a GFA file.
///
/// All of them are fatal to the operation that returned them.
#[derive(Debug, Error)]
pub enum Error {
    /// An input file could not be opened.
    #[error("could not open {}: {source}", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A read, seek, or write failed after the file was opened.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A malformed row in a CSV input.
    #[error("{}:{line}: {message}", .path.display())]
    MalformedInput {
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        message: String,
    },

    /// A boolean field that is neither `Yes` nor `No`.
    #[error("{}:{line}: cannot parse string as boolean: {token}", .path.display())]
    MalformedBoolean {
        path: PathBuf,
        line: usize,
        token: String,
    },

    /// The node has no sequence line or no link lines in the GFA file.
    #[error("could not find node in GFA: {node}")]
    NodeNotFound { node: String },

    /// Complementary bubble chains have a different number of components.
    #[error("bubble chain complement does not match size:\n{0}")]
    ChainSizeMismatch(Box<ChainSizeMismatch>),

    /// A line index position beyond the last real line.
    #[error("line {index} is out of range for an index with {len} lines")]
    IndexOutOfRange { index: usize, len: usize },

    /// The index gives a line a byte range that is decreasing or extends past the end of the file.
    #[error("line {index} has an invalid byte range {start}..{end}; the index may be corrupt")]
    InvalidLineRange { index: usize, start: u64, end: u64 },

    /// The same node is a boundary node of two different chains.
    #[error("node {node} is a boundary of both chain {first} and chain {second}")]
    DuplicateBoundary { node: String, first: u64, second: u64 },

    /// A node would be paired with a second complement.
    #[error("node {node} is already paired with {existing}; cannot pair it with {new}")]
    DuplicateComplement { node: String, existing: String, new: String },

    /// The node has no entry in the complement map.
    #[error("no complement found for node {node}")]
    ComplementNotFound { node: String },

    /// No chain has the complement node as a boundary.
    #[error("no bubble chain starts or ends with node {node}, the complement of chain {chain}")]
    ComplementChainNotFound { chain: u64, node: String },
}

//-----------------------------------------------------------------------------

/// Diagnostic information for [`Error::ChainSizeMismatch`].
///
/// Chain `a` is the chain being resolved and chain `b` is the chain found through the complement of its first node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainSizeMismatch {
    pub chain_ids: (u64, u64),
    pub node_ids: (String, String),
    pub sizes: (usize, usize),
    pub components: (Vec<BubbleChainComponent>, Vec<BubbleChainComponent>),
}

impl Display for ChainSizeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\tChain IDs (A B): {} {}", self.chain_ids.0, self.chain_ids.1)?;
        writeln!(f, "\tNode IDs (A B): {} {}", self.node_ids.0, self.node_ids.1)?;
        writeln!(f, "\tChain sizes (A B): {} {}", self.sizes.0, self.sizes.1)?;
        writeln!(f)?;
        for component in self.components.0.iter() {
            writeln!(f, "{}", component)?;
        }
        writeln!(f)?;
        for component in self.components.1.iter() {
            writeln!(f, "{}", component)?;
        }
        Ok(())
    }
}

//-----------------------------------------------------------------------------
