//! # GFA index: random access to large GFA files and single-stranded bubble chains.
//!
//! # Line index
//!
//! Assembly graphs in the GFA format can be too large to load into memory.
//! [`LineIndex`] stores the type and the starting offset of each line in the file, followed by a sentinel record at the end of the file.
//! The index is stored next to the GFA file in a companion file with extension `.gfai`.
//! Each record takes 9 bytes: the type character and the offset as a native-endian 64-bit integer.
//!
//! [`GFAReader`] opens a GFA file with its index, building the index if the companion file does not exist.
//! It reads individual lines with positioned reads and maps node names to the positions of their `S` and `L` lines.
//! All output is copied from the original file byte by byte.
//!
//! # Bubble chains
//!
//! A bubble chain is a sequence of components, each of which is either a haploid segment or a polyploid bubble with multiple alternative segments.
//! The chains are read from a CSV file into [`BubbleChains`].
//! Because the graph contains both strands, each chain usually appears twice.
//! [`NodeComplementMap`] pairs each node with its reverse complement, and [`resolve::find_single_stranded_chains`] uses it to select one chain from each complementary pair.
//! [`extract::extract_bubble_chains`] runs the entire pipeline and writes the selected chains as a GFA subgraph.
//!
//! # Logging
//!
//! The library reports progress through the [`log`] facade.
//! The binaries use `env_logger` with the default level `info`.

pub mod bubble_chain;
pub mod complement;
pub mod error;
pub mod extract;
pub mod gfa;
pub mod index;
pub mod resolve;
pub mod utils;

pub use bubble_chain::{BubbleChainComponent, BubbleChains, Chain, ChainBoundaryIndex};
pub use complement::NodeComplementMap;
pub use error::{ChainSizeMismatch, Error};
pub use extract::ExtractionStats;
pub use gfa::GFAReader;
pub use index::{LineIndex, LineRecord};
pub use resolve::SingleStrandedChains;
