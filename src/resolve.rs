//! Choosing one strand of each pair of complementary bubble chains.
//!
//! An assembly graph usually contains both strands of the sequence, and each bubble chain is then described twice.
//! The chain starting from node `A` has a complementary chain that starts or ends with the reverse complement of `A`.
//! [`find_single_stranded_chains`] pairs the chains and selects one representative from each pair.

use crate::{BubbleChains, ChainSizeMismatch, Error, NodeComplementMap};

use std::collections::HashSet;

use log::{debug, info};

#[cfg(test)]
mod tests;

//-----------------------------------------------------------------------------

/// Single-stranded representatives of bubble chains and the nodes they cover.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SingleStrandedChains {
    representatives: Vec<usize>,
    nodes: Vec<String>,
    node_set: HashSet<String>,
}

impl SingleStrandedChains {
    /// Returns the offsets of the representative chains in [`BubbleChains`] order.
    pub fn representatives(&self) -> &[usize] {
        &self.representatives
    }

    /// Returns the number of representative chains.
    pub fn len(&self) -> usize {
        self.representatives.len()
    }

    /// Returns `true` if there are no representatives.
    pub fn is_empty(&self) -> bool {
        self.representatives.is_empty()
    }

    /// Returns the distinct segment names of the representatives in chain and component order.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Returns the segment names of the representatives as a set.
    pub fn node_set(&self) -> &HashSet<String> {
        &self.node_set
    }

    fn add_representative(&mut self, offset: usize, chains: &BubbleChains) {
        self.representatives.push(offset);
        if let Some(chain) = chains.chain(offset) {
            for node in chain.nodes() {
                if self.node_set.insert(node.to_string()) {
                    self.nodes.push(node.to_string());
                }
            }
        }
    }
}

//-----------------------------------------------------------------------------

/// Selects one representative from each pair of complementary chains.
///
/// For each chain in order, the complement of the first segment of the first component identifies the complementary chain.
/// The complementary chain must have the same number of components.
/// If neither chain has been seen yet, the current chain becomes the representative and both are marked as seen.
/// A chain that is its own complement is its own representative.
///
/// # Errors
///
/// Returns [`Error::ComplementNotFound`] if the first node has no complement.
/// Returns [`Error::ComplementChainNotFound`] if no chain starts or ends with the complement.
/// Returns [`Error::ChainSizeMismatch`] if the chains have a different number of components.
///
/// # Examples
///
/// ```
/// use gfa_index::{resolve, BubbleChains, NodeComplementMap};
/// use std::path::Path;
///
/// let csv = "Chain,Circular,Position,Segment0,\n\
///     1,No,0,A,\n\
///     1,No,1,B,\n\
///     2,No,0,B',\n\
///     2,No,1,A',\n";
/// let chains = BubbleChains::from_reader(csv.as_bytes(), Path::new("chains.csv")).unwrap();
/// let mut complements = NodeComplementMap::new();
/// complements.insert("A", "A'").unwrap();
/// complements.insert("B", "B'").unwrap();
///
/// let resolved = resolve::find_single_stranded_chains(&chains, &complements).unwrap();
/// assert_eq!(resolved.representatives(), &[0]);
/// assert_eq!(resolved.nodes(), &["A", "B"]);
/// ```
pub fn find_single_stranded_chains(chains: &BubbleChains, complements: &NodeComplementMap) -> Result<SingleStrandedChains, Error> {
    let mut result = SingleStrandedChains::default();
    let mut found = vec![false; chains.len()];

    for (i, chain) in chains.iter().enumerate() {
        let node = chain.start_node();
        let complement = complements.complement(node).ok_or_else(|| Error::ComplementNotFound {
            node: node.to_string(),
        })?;
        let j = chains.chain_with_boundary(complement).ok_or_else(|| Error::ComplementChainNotFound {
            chain: chain.id(),
            node: complement.to_string(),
        })?;
        let other = chains.chain(j).ok_or(Error::IndexOutOfRange { index: j, len: chains.len() })?;

        if chain.len() != other.len() {
            return Err(Error::ChainSizeMismatch(Box::new(ChainSizeMismatch {
                chain_ids: (chain.id(), other.id()),
                node_ids: (node.to_string(), complement.to_string()),
                sizes: (chain.len(), other.len()),
                components: (chain.components().to_vec(), other.components().to_vec()),
            })));
        }

        if !found[i] && !found[j] {
            debug!("Chain {} represents chain {}", chain.id(), other.id());
            result.add_representative(i, chains);
            found[i] = true;
            found[j] = true;
        }
    }

    info!(
        "Found {} single-stranded chains with {} nodes out of {} chains",
        result.len(), result.nodes.len(), chains.len()
    );
    Ok(result)
}

//-----------------------------------------------------------------------------
