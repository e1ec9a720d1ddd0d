//! Extracting single-stranded bubble chains from a GFA file.
//!
//! The pipeline reads the complementary node pairs and the bubble chains, selects one strand of each chain with [`resolve::find_single_stranded_chains`], and writes the selected chains as a GFA subgraph.

use crate::{resolve, BubbleChains, Error, GFAReader, NodeComplementMap};

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};


//-----------------------------------------------------------------------------

/// Suffix of the output file name after the stem of the GFA file.
pub const OUTPUT_SUFFIX: &str = "bubble_chains.gfa";

/// Statistics from [`extract_bubble_chains`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Number of retained bubble chains.
    pub chains: usize,
    /// Number of single-stranded representatives.
    pub representatives: usize,
    /// Number of segment lines written.
    pub nodes: usize,
    /// Number of link lines written.
    pub links: usize,
    /// The output file.
    pub output: PathBuf,
}

/// Returns the name of the output file for the GFA file in the output directory.
///
/// # Examples
///
/// ```
/// use gfa_index::extract;
/// use std::path::Path;
///
/// let output = extract::output_file_name("graphs/assembly.gfa", "output");
/// assert_eq!(output, Path::new("output/assembly.bubble_chains.gfa"));
/// ```
pub fn output_file_name<P: AsRef<Path>, Q: AsRef<Path>>(gfa_file: P, output_dir: Q) -> PathBuf {
    let mut name = gfa_file.as_ref().file_stem().map(|x| x.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(OUTPUT_SUFFIX);
    output_dir.as_ref().join(name)
}

//-----------------------------------------------------------------------------

/// Writes the single-stranded bubble chains of a GFA file into the output directory.
///
/// The output file is named by [`output_file_name`].
/// It contains the segment lines of the representative chains in chain and component order, followed by the link lines where both endpoints are in the chains.
/// Each segment line is written once.
///
/// The output directory must exist.
/// If an error occurs while writing, the partial output file is removed.
///
/// # Arguments
///
/// * `gfa_file`: The GFA file, which will be indexed if necessary.
/// * `bubbles`: Bubble chains CSV.
/// * `summary`: Assembly summary CSV with complementary node pairs.
/// * `output_dir`: Directory for the output file.
///
/// # Errors
///
/// Passes through errors from reading the inputs and from [`resolve::find_single_stranded_chains`].
/// Returns [`Error::NodeNotFound`] before creating the output file if a node in the representative chains has no segment line.
pub fn extract_bubble_chains<P, Q, R, S>(gfa_file: P, bubbles: Q, summary: R, output_dir: S) -> Result<ExtractionStats, Error>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
    S: AsRef<Path>,
{
    let complements = NodeComplementMap::from_assembly_summary(summary)?;
    let reader = GFAReader::open(&gfa_file)?;
    let chains = BubbleChains::from_file(bubbles)?;
    let resolved = resolve::find_single_stranded_chains(&chains, &complements)?;
    drop(complements);

    let mut lines: Vec<usize> = Vec::with_capacity(resolved.nodes().len());
    for node in resolved.nodes() {
        lines.push(reader.sequence_line(node)?);
    }

    let output = output_file_name(&gfa_file, output_dir);
    info!("Writing {} single-stranded chains to {}", resolved.len(), output.display());
    let links = match write_chains(&reader, &lines, resolved.node_set(), &output) {
        Ok(links) => links,
        Err(err) => {
            if let Err(remove_err) = fs::remove_file(&output) {
                warn!("Could not remove partial output {}: {}", output.display(), remove_err);
            }
            return Err(err);
        },
    };

    Ok(ExtractionStats {
        chains: chains.len(),
        representatives: resolved.len(),
        nodes: lines.len(),
        links,
        output,
    })
}

fn write_chains(reader: &GFAReader, lines: &[usize], nodes: &HashSet<String>, output: &Path) -> Result<usize, Error> {
    let mut writer = BufWriter::new(File::create(output)?);
    reader.write_lines(lines, &mut writer)?;
    let links = reader.write_link_subset(nodes, &mut writer)?;
    writer.flush()?;
    Ok(links)
}

//-----------------------------------------------------------------------------
