use super::*;

use crate::utils;

use std::path::Path;

//-----------------------------------------------------------------------------

fn parse_chains(rows: &str) -> BubbleChains {
    let csv = format!("Chain,Circular,Position,Segment0,Segment1,\n{}", rows);
    let result = BubbleChains::from_reader(csv.as_bytes(), Path::new("chains.csv"));
    assert!(result.is_ok(), "Failed to parse chains: {}", result.unwrap_err());
    result.unwrap()
}

fn complement_map(pairs: &[(&str, &str)]) -> NodeComplementMap {
    let mut result = NodeComplementMap::new();
    for (forward, reverse) in pairs.iter() {
        result.insert(forward, reverse).unwrap();
    }
    result
}

//-----------------------------------------------------------------------------

#[test]
fn complementary_pair() {
    let chains = parse_chains(
        "1,No,0,A,\n\
         1,No,1,B,\n\
         2,No,0,A',\n\
         2,No,1,B',\n"
    );
    let complements = complement_map(&[("A", "A'"), ("B", "B'")]);
    let resolved = find_single_stranded_chains(&chains, &complements).unwrap();

    assert_eq!(resolved.representatives(), &[0], "Exactly one chain should be selected");
    assert_eq!(resolved.nodes(), &["A", "B"]);
    assert!(!resolved.node_set().contains("A'"), "Complement node in the node set");
    assert!(!resolved.node_set().contains("B'"), "Complement node in the node set");
}

#[test]
fn polyploid_components() {
    let chains = parse_chains(
        "1,No,0,10,\n\
         1,No,1,20,30,\n\
         1,No,2,40,\n\
         2,No,0,41,\n\
         2,No,1,31,21,\n\
         2,No,2,11,\n"
    );
    let complements = complement_map(&[("10", "11"), ("20", "21"), ("30", "31"), ("40", "41")]);
    let resolved = find_single_stranded_chains(&chains, &complements).unwrap();

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved.nodes(), &["10", "20", "30", "40"]);
    assert_eq!(resolved.node_set().len(), 4);
}

#[test]
fn self_complementary_chain() {
    let chains = parse_chains(
        "1,No,0,A,\n\
         1,No,1,B,\n\
         1,No,2,A',\n"
    );
    let complements = complement_map(&[("A", "A'")]);
    let resolved = find_single_stranded_chains(&chains, &complements).unwrap();
    assert_eq!(resolved.representatives(), &[0]);
    assert_eq!(resolved.nodes(), &["A", "B", "A'"]);
}

#[test]
fn shared_nodes_are_listed_once() {
    let chains = parse_chains(
        "1,No,0,A,\n\
         1,No,1,X,\n\
         1,No,2,B,\n\
         2,No,0,D,\n\
         2,No,1,X,\n\
         2,No,2,E,\n\
         3,No,0,B',\n\
         3,No,1,X',\n\
         3,No,2,A',\n\
         4,No,0,E',\n\
         4,No,1,X',\n\
         4,No,2,D',\n"
    );
    let complements = complement_map(&[("A", "A'"), ("B", "B'"), ("D", "D'"), ("E", "E'"), ("X", "X'")]);
    let resolved = find_single_stranded_chains(&chains, &complements).unwrap();
    assert_eq!(resolved.representatives(), &[0, 1]);
    assert_eq!(resolved.nodes(), &["A", "X", "B", "D", "E"]);
}

#[test]
fn size_mismatch() {
    let chains = parse_chains(
        "1,No,0,A,\n\
         1,No,1,B,\n\
         1,No,2,C,\n\
         2,No,0,A',\n\
         2,No,1,B',\n"
    );
    let complements = complement_map(&[("A", "A'"), ("B", "B'"), ("C", "C'")]);
    match find_single_stranded_chains(&chains, &complements) {
        Err(Error::ChainSizeMismatch(mismatch)) => {
            assert_eq!(mismatch.chain_ids, (1, 2));
            assert_eq!(mismatch.node_ids, (String::from("A"), String::from("A'")));
            assert_eq!(mismatch.sizes, (3, 2));
            assert_eq!(mismatch.components.0, chains.chain(0).unwrap().components());
            assert_eq!(mismatch.components.1, chains.chain(1).unwrap().components());

            let message = Error::ChainSizeMismatch(mismatch).to_string();
            assert!(message.contains("Chain IDs (A B): 1 2"), "Missing chain ids in: {}", message);
            assert!(message.contains("Node IDs (A B): A A'"), "Missing node ids in: {}", message);
            assert!(message.contains("Chain sizes (A B): 3 2"), "Missing sizes in: {}", message);
            assert!(message.contains("1\tNo\t2\tC"), "Missing component in: {}", message);
        },
        result => panic!("Expected ChainSizeMismatch, got {:?}", result),
    }
}

#[test]
fn missing_complement() {
    let chains = parse_chains(
        "1,No,0,A,\n\
         1,No,1,B,\n"
    );
    let result = find_single_stranded_chains(&chains, &NodeComplementMap::new());
    match result {
        Err(Error::ComplementNotFound { node }) => assert_eq!(node, "A"),
        result => panic!("Expected ComplementNotFound, got {:?}", result),
    }

    let complements = complement_map(&[("A", "A'")]);
    match find_single_stranded_chains(&chains, &complements) {
        Err(Error::ComplementChainNotFound { chain, node }) => {
            assert_eq!(chain, 1);
            assert_eq!(node, "A'");
        },
        result => panic!("Expected ComplementChainNotFound, got {:?}", result),
    }
}

#[test]
fn no_chains() {
    let chains = parse_chains("");
    let resolved = find_single_stranded_chains(&chains, &NodeComplementMap::new()).unwrap();
    assert!(resolved.is_empty());
    assert!(resolved.nodes().is_empty());
}

//-----------------------------------------------------------------------------

#[test]
fn test_files() {
    let chains = BubbleChains::from_file(utils::get_test_data("bubble_chains.csv")).unwrap();
    let complements = NodeComplementMap::from_assembly_summary(utils::get_test_data("assembly_summary.csv")).unwrap();
    let resolved = find_single_stranded_chains(&chains, &complements).unwrap();

    let ids: Vec<u64> = resolved.representatives().iter().map(|&i| chains.chain(i).unwrap().id()).collect();
    assert_eq!(ids, vec![1, 4], "Wrong representative chains");
    assert_eq!(resolved.nodes(), &["10", "20", "30", "40", "50", "60"]);
}

//-----------------------------------------------------------------------------
