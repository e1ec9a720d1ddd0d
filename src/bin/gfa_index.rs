use gfa_index::{utils, GFAReader};

use std::collections::HashSet;
use std::io::{self, Write};
use std::time::Instant;
use std::{env, process};

use getopts::Options;

//-----------------------------------------------------------------------------

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let start_time = Instant::now();

    // Parse arguments.
    let config = Config::new()?;

    // Build or load the index.
    let reader = GFAReader::open(&config.gfa_file).map_err(|x| x.to_string())?;

    // Statistics.
    let index = reader.index();
    let size = utils::file_size(reader.gfa_path()).unwrap_or(String::from("unknown size"));
    eprintln!("{}: {} lines, {}", config.gfa_file, index.len(), size);
    for (line_type, count) in index.type_counts() {
        eprintln!("  {}: {} lines", line_type as char, count);
    }

    // Queries.
    if !config.nodes.is_empty() {
        let mut output = io::stdout().lock();
        if config.lengths {
            for node in config.nodes.iter() {
                let len = reader.sequence_length(node).map_err(|x| x.to_string())?;
                writeln!(output, "{}\t{}", node, len).map_err(|x| x.to_string())?;
            }
        } else {
            let nodes: HashSet<&str> = config.nodes.iter().map(|x| x.as_str()).collect();
            let mut unique: HashSet<&str> = HashSet::new();
            let ordered = config.nodes.iter().map(|x| x.as_str()).filter(|x| unique.insert(*x));
            reader.write_segments(ordered, &mut output).map_err(|x| x.to_string())?;
            reader.write_link_subset(&nodes, &mut output).map_err(|x| x.to_string())?;
        }
        output.flush().map_err(|x| x.to_string())?;
    }

    let end_time = Instant::now();
    let seconds = end_time.duration_since(start_time).as_secs_f64();
    eprintln!("Used {:.3} seconds", seconds);

    Ok(())
}

//-----------------------------------------------------------------------------

struct Config {
    pub gfa_file: String,
    pub nodes: Vec<String>,
    pub lengths: bool,
}

impl Config {
    pub fn new() -> Result<Config, String> {
        let args: Vec<String> = env::args().collect();
        let program = args[0].clone();

        let mut opts = Options::new();
        opts.optflag("h", "help", "print this help");
        opts.optmulti("n", "node", "write the subgraph induced by this node to stdout (may repeat)", "NAME");
        opts.optflag("l", "lengths", "print the sequence lengths of the nodes instead of the subgraph");
        let matches = opts.parse(&args[1..]).map_err(|x| x.to_string())?;

        let header = format!("Usage: {} [options] graph.gfa", program);
        if matches.opt_present("h") {
            eprint!("{}", opts.usage(&header));
            process::exit(0);
        }
        let nodes = matches.opt_strs("n");
        let lengths = matches.opt_present("l");
        if lengths && nodes.is_empty() {
            return Err(String::from("--lengths requires at least one --node"));
        }

        let gfa_file = if let Some(s) = matches.free.first() {
            s.clone()
        } else {
            eprint!("{}", opts.usage(&header));
            process::exit(1);
        };

        Ok(Config {
            gfa_file,
            nodes,
            lengths,
        })
    }
}

//-----------------------------------------------------------------------------
