use gfa_index::extract;

use std::time::Instant;
use std::{env, fs, process};

use getopts::Options;

//-----------------------------------------------------------------------------

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let start_time = Instant::now();

    // Parse arguments.
    let config = Config::new()?;

    // Create the output directory.
    fs::create_dir_all(&config.output_dir).map_err(|x| format!("{}: {}", config.output_dir, x))?;

    // Extract the chains.
    let stats = extract::extract_bubble_chains(
        &config.gfa_file, &config.bubbles, &config.summary, &config.output_dir
    ).map_err(|x| x.to_string())?;

    // Statistics.
    eprintln!(
        "Wrote {} of {} bubble chains with {} segments and {} links to {}",
        stats.representatives, stats.chains, stats.nodes, stats.links, stats.output.display()
    );

    let end_time = Instant::now();
    let seconds = end_time.duration_since(start_time).as_secs_f64();
    eprintln!("Used {:.3} seconds", seconds);

    Ok(())
}

//-----------------------------------------------------------------------------

struct Config {
    pub gfa_file: String,
    pub bubbles: String,
    pub summary: String,
    pub output_dir: String,
}

impl Config {
    pub fn new() -> Result<Config, String> {
        let args: Vec<String> = env::args().collect();
        let program = args[0].clone();

        let mut opts = Options::new();
        opts.optflag("h", "help", "print this help");
        opts.optopt("b", "bubbles", "bubble chains CSV (required)", "FILE");
        opts.optopt("s", "summary", "assembly summary CSV with complementary nodes (required)", "FILE");
        opts.optopt("o", "output-dir", "output directory (default: output)", "DIR");
        let matches = opts.parse(&args[1..]).map_err(|x| x.to_string())?;

        let mut output_dir = String::from("output");
        if matches.opt_present("h") {
            let header = format!("Usage: {} [options] graph.gfa", program);
            eprint!("{}", opts.usage(&header));
            process::exit(0);
        }
        let bubbles = matches.opt_str("b");
        let summary = matches.opt_str("s");
        if let Some(s) = matches.opt_str("o") {
            output_dir = s;
        }

        let gfa_file = if let Some(s) = matches.free.first() {
            s.clone()
        } else {
            let header = format!("Usage: {} [options] graph.gfa", program);
            eprint!("{}", opts.usage(&header));
            process::exit(1);
        };

        Ok(Config {
            gfa_file,
            bubbles: bubbles.ok_or("Bubble chains must be provided with --bubbles".to_string())?,
            summary: summary.ok_or("Assembly summary must be provided with --summary".to_string())?,
            output_dir,
        })
    }
}

//-----------------------------------------------------------------------------
