//! Cache/pipeline timing model CLI.
//!
//! This binary is the host around the core model. It performs:
//! 1. **Configuration:** Reads an optional JSON config and applies flag overrides.
//! 2. **Run:** Streams a trace through the simulator and prints the statistics.
//! 3. **Check:** Validates a cache geometry and reports its derived fields without running.

use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use cachepipe_core::Simulator;
use cachepipe_core::common::error::{Result, SimError};
use cachepipe_core::config::{BranchPolicy, Config};
use cachepipe_core::core::units::cache::CacheSim;

#[derive(Parser, Debug)]
#[command(
    name = "cachepipe",
    author,
    version,
    about = "Trace-driven 5-stage pipeline and LRU cache timing model",
    long_about = "Feed a text trace (`<hex address> <mnemonic> [operands...]` per line) through a \
                  set-associative LRU cache and a 5-stage in-order pipeline, then report cache \
                  and pipeline statistics.\n\nExamples:\n  \
                  cachepipe run traces/instruction.trace -i 7 -b 1 -a 1\n  \
                  cachepipe run traces/instruction.trace --config cache.json --predict taken\n  \
                  cachepipe check -i 5 -b 4 -a 2"
)]
struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a trace to completion and print statistics.
    Run {
        /// Trace file to simulate.
        trace: PathBuf,

        #[command(flatten)]
        settings: Settings,

        /// Log the contents of all five stages after every cycle (needs -v).
        #[arg(long)]
        dump_pipeline: bool,

        /// Print statistics as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Only print these sections: cache, pipeline, branch, stalls.
        #[arg(long, value_delimiter = ',')]
        sections: Vec<String>,
    },

    /// Validate a cache geometry and print its derived fields.
    Check {
        #[command(flatten)]
        settings: Settings,
    },
}

/// Configuration shared by all subcommands; flags override the config file.
#[derive(Args, Debug)]
struct Settings {
    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of index bits.
    #[arg(short, long)]
    index_bits: Option<u32>,

    /// Block size in 4-byte words.
    #[arg(short, long)]
    block_size: Option<u32>,

    /// Lines per set.
    #[arg(short, long)]
    assoc: Option<u32>,

    /// Static branch prediction.
    #[arg(short, long, value_enum)]
    predict: Option<Prediction>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Prediction {
    /// Predict every branch falls through.
    NotTaken,
    /// Predict every branch is taken.
    Taken,
}

impl Settings {
    /// Loads the config file (if any) and applies the flag overrides.
    fn resolve(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };
        if let Some(index_bits) = self.index_bits {
            config.cache.index_bits = index_bits;
        }
        if let Some(block_size) = self.block_size {
            config.cache.block_size_words = block_size;
        }
        if let Some(assoc) = self.assoc {
            config.cache.associativity = assoc;
        }
        if let Some(predict) = self.predict {
            config.pipeline.branch_policy =
                BranchPolicy::from_predict_taken(matches!(predict, Prediction::Taken));
        }
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Config::from_json(&text)
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            trace,
            settings,
            dump_pipeline,
            json,
            sections,
        } => cmd_run(&trace, &settings, dump_pipeline, json, &sections),
        Commands::Check { settings } => cmd_check(&settings),
    };

    if let Err(e) = result {
        eprintln!("[!] FATAL: {e}");
        process::exit(1);
    }
}

/// Runs a trace file and prints its statistics.
fn cmd_run(
    trace: &Path,
    settings: &Settings,
    dump_pipeline: bool,
    json: bool,
    sections: &[String],
) -> Result<()> {
    let mut config = settings.resolve()?;
    config.general.dump_pipeline |= dump_pipeline;

    let mut sim = Simulator::new(&config)?;
    let stats = sim.run_trace_file(trace)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        stats.print_sections(sections);
    }
    Ok(())
}

/// Validates the geometry and prints the derived address fields.
fn cmd_check(settings: &Settings) -> Result<()> {
    let config = settings.resolve()?;
    let cache = CacheSim::new(&config.cache)?;
    println!("Cache Configuration");
    println!(
        "  index          {} bits ({} sets)",
        config.cache.index_bits,
        cache.num_sets()
    );
    println!("  block_size     {} words", config.cache.block_size_words);
    println!("  associativity  {}", cache.ways());
    println!("  offset_bits    {}", config.cache.offset_bits());
    println!("  tag_bits       {}", config.cache.tag_bits());
    println!("  capacity       {} bits", config.cache.capacity_bits());
    println!("  branch_policy  {:?}", config.pipeline.branch_policy);
    Ok(())
}
