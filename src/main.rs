use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use crossword_csp::render::render_grid;
use crossword_csp::search::find_fill;
use crossword_csp::structure;
use crossword_csp::SolverConfig;

/// Fill a crossword structure with words from a word list.
#[derive(Parser, Debug)]
#[command(name = "crossword-csp", version)]
struct Args {
    /// Structure file: `_` marks an open cell, anything else a block
    structure: PathBuf,

    /// Word list, one word per line
    words: PathBuf,

    /// Also write the filled grid to this file
    output: Option<PathBuf>,

    /// Skip arc consistency before search
    #[arg(long)]
    no_ac3: bool,

    /// Maintain arc consistency during search
    #[arg(long)]
    mac: bool,

    /// Try candidates in dictionary order instead of least-constraining first
    #[arg(long)]
    no_lcv: bool,

    /// Search the first level of the tree in parallel
    #[arg(long)]
    parallel: bool,

    /// Print solve statistics to stderr
    #[arg(long)]
    stats: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let (structure, crossword) = structure::load(&args.structure, &args.words)?;
    info!(
        "Solving {} variables with {} words",
        crossword.variable_count(),
        crossword.words().len()
    );

    let config = SolverConfig::new()
        .with_arc_consistency(!args.no_ac3)
        .with_maintain_arc_consistency(args.mac)
        .with_least_constraining_value(!args.no_lcv)
        .with_parallel(args.parallel);

    match find_fill(&crossword, &config) {
        Ok(fill) => {
            if args.stats {
                eprintln!("{:?}", fill.statistics);
            }

            let grid = render_grid(&structure, &crossword, &fill.assignment);
            println!("{}", grid);

            if let Some(output) = &args.output {
                fs::write(output, grid + "\n")?;
                info!("Wrote grid to {}", output.display());
            }
        }
        Err(failure) => {
            if args.stats {
                eprintln!("{:?}: {:?}", failure.reason, failure.statistics);
            }
            println!("No solution.");
        }
    }

    Ok(())
}
