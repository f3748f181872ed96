//! GLS-TSP - Command Line Interface
//!
//! Runs guided local search on a TSP instance stored as JSON, either
//! `{"matrix": [[...], ...]}` or `{"coords": [[x, y], ...]}`.

use clap::{Parser, Subcommand, ValueEnum};
use gls_tsp::heuristics::gls::GlsConfig;
use gls_tsp::heuristics::guide::UtilityGuide;
use gls_tsp::heuristics::multi_start::{MultiStart, MultiStartConfig, StartNodes};
use gls_tsp::instance::DistanceMatrix;
use serde::Deserialize;

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gls-tsp")]
#[command(version = "1.0")]
#[command(about = "Guided Local Search for the Traveling Salesman Problem")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Solve {
        /// Path to the JSON instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// Parameter preset
        #[arg(long, value_enum, default_value = "library")]
        preset: Preset,

        /// Time limit per run in seconds
        #[arg(short, long)]
        time_limit: Option<f64>,

        /// Maximum perturbation rounds per run
        #[arg(long)]
        iter_limit: Option<usize>,

        /// Edges penalized per perturbation round
        #[arg(long)]
        perturbation_moves: Option<usize>,

        /// Iteration cap of every local search call
        #[arg(long)]
        local_search_cap: Option<usize>,

        /// Number of independent starts
        #[arg(long, default_value = "1")]
        starts: usize,

        /// Worker threads (defaults to all cores)
        #[arg(long)]
        threads: Option<usize>,

        /// Sample start nodes with this seed instead of spreading them evenly
        #[arg(short, long)]
        seed: Option<u64>,

        /// Weight of the utility bump on tour edges
        #[arg(long, default_value = "1.0")]
        guide_weight: f32,

        /// Penalty factor relative to the average tour edge length
        #[arg(long, default_value = "0.1")]
        guide_alpha: f32,

        /// Output result to JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze an instance
    Analyze {
        /// Path to the JSON instance file
        #[arg(short, long)]
        instance: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Preset {
    /// General-purpose solving (30 penalized edges per round)
    Library,
    /// Fast guide scoring (5 penalized edges per round)
    Evaluator,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InstanceFile {
    Matrix { matrix: DistanceMatrix },
    Coords { coords: Vec<(f64, f64)> },
}

fn load_instance(path: &Path) -> Result<DistanceMatrix, String> {
    let text =
        std::fs::read_to_string(path).map_err(|e| format!("Cannot open file: {}", e))?;
    let file: InstanceFile =
        serde_json::from_str(&text).map_err(|e| format!("Invalid instance: {}", e))?;

    match file {
        InstanceFile::Matrix { matrix } => Ok(matrix),
        InstanceFile::Coords { coords } => {
            DistanceMatrix::from_coords(&coords).map_err(|e| e.to_string())
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            instance,
            preset,
            time_limit,
            iter_limit,
            perturbation_moves,
            local_search_cap,
            starts,
            threads,
            seed,
            guide_weight,
            guide_alpha,
            output,
            verbose,
        } => {
            let mut gls = match preset {
                Preset::Library => GlsConfig::library(),
                Preset::Evaluator => GlsConfig::evaluator(),
            };
            if let Some(t) = time_limit {
                gls.time_limit = t;
            }
            if let Some(i) = iter_limit {
                gls.iter_limit = i;
            }
            if let Some(m) = perturbation_moves {
                gls.perturbation_moves = m;
            }
            if let Some(c) = local_search_cap {
                gls.local_search_cap = c;
            }

            let config = MultiStartConfig {
                n_starts: starts,
                threads,
                start_nodes: match seed {
                    Some(seed) => StartNodes::Random { seed },
                    None => StartNodes::Spread,
                },
                gls,
            };

            let guide = UtilityGuide::new(guide_weight, guide_alpha);
            solve_instance(&instance, config, guide, output, verbose);
        }

        Commands::Analyze { instance } => {
            analyze_instance(&instance);
        }
    }
}

fn solve_instance(
    path: &Path,
    config: MultiStartConfig,
    guide: UtilityGuide,
    output: Option<PathBuf>,
    verbose: bool,
) {
    println!("Loading instance from {:?}...", path);

    let distances = match load_instance(path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    };

    if verbose {
        println!("{}", distances.statistics());
        println!("Config: {:?}", config);
    }

    println!("Solving with {} start(s)...", config.n_starts);

    let search = MultiStart::new(guide, config);
    let result = match search.run(&distances) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Search failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n========== Results ==========");
    println!("Cost: {:.2}", result.best_cost);
    println!("Time: {:.4}s", result.elapsed_time);
    println!("Iterations: {}", result.iterations);
    println!("Start node: {}", result.start_node);

    if verbose {
        println!("\n{}", result);
    }

    if let Some(out_path) = output {
        let written = serde_json::to_string_pretty(&result)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&out_path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => println!("\nResult saved to {:?}", out_path),
            Err(e) => {
                eprintln!("Failed to write output: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn analyze_instance(path: &Path) {
    let distances = match load_instance(path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    };

    println!("========== Instance Analysis ==========\n");
    println!("{}", distances.statistics());
}
