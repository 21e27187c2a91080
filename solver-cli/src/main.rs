//! Command-line front end: parse a model file in the text notation and run
//! one of the solvers against it.

mod parse;
mod render;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use solver_core::{
    analyze, canonicalize, solve_revised, solve_tableau, Model, SolverError, SolverSettings,
};
use solver_mip::{BranchAndBound, CuttingPlane, KnapsackSolver, MipSettings};

use render::JsonSolution;

#[derive(Parser)]
#[command(name = "solvix")]
#[command(about = "LP/IP solver over a small text modelling notation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the LP relaxation with the primal simplex
    Solve {
        /// Model file
        file: PathBuf,
        /// Use the revised engine (explicit basis inverse)
        #[arg(long)]
        revised: bool,
        /// Print sensitivity analysis of the final basis
        #[arg(long)]
        sensitivity: bool,
        /// Emit a JSON summary instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Solve as an integer program by branch-and-bound
    Branch {
        /// Model file
        file: PathBuf,
        /// Node cap
        #[arg(long, default_value = "1000")]
        max_nodes: usize,
        /// Emit a JSON summary instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Solve as an integer program by iterated rounding cuts
    Cuts {
        /// Model file
        file: PathBuf,
        /// Round cap
        #[arg(long, default_value = "30")]
        max_rounds: usize,
        /// Emit a JSON summary instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Solve a 0/1 knapsack model (first constraint is the capacity row)
    Knapsack {
        /// Model file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            file,
            revised,
            sensitivity,
            json,
        } => run_solve(&file, revised, sensitivity, json),
        Commands::Branch {
            file,
            max_nodes,
            json,
        } => {
            let model = load_model(&file)?;
            let settings = MipSettings::default().with_max_nodes(max_nodes);
            let result = BranchAndBound::new(settings).solve(&model)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&JsonSolution::from_mip(&result))?);
            } else {
                print!("{}", render::branch_report(&result));
            }
            Ok(())
        }
        Commands::Cuts {
            file,
            max_rounds,
            json,
        } => {
            let model = load_model(&file)?;
            let settings = MipSettings::default().with_max_cut_rounds(max_rounds);
            let result = CuttingPlane::new(settings).solve(&model)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&JsonSolution::from_mip(&result))?);
            } else {
                print!("{}", render::cuts_report(&result));
            }
            Ok(())
        }
        Commands::Knapsack { file } => {
            let model = load_model(&file)?;
            let solution = KnapsackSolver::new(MipSettings::default()).solve(&model)?;
            print!("{}", render::knapsack_report(&solution));
            Ok(())
        }
    }
}

fn load_model(path: &Path) -> Result<Model> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read model file {}", path.display()))?;
    let model = parse::parse_model(&text)
        .with_context(|| format!("cannot parse model file {}", path.display()))?;
    log::debug!(
        "parsed model: {} variables, {} constraints",
        model.num_vars(),
        model.num_constraints()
    );
    Ok(model)
}

fn run_solve(file: &Path, revised: bool, sensitivity: bool, json: bool) -> Result<()> {
    let model = load_model(file)?;
    let settings = SolverSettings::default();
    let canon = canonicalize(&model, &settings)?;

    if !json {
        print!("{}", render::canonical_preamble(&canon));
        println!();
    }

    let engine = if revised { solve_revised } else { solve_tableau };
    let log = match engine(&canon, &settings) {
        Ok(log) => log,
        Err(SolverError::Unbounded(log))
        | Err(SolverError::Infeasible(log))
        | Err(SolverError::IterationLimit(log)) => {
            // Terminal outcomes still get their partial run rendered.
            *log
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&JsonSolution::from_log(&log))?);
        return Ok(());
    }

    if revised {
        print!("{}", render::revised_report(&log));
    } else {
        print!("{}", render::tableau_report(&log));
        println!("{:?}", log.status);
    }

    if sensitivity && log.status.is_optimal() {
        let basis = log
            .final_basis()
            .context("solve log carries no basis snapshot")?;
        let report = analyze(&canon, basis)?;
        println!();
        print!("{}", render::sensitivity_report(&report));
    }

    Ok(())
}
