//! VQE (Variational Quantum Eigensolver) Demo
//!
//! Runs the hybrid loop end to end against the local statevector estimator:
//! the classical minimizer proposes parameters, the estimator returns an
//! energy, and the result is checked against exact diagonalization.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use arvak_adapter_sim::StatevectorEstimator;
use arvak_demos::circuits::AnsatzKind;
use arvak_demos::problems::ProblemKind;
use arvak_demos::{
    ProgressBarObserver, create_progress_bar, print_header, print_info, print_result,
    print_section, print_success, print_warning,
};
use arvak_vqe::{Ansatz, OptimizerKind, ValidationReport, VqeConfig, VqeRunner};

/// 1 kcal/mol in Hartree.
const CHEMICAL_ACCURACY: f64 = 1.6e-3;

#[derive(Parser, Debug)]
#[command(name = "demo-vqe")]
#[command(about = "Demonstrate VQE for molecular ground state estimation")]
struct Args {
    /// YAML run configuration; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Problem Hamiltonian (defaults to the config file's, then h2-reduced)
    #[arg(short, long, value_enum)]
    problem: Option<ProblemKind>,

    /// Ansatz template
    #[arg(short, long, value_enum, default_value_t = AnsatzKind::ReducedH2)]
    ansatz: AnsatzKind,

    /// Number of ansatz repetitions (layered templates only)
    #[arg(short, long, default_value = "2")]
    reps: usize,

    /// Classical optimizer (nelder-mead, spsa)
    #[arg(long)]
    optimizer: Option<OptimizerKind>,

    /// Maximum optimizer iterations
    #[arg(short = 'i', long)]
    max_iterations: Option<usize>,

    /// Number of shots per Pauli term
    #[arg(short, long, conflicts_with = "exact")]
    shots: Option<u32>,

    /// Use exact expectation values instead of sampled ones
    #[arg(long)]
    exact: bool,

    /// Seed for the initial point, SPSA perturbations and shot noise
    #[arg(long)]
    seed: Option<u64>,

    /// Circuit simplification level passed to the estimator
    #[arg(long)]
    optimization_level: Option<u8>,

    /// Re-estimate the final point this many times and report the mean
    #[arg(long)]
    final_resamples: Option<usize>,

    /// Write the full result (including history) as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Merge the command line over the loaded configuration.
    fn apply(&self, mut config: VqeConfig) -> VqeConfig {
        if let Some(optimizer) = self.optimizer {
            config = config.with_optimizer(optimizer);
        }
        if let Some(max_iterations) = self.max_iterations {
            config = config.with_max_iterations(max_iterations);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.exact {
            config.estimator.shots = None;
        } else if let Some(shots) = self.shots {
            config.estimator.shots = Some(shots);
        }
        if let Some(level) = self.optimization_level {
            config.estimator.optimization_level = level;
        }
        if let Some(resamples) = self.final_resamples {
            config = config.with_final_resamples(resamples);
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup logging
    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let base = match &args.config {
        Some(path) => VqeConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => VqeConfig::default(),
    };
    let config = args.apply(base);

    let (hamiltonian, problem_name) = match (args.problem, &config.hamiltonian) {
        (Some(kind), _) => (kind.hamiltonian()?, kind.molecule_name().to_string()),
        (None, Some(h)) => (h.clone(), "custom (from config)".to_string()),
        (None, None) => {
            let kind = ProblemKind::default();
            (kind.hamiltonian()?, kind.molecule_name().to_string())
        }
    };
    let ansatz = args.ansatz.build(hamiltonian.num_qubits(), args.reps)?;

    print_header("VQE Molecular Simulation Demo");

    print_section("Problem Setup");
    print_result("Problem", &problem_name);
    print_result("Qubits", hamiltonian.num_qubits());
    print_result("Hamiltonian terms", hamiltonian.num_terms());
    print_result("Ansatz", format!("{} ({})", ansatz.name(), args.ansatz));
    print_result("Parameters", ansatz.num_parameters());
    print_result("Optimizer", config.optimizer);
    print_result("Max iterations", config.minimizer.max_iterations);
    match config.estimator.shots {
        Some(shots) => print_result("Shots per term", shots),
        None => print_result("Shots per term", "exact"),
    }
    if let Some(seed) = config.seed {
        print_result("Seed", seed);
    }

    print_section("Hamiltonian");
    println!("{hamiltonian}");

    print_section("Running VQE Optimization");
    println!();
    println!("  VQE is a hybrid algorithm that:");
    println!("  1. Classical optimizer proposes circuit parameters");
    println!("  2. Quantum circuit evaluates the energy");
    println!("  3. Repeat until convergence");
    println!();

    let mut oracle = match config.seed {
        Some(seed) => StatevectorEstimator::with_seed(seed),
        None => StatevectorEstimator::new(),
    };
    let runner = VqeRunner::new(config);

    let pb = create_progress_bar(runner.config().minimizer.max_iterations as u64, "Optimizing...");
    let mut observer = ProgressBarObserver::new(pb);
    let result = runner.run_observed(&hamiltonian, &ansatz, &mut oracle, Some(&mut observer))?;
    observer.finish("Optimization complete");

    print_section("Results");
    print_result("Optimal energy", format!("{:.6} Hartree", result.optimal_energy));
    if runner.config().final_resamples > 0 {
        print_result(
            "Best sampled energy",
            format!("{:.6} Hartree", result.best_sampled_energy),
        );
    }
    print_result("Iterations", result.iterations);
    print_result("Circuit evaluations", result.evaluations);
    print_result("Termination", result.termination);
    print_result("Elapsed", format!("{:.3} s", result.elapsed_secs()));
    let params: Vec<String> = result
        .optimal_parameters
        .iter()
        .map(|p| format!("{p:.4}"))
        .collect();
    print_result("Optimal parameters", format!("[{}]", params.join(", ")));

    print_section("Exact Reference");
    match ValidationReport::against(&hamiltonian, result.optimal_energy, CHEMICAL_ACCURACY) {
        Ok(report) => {
            print_result("Exact ground state", format!("{:.6} Hartree", report.exact));
            print_result("Absolute error", format!("{:.6} Hartree", report.absolute_error));
            print_result("Relative error", format!("{:.2}%", report.relative_error * 100.0));
            if report.violates_variational_bound {
                print_warning("Energy lies below the exact minimum (sampling noise)");
            } else if report.within_tolerance {
                print_success("Within chemical accuracy");
            } else {
                print_info("Outside chemical accuracy; try more iterations or exact mode");
            }
        }
        Err(e) => print_info(&format!("No exact reference: {e}")),
    }

    print_section("Energy Convergence");
    let records = result.history.records();
    let show_points = 10.min(records.len());
    let step = (records.len() / show_points.max(1)).max(1);
    let best = result.history.best_so_far();
    for chunk_start in (0..records.len()).step_by(step).take(show_points) {
        let record = &records[chunk_start];
        println!(
            "  Evaluation {:4}: {:.6} Ha (best {:.6})",
            record.index, record.energy, best[chunk_start]
        );
    }

    if let Some(path) = &args.output {
        let json = result.to_json()?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        info!("Results saved to: {}", path.display());
        print_success(&format!("Results saved to {}", path.display()));
    }

    println!();
    if result.converged() {
        print_success("VQE demo complete!");
    } else {
        print_warning("VQE stopped at the iteration budget before converging");
    }
    Ok(())
}
