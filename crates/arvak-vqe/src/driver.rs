//! The VQE driver: validates a run, samples the initial point, hands the
//! objective to a minimizer and packages the outcome.

use std::f64::consts::TAU;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ansatz::Ansatz;
use crate::config::VqeConfig;
use crate::error::{VqeError, VqeResult};
use crate::hamiltonian::Hamiltonian;
use crate::history::OptimizationHistory;
use crate::minimizer::{
    MinimizeOutcome, Minimizer, NelderMead, OptimizerKind, Spsa, TerminationReason,
};
use crate::objective::{Objective, ProgressObserver};
use crate::oracle::{EstimatorOptions, ExpectationOracle};

/// Outcome of a completed VQE run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Best parameters found.
    pub optimal_parameters: Vec<f64>,
    /// Energy at `optimal_parameters`.
    ///
    /// The mean of the final re-estimates when `final_resamples > 0`,
    /// otherwise the minimizer's best value.
    pub optimal_energy: f64,
    /// The minimizer's best value. With a noisy oracle this is the luckiest
    /// sample and tends to sit below the true energy of the point.
    pub best_sampled_energy: f64,
    /// Why the minimizer stopped.
    pub termination: TerminationReason,
    /// Wall-clock time spent minimizing.
    #[serde(rename = "elapsed_secs", with = "duration_secs")]
    pub elapsed: Duration,
    /// Minimizer iterations.
    pub iterations: usize,
    /// Objective evaluations.
    pub evaluations: usize,
    /// Starting point.
    pub initial_parameters: Vec<f64>,
    /// Seed used for the initial point, if one was configured.
    pub seed: Option<u64>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Every evaluation of the run.
    pub history: OptimizationHistory,
}

impl OptimizationResult {
    /// True if the minimizer met its convergence criterion.
    pub fn converged(&self) -> bool {
        self.termination.is_converged()
    }

    /// Elapsed time in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> VqeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

/// Runs the VQE loop for a configuration.
///
/// ```rust
/// use arvak_vqe::{VqeConfig, VqeRunner};
///
/// let runner = VqeRunner::new(VqeConfig::default().with_seed(7))
///     .with_max_iterations(50);
/// assert_eq!(runner.config().minimizer.max_iterations, 50);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VqeRunner {
    config: VqeConfig,
}

impl VqeRunner {
    /// Create a runner for `config`.
    pub fn new(config: VqeConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &VqeConfig {
        &self.config
    }

    /// Select the minimizer.
    pub fn with_optimizer(mut self, optimizer: OptimizerKind) -> Self {
        self.config.optimizer = optimizer;
        self
    }

    /// Set the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.minimizer.max_iterations = max_iterations;
        self
    }

    /// Set the expected parameter count.
    pub fn with_parameter_count(mut self, count: usize) -> Self {
        self.config.parameter_count = Some(count);
        self
    }

    /// Fix the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the oracle options.
    pub fn with_estimator(mut self, estimator: EstimatorOptions) -> Self {
        self.config.estimator = estimator;
        self
    }

    /// Run from a random initial point drawn uniformly from `[0, 2π)`.
    pub fn run<O>(
        &self,
        hamiltonian: &Hamiltonian,
        ansatz: &dyn Ansatz,
        oracle: &mut O,
    ) -> VqeResult<OptimizationResult>
    where
        O: ExpectationOracle + ?Sized,
    {
        self.run_observed(hamiltonian, ansatz, oracle, None)
    }

    /// Like [`run`](Self::run), forwarding progress notifications to
    /// `observer`.
    pub fn run_observed<O>(
        &self,
        hamiltonian: &Hamiltonian,
        ansatz: &dyn Ansatz,
        oracle: &mut O,
        observer: Option<&mut dyn ProgressObserver>,
    ) -> VqeResult<OptimizationResult>
    where
        O: ExpectationOracle + ?Sized,
    {
        self.validate(hamiltonian, ansatz)?;

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let initial: Vec<f64> = (0..ansatz.num_parameters())
            .map(|_| rng.gen_range(0.0..TAU))
            .collect();
        let spsa_seed = rng.next_u64();

        self.execute(hamiltonian, ansatz, oracle, initial, spsa_seed, observer)
    }

    /// Run from a caller-supplied initial point.
    ///
    /// With a deterministic oracle, two calls with the same point produce
    /// identical histories.
    pub fn run_with_initial_point<O>(
        &self,
        hamiltonian: &Hamiltonian,
        ansatz: &dyn Ansatz,
        oracle: &mut O,
        initial: Vec<f64>,
        observer: Option<&mut dyn ProgressObserver>,
    ) -> VqeResult<OptimizationResult>
    where
        O: ExpectationOracle + ?Sized,
    {
        self.validate(hamiltonian, ansatz)?;
        if initial.len() != ansatz.num_parameters() {
            return Err(VqeError::ParameterCountMismatch {
                ansatz: ansatz.name().to_string(),
                expected: ansatz.num_parameters(),
                got: initial.len(),
            });
        }

        let spsa_seed = self.config.seed.unwrap_or(Spsa::default().seed);
        self.execute(hamiltonian, ansatz, oracle, initial, spsa_seed, observer)
    }

    /// Checks done before the oracle is ever called.
    fn validate(&self, hamiltonian: &Hamiltonian, ansatz: &dyn Ansatz) -> VqeResult<()> {
        if let Some(expected) = self.config.parameter_count {
            if ansatz.num_parameters() != expected {
                return Err(VqeError::ParameterCountMismatch {
                    ansatz: ansatz.name().to_string(),
                    expected: ansatz.num_parameters(),
                    got: expected,
                });
            }
        }
        if hamiltonian.num_qubits() != ansatz.num_qubits() {
            return Err(VqeError::QubitCountMismatch {
                hamiltonian: hamiltonian.num_qubits(),
                ansatz: ansatz.num_qubits(),
            });
        }
        self.config.validate()
    }

    fn execute<O>(
        &self,
        hamiltonian: &Hamiltonian,
        ansatz: &dyn Ansatz,
        oracle: &mut O,
        initial: Vec<f64>,
        spsa_seed: u64,
        observer: Option<&mut dyn ProgressObserver>,
    ) -> VqeResult<OptimizationResult>
    where
        O: ExpectationOracle + ?Sized,
    {
        let config = &self.config;
        info!(
            "Starting VQE: {} qubits, {} Hamiltonian terms, ansatz '{}' with {} parameters, optimizer {}",
            hamiltonian.num_qubits(),
            hamiltonian.num_terms(),
            ansatz.name(),
            ansatz.num_parameters(),
            config.optimizer
        );

        let mut history = OptimizationHistory::new();
        let started_at = Utc::now();
        let start = Instant::now();

        let (outcome, optimal_energy): (MinimizeOutcome, f64) = {
            let mut objective = Objective::new(ansatz, hamiltonian, oracle, &mut history)
                .with_options(config.estimator)
                .with_progress_interval(config.progress_every);
            if let Some(observer) = observer {
                objective = objective.with_observer(observer);
            }

            let f = |x: &[f64]| objective.evaluate(x);
            let outcome = match config.optimizer {
                OptimizerKind::NelderMead => {
                    NelderMead::new().minimize(f, initial.clone(), &config.minimizer)?
                }
                OptimizerKind::Spsa => Spsa::new().with_seed(spsa_seed).minimize(
                    f,
                    initial.clone(),
                    &config.minimizer,
                )?,
            };

            let optimal_energy = if config.final_resamples > 0 {
                let mut total = 0.0;
                for _ in 0..config.final_resamples {
                    total += objective.evaluate(&outcome.best_point)?;
                }
                total / config.final_resamples as f64
            } else {
                outcome.best_value
            };
            (outcome, optimal_energy)
        };

        let elapsed = start.elapsed();

        info!(
            "VQE finished: E = {:.6} after {} evaluations in {:.3}s ({})",
            optimal_energy,
            history.counter(),
            elapsed.as_secs_f64(),
            outcome.termination
        );
        if !outcome.termination.is_converged() {
            warn!(
                "Minimizer did not converge within {} iterations",
                config.minimizer.max_iterations
            );
        }

        Ok(OptimizationResult {
            optimal_parameters: outcome.best_point,
            optimal_energy,
            best_sampled_energy: outcome.best_value,
            termination: outcome.termination,
            elapsed,
            iterations: outcome.iterations,
            evaluations: history.counter(),
            initial_parameters: initial,
            seed: config.seed,
            started_at,
            history,
        })
    }
}
