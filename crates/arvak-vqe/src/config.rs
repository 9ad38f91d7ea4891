//! Run configuration.
//!
//! Every field has a default, so a YAML file only needs the values it
//! overrides:
//!
//! ```yaml
//! parameter_count: 5
//! optimizer: nelder_mead
//! minimizer:
//!   max_iterations: 200
//! seed: 7
//! estimator:
//!   shots: 4096
//! final_resamples: 4
//! hamiltonian:
//!   - { label: II, coefficient: -0.81 }
//!   - { label: ZZ, coefficient: 0.17 }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{VqeError, VqeResult};
use crate::hamiltonian::Hamiltonian;
use crate::minimizer::{MinimizerConfig, OptimizerKind};
use crate::objective::PROGRESS_INTERVAL;
use crate::oracle::EstimatorOptions;

/// Configuration of one VQE run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VqeConfig {
    /// Expected number of ansatz parameters. `None` accepts whatever the
    /// ansatz declares.
    pub parameter_count: Option<usize>,
    /// Which minimizer drives the run.
    pub optimizer: OptimizerKind,
    /// Iteration budget and tolerance.
    pub minimizer: MinimizerConfig,
    /// Seed for initial-point sampling (and SPSA perturbations). `None`
    /// draws from OS entropy.
    pub seed: Option<u64>,
    /// Options forwarded to the expectation oracle.
    pub estimator: EstimatorOptions,
    /// Evaluations between progress notifications.
    pub progress_every: usize,
    /// Fresh oracle calls at the final point. When positive, their mean
    /// replaces the minimizer's best sample as the reported energy.
    pub final_resamples: usize,
    /// Problem Hamiltonian, for runs driven entirely from a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hamiltonian: Option<Hamiltonian>,
}

impl Default for VqeConfig {
    fn default() -> Self {
        Self {
            parameter_count: None,
            optimizer: OptimizerKind::default(),
            minimizer: MinimizerConfig::default(),
            seed: None,
            estimator: EstimatorOptions::default(),
            progress_every: PROGRESS_INTERVAL,
            final_resamples: 0,
            hamiltonian: None,
        }
    }
}

impl VqeConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> VqeResult<Self> {
        let file = File::open(path.as_ref())?;
        let config: Self = serde_yaml_ng::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> VqeResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> VqeResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Set the expected parameter count.
    pub fn with_parameter_count(mut self, count: usize) -> Self {
        self.parameter_count = Some(count);
        self
    }

    /// Select the minimizer.
    pub fn with_optimizer(mut self, optimizer: OptimizerKind) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Set the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.minimizer.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.minimizer.tolerance = tolerance;
        self
    }

    /// Enable or disable the minimizer's termination summary.
    pub fn with_disp(mut self, disp: bool) -> Self {
        self.minimizer.disp = disp;
        self
    }

    /// Fix the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the oracle options.
    pub fn with_estimator(mut self, estimator: EstimatorOptions) -> Self {
        self.estimator = estimator;
        self
    }

    /// Set the progress interval.
    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every;
        self
    }

    /// Re-estimate the final point `resamples` times.
    pub fn with_final_resamples(mut self, resamples: usize) -> Self {
        self.final_resamples = resamples;
        self
    }

    /// Attach a Hamiltonian.
    pub fn with_hamiltonian(mut self, hamiltonian: Hamiltonian) -> Self {
        self.hamiltonian = Some(hamiltonian);
        self
    }

    /// Check values that are wrong regardless of the problem.
    pub fn validate(&self) -> VqeResult<()> {
        self.minimizer.validate()?;
        if self.progress_every == 0 {
            return Err(VqeError::Configuration(
                "progress_every must be at least 1".into(),
            ));
        }
        if self.estimator.shots == Some(0) {
            return Err(VqeError::Configuration(
                "shots must be positive (omit for exact estimation)".into(),
            ));
        }
        Ok(())
    }
}
