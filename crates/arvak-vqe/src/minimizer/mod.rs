//! Derivative-free minimizers driving the VQE objective.
//!
//! A [`Minimizer`] is a black box: it receives a fallible objective and an
//! initial point, calls the objective as often as it likes and returns the
//! best point it found together with a [`TerminationReason`]. Errors from the
//! objective abort the minimization immediately.

mod nelder_mead;
mod spsa;

pub use nelder_mead::NelderMead;
pub use spsa::Spsa;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{VqeError, VqeResult};

/// Why a minimizer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The convergence criterion was met.
    Converged,
    /// The iteration budget ran out first.
    MaxIterationsReached,
}

impl TerminationReason {
    /// True if the minimizer met its convergence criterion.
    pub fn is_converged(&self) -> bool {
        matches!(self, TerminationReason::Converged)
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::Converged => write!(f, "converged"),
            TerminationReason::MaxIterationsReached => write!(f, "max iterations reached"),
        }
    }
}

/// Budget and stopping rule shared by all minimizers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimizerConfig {
    /// Maximum number of minimizer iterations.
    pub max_iterations: usize,
    /// Convergence tolerance.
    pub tolerance: f64,
    /// Log a termination summary.
    pub disp: bool,
}

impl Default for MinimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-6,
            disp: true,
        }
    }
}

impl MinimizerConfig {
    /// Set the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Enable or disable the termination summary.
    pub fn with_disp(mut self, disp: bool) -> Self {
        self.disp = disp;
        self
    }

    /// Reject budgets and tolerances no minimizer can work with.
    pub fn validate(&self) -> VqeResult<()> {
        if self.max_iterations == 0 {
            return Err(VqeError::Configuration(
                "max_iterations must be at least 1".into(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(VqeError::Configuration(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// What a minimizer returns.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizeOutcome {
    /// Best point evaluated.
    pub best_point: Vec<f64>,
    /// Objective value at `best_point`.
    pub best_value: f64,
    /// Why the minimizer stopped.
    pub termination: TerminationReason,
    /// Iterations performed.
    pub iterations: usize,
    /// Objective calls made.
    pub evaluations: usize,
}

/// A derivative-free minimizer.
pub trait Minimizer {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Minimize `objective` starting from `initial`.
    fn minimize<F>(
        &self,
        objective: F,
        initial: Vec<f64>,
        config: &MinimizerConfig,
    ) -> VqeResult<MinimizeOutcome>
    where
        F: FnMut(&[f64]) -> VqeResult<f64>;
}

/// Selects a minimizer in configuration files and on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    /// [`NelderMead`] with default coefficients.
    #[default]
    NelderMead,
    /// [`Spsa`] with gains calibrated to the objective.
    Spsa,
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizerKind::NelderMead => write!(f, "nelder_mead"),
            OptimizerKind::Spsa => write!(f, "spsa"),
        }
    }
}

impl std::str::FromStr for OptimizerKind {
    type Err = VqeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "nelder_mead" | "nm" => Ok(OptimizerKind::NelderMead),
            "spsa" => Ok(OptimizerKind::Spsa),
            other => Err(VqeError::Configuration(format!(
                "unknown optimizer '{other}' (expected nelder_mead or spsa)"
            ))),
        }
    }
}

/// Wraps an objective and counts its calls.
pub(crate) struct Counted<F> {
    objective: F,
    calls: usize,
}

impl<F> Counted<F>
where
    F: FnMut(&[f64]) -> VqeResult<f64>,
{
    pub(crate) fn new(objective: F) -> Self {
        Self {
            objective,
            calls: 0,
        }
    }

    pub(crate) fn call(&mut self, x: &[f64]) -> VqeResult<f64> {
        self.calls += 1;
        (self.objective)(x)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(MinimizerConfig::default().validate().is_ok());
        assert!(
            MinimizerConfig::default()
                .with_max_iterations(0)
                .validate()
                .unwrap_err()
                .is_configuration()
        );
        assert!(MinimizerConfig::default().with_tolerance(0.0).validate().is_err());
        assert!(MinimizerConfig::default().with_tolerance(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_optimizer_kind_parsing() {
        assert_eq!("nelder-mead".parse::<OptimizerKind>().unwrap(), OptimizerKind::NelderMead);
        assert_eq!("SPSA".parse::<OptimizerKind>().unwrap(), OptimizerKind::Spsa);
        assert!("cobyla".parse::<OptimizerKind>().is_err());
        assert_eq!(
            serde_json::to_string(&OptimizerKind::NelderMead).unwrap(),
            "\"nelder_mead\""
        );
    }
}
