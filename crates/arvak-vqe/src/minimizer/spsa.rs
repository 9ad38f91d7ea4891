//! Simultaneous Perturbation Stochastic Approximation.
//!
//! Estimates the gradient from two objective calls per iteration regardless
//! of dimension, which makes it robust against shot noise.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::{Counted, MinimizeOutcome, Minimizer, MinimizerConfig, TerminationReason};
use crate::error::VqeResult;

/// Weight of the newest cost change in the smoothed convergence signal.
const SMOOTHING: f64 = 0.2;

/// Size of the first update step after calibration, in radians.
pub const DEFAULT_TARGET_MAGNITUDE: f64 = TAU / 10.0;

/// Upper bound on calibration steps.
pub const DEFAULT_CALIBRATION_STEPS: usize = 25;

/// SPSA minimizer.
///
/// Gains follow the standard schedule `a_k = a / (k + 1 + A)^α` and
/// `c_k = c / (k + 1)^γ`.
///
/// With calibration on (the default), `a` is derived from the objective
/// before the first update: the mean magnitude of a few gradient estimates
/// at the starting point is scaled so the first step moves each parameter
/// by about `target_magnitude`. Calibration steps count against the
/// iteration budget and cost two evaluations each; if every estimate is
/// zero, `a` is used as given.
#[derive(Debug, Clone)]
pub struct Spsa {
    /// Step-size numerator (fallback when calibrating).
    pub a: f64,
    /// Perturbation size.
    pub c: f64,
    /// Step-size decay exponent.
    pub alpha: f64,
    /// Perturbation decay exponent.
    pub gamma: f64,
    /// Stability constant `A`.
    pub stability: f64,
    /// Calibrate `a` from the objective before iterating.
    pub calibrate: bool,
    /// Desired first step per parameter when calibrating.
    pub target_magnitude: f64,
    /// Gradient estimates averaged during calibration.
    pub calibration_steps: usize,
    /// Seed for the perturbation directions.
    pub seed: u64,
}

impl Default for Spsa {
    fn default() -> Self {
        Self {
            a: 0.1,
            c: 0.1,
            alpha: 0.602,
            gamma: 0.101,
            stability: 10.0,
            calibrate: true,
            target_magnitude: DEFAULT_TARGET_MAGNITUDE,
            calibration_steps: DEFAULT_CALIBRATION_STEPS,
            seed: 42,
        }
    }
}

impl Spsa {
    /// Create an SPSA minimizer with calibrated gains.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the perturbation seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Use fixed gain numerators and skip calibration.
    pub fn with_gains(mut self, a: f64, c: f64) -> Self {
        self.a = a;
        self.c = c;
        self.calibrate = false;
        self
    }

    /// Set the calibration target step.
    pub fn with_target_magnitude(mut self, target: f64) -> Self {
        self.target_magnitude = target;
        self
    }

    /// Calibration steps for a given iteration budget: at most a quarter of
    /// the budget.
    fn calibration_budget(&self, max_iterations: usize) -> usize {
        if self.calibrate {
            self.calibration_steps.min(max_iterations / 4)
        } else {
            0
        }
    }

    fn perturbation(rng: &mut StdRng, n: usize) -> Vec<f64> {
        (0..n)
            .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
            .collect()
    }
}

fn shifted(x: &[f64], delta: &[f64], scale: f64) -> Vec<f64> {
    x.iter().zip(delta).map(|(xi, di)| xi + scale * di).collect()
}

impl Minimizer for Spsa {
    fn name(&self) -> &'static str {
        "spsa"
    }

    fn minimize<F>(
        &self,
        objective: F,
        initial: Vec<f64>,
        config: &MinimizerConfig,
    ) -> VqeResult<MinimizeOutcome>
    where
        F: FnMut(&[f64]) -> VqeResult<f64>,
    {
        config.validate()?;
        let mut objective = Counted::new(objective);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut x = initial;
        let mut f_x = objective.call(&x)?;
        let mut best_point = x.clone();
        let mut best_value = f_x;

        let mut termination = TerminationReason::MaxIterationsReached;
        let mut iterations = 0;
        let mut smoothed_change: Option<f64> = None;

        if x.is_empty() {
            termination = TerminationReason::Converged;
        }

        let mut a = self.a;
        let calibration = if x.is_empty() {
            0
        } else {
            self.calibration_budget(config.max_iterations)
        };
        if calibration > 0 {
            let mut magnitude = 0.0;
            for _ in 0..calibration {
                let delta = Self::perturbation(&mut rng, x.len());
                let f_plus = objective.call(&shifted(&x, &delta, self.c))?;
                let f_minus = objective.call(&shifted(&x, &delta, -self.c))?;
                magnitude += ((f_plus - f_minus) / (2.0 * self.c)).abs();
            }
            iterations += calibration;
            magnitude /= calibration as f64;
            if magnitude > 0.0 && magnitude.is_finite() {
                a = self.target_magnitude * (self.stability + 1.0).powf(self.alpha) / magnitude;
            }
            debug!(
                "{}: calibrated a = {:.4} from mean gradient magnitude {:.4e}",
                self.name(),
                a,
                magnitude
            );
        }

        let mut k = 0.0;
        while termination != TerminationReason::Converged && iterations < config.max_iterations {
            iterations += 1;

            let a_k = a / (k + 1.0 + self.stability).powf(self.alpha);
            let c_k = self.c / (k + 1.0).powf(self.gamma);
            k += 1.0;

            let delta = Self::perturbation(&mut rng, x.len());
            let x_plus = shifted(&x, &delta, c_k);
            let x_minus = shifted(&x, &delta, -c_k);

            let f_plus = objective.call(&x_plus)?;
            let f_minus = objective.call(&x_minus)?;
            for (point, value) in [(&x_plus, f_plus), (&x_minus, f_minus)] {
                if value < best_value {
                    best_value = value;
                    best_point.clone_from(point);
                }
            }

            let slope = (f_plus - f_minus) / (2.0 * c_k);
            for (xi, di) in x.iter_mut().zip(&delta) {
                // 1/Δ_i == Δ_i for Bernoulli ±1.
                *xi -= a_k * slope * di;
            }

            let f_new = objective.call(&x)?;
            if f_new < best_value {
                best_value = f_new;
                best_point.clone_from(&x);
            }

            let change = (f_new - f_x).abs();
            let smoothed = match smoothed_change {
                Some(prev) => (1.0 - SMOOTHING) * prev + SMOOTHING * change,
                None => change,
            };
            smoothed_change = Some(smoothed);
            f_x = f_new;

            if smoothed < config.tolerance {
                termination = TerminationReason::Converged;
            }
        }

        let evaluations = objective.calls();
        if config.disp {
            info!(
                "{}: {} after {} iterations, {} evaluations, best value {:.6}",
                self.name(),
                termination,
                iterations,
                evaluations,
                best_value
            );
        }

        Ok(MinimizeOutcome {
            best_point,
            best_value,
            termination,
            iterations,
            evaluations,
        })
    }
}
