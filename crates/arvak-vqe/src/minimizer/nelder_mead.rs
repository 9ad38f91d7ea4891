//! Nelder–Mead downhill simplex.
//!
//! Derivative-free and local. Suitable for exact or low-noise objectives;
//! with heavy shot noise prefer [`Spsa`](super::Spsa).

use tracing::info;

use super::{Counted, MinimizeOutcome, Minimizer, MinimizerConfig, TerminationReason};
use crate::error::VqeResult;

/// Nelder–Mead simplex minimizer.
#[derive(Debug, Clone)]
pub struct NelderMead {
    /// Offset along each coordinate used to build the initial simplex.
    pub initial_step: f64,
    /// Reflection coefficient.
    pub reflection: f64,
    /// Expansion coefficient.
    pub expansion: f64,
    /// Contraction coefficient.
    pub contraction: f64,
    /// Shrink coefficient.
    pub shrink: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            initial_step: 0.5,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
        }
    }
}

impl NelderMead {
    /// Create a minimizer with the standard coefficients.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial simplex step.
    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step;
        self
    }
}

/// A simplex vertex and its objective value.
type Vertex = (Vec<f64>, f64);

/// `origin + coeff * (toward - origin)`, element-wise.
fn along(origin: &[f64], toward: &[f64], coeff: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(toward)
        .map(|(o, t)| o + coeff * (t - o))
        .collect()
}

fn sort_simplex(simplex: &mut [Vertex]) {
    simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
}

/// Largest coordinate distance from the best vertex.
fn diameter(simplex: &[Vertex]) -> f64 {
    let best = &simplex[0].0;
    simplex[1..]
        .iter()
        .flat_map(|(x, _)| x.iter().zip(best).map(|(a, b)| (a - b).abs()))
        .fold(0.0, f64::max)
}

fn has_converged(simplex: &[Vertex], tolerance: f64) -> bool {
    let spread = simplex[simplex.len() - 1].1 - simplex[0].1;
    spread < tolerance && diameter(simplex) < tolerance
}

impl Minimizer for NelderMead {
    fn name(&self) -> &'static str {
        "nelder_mead"
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
        let n = initial.len();

        let f0 = objective.call(&initial)?;
        if n == 0 {
            return Ok(MinimizeOutcome {
                best_point: initial,
                best_value: f0,
                termination: TerminationReason::Converged,
                iterations: 0,
                evaluations: objective.calls(),
            });
        }

        let mut simplex: Vec<Vertex> = Vec::with_capacity(n + 1);
        simplex.push((initial.clone(), f0));
        for i in 0..n {
            let mut point = initial.clone();
            point[i] += self.initial_step;
            let value = objective.call(&point)?;
            simplex.push((point, value));
        }

        let mut termination = TerminationReason::MaxIterationsReached;
        let mut iterations = 0;

        while iterations < config.max_iterations {
            sort_simplex(&mut simplex);
            if has_converged(&simplex, config.tolerance) {
                termination = TerminationReason::Converged;
                break;
            }
            iterations += 1;

            let f_best = simplex[0].1;
            let f_second_worst = simplex[n - 1].1;
            let (worst, f_worst) = simplex[n].clone();

            let mut centroid = vec![0.0; n];
            for (x, _) in &simplex[..n] {
                for (c, xi) in centroid.iter_mut().zip(x) {
                    *c += xi / n as f64;
                }
            }

            let reflected = along(&centroid, &worst, -self.reflection);
            let f_reflected = objective.call(&reflected)?;

            if f_reflected < f_best {
                let expanded = along(&centroid, &reflected, self.expansion);
                let f_expanded = objective.call(&expanded)?;
                simplex[n] = if f_expanded < f_reflected {
                    (expanded, f_expanded)
                } else {
                    (reflected, f_reflected)
                };
                continue;
            }

            if f_reflected < f_second_worst {
                simplex[n] = (reflected, f_reflected);
                continue;
            }

            // Outside contraction toward the reflected point, inside toward
            // the worst vertex.
            let (contracted, threshold) = if f_reflected < f_worst {
                (along(&centroid, &reflected, self.contraction), f_reflected)
            } else {
                (along(&centroid, &worst, self.contraction), f_worst)
            };
            let f_contracted = objective.call(&contracted)?;
            if f_contracted < threshold {
                simplex[n] = (contracted, f_contracted);
                continue;
            }

            let best = simplex[0].0.clone();
            for vertex in simplex.iter_mut().skip(1) {
                let point = along(&best, &vertex.0, self.shrink);
                let value = objective.call(&point)?;
                *vertex = (point, value);
            }
        }

        sort_simplex(&mut simplex);
        if termination != TerminationReason::Converged && has_converged(&simplex, config.tolerance)
        {
            termination = TerminationReason::Converged;
        }

        let evaluations = objective.calls();
        let (best_point, best_value) = simplex.swap_remove(0);
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
