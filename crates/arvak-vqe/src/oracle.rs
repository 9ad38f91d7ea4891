//! Expectation-value oracle contract.
//!
//! The oracle is the quantum half of the VQE loop: given an ansatz, a set of
//! observables and parameter bindings, it returns one expectation value per
//! `(observable, binding)` pair. It may be exact or stochastic, so callers
//! must treat every call as a fresh sample and never cache results.

use serde::{Deserialize, Serialize};

use crate::ansatz::Ansatz;
use crate::error::{VqeError, VqeResult};
use crate::hamiltonian::Hamiltonian;

/// Options passed through to the oracle unchanged.
///
/// The optimization loop never interprets these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorOptions {
    /// Measurement shots per observable term, or `None` for an exact
    /// expectation value.
    pub shots: Option<u32>,
    /// Circuit-simplification aggressiveness (0 = none).
    pub optimization_level: u8,
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        Self {
            shots: Some(1024),
            optimization_level: 1,
        }
    }
}

impl EstimatorOptions {
    /// Exact (noise-free) estimation without circuit simplification.
    pub fn exact() -> Self {
        Self {
            shots: None,
            optimization_level: 0,
        }
    }

    /// Set the shot count.
    pub fn with_shots(mut self, shots: Option<u32>) -> Self {
        self.shots = shots;
        self
    }

    /// Set the simplification level.
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level;
        self
    }
}

/// A backend that estimates expectation values of observables.
pub trait ExpectationOracle {
    /// Estimate `⟨ψ(bindings[i])| observables[i] |ψ(bindings[i])⟩` for each
    /// `i`, where `ψ(θ)` is the state prepared by `ansatz` bound to `θ`.
    ///
    /// `observables` and `bindings` must have the same length. Binding
    /// failures surface as configuration errors; backend failures as
    /// [`VqeError::OracleEvaluation`].
    fn estimate(
        &mut self,
        ansatz: &dyn Ansatz,
        observables: &[&Hamiltonian],
        bindings: &[&[f64]],
        options: &EstimatorOptions,
    ) -> VqeResult<Vec<f64>>;

    /// Estimate a single expectation value.
    fn estimate_one(
        &mut self,
        ansatz: &dyn Ansatz,
        observable: &Hamiltonian,
        params: &[f64],
        options: &EstimatorOptions,
    ) -> VqeResult<f64> {
        let values = self.estimate(ansatz, &[observable], &[params], options)?;
        match values.as_slice() {
            [value] => Ok(*value),
            _ => Err(VqeError::OracleEvaluation(format!(
                "expected 1 expectation value, oracle returned {}",
                values.len()
            ))),
        }
    }
}

impl<O: ExpectationOracle + ?Sized> ExpectationOracle for &mut O {
    fn estimate(
        &mut self,
        ansatz: &dyn Ansatz,
        observables: &[&Hamiltonian],
        bindings: &[&[f64]],
        options: &EstimatorOptions,
    ) -> VqeResult<Vec<f64>> {
        (**self).estimate(ansatz, observables, bindings, options)
    }
}

/// Check that a batch pairs every observable with exactly one binding.
pub fn check_batch(observables: &[&Hamiltonian], bindings: &[&[f64]]) -> VqeResult<()> {
    if observables.len() != bindings.len() {
        return Err(VqeError::Configuration(format!(
            "batch has {} observables but {} parameter bindings",
            observables.len(),
            bindings.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansatz::ParameterizedCircuit;

    /// Returns a fixed number of values regardless of the batch.
    struct Broken(usize);

    impl ExpectationOracle for Broken {
        fn estimate(
            &mut self,
            _ansatz: &dyn Ansatz,
            _observables: &[&Hamiltonian],
            _bindings: &[&[f64]],
            _options: &EstimatorOptions,
        ) -> VqeResult<Vec<f64>> {
            Ok(vec![0.0; self.0])
        }
    }

    #[test]
    fn test_estimate_one_requires_single_value() {
        let h = Hamiltonian::build([("Z", 1.0)]).unwrap();
        let ansatz = ParameterizedCircuit::new("empty", 1, 0);
        let opts = EstimatorOptions::exact();

        assert!(Broken(1).estimate_one(&ansatz, &h, &[], &opts).is_ok());
        let err = Broken(2).estimate_one(&ansatz, &h, &[], &opts).unwrap_err();
        assert!(matches!(err, VqeError::OracleEvaluation(_)));
    }

    #[test]
    fn test_check_batch() {
        let h = Hamiltonian::build([("Z", 1.0)]).unwrap();
        assert!(check_batch(&[&h], &[&[0.0]]).is_ok());
        assert!(check_batch(&[&h, &h], &[&[0.0]]).unwrap_err().is_configuration());
    }

    #[test]
    fn test_options_defaults() {
        let opts = EstimatorOptions::default();
        assert_eq!(opts.shots, Some(1024));
        assert_eq!(opts.optimization_level, 1);
        assert_eq!(EstimatorOptions::exact().shots, None);
    }
}
