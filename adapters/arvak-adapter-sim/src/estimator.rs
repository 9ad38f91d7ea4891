//! Expectation-value oracle backed by the statevector engine.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Binomial;
use tracing::{debug, instrument};

use arvak_vqe::oracle::check_batch;
use arvak_vqe::{Ansatz, EstimatorOptions, ExpectationOracle, Hamiltonian, VqeError, VqeResult};

use crate::simplify::simplify;
use crate::statevector::Statevector;

/// Default register limit, as for the local simulator backend.
pub const DEFAULT_MAX_QUBITS: usize = 20;

/// Local [`ExpectationOracle`] that simulates the bound ansatz exactly and
/// optionally adds shot noise.
///
/// With `shots = Some(n)`, each non-identity Pauli term is estimated from
/// `n` simulated ±1 outcomes drawn from `Binomial(n, (1 + ⟨P⟩) / 2)`, as a
/// device measuring that term in its eigenbasis would report. Identity
/// terms are exact. With `shots = None` the exact expectation is returned.
///
/// Only the real part of each coefficient contributes; for Hermitian
/// Hamiltonians that is the whole coefficient.
#[derive(Debug)]
pub struct StatevectorEstimator {
    rng: StdRng,
    max_qubits: usize,
}

impl Default for StatevectorEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatevectorEstimator {
    /// Create an estimator seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            max_qubits: DEFAULT_MAX_QUBITS,
        }
    }

    /// Create an estimator with reproducible shot noise.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_qubits: DEFAULT_MAX_QUBITS,
        }
    }

    /// Set the register limit.
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Prepare `ψ(params)` for `ansatz`.
    pub fn prepare(
        &self,
        ansatz: &dyn Ansatz,
        params: &[f64],
        optimization_level: u8,
    ) -> VqeResult<Statevector> {
        if ansatz.num_qubits() > self.max_qubits {
            return Err(VqeError::Configuration(format!(
                "ansatz '{}' needs {} qubits, simulator supports at most {}",
                ansatz.name(),
                ansatz.num_qubits(),
                self.max_qubits
            )));
        }

        let bound = ansatz.bind(params)?;
        let circuit = simplify(&bound, optimization_level)?;
        debug!(
            "Simulating '{}': {} gates ({} before simplification)",
            circuit.name(),
            circuit.gates().len(),
            bound.gates().len()
        );

        let mut state = Statevector::new(circuit.num_qubits());
        state.apply_circuit(&circuit)?;
        Ok(state)
    }

    fn measure(
        &mut self,
        state: &Statevector,
        hamiltonian: &Hamiltonian,
        shots: Option<u32>,
    ) -> VqeResult<f64> {
        let mut energy = 0.0;
        for term in hamiltonian.terms() {
            let weight = term.coefficient().re;
            if term.is_identity() {
                energy += weight;
                continue;
            }

            let exact = state.expectation(term);
            let value = match shots {
                None => exact,
                Some(n) => {
                    let p_plus = ((1.0 + exact) / 2.0).clamp(0.0, 1.0);
                    let binomial = Binomial::new(u64::from(n), p_plus).map_err(|e| {
                        VqeError::OracleEvaluation(format!(
                            "cannot sample term {}: {e}",
                            term.label()
                        ))
                    })?;
                    let plus = self.rng.sample(binomial) as f64;
                    2.0 * plus / f64::from(n) - 1.0
                }
            };
            energy += weight * value;
        }
        Ok(energy)
    }
}

impl ExpectationOracle for StatevectorEstimator {
    #[instrument(skip_all, fields(batch = observables.len()))]
    fn estimate(
        &mut self,
        ansatz: &dyn Ansatz,
        observables: &[&Hamiltonian],
        bindings: &[&[f64]],
        options: &EstimatorOptions,
    ) -> VqeResult<Vec<f64>> {
        check_batch(observables, bindings)?;
        if options.shots == Some(0) {
            return Err(VqeError::Configuration("shots must be positive".into()));
        }

        observables
            .iter()
            .zip(bindings)
            .map(|(hamiltonian, params)| {
                if hamiltonian.num_qubits() != ansatz.num_qubits() {
                    return Err(VqeError::QubitCountMismatch {
                        hamiltonian: hamiltonian.num_qubits(),
                        ansatz: ansatz.num_qubits(),
                    });
                }
                let state = self.prepare(ansatz, params, options.optimization_level)?;
                self.measure(&state, hamiltonian, options.shots)
            })
            .collect()
    }
}
