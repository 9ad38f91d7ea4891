//! Exact reference energies for small Hamiltonians.
//!
//! Diagonalizes the dense matrix, so cost grows as `8^n`. Use only to check
//! VQE results on toy problems.

use serde::{Deserialize, Serialize};

use crate::error::{VqeError, VqeResult};
use crate::hamiltonian::{Hamiltonian, MAX_DENSE_QUBITS};

/// Largest register that will be diagonalized.
pub const MAX_EXACT_QUBITS: usize = MAX_DENSE_QUBITS;

/// Tolerance on imaginary coefficient parts when checking Hermiticity.
const HERMITIAN_TOLERANCE: f64 = 1e-10;

/// All eigenvalues of `hamiltonian`, ascending.
pub fn exact_spectrum(hamiltonian: &Hamiltonian) -> VqeResult<Vec<f64>> {
    if hamiltonian.num_qubits() > MAX_EXACT_QUBITS {
        return Err(VqeError::Configuration(format!(
            "exact diagonalization is limited to {MAX_EXACT_QUBITS} qubits, Hamiltonian has {}",
            hamiltonian.num_qubits()
        )));
    }
    if !hamiltonian.is_hermitian(HERMITIAN_TOLERANCE) {
        return Err(VqeError::Configuration(
            "Hamiltonian is not Hermitian; its eigenvalues are not energies".into(),
        ));
    }

    let eigen = hamiltonian.to_matrix()?.symmetric_eigen();
    let mut values: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
    values.sort_by(f64::total_cmp);
    Ok(values)
}

/// Smallest eigenvalue of `hamiltonian`.
pub fn exact_ground_state_energy(hamiltonian: &Hamiltonian) -> VqeResult<f64> {
    exact_spectrum(hamiltonian)?
        .first()
        .copied()
        .ok_or_else(|| VqeError::Configuration("empty spectrum".into()))
}

/// Comparison of a VQE energy with the exact ground-state energy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Energy found by the optimizer.
    pub energy: f64,
    /// Exact ground-state energy.
    pub exact: f64,
    /// `|energy - exact|`.
    pub absolute_error: f64,
    /// `|energy - exact| / |exact|`, or the absolute error if `exact` is 0.
    pub relative_error: f64,
    /// Tolerance used for the two flags below.
    pub tolerance: f64,
    /// True if the absolute error is within tolerance.
    pub within_tolerance: bool,
    /// True if `energy` lies below the exact minimum by more than the
    /// tolerance, which no exact oracle can produce.
    pub violates_variational_bound: bool,
}

impl ValidationReport {
    /// Compare `energy` against `exact`.
    pub fn compare(energy: f64, exact: f64, tolerance: f64) -> Self {
        let absolute_error = (energy - exact).abs();
        let relative_error = if exact == 0.0 {
            absolute_error
        } else {
            absolute_error / exact.abs()
        };
        Self {
            energy,
            exact,
            absolute_error,
            relative_error,
            tolerance,
            within_tolerance: absolute_error <= tolerance,
            violates_variational_bound: energy < exact - tolerance,
        }
    }

    /// Diagonalize `hamiltonian` and compare `energy` against its minimum.
    pub fn against(hamiltonian: &Hamiltonian, energy: f64, tolerance: f64) -> VqeResult<Self> {
        Ok(Self::compare(
            energy,
            exact_ground_state_energy(hamiltonian)?,
            tolerance,
        ))
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "E = {:.6}, exact = {:.6}, error = {:.2e} ({:.3}%)",
            self.energy,
            self.exact,
            self.absolute_error,
            self.relative_error * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_single_z() {
        let h = Hamiltonian::build([("Z", 1.0)]).unwrap();
        let spectrum = exact_spectrum(&h).unwrap();
        assert_abs_diff_eq!(spectrum[0], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(spectrum[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reduced_h2_table() {
        let h = Hamiltonian::build([("II", -0.81), ("ZZ", 0.17), ("XX", 0.045), ("YY", -0.045)])
            .unwrap();
        let spectrum = exact_spectrum(&h).unwrap();
        // Degenerate ground space spanned by |01⟩ and |10⟩.
        assert_abs_diff_eq!(spectrum[0], -0.98, epsilon = 1e-10);
        assert_abs_diff_eq!(spectrum[1], -0.98, epsilon = 1e-10);
        assert_abs_diff_eq!(spectrum[2], -0.73, epsilon = 1e-10);
        assert_abs_diff_eq!(spectrum[3], -0.55, epsilon = 1e-10);
    }

    #[test]
    fn test_rejects_non_hermitian() {
        let h = Hamiltonian::build([("X", num_complex::Complex64::new(0.0, 1.0))]).unwrap();
        assert!(exact_ground_state_energy(&h).unwrap_err().is_configuration());
    }

    #[test]
    fn test_rejects_large_registers() {
        let label = "Z".repeat(MAX_EXACT_QUBITS + 1);
        let h = Hamiltonian::build([(label, 1.0)]).unwrap();
        assert!(exact_spectrum(&h).is_err());
    }

    #[test]
    fn test_report_flags() {
        let ok = ValidationReport::compare(-0.975, -0.98, 0.01);
        assert!(ok.within_tolerance);
        assert!(!ok.violates_variational_bound);

        let below = ValidationReport::compare(-1.2, -0.98, 0.01);
        assert!(below.violates_variational_bound);
        assert!(!below.within_tolerance);

        let zero = ValidationReport::compare(0.5, 0.0, 0.1);
        assert_abs_diff_eq!(zero.relative_error, 0.5);
    }
}
