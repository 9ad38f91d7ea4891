//! Molecular Hamiltonians for VQE.
//!
//! Both models are 2-qubit Pauli sums. Labels follow the crate-wide
//! convention: the rightmost character acts on qubit 0.

use std::fmt;

use arvak_vqe::{Hamiltonian, VqeResult};
use clap::ValueEnum;

/// Reference problems selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ProblemKind {
    /// Reduced two-qubit H₂ table, ground energy -0.98.
    #[default]
    H2Reduced,
    /// H₂ model with single-qubit Z terms, ground energy ≈ -1.169.
    H2Model,
}

impl ProblemKind {
    /// Build the Hamiltonian.
    pub fn hamiltonian(self) -> VqeResult<Hamiltonian> {
        match self {
            ProblemKind::H2Reduced => reduced_h2_hamiltonian(),
            ProblemKind::H2Model => h2_model_hamiltonian(),
        }
    }

    /// Display name for console output.
    pub fn molecule_name(self) -> &'static str {
        match self {
            ProblemKind::H2Reduced => "H₂ (reduced 2-qubit table)",
            ProblemKind::H2Model => "H₂ (model Hamiltonian)",
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProblemKind::H2Reduced => "h2-reduced",
            ProblemKind::H2Model => "h2-model",
        };
        f.write_str(name)
    }
}

/// Reduced H₂ Hamiltonian.
///
/// H = -0.81 II + 0.17 ZZ + 0.045 XX - 0.045 YY
///
/// The XX and YY terms cancel on the odd-parity block, so |01⟩ and |10⟩ are
/// degenerate ground states at -0.98.
pub fn reduced_h2_hamiltonian() -> VqeResult<Hamiltonian> {
    Hamiltonian::build([("II", -0.81), ("ZZ", 0.17), ("XX", 0.045), ("YY", -0.045)])
}

/// H₂ model Hamiltonian at equilibrium bond distance.
///
/// H = g0 I + g1 Z0 + g2 Z1 + g3 Z0Z1 + g4 (X0X1 + Y0Y1)
///
/// The ground state lives in the odd-parity block and is an entangled
/// mixture of |01⟩ and |10⟩ with energy ≈ -1.169.
pub fn h2_model_hamiltonian() -> VqeResult<Hamiltonian> {
    Hamiltonian::build([
        ("II", -0.32),
        ("IZ", 0.39),
        ("ZI", -0.39),
        ("ZZ", -0.01),
        ("XX", 0.18),
        ("YY", 0.18),
    ])
}
