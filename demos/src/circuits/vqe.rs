//! VQE (Variational Quantum Eigensolver) ansatz templates.
//!
//! An ansatz is a parameterized quantum circuit used in variational algorithms.
//! Templates here only describe the circuit; the oracle binds parameter values
//! on every evaluation.

use std::fmt;

use arvak_vqe::{Angle, ParameterizedCircuit, VqeResult};
use clap::ValueEnum;

/// Template families selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AnsatzKind {
    /// Ry rotation layers with linear CZ entanglement.
    TwoLocal,
    /// Ry-Rz rotation layers with linear CZ entanglement.
    HardwareEfficient,
    /// A single Ry layer, no entanglement.
    Ry,
    /// Fixed 5-parameter 2-qubit template.
    #[default]
    ReducedH2,
}

impl AnsatzKind {
    /// Build the template for `n_qubits` and `reps`.
    ///
    /// `ReducedH2` ignores both and always yields the 2-qubit template.
    pub fn build(self, n_qubits: usize, reps: usize) -> VqeResult<ParameterizedCircuit> {
        match self {
            AnsatzKind::TwoLocal => two_local(n_qubits, reps),
            AnsatzKind::HardwareEfficient => hardware_efficient(n_qubits, reps),
            AnsatzKind::Ry => ry_layer(n_qubits),
            AnsatzKind::ReducedH2 => reduced_h2_ansatz(),
        }
    }
}

impl fmt::Display for AnsatzKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnsatzKind::TwoLocal => "two_local",
            AnsatzKind::HardwareEfficient => "hardware_efficient",
            AnsatzKind::Ry => "ry",
            AnsatzKind::ReducedH2 => "reduced_h2",
        };
        f.write_str(name)
    }
}

/// TwoLocal ansatz.
///
/// Alternates between
/// - rotation layers (Ry on each qubit)
/// - entanglement layers (CZ between adjacent qubits)
///
/// # Parameters needed
/// Total parameters = n_qubits * (reps + 1)
pub fn two_local(n_qubits: usize, reps: usize) -> VqeResult<ParameterizedCircuit> {
    let mut circuit = ParameterizedCircuit::new("two_local", n_qubits, n_qubits * (reps + 1));
    let mut param_idx = 0;

    for q in 0..n_qubits {
        circuit.ry(Angle::Param(param_idx), q)?;
        param_idx += 1;
    }

    for _ in 0..reps {
        for q in 0..n_qubits.saturating_sub(1) {
            circuit.cz(q, q + 1)?;
        }
        for q in 0..n_qubits {
            circuit.ry(Angle::Param(param_idx), q)?;
            param_idx += 1;
        }
    }

    Ok(circuit)
}

/// Hardware-efficient ansatz with Ry-Rz rotations followed by CZ entanglement.
///
/// # Parameters needed
/// Total parameters = 2 * n_qubits * (reps + 1)
pub fn hardware_efficient(n_qubits: usize, reps: usize) -> VqeResult<ParameterizedCircuit> {
    let mut circuit =
        ParameterizedCircuit::new("hw_efficient", n_qubits, 2 * n_qubits * (reps + 1));
    let mut param_idx = 0;

    let mut rotation_layer = |circuit: &mut ParameterizedCircuit| -> VqeResult<()> {
        for q in 0..n_qubits {
            circuit
                .ry(Angle::Param(param_idx), q)?
                .rz(Angle::Param(param_idx + 1), q)?;
            param_idx += 2;
        }
        Ok(())
    };

    rotation_layer(&mut circuit)?;
    for _ in 0..reps {
        for q in 0..n_qubits.saturating_sub(1) {
            circuit.cz(q, q + 1)?;
        }
        rotation_layer(&mut circuit)?;
    }

    Ok(circuit)
}

/// Rotation-only baseline: one Ry per qubit.
pub fn ry_layer(n_qubits: usize) -> VqeResult<ParameterizedCircuit> {
    let mut circuit = ParameterizedCircuit::new("ry", n_qubits, n_qubits);
    for q in 0..n_qubits {
        circuit.ry(Angle::Param(q), q)?;
    }
    Ok(circuit)
}

/// Fixed 2-qubit template with 5 parameters for the reduced H₂ model.
///
/// Ry(θ₀) q0, Ry(θ₁) q1, CX 0→1, Ry(θ₂) q0, Ry(θ₃) q1, Rz(θ₄) q1.
pub fn reduced_h2_ansatz() -> VqeResult<ParameterizedCircuit> {
    let mut circuit = ParameterizedCircuit::new("reduced_h2", 2, 5);
    circuit
        .ry(Angle::Param(0), 0)?
        .ry(Angle::Param(1), 1)?
        .cx(0, 1)?
        .ry(Angle::Param(2), 0)?
        .ry(Angle::Param(3), 1)?
        .rz(Angle::Param(4), 1)?;
    Ok(circuit)
}

/// Number of parameters a template needs.
pub fn num_parameters(kind: AnsatzKind, n_qubits: usize, reps: usize) -> usize {
    match kind {
        AnsatzKind::TwoLocal => n_qubits * (reps + 1),
        AnsatzKind::HardwareEfficient => 2 * n_qubits * (reps + 1),
        AnsatzKind::Ry => n_qubits,
        AnsatzKind::ReducedH2 => 5,
    }
}
