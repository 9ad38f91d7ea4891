//! Error types for the VQE crate.

use thiserror::Error;

/// Errors that abort a VQE run.
///
/// Non-convergence is deliberately absent: a minimizer that exhausts its
/// budget still produces a result, see
/// [`TerminationReason`](crate::minimizer::TerminationReason).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VqeError {
    /// Generic invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The ansatz and the run disagree on the number of parameters.
    #[error("Parameter count mismatch: ansatz '{ansatz}' declares {expected}, got {got}")]
    ParameterCountMismatch {
        /// Name of the ansatz template.
        ansatz: String,
        /// Parameter count declared by the ansatz.
        expected: usize,
        /// Parameter count that was supplied or configured.
        got: usize,
    },

    /// A Pauli label is malformed.
    #[error("Invalid Pauli label '{label}': {reason}")]
    InvalidPauliLabel {
        /// The offending label.
        label: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The Hamiltonian and the ansatz act on different register sizes.
    #[error("Qubit count mismatch: Hamiltonian acts on {hamiltonian} qubits, ansatz on {ansatz}")]
    QubitCountMismatch {
        /// Qubits in the Hamiltonian.
        hamiltonian: usize,
        /// Qubits in the ansatz.
        ansatz: usize,
    },

    /// The expectation oracle failed during a run.
    #[error("Oracle evaluation failed: {0}")]
    OracleEvaluation(String),

    /// I/O error while loading configuration or writing results.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML configuration could not be parsed.
    #[error("Invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl VqeError {
    /// True for errors that are detected before or at run start and stem
    /// from an inconsistent setup rather than a backend failure.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            VqeError::Configuration(_)
                | VqeError::ParameterCountMismatch { .. }
                | VqeError::InvalidPauliLabel { .. }
                | VqeError::QubitCountMismatch { .. }
                | VqeError::Yaml(_)
        )
    }
}

/// Result type for VQE operations.
pub type VqeResult<T> = Result<T, VqeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        let err = VqeError::ParameterCountMismatch {
            ansatz: "two_local".into(),
            expected: 4,
            got: 5,
        };
        assert!(err.is_configuration());
        assert!(err.to_string().contains("declares 4, got 5"));

        let err = VqeError::OracleEvaluation("backend offline".into());
        assert!(!err.is_configuration());
    }
}
