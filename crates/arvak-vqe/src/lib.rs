//! `arvak-vqe`: the classical half of the Variational Quantum Eigensolver.
//!
//! Given a Hamiltonian written as a weighted sum of Pauli strings and a
//! parameterized trial circuit, the crate searches the circuit parameters
//! for the lowest energy expectation value:
//!
//! - [`Hamiltonian`]: Pauli-sum model with a dense matrix form for
//!   reference solutions
//! - [`Ansatz`] / [`ParameterizedCircuit`]: trial circuit templates
//! - [`ExpectationOracle`]: the quantum backend contract
//! - [`Objective`]: counts, records and reports every evaluation
//! - [`Minimizer`]: [`NelderMead`] and [`Spsa`]
//! - [`VqeRunner`]: validates a run, samples the start point and packages
//!   an [`OptimizationResult`] with the full [`OptimizationHistory`]
//! - [`validator`]: exact ground-state energies for small registers
//!
//! The oracle is supplied by the caller; `arvak-adapter-sim` provides a
//! local statevector implementation.
//!
//! # Quick start
//!
//! ```rust
//! use arvak_vqe::Hamiltonian;
//! use arvak_vqe::validator::exact_ground_state_energy;
//!
//! let h = Hamiltonian::build([
//!     ("II", -0.81),
//!     ("ZZ", 0.17),
//!     ("XX", 0.045),
//!     ("YY", -0.045),
//! ])?;
//! assert_eq!(h.num_qubits(), 2);
//!
//! let exact = exact_ground_state_energy(&h)?;
//! assert!((exact + 0.98).abs() < 1e-10);
//! # Ok::<(), arvak_vqe::VqeError>(())
//! ```

pub mod ansatz;
pub mod config;
pub mod driver;
pub mod error;
pub mod hamiltonian;
pub mod history;
pub mod minimizer;
pub mod objective;
pub mod oracle;
pub mod validator;

pub use ansatz::{Ansatz, Angle, BoundCircuit, Gate, ParameterizedCircuit};
pub use config::VqeConfig;
pub use driver::{OptimizationResult, VqeRunner};
pub use error::{VqeError, VqeResult};
pub use hamiltonian::{Hamiltonian, Pauli, PauliTerm};
pub use history::{EvaluationRecord, OptimizationHistory};
pub use minimizer::{
    MinimizeOutcome, Minimizer, MinimizerConfig, NelderMead, OptimizerKind, Spsa,
    TerminationReason,
};
pub use objective::{Objective, ProgressObserver, ProgressUpdate};
pub use oracle::{EstimatorOptions, ExpectationOracle};
pub use validator::{ValidationReport, exact_ground_state_energy};
