//! Arvak Local Statevector Estimator
//!
//! This crate provides a local [`ExpectationOracle`](arvak_vqe::ExpectationOracle)
//! for the VQE loop in `arvak-vqe`. It binds the ansatz, simplifies the
//! bound circuit, simulates it with a full statevector and evaluates the
//! Hamiltonian, either exactly or with simulated shot noise.
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//!
//! # Example
//!
//! ```rust
//! use arvak_adapter_sim::StatevectorEstimator;
//! use arvak_vqe::{Angle, EstimatorOptions, ExpectationOracle, Hamiltonian, ParameterizedCircuit};
//!
//! let mut ansatz = ParameterizedCircuit::new("ry", 1, 1);
//! ansatz.ry(Angle::Param(0), 0)?;
//! let h = Hamiltonian::build([("Z", 1.0)])?;
//!
//! let mut oracle = StatevectorEstimator::with_seed(42);
//! let theta = std::f64::consts::PI;
//! let energy = oracle.estimate_one(&ansatz, &h, &[theta], &EstimatorOptions::exact())?;
//! assert!((energy + 1.0).abs() < 1e-12);
//! # Ok::<(), arvak_vqe::VqeError>(())
//! ```

mod estimator;
pub mod simplify;
mod statevector;

pub use estimator::{DEFAULT_MAX_QUBITS, StatevectorEstimator};
pub use statevector::Statevector;
