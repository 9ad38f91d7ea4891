//! Problem definitions for the VQE demos.

pub mod molecules;

pub use molecules::{ProblemKind, h2_model_hamiltonian, reduced_h2_hamiltonian};
