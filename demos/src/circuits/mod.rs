//! Ansatz templates for demos.

pub mod vqe;

pub use vqe::{
    AnsatzKind, hardware_efficient, num_parameters, reduced_h2_ansatz, ry_layer, two_local,
};
