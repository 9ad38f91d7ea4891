//! Tests for the Pauli Hamiltonian model and its exact spectrum.

use approx::assert_abs_diff_eq;
use arvak_vqe::hamiltonian::{Hamiltonian, MAX_DENSE_QUBITS, Pauli, PauliTerm};
use arvak_vqe::validator::{exact_ground_state_energy, exact_spectrum};
use arvak_vqe::VqeError;
use num_complex::Complex64;
use proptest::prelude::*;

fn reduced_h2() -> Hamiltonian {
    Hamiltonian::build([("II", -0.81), ("ZZ", 0.17), ("XX", 0.045), ("YY", -0.045)]).unwrap()
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn build_sets_qubit_count_from_label_length() {
    let h = reduced_h2();
    assert_eq!(h.num_qubits(), 2);
    assert_eq!(h.num_terms(), 4);
    assert_abs_diff_eq!(h.identity_coefficient().re, -0.81);
}

#[test]
fn empty_term_list_is_rejected() {
    let err = Hamiltonian::build(Vec::<(&str, f64)>::new()).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn mixed_label_lengths_are_rejected() {
    let err = Hamiltonian::build([("ZZ", 1.0), ("Z", 1.0)]).unwrap_err();
    assert!(matches!(err, VqeError::InvalidPauliLabel { .. }));
}

#[test]
fn lower_case_labels_are_rejected() {
    let err = Hamiltonian::build([("zz", 1.0)]).unwrap_err();
    assert!(matches!(err, VqeError::InvalidPauliLabel { ref label, .. } if label == "zz"));
}

#[test]
fn empty_label_is_rejected() {
    assert!(PauliTerm::parse("", 1.0).is_err());
}

#[test]
fn duplicate_labels_are_additive() {
    let split = Hamiltonian::build([("ZZ", 0.1), ("XX", 0.3), ("ZZ", 0.07)]).unwrap();
    let merged = Hamiltonian::build([("ZZ", 0.17), ("XX", 0.3)]).unwrap();
    assert_eq!(split.num_terms(), 3);

    let diff = split.to_matrix().unwrap() - merged.to_matrix().unwrap();
    assert!(diff.iter().all(|z| z.norm() < 1e-12));
}

#[test]
fn rightmost_character_is_qubit_zero() {
    let h = Hamiltonian::build([("IZ", 1.0)]).unwrap();
    let m = h.to_matrix().unwrap();
    // Z on qubit 0: |01⟩ (index 1) and |11⟩ (index 3) get -1.
    assert_abs_diff_eq!(m[(0, 0)].re, 1.0);
    assert_abs_diff_eq!(m[(1, 1)].re, -1.0);
    assert_abs_diff_eq!(m[(2, 2)].re, 1.0);
    assert_abs_diff_eq!(m[(3, 3)].re, -1.0);
    assert_eq!(h.terms()[0].pauli_on(1), Pauli::I);
}

#[test]
fn serde_uses_label_coefficient_pairs() {
    let h = Hamiltonian::build([
        ("ZZ", Complex64::new(0.17, 0.0)),
        ("XY", Complex64::new(0.0, 0.5)),
    ])
    .unwrap();
    let json = serde_json::to_value(&h).unwrap();
    assert_eq!(json[0]["label"], "ZZ");
    assert_eq!(json[0]["coefficient"], 0.17);
    assert_eq!(json[1]["coefficient"][1], 0.5);

    let back: Hamiltonian = serde_json::from_value(json).unwrap();
    assert_eq!(back, h);
}

// ---------------------------------------------------------------------------
// Dense matrix and spectrum
// ---------------------------------------------------------------------------

#[test]
fn reduced_h2_matrix_elements() {
    let m = reduced_h2().to_matrix().unwrap();
    // ZZ is +1 on |00⟩, |11⟩ and -1 on |01⟩, |10⟩.
    assert_abs_diff_eq!(m[(0, 0)].re, -0.64, epsilon = 1e-12);
    assert_abs_diff_eq!(m[(1, 1)].re, -0.98, epsilon = 1e-12);
    // XX - YY couples |00⟩ and |11⟩ only.
    assert_abs_diff_eq!(m[(3, 0)].re, 0.09, epsilon = 1e-12);
    assert_abs_diff_eq!(m[(2, 1)].norm(), 0.0, epsilon = 1e-12);
}

#[test]
fn dense_matrix_refuses_wide_registers() {
    for width in [MAX_DENSE_QUBITS + 1, 64, 200] {
        let h = Hamiltonian::build([("I".repeat(width), 1.0)]).unwrap();
        assert_eq!(h.num_qubits(), width);
        assert!(h.to_matrix().unwrap_err().is_configuration());
    }
}

#[test]
fn reduced_h2_ground_energy() {
    let exact = exact_ground_state_energy(&reduced_h2()).unwrap();
    assert_abs_diff_eq!(exact, -0.98, epsilon = 1e-10);
}

#[test]
fn spectrum_is_sorted() {
    let h = Hamiltonian::build([("XZ", 0.3), ("ZI", -0.7), ("YY", 0.2), ("IX", 0.1)]).unwrap();
    let spectrum = exact_spectrum(&h).unwrap();
    assert_eq!(spectrum.len(), 4);
    assert!(spectrum.windows(2).all(|w| w[0] <= w[1]));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn arb_label(num_qubits: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec!['I', 'X', 'Y', 'Z']), num_qubits)
        .prop_map(|chars| chars.into_iter().collect())
}

fn arb_hamiltonian() -> impl Strategy<Value = Hamiltonian> {
    (1_usize..=4).prop_flat_map(|n| {
        prop::collection::vec((arb_label(n), -2.0_f64..2.0), 1..=8)
            .prop_map(|terms| Hamiltonian::build(terms).unwrap())
    })
}

proptest! {
    #[test]
    fn valid_labels_always_parse(label in "[IXYZ]{1,8}") {
        let term = PauliTerm::parse(&label, 1.0).unwrap();
        prop_assert_eq!(term.num_qubits(), label.len());
        prop_assert_eq!(term.label(), label);
    }

    #[test]
    fn foreign_characters_are_rejected(
        prefix in "[IXYZ]{0,3}",
        bad in "[a-zA-HJ-W0-9]",
        suffix in "[IXYZ]{0,3}",
    ) {
        let label = format!("{prefix}{bad}{suffix}");
        let is_invalid = matches!(
            PauliTerm::parse(&label, 1.0),
            Err(VqeError::InvalidPauliLabel { .. })
        );
        prop_assert!(is_invalid);
    }

    #[test]
    fn real_coefficients_give_hermitian_matrix(h in arb_hamiltonian()) {
        prop_assert!(h.is_hermitian(1e-12));
        let m = h.to_matrix().unwrap();
        let diff = &m - m.adjoint();
        prop_assert!(diff.iter().all(|z| z.norm() < 1e-12));
    }

    #[test]
    fn simplify_preserves_the_operator(h in arb_hamiltonian()) {
        let diff = h.to_matrix().unwrap() - h.simplify(1e-14).to_matrix().unwrap();
        prop_assert!(diff.iter().all(|z| z.norm() < 1e-10));
    }

    #[test]
    fn trace_is_identity_weight(h in arb_hamiltonian()) {
        let dim = (1_usize << h.num_qubits()) as f64;
        let trace = h.to_matrix().unwrap().trace();
        prop_assert!((trace - h.identity_coefficient() * dim).norm() < 1e-10);
    }

    #[test]
    fn ground_energy_bounded_by_coefficient_norm(h in arb_hamiltonian()) {
        let bound: f64 = h.terms().iter().map(|t| t.coefficient().norm()).sum();
        let exact = exact_ground_state_energy(&h).unwrap();
        prop_assert!(exact >= -bound - 1e-9);
    }
}
