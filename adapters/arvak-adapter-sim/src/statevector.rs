//! Statevector simulation engine.

use num_complex::Complex64;

use arvak_vqe::{Angle, BoundCircuit, Gate, PauliTerm, VqeError, VqeResult};

/// A statevector representing a quantum state.
///
/// Basis index `i` has bit `q` set iff qubit `q` is `|1⟩`.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes, indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Probability of measuring basis state `index`.
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes.get(index).map_or(0.0, Complex64::norm_sqr)
    }

    /// Apply every gate of a bound circuit in order.
    pub fn apply_circuit(&mut self, circuit: &BoundCircuit) -> VqeResult<()> {
        if circuit.num_qubits() != self.num_qubits {
            return Err(VqeError::QubitCountMismatch {
                hamiltonian: self.num_qubits,
                ansatz: circuit.num_qubits(),
            });
        }
        for gate in circuit.gates() {
            self.apply(gate)?;
        }
        Ok(())
    }

    /// Apply a single gate.
    ///
    /// Fails if the gate still carries a free parameter or addresses a
    /// qubit outside the register.
    pub fn apply(&mut self, gate: &Gate) -> VqeResult<()> {
        if let Some(&q) = gate.qubits().iter().find(|&&q| q >= self.num_qubits) {
            return Err(VqeError::Configuration(format!(
                "{} gate on qubit {q} outside a {}-qubit register",
                gate.name(),
                self.num_qubits
            )));
        }

        match *gate {
            Gate::H(q) => self.apply_h(q),
            Gate::X(q) => self.apply_x(q),
            Gate::Y(q) => self.apply_y(q),
            Gate::Z(q) => self.apply_z(q),
            Gate::Rx(theta, q) => self.apply_rx(q, resolve(theta, gate)?),
            Gate::Ry(theta, q) => self.apply_ry(q, resolve(theta, gate)?),
            Gate::Rz(theta, q) => self.apply_rz(q, resolve(theta, gate)?),
            Gate::Cx(control, target) => self.apply_cx(control, target),
            Gate::Cz(a, b) => self.apply_cz(a, b),
        }
        Ok(())
    }

    /// Exact `⟨ψ|P|ψ⟩` for the Pauli string of `term`, without its
    /// coefficient.
    pub fn expectation(&self, term: &PauliTerm) -> f64 {
        self.amplitudes
            .iter()
            .enumerate()
            .map(|(i, amp)| {
                let (j, phase) = term.apply_to_basis(i);
                (self.amplitudes[j].conj() * phase * amp).re
            })
            .sum()
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    /// Apply a 2x2 update to every amplitude pair `(|..0..⟩, |..1..⟩)` of
    /// `qubit`.
    fn update_pairs<F>(&mut self, qubit: usize, update: F)
    where
        F: Fn(Complex64, Complex64) -> (Complex64, Complex64),
    {
        let mask = 1 << qubit;
        for i in (0..self.amplitudes.len()).filter(|i| i & mask == 0) {
            let j = i | mask;
            let (a, b) = update(self.amplitudes[i], self.amplitudes[j]);
            self.amplitudes[i] = a;
            self.amplitudes[j] = b;
        }
    }

    fn apply_x(&mut self, qubit: usize) {
        self.update_pairs(qubit, |a, b| (b, a));
    }

    fn apply_y(&mut self, qubit: usize) {
        let i_val = Complex64::new(0.0, 1.0);
        self.update_pairs(qubit, |a, b| (-i_val * b, i_val * a));
    }

    fn apply_z(&mut self, qubit: usize) {
        self.update_pairs(qubit, |a, b| (a, -b));
    }

    fn apply_h(&mut self, qubit: usize) {
        let sqrt2_inv = std::f64::consts::FRAC_1_SQRT_2;
        self.update_pairs(qubit, |a, b| (sqrt2_inv * (a + b), sqrt2_inv * (a - b)));
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        self.update_pairs(qubit, |a, b| (c * a + neg_i_s * b, neg_i_s * a + c * b));
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let (s, c) = (theta / 2.0).sin_cos();
        self.update_pairs(qubit, |a, b| (c * a - s * b, s * a + c * b));
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { phase_0 } else { phase_1 };
        }
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & ctrl_mask != 0 && i & tgt_mask == 0 {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_cz(&mut self, a: usize, b: usize) {
        let mask = (1 << a) | (1 << b);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == mask {
                *amp = -*amp;
            }
        }
    }
}

fn resolve(angle: Angle, gate: &Gate) -> VqeResult<f64> {
    angle.as_f64().ok_or_else(|| {
        VqeError::Configuration(format!("{} gate has an unbound parameter", gate.name()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn term(label: &str) -> PauliTerm {
        PauliTerm::parse(label, 1.0).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(sv.amplitudes[1..].iter().all(|a| a.norm() < 1e-15));
        assert_abs_diff_eq!(sv.expectation(&term("ZZ")), 1.0);
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply(&Gate::H(0)).unwrap();
        sv.apply(&Gate::Cx(0, 1)).unwrap();

        let sqrt2_inv = std::f64::consts::FRAC_1_SQRT_2;
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(sqrt2_inv, 0.0)));
        assert_abs_diff_eq!(sv.expectation(&term("ZZ")), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sv.expectation(&term("XX")), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sv.expectation(&term("YY")), -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sv.expectation(&term("IZ")), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotations_on_bloch_sphere() {
        let theta = 0.7;
        let mut sv = Statevector::new(1);
        sv.apply(&Gate::Ry(Angle::Fixed(theta), 0)).unwrap();
        assert_abs_diff_eq!(sv.expectation(&term("Z")), theta.cos(), epsilon = 1e-12);
        assert_abs_diff_eq!(sv.expectation(&term("X")), theta.sin(), epsilon = 1e-12);

        sv.apply(&Gate::Rz(Angle::Fixed(FRAC_PI_2), 0)).unwrap();
        assert_abs_diff_eq!(sv.expectation(&term("X")), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sv.expectation(&term("Y")), theta.sin(), epsilon = 1e-12);

        let mut sv = Statevector::new(1);
        sv.apply(&Gate::Rx(Angle::Fixed(theta), 0)).unwrap();
        assert_abs_diff_eq!(sv.expectation(&term("Y")), -theta.sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_qubit_zero_is_rightmost_label_char() {
        let mut sv = Statevector::new(2);
        sv.apply(&Gate::X(0)).unwrap();
        assert_abs_diff_eq!(sv.probability(1), 1.0);
        assert_abs_diff_eq!(sv.expectation(&term("IZ")), -1.0);
        assert_abs_diff_eq!(sv.expectation(&term("ZI")), 1.0);
    }

    #[test]
    fn test_cz_and_y() {
        let mut sv = Statevector::new(2);
        sv.apply(&Gate::X(0)).unwrap();
        sv.apply(&Gate::X(1)).unwrap();
        sv.apply(&Gate::Cz(0, 1)).unwrap();
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(-1.0, 0.0)));

        let mut sv = Statevector::new(1);
        sv.apply(&Gate::Y(0)).unwrap();
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 1.0)));
        sv.apply(&Gate::Z(0)).unwrap();
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, -1.0)));
    }

    #[test]
    fn test_full_rotation_preserves_expectations() {
        let mut sv = Statevector::new(1);
        sv.apply(&Gate::H(0)).unwrap();
        sv.apply(&Gate::Rz(Angle::Fixed(2.0 * PI), 0)).unwrap();
        assert_abs_diff_eq!(sv.expectation(&term("X")), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_unbound_and_out_of_range() {
        let mut sv = Statevector::new(1);
        assert!(sv.apply(&Gate::Ry(Angle::Param(0), 0)).is_err());
        assert!(sv.apply(&Gate::Cx(0, 1)).is_err());
    }
}
