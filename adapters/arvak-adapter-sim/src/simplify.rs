//! Peephole simplification of bound circuits before simulation.
//!
//! Levels:
//! - `0`: none
//! - `1`: drop rotations by (a multiple of) 2π and merge adjacent
//!   same-axis rotations on a wire
//! - `2+`: additionally cancel adjacent identical CX/CZ pairs
//!
//! Only transformations that leave every expectation value unchanged are
//! applied (rotations by 2π differ from the identity by a global phase).

use std::f64::consts::TAU;

use arvak_vqe::{Angle, BoundCircuit, Gate, VqeResult};

const EPSILON: f64 = 1e-10;

/// Simplify `circuit` at `level`.
pub fn simplify(circuit: &BoundCircuit, level: u8) -> VqeResult<BoundCircuit> {
    if level == 0 {
        return Ok(circuit.clone());
    }

    let mut peephole = Peephole::new(circuit.num_qubits(), level >= 2);
    for gate in circuit.gates() {
        peephole.push(*gate);
    }
    BoundCircuit::new(circuit.name(), circuit.num_qubits(), peephole.finish())
}

/// True if a rotation by `theta` is the identity up to global phase.
fn is_trivial_rotation(theta: f64) -> bool {
    let r = theta.rem_euclid(TAU);
    r < EPSILON || TAU - r < EPSILON
}

/// Rotation axis, used to decide which rotations merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Z,
}

fn rotation(gate: &Gate) -> Option<(Axis, f64, usize)> {
    match *gate {
        Gate::Rx(Angle::Fixed(t), q) => Some((Axis::X, t, q)),
        Gate::Ry(Angle::Fixed(t), q) => Some((Axis::Y, t, q)),
        Gate::Rz(Angle::Fixed(t), q) => Some((Axis::Z, t, q)),
        _ => None,
    }
}

fn make_rotation(axis: Axis, theta: f64, qubit: usize) -> Gate {
    match axis {
        Axis::X => Gate::Rx(Angle::Fixed(theta), qubit),
        Axis::Y => Gate::Ry(Angle::Fixed(theta), qubit),
        Axis::Z => Gate::Rz(Angle::Fixed(theta), qubit),
    }
}

/// Two-qubit gates that are their own inverse.
fn cancels(a: &Gate, b: &Gate) -> bool {
    match (*a, *b) {
        (Gate::Cx(c1, t1), Gate::Cx(c2, t2)) => c1 == c2 && t1 == t2,
        (Gate::Cz(a1, b1), Gate::Cz(a2, b2)) => (a1, b1) == (a2, b2) || (a1, b1) == (b2, a2),
        _ => false,
    }
}

/// Output buffer plus, for each wire, the stack of live output gates on it.
///
/// The top of a wire's stack is the gate a new gate on that wire would be
/// adjacent to, so removals expose earlier gates for further merging.
struct Peephole {
    out: Vec<Option<Gate>>,
    wires: Vec<Vec<usize>>,
    cancel_two_qubit: bool,
}

impl Peephole {
    fn new(num_qubits: usize, cancel_two_qubit: bool) -> Self {
        Self {
            out: Vec::new(),
            wires: vec![Vec::new(); num_qubits],
            cancel_two_qubit,
        }
    }

    fn top(&self, qubit: usize) -> Option<usize> {
        self.wires[qubit].last().copied()
    }

    fn remove(&mut self, idx: usize) {
        if let Some(gate) = self.out[idx].take() {
            for q in gate.qubits() {
                self.wires[q].pop();
            }
        }
    }

    fn emit(&mut self, gate: Gate) {
        let idx = self.out.len();
        for q in gate.qubits() {
            self.wires[q].push(idx);
        }
        self.out.push(Some(gate));
    }

    fn push(&mut self, gate: Gate) {
        if let Some((axis, theta, q)) = rotation(&gate) {
            if let Some(idx) = self.top(q) {
                if let Some((prev_axis, prev_theta, _)) = self.out[idx].as_ref().and_then(rotation)
                {
                    if prev_axis == axis {
                        let merged = prev_theta + theta;
                        if is_trivial_rotation(merged) {
                            self.remove(idx);
                        } else {
                            self.out[idx] = Some(make_rotation(axis, merged, q));
                        }
                        return;
                    }
                }
            }
            if !is_trivial_rotation(theta) {
                self.emit(gate);
            }
            return;
        }

        if self.cancel_two_qubit && matches!(gate, Gate::Cx(..) | Gate::Cz(..)) {
            let qubits = gate.qubits();
            if let (Some(a), Some(b)) = (self.top(qubits[0]), self.top(qubits[1])) {
                if a == b && self.out[a].as_ref().is_some_and(|prev| cancels(prev, &gate)) {
                    self.remove(a);
                    return;
                }
            }
        }

        self.emit(gate);
    }

    fn finish(self) -> Vec<Gate> {
        self.out.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound(num_qubits: usize, gates: Vec<Gate>) -> BoundCircuit {
        BoundCircuit::new("t", num_qubits, gates).unwrap()
    }

    fn ry(t: f64, q: usize) -> Gate {
        Gate::Ry(Angle::Fixed(t), q)
    }

    #[test]
    fn test_level_zero_is_identity() {
        let c = bound(1, vec![ry(0.0, 0), ry(0.0, 0)]);
        assert_eq!(simplify(&c, 0).unwrap(), c);
    }

    #[test]
    fn test_drops_trivial_rotations() {
        let c = bound(1, vec![ry(0.0, 0), Gate::H(0), Gate::Rz(Angle::Fixed(TAU), 0)]);
        assert_eq!(simplify(&c, 1).unwrap().gates(), &[Gate::H(0)]);
    }

    #[test]
    fn test_merges_same_axis_rotations() {
        let c = bound(2, vec![ry(0.25, 0), ry(0.5, 1), ry(0.5, 0)]);
        let s = simplify(&c, 1).unwrap();
        assert_eq!(s.gates(), &[ry(0.75, 0), ry(0.5, 1)]);
    }

    #[test]
    fn test_does_not_merge_across_other_gates() {
        let c = bound(2, vec![ry(0.25, 0), Gate::Cx(0, 1), ry(0.5, 0)]);
        assert_eq!(simplify(&c, 1).unwrap().gates().len(), 3);

        let c = bound(1, vec![ry(0.25, 0), Gate::Rz(Angle::Fixed(0.1), 0), ry(0.5, 0)]);
        assert_eq!(simplify(&c, 1).unwrap().gates().len(), 3);
    }

    #[test]
    fn test_cx_pairs_only_at_level_two() {
        let c = bound(2, vec![Gate::H(0), Gate::Cx(0, 1), Gate::Cx(0, 1)]);
        assert_eq!(simplify(&c, 1).unwrap().gates().len(), 3);
        assert_eq!(simplify(&c, 2).unwrap().gates(), &[Gate::H(0)]);
    }

    #[test]
    fn test_cz_is_symmetric_and_cx_is_not() {
        let c = bound(2, vec![Gate::Cz(0, 1), Gate::Cz(1, 0)]);
        assert!(simplify(&c, 2).unwrap().gates().is_empty());

        let c = bound(2, vec![Gate::Cx(0, 1), Gate::Cx(1, 0)]);
        assert_eq!(simplify(&c, 2).unwrap().gates().len(), 2);
    }

    #[test]
    fn test_cancellation_cascades() {
        let c = bound(
            2,
            vec![ry(0.3, 0), Gate::Cx(0, 1), Gate::Cx(0, 1), ry(-0.3, 0), Gate::H(1)],
        );
        assert_eq!(simplify(&c, 2).unwrap().gates(), &[Gate::H(1)]);
    }

    #[test]
    fn test_gate_on_one_wire_blocks_cancellation() {
        let c = bound(2, vec![Gate::Cx(0, 1), Gate::X(1), Gate::Cx(0, 1)]);
        assert_eq!(simplify(&c, 2).unwrap().gates().len(), 3);
    }
}
