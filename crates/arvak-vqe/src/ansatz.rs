//! Parameterized trial circuits (ansätze).
//!
//! An ansatz is a circuit template whose rotation angles are either fixed or
//! refer to a slot in the parameter vector. Binding a full parameter vector
//! yields a [`BoundCircuit`] that an expectation oracle can execute.
//!
//! ```rust
//! use arvak_vqe::ansatz::{Ansatz, Angle, ParameterizedCircuit};
//!
//! let mut template = ParameterizedCircuit::new("ry_cx", 2, 2);
//! template
//!     .ry(Angle::Param(0), 0)?
//!     .ry(Angle::Param(1), 1)?
//!     .cx(0, 1)?;
//!
//! let bound = template.bind(&[0.1, 0.2])?;
//! assert_eq!(bound.gates().len(), 3);
//! # Ok::<(), arvak_vqe::VqeError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{VqeError, VqeResult};

/// A rotation angle in a circuit template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Angle {
    /// A constant angle in radians.
    Fixed(f64),
    /// Index into the parameter vector.
    Param(usize),
}

impl Angle {
    /// The concrete value, if the angle is not a free parameter.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Angle::Fixed(v) => Some(*v),
            Angle::Param(_) => None,
        }
    }

    /// Resolve against a parameter vector.
    fn bind(self, params: &[f64]) -> Angle {
        match self {
            Angle::Fixed(_) => self,
            Angle::Param(idx) => Angle::Fixed(params[idx]),
        }
    }
}

impl From<f64> for Angle {
    fn from(value: f64) -> Self {
        Angle::Fixed(value)
    }
}

/// Gates understood by ansatz templates and the simulators that run them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Hadamard.
    H(usize),
    /// Pauli-X.
    X(usize),
    /// Pauli-Y.
    Y(usize),
    /// Pauli-Z.
    Z(usize),
    /// Rotation about X.
    Rx(Angle, usize),
    /// Rotation about Y.
    Ry(Angle, usize),
    /// Rotation about Z.
    Rz(Angle, usize),
    /// Controlled-X (control, target).
    Cx(usize, usize),
    /// Controlled-Z.
    Cz(usize, usize),
}

impl Gate {
    /// Name of the gate, lower case.
    pub fn name(&self) -> &'static str {
        match self {
            Gate::H(_) => "h",
            Gate::X(_) => "x",
            Gate::Y(_) => "y",
            Gate::Z(_) => "z",
            Gate::Rx(..) => "rx",
            Gate::Ry(..) => "ry",
            Gate::Rz(..) => "rz",
            Gate::Cx(..) => "cx",
            Gate::Cz(..) => "cz",
        }
    }

    /// Qubits this gate acts on.
    pub fn qubits(&self) -> Vec<usize> {
        match *self {
            Gate::H(q)
            | Gate::X(q)
            | Gate::Y(q)
            | Gate::Z(q)
            | Gate::Rx(_, q)
            | Gate::Ry(_, q)
            | Gate::Rz(_, q) => vec![q],
            Gate::Cx(a, b) | Gate::Cz(a, b) => vec![a, b],
        }
    }

    /// The rotation angle, for rotation gates.
    pub fn angle(&self) -> Option<Angle> {
        match *self {
            Gate::Rx(a, _) | Gate::Ry(a, _) | Gate::Rz(a, _) => Some(a),
            _ => None,
        }
    }

    fn bind(self, params: &[f64]) -> Gate {
        match self {
            Gate::Rx(a, q) => Gate::Rx(a.bind(params), q),
            Gate::Ry(a, q) => Gate::Ry(a.bind(params), q),
            Gate::Rz(a, q) => Gate::Rz(a.bind(params), q),
            other => other,
        }
    }
}

/// A circuit with every angle fixed, ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundCircuit {
    name: String,
    num_qubits: usize,
    gates: Vec<Gate>,
}

impl BoundCircuit {
    /// Build from a gate list. All angles must be fixed.
    pub fn new(name: impl Into<String>, num_qubits: usize, gates: Vec<Gate>) -> VqeResult<Self> {
        if let Some(gate) = gates
            .iter()
            .find(|g| g.angle().is_some_and(|a| a.as_f64().is_none()))
        {
            return Err(VqeError::Configuration(format!(
                "bound circuit contains an unbound {} gate",
                gate.name()
            )));
        }
        Ok(Self {
            name: name.into(),
            num_qubits,
            gates,
        })
    }

    /// Name of the template this circuit was bound from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Gates in application order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }
}

/// A parameterized trial circuit.
///
/// Implementors declare their parameter count up front; the driver checks it
/// against the run configuration before the first evaluation.
pub trait Ansatz {
    /// Human-readable template name.
    fn name(&self) -> &str;

    /// Register width.
    fn num_qubits(&self) -> usize;

    /// Number of free parameters.
    fn num_parameters(&self) -> usize;

    /// Bind a full parameter vector.
    ///
    /// Fails with [`VqeError::ParameterCountMismatch`] if
    /// `params.len() != self.num_parameters()`.
    fn bind(&self, params: &[f64]) -> VqeResult<BoundCircuit>;
}

/// The standard [`Ansatz`]: a gate list over [`Angle`]s.
///
/// Deserialization replays every gate through [`push`](Self::push), so a
/// loaded template satisfies the same qubit and parameter-slot checks as a
/// built one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CircuitSpec")]
pub struct ParameterizedCircuit {
    name: String,
    num_qubits: usize,
    num_parameters: usize,
    gates: Vec<Gate>,
}

impl ParameterizedCircuit {
    /// Create an empty template with a declared register width and
    /// parameter count.
    pub fn new(name: impl Into<String>, num_qubits: usize, num_parameters: usize) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_parameters,
            gates: Vec::new(),
        }
    }

    /// Gates in application order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Indices of parameters no gate refers to.
    pub fn unused_parameters(&self) -> Vec<usize> {
        let mut used = vec![false; self.num_parameters];
        for gate in &self.gates {
            if let Some(Angle::Param(idx)) = gate.angle() {
                if let Some(slot) = used.get_mut(idx) {
                    *slot = true;
                }
            }
        }
        (0..self.num_parameters).filter(|&i| !used[i]).collect()
    }

    /// Append a gate after checking its qubits and parameter slot.
    pub fn push(&mut self, gate: Gate) -> VqeResult<&mut Self> {
        let qubits = gate.qubits();
        if let Some(&q) = qubits.iter().find(|&&q| q >= self.num_qubits) {
            return Err(VqeError::Configuration(format!(
                "{} gate on qubit {q} but template '{}' has {} qubits",
                gate.name(),
                self.name,
                self.num_qubits
            )));
        }
        if qubits.len() == 2 && qubits[0] == qubits[1] {
            return Err(VqeError::Configuration(format!(
                "{} gate uses qubit {} as both control and target",
                gate.name(),
                qubits[0]
            )));
        }
        if let Some(Angle::Param(idx)) = gate.angle() {
            if idx >= self.num_parameters {
                return Err(VqeError::Configuration(format!(
                    "{} gate refers to parameter {idx} but template '{}' declares {}",
                    gate.name(),
                    self.name,
                    self.num_parameters
                )));
            }
        }
        self.gates.push(gate);
        Ok(self)
    }

    /// Apply Hadamard.
    pub fn h(&mut self, qubit: usize) -> VqeResult<&mut Self> {
        self.push(Gate::H(qubit))
    }

    /// Apply Pauli-X.
    pub fn x(&mut self, qubit: usize) -> VqeResult<&mut Self> {
        self.push(Gate::X(qubit))
    }

    /// Apply Rx rotation.
    pub fn rx(&mut self, theta: impl Into<Angle>, qubit: usize) -> VqeResult<&mut Self> {
        self.push(Gate::Rx(theta.into(), qubit))
    }

    /// Apply Ry rotation.
    pub fn ry(&mut self, theta: impl Into<Angle>, qubit: usize) -> VqeResult<&mut Self> {
        self.push(Gate::Ry(theta.into(), qubit))
    }

    /// Apply Rz rotation.
    pub fn rz(&mut self, theta: impl Into<Angle>, qubit: usize) -> VqeResult<&mut Self> {
        self.push(Gate::Rz(theta.into(), qubit))
    }

    /// Apply CX.
    pub fn cx(&mut self, control: usize, target: usize) -> VqeResult<&mut Self> {
        self.push(Gate::Cx(control, target))
    }

    /// Apply CZ.
    pub fn cz(&mut self, q0: usize, q1: usize) -> VqeResult<&mut Self> {
        self.push(Gate::Cz(q0, q1))
    }
}

/// Unchecked serialized form of a [`ParameterizedCircuit`].
#[derive(Deserialize)]
struct CircuitSpec {
    name: String,
    num_qubits: usize,
    num_parameters: usize,
    gates: Vec<Gate>,
}

impl TryFrom<CircuitSpec> for ParameterizedCircuit {
    type Error = VqeError;

    fn try_from(spec: CircuitSpec) -> VqeResult<Self> {
        let mut circuit =
            ParameterizedCircuit::new(spec.name, spec.num_qubits, spec.num_parameters);
        for gate in spec.gates {
            circuit.push(gate)?;
        }
        Ok(circuit)
    }
}

impl Ansatz for ParameterizedCircuit {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn num_parameters(&self) -> usize {
        self.num_parameters
    }

    fn bind(&self, params: &[f64]) -> VqeResult<BoundCircuit> {
        if params.len() != self.num_parameters {
            return Err(VqeError::ParameterCountMismatch {
                ansatz: self.name.clone(),
                expected: self.num_parameters,
                got: params.len(),
            });
        }

        let gates = self.gates.iter().map(|g| g.bind(params)).collect();
        Ok(BoundCircuit {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            gates,
        })
    }
}
