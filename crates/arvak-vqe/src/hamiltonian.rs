//! Pauli Hamiltonian model.
//!
//! A Hamiltonian is represented as a sum of Pauli strings:
//!
//!   H = Σ_k  c_k · P_k
//!
//! where each P_k is a tensor product of single-qubit Pauli operators and
//! c_k ∈ ℂ. Terms are given as string labels over `{I, X, Y, Z}`, one
//! character per qubit. The **rightmost** character acts on qubit 0, so the
//! label `"IZ"` is Z on qubit 0 and the identity on qubit 1. This matches the
//! statevector convention `index = Σ_q bit_q · 2^q`.
//!
//! # Example
//!
//! ```rust
//! use arvak_vqe::hamiltonian::Hamiltonian;
//!
//! let h = Hamiltonian::build([("II", -0.81), ("ZZ", 0.17), ("XX", 0.045), ("YY", -0.045)])?;
//! assert_eq!(h.num_qubits(), 2);
//! assert_eq!(h.num_terms(), 4);
//! # Ok::<(), arvak_vqe::VqeError>(())
//! ```

use std::collections::HashMap;

use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{VqeError, VqeResult};

/// Largest register [`Hamiltonian::to_matrix`] will expand.
pub const MAX_DENSE_QUBITS: usize = 12;

/// A single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity operator.
    I,
    /// Pauli-X operator.
    X,
    /// Pauli-Y operator.
    Y,
    /// Pauli-Z operator.
    Z,
}

impl Pauli {
    /// Parse a label character. Labels are case sensitive.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Pauli::I),
            'X' => Some(Pauli::X),
            'Y' => Some(Pauli::Y),
            'Z' => Some(Pauli::Z),
            _ => None,
        }
    }

    /// Get the label character of this operator.
    pub fn as_char(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }
}

impl std::fmt::Display for Pauli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A weighted Pauli string `c · (P_{n-1} ⊗ … ⊗ P_0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PauliTerm {
    coefficient: Complex64,
    /// Operators indexed by qubit (qubit 0 first).
    paulis: Vec<Pauli>,
}

impl PauliTerm {
    /// Parse a term from a label and a coefficient.
    pub fn parse(label: &str, coefficient: impl Into<Complex64>) -> VqeResult<Self> {
        if label.is_empty() {
            return Err(VqeError::InvalidPauliLabel {
                label: label.to_string(),
                reason: "label is empty".into(),
            });
        }

        // Reverse so that index 0 is qubit 0 (rightmost character).
        let paulis = label
            .chars()
            .rev()
            .map(|c| {
                Pauli::from_char(c).ok_or_else(|| VqeError::InvalidPauliLabel {
                    label: label.to_string(),
                    reason: format!("'{c}' is not one of I, X, Y, Z"),
                })
            })
            .collect::<VqeResult<Vec<_>>>()?;

        Ok(Self {
            coefficient: coefficient.into(),
            paulis,
        })
    }

    /// The term's coefficient.
    pub fn coefficient(&self) -> Complex64 {
        self.coefficient
    }

    /// Operators indexed by qubit, qubit 0 first.
    pub fn paulis(&self) -> &[Pauli] {
        &self.paulis
    }

    /// The operator acting on `qubit`.
    pub fn pauli_on(&self, qubit: usize) -> Pauli {
        self.paulis.get(qubit).copied().unwrap_or(Pauli::I)
    }

    /// Number of qubits this term is defined on.
    pub fn num_qubits(&self) -> usize {
        self.paulis.len()
    }

    /// The label string, highest qubit first.
    pub fn label(&self) -> String {
        self.paulis.iter().rev().map(|p| p.as_char()).collect()
    }

    /// True if every factor is the identity.
    pub fn is_identity(&self) -> bool {
        self.paulis.iter().all(|p| *p == Pauli::I)
    }

    /// Apply the Pauli string (without coefficient) to the basis state
    /// `|index⟩`.
    ///
    /// Returns `(j, phase)` such that `P|index⟩ = phase · |j⟩`. A `usize`
    /// index only addresses the low `usize::BITS` qubits; factors above
    /// that read bit 0 and cannot flip it.
    pub fn apply_to_basis(&self, index: usize) -> (usize, Complex64) {
        let mut new_index = index;
        let mut phase = Complex64::new(1.0, 0.0);

        for (qubit, pauli) in self.paulis.iter().enumerate() {
            if *pauli == Pauli::I {
                continue;
            }
            let shift = u32::try_from(qubit).unwrap_or(u32::MAX);
            let bit = index.checked_shr(shift).map_or(0, |v| v & 1);
            let mask = 1usize.checked_shl(shift).unwrap_or(0);
            match pauli {
                Pauli::I => {}
                Pauli::X => {
                    new_index ^= mask;
                }
                Pauli::Y => {
                    new_index ^= mask;
                    // Y|0⟩ = i|1⟩, Y|1⟩ = -i|0⟩
                    if bit == 0 {
                        phase *= Complex64::new(0.0, 1.0);
                    } else {
                        phase *= Complex64::new(0.0, -1.0);
                    }
                }
                Pauli::Z => {
                    if bit == 1 {
                        phase = -phase;
                    }
                }
            }
        }

        (new_index, phase)
    }
}

impl std::fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = self.coefficient;
        if c.im == 0.0 {
            if c.re >= 0.0 {
                write!(f, "+{:.4} ", c.re)?;
            } else {
                write!(f, "{:.4} ", c.re)?;
            }
        } else {
            write!(f, "({:.4}{:+.4}i) ", c.re, c.im)?;
        }
        write!(f, "{}", self.label())
    }
}

/// A Hamiltonian represented as an ordered sum of Pauli terms.
///
/// Immutable once built. Duplicate labels are allowed and additive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TermSpec>", into = "Vec<TermSpec>")]
pub struct Hamiltonian {
    num_qubits: usize,
    terms: Vec<PauliTerm>,
}

impl Hamiltonian {
    /// Build a Hamiltonian from `(label, coefficient)` pairs.
    ///
    /// All labels must be non-empty, of equal length, and use only
    /// `I`, `X`, `Y`, `Z`. The common length is the qubit count.
    pub fn build<I, S, C>(terms: I) -> VqeResult<Self>
    where
        I: IntoIterator<Item = (S, C)>,
        S: AsRef<str>,
        C: Into<Complex64>,
    {
        let terms = terms
            .into_iter()
            .map(|(label, coefficient)| PauliTerm::parse(label.as_ref(), coefficient))
            .collect::<VqeResult<Vec<_>>>()?;
        Self::from_terms(terms)
    }

    /// Build a Hamiltonian from already parsed terms.
    pub fn from_terms(terms: Vec<PauliTerm>) -> VqeResult<Self> {
        let Some(first) = terms.first() else {
            return Err(VqeError::Configuration(
                "Hamiltonian must contain at least one term".into(),
            ));
        };
        let num_qubits = first.num_qubits();

        if let Some(bad) = terms.iter().find(|t| t.num_qubits() != num_qubits) {
            return Err(VqeError::InvalidPauliLabel {
                label: bad.label(),
                reason: format!(
                    "length {} differs from the first term's length {num_qubits}",
                    bad.num_qubits()
                ),
            });
        }

        Ok(Self { num_qubits, terms })
    }

    /// All terms, in construction order.
    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }

    /// Number of terms (duplicates counted separately).
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Number of qubits (the common label length).
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Sum of the coefficients of all identity terms.
    pub fn identity_coefficient(&self) -> Complex64 {
        self.terms
            .iter()
            .filter(|t| t.is_identity())
            .map(PauliTerm::coefficient)
            .sum()
    }

    /// Merge duplicate labels and drop terms whose merged coefficient has
    /// magnitude `<= tolerance`.
    ///
    /// Merged terms keep the position of their first occurrence. If every
    /// term cancels, a single zero identity term remains.
    pub fn simplify(&self, tolerance: f64) -> Self {
        let mut index: HashMap<&[Pauli], usize> = HashMap::new();
        let mut merged: Vec<PauliTerm> = Vec::new();

        for term in &self.terms {
            match index.get(term.paulis()) {
                Some(&pos) => merged[pos].coefficient += term.coefficient,
                None => {
                    index.insert(term.paulis(), merged.len());
                    merged.push(term.clone());
                }
            }
        }

        merged.retain(|t| t.coefficient.norm() > tolerance);
        if merged.is_empty() {
            merged.push(PauliTerm {
                coefficient: Complex64::new(0.0, 0.0),
                paulis: vec![Pauli::I; self.num_qubits],
            });
        }

        Self {
            num_qubits: self.num_qubits,
            terms: merged,
        }
    }

    /// True iff every merged coefficient is real within `tolerance`.
    ///
    /// Pauli strings are Hermitian, so this is exactly the condition for the
    /// whole sum to be Hermitian.
    pub fn is_hermitian(&self, tolerance: f64) -> bool {
        self.simplify(0.0)
            .terms
            .iter()
            .all(|t| t.coefficient.im.abs() <= tolerance)
    }

    /// Dense `2^n × 2^n` matrix of the Hamiltonian.
    ///
    /// Exponential in the qubit count. Only for exact reference solutions;
    /// never call this from the optimization loop. Registers wider than
    /// [`MAX_DENSE_QUBITS`] are rejected.
    pub fn to_matrix(&self) -> VqeResult<DMatrix<Complex64>> {
        if self.num_qubits > MAX_DENSE_QUBITS {
            return Err(VqeError::Configuration(format!(
                "dense matrix is limited to {MAX_DENSE_QUBITS} qubits, Hamiltonian has {}",
                self.num_qubits
            )));
        }
        let dim = 1usize << self.num_qubits;
        let mut matrix = DMatrix::from_element(dim, dim, Complex64::new(0.0, 0.0));

        for term in &self.terms {
            for column in 0..dim {
                let (row, phase) = term.apply_to_basis(column);
                matrix[(row, column)] += term.coefficient * phase;
            }
        }

        Ok(matrix)
    }
}

impl std::fmt::Display for Hamiltonian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Hamiltonian ({} terms, {} qubits):",
            self.num_terms(),
            self.num_qubits()
        )?;
        for term in &self.terms {
            writeln!(f, "  {term}")?;
        }
        Ok(())
    }
}

/// Serialized form of one term: `{ label: "ZZ", coefficient: 0.17 }` or
/// `{ label: "XY", coefficient: [0.0, 0.5] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermSpec {
    /// Pauli label, highest qubit first.
    pub label: String,
    /// Coefficient.
    pub coefficient: Coefficient,
}

/// A real or complex coefficient in serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coefficient {
    /// Real coefficient.
    Real(f64),
    /// Complex coefficient as `[re, im]`.
    Complex([f64; 2]),
}

impl From<Coefficient> for Complex64 {
    fn from(c: Coefficient) -> Self {
        match c {
            Coefficient::Real(re) => Complex64::new(re, 0.0),
            Coefficient::Complex([re, im]) => Complex64::new(re, im),
        }
    }
}

impl From<Complex64> for Coefficient {
    fn from(c: Complex64) -> Self {
        if c.im == 0.0 {
            Coefficient::Real(c.re)
        } else {
            Coefficient::Complex([c.re, c.im])
        }
    }
}

impl TryFrom<Vec<TermSpec>> for Hamiltonian {
    type Error = VqeError;

    fn try_from(specs: Vec<TermSpec>) -> VqeResult<Self> {
        Self::build(specs.into_iter().map(|s| (s.label, s.coefficient)))
    }
}

impl From<Hamiltonian> for Vec<TermSpec> {
    fn from(h: Hamiltonian) -> Self {
        h.terms
            .iter()
            .map(|t| TermSpec {
                label: t.label(),
                coefficient: t.coefficient.into(),
            })
            .collect()
    }
}
