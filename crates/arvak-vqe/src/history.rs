//! Append-only record of every objective evaluation in a run.

use serde::{Deserialize, Serialize};

/// One objective evaluation: the parameters it was called with and the
/// energy the oracle returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// 1-based evaluation index within the run.
    pub index: usize,
    /// Snapshot of the parameter vector.
    pub parameters: Vec<f64>,
    /// Energy estimate.
    pub energy: f64,
}

/// Every evaluation of one optimization run, in call order.
///
/// Includes rejected and intermediate trial points, not only accepted steps.
/// The counter is advanced before the oracle is called, so after a failed
/// evaluation it is one ahead of the number of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationHistory {
    records: Vec<EvaluationRecord>,
    counter: usize,
}

impl OptimizationHistory {
    /// Create an empty history with the counter at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the counter and return the new evaluation index.
    pub(crate) fn begin_evaluation(&mut self) -> usize {
        self.counter += 1;
        self.counter
    }

    /// Append the outcome of evaluation `index`.
    pub(crate) fn record(&mut self, index: usize, parameters: &[f64], energy: f64) {
        debug_assert_eq!(index, self.counter);
        self.records.push(EvaluationRecord {
            index,
            parameters: parameters.to_vec(),
            energy,
        });
    }

    /// Current value of the evaluation counter.
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// All records in call order.
    pub fn records(&self) -> &[EvaluationRecord] {
        &self.records
    }

    /// Number of recorded evaluations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing was evaluated.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Energy trajectory in call order.
    pub fn energies(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.energy).collect()
    }

    /// Lowest-energy record.
    pub fn best(&self) -> Option<&EvaluationRecord> {
        self.records
            .iter()
            .min_by(|a, b| a.energy.total_cmp(&b.energy))
    }

    /// Running minimum of the energy, one entry per evaluation.
    pub fn best_so_far(&self) -> Vec<f64> {
        self.records
            .iter()
            .scan(f64::INFINITY, |best, r| {
                *best = best.min(r.energy);
                Some(*best)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(energies: &[f64]) -> OptimizationHistory {
        let mut h = OptimizationHistory::new();
        for (i, &e) in energies.iter().enumerate() {
            let idx = h.begin_evaluation();
            h.record(idx, &[i as f64], e);
        }
        h
    }

    #[test]
    fn test_indices_start_at_one() {
        let h = history(&[0.3, 0.1, 0.2]);
        let indices: Vec<usize> = h.records().iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(h.counter(), 3);
    }

    #[test]
    fn test_best_and_running_minimum() {
        let h = history(&[0.3, 0.1, 0.2, -0.5]);
        assert_eq!(h.best().map(|r| r.index), Some(4));
        assert_eq!(h.best_so_far(), vec![0.3, 0.1, 0.1, -0.5]);
    }

    #[test]
    fn test_empty() {
        let h = OptimizationHistory::new();
        assert!(h.is_empty());
        assert!(h.best().is_none());
        assert_eq!(h.counter(), 0);
    }
}
