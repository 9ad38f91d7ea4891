//! The VQE objective: parameter vector in, energy estimate out.
//!
//! Every call advances the run's evaluation counter, asks the oracle for a
//! fresh estimate, snapshots the parameters into the history and, on every
//! [`PROGRESS_INTERVAL`]-th evaluation, emits a progress notification.

use tracing::{debug, info};

use crate::ansatz::Ansatz;
use crate::error::{VqeError, VqeResult};
use crate::hamiltonian::Hamiltonian;
use crate::history::OptimizationHistory;
use crate::oracle::{EstimatorOptions, ExpectationOracle};

/// Evaluations between two progress notifications.
pub const PROGRESS_INTERVAL: usize = 10;

/// Payload of a progress notification.
#[derive(Debug, Clone, Copy)]
pub struct ProgressUpdate<'a> {
    /// Evaluation index (a multiple of the progress interval).
    pub evaluation: usize,
    /// Energy returned by that evaluation.
    pub energy: f64,
    /// Parameters of that evaluation.
    pub parameters: &'a [f64],
}

impl std::fmt::Display for ProgressUpdate<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Evaluation {:4}: E = {:.6}, θ = [", self.evaluation, self.energy)?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p:.4}")?;
        }
        write!(f, "]")
    }
}

/// Receives progress notifications from an [`Objective`].
pub trait ProgressObserver {
    /// Called on every notification.
    fn on_progress(&mut self, update: &ProgressUpdate<'_>);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&ProgressUpdate<'_>),
{
    fn on_progress(&mut self, update: &ProgressUpdate<'_>) {
        self(update);
    }
}

/// Objective function bound to one run.
///
/// Borrows the run's history and oracle mutably for its whole lifetime, so a
/// history can never be shared between two concurrently live objectives.
pub struct Objective<'run, O: ?Sized> {
    ansatz: &'run dyn Ansatz,
    hamiltonian: &'run Hamiltonian,
    oracle: &'run mut O,
    history: &'run mut OptimizationHistory,
    options: EstimatorOptions,
    observer: Option<&'run mut dyn ProgressObserver>,
    progress_interval: usize,
}

impl<'run, O> Objective<'run, O>
where
    O: ExpectationOracle + ?Sized,
{
    /// Create an objective over `hamiltonian` with the ansatz prepared by
    /// `ansatz`, recording into `history`.
    pub fn new(
        ansatz: &'run dyn Ansatz,
        hamiltonian: &'run Hamiltonian,
        oracle: &'run mut O,
        history: &'run mut OptimizationHistory,
    ) -> Self {
        Self {
            ansatz,
            hamiltonian,
            oracle,
            history,
            options: EstimatorOptions::default(),
            observer: None,
            progress_interval: PROGRESS_INTERVAL,
        }
    }

    /// Set the options passed through to the oracle.
    pub fn with_options(mut self, options: EstimatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach a progress observer.
    pub fn with_observer(mut self, observer: &'run mut dyn ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Change how often progress is reported. Values below 1 are treated
    /// as 1.
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Evaluate the energy at `params`.
    ///
    /// Oracle failures are returned as-is and must abort the run.
    pub fn evaluate(&mut self, params: &[f64]) -> VqeResult<f64> {
        let expected = self.ansatz.num_parameters();
        if params.len() != expected {
            return Err(VqeError::ParameterCountMismatch {
                ansatz: self.ansatz.name().to_string(),
                expected,
                got: params.len(),
            });
        }

        let index = self.history.begin_evaluation();
        let energy = self
            .oracle
            .estimate_one(self.ansatz, self.hamiltonian, params, &self.options)?;
        if !energy.is_finite() {
            return Err(VqeError::OracleEvaluation(format!(
                "evaluation {index} returned non-finite energy {energy}"
            )));
        }

        self.history.record(index, params, energy);
        debug!(evaluation = index, energy, "objective evaluated");

        if index % self.progress_interval == 0 {
            let update = ProgressUpdate {
                evaluation: index,
                energy,
                parameters: params,
            };
            info!("{update}");
            if let Some(observer) = self.observer.as_mut() {
                observer.on_progress(&update);
            }
        }

        Ok(energy)
    }

    /// Number of evaluations started so far.
    pub fn evaluations(&self) -> usize {
        self.history.counter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansatz::{Angle, ParameterizedCircuit};

    /// Returns the sum of the parameters; fails when told to.
    struct SumOracle {
        calls: usize,
        fail_on: Option<usize>,
    }

    impl ExpectationOracle for SumOracle {
        fn estimate(
            &mut self,
            _ansatz: &dyn Ansatz,
            _observables: &[&Hamiltonian],
            bindings: &[&[f64]],
            _options: &EstimatorOptions,
        ) -> VqeResult<Vec<f64>> {
            self.calls += 1;
            if self.fail_on == Some(self.calls) {
                return Err(VqeError::OracleEvaluation("backend went away".into()));
            }
            Ok(bindings.iter().map(|b| b.iter().sum()).collect())
        }
    }

    fn setup() -> (ParameterizedCircuit, Hamiltonian) {
        let mut ansatz = ParameterizedCircuit::new("pair", 1, 2);
        ansatz
            .ry(Angle::Param(0), 0)
            .unwrap()
            .rz(Angle::Param(1), 0)
            .unwrap();
        (ansatz, Hamiltonian::build([("Z", 1.0)]).unwrap())
    }

    #[test]
    fn test_records_every_evaluation() {
        let (ansatz, h) = setup();
        let mut oracle = SumOracle {
            calls: 0,
            fail_on: None,
        };
        let mut history = OptimizationHistory::new();

        let mut objective = Objective::new(&ansatz, &h, &mut oracle, &mut history);
        let mut buffer = vec![0.5, 0.25];
        assert_eq!(objective.evaluate(&buffer).unwrap(), 0.75);
        buffer[0] = 1.0;
        assert_eq!(objective.evaluate(&buffer).unwrap(), 1.25);
        assert_eq!(objective.evaluations(), 2);

        // Snapshots are independent of the caller's buffer.
        assert_eq!(history.records()[0].parameters, vec![0.5, 0.25]);
        assert_eq!(history.records()[1].parameters, vec![1.0, 0.25]);
    }

    #[test]
    fn test_progress_fires_on_multiples_of_ten() {
        let (ansatz, h) = setup();
        let mut oracle = SumOracle {
            calls: 0,
            fail_on: None,
        };
        let mut history = OptimizationHistory::new();
        let mut seen = Vec::new();
        let mut observer = |u: &ProgressUpdate<'_>| seen.push(u.evaluation);

        {
            let mut objective = Objective::new(&ansatz, &h, &mut oracle, &mut history)
                .with_observer(&mut observer);
            for i in 0..35 {
                objective.evaluate(&[i as f64, 0.0]).unwrap();
            }
        }

        assert_eq!(seen, vec![10, 20, 30]);
    }

    #[test]
    fn test_oracle_failure_propagates() {
        let (ansatz, h) = setup();
        let mut oracle = SumOracle {
            calls: 0,
            fail_on: Some(2),
        };
        let mut history = OptimizationHistory::new();

        let mut objective = Objective::new(&ansatz, &h, &mut oracle, &mut history);
        objective.evaluate(&[0.0, 0.0]).unwrap();
        let err = objective.evaluate(&[0.0, 0.0]).unwrap_err();
        assert!(matches!(err, VqeError::OracleEvaluation(_)));

        assert_eq!(history.len(), 1);
        assert_eq!(history.counter(), 2);
    }

    #[test]
    fn test_wrong_length_never_reaches_oracle() {
        let (ansatz, h) = setup();
        let mut oracle = SumOracle {
            calls: 0,
            fail_on: None,
        };
        let mut history = OptimizationHistory::new();

        let mut objective = Objective::new(&ansatz, &h, &mut oracle, &mut history);
        let err = objective.evaluate(&[0.0]).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(oracle.calls, 0);
        assert!(history.is_empty());
    }

    #[test]
    fn test_progress_line_format() {
        let update = ProgressUpdate {
            evaluation: 20,
            energy: -0.978_123_456,
            parameters: &[1.234_567, 0.1],
        };
        assert_eq!(
            update.to_string(),
            "Evaluation   20: E = -0.978123, θ = [1.2346, 0.1000]"
        );
    }
}
