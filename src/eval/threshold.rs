//! Decision-threshold optimization
//!
//! Linear scan over a fixed candidate grid. Two objectives:
//! misclassification cost (weighted false positives plus false negatives,
//! minimized) and F-beta (maximized). Ties always resolve to the
//! first-encountered candidate, i.e. the lowest threshold.

use serde::{Deserialize, Serialize};

use super::metrics::{threshold_predictions, BinaryConfusion};
use super::{check_inputs, EvalError, Result};

/// Candidate thresholds `start, start+step, ...` up to but excluding `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdGrid {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl Default for ThresholdGrid {
    fn default() -> Self {
        Self {
            start: 0.20,
            stop: 0.80,
            step: 0.01,
        }
    }
}

impl ThresholdGrid {
    /// Materialize the candidate thresholds in ascending order.
    pub fn values(&self) -> Vec<f64> {
        let mut values = Vec::new();
        let mut i = 0u32;
        loop {
            let v = self.start + f64::from(i) * self.step;
            if v >= self.stop - 1e-12 {
                break;
            }
            values.push(v);
            i += 1;
        }
        values
    }

    fn validated_values(&self) -> Result<Vec<f64>> {
        if !(self.step > 0.0) {
            return Err(EvalError::InvalidGrid(format!(
                "step must be positive, got {}",
                self.step
            )));
        }
        if self.start >= self.stop {
            return Err(EvalError::InvalidGrid(format!(
                "start {} is not below stop {}",
                self.start, self.stop
            )));
        }
        Ok(self.values())
    }
}

/// Unit costs for misclassifications.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSpec {
    pub cost_fp: f64,
    pub cost_fn: f64,
}

impl Default for CostSpec {
    fn default() -> Self {
        Self {
            cost_fp: 1000.0,
            cost_fn: 900.0,
        }
    }
}

/// A selected threshold with its objective value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdChoice {
    pub threshold: f64,
    pub objective: f64,
}

/// Threshold minimizing total misclassification cost over the grid.
pub fn optimize_cost(
    grid: &ThresholdGrid,
    y_true: &[u8],
    probas: &[f64],
    costs: &CostSpec,
) -> Result<ThresholdChoice> {
    check_inputs(y_true, probas)?;

    let mut best: Option<ThresholdChoice> = None;
    for t in grid.validated_values()? {
        let preds = threshold_predictions(probas, t);
        let cm = BinaryConfusion::from_labels(y_true, &preds)?;
        let cost = cm.fp as f64 * costs.cost_fp + cm.fn_ as f64 * costs.cost_fn;
        // Strict comparison keeps the first-encountered candidate on ties
        if best.map_or(true, |b| cost < b.objective) {
            best = Some(ThresholdChoice {
                threshold: t,
                objective: cost,
            });
        }
    }
    best.ok_or_else(|| EvalError::InvalidGrid("grid has no candidates".to_string()))
}

/// Threshold maximizing the F-beta score over the grid.
pub fn optimize_fbeta(
    grid: &ThresholdGrid,
    y_true: &[u8],
    probas: &[f64],
    beta: f64,
) -> Result<ThresholdChoice> {
    check_inputs(y_true, probas)?;
    if !(beta > 0.0) {
        return Err(EvalError::InvalidBeta(beta));
    }

    let mut best: Option<ThresholdChoice> = None;
    for t in grid.validated_values()? {
        let preds = threshold_predictions(probas, t);
        let cm = BinaryConfusion::from_labels(y_true, &preds)?;
        let score = cm.fbeta(beta);
        if best.map_or(true, |b| score > b.objective) {
            best = Some(ThresholdChoice {
                threshold: t,
                objective: score,
            });
        }
    }
    best.ok_or_else(|| EvalError::InvalidGrid("grid has no candidates".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_has_60_candidates() {
        let grid = ThresholdGrid::default();
        let values = grid.values();
        assert_eq!(values.len(), 60);
        assert!((values[0] - 0.20).abs() < 1e-12);
        assert!((values[59] - 0.79).abs() < 1e-9);
    }

    #[test]
    fn test_grid_validation() {
        let bad_step = ThresholdGrid {
            start: 0.2,
            stop: 0.8,
            step: 0.0,
        };
        assert!(matches!(
            optimize_cost(&bad_step, &[0, 1], &[0.1, 0.9], &CostSpec::default()),
            Err(EvalError::InvalidGrid(_))
        ));

        let inverted = ThresholdGrid {
            start: 0.8,
            stop: 0.2,
            step: 0.01,
        };
        assert!(matches!(
            optimize_fbeta(&inverted, &[0, 1], &[0.1, 0.9], 1.0),
            Err(EvalError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_cost_prefers_cheap_side() {
        // One negative at 0.5, one positive at 0.6. A threshold in (0.5, 0.6]
        // classifies both correctly; the scan should find one with zero cost.
        let y_true = [0, 1];
        let probas = [0.5, 0.6];
        let choice =
            optimize_cost(&ThresholdGrid::default(), &y_true, &probas, &CostSpec::default())
                .expect("optimize");
        assert_eq!(choice.objective, 0.0);
        assert!(choice.threshold > 0.5 && choice.threshold <= 0.6);
    }

    #[test]
    fn test_cost_tie_takes_lowest_threshold() {
        // Perfectly separated far from the grid: every candidate has cost 0,
        // so the first grid point wins.
        let y_true = [0, 1];
        let probas = [0.01, 0.99];
        let choice =
            optimize_cost(&ThresholdGrid::default(), &y_true, &probas, &CostSpec::default())
                .expect("optimize");
        assert!((choice.threshold - 0.20).abs() < 1e-12);
    }

    #[test]
    fn test_fbeta_tie_takes_lowest_threshold() {
        let y_true = [0, 1];
        let probas = [0.01, 0.99];
        let choice = optimize_fbeta(&ThresholdGrid::default(), &y_true, &probas, 1.0)
            .expect("optimize");
        assert!((choice.threshold - 0.20).abs() < 1e-12);
        assert_eq!(choice.objective, 1.0);
    }

    #[test]
    fn test_asymmetric_costs_move_threshold() {
        // Probabilities spread across the grid; expensive false negatives
        // push the threshold down relative to expensive false positives.
        let y_true = [0, 0, 0, 1, 0, 1, 1, 1];
        let probas = [0.25, 0.35, 0.45, 0.4, 0.55, 0.5, 0.65, 0.75];

        let fn_heavy = CostSpec {
            cost_fp: 100.0,
            cost_fn: 10000.0,
        };
        let fp_heavy = CostSpec {
            cost_fp: 10000.0,
            cost_fn: 100.0,
        };
        let grid = ThresholdGrid::default();
        let low = optimize_cost(&grid, &y_true, &probas, &fn_heavy).expect("optimize");
        let high = optimize_cost(&grid, &y_true, &probas, &fp_heavy).expect("optimize");
        assert!(low.threshold < high.threshold);
    }

    #[test]
    fn test_invalid_beta() {
        let result = optimize_fbeta(&ThresholdGrid::default(), &[0, 1], &[0.1, 0.9], 0.0);
        assert!(matches!(result, Err(EvalError::InvalidBeta(_))));
    }

    #[test]
    fn test_input_validation() {
        let grid = ThresholdGrid::default();
        assert!(matches!(
            optimize_cost(&grid, &[], &[], &CostSpec::default()),
            Err(EvalError::Empty)
        ));
        assert!(matches!(
            optimize_cost(&grid, &[0, 1], &[0.5], &CostSpec::default()),
            Err(EvalError::LengthMismatch { .. })
        ));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn labeled_probas() -> impl Strategy<Value = (Vec<u8>, Vec<f64>)> {
        proptest::collection::vec((any::<bool>(), 0.0f64..1.0), 4..60).prop_map(|pairs| {
            let mut y = Vec::with_capacity(pairs.len());
            let mut p = Vec::with_capacity(pairs.len());
            for (label, proba) in pairs {
                y.push(u8::from(label));
                p.push(proba);
            }
            (y, p)
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        // The chosen threshold's cost is <= every grid candidate's cost
        #[test]
        fn prop_cost_choice_dominates_grid((y, p) in labeled_probas()) {
            let grid = ThresholdGrid::default();
            let costs = CostSpec::default();
            let choice = optimize_cost(&grid, &y, &p, &costs).expect("optimize");

            for t in grid.values() {
                let preds = threshold_predictions(&p, t);
                let cm = BinaryConfusion::from_labels(&y, &preds).expect("confusion");
                let cost = cm.fp as f64 * costs.cost_fp + cm.fn_ as f64 * costs.cost_fn;
                prop_assert!(choice.objective <= cost + 1e-9);
            }
        }

        // The chosen threshold's F-beta is >= every grid candidate's
        #[test]
        fn prop_fbeta_choice_dominates_grid((y, p) in labeled_probas(), beta in 0.5f64..2.5) {
            let grid = ThresholdGrid::default();
            let choice = optimize_fbeta(&grid, &y, &p, beta).expect("optimize");

            for t in grid.values() {
                let preds = threshold_predictions(&p, t);
                let cm = BinaryConfusion::from_labels(&y, &preds).expect("confusion");
                prop_assert!(choice.objective >= cm.fbeta(beta) - 1e-9);
            }
        }

        // The choice is always a grid candidate
        #[test]
        fn prop_choice_is_on_grid((y, p) in labeled_probas()) {
            let grid = ThresholdGrid::default();
            let choice = optimize_cost(&grid, &y, &p, &CostSpec::default()).expect("optimize");
            let on_grid = grid.values().iter().any(|t| (t - choice.threshold).abs() < 1e-12);
            prop_assert!(on_grid);
        }
    }
}
