//! ROC and precision-recall curve series
//!
//! Point series over the unique scores in descending order, suitable for
//! CSV artifacts. Equal scores collapse into one point.

use serde::{Deserialize, Serialize};

use super::{check_inputs, EvalError, Result};

/// One ROC operating point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    pub fpr: f64,
    pub tpr: f64,
    pub threshold: f64,
}

/// One precision-recall operating point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrPoint {
    pub recall: f64,
    pub precision: f64,
    pub threshold: f64,
}

fn sorted_desc(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

/// ROC curve: (fpr, tpr) at each unique score threshold, descending.
///
/// The leading point is the empty classifier at threshold +inf.
pub fn roc_curve(y_true: &[u8], scores: &[f64]) -> Result<Vec<RocPoint>> {
    check_inputs(y_true, scores)?;
    let n_pos = y_true.iter().filter(|&&v| v == 1).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(EvalError::SingleClass);
    }

    let order = sorted_desc(scores);
    let mut points = vec![RocPoint {
        fpr: 0.0,
        tpr: 0.0,
        threshold: f64::INFINITY,
    }];

    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut i = 0;
    while i < order.len() {
        let score = scores[order[i]];
        while i < order.len() && scores[order[i]] == score {
            if y_true[order[i]] == 1 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push(RocPoint {
            fpr: fp as f64 / n_neg as f64,
            tpr: tp as f64 / n_pos as f64,
            threshold: score,
        });
    }
    Ok(points)
}

/// Precision-recall curve at each unique score threshold, descending.
pub fn pr_curve(y_true: &[u8], scores: &[f64]) -> Result<Vec<PrPoint>> {
    check_inputs(y_true, scores)?;
    let n_pos = y_true.iter().filter(|&&v| v == 1).count();
    if n_pos == 0 || n_pos == y_true.len() {
        return Err(EvalError::SingleClass);
    }

    let order = sorted_desc(scores);
    let mut points = Vec::new();
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut i = 0;
    while i < order.len() {
        let score = scores[order[i]];
        while i < order.len() && scores[order[i]] == score {
            if y_true[order[i]] == 1 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push(PrPoint {
            recall: tp as f64 / n_pos as f64,
            precision: tp as f64 / (tp + fp) as f64,
            threshold: score,
        });
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roc_curve_perfect_ranking() {
        let y = [0, 0, 1, 1];
        let p = [0.1, 0.2, 0.8, 0.9];
        let points = roc_curve(&y, &p).expect("roc");

        assert_eq!(points.first().map(|pt| (pt.fpr, pt.tpr)), Some((0.0, 0.0)));
        // All positives are found before any negative
        let full_tpr_at_zero_fpr = points.iter().any(|pt| pt.tpr == 1.0 && pt.fpr == 0.0);
        assert!(full_tpr_at_zero_fpr);
        let last = points.last().expect("points");
        assert_eq!((last.fpr, last.tpr), (1.0, 1.0));
    }

    #[test]
    fn test_roc_curve_monotone() {
        let y = [0, 1, 0, 1, 1, 0];
        let p = [0.3, 0.4, 0.5, 0.6, 0.2, 0.7];
        let points = roc_curve(&y, &p).expect("roc");
        for pair in points.windows(2) {
            assert!(pair[1].fpr >= pair[0].fpr);
            assert!(pair[1].tpr >= pair[0].tpr);
            assert!(pair[1].threshold <= pair[0].threshold);
        }
    }

    #[test]
    fn test_roc_curve_collapses_ties() {
        let y = [0, 1, 0, 1];
        let p = [0.5, 0.5, 0.5, 0.5];
        let points = roc_curve(&y, &p).expect("roc");
        // Leading point plus one collapsed group
        assert_eq!(points.len(), 2);
        assert_eq!((points[1].fpr, points[1].tpr), (1.0, 1.0));
    }

    #[test]
    fn test_pr_curve_values() {
        let y = [0, 0, 1, 1];
        let p = [0.1, 0.2, 0.8, 0.9];
        let points = pr_curve(&y, &p).expect("pr");

        // Highest threshold first: one positive found, precision 1
        assert_eq!(points[0].recall, 0.5);
        assert_eq!(points[0].precision, 1.0);
        let last = points.last().expect("points");
        assert_eq!(last.recall, 1.0);
        assert_eq!(last.precision, 0.5);
    }

    #[test]
    fn test_pr_curve_recall_monotone() {
        let y = [0, 1, 0, 1, 1, 0];
        let p = [0.3, 0.4, 0.5, 0.6, 0.2, 0.7];
        let points = pr_curve(&y, &p).expect("pr");
        for pair in points.windows(2) {
            assert!(pair[1].recall >= pair[0].recall);
        }
    }

    #[test]
    fn test_single_class_is_error() {
        assert!(matches!(
            roc_curve(&[1, 1], &[0.1, 0.2]),
            Err(EvalError::SingleClass)
        ));
        assert!(matches!(
            pr_curve(&[0, 0], &[0.1, 0.2]),
            Err(EvalError::SingleClass)
        ));
    }
}
