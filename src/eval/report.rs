//! Evaluation report and artifacts
//!
//! Runs both threshold optimizers, applies the F-beta-optimal cutoff, and
//! collects test-set metrics into a serializable report. Artifacts written
//! to the report directory: `report.json`, `report.md`, `notes.txt`, and
//! the ROC / precision-recall series as CSV.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::curves::{pr_curve, roc_curve};
use super::metrics::{roc_auc, threshold_predictions, BinaryConfusion};
use super::threshold::{optimize_cost, optimize_fbeta, CostSpec, ThresholdGrid};
use super::Result;
use crate::error::{FiarError, Result as CrateResult};
use crate::io::save_json;

/// Evaluation knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalOptions {
    pub grid: ThresholdGrid,
    pub costs: CostSpec,
    pub beta: f64,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            grid: ThresholdGrid::default(),
            costs: CostSpec::default(),
            beta: 1.0,
        }
    }
}

/// Test-set evaluation at the tuned threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub model_name: String,
    pub family: String,
    /// Threshold actually applied (the F-beta-optimal one).
    pub threshold: f64,
    pub threshold_source: String,
    pub fbeta_threshold: f64,
    pub fbeta_score: f64,
    /// Cost-optimal alternative, logged alongside.
    pub cost_threshold: f64,
    pub estimated_cost: f64,
    pub beta: f64,
    pub accuracy: f64,
    pub f1: f64,
    pub roc_auc: f64,
    /// sklearn layout: `[[tn, fp], [fn, tp]]`.
    pub confusion: [[usize; 2]; 2],
    pub n_samples: usize,
}

impl EvaluationReport {
    /// Markdown summary table.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str(&format!("# Evaluation: {}\n\n", self.model_name));
        md.push_str(&format!("Family: {}\n\n", self.family));
        md.push_str("| Metric | Value |\n|--------|-------|\n");
        md.push_str(&format!("| Threshold (F{}) | {:.2} |\n", self.beta, self.threshold));
        md.push_str(&format!("| Cost-optimal threshold | {:.2} |\n", self.cost_threshold));
        md.push_str(&format!("| Estimated cost | {:.0} |\n", self.estimated_cost));
        md.push_str(&format!("| Accuracy | {:.4} |\n", self.accuracy));
        md.push_str(&format!("| F1 | {:.4} |\n", self.f1));
        md.push_str(&format!("| ROC AUC | {:.4} |\n", self.roc_auc));
        md.push_str(&format!("| Test samples | {} |\n", self.n_samples));
        md.push_str(&format!(
            "\nConfusion matrix `[[tn, fp], [fn, tp]]`: `{:?}`\n",
            self.confusion
        ));
        md
    }

    /// Limitations note shipped next to the metrics.
    pub fn notes(&self) -> String {
        let mut out = String::from("Model limitations and potential biases:\n");
        out.push_str("- Class imbalance may affect precision/recall.\n");
        out.push_str(&format!(
            "- Threshold optimized for: F{} (cost-optimal alternative: {:.2})\n",
            self.beta, self.cost_threshold
        ));
        out.push_str("- Temporal trends and behavioral drift are not modeled.\n");
        out.push_str(&format!("- Confusion matrix: {:?}\n", self.confusion));
        out.push_str(&format!(
            "- Estimated total cost of misclassification: {:.0}\n",
            self.estimated_cost
        ));
        out
    }
}

/// Evaluate probabilities against test labels with tuned thresholds.
pub fn evaluate_model(
    model_name: &str,
    family: &str,
    y_true: &[u8],
    probas: &[f64],
    options: &EvalOptions,
) -> Result<EvaluationReport> {
    let cost_choice = optimize_cost(&options.grid, y_true, probas, &options.costs)?;
    let fbeta_choice = optimize_fbeta(&options.grid, y_true, probas, options.beta)?;

    let threshold = fbeta_choice.threshold;
    let preds = threshold_predictions(probas, threshold);
    let cm = BinaryConfusion::from_labels(y_true, &preds)?;
    let auc = roc_auc(y_true, probas)?;

    Ok(EvaluationReport {
        model_name: model_name.to_string(),
        family: family.to_string(),
        threshold,
        threshold_source: format!("fbeta({})", options.beta),
        fbeta_threshold: fbeta_choice.threshold,
        fbeta_score: fbeta_choice.objective,
        cost_threshold: cost_choice.threshold,
        estimated_cost: cost_choice.objective,
        beta: options.beta,
        accuracy: cm.accuracy(),
        f1: cm.f1(),
        roc_auc: auc,
        confusion: cm.as_matrix(),
        n_samples: y_true.len(),
    })
}

/// Paths of the written report artifacts.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportArtifacts {
    pub report_json: PathBuf,
    pub report_md: PathBuf,
    pub notes: PathBuf,
    pub roc_csv: PathBuf,
    pub pr_csv: PathBuf,
}

impl ReportArtifacts {
    /// All artifact paths, for tracker logging.
    pub fn all(&self) -> [&Path; 5] {
        [
            &self.report_json,
            &self.report_md,
            &self.notes,
            &self.roc_csv,
            &self.pr_csv,
        ]
    }
}

fn write_text(path: &Path, content: &str) -> CrateResult<()> {
    std::fs::write(path, content)
        .map_err(|e| FiarError::io(format!("writing {}", path.display()), e))
}

/// Write the report plus curve CSVs into `dir`.
pub fn write_report_artifacts(
    dir: impl AsRef<Path>,
    report: &EvaluationReport,
    y_true: &[u8],
    probas: &[f64],
) -> CrateResult<ReportArtifacts> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)
        .map_err(|e| FiarError::io(format!("creating {}", dir.display()), e))?;

    let artifacts = ReportArtifacts {
        report_json: dir.join("report.json"),
        report_md: dir.join("report.md"),
        notes: dir.join("notes.txt"),
        roc_csv: dir.join("roc_curve.csv"),
        pr_csv: dir.join("pr_curve.csv"),
    };

    save_json(&artifacts.report_json, report)?;
    write_text(&artifacts.report_md, &report.to_markdown())?;
    write_text(&artifacts.notes, &report.notes())?;

    let roc = roc_curve(y_true, probas)
        .map_err(|e| FiarError::serialization(format!("roc curve: {e}")))?;
    let mut writer = csv::Writer::from_path(&artifacts.roc_csv)
        .map_err(|e| FiarError::serialization(e.to_string()))?;
    writer
        .write_record(["fpr", "tpr", "threshold"])
        .map_err(|e| FiarError::serialization(e.to_string()))?;
    for point in roc {
        writer
            .write_record([
                point.fpr.to_string(),
                point.tpr.to_string(),
                point.threshold.to_string(),
            ])
            .map_err(|e| FiarError::serialization(e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| FiarError::io("flushing roc_curve.csv".to_string(), e))?;

    let pr = pr_curve(y_true, probas)
        .map_err(|e| FiarError::serialization(format!("pr curve: {e}")))?;
    let mut writer = csv::Writer::from_path(&artifacts.pr_csv)
        .map_err(|e| FiarError::serialization(e.to_string()))?;
    writer
        .write_record(["recall", "precision", "threshold"])
        .map_err(|e| FiarError::serialization(e.to_string()))?;
    for point in pr {
        writer
            .write_record([
                point.recall.to_string(),
                point.precision.to_string(),
                point.threshold.to_string(),
            ])
            .map_err(|e| FiarError::serialization(e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| FiarError::io("flushing pr_curve.csv".to_string(), e))?;

    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<u8>, Vec<f64>) {
        let y = vec![0, 0, 0, 1, 0, 1, 1, 1];
        let p = vec![0.1, 0.3, 0.35, 0.4, 0.32, 0.6, 0.7, 0.9];
        (y, p)
    }

    #[test]
    fn test_evaluate_model_applies_fbeta_threshold() {
        let (y, p) = sample();
        let report =
            evaluate_model("credit-default-model", "gradient_boost", &y, &p, &EvalOptions::default())
                .expect("evaluate");

        assert_eq!(report.threshold, report.fbeta_threshold);
        assert_eq!(report.threshold_source, "fbeta(1)");
        assert_eq!(report.n_samples, 8);
        // Threshold in (0.35, 0.4] classifies everything correctly here
        assert_eq!(report.confusion, [[4, 0], [0, 4]]);
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.f1, 1.0);
        assert!((report.roc_auc - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_report_markdown_and_notes() {
        let (y, p) = sample();
        let report =
            evaluate_model("m", "random_forest", &y, &p, &EvalOptions::default()).expect("evaluate");

        let md = report.to_markdown();
        assert!(md.contains("| Accuracy |"));
        assert!(md.contains("random_forest"));

        let notes = report.notes();
        assert!(notes.contains("Model limitations"));
        assert!(notes.contains("Threshold optimized for"));
    }

    #[test]
    fn test_write_report_artifacts() {
        let (y, p) = sample();
        let report =
            evaluate_model("m", "gradient_boost", &y, &p, &EvalOptions::default()).expect("evaluate");

        let dir = tempfile::tempdir().expect("tempdir");
        let artifacts =
            write_report_artifacts(dir.path(), &report, &y, &p).expect("write artifacts");

        for path in artifacts.all() {
            assert!(path.exists(), "{} missing", path.display());
        }

        let roc = std::fs::read_to_string(&artifacts.roc_csv).expect("read roc");
        assert!(roc.starts_with("fpr,tpr,threshold"));
        let json = std::fs::read_to_string(&artifacts.report_json).expect("read json");
        assert!(json.contains("\"roc_auc\""));
    }

    #[test]
    fn test_report_serde_roundtrip() {
        let (y, p) = sample();
        let report =
            evaluate_model("m", "gradient_boost", &y, &p, &EvalOptions::default()).expect("evaluate");
        let json = serde_json::to_string(&report).expect("serialize");
        let parsed: EvaluationReport = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, report);
    }
}
