//! Engineered features
//!
//! Aggregates over the six monthly bill/payment columns plus repayment-delay
//! flags. Added columns, in order: `avg_bill_amt`, `avg_pay_amt`,
//! `pay_ratio`, `recent_default_flag`, `max_pay_delay`, `bill_trend_up`,
//! `pay_stability`.

use super::{DataError, Frame, Result};

/// Repayment-status columns; the source table has no `pay_1`.
const PAY_STATUS: [&str; 6] = ["pay_0", "pay_2", "pay_3", "pay_4", "pay_5", "pay_6"];

fn require_columns(frame: &Frame, names: &[String]) -> Result<Vec<Vec<f64>>> {
    names
        .iter()
        .map(|name| {
            frame
                .column(name)
                .ok_or_else(|| DataError::MissingColumn(name.clone()))
        })
        .collect()
}

fn row_mean(cols: &[Vec<f64>], row: usize) -> f64 {
    cols.iter().map(|c| c[row]).sum::<f64>() / cols.len() as f64
}

fn row_max(cols: &[Vec<f64>], row: usize) -> f64 {
    cols.iter().map(|c| c[row]).fold(f64::NEG_INFINITY, f64::max)
}

/// Sample standard deviation (n-1 denominator) of one row across columns.
fn row_std(cols: &[Vec<f64>], row: usize) -> f64 {
    let n = cols.len() as f64;
    if n < 2.0 {
        return 0.0;
    }
    let mean = row_mean(cols, row);
    let ss: f64 = cols.iter().map(|c| (c[row] - mean).powi(2)).sum();
    let std = (ss / (n - 1.0)).sqrt();
    if std.is_finite() {
        std
    } else {
        0.0
    }
}

/// Add the engineered columns to a cleaned frame.
pub fn engineer_features(frame: &mut Frame) -> Result<()> {
    let bill_names: Vec<String> = (1..=6).map(|i| format!("bill_amt{i}")).collect();
    let pay_amt_names: Vec<String> = (1..=6).map(|i| format!("pay_amt{i}")).collect();
    let pay_status_names: Vec<String> = PAY_STATUS.iter().map(|s| s.to_string()).collect();

    let bills = require_columns(frame, &bill_names)?;
    let pay_amts = require_columns(frame, &pay_amt_names)?;
    let pay_status = require_columns(frame, &pay_status_names)?;

    let n = frame.n_rows();
    let mut avg_bill = Vec::with_capacity(n);
    let mut avg_pay = Vec::with_capacity(n);
    let mut pay_ratio = Vec::with_capacity(n);
    let mut recent_default = Vec::with_capacity(n);
    let mut max_delay = Vec::with_capacity(n);
    let mut bill_trend = Vec::with_capacity(n);
    let mut pay_stability = Vec::with_capacity(n);

    for row in 0..n {
        let bill_mean = row_mean(&bills, row);
        let pay_mean = row_mean(&pay_amts, row);
        let ratio = pay_mean / bill_mean;

        avg_bill.push(bill_mean);
        avg_pay.push(pay_mean);
        pay_ratio.push(if ratio.is_finite() { ratio } else { 0.0 });
        recent_default.push(if pay_status[0][row] >= 1.0 { 1.0 } else { 0.0 });
        max_delay.push(row_max(&pay_status, row));
        bill_trend.push(if bills[5][row] > bills[0][row] { 1.0 } else { 0.0 });
        pay_stability.push(row_std(&pay_amts, row));
    }

    frame.add_column("avg_bill_amt", avg_bill)?;
    frame.add_column("avg_pay_amt", avg_pay)?;
    frame.add_column("pay_ratio", pay_ratio)?;
    frame.add_column("recent_default_flag", recent_default)?;
    frame.add_column("max_pay_delay", max_delay)?;
    frame.add_column("bill_trend_up", bill_trend)?;
    frame.add_column("pay_stability", pay_stability)?;
    Ok(())
}
