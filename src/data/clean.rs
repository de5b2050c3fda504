//! Dataset cleaning rules
//!
//! The raw credit-clients table codes missing `education` and `marriage`
//! values as 0. Cleaning drops the row id, reinterprets those zeros as
//! missing, and removes the affected rows.

use super::{DataError, Frame, Result};

/// Columns whose zero values mean "missing".
const ZERO_AS_MISSING: [&str; 2] = ["education", "marriage"];

/// Clean the raw frame in place.
///
/// Drops the `id` column if present and removes every row with a zero in
/// `education` or `marriage`. Fails if nothing survives.
pub fn clean(frame: &mut Frame) -> Result<()> {
    frame.drop_column("id");

    let missing_cols: Vec<usize> = ZERO_AS_MISSING
        .iter()
        .filter_map(|name| frame.column_index(name))
        .collect();

    if !missing_cols.is_empty() {
        frame.retain_rows(|row| missing_cols.iter().all(|&idx| row[idx] != 0.0));
    }

    if frame.n_rows() == 0 {
        return Err(DataError::EmptyFrame);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_frame() -> Frame {
        Frame::new(
            vec![
                "id".to_string(),
                "education".to_string(),
                "marriage".to_string(),
                "limit_bal".to_string(),
            ],
            vec![
                vec![1.0, 2.0, 1.0, 20000.0],
                vec![2.0, 0.0, 1.0, 30000.0],
                vec![3.0, 1.0, 0.0, 40000.0],
                vec![4.0, 3.0, 2.0, 50000.0],
            ],
        )
        .expect("valid frame")
    }

    #[test]
    fn test_clean_drops_id_and_zero_rows() {
        let mut f = raw_frame();
        clean(&mut f).expect("clean");
        assert!(f.column_index("id").is_none());
        assert_eq!(f.n_rows(), 2);
        assert_eq!(f.column("limit_bal"), Some(vec![20000.0, 50000.0]));
    }

    #[test]
    fn test_clean_without_categorical_columns() {
        let mut f = Frame::new(
            vec!["limit_bal".to_string()],
            vec![vec![1.0], vec![2.0]],
        )
        .expect("valid frame");
        clean(&mut f).expect("clean");
        assert_eq!(f.n_rows(), 2);
    }

    #[test]
    fn test_clean_empty_result_is_error() {
        let mut f = Frame::new(
            vec!["education".to_string(), "marriage".to_string()],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
        )
        .expect("valid frame");
        let result = clean(&mut f);
        assert!(matches!(result, Err(DataError::EmptyFrame)));
    }
}
