//! Dense `f64` matrix with structural edit operations.

use std::fmt;
use std::ops::{Index, IndexMut};

use super::Vector;
use crate::error::{QnetError, Result};

/// A dense row-major matrix of `f64` values.
///
/// Structural edits validate the inserted row/column length against the
/// opposite dimension and fail with [`QnetError::Shape`] on mismatch.
/// `Clone` produces a fully independent deep copy; every algorithm in
/// the crate mutates a cloned working copy, never a caller's matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: Vec<Vector>,
    cols: usize,
}

impl Matrix {
    /// Create a zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(QnetError::Dimension { rows, cols });
        }
        Ok(Self {
            rows: (0..rows).map(|_| Vector::zeros(cols)).collect(),
            cols,
        })
    }

    /// Build a matrix from rows, which must all share one length.
    pub fn from_rows(rows: Vec<Vector>) -> Result<Self> {
        let cols = rows.first().map(Vector::len).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(QnetError::Dimension {
                rows: rows.len(),
                cols,
            });
        }
        for row in &rows {
            if row.len() != cols {
                return Err(QnetError::shape("matrix row", cols, row.len()));
            }
        }
        Ok(Self { rows, cols })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.cols
    }

    pub fn row(&self, index: usize) -> &Vector {
        &self.rows[index]
    }

    pub fn iter_rows(&self) -> std::slice::Iter<'_, Vector> {
        self.rows.iter()
    }

    /// Extract a column as a new vector.
    pub fn column(&self, index: usize) -> Result<Vector> {
        self.check_col(index)?;
        Ok(self.rows.iter().map(|row| row[index]).collect())
    }

    /// Append a row.
    pub fn push_row(&mut self, row: Vector) -> Result<()> {
        self.check_row_len(&row)?;
        self.rows.push(row);
        Ok(())
    }

    /// Insert a row at `index`, shifting later rows down.
    pub fn insert_row(&mut self, index: usize, row: Vector) -> Result<()> {
        if index > self.row_count() {
            return Err(QnetError::index("insert_row", index, self.row_count() + 1));
        }
        self.check_row_len(&row)?;
        self.rows.insert(index, row);
        Ok(())
    }

    /// Remove the row at `index`.
    pub fn remove_row(&mut self, index: usize) -> Result<()> {
        self.check_row(index)?;
        self.rows.remove(index);
        Ok(())
    }

    /// Replace the row at `index`.
    pub fn replace_row(&mut self, index: usize, row: Vector) -> Result<()> {
        self.check_row(index)?;
        self.check_row_len(&row)?;
        self.rows[index] = row;
        Ok(())
    }

    /// Drop every row past the first `keep`.
    pub fn truncate_rows(&mut self, keep: usize) {
        self.rows.truncate(keep);
    }

    /// Append a column.
    pub fn push_column(&mut self, column: &Vector) -> Result<()> {
        self.check_col_len(column)?;
        for (row, &value) in self.rows.iter_mut().zip(column.iter()) {
            row.push(value);
        }
        self.cols += 1;
        Ok(())
    }

    /// Insert a column at `index`, shifting later columns right.
    pub fn insert_column(&mut self, index: usize, column: &Vector) -> Result<()> {
        if index > self.cols {
            return Err(QnetError::index("insert_column", index, self.cols + 1));
        }
        self.check_col_len(column)?;
        for (row, &value) in self.rows.iter_mut().zip(column.iter()) {
            row.insert(index, value);
        }
        self.cols += 1;
        Ok(())
    }

    /// Remove the column at `index`.
    pub fn remove_column(&mut self, index: usize) -> Result<()> {
        self.check_col(index)?;
        for row in &mut self.rows {
            row.remove(index);
        }
        self.cols -= 1;
        Ok(())
    }

    /// Replace the column at `index`.
    pub fn replace_column(&mut self, index: usize, column: &Vector) -> Result<()> {
        self.check_col(index)?;
        self.check_col_len(column)?;
        for (row, &value) in self.rows.iter_mut().zip(column.iter()) {
            row[index] = value;
        }
        Ok(())
    }

    /// Transpose in place, swapping row and column counts.
    pub fn transpose(&mut self) {
        let rows = self.row_count();
        let mut transposed = Vec::with_capacity(self.cols);
        for c in 0..self.cols {
            transposed.push(self.rows.iter().map(|row| row[c]).collect());
        }
        self.rows = transposed;
        self.cols = rows;
    }

    /// Set every element on the main diagonal to `value`.
    pub fn set_diagonal(&mut self, value: f64) {
        let n = self.row_count().min(self.cols);
        for i in 0..n {
            self.rows[i][i] = value;
        }
    }

    fn check_row(&self, index: usize) -> Result<()> {
        if index < self.row_count() {
            Ok(())
        } else {
            Err(QnetError::index("matrix row", index, self.row_count()))
        }
    }

    fn check_col(&self, index: usize) -> Result<()> {
        if index < self.cols {
            Ok(())
        } else {
            Err(QnetError::index("matrix column", index, self.cols))
        }
    }

    fn check_row_len(&self, row: &Vector) -> Result<()> {
        if row.len() == self.cols {
            Ok(())
        } else {
            Err(QnetError::shape("matrix row", self.cols, row.len()))
        }
    }

    fn check_col_len(&self, column: &Vector) -> Result<()> {
        if column.len() == self.row_count() {
            Ok(())
        } else {
            Err(QnetError::shape(
                "matrix column",
                self.row_count(),
                column.len(),
            ))
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.rows[row][col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.rows[row][col]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Matrix {
        Matrix::from_rows(vec![
            Vector::from(vec![1.0, 2.0]),
            Vector::from(vec![3.0, 4.0]),
            Vector::from(vec![5.0, 6.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_construction_rejects_empty() {
        assert!(matches!(
            Matrix::zeros(0, 3),
            Err(QnetError::Dimension { .. })
        ));
        assert!(matches!(
            Matrix::zeros(3, 0),
            Err(QnetError::Dimension { .. })
        ));
        assert!(matches!(
            Matrix::from_rows(vec![]),
            Err(QnetError::Dimension { .. })
        ));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let result = Matrix::from_rows(vec![
            Vector::from(vec![1.0, 2.0]),
            Vector::from(vec![3.0]),
        ]);
        assert!(matches!(result, Err(QnetError::Shape { .. })));
    }

    #[test]
    fn test_row_ops() {
        let mut m = sample();
        m.insert_row(1, Vector::from(vec![9.0, 9.0])).unwrap();
        assert_eq!(m.row_count(), 4);
        assert_relative_eq!(m[(1, 0)], 9.0);

        m.remove_row(1).unwrap();
        assert_eq!(m, sample());

        m.replace_row(0, Vector::from(vec![7.0, 8.0])).unwrap();
        assert_relative_eq!(m[(0, 1)], 8.0);

        // wrong length rejected
        assert!(m.push_row(Vector::zeros(3)).is_err());
    }

    #[test]
    fn test_column_ops() {
        let mut m = sample();
        let col = m.column(1).unwrap();
        assert_eq!(col, Vector::from(vec![2.0, 4.0, 6.0]));

        m.push_column(&col.negate()).unwrap();
        assert_eq!(m.col_count(), 3);
        assert_relative_eq!(m[(2, 2)], -6.0);

        m.remove_column(2).unwrap();
        assert_eq!(m, sample());

        m.insert_column(0, &Vector::zeros(3)).unwrap();
        assert_relative_eq!(m[(0, 0)], 0.0);
        assert_relative_eq!(m[(0, 1)], 1.0);

        // wrong length rejected
        assert!(m.push_column(&Vector::zeros(2)).is_err());
    }

    #[test]
    fn test_transpose_swaps_counts() {
        let mut m = sample();
        m.transpose();
        assert_eq!(m.row_count(), 2);
        assert_eq!(m.col_count(), 3);
        assert_relative_eq!(m[(0, 2)], 5.0);
        assert_relative_eq!(m[(1, 0)], 2.0);
    }

    #[test]
    fn test_clone_is_independent() {
        let m = sample();
        let mut copy = m.clone();
        copy[(0, 0)] = 99.0;
        copy.remove_row(2).unwrap();
        assert_relative_eq!(m[(0, 0)], 1.0);
        assert_eq!(m.row_count(), 3);
    }

    #[test]
    fn test_set_diagonal() {
        let mut m = sample();
        m.set_diagonal(-1.0);
        assert_relative_eq!(m[(0, 0)], -1.0);
        assert_relative_eq!(m[(1, 1)], -1.0);
        // off-diagonal untouched
        assert_relative_eq!(m[(2, 0)], 5.0);
    }
}
