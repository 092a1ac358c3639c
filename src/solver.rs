//! Gaussian elimination for the traffic balance equations.
//!
//! The solver works on an augmented matrix (coefficients plus the
//! right-hand side as the final column) and performs forward
//! elimination without pivot selection, followed by back substitution.
//! The row update is division-free (`row' = row * pivot − pivotRow *
//! rowValue`), so nothing is divided until back substitution. This is
//! numerically fragile for ill-conditioned systems; the balance
//! equations the model feeds in are small and well scaled.
//!
//! A zero diagonal pivot during back substitution does not raise.
//! The solver returns a vector filled with NaN instead, signaling a
//! degenerate system as data; callers must check with
//! [`Vector::has_nan`](crate::numeric::Vector::has_nan).

use crate::error::{QnetError, Result};
use crate::numeric::{Matrix, Vector};

/// Solve `Ax = b`, concatenating the right-hand side onto the
/// coefficient matrix.
pub fn solve_system(a: &Matrix, b: &Vector) -> Result<Vector> {
    let mut augmented = a.clone();
    augmented.push_column(b)?;
    solve(augmented)
}

/// Solve the system held in an augmented matrix.
///
/// Preconditions: at least as many rows as unknowns (columns minus the
/// RHS), otherwise [`QnetError::Underdetermined`]. Excess trailing rows
/// are discarded; the system is treated as exactly determined by the
/// first `unknowns` rows.
pub fn solve(mut augmented: Matrix) -> Result<Vector> {
    let unknowns = augmented.col_count() - 1;
    if augmented.row_count() < unknowns {
        return Err(QnetError::Underdetermined {
            equations: augmented.row_count(),
            unknowns,
        });
    }
    augmented.truncate_rows(unknowns);

    let n = augmented.row_count();

    // Forward elimination, division-free.
    for base in 0..n.saturating_sub(1) {
        let base_row = augmented.row(base).clone();
        let pivot = base_row[base];
        for r in base + 1..n {
            let factor = augmented[(r, base)];
            if factor == 0.0 {
                continue;
            }
            let eliminated = augmented.row(r).scale(pivot).sub(&base_row.scale(factor));
            augmented.replace_row(r, eliminated)?;
        }
    }

    // Back substitution; a zero pivot yields an all-NaN result.
    let rhs = augmented.col_count() - 1;
    let mut result = Vector::zeros(n);
    for r in (0..n).rev() {
        let diagonal = augmented[(r, r)];
        if diagonal == 0.0 {
            return Ok(Vector::filled(n, f64::NAN));
        }

        let mut value = augmented[(r, rhs)];
        for c in r + 1..n {
            value -= augmented[(r, c)] * result[c];
        }
        result[r] = value / diagonal;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn matrix(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(rows.iter().map(|r| Vector::from(r.to_vec())).collect()).unwrap()
    }

    #[test]
    fn test_solve_well_conditioned() {
        // 2x + y = 5, x - y = 1  =>  x = 2, y = 1
        let a = matrix(&[&[2.0, 1.0], &[1.0, -1.0]]);
        let b = Vector::from(vec![5.0, 1.0]);
        let x = solve_system(&a, &b).unwrap();

        assert_relative_eq!(x[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_round_trip() {
        let a = matrix(&[&[4.0, -2.0, 1.0], &[1.0, 3.0, -1.0], &[2.0, 1.0, 5.0]]);
        let b = Vector::from(vec![7.0, 2.0, 10.0]);
        let x = solve_system(&a, &b).unwrap();

        // substitute back into A
        for r in 0..3 {
            let reproduced: f64 = (0..3).map(|c| a[(r, c)] * x[c]).sum();
            assert_relative_eq!(reproduced, b[r], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_singular_system_yields_nan() {
        // second row is a multiple of the first
        let a = matrix(&[&[1.0, 2.0], &[2.0, 4.0]]);
        let b = Vector::from(vec![3.0, 6.0]);
        let x = solve_system(&a, &b).unwrap();

        assert!(x.has_nan());
        assert!(x.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_underdetermined_rejected() {
        let augmented = matrix(&[&[1.0, 2.0, 3.0, 4.0]]);
        assert!(matches!(
            solve(augmented),
            Err(QnetError::Underdetermined {
                equations: 1,
                unknowns: 3
            })
        ));
    }

    #[test]
    fn test_excess_rows_discarded() {
        // third row is inconsistent but must be ignored
        let augmented = matrix(&[
            &[1.0, 0.0, 2.0],
            &[0.0, 1.0, 3.0],
            &[1.0, 1.0, 999.0],
        ]);
        let x = solve(augmented).unwrap();

        assert_relative_eq!(x[0], 2.0);
        assert_relative_eq!(x[1], 3.0);
    }
}
