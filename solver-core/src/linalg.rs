//! Dense linear-algebra helpers.

use nalgebra::DMatrix;

use crate::error::{SolverError, SolverResult};
use crate::settings::EPS_PIVOT;

/// Invert a square matrix by Gauss-Jordan elimination with partial pivoting.
///
/// Fails with [`SolverError::SingularBasis`] when the largest available
/// pivot magnitude drops below [`EPS_PIVOT`].
pub fn invert(mat: &DMatrix<f64>) -> SolverResult<DMatrix<f64>> {
    let n = mat.nrows();
    debug_assert_eq!(n, mat.ncols(), "invert expects a square matrix");

    let mut work = mat.clone();
    let mut inv = DMatrix::<f64>::identity(n, n);

    for col in 0..n {
        // Partial pivoting: largest magnitude at or below the diagonal.
        let mut pivot_row = col;
        let mut best = work[(col, col)].abs();
        for row in (col + 1)..n {
            let mag = work[(row, col)].abs();
            if mag > best {
                best = mag;
                pivot_row = row;
            }
        }
        if best < EPS_PIVOT {
            return Err(SolverError::SingularBasis);
        }
        if pivot_row != col {
            work.swap_rows(col, pivot_row);
            inv.swap_rows(col, pivot_row);
        }

        let pivot = work[(col, col)];
        for j in 0..n {
            work[(col, j)] /= pivot;
            inv[(col, j)] /= pivot;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = work[(row, col)];
            if factor.abs() <= EPS_PIVOT {
                continue;
            }
            for j in 0..n {
                work[(row, j)] -= factor * work[(col, j)];
                inv[(row, j)] -= factor * inv[(col, j)];
            }
        }
    }

    Ok(inv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_invert_identity() {
        let eye = DMatrix::<f64>::identity(3, 3);
        let inv = invert(&eye).unwrap();
        assert_relative_eq!(inv, eye, epsilon = 1e-12);
    }

    #[test]
    fn test_invert_known_matrix() {
        let mat = DMatrix::from_row_slice(2, 2, &[4.0, 7.0, 2.0, 6.0]);
        let inv = invert(&mat).unwrap();
        let expected = DMatrix::from_row_slice(2, 2, &[0.6, -0.7, -0.2, 0.4]);
        assert_relative_eq!(inv, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_invert_requires_row_swap() {
        // Zero on the diagonal forces partial pivoting to reorder rows.
        let mat = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        let inv = invert(&mat).unwrap();
        assert_relative_eq!(inv, mat, epsilon = 1e-12);
    }

    #[test]
    fn test_invert_singular() {
        let mat = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        assert!(matches!(invert(&mat), Err(SolverError::SingularBasis)));
    }
}
