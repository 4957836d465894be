//! Small dense linear algebra helpers
//!
//! The systems solved here are tiny (a handful of ARIMA coefficients, a few
//! dozen trend/seasonality weights), so plain Gaussian elimination is enough.

use algorithm_spi::{Result, TsError};

const PIVOT_EPSILON: f64 = 1e-12;

/// Solve `a * x = b` by Gaussian elimination with partial pivoting
///
/// `a` is row-major and must be square with the same dimension as `b`.
pub fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(TsError::NumericalError(format!(
            "system is not {n}x{n}"
        )));
    }

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < PIVOT_EPSILON {
            return Err(TsError::NumericalError(
                "Singular matrix in least squares".to_string(),
            ));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }

    if x.iter().any(|v| !v.is_finite()) {
        return Err(TsError::NumericalError(
            "least squares produced non-finite coefficients".to_string(),
        ));
    }
    Ok(x)
}

/// Minimise `||X·β − y||² + Σ penalty[j]·β[j]²`
///
/// A zero penalty gives ordinary least squares for that column.
pub fn penalized_least_squares(
    design: &[Vec<f64>],
    target: &[f64],
    penalty: &[f64],
) -> Result<Vec<f64>> {
    let k = penalty.len();
    if design.len() != target.len() {
        return Err(TsError::NumericalError(format!(
            "design has {} rows but target has {}",
            design.len(),
            target.len()
        )));
    }
    if design.iter().any(|row| row.len() != k) {
        return Err(TsError::NumericalError(format!(
            "design rows must have {k} columns"
        )));
    }

    let mut gram = vec![vec![0.0; k]; k];
    let mut moment = vec![0.0; k];
    for (row, &y) in design.iter().zip(target) {
        for i in 0..k {
            moment[i] += row[i] * y;
            for j in i..k {
                gram[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..k {
        gram[i][i] += penalty[i];
        for j in 0..i {
            gram[i][j] = gram[j][i];
        }
    }

    solve(gram, moment)
}

/// Dot product of two equally sized slices
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
