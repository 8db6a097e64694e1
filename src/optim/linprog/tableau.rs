use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::matrix::Matrix;

/// Simplex tableau: one row per constraint plus the objective row (last),
/// one column per variable plus the right-hand side (last).
///
/// The objective row stores reduced costs in maximization form, so optimality
/// means no entry below zero, and its right-hand side is the current
/// objective value.
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    rows: Matrix<f64>,
    headers: Vec<String>,
    basis: Vec<usize>,
}

impl Tableau {
    pub(crate) fn new(rows: Matrix<f64>, headers: Vec<String>, basis: Vec<usize>) -> Self {
        debug_assert_eq!(rows.ncols(), headers.len() + 1);
        debug_assert_eq!(rows.nrows(), basis.len() + 1);
        Self {
            rows,
            headers,
            basis,
        }
    }

    pub fn matrix(&self) -> &Matrix<f64> {
        &self.rows
    }

    /// Variable names, one per non-RHS column.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Basic column of each constraint row.
    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    pub fn num_constraints(&self) -> usize {
        self.basis.len()
    }

    pub fn num_columns(&self) -> usize {
        self.headers.len()
    }

    fn obj(&self) -> usize {
        self.basis.len()
    }

    fn rhs_col(&self) -> usize {
        self.headers.len()
    }

    pub fn rhs(&self, row: usize) -> f64 {
        self.rows[(row, self.rhs_col())]
    }

    pub fn reduced_cost(&self, col: usize) -> f64 {
        self.rows[(self.obj(), col)]
    }

    pub fn objective_value(&self) -> f64 {
        self.rhs(self.obj())
    }

    /// Value of every column variable in the current basic solution.
    pub fn basic_solution(&self) -> Vec<f64> {
        let mut values = vec![0.0; self.num_columns()];
        for (row, &col) in self.basis.iter().enumerate() {
            values[col] = self.rhs(row);
        }
        values
    }

    /// Column with the most negative reduced cost below `-eps`; first wins on ties.
    pub(crate) fn entering(&self, eps: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for col in 0..self.num_columns() {
            let c = self.reduced_cost(col);
            if c < -eps && best.map_or(true, |(_, b)| c < b) {
                best = Some((col, c));
            }
        }
        best.map(|(col, _)| col)
    }

    /// Minimum ratio test on `col`.
    ///
    /// Only entries above `eps` take part; the first strict minimum wins.
    /// Returns the leaving row (if any) and the ratio of every row.
    pub(crate) fn ratio_test(&self, col: usize, eps: f64) -> (Option<usize>, Vec<Option<f64>>) {
        let ratios: Vec<Option<f64>> = (0..self.num_constraints())
            .map(|row| {
                let a = self.rows[(row, col)];
                (a > eps).then(|| self.rhs(row) / a)
            })
            .collect();
        let mut leaving: Option<(usize, f64)> = None;
        for (row, ratio) in ratios.iter().enumerate() {
            if let Some(r) = *ratio {
                if leaving.map_or(true, |(_, best)| r < best) {
                    leaving = Some((row, r));
                }
            }
        }
        (leaving.map(|(row, _)| row), ratios)
    }

    /// Gauss-Jordan pivot on `(row, col)`; `col` becomes basic in `row`.
    pub(crate) fn pivot(&mut self, row: usize, col: usize) {
        let width = self.rows.ncols();
        let p = self.rows[(row, col)];
        for x in self.rows.row_mut(row) {
            *x /= p;
        }
        for i in 0..self.rows.nrows() {
            let factor = self.rows[(i, col)];
            if i == row || factor == 0.0 {
                continue;
            }
            for j in 0..width {
                let delta = factor * self.rows[(row, j)];
                self.rows[(i, j)] -= delta;
            }
        }
        self.basis[row] = col;
    }

    /// Replace the objective row with `-c` (maximization form) and price out
    /// the current basis so basic columns have zero reduced cost.
    pub(crate) fn set_objective(&mut self, c: &[f64]) {
        let obj = self.obj();
        for j in 0..self.rows.ncols() {
            self.rows[(obj, j)] = -c.get(j).copied().unwrap_or(0.0);
        }
        for row in 0..self.num_constraints() {
            let col = self.basis[row];
            let coef = self.rows[(obj, col)];
            if coef == 0.0 {
                continue;
            }
            for j in 0..self.rows.ncols() {
                let delta = coef * self.rows[(row, j)];
                self.rows[(obj, j)] -= delta;
            }
        }
    }

    /// Remove the listed columns, none of which may be basic.
    pub(crate) fn drop_columns(&mut self, cols: &[usize]) {
        debug_assert!(self.basis.iter().all(|b| !cols.contains(b)));
        self.rows = self.rows.without_columns(cols);
        self.headers = self
            .headers
            .iter()
            .enumerate()
            .filter(|(j, _)| !cols.contains(j))
            .map(|(_, h)| h.clone())
            .collect();
        for b in &mut self.basis {
            *b -= cols.iter().filter(|&&c| c < *b).count();
        }
    }

    pub(crate) fn drop_row(&mut self, row: usize) {
        self.rows = self.rows.without_row(row);
        self.basis.remove(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn small() -> Tableau {
        // max x + y, x + y <= 4, x <= 3
        let rows = Matrix::from_rows(&[
            [1.0, 1.0, 1.0, 0.0, 4.0],
            [1.0, 0.0, 0.0, 1.0, 3.0],
            [-1.0, -1.0, 0.0, 0.0, 0.0],
        ]);
        let headers = ["x1", "x2", "s1", "s2"].iter().map(|s| s.to_string()).collect();
        Tableau::new(rows, headers, vec![2, 3])
    }

    #[test]
    fn entering_prefers_first_on_ties() {
        assert_eq!(small().entering(1e-9), Some(0));
    }

    #[test]
    fn ratio_test_skips_nonpositive() {
        let t = small();
        let (row, ratios) = t.ratio_test(1, 1e-9);
        assert_eq!(row, Some(0));
        assert_eq!(ratios, vec![Some(4.0), None]);
        let (row, _) = t.ratio_test(0, 1e-9);
        assert_eq!(row, Some(1));
    }

    #[test]
    fn pivot_updates_basis_and_objective() {
        let mut t = small();
        t.pivot(1, 0);
        assert_eq!(t.basis(), &[2, 0]);
        assert_eq!(t.objective_value(), 3.0);
        assert_eq!(t.basic_solution(), vec![3.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn drop_columns_remaps_basis() {
        let mut t = small();
        t.pivot(0, 1);
        t.pivot(1, 0);
        t.drop_columns(&[2]);
        assert_eq!(t.headers(), &["x1", "x2", "s2"]);
        assert_eq!(t.basis(), &[1, 0]);
        assert_eq!(t.matrix().ncols(), 4);
    }
}
