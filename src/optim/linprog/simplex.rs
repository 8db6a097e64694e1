use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use num_traits::Float;

use crate::matrix::Matrix;
use crate::optim::Goal;
use crate::trace::Trace;

use super::tableau::Tableau;
use super::{ConstraintKind, LinearProgram, LpError, LpStatus, SimplexSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Minimizing the sum of artificial variables.
    One,
    /// Pivoting artificial variables out of the basis after Phase One.
    DriveOut,
    /// Optimizing the original objective.
    Two,
}

/// One pivot of the Simplex method.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRecord {
    pub phase: Phase,
    /// 1-based across all phases; drive-out pivots are numbered but do not
    /// count toward the budget.
    pub iteration: usize,
    pub entering: String,
    pub leaving: String,
    pub row: usize,
    pub col: usize,
    pub pivot: f64,
    /// Ratio per constraint row; `None` where the entry was not positive.
    pub ratios: Vec<Option<f64>>,
    /// Objective-row value after the pivot.
    pub objective: f64,
}

#[derive(Debug, Clone)]
pub struct SimplexSolution {
    pub status: LpStatus,
    /// Decision variables at the final basic solution.
    pub x: Vec<f64>,
    /// Objective value in the caller's sense (minimum or maximum).
    pub objective: f64,
    /// Budgeted pivots performed (Phase One and Phase Two).
    pub iterations: usize,
    pub tableau: Tableau,
    pub trace: Trace<PivotRecord>,
}

enum PhaseEnd {
    Optimal,
    Unbounded,
    Exhausted,
}

struct Run<'a> {
    tableau: Tableau,
    settings: &'a SimplexSettings,
    iterations: usize,
    trace: Trace<PivotRecord>,
}

impl Run<'_> {
    fn pivot(&mut self, phase: Phase, row: usize, col: usize, ratios: Vec<Option<f64>>) {
        let t = &self.tableau;
        let entering = t.headers()[col].clone();
        let leaving = t.headers()[t.basis()[row]].clone();
        let pivot = t.matrix()[(row, col)];
        self.tableau.pivot(row, col);
        log::trace!("simplex {phase:?}: {entering} enters, {leaving} leaves (pivot {pivot})");
        self.trace.push(PivotRecord {
            phase,
            iteration: self.trace.len() + 1,
            entering,
            leaving,
            row,
            col,
            pivot,
            ratios,
            objective: self.tableau.objective_value(),
        });
    }

    fn optimize(&mut self, phase: Phase) -> PhaseEnd {
        let eps = self.settings.eps;
        loop {
            let Some(col) = self.tableau.entering(eps) else {
                return PhaseEnd::Optimal;
            };
            if self.iterations >= self.settings.max_iter {
                return PhaseEnd::Exhausted;
            }
            let (row, ratios) = self.tableau.ratio_test(col, eps);
            let Some(row) = row else {
                log::debug!("simplex {phase:?}: column {col} unbounded");
                return PhaseEnd::Unbounded;
            };
            self.pivot(phase, row, col, ratios);
            self.iterations += 1;
        }
    }

    /// Pivots basic artificial columns out, dropping rows where that is
    /// impossible, then removes the artificial columns.
    fn drive_out(&mut self, first_artificial: usize) {
        let eps = self.settings.eps;
        let mut row = 0;
        while row < self.tableau.num_constraints() {
            if self.tableau.basis()[row] < first_artificial {
                row += 1;
                continue;
            }
            let replacement =
                (0..first_artificial).find(|&c| Float::abs(self.tableau.matrix()[(row, c)]) > eps);
            match replacement {
                Some(col) => {
                    self.pivot(Phase::DriveOut, row, col, Vec::new());
                    row += 1;
                }
                None => {
                    log::debug!("simplex: dropping redundant constraint row {row}");
                    self.tableau.drop_row(row);
                }
            }
        }
        let artificial: Vec<usize> = (first_artificial..self.tableau.num_columns()).collect();
        self.tableau.drop_columns(&artificial);
    }

    fn finish(self, status: LpStatus, goal: Goal, n: usize) -> SimplexSolution {
        let values = self.tableau.basic_solution();
        let z = self.tableau.objective_value();
        let objective = match (status, goal) {
            (LpStatus::Infeasible, _) => f64::NAN,
            (_, Goal::Maximize) => z,
            (_, Goal::Minimize) => -z,
        };
        SimplexSolution {
            status,
            x: values[..n].to_vec(),
            objective,
            iterations: self.iterations,
            tableau: self.tableau,
            trace: self.trace,
        }
    }
}

/// Builds the initial tableau. Columns: decision variables, then one slack
/// or surplus per inequality, then one artificial per `≥`/`=` row.
fn initial_tableau(lp: &LinearProgram) -> (Tableau, usize) {
    let n = lp.num_vars();
    let rows: Vec<_> = lp.constraints.iter().map(|c| c.normalized()).collect();
    let m = rows.len();
    let n_slack = rows.iter().filter(|c| c.kind != ConstraintKind::Equal).count();
    let n_art = rows.iter().filter(|c| c.kind != ConstraintKind::LessEq).count();
    let first_artificial = n + n_slack;
    let width = first_artificial + n_art;

    let mut headers: Vec<String> = (1..=n).map(|j| format!("x{j}")).collect();
    let mut table = Matrix::zeros(m + 1, width + 1);
    let mut basis = Vec::with_capacity(m);
    let (mut slack, mut art) = (n, first_artificial);
    let mut art_headers = Vec::new();

    for (i, c) in rows.iter().enumerate() {
        for (j, &a) in c.coefficients.iter().enumerate() {
            table[(i, j)] = a;
        }
        table[(i, width)] = c.rhs;
        match c.kind {
            ConstraintKind::LessEq => {
                table[(i, slack)] = 1.0;
                headers.push(format!("s{}", i + 1));
                basis.push(slack);
                slack += 1;
            }
            ConstraintKind::GreaterEq => {
                table[(i, slack)] = -1.0;
                headers.push(format!("e{}", i + 1));
                slack += 1;
                table[(i, art)] = 1.0;
                art_headers.push(format!("a{}", i + 1));
                basis.push(art);
                art += 1;
            }
            ConstraintKind::Equal => {
                table[(i, art)] = 1.0;
                art_headers.push(format!("a{}", i + 1));
                basis.push(art);
                art += 1;
            }
        }
    }
    headers.extend(art_headers);
    (Tableau::new(table, headers, basis), first_artificial)
}

/// Solve a linear program with the two-phase Simplex method.
///
/// Phase One runs only when some constraint needs an artificial variable
/// (`≥`, `=`, or `≤` with a negative right-hand side). All variables are
/// non-negative.
///
/// Pivoting uses the most negative reduced cost (first column on ties) and
/// the minimum ratio test (first row on ties). `max_iter` bounds the pivots
/// of both phases together.
///
/// Infeasible, unbounded and budget-exhausted problems are reported through
/// [`SimplexSolution::status`], not as errors.
///
/// # Errors
///
/// [`LpError`] if the problem is structurally malformed.
pub fn simplex(lp: &LinearProgram, settings: &SimplexSettings) -> Result<SimplexSolution, LpError> {
    lp.validate()?;
    let n = lp.num_vars();
    let (tableau, first_artificial) = initial_tableau(lp);
    let has_artificials = first_artificial < tableau.num_columns();
    let mut run = Run {
        tableau,
        settings,
        iterations: 0,
        trace: Trace::new(),
    };

    if has_artificials {
        let phase_one: Vec<f64> = (0..run.tableau.num_columns())
            .map(|j| if j >= first_artificial { -1.0 } else { 0.0 })
            .collect();
        run.tableau.set_objective(&phase_one);
        match run.optimize(Phase::One) {
            PhaseEnd::Optimal => {}
            PhaseEnd::Unbounded => return Ok(run.finish(LpStatus::Unbounded, lp.goal, n)),
            PhaseEnd::Exhausted => {
                log::warn!("simplex: iteration budget exhausted in phase one");
                return Ok(run.finish(LpStatus::MaxIterationsExceeded, lp.goal, n));
            }
        }
        let w = -run.tableau.objective_value();
        if w > settings.eps {
            log::debug!("simplex: infeasible, artificial sum {w}");
            return Ok(run.finish(LpStatus::Infeasible, lp.goal, n));
        }
        run.drive_out(first_artificial);
    }

    let c: Vec<f64> = match lp.goal {
        Goal::Maximize => lp.objective.clone(),
        Goal::Minimize => lp.objective.iter().map(|&v| -v).collect(),
    };
    run.tableau.set_objective(&c);
    let status = match run.optimize(Phase::Two) {
        PhaseEnd::Optimal => LpStatus::Optimal,
        PhaseEnd::Unbounded => LpStatus::Unbounded,
        PhaseEnd::Exhausted => {
            log::warn!("simplex: iteration budget exhausted in phase two");
            LpStatus::MaxIterationsExceeded
        }
    };
    Ok(run.finish(status, lp.goal, n))
}
