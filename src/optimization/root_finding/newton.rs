//! Damped Newton iteration for square residual systems.
//!
//! Each iteration builds a finite-difference Jacobian, solves
//! `J · Δx = −F(x)` with an LU factorization, and backtracks along `Δx`
//! (halving the step) until the Euclidean residual norm decreases by an
//! Armijo margin. Trial points at which the system itself fails are
//! treated like insufficient decrease, which keeps iterates inside the
//! region where `F` is defined.
use std::cell::Cell;

use nalgebra::{DMatrix, DVector};

use crate::optimization::{
    errors::OptError,
    root_finding::{
        jacobian::fd_jacobian,
        traits::{Jacobian, NewtonOptions, Point, ResidualSystem, Residuals, RootOutcome},
    },
};

/// Armijo constant for the residual-norm decrease test.
const ARMIJO: f64 = 1e-4;

/// solve_newton — solve `F(x) = 0` from `x0` with damped Newton steps.
///
/// Purpose
/// -------
/// Drive the residuals of `system` below `opts.tol` (sup norm) within a
/// bounded number of iterations, returning the solution together with
/// iteration and evaluation diagnostics.
///
/// Parameters
/// ----------
/// - `system`: the residual system. `residuals(x)` must return a vector of
///   length `x.len()`.
/// - `x0`: starting point; all entries must be finite.
/// - `opts`: tolerance, iteration and backtracking budgets, Jacobian scheme.
///
/// Returns
/// -------
/// `Result<RootOutcome, S::Error>` with `residual_norm ≤ opts.tol`.
///
/// Errors
/// ------
/// - [`OptError::InvalidStartingPoint`] for a non-finite `x0`.
/// - [`OptError::ResidualDimMismatch`] / [`OptError::NonFiniteResidual`]
///   for malformed residual vectors.
/// - Any error the system raises at `x0` or while building a Jacobian.
/// - [`OptError::SingularJacobian`] when the Newton system has no solution.
/// - The system's own error when every backtracking trial fails, otherwise
///   [`OptError::LineSearchStalled`] when no trial reduces the residual.
/// - [`OptError::MaxItersReached`] when the budget is exhausted.
///
/// Notes
/// -----
/// - Deterministic: identical inputs produce bit-identical iterates.
pub fn solve_newton<S: ResidualSystem>(
    system: &S, x0: Point, opts: &NewtonOptions,
) -> Result<RootOutcome, S::Error> {
    for (index, &value) in x0.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidStartingPoint { index, value }.into());
        }
    }
    let counted = CountingSystem { inner: system, evals: Cell::new(0) };
    let mut x = x0;
    let mut fx = eval_checked(&counted, &x)?;
    let mut norm = sup_norm(&fx);

    for iteration in 0..opts.max_iter {
        if norm <= opts.tol {
            return Ok(RootOutcome {
                x,
                residuals: fx,
                residual_norm: norm,
                iterations: iteration,
                residual_evals: counted.evals.get(),
            });
        }
        let jac = fd_jacobian(&counted, &x, opts.scheme)?;
        let step = newton_step(&jac, &fx).ok_or(OptError::SingularJacobian { iteration })?;
        let (x_next, f_next, _t) = backtrack(&counted, &x, &fx, &step, opts, iteration)?;
        x = x_next;
        fx = f_next;
        norm = sup_norm(&fx);
        #[cfg(feature = "obs_slog")]
        if opts.verbose {
            eprintln!("newton: iter = {}, ||F||_inf = {:.3e}, step = {}", iteration + 1, norm, _t);
        }
    }

    if norm <= opts.tol {
        return Ok(RootOutcome {
            x,
            residuals: fx,
            residual_norm: norm,
            iterations: opts.max_iter,
            residual_evals: counted.evals.get(),
        });
    }
    Err(OptError::MaxItersReached { iterations: opts.max_iter, residual_norm: norm }.into())
}

/// `max_i |r_i|`.
pub fn sup_norm(r: &Residuals) -> f64 {
    r.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

// ---- Helper Methods ----

/// Wraps a system and counts residual evaluations.
struct CountingSystem<'a, S> {
    inner: &'a S,
    evals: Cell<usize>,
}

impl<S: ResidualSystem> ResidualSystem for CountingSystem<'_, S> {
    type Error = S::Error;

    fn residuals(&self, x: &Point) -> Result<Residuals, Self::Error> {
        self.evals.set(self.evals.get() + 1);
        self.inner.residuals(x)
    }
}

fn eval_checked<S: ResidualSystem>(system: &S, x: &Point) -> Result<Residuals, S::Error> {
    let r = system.residuals(x)?;
    if r.len() != x.len() {
        return Err(OptError::ResidualDimMismatch { expected: x.len(), found: r.len() }.into());
    }
    for (index, &value) in r.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::NonFiniteResidual { index, value }.into());
        }
    }
    Ok(r)
}

fn l2_norm(r: &Residuals) -> f64 {
    r.dot(r).sqrt()
}

/// Solve `J · Δx = −F` via LU; `None` if singular or non-finite.
fn newton_step(jac: &Jacobian, fx: &Residuals) -> Option<Point> {
    let n = fx.len();
    let a = DMatrix::from_fn(n, n, |i, j| jac[[i, j]]);
    let b = DVector::from_iterator(n, fx.iter().map(|v| -v));
    let sol = a.lu().solve(&b)?;
    if sol.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(Point::from_iter(sol.iter().copied()))
}

fn backtrack<S: ResidualSystem>(
    system: &S, x: &Point, fx: &Residuals, step: &Point, opts: &NewtonOptions, iteration: usize,
) -> Result<(Point, Residuals, f64), S::Error> {
    let base = l2_norm(fx);
    let mut t = 1.0;
    let mut last_err: Option<S::Error> = None;
    for _ in 0..=opts.max_backtracks {
        let trial = x + &(step * t);
        match eval_checked(system, &trial) {
            Ok(f_trial) => {
                if l2_norm(&f_trial) <= (1.0 - ARMIJO * t) * base {
                    return Ok((trial, f_trial, t));
                }
                last_err = None;
            }
            Err(e) => last_err = Some(e),
        }
        t *= 0.5;
    }
    match last_err {
        Some(e) => Err(e),
        None => Err(OptError::LineSearchStalled { iteration, residual_norm: sup_norm(fx) }.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{errors::OptResult, root_finding::traits::JacobianScheme};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Convergence on a nonlinear 2×2 system with a known root.
    // - Backtracking away from points where the system is undefined.
    // - Singular Jacobians, exhausted budgets, and bad starting points.
    // - Determinism of repeated solves.
    //
    // They intentionally DO NOT cover:
    // - The market-clearing system; see `economy::equilibrium`.
    // -------------------------------------------------------------------------

    /// x² + y² = 4, x = y  →  root (√2, √2) from a positive start.
    struct Circle;

    impl ResidualSystem for Circle {
        type Error = OptError;

        fn residuals(&self, x: &Point) -> OptResult<Residuals> {
            Ok(array![x[0] * x[0] + x[1] * x[1] - 4.0, x[0] - x[1]])
        }
    }

    /// ln(x) = 0 and ln(y) = ln(2); undefined for non-positive entries.
    struct Logs;

    impl ResidualSystem for Logs {
        type Error = OptError;

        fn residuals(&self, x: &Point) -> OptResult<Residuals> {
            if x.iter().any(|v| *v <= 0.0) {
                return Err(OptError::ModelFailure { text: "log of non-positive".to_string() });
            }
            Ok(array![x[0].ln(), x[1].ln() - 2.0_f64.ln()])
        }
    }

    /// Residuals independent of the unknowns → zero Jacobian.
    struct Flat;

    impl ResidualSystem for Flat {
        type Error = OptError;

        fn residuals(&self, _x: &Point) -> OptResult<Residuals> {
            Ok(array![1.0, 1.0])
        }
    }

    #[test]
    // Purpose
    // -------
    // Newton converges to the known root of a smooth nonlinear system.
    //
    // Given
    // -----
    // - The circle/diagonal system from (1, 3).
    //
    // Expect
    // ------
    // - Root (√2, √2) to 1e-8 and residual norm below the tolerance.
    fn newton_converges_on_circle_system() {
        // Arrange
        let opts = NewtonOptions::default();

        // Act
        let out = solve_newton(&Circle, array![1.0, 3.0], &opts).expect("Circle system converges");

        // Assert
        assert_abs_diff_eq!(out.x[0], 2.0_f64.sqrt(), epsilon = 1e-8);
        assert_abs_diff_eq!(out.x[1], 2.0_f64.sqrt(), epsilon = 1e-8);
        assert!(out.residual_norm <= opts.tol);
        assert!(out.residual_evals > out.iterations);
    }

    #[test]
    // Purpose
    // -------
    // A full Newton step that leaves the domain is halved until it lands
    // back inside, instead of failing.
    //
    // Given
    // -----
    // - ln-system started at (5, 0.1); the full step on x overshoots below 0.
    //
    // Expect
    // ------
    // - Convergence to (1, 2).
    fn newton_backtracks_out_of_undefined_region() {
        let out = solve_newton(&Logs, array![5.0, 0.1], &NewtonOptions::default())
            .expect("Damped Newton stays in the positive orthant");

        assert_abs_diff_eq!(out.x[0], 1.0, epsilon = 1e-8);
        assert_abs_diff_eq!(out.x[1], 2.0, epsilon = 1e-8);
    }

    #[test]
    // Purpose
    // -------
    // A zero Jacobian is reported as singular.
    //
    // Given
    // -----
    // - The constant system.
    //
    // Expect
    // ------
    // - `OptError::SingularJacobian { iteration: 0 }`.
    fn zero_jacobian_is_singular() {
        let err = solve_newton(&Flat, array![0.0, 0.0], &NewtonOptions::default())
            .expect_err("Constant residuals cannot be solved");

        assert_eq!(err, OptError::SingularJacobian { iteration: 0 });
    }

    #[test]
    // Purpose
    // -------
    // The iteration budget bounds the solve.
    //
    // Given
    // -----
    // - The circle system with `max_iter = 1` and a far start.
    //
    // Expect
    // ------
    // - `OptError::MaxItersReached { iterations: 1, .. }`.
    fn iteration_budget_is_enforced() {
        let opts = NewtonOptions::new(1e-12, 1, 40, JacobianScheme::Central, false)
            .expect("Options should be valid");

        let err = solve_newton(&Circle, array![10.0, 30.0], &opts).expect_err("One step is not enough");

        match err {
            OptError::MaxItersReached { iterations, residual_norm } => {
                assert_eq!(iterations, 1);
                assert!(residual_norm > 1e-12);
            }
            other => panic!("Expected MaxItersReached, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Non-finite starting points are rejected up front.
    //
    // Given
    // -----
    // - x0 = (NaN, 1).
    //
    // Expect
    // ------
    // - `OptError::InvalidStartingPoint { index: 0, .. }`.
    fn non_finite_start_is_rejected() {
        let err = solve_newton(&Circle, array![f64::NAN, 1.0], &NewtonOptions::default())
            .expect_err("NaN start");

        match err {
            OptError::InvalidStartingPoint { index, .. } => assert_eq!(index, 0),
            other => panic!("Expected InvalidStartingPoint, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Repeated solves from the same start are bit-identical.
    //
    // Given
    // -----
    // - Two solves of the circle system from (1, 3).
    //
    // Expect
    // ------
    // - Equal outcomes.
    fn newton_is_deterministic() {
        let opts = NewtonOptions::default();

        let a = solve_newton(&Circle, array![1.0, 3.0], &opts).expect("converges");
        let b = solve_newton(&Circle, array![1.0, 3.0], &opts).expect("converges");

        assert_eq!(a, b);
    }
}
