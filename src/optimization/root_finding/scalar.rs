//! root_finding::scalar — bracketed scalar root finding on top of argmin.
//!
//! Purpose
//! -------
//! Locate a root of a continuous scalar function `f: ℝ → ℝ` inside a
//! sign-changing bracket using argmin's Brent solver, with an optional
//! upward bracket search for functions that are known to be increasing
//! beyond a lower anchor.
//!
//! Key behaviors
//! -------------
//! - [`expand_bracket_upward`] doubles the width of `[lower, upper]` until
//!   `f(upper) > 0`, bounded by [`BracketOptions::max_expansions`].
//! - [`find_root_bracketed`] runs `BrentRoot` on a bracket whose endpoints
//!   have opposite signs and returns a [`ScalarRoot`] with diagnostics.
//!
//! Invariants & assumptions
//! ------------------------
//! - Callers pass a bracket with `f(lower) · f(upper) ≤ 0`; the function
//!   is checked before argmin is invoked so sign errors surface as
//!   [`OptError::InvalidBracket`] rather than backend errors.
//! - Non-finite function values abort the solve with
//!   [`OptError::NonFiniteResidual`].
//! - Every loop is bounded: bracket expansions by `max_expansions`, Brent
//!   iterations by `max_iter`.
//!
//! Conventions
//! -----------
//! - `tol` is Brent's interval tolerance on the root location, not a
//!   tolerance on `|f(x)|`; the final residual is reported alongside the
//!   root so callers can judge both.
//! - A run that stops for any reason other than solver convergence is
//!   reported as [`OptError::RootNotConverged`].
use argmin::{
    core::{CostFunction, Error, Executor, State, TerminationReason, TerminationStatus},
    solver::brent::BrentRoot,
};

use crate::optimization::errors::{OptError, OptResult};

/// BracketOptions — tolerances and budgets for bracketed root finding.
///
/// Fields
/// ------
/// - `tol`: Brent interval tolerance (finite, > 0).
/// - `max_iter`: Brent iteration budget (> 0).
/// - `max_expansions`: number of bracket doublings allowed when searching
///   for a sign change (> 0).
/// - `verbose`: attach a slog observer to the Brent run (feature `obs_slog`).
///
/// Default
/// -------
/// `tol = 1e-13`, `max_iter = 200`, `max_expansions = 60`, `verbose = false`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketOptions {
    pub tol: f64,
    pub max_iter: u64,
    pub max_expansions: usize,
    pub verbose: bool,
}

impl BracketOptions {
    /// Construct validated bracket options.
    ///
    /// # Errors
    /// - [`OptError::InvalidRootTol`] for a non-finite or non-positive `tol`.
    /// - [`OptError::InvalidMaxIter`] when `max_iter` or `max_expansions` is zero.
    pub fn new(tol: f64, max_iter: u64, max_expansions: usize, verbose: bool) -> OptResult<Self> {
        verify_root_tol(tol)?;
        if max_iter == 0 {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        if max_expansions == 0 {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Bracket expansions must be greater than zero.",
            });
        }
        Ok(Self { tol, max_iter, max_expansions, verbose })
    }
}

impl Default for BracketOptions {
    fn default() -> Self {
        Self { tol: 1e-13, max_iter: 200, max_expansions: 60, verbose: false }
    }
}

/// Root returned by [`find_root_bracketed`].
///
/// - `root`: location of the root.
/// - `residual`: `f(root)`.
/// - `iterations`: Brent iterations performed.
/// - `cost_evals`: function evaluations, including bracket checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarRoot {
    pub root: f64,
    pub residual: f64,
    pub iterations: u64,
    pub cost_evals: usize,
}

/// Validate a root-finder tolerance: finite and strictly positive.
///
/// # Errors
/// Returns [`OptError::InvalidRootTol`] otherwise.
pub fn verify_root_tol(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidRootTol { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidRootTol { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

/// expand_bracket_upward — widen `[lower, upper]` until `f(upper) > 0`.
///
/// Purpose
/// -------
/// Produce a sign-changing bracket for a function that is negative at
/// `lower` and eventually positive to the right of it. The right endpoint
/// moves to `lower + 2·(upper − lower)` until the function turns positive.
///
/// Parameters
/// ----------
/// - `f`: scalar function, expected negative at `lower`.
/// - `lower`: left anchor of the bracket. Never moves.
/// - `upper`: initial right endpoint, `upper > lower`.
/// - `opts`: only `max_expansions` is consulted.
///
/// Returns
/// -------
/// `OptResult<(f64, f64)>`
///   - `Ok((lower, upper'))` with `f(upper') ≥ 0`.
///
/// Errors
/// ------
/// - [`OptError::InvalidBracket`] when the endpoints are not finite or not
///   ordered.
/// - [`OptError::NonFiniteResidual`] when `f` returns a non-finite value.
/// - [`OptError::BracketNotFound`] when the expansion budget runs out.
pub fn expand_bracket_upward<F: Fn(f64) -> f64>(
    f: &F, lower: f64, upper: f64, opts: &BracketOptions,
) -> OptResult<(f64, f64)> {
    check_bracket(lower, upper)?;
    let mut upper = upper;
    for _ in 0..opts.max_expansions {
        let value = eval_finite(f, upper)?;
        if value >= 0.0 {
            return Ok((lower, upper));
        }
        upper = lower + 2.0 * (upper - lower);
        if !upper.is_finite() {
            break;
        }
    }
    Err(OptError::BracketNotFound { lower, upper, expansions: opts.max_expansions })
}

/// find_root_bracketed — Brent's method on a sign-changing bracket.
///
/// Purpose
/// -------
/// Wrap `f` as an argmin cost function and run `BrentRoot` on
/// `[lower, upper]`, returning the root together with its residual and
/// iteration diagnostics.
///
/// Parameters
/// ----------
/// - `f`: continuous scalar function.
/// - `lower`, `upper`: finite bracket endpoints with `lower < upper` and
///   `f(lower) · f(upper) ≤ 0`.
/// - `opts`: tolerance, iteration budget, and verbosity.
///
/// Returns
/// -------
/// `OptResult<ScalarRoot>` on solver convergence. An endpoint that is an
/// exact root is returned without invoking argmin.
///
/// Errors
/// ------
/// - [`OptError::InvalidBracket`] for unordered/non-finite endpoints or a
///   bracket without a sign change.
/// - [`OptError::NonFiniteResidual`] if `f` produces a non-finite value.
/// - [`OptError::RootNotConverged`] if Brent stops without converging
///   (typically the iteration budget).
/// - Any argmin runtime error via `From<argmin::core::Error>`.
pub fn find_root_bracketed<F: Fn(f64) -> f64>(
    f: &F, lower: f64, upper: f64, opts: &BracketOptions,
) -> OptResult<ScalarRoot> {
    check_bracket(lower, upper)?;
    let f_lower = eval_finite(f, lower)?;
    let f_upper = eval_finite(f, upper)?;
    if f_lower == 0.0 {
        return Ok(ScalarRoot { root: lower, residual: 0.0, iterations: 0, cost_evals: 2 });
    }
    if f_upper == 0.0 {
        return Ok(ScalarRoot { root: upper, residual: 0.0, iterations: 0, cost_evals: 2 });
    }
    if f_lower.signum() == f_upper.signum() {
        return Err(OptError::InvalidBracket {
            lower,
            upper,
            reason: "Function values at the endpoints must have opposite signs.",
        });
    }

    let problem = ScalarProblem { f };
    let solver = BrentRoot::new(lower, upper, opts.tol);
    let mut executor = Executor::new(problem, solver);
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        executor = executor.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    executor = executor.configure(|state| state.max_iters(opts.max_iter));
    let result = executor.run()?;
    let state = result.state();
    let iterations = state.get_iter();
    match state.get_termination_status() {
        TerminationStatus::Terminated(TerminationReason::SolverConverged) => {}
        other => {
            return Err(OptError::RootNotConverged {
                status: format!("{other:?}"),
                iterations: iterations as usize,
            });
        }
    }
    // BrentRoot stores the signed f(b) as the cost, so "best" would track the
    // most negative value; the current iterate is the converged root.
    let root = state.get_param().copied().ok_or(OptError::MissingThetaHat)?;
    let brent_evals = state.get_func_counts().get("cost_count").copied().unwrap_or(0) as usize;
    let residual = eval_finite(f, root)?;
    Ok(ScalarRoot { root, residual, iterations, cost_evals: brent_evals + 3 })
}

// ---- Helper Methods ----

/// Argmin view of a scalar closure.
struct ScalarProblem<'a, F> {
    f: &'a F,
}

impl<F: Fn(f64) -> f64> CostFunction for ScalarProblem<'_, F> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        Ok(eval_finite(self.f, *x)?)
    }
}

fn check_bracket(lower: f64, upper: f64) -> OptResult<()> {
    if !lower.is_finite() || !upper.is_finite() {
        return Err(OptError::InvalidBracket {
            lower,
            upper,
            reason: "Bracket endpoints must be finite.",
        });
    }
    if lower >= upper {
        return Err(OptError::InvalidBracket {
            lower,
            upper,
            reason: "Lower endpoint must be strictly below the upper endpoint.",
        });
    }
    Ok(())
}

fn eval_finite<F: Fn(f64) -> f64>(f: &F, x: f64) -> OptResult<f64> {
    let value = f(x);
    if !value.is_finite() {
        return Err(OptError::NonFiniteResidual { index: 0, value });
    }
    Ok(value)
}
