//! Public API surface for multivariate root finding.
//!
//! - [`ResidualSystem`]: trait users implement for a square system `F(x) = 0`.
//! - [`NewtonOptions`] and [`JacobianScheme`]: configuration for the solver.
//! - [`RootOutcome`]: normalized result returned by `solve_newton`.
//!
//! Convention: residual systems report their own failures through an
//! associated error type that can absorb solver errors (`From<OptError>`),
//! so domain errors raised while evaluating `F` reach the caller unchanged.
use std::str::FromStr;

use ndarray::{Array1, Array2};

use crate::optimization::{
    errors::{OptError, OptResult},
    root_finding::scalar::verify_root_tol,
};

/// Unknowns of a residual system.
pub type Point = Array1<f64>;

/// Residual vector `F(x)`; same length as [`Point`].
pub type Residuals = Array1<f64>;

/// Dense Jacobian `∂F_i/∂x_j`, indexed `[[i, j]]`.
pub type Jacobian = Array2<f64>;

/// User-implemented square system of equations `F(x) = 0`.
///
/// - `type Error`: error raised while evaluating `F`. Must accept solver
///   errors via `From<OptError>`.
///
/// Required:
/// - `residuals(&Point) -> Result<Residuals, Self::Error>`: evaluate `F(x)`.
///   The returned vector must have the same length as `x`.
pub trait ResidualSystem {
    type Error: From<OptError>;

    fn residuals(&self, x: &Point) -> Result<Residuals, Self::Error>;
}

/// Finite-difference scheme used to build the Jacobian.
///
/// Variants:
/// - `Forward`: one extra evaluation per unknown and row.
/// - `Central`: two evaluations per unknown and row; falls back to forward
///   differences for a row whose central stencil fails.
///
/// Parsing:
/// Case-insensitive `"forward"` / `"central"`; anything else returns
/// `OptError::InvalidJacobianScheme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JacobianScheme {
    Forward,
    Central,
}

impl FromStr for JacobianScheme {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forward" => Ok(JacobianScheme::Forward),
            "central" => Ok(JacobianScheme::Central),
            _ => Err(OptError::InvalidJacobianScheme {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'forward' or 'central'.",
            }),
        }
    }
}

/// Newton solver configuration.
///
/// Fields:
/// - `tol` — stop once `max_i |F_i(x)| ≤ tol`.
/// - `max_iter` — hard cap on Newton iterations.
/// - `max_backtracks` — step halvings allowed per iteration.
/// - `scheme` — Jacobian finite-difference scheme.
/// - `verbose` — print one progress line per iteration to stderr (behind
///   the `obs_slog` feature).
///
/// Default:
/// - `tol = 1e-10`, `max_iter = 100`, `max_backtracks = 40`,
///   `scheme = Central`, `verbose = false`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonOptions {
    pub tol: f64,
    pub max_iter: usize,
    pub max_backtracks: usize,
    pub scheme: JacobianScheme,
    pub verbose: bool,
}

impl NewtonOptions {
    /// Construct validated Newton options.
    ///
    /// # Errors
    /// - [`OptError::InvalidRootTol`] for a non-finite or non-positive `tol`.
    /// - [`OptError::InvalidMaxIter`] when `max_iter == 0`.
    pub fn new(
        tol: f64, max_iter: usize, max_backtracks: usize, scheme: JacobianScheme, verbose: bool,
    ) -> OptResult<Self> {
        verify_root_tol(tol)?;
        if max_iter == 0 {
            return Err(OptError::InvalidMaxIter {
                max_iter,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { tol, max_iter, max_backtracks, scheme, verbose })
    }
}

impl Default for NewtonOptions {
    fn default() -> Self {
        Self {
            tol: 1e-10,
            max_iter: 100,
            max_backtracks: 40,
            scheme: JacobianScheme::Central,
            verbose: false,
        }
    }
}

/// Result of a converged Newton solve.
///
/// - `x`: solution.
/// - `residuals`: `F(x)` at the solution.
/// - `residual_norm`: `max_i |F_i(x)|`.
/// - `iterations`: Newton iterations performed.
/// - `residual_evals`: evaluations of `F`, including Jacobian stencils.
#[derive(Debug, Clone, PartialEq)]
pub struct RootOutcome {
    pub x: Point,
    pub residuals: Residuals,
    pub residual_norm: f64,
    pub iterations: usize,
    pub residual_evals: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // `JacobianScheme` parses case-insensitively and rejects unknown names.
    //
    // Given
    // -----
    // - "Central", "FORWARD", and "backward".
    //
    // Expect
    // ------
    // - The first two parse; the last fails with `InvalidJacobianScheme`.
    fn jacobian_scheme_parses_case_insensitively() {
        assert_eq!("Central".parse::<JacobianScheme>().unwrap(), JacobianScheme::Central);
        assert_eq!("FORWARD".parse::<JacobianScheme>().unwrap(), JacobianScheme::Forward);
        match "backward".parse::<JacobianScheme>() {
            Err(OptError::InvalidJacobianScheme { name, .. }) => assert_eq!(name, "backward"),
            other => panic!("Expected InvalidJacobianScheme, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // `NewtonOptions::new` enforces a positive tolerance and iteration cap.
    //
    // Given
    // -----
    // - A zero tolerance, a zero iteration cap, and a valid configuration.
    //
    // Expect
    // ------
    // - Only the valid configuration is accepted.
    fn newton_options_validate_inputs() {
        assert!(NewtonOptions::new(0.0, 10, 10, JacobianScheme::Central, false).is_err());
        assert!(NewtonOptions::new(1e-8, 0, 10, JacobianScheme::Central, false).is_err());
        let opts = NewtonOptions::new(1e-8, 10, 0, JacobianScheme::Forward, false)
            .expect("Zero backtracks is a valid (full-step) configuration");
        assert_eq!(opts.max_backtracks, 0);
    }
}
