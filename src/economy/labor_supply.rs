//! Inner solver: optimal labor supply at given prices and incomes.
//!
//! The household's first-order condition `g(l) = ν·l^ε·(w·l + R) − w`
//! is strictly increasing on the feasible region `l > l_min`, where
//! `l_min = max(0, −R/w)`, and `g(l_min) = −w < 0`. The root is therefore
//! unique and is found by
//!
//! 1. anchoring the bracket at `l_min`,
//! 2. taking the caller's `initial_guess` as the first upper endpoint
//!    (doubling the bracket width until `g ≥ 0`), and
//! 3. running Brent's method on the resulting sign change.
//!
//! Both the expansion and the Brent iterations are bounded by
//! [`BracketOptions`]; exhausting either is a convergence error.
use crate::{
    economy::{
        errors::{ModelError, ModelResult},
        household::{HouseholdEnv, labor_foc_residual},
        params::ModelParameters,
    },
    optimization::root_finding::scalar::{
        BracketOptions, expand_bracket_upward, find_root_bracketed,
    },
};

/// Starting upper endpoint used by the equilibrium layer.
pub const DEFAULT_LABOR_GUESS: f64 = 1.0;

/// Labor-supply solver configuration.
///
/// Fields:
/// - `bracket` — Brent tolerance and iteration budget, bracket expansion
///   budget, verbosity.
///
/// Default:
/// - `BracketOptions::default()` (tol `1e-13`, 200 iterations, 60 expansions).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LaborSupplyOptions {
    pub bracket: BracketOptions,
}

impl LaborSupplyOptions {
    pub fn new(bracket: BracketOptions) -> Self {
        Self { bracket }
    }
}

/// solve_labor_supply — utility-maximizing labor at fixed prices and incomes.
///
/// Parameters
/// ----------
/// - `env`: wage, prices, transfer, profits, and tax.
/// - `params`: model parameters.
/// - `initial_guess`: first upper bracket endpoint; must be finite and > 0.
/// - `opts`: bracket and Brent settings.
///
/// Returns
/// -------
/// The labor supply `l*` with `g(l*) ≈ 0`, strictly above `max(0, −R/w)`.
///
/// Errors
/// ------
/// - [`ModelError::InvalidParameter`] for invalid parameters.
/// - [`ModelError::NonPositiveWage`] for a non-positive wage.
/// - [`ModelError::NonFiniteQuantity`] for non-finite non-labor income.
/// - [`ModelError::InvalidInitialGuess`] for a non-finite or non-positive guess.
/// - [`ModelError::BracketNotFound`] / [`ModelError::RootNotConverged`] when
///   the bounded search fails.
pub fn solve_labor_supply(
    env: &HouseholdEnv, params: &ModelParameters, initial_guess: f64, opts: &LaborSupplyOptions,
) -> ModelResult<f64> {
    params.validate()?;
    if !env.wage.is_finite() || env.wage <= 0.0 {
        return Err(ModelError::NonPositiveWage { value: env.wage });
    }
    let non_labor = env.non_labor_income();
    if !non_labor.is_finite() {
        return Err(ModelError::NonFiniteQuantity { name: "non-labor income", value: non_labor });
    }
    if !initial_guess.is_finite() || initial_guess <= 0.0 {
        return Err(ModelError::InvalidInitialGuess {
            name: "labor",
            value: initial_guess,
            reason: "Initial labor guess must be finite and > 0.",
        });
    }

    let foc = |labor: f64| labor_foc_residual(labor, env, params);
    let lower = (-non_labor / env.wage).max(0.0);
    let upper = if initial_guess > lower { initial_guess } else { lower + initial_guess };
    let (lower, upper) = expand_bracket_upward(&foc, lower, upper, &opts.bracket)?;
    let root = find_root_bracketed(&foc, lower, upper, &opts.bracket)?;
    Ok(root.root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::{household::household_utility, policy::PriceVector};
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The closed-form solution with zero non-labor income.
    // - Optimality of the returned labor against utility perturbations.
    // - Negative non-labor income (root above −R/w) and far-away guesses.
    // - Input validation and the convergence error path.
    // -------------------------------------------------------------------------

    fn env(transfer: f64, profit1: f64, profit2: f64) -> HouseholdEnv {
        HouseholdEnv {
            wage: 1.0,
            prices: PriceVector::new(1.0, 1.5),
            transfer,
            profit1,
            profit2,
            tau: 0.0,
        }
    }

    #[test]
    // Purpose
    // -------
    // With R = 0 the condition reduces to ν·l^(1+ε) = w, i.e.
    // l = (w/ν)^(1/(1+ε)).
    //
    // Given
    // -----
    // - Default parameters (ν = 1, ε = 2), w = 1, R = 0, ν changed to 8.
    //
    // Expect
    // ------
    // - l = 1 for ν = 1 and l = 0.5 for ν = 8.
    fn zero_non_labor_income_matches_closed_form() {
        let opts = LaborSupplyOptions::default();
        let base = ModelParameters::default();
        let steep = ModelParameters { nu: 8.0, ..base };

        let l1 = solve_labor_supply(&env(0.0, 0.0, 0.0), &base, 1.0, &opts).unwrap();
        let l2 = solve_labor_supply(&env(0.0, 0.0, 0.0), &steep, 1.0, &opts).unwrap();

        assert_relative_eq!(l1, 1.0, max_relative = 1e-10);
        assert_relative_eq!(l2, 0.5, max_relative = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // The solution maximizes utility: nearby labor choices are worse.
    //
    // Given
    // -----
    // - T = 0.05, π = (0.24, 0.55), guess 1.
    //
    // Expect
    // ------
    // - U(l*) ≥ U(l*·(1 ± 1e-3)) and the FOC residual is ~0.
    fn solution_maximizes_utility() {
        let params = ModelParameters::default();
        let e = env(0.05, 0.24, 0.55);

        let l = solve_labor_supply(&e, &params, 1.0, &LaborSupplyOptions::default()).unwrap();

        let u = household_utility(l, &e, &params);
        assert!(u >= household_utility(l * 1.001, &e, &params));
        assert!(u >= household_utility(l * 0.999, &e, &params));
        assert!(labor_foc_residual(l, &e, &params).abs() < 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // With negative non-labor income the root lies above −R/w and is still
    // found from guesses on either side of it.
    //
    // Given
    // -----
    // - R = −2 (so l_min = 2), guesses 0.5 and 50.
    //
    // Expect
    // ------
    // - Identical roots above 2 with a vanishing residual.
    fn negative_non_labor_income_is_handled() {
        let params = ModelParameters::default();
        let e = env(-2.0, 0.0, 0.0);
        let opts = LaborSupplyOptions::default();

        let a = solve_labor_supply(&e, &params, 0.5, &opts).unwrap();
        let b = solve_labor_supply(&e, &params, 50.0, &opts).unwrap();

        assert!(a > 2.0);
        assert_relative_eq!(a, b, max_relative = 1e-10);
        assert!(labor_foc_residual(a, &e, &params).abs() < 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Invalid guesses are configuration errors; an exhausted expansion
    // budget is a convergence error.
    //
    // Given
    // -----
    // - guess = 0; then a tiny budget (1 expansion) with a far root
    //   (ν = 1e-9).
    //
    // Expect
    // ------
    // - `InvalidInitialGuess`, then `BracketNotFound`.
    fn invalid_guess_and_exhausted_budget() {
        let params = ModelParameters::default();
        let e = env(0.0, 0.0, 0.0);

        let err = solve_labor_supply(&e, &params, 0.0, &LaborSupplyOptions::default()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidInitialGuess { .. }));

        let lazy = ModelParameters { nu: 1e-9, ..params };
        let tight = LaborSupplyOptions::new(BracketOptions::new(1e-13, 200, 1, false).unwrap());
        let err = solve_labor_supply(&e, &lazy, 1.0, &tight).unwrap_err();
        assert!(matches!(err, ModelError::BracketNotFound { .. }));
        assert!(err.is_convergence());
    }
}
