//! Household block: Cobb–Douglas consumption with disutility of labor.
//!
//! Purpose
//! -------
//! Evaluate the representative household's consumption and utility for a
//! given labor choice, and the marginal condition that pins down optimal
//! labor supply.
//!
//! Key behaviors
//! -------------
//! - Income `I = w·l + T + π1 + π2`; demands `c1 = α·I/p1` and
//!   `c2 = (1 − α)·I/(p2 + τ)`.
//! - Utility `α·ln c1 + (1 − α)·ln c2 − ν·l^(1+ε)/(1+ε)`.
//! - [`household_utility`] returns `−∞` for infeasible choices, so it can
//!   be handed to generic optimizers. [`household_outcome`] reports the
//!   same situations as typed [`ModelError`] values.
//!
//! Invariants & assumptions
//! ------------------------
//! - Since `∂U/∂l = w/I − ν·l^ε`, the first-order condition is
//!   `ν·l^ε·(w·l + R) = w` with non-labor income `R = T + π1 + π2`. The tax
//!   does not enter it; it only shifts the split of spending.
//! - The left-hand side is strictly increasing on `l > max(0, −R/w)`, so
//!   the optimal labor supply is unique.
use crate::economy::{
    errors::{ModelError, ModelResult},
    params::ModelParameters,
    policy::PriceVector,
};

/// Everything the household takes as given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseholdEnv {
    pub wage: f64,
    pub prices: PriceVector,
    pub transfer: f64,
    pub profit1: f64,
    pub profit2: f64,
    pub tau: f64,
}

impl HouseholdEnv {
    /// `T + π1 + π2`.
    pub fn non_labor_income(&self) -> f64 {
        self.transfer + self.profit1 + self.profit2
    }

    /// `w·l + T + π1 + π2`.
    pub fn income(&self, labor: f64) -> f64 {
        self.wage * labor + self.non_labor_income()
    }

    /// `p2 + τ`.
    pub fn consumer_price2(&self) -> f64 {
        self.prices.p2 + self.tau
    }
}

/// Household quantities at a given labor choice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseholdOutcome {
    pub labor: f64,
    pub income: f64,
    pub c1: f64,
    pub c2: f64,
    pub utility: f64,
}

/// Utility of supplying `labor`, or `−∞` when the choice is infeasible
/// (negative labor, non-positive consumption, or non-positive prices).
pub fn household_utility(labor: f64, env: &HouseholdEnv, params: &ModelParameters) -> f64 {
    if labor.is_nan() || labor < 0.0 || !is_positive(env.prices.p1) {
        return f64::NEG_INFINITY;
    }
    if !is_positive(env.consumer_price2()) {
        return f64::NEG_INFINITY;
    }
    let (c1, c2) = demands(labor, env, params);
    if !is_positive(c1) || !is_positive(c2) {
        return f64::NEG_INFINITY;
    }
    utility(labor, c1, c2, params)
}

/// Consumption and utility at `labor`, with typed errors.
///
/// # Errors
/// - [`ModelError::NonPositiveWage`] for a non-positive wage.
/// - [`ModelError::InvalidLabor`] for negative or non-finite labor.
/// - [`ModelError::NonPositivePrice`] for `p1 ≤ 0`.
/// - [`ModelError::NonPositiveConsumerPrice`] for `p2 + τ ≤ 0`.
/// - [`ModelError::NonPositiveConsumption`] when income is not positive.
/// - [`ModelError::NonFiniteQuantity`] if utility is not finite.
pub fn household_outcome(
    labor: f64, env: &HouseholdEnv, params: &ModelParameters,
) -> ModelResult<HouseholdOutcome> {
    if !env.wage.is_finite() || env.wage <= 0.0 {
        return Err(ModelError::NonPositiveWage { value: env.wage });
    }
    if !labor.is_finite() || labor < 0.0 {
        return Err(ModelError::InvalidLabor {
            value: labor,
            reason: "Labor supply must be finite and >= 0.",
        });
    }
    if !is_positive(env.prices.p1) {
        return Err(ModelError::NonPositivePrice { name: "p1", value: env.prices.p1 });
    }
    let q2 = env.consumer_price2();
    if !is_positive(q2) {
        return Err(ModelError::NonPositiveConsumerPrice { value: q2 });
    }
    let (c1, c2) = demands(labor, env, params);
    if !is_positive(c1) {
        return Err(ModelError::NonPositiveConsumption { name: "c1", value: c1 });
    }
    if !is_positive(c2) {
        return Err(ModelError::NonPositiveConsumption { name: "c2", value: c2 });
    }
    let utility = utility(labor, c1, c2, params);
    if !utility.is_finite() {
        return Err(ModelError::NonFiniteQuantity { name: "utility", value: utility });
    }
    Ok(HouseholdOutcome { labor, income: env.income(labor), c1, c2, utility })
}

/// First-order condition `ν·l^ε·(w·l + R) − w`.
///
/// Negative below the optimal labor supply and positive above it on the
/// feasible region `l ≥ max(0, −R/w)`.
pub fn labor_foc_residual(labor: f64, env: &HouseholdEnv, params: &ModelParameters) -> f64 {
    params.nu * labor.powf(params.epsilon) * env.income(labor) - env.wage
}

// ---- Helper Methods ----

/// `x > 0`, false for NaN.
fn is_positive(x: f64) -> bool {
    x > 0.0
}

fn demands(labor: f64, env: &HouseholdEnv, params: &ModelParameters) -> (f64, f64) {
    let income = env.income(labor);
    let c1 = params.alpha * income / env.prices.p1;
    let c2 = (1.0 - params.alpha) * income / env.consumer_price2();
    (c1, c2)
}

fn utility(labor: f64, c1: f64, c2: f64, params: &ModelParameters) -> f64 {
    let disutility = params.nu * labor.powf(1.0 + params.epsilon) / (1.0 + params.epsilon);
    params.alpha * c1.ln() + (1.0 - params.alpha) * c2.ln() - disutility
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Demands and utility against hand-computed values.
    // - The −∞ sentinel vs typed errors for infeasible choices.
    // - Agreement of the FOC residual with a numerical utility derivative.
    // -------------------------------------------------------------------------

    fn env(transfer: f64, tau: f64) -> HouseholdEnv {
        HouseholdEnv {
            wage: 1.0,
            prices: PriceVector::new(1.0, 2.0),
            transfer,
            profit1: 0.1,
            profit2: 0.2,
            tau,
        }
    }

    #[test]
    // Purpose
    // -------
    // Demands split income by the Cobb–Douglas shares at consumer prices.
    //
    // Given
    // -----
    // - l = 0.7, T = 0, π = (0.1, 0.2), p = (1, 2), τ = 0.5 → I = 1.
    //
    // Expect
    // ------
    // - c1 = 0.3, c2 = 0.7 / 2.5 = 0.28, utility matches the formula.
    fn demands_and_utility_match_hand_computation() {
        let params = ModelParameters::default();

        let out = household_outcome(0.7, &env(0.0, 0.5), &params).expect("feasible choice");

        assert_relative_eq!(out.income, 1.0, max_relative = 1e-12);
        assert_relative_eq!(out.c1, 0.3, max_relative = 1e-12);
        assert_relative_eq!(out.c2, 0.28, max_relative = 1e-12);
        let expected = 0.3 * 0.3_f64.ln() + 0.7 * 0.28_f64.ln() - 0.7_f64.powi(3) / 3.0;
        assert_relative_eq!(out.utility, expected, max_relative = 1e-12);
        assert_eq!(household_utility(0.7, &env(0.0, 0.5), &params), out.utility);
    }

    #[test]
    // Purpose
    // -------
    // Infeasible choices give −∞ from the sentinel API and typed errors
    // from the checked API.
    //
    // Given
    // -----
    // - T = −1 so that income is negative at l = 0.1; τ = −3 so p2 + τ < 0.
    //
    // Expect
    // ------
    // - `NEG_INFINITY`; `NonPositiveConsumption { name: "c1" }`;
    //   `NonPositiveConsumerPrice`.
    fn infeasible_choices_are_flagged() {
        let params = ModelParameters::default();

        assert_eq!(household_utility(0.1, &env(-1.0, 0.0), &params), f64::NEG_INFINITY);
        assert!(matches!(
            household_outcome(0.1, &env(-1.0, 0.0), &params),
            Err(ModelError::NonPositiveConsumption { name: "c1", .. })
        ));
        assert_eq!(household_utility(0.5, &env(0.0, -3.0), &params), f64::NEG_INFINITY);
        assert!(matches!(
            household_outcome(0.5, &env(0.0, -3.0), &params),
            Err(ModelError::NonPositiveConsumerPrice { .. })
        ));
        assert!(matches!(
            household_outcome(-0.5, &env(0.0, 0.0), &params),
            Err(ModelError::InvalidLabor { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The FOC residual equals `−I·∂U/∂l`, so it vanishes exactly where
    // utility is stationary in labor.
    //
    // Given
    // -----
    // - Several labor levels, central differences of `household_utility`.
    //
    // Expect
    // ------
    // - `residual ≈ −I·dU/dl` to 1e-6.
    fn foc_residual_matches_utility_derivative() {
        let params = ModelParameters::default();
        let e = env(0.05, 0.3);
        let h = 1e-6;
        for labor in [0.2, 0.5, 0.8, 1.3] {
            let du = (household_utility(labor + h, &e, &params)
                - household_utility(labor - h, &e, &params))
                / (2.0 * h);

            let residual = labor_foc_residual(labor, &e, &params);

            assert_abs_diff_eq!(residual, -e.income(labor) * du, epsilon = 1e-6);
        }
    }
}
