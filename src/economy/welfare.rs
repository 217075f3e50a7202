//! Social welfare at equilibrium, and its sentinel-cost form for search.
//!
//! `SWF = U − κ·y2`: household utility net of the production externality of
//! good 2. [`evaluate_welfare`] returns the full [`WelfareReport`] with typed
//! errors; [`negative_welfare`] is the minimization boundary and maps every
//! error to `+∞`, so a failing policy is simply unattractive to the outer
//! search.
use crate::economy::{
    equilibrium::{
        EquilibriumOptions, EquilibriumResult, solve_balanced_equilibrium, solve_equilibrium,
    },
    errors::{ModelError, ModelResult},
    params::ModelParameters,
    policy::{PolicyInstrument, PriceVector},
};

/// Welfare decomposition at an equilibrium.
///
/// - `utility`: household utility `U`.
/// - `externality`: `κ·y2`.
/// - `welfare`: `U − κ·y2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WelfareReport {
    pub equilibrium: EquilibriumResult,
    pub utility: f64,
    pub externality: f64,
    pub welfare: f64,
}

impl WelfareReport {
    /// `−SWF`, the quantity the policy search minimizes.
    pub fn cost(&self) -> f64 {
        -self.welfare
    }
}

/// evaluate_welfare — welfare of a policy in the free regime.
///
/// Solves the equilibrium from unit prices and scores it.
///
/// Errors
/// ------
/// - Any error from [`solve_equilibrium`].
/// - [`ModelError::NonPositiveConsumption`] / [`ModelError::InvalidLabor`]
///   when the equilibrium allocation is degenerate.
pub fn evaluate_welfare(
    params: &ModelParameters, policy: PolicyInstrument, opts: &EquilibriumOptions,
) -> ModelResult<WelfareReport> {
    let eq = solve_equilibrium(params, policy, PriceVector::default(), opts)?;
    score(params, eq)
}

/// evaluate_balanced_welfare — welfare of a tax whose revenue is rebated.
///
/// The transfer is solved jointly with prices, starting at
/// `initial_transfer`.
///
/// # Errors
/// Same as [`evaluate_welfare`], via [`solve_balanced_equilibrium`].
pub fn evaluate_balanced_welfare(
    params: &ModelParameters, tau: f64, initial_transfer: f64, opts: &EquilibriumOptions,
) -> ModelResult<WelfareReport> {
    let eq =
        solve_balanced_equilibrium(params, tau, PriceVector::default(), initial_transfer, opts)?;
    score(params, eq)
}

/// `−SWF` for a free-regime policy, or `+∞` when no valid equilibrium exists.
pub fn negative_welfare(
    params: &ModelParameters, policy: PolicyInstrument, opts: &EquilibriumOptions,
) -> f64 {
    evaluate_welfare(params, policy, opts).map_or(f64::INFINITY, |r| r.cost())
}

/// `−SWF` for a balanced-budget tax, or `+∞` when no valid equilibrium exists.
pub fn negative_balanced_welfare(
    params: &ModelParameters, tau: f64, opts: &EquilibriumOptions,
) -> f64 {
    evaluate_balanced_welfare(params, tau, 0.0, opts).map_or(f64::INFINITY, |r| r.cost())
}

// ---- Helper Methods ----

fn score(params: &ModelParameters, eq: EquilibriumResult) -> ModelResult<WelfareReport> {
    let hh = eq.snapshot.household;
    if hh.c1 <= 0.0 {
        return Err(ModelError::NonPositiveConsumption { name: "c1", value: hh.c1 });
    }
    if hh.c2 <= 0.0 {
        return Err(ModelError::NonPositiveConsumption { name: "c2", value: hh.c2 });
    }
    if hh.labor <= 0.0 {
        return Err(ModelError::InvalidLabor {
            value: hh.labor,
            reason: "Equilibrium labor supply must be > 0.",
        });
    }
    let externality = params.kappa * eq.snapshot.firm2.output;
    let welfare = hh.utility - externality;
    if !welfare.is_finite() {
        return Err(ModelError::NonFiniteQuantity { name: "welfare", value: welfare });
    }
    Ok(WelfareReport { equilibrium: eq, utility: hh.utility, externality, welfare })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::labor_supply::LaborSupplyOptions;
    use crate::optimization::root_finding::traits::{JacobianScheme, NewtonOptions};
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The welfare decomposition at the undistorted equilibrium.
    // - The +∞ sentinel for invalid policies and exhausted Newton budgets.
    // - The balanced-budget welfare ranking around τ = 0.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Welfare is utility net of κ·y2, and the cost is its negation.
    //
    // Given
    // -----
    // - Default parameters, τ = T = 0.
    //
    // Expect
    // ------
    // - U ≈ −0.587623, y2 ≈ 0.745379, SWF = U − 0.1·y2.
    fn undistorted_welfare_decomposes() {
        let params = ModelParameters::default();

        let report = evaluate_welfare(
            &params,
            PolicyInstrument::laissez_faire(),
            &EquilibriumOptions::default(),
        )
        .expect("Undistorted equilibrium exists");

        let y2 = report.equilibrium.snapshot.firm2.output;
        assert_relative_eq!(report.utility, -0.587623, max_relative = 1e-5);
        assert_relative_eq!(y2, 0.745379, max_relative = 1e-5);
        assert_relative_eq!(report.externality, 0.1 * y2, max_relative = 1e-12);
        assert_relative_eq!(report.cost(), -(report.utility - 0.1 * y2), max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Failures below the welfare boundary become +∞ instead of errors.
    //
    // Given
    // -----
    // - A non-finite tax, and a subsidy larger than the starting producer
    //   price of good 2.
    //
    // Expect
    // ------
    // - `negative_welfare` returns +∞ for both; `evaluate_welfare` errors.
    fn invalid_policies_map_to_infinite_cost() {
        let params = ModelParameters::default();
        let opts = EquilibriumOptions::default();

        let nan_tax = PolicyInstrument::new(f64::NAN, 0.0);
        assert_eq!(negative_welfare(&params, nan_tax, &opts), f64::INFINITY);
        assert!(evaluate_welfare(&params, nan_tax, &opts).is_err());

        let bad_price = PolicyInstrument::new(-5.0, 0.0);
        assert_eq!(negative_welfare(&params, bad_price, &opts), f64::INFINITY);
    }

    #[test]
    // Purpose
    // -------
    // An equilibrium solve that runs out of iterations is a convergence
    // error below the welfare boundary and +∞ at it.
    //
    // Given
    // -----
    // - Default parameters, τ = 0.1, T = 0, one Newton iteration with tol
    //   1e-14 from unit prices (the equilibrium is near (0.98, 1.5)).
    //
    // Expect
    // ------
    // - `evaluate_welfare` fails with a convergence error.
    // - `negative_welfare` and `negative_balanced_welfare` return +∞.
    fn newton_budget_exhaustion_maps_to_infinite_cost() {
        let params = ModelParameters::default();
        let newton = NewtonOptions::new(1e-14, 1, 40, JacobianScheme::Central, false).unwrap();
        let opts = EquilibriumOptions::new(newton, LaborSupplyOptions::default());
        let policy = PolicyInstrument::new(0.1, 0.0);

        let err = evaluate_welfare(&params, policy, &opts).unwrap_err();

        assert!(err.is_convergence(), "unexpected error: {err}");
        assert_eq!(negative_welfare(&params, policy, &opts), f64::INFINITY);
        assert_eq!(negative_balanced_welfare(&params, 0.1, &opts), f64::INFINITY);
    }

    #[test]
    // Purpose
    // -------
    // With a good-2 externality, a small rebated tax beats laissez-faire
    // and a subsidy does worse.
    //
    // Given
    // -----
    // - Default parameters (κ = 0.1), τ ∈ {−0.2, 0, 0.15}.
    //
    // Expect
    // ------
    // - cost(0.15) < cost(0) < cost(−0.2).
    fn rebated_tax_improves_on_laissez_faire() {
        let params = ModelParameters::default();
        let opts = EquilibriumOptions::default();

        let subsidy = negative_balanced_welfare(&params, -0.2, &opts);
        let none = negative_balanced_welfare(&params, 0.0, &opts);
        let tax = negative_balanced_welfare(&params, 0.15, &opts);

        assert!(tax < none, "{tax} vs {none}");
        assert!(none < subsidy, "{none} vs {subsidy}");
        assert_relative_eq!(none, 0.66216, max_relative = 1e-4);
    }
}
