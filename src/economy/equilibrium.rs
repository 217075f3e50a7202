//! equilibrium — market-clearing prices for a given tax/transfer policy.
//!
//! Purpose
//! -------
//! Find producer prices `(p1, p2)` (wage = 1 numeraire) at which the labor
//! market and the good-1 market clear, given the household's optimal labor
//! supply at those prices. Optionally solve for the transfer that balances
//! the government budget as well.
//!
//! Key behaviors
//! -------------
//! - [`evaluate_economy`] computes every firm and household quantity at a
//!   candidate price vector; [`market_clearing_residuals`] condenses them
//!   into the labor, good-1, good-2, and government-budget residuals.
//! - [`solve_equilibrium`] runs damped Newton on the labor and good-1
//!   residuals in `(p1, p2)`.
//! - [`solve_balanced_equilibrium`] runs damped Newton on the labor, good-1,
//!   and budget residuals in `(p1, p2, T)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Only two of the three goods/labor markets are solved. Adding up the
//!   household and firm budget constraints gives
//!   `p1·(c1 − y1) + p2·(c2 − y2) + τ·c2 = w·(l − l1 − l2) + T`, so once
//!   labor and good 1 clear, `p2·(c2 − y2) = T − τ·c2`. Good 2 clears
//!   whenever the transfer is financed by the tax, in particular at
//!   `τ = T = 0` and always under a balanced budget.
//! - Newton trial points at which the economy is undefined (non-positive
//!   prices, infeasible household) are rejected by step halving.
//! - Every returned result satisfies the solved residuals to the Newton
//!   tolerance and carries all residuals for auditing.
//!
//! Conventions
//! -----------
//! - Residuals are "demand minus supply": `l − (l1 + l2)`, `c1 − y1`,
//!   `c2 − y2`; the budget residual is `τ·c2 − T`.
//! - Results are recomputed on every call; nothing is cached.
//!
//! Testing notes
//! -------------
//! - The undistorted equilibrium is checked against its closed form
//!   `l = (γ/ν)^(1/(1+ε))`, `l1 = α·l`, `p_j = l_j^(1−γ)/(γ·A)`.
//! - The generalized Walras identity is checked for arbitrary policies.
use ndarray::array;

use crate::{
    economy::{
        errors::{ModelError, ModelResult},
        firm::{FirmOutcome, firm_outcome},
        household::{HouseholdEnv, HouseholdOutcome, household_outcome},
        labor_supply::{DEFAULT_LABOR_GUESS, LaborSupplyOptions, solve_labor_supply},
        params::ModelParameters,
        policy::{PolicyInstrument, PriceVector, WAGE},
    },
    optimization::root_finding::{
        newton::solve_newton,
        traits::{NewtonOptions, Point, ResidualSystem, Residuals},
    },
};

/// Equilibrium solver configuration.
///
/// Fields:
/// - `newton` — outer Newton tolerance and budgets (sup norm of the solved
///   residuals).
/// - `labor` — inner labor-supply solver settings.
///
/// Default:
/// - `NewtonOptions::default()` (1e-10, 100 iterations, 40 halvings,
///   central Jacobian) and `LaborSupplyOptions::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EquilibriumOptions {
    pub newton: NewtonOptions,
    pub labor: LaborSupplyOptions,
}

impl EquilibriumOptions {
    pub fn new(newton: NewtonOptions, labor: LaborSupplyOptions) -> Self {
        Self { newton, labor }
    }
}

/// All quantities of the economy at one policy and price vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EconomySnapshot {
    pub policy: PolicyInstrument,
    pub prices: PriceVector,
    pub firm1: FirmOutcome,
    pub firm2: FirmOutcome,
    pub household: HouseholdOutcome,
}

impl EconomySnapshot {
    /// Market and budget residuals of this snapshot.
    pub fn residuals(&self) -> MarketResiduals {
        MarketResiduals {
            labor: self.household.labor - (self.firm1.labor + self.firm2.labor),
            good1: self.household.c1 - self.firm1.output,
            good2: self.household.c2 - self.firm2.output,
            budget: self.policy.budget_surplus(self.household.c2),
        }
    }
}

/// Excess demands and government budget surplus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketResiduals {
    pub labor: f64,
    pub good1: f64,
    pub good2: f64,
    pub budget: f64,
}

impl MarketResiduals {
    /// `max(|labor|, |good1|, |good2|)`.
    pub fn max_market_abs(&self) -> f64 {
        self.labor.abs().max(self.good1.abs()).max(self.good2.abs())
    }
}

/// A market-clearing allocation with solver diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibriumResult {
    pub snapshot: EconomySnapshot,
    pub residuals: MarketResiduals,
    pub iterations: usize,
    pub residual_evals: usize,
}

impl EquilibriumResult {
    pub fn prices(&self) -> PriceVector {
        self.snapshot.prices
    }

    /// Policy in effect; under a balanced budget the transfer is the solved one.
    pub fn policy(&self) -> PolicyInstrument {
        self.snapshot.policy
    }

    pub fn labor(&self) -> f64 {
        self.snapshot.household.labor
    }

    pub fn c1(&self) -> f64 {
        self.snapshot.household.c1
    }

    pub fn c2(&self) -> f64 {
        self.snapshot.household.c2
    }
}

/// evaluate_economy — firm and household quantities at given prices.
///
/// Parameters
/// ----------
/// - `params`: model parameters.
/// - `policy`: tax on good 2 and lump-sum transfer.
/// - `prices`: producer prices; the wage is [`WAGE`].
/// - `labor_opts`: inner solver settings (started at [`DEFAULT_LABOR_GUESS`]).
///
/// Errors
/// ------
/// - [`ModelError::NonPositivePrice`] / [`ModelError::NonFiniteQuantity`]
///   for invalid prices or policies.
/// - Domain and convergence errors from the firm, household, and labor
///   supply blocks.
pub fn evaluate_economy(
    params: &ModelParameters, policy: PolicyInstrument, prices: PriceVector,
    labor_opts: &LaborSupplyOptions,
) -> ModelResult<EconomySnapshot> {
    policy.validate()?;
    prices.validate()?;
    let firm1 = firm_outcome(prices.p1, WAGE, params)?;
    let firm2 = firm_outcome(prices.p2, WAGE, params)?;
    let env = HouseholdEnv {
        wage: WAGE,
        prices,
        transfer: policy.transfer,
        profit1: firm1.profit,
        profit2: firm2.profit,
        tau: policy.tau,
    };
    let labor = solve_labor_supply(&env, params, DEFAULT_LABOR_GUESS, labor_opts)?;
    let household = household_outcome(labor, &env, params)?;
    Ok(EconomySnapshot { policy, prices, firm1, firm2, household })
}

/// All market and budget residuals at `prices`.
///
/// # Errors
/// Same as [`evaluate_economy`].
pub fn market_clearing_residuals(
    params: &ModelParameters, policy: PolicyInstrument, prices: PriceVector,
    labor_opts: &LaborSupplyOptions,
) -> ModelResult<MarketResiduals> {
    Ok(evaluate_economy(params, policy, prices, labor_opts)?.residuals())
}

/// solve_equilibrium — market-clearing prices for a fixed policy.
///
/// Parameters
/// ----------
/// - `params`: model parameters.
/// - `policy`: `(τ, T)`, both finite.
/// - `initial_prices`: Newton starting point, both entries > 0.
/// - `opts`: Newton and labor-supply settings.
///
/// Returns
/// -------
/// An [`EquilibriumResult`] whose labor and good-1 residuals are within
/// `opts.newton.tol`.
///
/// Errors
/// ------
/// - [`ModelError::InvalidParameter`] / [`ModelError::NonFiniteQuantity`]
///   for invalid parameters or policies.
/// - [`ModelError::InvalidInitialGuess`] for non-positive starting prices.
/// - [`ModelError::NotConverged`], [`ModelError::Stalled`],
///   [`ModelError::SingularJacobian`] when Newton fails.
/// - Domain errors raised at the starting point.
///
/// Notes
/// -----
/// - Deterministic: identical inputs give identical results.
pub fn solve_equilibrium(
    params: &ModelParameters, policy: PolicyInstrument, initial_prices: PriceVector,
    opts: &EquilibriumOptions,
) -> ModelResult<EquilibriumResult> {
    params.validate()?;
    policy.validate()?;
    check_initial_prices(initial_prices)?;
    let system = MarketClearing { params, policy, labor_opts: &opts.labor };
    let x0 = array![initial_prices.p1, initial_prices.p2];
    let out = solve_newton(&system, x0, &opts.newton)?;
    let prices = PriceVector::new(out.x[0], out.x[1]);
    finish(params, policy, prices, opts, out.iterations, out.residual_evals)
}

/// solve_balanced_equilibrium — prices and a self-financing transfer.
///
/// Solves labor clearing, good-1 clearing, and `τ·c2 = T` jointly in
/// `(p1, p2, T)`. By the budget identity good 2 then clears as well.
///
/// # Errors
/// Same as [`solve_equilibrium`]; `initial_transfer` must be finite.
pub fn solve_balanced_equilibrium(
    params: &ModelParameters, tau: f64, initial_prices: PriceVector, initial_transfer: f64,
    opts: &EquilibriumOptions,
) -> ModelResult<EquilibriumResult> {
    params.validate()?;
    PolicyInstrument::new(tau, initial_transfer).validate()?;
    check_initial_prices(initial_prices)?;
    let system = BalancedClearing { params, tau, labor_opts: &opts.labor };
    let x0 = array![initial_prices.p1, initial_prices.p2, initial_transfer];
    let out = solve_newton(&system, x0, &opts.newton)?;
    let prices = PriceVector::new(out.x[0], out.x[1]);
    let policy = PolicyInstrument::new(tau, out.x[2]);
    finish(params, policy, prices, opts, out.iterations, out.residual_evals)
}

// ---- Residual systems ----

/// Labor and good-1 residuals as functions of `(p1, p2)`.
struct MarketClearing<'a> {
    params: &'a ModelParameters,
    policy: PolicyInstrument,
    labor_opts: &'a LaborSupplyOptions,
}

impl ResidualSystem for MarketClearing<'_> {
    type Error = ModelError;

    fn residuals(&self, x: &Point) -> ModelResult<Residuals> {
        let prices = PriceVector::new(x[0], x[1]);
        let r = market_clearing_residuals(self.params, self.policy, prices, self.labor_opts)?;
        Ok(array![r.labor, r.good1])
    }
}

/// Labor, good-1, and budget residuals as functions of `(p1, p2, T)`.
struct BalancedClearing<'a> {
    params: &'a ModelParameters,
    tau: f64,
    labor_opts: &'a LaborSupplyOptions,
}

impl ResidualSystem for BalancedClearing<'_> {
    type Error = ModelError;

    fn residuals(&self, x: &Point) -> ModelResult<Residuals> {
        let prices = PriceVector::new(x[0], x[1]);
        let policy = PolicyInstrument::new(self.tau, x[2]);
        let r = market_clearing_residuals(self.params, policy, prices, self.labor_opts)?;
        Ok(array![r.labor, r.good1, r.budget])
    }
}

// ---- Helper Methods ----

fn check_initial_prices(prices: PriceVector) -> ModelResult<()> {
    for (name, value) in [("p1", prices.p1), ("p2", prices.p2)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ModelError::InvalidInitialGuess {
                name,
                value,
                reason: "Initial prices must be finite and > 0.",
            });
        }
    }
    Ok(())
}

fn finish(
    params: &ModelParameters, policy: PolicyInstrument, prices: PriceVector,
    opts: &EquilibriumOptions, iterations: usize, residual_evals: usize,
) -> ModelResult<EquilibriumResult> {
    prices.validate()?;
    let snapshot = evaluate_economy(params, policy, prices, &opts.labor)?;
    let residuals = snapshot.residuals();
    Ok(EquilibriumResult { snapshot, residuals, iterations, residual_evals })
}
