//! policy_search — welfare-maximizing tax/transfer policy.
//!
//! Purpose
//! -------
//! Wrap the welfare evaluation as an [`Objective`] and hand it to the generic
//! minimizer. The search runs over `(τ, T)` in the free regime and over `τ`
//! alone when the budget must balance.
//!
//! Key behaviors
//! -------------
//! - Each cost evaluation solves a fresh equilibrium from unit prices, so
//!   evaluations are independent and deterministic.
//! - Policies outside [`PolicyBounds`], and policies without a valid
//!   equilibrium, cost `+∞`. The default Nelder–Mead search simply moves
//!   away from them.
//! - After the search, the best policy is re-evaluated with typed errors to
//!   produce a full [`WelfareReport`].
//!
//! Invariants & assumptions
//! ------------------------
//! - The starting policy must lie inside the bounds.
//! - In the balanced regime only `bounds.tau` is consulted; the transfer is
//!   an equilibrium outcome.
//!
//! Conventions
//! -----------
//! - θ = `[τ, T]` (free) or `[τ]` (balanced).
//! - The reported cost is `−SWF`.
use ndarray::{Array1, array};

use crate::{
    economy::{
        equilibrium::EquilibriumOptions,
        errors::ModelError,
        params::ModelParameters,
        policy::{PolicyInstrument, PolicyRegime},
        welfare::{
            WelfareReport, evaluate_balanced_welfare, evaluate_welfare,
            negative_balanced_welfare, negative_welfare,
        },
    },
    optimization::{
        errors::{OptError, OptResult},
        minimizer::{
            api::minimize,
            traits::{MinimizeOutcome, MinimizerOptions, Objective},
            types::{Cost, Theta},
        },
    },
};

/// Closed box on the policy instruments.
///
/// Fields:
/// - `tau` — `(lower, upper)` for the tax.
/// - `transfer` — `(lower, upper)` for the transfer (free regime only).
///
/// Default:
/// - Unbounded: `(−∞, +∞)` for both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyBounds {
    pub tau: (f64, f64),
    pub transfer: (f64, f64),
}

impl PolicyBounds {
    /// Construct validated bounds. Infinite endpoints are allowed.
    ///
    /// # Errors
    /// [`ModelError::InvalidBounds`] when an endpoint is NaN or `lower > upper`.
    pub fn new(tau: (f64, f64), transfer: (f64, f64)) -> Result<Self, ModelError> {
        check_interval("tau", tau)?;
        check_interval("transfer", transfer)?;
        Ok(Self { tau, transfer })
    }

    /// Whether `policy` lies in the box; the transfer is checked only when
    /// `regime` is free.
    pub fn contains(&self, policy: PolicyInstrument, regime: PolicyRegime) -> bool {
        let in_tau = self.tau.0 <= policy.tau && policy.tau <= self.tau.1;
        match regime {
            PolicyRegime::Free => {
                in_tau && self.transfer.0 <= policy.transfer && policy.transfer <= self.transfer.1
            }
            PolicyRegime::BalancedBudget => in_tau,
        }
    }
}

impl Default for PolicyBounds {
    fn default() -> Self {
        Self {
            tau: (f64::NEG_INFINITY, f64::INFINITY),
            transfer: (f64::NEG_INFINITY, f64::INFINITY),
        }
    }
}

/// Policy search configuration.
///
/// Default:
/// - Free regime, unbounded, default equilibrium solver, Nelder–Mead.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolicySearchOptions {
    pub regime: PolicyRegime,
    pub bounds: PolicyBounds,
    pub equilibrium: EquilibriumOptions,
    pub minimizer: MinimizerOptions,
}

impl PolicySearchOptions {
    pub fn new(
        regime: PolicyRegime, bounds: PolicyBounds, equilibrium: EquilibriumOptions,
        minimizer: MinimizerOptions,
    ) -> Self {
        Self { regime, bounds, equilibrium, minimizer }
    }
}

/// `−SWF` as a minimization objective over the policy instruments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WelfareObjective {
    pub regime: PolicyRegime,
    pub bounds: PolicyBounds,
    pub equilibrium: EquilibriumOptions,
}

impl WelfareObjective {
    pub fn new(regime: PolicyRegime, bounds: PolicyBounds, equilibrium: EquilibriumOptions) -> Self {
        Self { regime, bounds, equilibrium }
    }

    /// Policy encoded by θ. In the balanced regime the transfer is 0 here;
    /// the solved one is in the equilibrium result.
    pub fn policy_from_theta(&self, theta: &Theta) -> OptResult<PolicyInstrument> {
        let expected = self.regime.dimension();
        if theta.len() != expected {
            return Err(OptError::ParameterDimMismatch { expected, found: theta.len() });
        }
        Ok(match self.regime {
            PolicyRegime::Free => PolicyInstrument::new(theta[0], theta[1]),
            PolicyRegime::BalancedBudget => PolicyInstrument::new(theta[0], 0.0),
        })
    }

    /// θ encoding `policy` for this regime.
    pub fn theta_from_policy(&self, policy: PolicyInstrument) -> Theta {
        match self.regime {
            PolicyRegime::Free => array![policy.tau, policy.transfer],
            PolicyRegime::BalancedBudget => array![policy.tau],
        }
    }
}

impl Objective for WelfareObjective {
    type Data = ModelParameters;

    fn value(&self, theta: &Theta, params: &ModelParameters) -> OptResult<Cost> {
        let policy = self.policy_from_theta(theta)?;
        if !self.bounds.contains(policy, self.regime) {
            return Ok(f64::INFINITY);
        }
        Ok(match self.regime {
            PolicyRegime::Free => negative_welfare(params, policy, &self.equilibrium),
            PolicyRegime::BalancedBudget => {
                negative_balanced_welfare(params, policy.tau, &self.equilibrium)
            }
        })
    }

    fn check(&self, theta: &Theta, params: &ModelParameters) -> OptResult<()> {
        params.validate()?;
        let policy = self.policy_from_theta(theta)?;
        if !self.bounds.contains(policy, self.regime) {
            return Err(ModelError::InvalidInitialGuess {
                name: "policy",
                value: policy.tau,
                reason: "Starting policy must lie inside the policy bounds.",
            }
            .into());
        }
        Ok(())
    }
}

/// Result of a policy search.
///
/// - `policy`: best policy; under a balanced budget the transfer is the
///   equilibrium one.
/// - `welfare`: full welfare report at `policy`.
/// - `initial_cost`: `−SWF` at the starting policy (`+∞` if it had no
///   equilibrium).
/// - `search`: raw minimizer outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyOutcome {
    pub policy: PolicyInstrument,
    pub welfare: WelfareReport,
    pub initial_cost: f64,
    pub search: MinimizeOutcome,
}

impl PolicyOutcome {
    /// `−SWF` at the best policy.
    pub fn cost(&self) -> f64 {
        self.welfare.cost()
    }
}

/// optimize_policy — search for the welfare-maximizing policy.
///
/// Parameters
/// ----------
/// - `params`: model parameters, shared read-only by every evaluation.
/// - `initial`: starting policy; its transfer is ignored in the balanced
///   regime.
/// - `opts`: regime, bounds, equilibrium and minimizer settings.
///
/// Returns
/// -------
/// A [`PolicyOutcome`] with the best policy and its welfare report.
///
/// Errors
/// ------
/// - [`OptError::ModelFailure`] for invalid parameters, a starting policy
///   outside the bounds, or a best policy that fails typed re-evaluation.
/// - [`OptError::NonFiniteCost`] when no evaluated policy had a finite cost.
/// - Minimizer and `argmin` errors.
pub fn optimize_policy(
    params: &ModelParameters, initial: PolicyInstrument, opts: &PolicySearchOptions,
) -> OptResult<PolicyOutcome> {
    let objective = WelfareObjective::new(opts.regime, opts.bounds, opts.equilibrium);
    let theta0 = objective.theta_from_policy(initial);
    let initial_cost = objective.value(&theta0, params)?;
    let search = minimize(&objective, theta0, params, &opts.minimizer)?;
    let best = objective.policy_from_theta(&search.theta_hat)?;
    let welfare = match opts.regime {
        PolicyRegime::Free => evaluate_welfare(params, best, &opts.equilibrium)?,
        PolicyRegime::BalancedBudget => {
            evaluate_balanced_welfare(params, best.tau, 0.0, &opts.equilibrium)?
        }
    };
    Ok(PolicyOutcome { policy: welfare.equilibrium.policy(), welfare, initial_cost, search })
}

/// Grid of `−SWF` values, handy for plotting the welfare curve of `τ`
/// under the given regime. The transfer of `base` is held fixed in the
/// free regime.
pub fn welfare_profile(
    params: &ModelParameters, base: PolicyInstrument, taus: &[f64], regime: PolicyRegime,
    equilibrium: &EquilibriumOptions,
) -> Array1<f64> {
    taus.iter()
        .map(|&tau| match regime {
            PolicyRegime::Free => {
                negative_welfare(params, PolicyInstrument::new(tau, base.transfer), equilibrium)
            }
            PolicyRegime::BalancedBudget => negative_balanced_welfare(params, tau, equilibrium),
        })
        .collect()
}

// ---- Helper Methods ----

fn check_interval(name: &'static str, (lower, upper): (f64, f64)) -> Result<(), ModelError> {
    if lower.is_nan() || upper.is_nan() || lower > upper {
        return Err(ModelError::InvalidBounds { name, lower, upper });
    }
    Ok(())
}
