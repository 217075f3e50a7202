//! economy — two-good production economy with a corrective tax on good 2.
//!
//! Purpose
//! -------
//! Model a representative household that supplies labor to two competitive
//! firms, solve for market-clearing prices under a per-unit tax `τ` on good 2
//! and a lump-sum transfer `T`, and score policies by social welfare net of a
//! good-2 production externality.
//!
//! Key behaviors
//! -------------
//! - `firm`: profit-maximizing labor demand and output for `y = A·l^γ`.
//! - `household`: Cobb–Douglas demands, utility, and the labor first-order
//!   condition.
//! - `labor_supply`: bracketed Brent solve of that condition.
//! - `equilibrium`: damped Newton over prices (and the transfer under a
//!   balanced budget) for labor and good-1 clearing.
//! - `welfare`: `SWF = U − κ·y2`, with a `+∞` sentinel form for search.
//! - `policy_search`: outer minimization of `−SWF` over the instruments.
//!
//! Invariants & assumptions
//! ------------------------
//! - The wage is the numeraire (`w = 1`).
//! - `ModelParameters` is immutable and passed by reference everywhere; no
//!   state survives between calls.
//! - Every iterative solve is bounded, so every call terminates.
//!
//! Conventions
//! -----------
//! - Infeasible intermediate states are typed [`ModelError`] values with
//!   [`ErrorKind::Domain`]; exhausted solver budgets are
//!   [`ErrorKind::Convergence`]. Only the welfare boundary turns them into
//!   `+∞`.
//!
//! Downstream usage
//! ----------------
//! - Solve one equilibrium with [`solve_equilibrium`], score it with
//!   [`evaluate_welfare`], or search with [`optimize_policy`].
//! - `economy::prelude::*` imports the common surface.
//!
//! Testing notes
//! -------------
//! - Unit tests check closed forms (firm choice, zero-income labor supply,
//!   undistorted equilibrium) and the generalized Walras identity.
//! - `tests/integration_policy_pipeline.rs` runs the end-to-end properties.

pub mod equilibrium;
pub mod errors;
pub mod firm;
pub mod household;
pub mod labor_supply;
pub mod params;
pub mod policy;
pub mod policy_search;
pub mod welfare;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::equilibrium::{
    EconomySnapshot, EquilibriumOptions, EquilibriumResult, MarketResiduals, evaluate_economy,
    market_clearing_residuals, solve_balanced_equilibrium, solve_equilibrium,
};
pub use self::errors::{ErrorKind, ModelError, ModelResult};
pub use self::firm::{FirmOutcome, firm_outcome, labor_demand};
pub use self::household::{
    HouseholdEnv, HouseholdOutcome, household_outcome, household_utility, labor_foc_residual,
};
pub use self::labor_supply::{LaborSupplyOptions, solve_labor_supply};
pub use self::params::ModelParameters;
pub use self::policy::{PolicyInstrument, PolicyRegime, PriceVector, WAGE};
pub use self::policy_search::{
    PolicyBounds, PolicyOutcome, PolicySearchOptions, WelfareObjective, optimize_policy,
};
pub use self::welfare::{WelfareReport, evaluate_welfare, negative_welfare};

pub mod prelude {
    pub use super::equilibrium::{EquilibriumOptions, EquilibriumResult, solve_equilibrium};
    pub use super::errors::{ModelError, ModelResult};
    pub use super::params::ModelParameters;
    pub use super::policy::{PolicyInstrument, PolicyRegime, PriceVector};
    pub use super::policy_search::{PolicySearchOptions, optimize_policy};
    pub use super::welfare::{evaluate_welfare, negative_welfare};
}
