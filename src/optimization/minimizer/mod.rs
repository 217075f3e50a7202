//! minimizer — argmin-powered minimization of scalar objectives.
//!
//! Purpose
//! -------
//! Provide a small, Argmin-backed optimization layer for **minimizing** a
//! scalar cost `c(θ)`. Callers implement [`Objective`] and invoke
//! [`minimize`] with a starting point and [`MinimizerOptions`].
//!
//! Key behaviors
//! -------------
//! - Two search methods ([`SearchMethod`]):
//!   - Nelder–Mead (default): derivative free; `+∞` marks infeasible points.
//!   - L-BFGS with Hager–Zhang or More–Thuente line search; analytic
//!     gradients when available, finite differences otherwise.
//! - Bridge to argmin through [`adapter::ArgMinAdapter`], build solvers in
//!   [`builders`], execute them in [`run`], and normalize results into a
//!   [`MinimizeOutcome`].
//!
//! Invariants & assumptions
//! ------------------------
//! - [`Objective::value`] reports failures as [`OptError`] values or, for
//!   derivative-free searches, as `+∞`; it never panics.
//! - Configuration types are validated on construction.
//!
//! Conventions
//! -----------
//! - Parameters are [`Theta`] (`Array1<f64>`); any mapping from a
//!   structured model (e.g. a tax/transfer pair) happens in the caller.
//! - The outcome's `converged` flag is `true` only when the solver met its
//!   own stopping tolerance.
//!
//! Downstream usage
//! ----------------
//! - `economy::policy_search` implements [`Objective`] for negative welfare
//!   and calls [`minimize`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover sign-free cost passthrough, FD fallbacks, simplex
//!   geometry, and end-to-end minimization of closed-form bowls with both
//!   methods.
//!
//! [`OptError`]: crate::optimization::errors::OptError

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::traits::{
    LineSearcher, MinimizeOutcome, MinimizerOptions, Objective, SearchMethod, Tolerances,
};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{MinimizeOutcome, MinimizerOptions, Objective, SearchMethod};
    pub use super::types::{Cost, Grad, Theta};
}
