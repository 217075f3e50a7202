//! policy_equilibrium — general-equilibrium tax policy with bounded solvers.
//!
//! Purpose
//! -------
//! Serve as the crate root. A small production economy (two goods, one
//! household, labor as numeraire) is solved for competitive equilibrium
//! under a tax on good 2 and a lump-sum transfer, and the welfare-maximizing
//! policy is searched for numerically.
//!
//! Key behaviors
//! -------------
//! - `economy`: the model itself (firms, household, labor supply,
//!   equilibrium, welfare, and policy search).
//! - `optimization`: the reusable numerical layer (Brent and Newton root
//!   finders, an argmin-backed minimizer, and the shared error type).
//!
//! Invariants & assumptions
//! ------------------------
//! - All computation is synchronous and deterministic; parameters are
//!   immutable values passed by reference.
//! - Errors are returned as typed values; the library never prints unless
//!   built with `obs_slog` and asked to be verbose.
//!
//! Downstream usage
//! ----------------
//! - `use policy_equilibrium::economy::prelude::*;` for the model surface.
//! - `use policy_equilibrium::optimization::prelude::*;` to reuse the
//!   solvers on other problems.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; the end-to-end properties are in
//!   `tests/integration_policy_pipeline.rs`.

pub mod economy;
pub mod optimization;
