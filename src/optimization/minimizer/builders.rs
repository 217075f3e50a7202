//! minimizer::builders — solver construction helpers.
//!
//! Purpose
//! -------
//! Build configured argmin solvers from [`MinimizerOptions`] so that the
//! runner layer never touches argmin's generic wiring.
//!
//! Key behaviors
//! -------------
//! - L-BFGS with Hager–Zhang or More–Thuente line search; gradient and
//!   cost-change tolerances applied through [`configure_lbfgs`].
//! - Nelder–Mead with the initial simplex `{θ0, θ0 + h·e_1, …, θ0 + h·e_n}`
//!   (`h` signed, `±opts.simplex_step`) and the cost tolerance applied as the
//!   simplex standard-deviation stopping rule.
//!
//! Conventions
//! -----------
//! - Builders do not set `max_iters`; the runner applies it.
//! - Errors raised by argmin's `with_*` setters surface as [`OptError`]
//!   via `From<argmin::core::Error>`.
//!
//! Testing notes
//! -------------
//! - Unit tests check simplex geometry and that valid options build.
//!
//! [`OptError`]: crate::optimization::errors::OptError
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    minimizer::{
        traits::MinimizerOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, SimplexSolver, Theta,
        },
    },
};

/// build_optimizer_hager_zhang — construct L-BFGS with Hager–Zhang line search.
///
/// Parameters
/// ----------
/// - `opts`: consults `lbfgs_mem` (default [`DEFAULT_LBFGS_MEM`]) and the
///   gradient / cost tolerances.
///
/// Errors
/// ------
/// - `OptError` when argmin rejects a tolerance.
pub fn build_optimizer_hager_zhang(opts: &MinimizerOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// build_optimizer_more_thuente — construct L-BFGS with More–Thuente line search.
///
/// Same configuration rules as [`build_optimizer_hager_zhang`].
pub fn build_optimizer_more_thuente(opts: &MinimizerOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply optional gradient and cost-change tolerances to an L-BFGS solver.
///
/// When a tolerance is `None`, argmin's default stays in effect.
///
/// # Errors
/// `OptError` when argmin rejects a tolerance.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MinimizerOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// build_nelder_mead — construct a Nelder–Mead solver around `theta0`.
///
/// Parameters
/// ----------
/// - `theta0`: first simplex vertex.
/// - `step`: signed edge length; restarts pass `-opts.simplex_step` to lay
///   the simplex on the other side of `theta0`.
/// - `opts`: consults `tols.tol_cost` (simplex cost standard deviation).
///
/// Returns
/// -------
/// A solver whose simplex has `theta0.len() + 1` vertices.
///
/// Errors
/// ------
/// - `OptError` when argmin rejects the standard-deviation tolerance.
pub fn build_nelder_mead(
    theta0: &Theta, step: f64, opts: &MinimizerOptions,
) -> OptResult<SimplexSolver> {
    let mut solver = SimplexSolver::new(initial_simplex(theta0, step));
    if let Some(sd) = opts.tols.tol_cost {
        solver = solver.with_sd_tolerance(sd)?;
    }
    Ok(solver)
}

/// Vertices `θ0` and `θ0 + step·e_i` for each coordinate `i`.
pub fn initial_simplex(theta0: &Theta, step: f64) -> Vec<Theta> {
    let mut vertices = Vec::with_capacity(theta0.len() + 1);
    vertices.push(theta0.clone());
    for i in 0..theta0.len() {
        let mut v = theta0.clone();
        v[i] += step;
        vertices.push(v);
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::minimizer::traits::{
        LineSearcher, MinimizerOptions, SearchMethod, Tolerances,
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction of both L-BFGS variants with default and explicit memory.
    // - Geometry of the initial Nelder–Mead simplex.
    //
    // They intentionally DO NOT cover:
    // - Executor behavior; see `run` and `api`.
    // -------------------------------------------------------------------------

    fn lbfgs_opts(line_searcher: LineSearcher, mem: Option<usize>) -> MinimizerOptions {
        let tols = Tolerances::new(Some(1e-6), Some(1e-8), Some(50)).expect("valid tolerances");
        MinimizerOptions::new(tols, SearchMethod::Lbfgs, line_searcher, 0.1, false, mem)
            .expect("valid options")
    }

    #[test]
    // Purpose
    // -------
    // Both line-search variants build with default and explicit memory.
    //
    // Given
    // -----
    // - Valid tolerances, `lbfgs_mem` of `None` and `Some(11)`.
    //
    // Expect
    // ------
    // - Every builder call returns `Ok`.
    fn lbfgs_builders_accept_valid_options() {
        for mem in [None, Some(11)] {
            assert!(build_optimizer_hager_zhang(&lbfgs_opts(LineSearcher::HagerZhang, mem)).is_ok());
            assert!(
                build_optimizer_more_thuente(&lbfgs_opts(LineSearcher::MoreThuente, mem)).is_ok()
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // The initial simplex is θ0 plus one step along each axis.
    //
    // Given
    // -----
    // - θ0 = (0.5, -1), step 0.25.
    //
    // Expect
    // ------
    // - Vertices (0.5, -1), (0.75, -1), (0.5, -0.75).
    fn initial_simplex_steps_along_each_axis() {
        let vertices = initial_simplex(&array![0.5, -1.0], 0.25);

        assert_eq!(vertices, vec![array![0.5, -1.0], array![0.75, -1.0], array![0.5, -0.75]]);
    }

    #[test]
    // Purpose
    // -------
    // Nelder–Mead builds with the default options on either side of θ0.
    //
    // Given
    // -----
    // - `MinimizerOptions::default()`, a 2-dimensional start, steps ±0.1.
    //
    // Expect
    // ------
    // - `Ok(_)`.
    fn nelder_mead_builds_with_defaults() {
        let opts = MinimizerOptions::default();

        assert!(build_nelder_mead(&array![0.0, 0.0], opts.simplex_step, &opts).is_ok());
        assert!(build_nelder_mead(&array![0.0, 0.0], -opts.simplex_step, &opts).is_ok());
    }
}
