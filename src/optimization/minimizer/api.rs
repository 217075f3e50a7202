//! High-level entry point for minimizing a user-provided [`Objective`].
//!
//! Dispatches on [`SearchMethod`]: Nelder–Mead runs on an
//! infeasible-tolerant adapter, L-BFGS on a strict one with the configured
//! line search.
use crate::optimization::{
    errors::OptResult,
    minimizer::{
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::{run_lbfgs, run_nelder_mead_with_restarts},
        traits::{LineSearcher, MinimizeOutcome, MinimizerOptions, Objective, SearchMethod},
        types::Theta,
        validation::validate_theta0,
    },
};

/// Minimize `c(θ)` from `theta0`.
///
/// # Behavior
/// - Rejects non-finite starting points, then calls `f.check(theta0, data)`.
/// - `SearchMethod::NelderMead`: simplex around `theta0`, restarted from θ̂
///   until the best cost stops improving; `+∞` costs mark infeasible points
///   and are never selected as the optimum.
/// - `SearchMethod::Lbfgs`: L-BFGS with Hager–Zhang or More–Thuente line
///   search; costs must stay finite along the path.
///
/// # Errors
/// - [`OptError::InvalidStartingPoint`] for a non-finite `theta0`.
/// - Any error from `f.check`, from the builders, or raised at run time.
///
/// # Example
/// ```
/// use ndarray::array;
/// use policy_equilibrium::optimization::{
///     errors::OptResult,
///     minimizer::{minimize, MinimizerOptions, Objective, Theta},
/// };
///
/// struct Shifted;
/// impl Objective for Shifted {
///     type Data = ();
///     fn value(&self, t: &Theta, _: &()) -> OptResult<f64> {
///         Ok((t[0] - 1.0).powi(2) + (t[1] + 2.0).powi(2))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = minimize(&Shifted, array![0.0, 0.0], &(), &MinimizerOptions::default())?;
/// assert!((out.theta_hat[0] - 1.0).abs() < 1e-3);
/// # Ok::<(), policy_equilibrium::optimization::errors::OptError>(())
/// ```
///
/// [`OptError::InvalidStartingPoint`]: crate::optimization::errors::OptError::InvalidStartingPoint
pub fn minimize<F: Objective>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MinimizerOptions,
) -> OptResult<MinimizeOutcome> {
    validate_theta0(&theta0)?;
    f.check(&theta0, data)?;
    match opts.method {
        SearchMethod::NelderMead => run_nelder_mead_with_restarts(f, data, &theta0, opts),
        SearchMethod::Lbfgs => {
            let problem = ArgMinAdapter::new(f, data);
            match opts.line_searcher {
                LineSearcher::MoreThuente => {
                    let solver = build_optimizer_more_thuente(opts)?;
                    run_lbfgs(theta0, opts, problem, solver)
                }
                LineSearcher::HagerZhang => {
                    let solver = build_optimizer_hager_zhang(opts)?;
                    run_lbfgs(theta0, opts, problem, solver)
                }
            }
        }
    }
}
