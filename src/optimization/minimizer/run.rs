//! Execution helpers that run an `argmin` solver on an [`Objective`] and
//! return a crate-friendly [`MinimizeOutcome`].
use crate::optimization::{
    errors::OptResult,
    minimizer::{
        adapter::ArgMinAdapter,
        builders::build_nelder_mead,
        traits::{MinimizeOutcome, MinimizerOptions, Objective},
        types::{Grad, Theta},
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, IterState, Solver, State};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Run a gradient-based solver (L-BFGS) from `theta0`.
///
/// Wires the adapted problem, the solver, the initial parameter, optional
/// observers (behind `obs_slog`), and `max_iters`, then executes and
/// converts the final state into a [`MinimizeOutcome`].
///
/// # Feature flags
/// With `obs_slog` and `opts.verbose`, a terminal slog observer is attached
/// and a pre-iteration line logs `c(θ0)` and `‖∇c(θ0)‖`.
///
/// # Errors
/// - Propagates `argmin` runtime errors (line-search failures, cost
///   errors) via `From<argmin::core::Error>`.
/// - Propagates validation errors from [`MinimizeOutcome::new`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MinimizerOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<MinimizeOutcome>
where
    F: Objective,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    MinimizeOutcome::new(
        result.take_best_param(),
        result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )
}

/// Upper bound on fresh-simplex restarts after the first Nelder–Mead run.
pub const MAX_SIMPLEX_RESTARTS: usize = 10;

/// Run Nelder–Mead from `theta0`, restarting from θ̂ while that helps.
///
/// The simplex stops once the spread of its vertex costs falls below
/// `tol_cost`, which also happens when the vertices straddle the minimum at
/// equal cost. Each converged run is therefore followed by a run on a fresh
/// simplex around its θ̂, laid out alternately at `-simplex_step` and
/// `+simplex_step` so the same straddling simplex is not rebuilt.
///
/// Restarts end after two consecutive runs fail to lower the best cost by
/// more than `tol_cost`, when the best run stopped without converging, after
/// [`MAX_SIMPLEX_RESTARTS`], or once `max_iter` is spent across all runs.
///
/// # Errors
/// - Builder errors from [`build_nelder_mead`].
/// - Anything [`run_nelder_mead`] returns.
pub fn run_nelder_mead_with_restarts<F: Objective>(
    f: &F, data: &F::Data, theta0: &Theta, opts: &MinimizerOptions,
) -> OptResult<MinimizeOutcome> {
    let min_gain = opts.tols.tol_cost.unwrap_or(0.0);
    let first = build_nelder_mead(theta0, opts.simplex_step, opts)?;
    let mut best = run_nelder_mead(
        opts,
        opts.tols.max_iter,
        ArgMinAdapter::infeasible_tolerant(f, data),
        first,
    )?;

    let mut misses = 0;
    for restart in 0..MAX_SIMPLEX_RESTARTS {
        if !best.converged || misses == 2 {
            break;
        }
        let budget = match opts.tols.max_iter {
            Some(max_iter) if best.iterations >= max_iter => break,
            Some(max_iter) => Some(max_iter - best.iterations),
            None => None,
        };
        let step = if restart % 2 == 0 { -opts.simplex_step } else { opts.simplex_step };
        let solver = build_nelder_mead(&best.theta_hat, step, opts)?;
        let next =
            run_nelder_mead(opts, budget, ArgMinAdapter::infeasible_tolerant(f, data), solver)?;
        misses = if next.value < best.value - min_gain { 0 } else { misses + 1 };
        best = best.chain(next);
    }
    Ok(best)
}

/// Run a derivative-free simplex solver for at most `max_iter` iterations.
///
/// The simplex already carries the starting point, so only observers and
/// `max_iters` are configured here. No gradient norm is reported.
///
/// # Errors
/// - Propagates `argmin` runtime errors via `From<argmin::core::Error>`.
/// - [`OptError::NonFiniteCost`] when every visited point was infeasible.
///
/// [`OptError::NonFiniteCost`]: crate::optimization::errors::OptError::NonFiniteCost
#[cfg_attr(not(feature = "obs_slog"), allow(unused_variables))]
pub fn run_nelder_mead<'a, F, S>(
    opts: &MinimizerOptions, max_iter: Option<usize>, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<MinimizeOutcome>
where
    F: Objective,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, (), (), (), (), f64>> + Send + 'static,
{
    let mut optimizer = Executor::new(problem, solver);
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    MinimizeOutcome::new(
        result.take_best_param(),
        result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        None,
    )
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: Objective,
{
    let c0 = problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());

    eprintln!(
        "init: cost(theta0) = {:.6}{}",
        c0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
